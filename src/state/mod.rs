pub mod roster;
pub mod session;
pub mod session_registry;
pub mod store;

pub use roster::{Roster, SharedRoster};
pub use session::{Frame, MenuState, Session, Slots};
pub use session_registry::{SessionRegistry, SharedSession};
pub use store::Store;
