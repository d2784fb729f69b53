pub mod dispatcher;
pub mod menu;
pub mod navigation;
pub mod schedule_lookup;
pub mod scheduler;
pub mod voting_manager;
pub mod weather;

pub use dispatcher::Dispatcher;
pub use scheduler::Scheduler;
pub use weather::{OpenWeatherClient, SharedWeatherService};
