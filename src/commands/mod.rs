pub mod broadcast;
pub mod general;
pub mod voting;

pub use broadcast::send_all;
pub use general::{help, start, stop};
pub use voting::total_results;
