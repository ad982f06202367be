mod collectors;

pub use collectors::{start_collectors, stop_collectors, RunningCollector};
