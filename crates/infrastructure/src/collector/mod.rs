mod dnstap_collector;
mod error;
mod listener;

pub use dnstap_collector::{CollectorStopHandle, DnstapCollector};
pub use error::CollectorError;
pub use listener::{Connection, DnstapListener};
