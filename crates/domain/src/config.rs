pub mod collector;
pub mod errors;
pub mod logging;
pub mod output;
pub mod root;

pub use collector::{CollectorConfig, ListenEndpoint, TransportKind};
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use output::{OutputConfig, OutputFormat};
pub use root::{CliOverrides, Config};
