use dnstap_collector_domain::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Failed to bind {endpoint}: {source}")]
    Bind {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Collector '{0}' is not listening")]
    NotListening(String),

    #[error("Invalid collector configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Unix domain sockets are not supported on this platform")]
    UnsupportedTransport,

    #[error("Decoder task failed: {0}")]
    DecoderFailed(String),
}
