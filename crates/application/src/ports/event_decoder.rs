use bytes::Bytes;
use dnstap_collector_domain::{DnstapEvent, DomainError};

/// Turns one Frame Streams data payload into a dnstap envelope.
pub trait DnstapEventDecoder: Send + Sync {
    fn decode(&self, frame: &Bytes) -> Result<DnstapEvent, DomainError>;
}
