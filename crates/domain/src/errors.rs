use thiserror::Error;

/// Failures raised while walking a raw DNS message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("DNS message too short: {len} bytes (header needs 12)")]
    TooShort { len: usize },

    #[error("DNS message truncated at offset {offset}")]
    Truncated { offset: usize },

    #[error("Invalid label length {len} at offset {offset}")]
    InvalidLabel { len: u8, offset: usize },

    #[error("Compression pointer in question section at offset {offset}")]
    CompressionPointer { offset: usize },

    #[error("Question name exceeds 255 octets")]
    NameTooLong,
}

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid dnstap envelope: {0}")]
    InvalidEnvelope(String),

    #[error("Unknown dnstap message type: {0}")]
    UnknownOperation(i32),

    #[error("Unknown socket family: {0}")]
    UnknownSocketFamily(i32),

    #[error("Unknown socket protocol: {0}")]
    UnknownSocketProtocol(i32),

    #[error("Invalid DNS payload: {0}")]
    InvalidDnsPayload(#[from] WireError),
}

impl DomainError {
    /// True for errors coming from the dnstap envelope rather than the DNS
    /// message it carries.
    pub fn is_envelope(&self) -> bool {
        !matches!(self, DomainError::InvalidDnsPayload(_))
    }
}
