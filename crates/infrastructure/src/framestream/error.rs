use super::state::SessionState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameStreamError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Control frame of {0} bytes exceeds the 512 byte limit")]
    ControlFrameTooLarge(usize),

    #[error("Content type field of {0} bytes exceeds the 256 byte limit")]
    ContentTypeTooLarge(usize),

    #[error("Malformed control frame: {0}")]
    MalformedControl(&'static str),

    #[error("Unknown control type {0}")]
    UnknownControlType(u32),

    #[error("Data frame of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge { len: usize, max: usize },

    #[error("Unexpected {frame} frame while {state}")]
    UnexpectedFrame {
        state: SessionState,
        frame: &'static str,
    },

    #[error("Peer does not offer content type protobuf:dnstap.Dnstap")]
    ContentTypeMismatch,

    #[error("Connection closed while {0}")]
    UnexpectedEof(SessionState),

    #[error("Frame queue closed")]
    QueueClosed,
}

impl FrameStreamError {
    /// True when the peer broke the Frame Streams protocol, as opposed to
    /// an I/O failure or local shutdown.
    pub fn is_handshake(&self) -> bool {
        !matches!(self, FrameStreamError::Io(_) | FrameStreamError::QueueClosed)
    }
}
