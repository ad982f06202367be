//! Frame Streams (bidirectional) transport for dnstap senders.
mod codec;
mod control;
mod error;
mod session;
mod state;

pub use codec::{read_frame, write_control_frame, write_data_frame, Frame};
pub use control::{
    ControlFrame, ControlType, DNSTAP_CONTENT_TYPE, FIELD_CONTENT_TYPE, MAX_CONTENT_TYPE_LEN,
    MAX_CONTROL_FRAME_LEN,
};
pub use error::FrameStreamError;
pub use session::{FrameStreamSession, SessionEnd, SessionSummary};
pub use state::{SessionAction, SessionMachine, SessionState};
