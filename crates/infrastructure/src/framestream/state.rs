use super::codec::Frame;
use super::control::{ControlFrame, ControlType, DNSTAP_CONTENT_TYPE};
use super::error::FrameStreamError;
use bytes::Bytes;
use std::fmt;

/// Receiver-side handshake state of a bidirectional Frame Streams session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingReady,
    AwaitingStart,
    Receiving,
    Finished,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::AwaitingReady => "awaiting READY",
            SessionState::AwaitingStart => "awaiting START",
            SessionState::Receiving => "receiving",
            SessionState::Finished => "finished",
        };
        f.write_str(s)
    }
}

/// What the session must do after a frame was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    Reply(ControlFrame),
    Deliver(Bytes),
    /// Reply with FINISH and close.
    Finish(ControlFrame),
    Nothing,
}

/// Pure transition function; the session owns the I/O.
#[derive(Debug)]
pub struct SessionMachine {
    state: SessionState,
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionMachine {
    pub fn new() -> Self {
        Self {
            state: SessionState::AwaitingReady,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn on_frame(&mut self, frame: Frame) -> Result<SessionAction, FrameStreamError> {
        let action = match (self.state, frame) {
            (SessionState::AwaitingReady, Frame::Control(control))
                if control.control_type == ControlType::Ready =>
            {
                if !control.has_content_type(DNSTAP_CONTENT_TYPE) {
                    return Err(FrameStreamError::ContentTypeMismatch);
                }
                self.state = SessionState::AwaitingStart;
                SessionAction::Reply(ControlFrame::accept_dnstap())
            }
            (SessionState::AwaitingStart, Frame::Control(control))
                if control.control_type == ControlType::Start =>
            {
                if !control.content_types.is_empty()
                    && !control.has_content_type(DNSTAP_CONTENT_TYPE)
                {
                    return Err(FrameStreamError::ContentTypeMismatch);
                }
                self.state = SessionState::Receiving;
                SessionAction::Nothing
            }
            (SessionState::Receiving, Frame::Data(payload)) => SessionAction::Deliver(payload),
            (SessionState::Receiving, Frame::Control(control))
                if control.control_type == ControlType::Stop =>
            {
                self.state = SessionState::Finished;
                SessionAction::Finish(ControlFrame::new(ControlType::Finish))
            }
            (state, frame) => {
                return Err(FrameStreamError::UnexpectedFrame {
                    state,
                    frame: frame.kind(),
                })
            }
        };
        Ok(action)
    }

    /// Peer closed the connection. Only an established stream may end that
    /// way.
    pub fn on_eof(&mut self) -> Result<(), FrameStreamError> {
        match self.state {
            SessionState::Receiving | SessionState::Finished => {
                self.state = SessionState::Finished;
                Ok(())
            }
            state => Err(FrameStreamError::UnexpectedEof(state)),
        }
    }
}
