use super::codec::{read_frame, write_control_frame};
use super::error::FrameStreamError;
use super::state::{SessionAction, SessionMachine};
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite, BufStream};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// STOP received and FINISH sent.
    Stopped,
    /// Peer closed the connection after START without sending STOP.
    PeerClosed,
    /// The collector is shutting down.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub end: SessionEnd,
    pub frames: u64,
}

/// One accepted dnstap sender.
///
/// Data payloads go onto the shared frame queue unmodified. A full queue
/// stalls this session's reads, which pushes back on the sender.
///
/// Shutdown only interrupts reading. A payload that was already read is
/// always handed to the queue, so a graceful stop loses no frames.
pub struct FrameStreamSession<S> {
    stream: BufStream<S>,
    machine: SessionMachine,
    max_frame_size: usize,
    frames: u64,
}

impl<S> FrameStreamSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, max_frame_size: usize) -> Self {
        Self {
            stream: BufStream::new(stream),
            machine: SessionMachine::new(),
            max_frame_size,
            frames: 0,
        }
    }

    pub async fn run(
        mut self,
        queue: mpsc::Sender<Bytes>,
        shutdown: CancellationToken,
    ) -> Result<SessionSummary, FrameStreamError> {
        loop {
            let next = tokio::select! {
                biased;
                _ = shutdown.cancelled() => None,
                next = read_frame(&mut self.stream, self.max_frame_size) => Some(next?),
            };

            let Some(next) = next else {
                return Ok(self.summary(SessionEnd::Cancelled));
            };

            let Some(frame) = next else {
                self.machine.on_eof()?;
                return Ok(self.summary(SessionEnd::PeerClosed));
            };

            trace!(frame = frame.kind(), state = %self.machine.state(), "Frame received");

            match self.machine.on_frame(frame)? {
                SessionAction::Reply(control) => {
                    write_control_frame(&mut self.stream, &control).await?;
                    debug!(reply = %control.control_type, "Handshake step completed");
                }
                SessionAction::Deliver(payload) => {
                    // Not raced against shutdown: the decoder keeps draining
                    // until every session has returned, so this completes.
                    queue
                        .send(payload)
                        .await
                        .map_err(|_| FrameStreamError::QueueClosed)?;
                    self.frames += 1;
                }
                SessionAction::Finish(control) => {
                    write_control_frame(&mut self.stream, &control).await?;
                    return Ok(self.summary(SessionEnd::Stopped));
                }
                SessionAction::Nothing => {
                    debug!(state = %self.machine.state(), "Frame stream started");
                }
            }
        }
    }

    fn summary(&self, end: SessionEnd) -> SessionSummary {
        SessionSummary {
            end,
            frames: self.frames,
        }
    }
}
