#![allow(dead_code)]

use dnstap_collector_infrastructure::framestream::{
    read_frame, write_control_frame, write_data_frame, ControlFrame, ControlType, Frame,
    DNSTAP_CONTENT_TYPE,
};
use tokio::io::{AsyncRead, AsyncWrite};

/// Sender side of a bidirectional Frame Streams connection.
pub struct FrameStreamClient<S> {
    stream: S,
}

impl<S> FrameStreamClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// READY, expect ACCEPT, then START.
    pub async fn handshake(&mut self) {
        let ready = ControlFrame::new(ControlType::Ready).with_content_type(DNSTAP_CONTENT_TYPE);
        self.send_control(&ready).await;

        match self.next_frame().await {
            Some(Frame::Control(accept)) => {
                assert_eq!(accept.control_type, ControlType::Accept);
                assert!(accept.has_content_type(DNSTAP_CONTENT_TYPE));
            }
            other => panic!("expected ACCEPT, got {other:?}"),
        }

        let start = ControlFrame::new(ControlType::Start).with_content_type(DNSTAP_CONTENT_TYPE);
        self.send_control(&start).await;
    }

    pub async fn send_control(&mut self, frame: &ControlFrame) {
        write_control_frame(&mut self.stream, frame).await.unwrap();
    }

    pub async fn send_data(&mut self, payload: &[u8]) {
        write_data_frame(&mut self.stream, payload).await.unwrap();
    }

    /// STOP, then expect FINISH.
    pub async fn stop(&mut self) {
        self.send_control(&ControlFrame::new(ControlType::Stop)).await;
        match self.next_frame().await {
            Some(Frame::Control(finish)) => assert_eq!(finish.control_type, ControlType::Finish),
            other => panic!("expected FINISH, got {other:?}"),
        }
    }

    pub async fn next_frame(&mut self) -> Option<Frame> {
        read_frame(&mut self.stream, 1024 * 1024).await.unwrap()
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}
