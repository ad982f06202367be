use super::error::CollectorError;
use super::listener::{Connection, DnstapListener};
use crate::framestream::FrameStreamSession;
use bytes::Bytes;
use dnstap_collector_application::ports::DnstapEventDecoder;
use dnstap_collector_application::services::{FanoutDispatcher, SinkHandle};
use dnstap_collector_application::use_cases::{DecodeFramesUseCase, DecodeStats};
use dnstap_collector_domain::{CollectorConfig, ListenEndpoint};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};

/// Delays between consecutive failed accepts; the last one repeats.
const ACCEPT_BACKOFF_SCHEDULE: [Duration; 4] = [
    Duration::from_millis(5),
    Duration::from_millis(50),
    Duration::from_millis(250),
    Duration::from_secs(1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Done,
}

/// A dnstap listener with its decoder task and sinks.
///
/// `listen()` binds, `run()` serves until a [`CollectorStopHandle`] stops it,
/// then drains every queued frame before returning.
pub struct DnstapCollector {
    name: String,
    config: CollectorConfig,
    sinks: Vec<SinkHandle>,
    decoder: Arc<dyn DnstapEventDecoder>,
    listener: Option<DnstapListener>,
    shutdown: CancellationToken,
    phase_tx: watch::Sender<Phase>,
    span: Span,
}

/// Stops a running collector from another task.
#[derive(Clone)]
pub struct CollectorStopHandle {
    shutdown: CancellationToken,
    phase_rx: watch::Receiver<Phase>,
}

impl CollectorStopHandle {
    /// Cancels the accept loop and open sessions, then waits until the
    /// decoder has drained.
    ///
    /// Returns immediately when the collector is not running: `run()` was
    /// never called or the collector was dropped. A `run()` started later
    /// sees the cancellation and exits after draining.
    pub async fn stop(mut self) {
        self.shutdown.cancel();
        let _ = self
            .phase_rx
            .wait_for(|phase| *phase != Phase::Running)
            .await;
    }

    pub fn is_stopped(&self) -> bool {
        *self.phase_rx.borrow() == Phase::Done
    }
}

impl DnstapCollector {
    pub fn new(
        name: impl Into<String>,
        sinks: Vec<SinkHandle>,
        config: CollectorConfig,
        decoder: Arc<dyn DnstapEventDecoder>,
    ) -> Self {
        let name = name.into();
        let span = info_span!("collector", name = %name);
        let (phase_tx, _) = watch::channel(Phase::Idle);
        Self {
            name,
            config,
            sinks,
            decoder,
            listener: None,
            shutdown: CancellationToken::new(),
            phase_tx,
            span,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Binds the configured endpoint and returns the bound address.
    pub fn listen(&mut self) -> Result<ListenEndpoint, CollectorError> {
        let _enter = self.span.enter();
        self.config.validate()?;
        let endpoint = self.config.listen_endpoint()?;

        let listener = DnstapListener::bind(&endpoint)?;
        let bound = listener.local_endpoint().unwrap_or(endpoint);
        info!(endpoint = %bound, "Listening for dnstap senders");

        self.listener = Some(listener);
        Ok(bound)
    }

    pub fn local_endpoint(&self) -> Option<ListenEndpoint> {
        self.listener
            .as_ref()
            .and_then(|listener| listener.local_endpoint().ok())
    }

    pub fn stop_handle(&self) -> CollectorStopHandle {
        CollectorStopHandle {
            shutdown: self.shutdown.clone(),
            phase_rx: self.phase_tx.subscribe(),
        }
    }

    /// Serves until stopped. The collector counts as running from the moment
    /// this is called, so a stop issued before the returned future is first
    /// polled still waits for the drain.
    pub fn run(
        mut self,
    ) -> impl Future<Output = Result<DecodeStats, CollectorError>> + Send + 'static {
        let listener = self.listener.take();
        if listener.is_some() {
            self.phase_tx.send_replace(Phase::Running);
        }

        async move {
            let listener =
                listener.ok_or_else(|| CollectorError::NotListening(self.name.clone()))?;
            self.serve(listener).await
        }
    }

    async fn serve(mut self, listener: DnstapListener) -> Result<DecodeStats, CollectorError> {
        let span = self.span.clone();

        let (queue_tx, queue_rx) = mpsc::channel::<Bytes>(self.config.queue_capacity);
        let use_case = DecodeFramesUseCase::new(
            self.decoder.clone(),
            FanoutDispatcher::new(std::mem::take(&mut self.sinks)),
            self.config.correlation_ttl(),
        );
        let decoder_task = tokio::spawn(use_case.run(queue_rx).instrument(span.clone()));

        let mut sessions = JoinSet::new();
        self.accept_loop(&listener, &queue_tx, &mut sessions)
            .instrument(span.clone())
            .await;

        // Sessions see the cancelled token and drop their queue handles; the
        // decoder exits once the last one is gone and the queue is empty.
        drop(queue_tx);
        while let Some(joined) = sessions.join_next().await {
            if let Err(e) = joined {
                error!(parent: &span, error = %e, "Session task failed");
            }
        }
        listener.close();

        let stats = decoder_task.await.map_err(|e| {
            self.phase_tx.send_replace(Phase::Done);
            CollectorError::DecoderFailed(e.to_string())
        })?;

        info!(
            parent: &span,
            frames = stats.frames,
            emitted = stats.emitted,
            "Collector stopped"
        );
        self.phase_tx.send_replace(Phase::Done);
        Ok(stats)
    }

    async fn accept_loop(
        &self,
        listener: &DnstapListener,
        queue: &mpsc::Sender<Bytes>,
        sessions: &mut JoinSet<()>,
    ) {
        let mut failed_accepts = 0usize;
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                accepted = listener.accept() => match accepted {
                    Ok(connection) => {
                        failed_accepts = 0;
                        self.spawn_session(connection, queue.clone(), sessions);
                    }
                    Err(e) => {
                        // EMFILE and friends fail again at once; back off.
                        let delay = accept_backoff(failed_accepts);
                        failed_accepts += 1;
                        warn!(error = %e, retry_in = ?delay, "Failed to accept connection");
                        tokio::select! {
                            _ = self.shutdown.cancelled() => break,
                            _ = tokio::time::sleep(delay) => {}
                        }
                    }
                },
                Some(joined) = sessions.join_next(), if !sessions.is_empty() => {
                    if let Err(e) = joined {
                        error!(error = %e, "Session task failed");
                    }
                }
            }
        }
        debug!(open_sessions = sessions.len(), "Accept loop stopped");
    }

    fn spawn_session(
        &self,
        connection: Connection,
        queue: mpsc::Sender<Bytes>,
        sessions: &mut JoinSet<()>,
    ) {
        let peer = connection.peer();
        let shutdown = self.shutdown.child_token();
        let max_frame_size = self.config.max_frame_size;
        let span = info_span!(parent: &self.span, "session", peer = %peer);

        match connection {
            Connection::Tcp(stream, _) => {
                sessions.spawn(
                    serve_connection(stream, queue, shutdown, max_frame_size).instrument(span),
                );
            }
            #[cfg(unix)]
            Connection::Unix(stream) => {
                sessions.spawn(
                    serve_connection(stream, queue, shutdown, max_frame_size).instrument(span),
                );
            }
        }
    }
}

fn accept_backoff(failed_accepts: usize) -> Duration {
    ACCEPT_BACKOFF_SCHEDULE
        .get(failed_accepts)
        .copied()
        .unwrap_or(ACCEPT_BACKOFF_SCHEDULE[ACCEPT_BACKOFF_SCHEDULE.len() - 1])
}

async fn serve_connection<S>(
    stream: S,
    queue: mpsc::Sender<Bytes>,
    shutdown: CancellationToken,
    max_frame_size: usize,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    debug!("Sender connected");
    match FrameStreamSession::new(stream, max_frame_size)
        .run(queue, shutdown)
        .await
    {
        Ok(summary) => {
            debug!(frames = summary.frames, end = ?summary.end, "Sender disconnected");
        }
        Err(e) if e.is_handshake() => {
            warn!(error = %e, "Frame stream protocol error, closing connection");
        }
        Err(e) => {
            debug!(error = %e, "Sender connection closed with error");
        }
    }
}
