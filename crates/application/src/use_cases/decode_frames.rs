use crate::ports::DnstapEventDecoder;
use crate::services::{correlation_key, CorrelationCache, FanoutDispatcher};
use bytes::Bytes;
use dnstap_collector_domain::{
    parse_header, parse_question, timestamp_from_parts, Direction, DnsObservation, DnstapEvent,
    DomainError, RecordType, ResponseCode,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

/// Result of decoding one frame.
#[derive(Debug)]
pub enum FrameOutcome {
    Emitted(DnsObservation),
    /// The frame is not a usable dnstap envelope.
    EnvelopeRejected(DomainError),
    /// The envelope decoded but its DNS message did not.
    PayloadRejected(DomainError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    pub frames: u64,
    pub emitted: u64,
    pub envelope_errors: u64,
    pub payload_errors: u64,
    pub latencies: u64,
}

/// The per-collector decoding loop: envelope, DNS header and question,
/// query/reply correlation, then fan-out.
pub struct DecodeFramesUseCase {
    decoder: Arc<dyn DnstapEventDecoder>,
    cache: CorrelationCache,
    dispatcher: FanoutDispatcher,
    stats: DecodeStats,
}

impl DecodeFramesUseCase {
    pub fn new(
        decoder: Arc<dyn DnstapEventDecoder>,
        dispatcher: FanoutDispatcher,
        correlation_ttl: Duration,
    ) -> Self {
        Self {
            decoder,
            cache: CorrelationCache::new(correlation_ttl),
            dispatcher,
            stats: DecodeStats::default(),
        }
    }

    pub fn stats(&self) -> DecodeStats {
        self.stats
    }

    pub fn pending_queries(&self) -> usize {
        self.cache.len()
    }

    pub fn process_frame(&mut self, frame: &Bytes) -> FrameOutcome {
        self.process_frame_at(frame, Instant::now())
    }

    /// Decodes and correlates one frame without dispatching it.
    pub fn process_frame_at(&mut self, frame: &Bytes, now: Instant) -> FrameOutcome {
        self.stats.frames += 1;

        let event = match self.decoder.decode(frame) {
            Ok(event) => event,
            Err(e) => {
                self.stats.envelope_errors += 1;
                trace!(error = %e, len = frame.len(), "Dropping undecodable dnstap frame");
                return FrameOutcome::EnvelopeRejected(e);
            }
        };

        let mut observation = match normalize(&event) {
            Ok(observation) => observation,
            Err(e) => {
                self.stats.payload_errors += 1;
                warn!(
                    error = %e,
                    operation = %event.operation,
                    "Dropping dnstap frame with invalid DNS payload"
                );
                return FrameOutcome::PayloadRejected(e);
            }
        };

        self.correlate(&mut observation, now);
        self.stats.emitted += 1;
        FrameOutcome::Emitted(observation)
    }

    /// Decodes one frame and hands the observation to every sink.
    pub async fn handle_frame(&mut self, frame: Bytes) {
        if let FrameOutcome::Emitted(observation) = self.process_frame(&frame) {
            self.dispatcher.dispatch(observation).await;
        }
    }

    /// Consumes frames until every producer has dropped its sender and the
    /// queue is empty.
    pub async fn run(mut self, mut frames: mpsc::Receiver<Bytes>) -> DecodeStats {
        debug!(sinks = ?self.dispatcher.sink_names(), "Decoder started");

        while let Some(frame) = frames.recv().await {
            self.handle_frame(frame).await;
        }

        let stats = self.stats;
        info!(
            frames = stats.frames,
            emitted = stats.emitted,
            envelope_errors = stats.envelope_errors,
            payload_errors = stats.payload_errors,
            latencies = stats.latencies,
            pending = self.cache.len(),
            "Decoder drained"
        );
        stats
    }

    fn correlate(&mut self, observation: &mut DnsObservation, now: Instant) {
        let (Some(ip), Some(port)) = (observation.query_ip, observation.query_port) else {
            return;
        };
        let key = correlation_key(ip, port, observation.transaction_id);

        match observation.direction {
            Direction::Query => self.cache.set_at(key, observation.timestamp, now),
            Direction::Reply => {
                if let Some(query_ts) = self.cache.get_and_remove_at(key, now) {
                    observation.latency_seconds = Some(observation.timestamp - query_ts);
                    self.stats.latencies += 1;
                }
            }
        }
    }
}

fn normalize(event: &DnstapEvent) -> Result<DnsObservation, DomainError> {
    let selected = event.selected_payload();
    let header = parse_header(&selected.message)?;

    let (question_name, question_type) = if header.qdcount > 0 {
        let question = parse_question(&selected.message)?;
        (
            Some(question.name),
            Some(RecordType::mnemonic(question.qtype)),
        )
    } else {
        (None, None)
    };

    Ok(DnsObservation {
        identity: event.identity_str(),
        operation: event.operation,
        family: event.family,
        transport_protocol: event.protocol,
        query_ip: event.query_ip(),
        query_port: event.query_port(),
        response_ip: event.response_ip(),
        response_port: event.response_port(),
        direction: selected.direction,
        time_seconds: selected.time_sec,
        time_nanoseconds: selected.time_nsec,
        timestamp: timestamp_from_parts(selected.time_sec, selected.time_nsec),
        payload_length: selected.message.len(),
        raw_payload: selected.message,
        transaction_id: header.id,
        response_code: ResponseCode::mnemonic(header.rcode),
        question_name,
        question_type,
        latency_seconds: None,
    })
}
