mod helpers;

use bytes::Bytes;
use dnstap_collector_application::services::{FanoutDispatcher, SinkHandle};
use dnstap_collector_application::use_cases::{DecodeFramesUseCase, FrameOutcome};
use dnstap_collector_domain::{Direction, DnsObservation, DnstapOperation, DomainError, SocketProtocol};
use helpers::{dns_header_only, dns_message, EventBuilder, MockEventDecoder};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const TTL: Duration = Duration::from_secs(10);

fn make_use_case(decoder: &MockEventDecoder) -> DecodeFramesUseCase {
    DecodeFramesUseCase::new(Arc::new(decoder.clone()), FanoutDispatcher::new(vec![]), TTL)
}

fn emitted(outcome: FrameOutcome) -> DnsObservation {
    match outcome {
        FrameOutcome::Emitted(observation) => observation,
        other => panic!("expected an observation, got {other:?}"),
    }
}

fn scenario_query(decoder: &MockEventDecoder) -> Bytes {
    decoder.register(
        EventBuilder::client_query()
            .identity("resolver-1")
            .query_endpoint("127.0.0.1", 5000)
            .response_endpoint("127.0.0.53", 53)
            .query_message(dns_message(42, 0, "example.com", 1), 1000, 0)
            .build(),
    )
}

fn scenario_reply(decoder: &MockEventDecoder) -> Bytes {
    decoder.register(
        EventBuilder::client_response()
            .identity("resolver-1")
            .query_endpoint("127.0.0.1", 5000)
            .response_endpoint("127.0.0.53", 53)
            .response_message(dns_message(42, 0, "example.com", 1), 1000, 500_000_000)
            .build(),
    )
}

// ── normalization ──────────────────────────────────────────────────────────

#[test]
fn test_query_observation_fields() {
    let decoder = MockEventDecoder::new();
    let frame = scenario_query(&decoder);
    let mut use_case = make_use_case(&decoder);

    let observation = emitted(use_case.process_frame(&frame));

    assert_eq!(observation.identity.as_deref(), Some("resolver-1"));
    assert_eq!(observation.operation, DnstapOperation::ClientQuery);
    assert_eq!(observation.direction, Direction::Query);
    assert_eq!(observation.query_ip, Some("127.0.0.1".parse().unwrap()));
    assert_eq!(observation.query_port, Some(5000));
    assert_eq!(observation.response_ip, Some("127.0.0.53".parse().unwrap()));
    assert_eq!(observation.response_port, Some(53));
    assert_eq!(observation.transport_protocol, SocketProtocol::Udp);
    assert_eq!(observation.time_seconds, 1000);
    assert_eq!(observation.timestamp, 1000.0);
    assert_eq!(observation.transaction_id, 42);
    assert_eq!(observation.response_code, "NOERROR");
    assert_eq!(observation.question_name.as_deref(), Some("example.com."));
    assert_eq!(observation.question_type.as_deref(), Some("A"));
    assert_eq!(observation.payload_length, observation.raw_payload.len());
    assert_eq!(observation.latency_seconds, None);
}

#[test]
fn test_reply_uses_response_side() {
    let decoder = MockEventDecoder::new();
    let frame = decoder.register(
        EventBuilder::new(DnstapOperation::ResolverResponse)
            .protocol(SocketProtocol::Tcp)
            .query_message(dns_message(1, 0, "query.example", 1), 1, 0)
            .response_message(dns_message(2, 3, "reply.example", 28), 2, 250_000_000)
            .build(),
    );
    let mut use_case = make_use_case(&decoder);

    let observation = emitted(use_case.process_frame(&frame));

    assert_eq!(observation.direction, Direction::Reply);
    assert_eq!(observation.transaction_id, 2);
    assert_eq!(observation.response_code, "NXDOMAIN");
    assert_eq!(observation.question_name.as_deref(), Some("reply.example."));
    assert_eq!(observation.question_type.as_deref(), Some("AAAA"));
    assert_eq!(observation.timestamp, 2.25);
    assert_eq!(observation.transport_protocol, SocketProtocol::Tcp);
}

#[test]
fn test_absent_endpoints_and_identity() {
    let decoder = MockEventDecoder::new();
    let frame = decoder.register(
        EventBuilder::client_query()
            .query_message(dns_message(9, 0, "example.org", 1), 1, 0)
            .build(),
    );
    let mut use_case = make_use_case(&decoder);

    let observation = emitted(use_case.process_frame(&frame));

    assert_eq!(observation.identity, None);
    assert_eq!(observation.query_ip, None);
    assert_eq!(observation.query_port, None);
    assert_eq!(observation.response_ip, None);
    assert_eq!(observation.response_port, None);
    assert_eq!(use_case.pending_queries(), 0);
}

#[test]
fn test_zero_questions_leaves_question_absent() {
    let decoder = MockEventDecoder::new();
    let frame = decoder.register(
        EventBuilder::client_query()
            .query_message(dns_header_only(77), 5, 0)
            .build(),
    );
    let mut use_case = make_use_case(&decoder);

    let observation = emitted(use_case.process_frame(&frame));

    assert_eq!(observation.transaction_id, 77);
    assert_eq!(observation.question_name, None);
    assert_eq!(observation.question_type, None);
}

// ── failures ───────────────────────────────────────────────────────────────

#[test]
fn test_envelope_failure_is_dropped() {
    let decoder = MockEventDecoder::new();
    let mut use_case = make_use_case(&decoder);

    let outcome = use_case.process_frame(&MockEventDecoder::garbage_frame());

    assert!(matches!(
        outcome,
        FrameOutcome::EnvelopeRejected(DomainError::InvalidEnvelope(_))
    ));
    assert_eq!(use_case.stats().envelope_errors, 1);
    assert_eq!(use_case.stats().emitted, 0);
}

#[test]
fn test_truncated_payload_is_dropped_and_decoding_continues() {
    let decoder = MockEventDecoder::new();
    let short = decoder.register(
        EventBuilder::client_query()
            .query_message(Bytes::from_static(&[0, 42, 0, 0, 0, 1]), 1, 0)
            .build(),
    );
    let good = scenario_query(&decoder);
    let mut use_case = make_use_case(&decoder);

    assert!(matches!(
        use_case.process_frame(&short),
        FrameOutcome::PayloadRejected(DomainError::InvalidDnsPayload(_))
    ));
    emitted(use_case.process_frame(&good));

    let stats = use_case.stats();
    assert_eq!(stats.frames, 2);
    assert_eq!(stats.payload_errors, 1);
    assert_eq!(stats.emitted, 1);
}

#[test]
fn test_malformed_question_is_dropped() {
    let decoder = MockEventDecoder::new();
    let mut message = dns_header_only(5).to_vec();
    message[5] = 1;
    message.extend_from_slice(&[0xC0, 0x0C, 0, 1]);
    let frame = decoder.register(
        EventBuilder::client_query()
            .query_message(Bytes::from(message), 1, 0)
            .build(),
    );
    let mut use_case = make_use_case(&decoder);

    assert!(matches!(
        use_case.process_frame(&frame),
        FrameOutcome::PayloadRejected(_)
    ));
}

// ── correlation ────────────────────────────────────────────────────────────

#[test]
fn test_query_then_reply_yields_latency() {
    let decoder = MockEventDecoder::new();
    let query = scenario_query(&decoder);
    let reply = scenario_reply(&decoder);
    let mut use_case = make_use_case(&decoder);

    let first = emitted(use_case.process_frame(&query));
    let second = emitted(use_case.process_frame(&reply));

    assert_eq!(first.latency_seconds, None);
    let latency = second.latency_seconds.unwrap();
    assert!((latency - 0.5).abs() < 1e-6);
    assert_eq!(second.question_name.as_deref(), Some("example.com."));
    assert_eq!(second.question_type.as_deref(), Some("A"));
    assert_eq!(use_case.stats().latencies, 1);
    assert_eq!(use_case.pending_queries(), 0);
}

#[test]
fn test_duplicate_reply_has_no_latency() {
    let decoder = MockEventDecoder::new();
    let query = scenario_query(&decoder);
    let reply = scenario_reply(&decoder);
    let mut use_case = make_use_case(&decoder);

    use_case.process_frame(&query);
    assert!(emitted(use_case.process_frame(&reply)).latency_seconds.is_some());
    assert_eq!(emitted(use_case.process_frame(&reply)).latency_seconds, None);
}

#[test]
fn test_reply_without_query_has_no_latency() {
    let decoder = MockEventDecoder::new();
    let reply = scenario_reply(&decoder);
    let mut use_case = make_use_case(&decoder);

    assert_eq!(emitted(use_case.process_frame(&reply)).latency_seconds, None);
}

#[test]
fn test_reply_after_ttl_has_no_latency() {
    let decoder = MockEventDecoder::new();
    let query = scenario_query(&decoder);
    let reply = scenario_reply(&decoder);
    let mut use_case = make_use_case(&decoder);
    let start = Instant::now();

    use_case.process_frame_at(&query, start);
    let observation = emitted(use_case.process_frame_at(&reply, start + TTL));

    assert_eq!(observation.latency_seconds, None);
}

#[test]
fn test_reply_to_other_client_does_not_match() {
    let decoder = MockEventDecoder::new();
    let query = scenario_query(&decoder);
    let other_port = decoder.register(
        EventBuilder::client_response()
            .query_endpoint("127.0.0.1", 5001)
            .response_message(dns_message(42, 0, "example.com", 1), 1000, 500_000_000)
            .build(),
    );
    let mut use_case = make_use_case(&decoder);

    use_case.process_frame(&query);
    assert_eq!(emitted(use_case.process_frame(&other_port)).latency_seconds, None);
    assert_eq!(use_case.pending_queries(), 1);
}

#[test]
fn test_repeated_query_last_one_wins() {
    let decoder = MockEventDecoder::new();
    let early = scenario_query(&decoder);
    let late = decoder.register(
        EventBuilder::client_query()
            .query_endpoint("127.0.0.1", 5000)
            .query_message(dns_message(42, 0, "example.com", 1), 1000, 400_000_000)
            .build(),
    );
    let reply = scenario_reply(&decoder);
    let mut use_case = make_use_case(&decoder);

    use_case.process_frame(&early);
    use_case.process_frame(&late);
    let latency = emitted(use_case.process_frame(&reply)).latency_seconds.unwrap();

    assert!((latency - 0.1).abs() < 1e-6);
}

// ── run loop ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_run_drains_queue_before_returning() {
    let decoder = MockEventDecoder::new();
    let (sink, mut sink_rx) = SinkHandle::channel("test", 64);
    let use_case = DecodeFramesUseCase::new(
        Arc::new(decoder.clone()),
        FanoutDispatcher::new(vec![sink]),
        TTL,
    );

    let (tx, rx) = mpsc::channel(16);
    tx.send(scenario_query(&decoder)).await.unwrap();
    tx.send(MockEventDecoder::garbage_frame()).await.unwrap();
    tx.send(scenario_reply(&decoder)).await.unwrap();
    drop(tx);

    let stats = use_case.run(rx).await;

    assert_eq!(stats.frames, 3);
    assert_eq!(stats.emitted, 2);
    assert_eq!(stats.envelope_errors, 1);
    assert_eq!(stats.latencies, 1);

    let first = sink_rx.recv().await.unwrap();
    let second = sink_rx.recv().await.unwrap();
    assert_eq!(first.direction, Direction::Query);
    assert_eq!(second.direction, Direction::Reply);
    assert!(second.latency_seconds.is_some());
    assert!(sink_rx.recv().await.is_none());
}

#[tokio::test]
async fn test_run_feeds_every_sink_identically() {
    let decoder = MockEventDecoder::new();
    let (a, mut a_rx) = SinkHandle::channel("a", 8);
    let (b, mut b_rx) = SinkHandle::channel("b", 8);
    let use_case = DecodeFramesUseCase::new(
        Arc::new(decoder.clone()),
        FanoutDispatcher::new(vec![a, b]),
        TTL,
    );

    let (tx, rx) = mpsc::channel(4);
    let producer = {
        let decoder = decoder.clone();
        tokio::spawn(async move {
            for id in 0..20u16 {
                let frame = decoder.register(
                    EventBuilder::client_query()
                        .query_message(dns_message(id, 0, "example.net", 1), id as u64, 0)
                        .build(),
                );
                tx.send(frame).await.unwrap();
            }
        })
    };

    let consumer = tokio::spawn(async move {
        let mut seen = Vec::new();
        while let Some(observation) = a_rx.recv().await {
            let other = b_rx.recv().await.unwrap();
            assert_eq!(other.transaction_id, observation.transaction_id);
            seen.push(observation.transaction_id);
        }
        seen
    });

    let stats = use_case.run(rx).await;
    producer.await.unwrap();

    assert_eq!(stats.emitted, 20);
    assert_eq!(consumer.await.unwrap(), (0..20).collect::<Vec<u16>>());
}
