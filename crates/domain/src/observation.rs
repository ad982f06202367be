use crate::dnstap_operation::{Direction, DnstapOperation, SocketFamily, SocketProtocol};
use bytes::Bytes;
use serde::Serialize;
use std::borrow::Cow;
use std::net::IpAddr;

/// One normalized dnstap event, ready for sinks.
#[derive(Debug, Clone, Serialize)]
pub struct DnsObservation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    pub operation: DnstapOperation,
    pub family: SocketFamily,
    pub transport_protocol: SocketProtocol,
    pub query_ip: Option<IpAddr>,
    pub query_port: Option<u16>,
    pub response_ip: Option<IpAddr>,
    pub response_port: Option<u16>,
    pub direction: Direction,
    pub time_seconds: u64,
    pub time_nanoseconds: u32,
    pub timestamp: f64,
    #[serde(skip)]
    pub raw_payload: Bytes,
    pub payload_length: usize,
    pub transaction_id: u16,
    pub response_code: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_type: Option<Cow<'static, str>>,
    pub latency_seconds: Option<f64>,
}

impl DnsObservation {
    pub fn is_query(&self) -> bool {
        self.direction == Direction::Query
    }

    pub fn is_reply(&self) -> bool {
        self.direction == Direction::Reply
    }
}

/// Seconds plus nanoseconds as fractional seconds.
pub fn timestamp_from_parts(seconds: u64, nanoseconds: u32) -> f64 {
    seconds as f64 + nanoseconds as f64 / 1e9
}
