#![allow(dead_code)]

use bytes::Bytes;
use dnstap_collector_domain::{DnstapEvent, DnstapOperation, SocketProtocol};
use std::net::IpAddr;

/// Raw DNS message with one question.
pub fn dns_message(id: u16, rcode: u8, name: &str, qtype: u16) -> Bytes {
    let mut buf = Vec::with_capacity(64);
    buf.extend_from_slice(&id.to_be_bytes());
    buf.push(0x81);
    buf.push(0x80 | (rcode & 0x0F));
    buf.extend_from_slice(&1u16.to_be_bytes());
    buf.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
    for label in name.trim_end_matches('.').split('.').filter(|l| !l.is_empty()) {
        buf.push(label.len() as u8);
        buf.extend_from_slice(label.as_bytes());
    }
    buf.push(0);
    buf.extend_from_slice(&qtype.to_be_bytes());
    buf.extend_from_slice(&1u16.to_be_bytes());
    Bytes::from(buf)
}

/// Header-only DNS message (question count 0).
pub fn dns_header_only(id: u16) -> Bytes {
    let mut buf = vec![0u8; 12];
    buf[..2].copy_from_slice(&id.to_be_bytes());
    Bytes::from(buf)
}

pub struct EventBuilder {
    event: DnstapEvent,
}

impl EventBuilder {
    pub fn new(operation: DnstapOperation) -> Self {
        Self {
            event: DnstapEvent::new(operation),
        }
    }

    pub fn client_query() -> Self {
        Self::new(DnstapOperation::ClientQuery)
    }

    pub fn client_response() -> Self {
        Self::new(DnstapOperation::ClientResponse)
    }

    pub fn identity(mut self, identity: &str) -> Self {
        self.event.identity = Some(Bytes::copy_from_slice(identity.as_bytes()));
        self
    }

    pub fn query_endpoint(mut self, ip: &str, port: u32) -> Self {
        let ip: IpAddr = ip.parse().unwrap();
        self.event.query_address = match ip {
            IpAddr::V4(v4) => Bytes::copy_from_slice(&v4.octets()),
            IpAddr::V6(v6) => Bytes::copy_from_slice(&v6.octets()),
        };
        self.event.query_port = port;
        self
    }

    pub fn response_endpoint(mut self, ip: &str, port: u32) -> Self {
        let ip: IpAddr = ip.parse().unwrap();
        self.event.response_address = match ip {
            IpAddr::V4(v4) => Bytes::copy_from_slice(&v4.octets()),
            IpAddr::V6(v6) => Bytes::copy_from_slice(&v6.octets()),
        };
        self.event.response_port = port;
        self
    }

    pub fn protocol(mut self, protocol: SocketProtocol) -> Self {
        self.event.protocol = protocol;
        self
    }

    pub fn query_message(mut self, message: Bytes, sec: u64, nsec: u32) -> Self {
        self.event.query_message = message;
        self.event.query_time_sec = sec;
        self.event.query_time_nsec = nsec;
        self
    }

    pub fn response_message(mut self, message: Bytes, sec: u64, nsec: u32) -> Self {
        self.event.response_message = message;
        self.event.response_time_sec = sec;
        self.event.response_time_nsec = nsec;
        self
    }

    pub fn build(self) -> DnstapEvent {
        self.event
    }
}
