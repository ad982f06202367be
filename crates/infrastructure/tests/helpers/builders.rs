#![allow(dead_code)]

use bytes::Bytes;
use dnstap_collector_infrastructure::dnstap::proto;
use prost::Message as _;
use std::net::IpAddr;

/// Raw DNS message with one question.
pub fn dns_message(id: u16, name: &str, qtype: u16) -> Vec<u8> {
    let mut buf = Vec::with_capacity(64);
    buf.extend_from_slice(&id.to_be_bytes());
    buf.extend_from_slice(&[0x01, 0x00]);
    buf.extend_from_slice(&1u16.to_be_bytes());
    buf.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
    for label in name.trim_end_matches('.').split('.').filter(|l| !l.is_empty()) {
        buf.push(label.len() as u8);
        buf.extend_from_slice(label.as_bytes());
    }
    buf.push(0);
    buf.extend_from_slice(&qtype.to_be_bytes());
    buf.extend_from_slice(&1u16.to_be_bytes());
    buf
}

fn ip_bytes(ip: &str) -> Bytes {
    match ip.parse::<IpAddr>().unwrap() {
        IpAddr::V4(v4) => Bytes::copy_from_slice(&v4.octets()),
        IpAddr::V6(v6) => Bytes::copy_from_slice(&v6.octets()),
    }
}

/// Builds encoded `Dnstap` envelopes.
pub struct DnstapBuilder {
    envelope: proto::Dnstap,
}

impl DnstapBuilder {
    pub fn new(message_type: proto::MessageType) -> Self {
        Self {
            envelope: proto::Dnstap {
                identity: None,
                version: Some(Bytes::from_static(b"test")),
                extra: None,
                message: Some(proto::Message {
                    r#type: message_type as i32,
                    socket_family: Some(proto::SocketFamily::Inet as i32),
                    socket_protocol: Some(proto::SocketProtocol::Udp as i32),
                    query_address: None,
                    response_address: None,
                    query_port: None,
                    response_port: None,
                    query_time_sec: None,
                    query_time_nsec: None,
                    query_message: None,
                    query_zone: None,
                    response_time_sec: None,
                    response_time_nsec: None,
                    response_message: None,
                }),
                r#type: proto::DnstapType::Message as i32,
            },
        }
    }

    pub fn client_query() -> Self {
        Self::new(proto::MessageType::ClientQuery)
    }

    pub fn client_response() -> Self {
        Self::new(proto::MessageType::ClientResponse)
    }

    fn message(&mut self) -> &mut proto::Message {
        self.envelope.message.get_or_insert_with(Default::default)
    }

    pub fn identity(mut self, identity: &str) -> Self {
        self.envelope.identity = Some(Bytes::copy_from_slice(identity.as_bytes()));
        self
    }

    pub fn envelope_type(mut self, value: i32) -> Self {
        self.envelope.r#type = value;
        self
    }

    pub fn message_type(mut self, value: i32) -> Self {
        self.message().r#type = value;
        self
    }

    pub fn without_message(mut self) -> Self {
        self.envelope.message = None;
        self
    }

    pub fn socket_family(mut self, value: Option<i32>) -> Self {
        self.message().socket_family = value;
        self
    }

    pub fn socket_protocol(mut self, value: Option<i32>) -> Self {
        self.message().socket_protocol = value;
        self
    }

    pub fn query_endpoint(mut self, ip: &str, port: u32) -> Self {
        let message = self.message();
        message.query_address = Some(ip_bytes(ip));
        message.query_port = Some(port);
        self
    }

    pub fn response_endpoint(mut self, ip: &str, port: u32) -> Self {
        let message = self.message();
        message.response_address = Some(ip_bytes(ip));
        message.response_port = Some(port);
        self
    }

    pub fn query_message(mut self, payload: Vec<u8>, sec: u64, nsec: u32) -> Self {
        let message = self.message();
        message.query_message = Some(Bytes::from(payload));
        message.query_time_sec = Some(sec);
        message.query_time_nsec = Some(nsec);
        self
    }

    pub fn response_message(mut self, payload: Vec<u8>, sec: u64, nsec: u32) -> Self {
        let message = self.message();
        message.response_message = Some(Bytes::from(payload));
        message.response_time_sec = Some(sec);
        message.response_time_nsec = Some(nsec);
        self
    }

    pub fn build(self) -> proto::Dnstap {
        self.envelope
    }

    pub fn encode(self) -> Bytes {
        Bytes::from(self.envelope.encode_to_vec())
    }
}
