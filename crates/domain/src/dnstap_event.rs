use crate::dnstap_operation::{Direction, DnstapOperation, SocketFamily, SocketProtocol};
use bytes::Bytes;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// A decoded dnstap envelope, before normalization.
///
/// Addresses and ports are kept as they arrived on the wire; the accessors
/// below apply the "absent" rules (empty address, zero port).
#[derive(Debug, Clone, PartialEq)]
pub struct DnstapEvent {
    pub identity: Option<Bytes>,
    pub operation: DnstapOperation,
    pub family: SocketFamily,
    pub protocol: SocketProtocol,
    pub query_address: Bytes,
    pub query_port: u32,
    pub response_address: Bytes,
    pub response_port: u32,
    pub query_message: Bytes,
    pub query_time_sec: u64,
    pub query_time_nsec: u32,
    pub response_message: Bytes,
    pub response_time_sec: u64,
    pub response_time_nsec: u32,
}

/// The DNS message and clock chosen by the operation's parity.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedPayload {
    pub direction: Direction,
    pub message: Bytes,
    pub time_sec: u64,
    pub time_nsec: u32,
}

impl DnstapEvent {
    pub fn new(operation: DnstapOperation) -> Self {
        Self {
            identity: None,
            operation,
            family: SocketFamily::default(),
            protocol: SocketProtocol::default(),
            query_address: Bytes::new(),
            query_port: 0,
            response_address: Bytes::new(),
            response_port: 0,
            query_message: Bytes::new(),
            query_time_sec: 0,
            query_time_nsec: 0,
            response_message: Bytes::new(),
            response_time_sec: 0,
            response_time_nsec: 0,
        }
    }

    pub fn identity_str(&self) -> Option<String> {
        self.identity
            .as_ref()
            .filter(|id| !id.is_empty())
            .map(|id| String::from_utf8_lossy(id).into_owned())
    }

    pub fn query_ip(&self) -> Option<IpAddr> {
        ip_from_bytes(&self.query_address)
    }

    pub fn query_port(&self) -> Option<u16> {
        port_from_wire(self.query_port)
    }

    pub fn response_ip(&self) -> Option<IpAddr> {
        ip_from_bytes(&self.response_address)
    }

    pub fn response_port(&self) -> Option<u16> {
        port_from_wire(self.response_port)
    }

    /// Odd operation codes select the query message and query clock, even
    /// codes the response message and response clock.
    pub fn selected_payload(&self) -> SelectedPayload {
        match self.operation.direction() {
            Direction::Query => SelectedPayload {
                direction: Direction::Query,
                message: self.query_message.clone(),
                time_sec: self.query_time_sec,
                time_nsec: self.query_time_nsec,
            },
            Direction::Reply => SelectedPayload {
                direction: Direction::Reply,
                message: self.response_message.clone(),
                time_sec: self.response_time_sec,
                time_nsec: self.response_time_nsec,
            },
        }
    }
}

fn ip_from_bytes(raw: &[u8]) -> Option<IpAddr> {
    match raw.len() {
        4 => {
            let octets: [u8; 4] = raw.try_into().ok()?;
            Some(IpAddr::V4(Ipv4Addr::from(octets)))
        }
        16 => {
            let octets: [u8; 16] = raw.try_into().ok()?;
            Some(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        _ => None,
    }
}

fn port_from_wire(port: u32) -> Option<u16> {
    match u16::try_from(port) {
        Ok(0) | Err(_) => None,
        Ok(p) => Some(p),
    }
}
