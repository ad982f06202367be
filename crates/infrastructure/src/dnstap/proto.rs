//! dnstap.proto messages, declared by hand with `prost` derives.
//!
//! dnstap.proto is proto2. Fields this collector never reads (policy, HTTP
//! protocol) are left out and skipped by the decoder as unknown fields.

use prost::bytes::Bytes;

/// Top-level dnstap envelope.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Dnstap {
    #[prost(bytes = "bytes", optional, tag = "1")]
    pub identity: Option<Bytes>,

    #[prost(bytes = "bytes", optional, tag = "2")]
    pub version: Option<Bytes>,

    #[prost(bytes = "bytes", optional, tag = "3")]
    pub extra: Option<Bytes>,

    #[prost(message, optional, tag = "14")]
    pub message: Option<Message>,

    #[prost(enumeration = "DnstapType", required, tag = "15")]
    pub r#type: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum DnstapType {
    Message = 1,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Message {
    #[prost(enumeration = "MessageType", required, tag = "1")]
    pub r#type: i32,

    #[prost(enumeration = "SocketFamily", optional, tag = "2")]
    pub socket_family: Option<i32>,

    #[prost(enumeration = "SocketProtocol", optional, tag = "3")]
    pub socket_protocol: Option<i32>,

    #[prost(bytes = "bytes", optional, tag = "4")]
    pub query_address: Option<Bytes>,

    #[prost(bytes = "bytes", optional, tag = "5")]
    pub response_address: Option<Bytes>,

    #[prost(uint32, optional, tag = "6")]
    pub query_port: Option<u32>,

    #[prost(uint32, optional, tag = "7")]
    pub response_port: Option<u32>,

    #[prost(uint64, optional, tag = "8")]
    pub query_time_sec: Option<u64>,

    #[prost(fixed32, optional, tag = "9")]
    pub query_time_nsec: Option<u32>,

    #[prost(bytes = "bytes", optional, tag = "10")]
    pub query_message: Option<Bytes>,

    #[prost(bytes = "bytes", optional, tag = "11")]
    pub query_zone: Option<Bytes>,

    #[prost(uint64, optional, tag = "12")]
    pub response_time_sec: Option<u64>,

    #[prost(fixed32, optional, tag = "13")]
    pub response_time_nsec: Option<u32>,

    #[prost(bytes = "bytes", optional, tag = "14")]
    pub response_message: Option<Bytes>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum MessageType {
    AuthQuery = 1,
    AuthResponse = 2,
    ResolverQuery = 3,
    ResolverResponse = 4,
    ClientQuery = 5,
    ClientResponse = 6,
    ForwarderQuery = 7,
    ForwarderResponse = 8,
    StubQuery = 9,
    StubResponse = 10,
    ToolQuery = 11,
    ToolResponse = 12,
    UpdateQuery = 13,
    UpdateResponse = 14,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum SocketFamily {
    Inet = 1,
    Inet6 = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum SocketProtocol {
    Udp = 1,
    Tcp = 2,
    Dot = 3,
    Doh = 4,
    DnsCryptUdp = 5,
    DnsCryptTcp = 6,
    Doq = 7,
}
