use serde::{Serialize, Serializer};
use std::fmt;

/// dnstap `Message.Type`. Discriminants follow dnstap.proto: odd codes are
/// the query side of a transaction, even codes the response side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum DnstapOperation {
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
}

impl DnstapOperation {
    pub const ALL: [DnstapOperation; 12] = [
        DnstapOperation::AuthQuery,
        DnstapOperation::AuthResponse,
        DnstapOperation::ResolverQuery,
        DnstapOperation::ResolverResponse,
        DnstapOperation::ClientQuery,
        DnstapOperation::ClientResponse,
        DnstapOperation::ForwarderQuery,
        DnstapOperation::ForwarderResponse,
        DnstapOperation::StubQuery,
        DnstapOperation::StubResponse,
        DnstapOperation::ToolQuery,
        DnstapOperation::ToolResponse,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(DnstapOperation::AuthQuery),
            2 => Some(DnstapOperation::AuthResponse),
            3 => Some(DnstapOperation::ResolverQuery),
            4 => Some(DnstapOperation::ResolverResponse),
            5 => Some(DnstapOperation::ClientQuery),
            6 => Some(DnstapOperation::ClientResponse),
            7 => Some(DnstapOperation::ForwarderQuery),
            8 => Some(DnstapOperation::ForwarderResponse),
            9 => Some(DnstapOperation::StubQuery),
            10 => Some(DnstapOperation::StubResponse),
            11 => Some(DnstapOperation::ToolQuery),
            12 => Some(DnstapOperation::ToolResponse),
            _ => None,
        }
    }

    /// Parity of the wire code decides the direction.
    pub fn direction(self) -> Direction {
        if self.code() % 2 == 1 {
            Direction::Query
        } else {
            Direction::Reply
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DnstapOperation::AuthQuery => "AUTH_QUERY",
            DnstapOperation::AuthResponse => "AUTH_RESPONSE",
            DnstapOperation::ResolverQuery => "RESOLVER_QUERY",
            DnstapOperation::ResolverResponse => "RESOLVER_RESPONSE",
            DnstapOperation::ClientQuery => "CLIENT_QUERY",
            DnstapOperation::ClientResponse => "CLIENT_RESPONSE",
            DnstapOperation::ForwarderQuery => "FORWARDER_QUERY",
            DnstapOperation::ForwarderResponse => "FORWARDER_RESPONSE",
            DnstapOperation::StubQuery => "STUB_QUERY",
            DnstapOperation::StubResponse => "STUB_RESPONSE",
            DnstapOperation::ToolQuery => "TOOL_QUERY",
            DnstapOperation::ToolResponse => "TOOL_RESPONSE",
        }
    }
}

impl fmt::Display for DnstapOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DnstapOperation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Query,
    Reply,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Query => "query",
            Direction::Reply => "reply",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SocketFamily {
    #[default]
    #[serde(rename = "INET")]
    Inet,
    #[serde(rename = "INET6")]
    Inet6,
}

impl SocketFamily {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(SocketFamily::Inet),
            2 => Some(SocketFamily::Inet6),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SocketFamily::Inet => "INET",
            SocketFamily::Inet6 => "INET6",
        }
    }
}

impl fmt::Display for SocketFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SocketProtocol {
    #[default]
    #[serde(rename = "UDP")]
    Udp,
    #[serde(rename = "TCP")]
    Tcp,
}

impl SocketProtocol {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(SocketProtocol::Udp),
            2 => Some(SocketProtocol::Tcp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SocketProtocol::Udp => "UDP",
            SocketProtocol::Tcp => "TCP",
        }
    }
}

impl fmt::Display for SocketProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
