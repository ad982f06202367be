//! dnstap collector domain layer
pub mod config;
pub mod dns_record;
pub mod dns_wire;
pub mod dnstap_event;
pub mod dnstap_operation;
pub mod errors;
pub mod observation;

pub use config::{
    CliOverrides, CollectorConfig, Config, ConfigError, ListenEndpoint, LoggingConfig,
    OutputConfig, OutputFormat, TransportKind,
};
pub use dns_record::{RecordType, ResponseCode};
pub use dns_wire::{parse_header, parse_question, DnsHeader, DnsQuestion};
pub use dnstap_event::{DnstapEvent, SelectedPayload};
pub use dnstap_operation::{Direction, DnstapOperation, SocketFamily, SocketProtocol};
pub use errors::{DomainError, WireError};
pub use observation::{timestamp_from_parts, DnsObservation};
