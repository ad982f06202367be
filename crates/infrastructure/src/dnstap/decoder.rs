use super::proto;
use bytes::Bytes;
use dnstap_collector_application::ports::DnstapEventDecoder;
use dnstap_collector_domain::{
    DnstapEvent, DnstapOperation, DomainError, SocketFamily, SocketProtocol,
};
use prost::Message as _;

/// Decodes Frame Streams payloads as `protobuf:dnstap.Dnstap`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufEventDecoder;

impl ProtobufEventDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl DnstapEventDecoder for ProtobufEventDecoder {
    fn decode(&self, frame: &Bytes) -> Result<DnstapEvent, DomainError> {
        let envelope = proto::Dnstap::decode(frame.clone())
            .map_err(|e| DomainError::InvalidEnvelope(e.to_string()))?;

        if envelope.r#type != proto::DnstapType::Message as i32 {
            return Err(DomainError::InvalidEnvelope(format!(
                "unsupported dnstap type {}",
                envelope.r#type
            )));
        }

        let message = envelope
            .message
            .ok_or_else(|| DomainError::InvalidEnvelope("missing message".to_string()))?;

        let operation = DnstapOperation::from_code(message.r#type)
            .ok_or(DomainError::UnknownOperation(message.r#type))?;

        let family = match message.socket_family {
            None => SocketFamily::default(),
            Some(code) => {
                SocketFamily::from_code(code).ok_or(DomainError::UnknownSocketFamily(code))?
            }
        };

        let protocol = match message.socket_protocol {
            None => SocketProtocol::default(),
            Some(code) => {
                SocketProtocol::from_code(code).ok_or(DomainError::UnknownSocketProtocol(code))?
            }
        };

        Ok(DnstapEvent {
            identity: envelope.identity,
            operation,
            family,
            protocol,
            query_address: message.query_address.unwrap_or_default(),
            query_port: message.query_port.unwrap_or_default(),
            response_address: message.response_address.unwrap_or_default(),
            response_port: message.response_port.unwrap_or_default(),
            query_message: message.query_message.unwrap_or_default(),
            query_time_sec: message.query_time_sec.unwrap_or_default(),
            query_time_nsec: message.query_time_nsec.unwrap_or_default(),
            response_message: message.response_message.unwrap_or_default(),
            response_time_sec: message.response_time_sec.unwrap_or_default(),
            response_time_nsec: message.response_time_nsec.unwrap_or_default(),
        })
    }
}
