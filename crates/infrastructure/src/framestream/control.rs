use super::error::FrameStreamError;
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

pub const DNSTAP_CONTENT_TYPE: &[u8] = b"protobuf:dnstap.Dnstap";
pub const FIELD_CONTENT_TYPE: u32 = 1;
pub const MAX_CONTROL_FRAME_LEN: usize = 512;
pub const MAX_CONTENT_TYPE_LEN: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ControlType {
    Accept = 1,
    Start = 2,
    Stop = 3,
    Ready = 4,
    Finish = 5,
}

impl ControlType {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(ControlType::Accept),
            2 => Some(ControlType::Start),
            3 => Some(ControlType::Stop),
            4 => Some(ControlType::Ready),
            5 => Some(ControlType::Finish),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlType::Accept => "ACCEPT",
            ControlType::Start => "START",
            ControlType::Stop => "STOP",
            ControlType::Ready => "READY",
            ControlType::Finish => "FINISH",
        }
    }

    fn allows_content_type(&self) -> bool {
        matches!(
            self,
            ControlType::Accept | ControlType::Start | ControlType::Ready
        )
    }
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded control frame: its type and any content type fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlFrame {
    pub control_type: ControlType,
    pub content_types: Vec<Bytes>,
}

impl ControlFrame {
    pub fn new(control_type: ControlType) -> Self {
        Self {
            control_type,
            content_types: Vec::new(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<Bytes>) -> Self {
        self.content_types.push(content_type.into());
        self
    }

    pub fn accept_dnstap() -> Self {
        Self::new(ControlType::Accept).with_content_type(Bytes::from_static(DNSTAP_CONTENT_TYPE))
    }

    pub fn has_content_type(&self, content_type: &[u8]) -> bool {
        self.content_types.iter().any(|ct| ct.as_ref() == content_type)
    }

    /// Parses a control payload: the bytes after the escape and length words.
    pub fn decode(payload: &[u8]) -> Result<Self, FrameStreamError> {
        if payload.len() > MAX_CONTROL_FRAME_LEN {
            return Err(FrameStreamError::ControlFrameTooLarge(payload.len()));
        }
        let Some((type_bytes, mut rest)) = payload.split_first_chunk::<4>() else {
            return Err(FrameStreamError::MalformedControl("missing control type"));
        };

        let raw_type = u32::from_be_bytes(*type_bytes);
        let control_type =
            ControlType::from_u32(raw_type).ok_or(FrameStreamError::UnknownControlType(raw_type))?;
        let mut frame = Self::new(control_type);

        while !rest.is_empty() {
            let Some((field_type, after_type)) = rest.split_first_chunk::<4>() else {
                return Err(FrameStreamError::MalformedControl("truncated field type"));
            };
            let Some((field_len, after_len)) = after_type.split_first_chunk::<4>() else {
                return Err(FrameStreamError::MalformedControl("truncated field length"));
            };

            let field_type = u32::from_be_bytes(*field_type);
            let field_len = u32::from_be_bytes(*field_len) as usize;
            if field_len > after_len.len() {
                return Err(FrameStreamError::MalformedControl("truncated field value"));
            }
            let (value, remaining) = after_len.split_at(field_len);

            if field_type == FIELD_CONTENT_TYPE {
                if !control_type.allows_content_type() {
                    return Err(FrameStreamError::MalformedControl(
                        "content type on a control frame that carries none",
                    ));
                }
                if field_len > MAX_CONTENT_TYPE_LEN {
                    return Err(FrameStreamError::ContentTypeTooLarge(field_len));
                }
                frame.content_types.push(Bytes::copy_from_slice(value));
            }
            // Other field types are reserved; skip them.

            rest = remaining;
        }

        Ok(frame)
    }

    /// The control payload alone.
    pub fn encode_payload(&self) -> BytesMut {
        let len = 4 + self
            .content_types
            .iter()
            .map(|ct| 8 + ct.len())
            .sum::<usize>();
        let mut buf = BytesMut::with_capacity(len);
        buf.put_u32(self.control_type as u32);
        for content_type in &self.content_types {
            buf.put_u32(FIELD_CONTENT_TYPE);
            buf.put_u32(content_type.len() as u32);
            buf.put_slice(content_type);
        }
        buf
    }

    /// The complete frame: escape word, control length, payload.
    pub fn encode(&self) -> Bytes {
        let payload = self.encode_payload();
        let mut buf = BytesMut::with_capacity(8 + payload.len());
        buf.put_u32(0);
        buf.put_u32(payload.len() as u32);
        buf.put_slice(&payload);
        buf.freeze()
    }
}
