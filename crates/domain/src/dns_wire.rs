//! Minimal DNS wire decoding: the fixed header and the first question.
//!
//! Only what an observation needs is read. Compression pointers never appear
//! in a well-formed first question, so they are reported as malformed instead
//! of being followed.

use crate::errors::WireError;
use std::fmt::Write;

pub const HEADER_LEN: usize = 12;
const MAX_NAME_WIRE_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsHeader {
    pub id: u16,
    pub rcode: u16,
    pub qdcount: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuestion {
    /// Presentation form with a trailing dot.
    pub name: String,
    pub qtype: u16,
}

pub fn parse_header(buf: &[u8]) -> Result<DnsHeader, WireError> {
    if buf.len() < HEADER_LEN {
        return Err(WireError::TooShort { len: buf.len() });
    }

    Ok(DnsHeader {
        id: u16::from_be_bytes([buf[0], buf[1]]),
        rcode: u16::from(buf[3] & 0x0F),
        qdcount: u16::from_be_bytes([buf[4], buf[5]]),
    })
}

pub fn parse_question(buf: &[u8]) -> Result<DnsQuestion, WireError> {
    if buf.len() < HEADER_LEN {
        return Err(WireError::TooShort { len: buf.len() });
    }

    let mut pos = HEADER_LEN;
    let mut name = String::new();
    // Wire length includes every length octet and the root terminator.
    let mut wire_len = 1usize;

    loop {
        let Some(&len_byte) = buf.get(pos) else {
            return Err(WireError::Truncated { offset: pos });
        };

        match len_byte & 0xC0 {
            0x00 => {}
            0xC0 => return Err(WireError::CompressionPointer { offset: pos }),
            _ => {
                return Err(WireError::InvalidLabel {
                    len: len_byte,
                    offset: pos,
                })
            }
        }

        let label_len = len_byte as usize;
        pos += 1;
        if label_len == 0 {
            break;
        }

        wire_len += label_len + 1;
        if wire_len > MAX_NAME_WIRE_LEN {
            return Err(WireError::NameTooLong);
        }

        let Some(label) = buf.get(pos..pos + label_len) else {
            return Err(WireError::Truncated { offset: pos });
        };
        push_label(&mut name, label);
        name.push('.');
        pos += label_len;
    }

    if name.is_empty() {
        name.push('.');
    }

    let Some(qtype_bytes) = buf.get(pos..pos + 2) else {
        return Err(WireError::Truncated { offset: pos });
    };

    Ok(DnsQuestion {
        name,
        qtype: u16::from_be_bytes([qtype_bytes[0], qtype_bytes[1]]),
    })
}

fn push_label(name: &mut String, label: &[u8]) {
    for &b in label {
        match b {
            b'.' => name.push_str("\\."),
            b'\\' => name.push_str("\\\\"),
            0x21..=0x7E => name.push(b as char),
            _ => {
                let _ = write!(name, "\\{:03}", b);
            }
        }
    }
}
