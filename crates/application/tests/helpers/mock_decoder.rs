#![allow(dead_code)]

use bytes::Bytes;
use dnstap_collector_application::ports::DnstapEventDecoder;
use dnstap_collector_domain::{DnstapEvent, DomainError};
use std::sync::{Arc, RwLock};

/// Decoder whose frames are handles to events registered up front.
///
/// A frame is the little-endian index of a registered event; anything else
/// fails as an invalid envelope.
#[derive(Clone, Default)]
pub struct MockEventDecoder {
    events: Arc<RwLock<Vec<DnstapEvent>>>,
}

impl MockEventDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, event: DnstapEvent) -> Bytes {
        let mut events = self.events.write().unwrap();
        events.push(event);
        Bytes::copy_from_slice(&((events.len() - 1) as u32).to_le_bytes())
    }

    pub fn garbage_frame() -> Bytes {
        Bytes::from_static(b"\xff\xff\xff\xff\xff")
    }
}

impl DnstapEventDecoder for MockEventDecoder {
    fn decode(&self, frame: &Bytes) -> Result<DnstapEvent, DomainError> {
        let index: [u8; 4] = frame
            .as_ref()
            .try_into()
            .map_err(|_| DomainError::InvalidEnvelope("unexpected frame length".to_string()))?;
        self.events
            .read()
            .unwrap()
            .get(u32::from_le_bytes(index) as usize)
            .cloned()
            .ok_or_else(|| DomainError::InvalidEnvelope("unknown frame".to_string()))
    }
}
