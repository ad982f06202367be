#![allow(dead_code)]

/// Assembles raw DNS messages for parser tests.
pub struct DnsMessageBuilder {
    id: u16,
    flags: u16,
    qdcount: Option<u16>,
    labels: Vec<Vec<u8>>,
    qtype: u16,
    with_question: bool,
}

impl DnsMessageBuilder {
    pub fn new() -> Self {
        Self {
            id: 42,
            flags: 0x0100,
            qdcount: None,
            labels: vec![b"example".to_vec(), b"com".to_vec()],
            qtype: 1,
            with_question: true,
        }
    }

    pub fn id(mut self, id: u16) -> Self {
        self.id = id;
        self
    }

    pub fn rcode(mut self, rcode: u8) -> Self {
        self.flags = (self.flags & 0xFFF0) | u16::from(rcode & 0x0F);
        self
    }

    pub fn response(mut self) -> Self {
        self.flags |= 0x8000;
        self
    }

    pub fn qdcount(mut self, count: u16) -> Self {
        self.qdcount = Some(count);
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.labels = name
            .trim_end_matches('.')
            .split('.')
            .filter(|l| !l.is_empty())
            .map(|l| l.as_bytes().to_vec())
            .collect();
        self
    }

    pub fn raw_label(mut self, label: &[u8]) -> Self {
        self.labels.push(label.to_vec());
        self
    }

    pub fn qtype(mut self, qtype: u16) -> Self {
        self.qtype = qtype;
        self
    }

    pub fn without_question(mut self) -> Self {
        self.with_question = false;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let qdcount = self
            .qdcount
            .unwrap_or(if self.with_question { 1 } else { 0 });

        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(&self.id.to_be_bytes());
        buf.extend_from_slice(&self.flags.to_be_bytes());
        buf.extend_from_slice(&qdcount.to_be_bytes());
        buf.extend_from_slice(&[0, 0, 0, 0, 0, 0]);

        if self.with_question {
            for label in &self.labels {
                buf.push(label.len() as u8);
                buf.extend_from_slice(label);
            }
            buf.push(0);
            buf.extend_from_slice(&self.qtype.to_be_bytes());
            buf.extend_from_slice(&1u16.to_be_bytes());
        }

        buf
    }
}

impl Default for DnsMessageBuilder {
    fn default() -> Self {
        Self::new()
    }
}
