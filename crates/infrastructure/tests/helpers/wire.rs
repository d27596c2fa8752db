#![allow(dead_code)]

pub const CLASS_IN: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireSection {
    Answer,
    Authority,
    Additional,
}

/// Uncompressed wire form of `name` (`""` is the root).
pub fn encode_name(name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for label in name.split('.').filter(|l| !l.is_empty()) {
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    out
}

/// `labels` followed by a compression pointer to `offset`.
pub fn name_with_pointer(labels: &str, offset: u16) -> Vec<u8> {
    let mut out = encode_name(labels);
    out.pop();
    out.push(0xC0 | (offset >> 8) as u8);
    out.push(offset as u8);
    out
}

pub fn pointer(offset: u16) -> Vec<u8> {
    name_with_pointer("", offset)
}

/// Builds a response buffer section by section. Sections must be added in
/// wire order: questions, answers, authority, additional.
pub struct WireMessage {
    id: u16,
    flags: u16,
    body: Vec<u8>,
    qdcount: u16,
    ancount: u16,
    nscount: u16,
    arcount: u16,
}

impl WireMessage {
    pub fn response(id: u16) -> Self {
        Self {
            id,
            flags: 0x8180,
            body: Vec::new(),
            qdcount: 0,
            ancount: 0,
            nscount: 0,
            arcount: 0,
        }
    }

    pub fn flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }

    /// Absolute offset the next item will be written at.
    pub fn offset(&self) -> u16 {
        (12 + self.body.len()) as u16
    }

    pub fn question(mut self, name: &str, qtype: u16) -> Self {
        self.body.extend_from_slice(&encode_name(name));
        self.body.extend_from_slice(&qtype.to_be_bytes());
        self.body.extend_from_slice(&CLASS_IN.to_be_bytes());
        self.qdcount += 1;
        self
    }

    pub fn record(self, section: WireSection, name: &[u8], rtype: u16, ttl: u32, rdata: &[u8]) -> Self {
        let rdlength = rdata.len() as u16;
        self.record_with_rdlength(section, name, rtype, ttl, rdlength, rdata)
    }

    pub fn answer(self, name: &[u8], rtype: u16, ttl: u32, rdata: &[u8]) -> Self {
        self.record(WireSection::Answer, name, rtype, ttl, rdata)
    }

    /// Writes `rdlength` as given, whatever the length of `rdata`.
    pub fn record_with_rdlength(
        mut self,
        section: WireSection,
        name: &[u8],
        rtype: u16,
        ttl: u32,
        rdlength: u16,
        rdata: &[u8],
    ) -> Self {
        self.body.extend_from_slice(name);
        self.body.extend_from_slice(&rtype.to_be_bytes());
        self.body.extend_from_slice(&CLASS_IN.to_be_bytes());
        self.body.extend_from_slice(&ttl.to_be_bytes());
        self.body.extend_from_slice(&rdlength.to_be_bytes());
        self.body.extend_from_slice(rdata);
        match section {
            WireSection::Answer => self.ancount += 1,
            WireSection::Authority => self.nscount += 1,
            WireSection::Additional => self.arcount += 1,
        }
        self
    }

    /// Announces more records than were written.
    pub fn overstate_answers(mut self, extra: u16) -> Self {
        self.ancount += extra;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(12 + self.body.len());
        buf.extend_from_slice(&self.id.to_be_bytes());
        buf.extend_from_slice(&self.flags.to_be_bytes());
        buf.extend_from_slice(&self.qdcount.to_be_bytes());
        buf.extend_from_slice(&self.ancount.to_be_bytes());
        buf.extend_from_slice(&self.nscount.to_be_bytes());
        buf.extend_from_slice(&self.arcount.to_be_bytes());
        buf.extend_from_slice(&self.body);
        buf
    }
}
