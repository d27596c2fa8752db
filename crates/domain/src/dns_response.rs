use crate::dns_query::DnsQuery;
use crate::dns_record::DnsRecord;
use std::net::Ipv4Addr;

/// Which list of a response a record was announced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Answer,
    Nameserver,
    Additional,
}

/// Flag bits of the second header word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderFlags {
    pub is_response: bool,
    pub authoritative: bool,
    pub truncated: bool,
    pub recursion_requested: bool,
    pub recursion_available: bool,
    pub authenticated: bool,
    /// CD bit: the querier performs DNSSEC validation itself.
    pub dnssec_aware: bool,
    pub opcode: u8,
    pub rcode: u8,
}

impl HeaderFlags {
    pub fn from_u16(flags: u16) -> Self {
        Self {
            is_response: flags & 0x8000 != 0,
            opcode: ((flags >> 11) & 0x0F) as u8,
            authoritative: flags & 0x0400 != 0,
            truncated: flags & 0x0200 != 0,
            recursion_requested: flags & 0x0100 != 0,
            recursion_available: flags & 0x0080 != 0,
            authenticated: flags & 0x0020 != 0,
            dnssec_aware: flags & 0x0010 != 0,
            rcode: (flags & 0x000F) as u8,
        }
    }

    pub fn rcode_name(&self) -> &'static str {
        match self.rcode {
            0 => "NOERROR",
            1 => "FORMERR",
            2 => "SERVFAIL",
            3 => "NXDOMAIN",
            4 => "NOTIMP",
            5 => "REFUSED",
            _ => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsResponse {
    pub id: u16,

    pub flags: HeaderFlags,

    pub query_count: u16,

    pub answer_count: u16,

    pub nameserver_count: u16,

    pub additional_count: u16,

    pub queries: Vec<DnsQuery>,

    pub answers: Vec<DnsRecord>,

    pub nameservers: Vec<DnsRecord>,

    pub additional: Vec<DnsRecord>,
}

impl DnsResponse {
    pub fn add_record(&mut self, record: DnsRecord, section: Section) {
        match section {
            Section::Answer => self.answers.push(record),
            Section::Nameserver => self.nameservers.push(record),
            Section::Additional => self.additional.push(record),
        }
    }

    pub fn records(&self, section: Section) -> &[DnsRecord] {
        match section {
            Section::Answer => &self.answers,
            Section::Nameserver => &self.nameservers,
            Section::Additional => &self.additional,
        }
    }

    /// First A record in the answer section.
    pub fn first_ipv4(&self) -> Option<Ipv4Addr> {
        self.answers.iter().find_map(DnsRecord::ipv4)
    }

    pub fn is_nxdomain(&self) -> bool {
        self.flags.rcode == 3
    }
}
