use super::dnssec::{DnskeyData, DsData, RrsigData};
use super::RecordType;
use std::fmt;
use std::net::Ipv4Addr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoaData {
    pub nameserver: String,
    pub responsible: String,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expiry: u32,
    pub min_ttl: u32,
}

/// Type-specific payload of a resource record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    Ns(String),
    Cname(String),
    Ptr(String),
    Mx { priority: u16, server: String },
    Soa(SoaData),
    Txt(Vec<u8>),
    Ds(DsData),
    Dnskey(DnskeyData),
    Rrsig(RrsigData),
    /// Types the registry does not know; RDATA kept verbatim.
    Raw(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    pub domain: String,

    pub type_code: u16,

    pub type_mnemonic: &'static str,

    pub class: u16,

    pub ttl: u32,

    pub data: RecordData,
}

impl DnsRecord {
    pub fn new(domain: String, type_code: u16, class: u16, ttl: u32, data: RecordData) -> Self {
        Self {
            domain,
            type_code,
            type_mnemonic: RecordType::mnemonic(type_code),
            class,
            ttl,
            data,
        }
    }

    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_u16(self.type_code)
    }

    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        match self.data {
            RecordData::A(addr) => Some(addr),
            _ => None,
        }
    }

    /// Target name for NS, CNAME and PTR records.
    pub fn target(&self) -> Option<&str> {
        match &self.data {
            RecordData::Ns(name) | RecordData::Cname(name) | RecordData::Ptr(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for RecordData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordData::A(addr) => write!(f, "{}", addr),
            RecordData::Ns(name) | RecordData::Cname(name) | RecordData::Ptr(name) => {
                write!(f, "{}", name)
            }
            RecordData::Mx { priority, server } => write!(f, "{} {}", priority, server),
            RecordData::Soa(soa) => write!(
                f,
                "{} {} {} {} {} {} {}",
                soa.nameserver,
                soa.responsible,
                soa.serial,
                soa.refresh,
                soa.retry,
                soa.expiry,
                soa.min_ttl
            ),
            RecordData::Txt(bytes) => write!(f, "\"{}\"", String::from_utf8_lossy(bytes)),
            RecordData::Ds(ds) => write!(f, "{}", ds),
            RecordData::Dnskey(key) => write!(f, "{}", key),
            RecordData::Rrsig(sig) => write!(f, "{}", sig),
            RecordData::Raw(bytes) => write!(f, "\\# {}", bytes.len()),
        }
    }
}

impl fmt::Display for DnsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.domain, self.ttl, self.type_mnemonic, self.data
        )
    }
}
