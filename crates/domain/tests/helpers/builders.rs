#![allow(dead_code)]
use ferrous_socks_domain::{DnsRecord, RecordData, RecordType};
use std::net::Ipv4Addr;

pub struct DnsRecordBuilder {
    domain: String,
    type_code: u16,
    class: u16,
    ttl: u32,
    data: RecordData,
}

impl DnsRecordBuilder {
    pub fn new() -> Self {
        Self {
            domain: "example.com".to_string(),
            type_code: RecordType::A.to_u16(),
            class: 1,
            ttl: 300,
            data: RecordData::A(Ipv4Addr::new(192, 0, 2, 1)),
        }
    }

    pub fn domain(mut self, domain: &str) -> Self {
        self.domain = domain.to_string();
        self
    }

    pub fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn a(mut self, addr: Ipv4Addr) -> Self {
        self.type_code = RecordType::A.to_u16();
        self.data = RecordData::A(addr);
        self
    }

    pub fn cname(mut self, target: &str) -> Self {
        self.type_code = RecordType::CNAME.to_u16();
        self.data = RecordData::Cname(target.to_string());
        self
    }

    pub fn raw(mut self, type_code: u16, bytes: Vec<u8>) -> Self {
        self.type_code = type_code;
        self.data = RecordData::Raw(bytes);
        self
    }

    pub fn build(self) -> DnsRecord {
        DnsRecord::new(self.domain, self.type_code, self.class, self.ttl, self.data)
    }
}

impl Default for DnsRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}
