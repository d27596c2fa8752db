use crate::dns_record::RecordType;
use std::net::IpAddr;

/// One entry of the question section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub name: String,
    pub type_code: u16,
    pub class: u16,
}

impl DnsQuery {
    pub fn new(name: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            name: name.into(),
            type_code: record_type.to_u16(),
            class: 1,
        }
    }

    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_u16(self.type_code)
    }

    pub fn type_mnemonic(&self) -> &'static str {
        RecordType::mnemonic(self.type_code)
    }
}

/// Name queried for a PTR lookup of `ip` (`in-addr.arpa` / `ip6.arpa`).
pub fn reverse_name(ip: &IpAddr) -> String {
    match ip {
        IpAddr::V4(ipv4) => {
            let octets = ipv4.octets();
            format!(
                "{}.{}.{}.{}.in-addr.arpa",
                octets[3], octets[2], octets[1], octets[0]
            )
        }
        IpAddr::V6(ipv6) => {
            let mut nibbles = Vec::with_capacity(32);
            for byte in ipv6.octets().iter().rev() {
                nibbles.push(format!("{:x}", byte & 0x0f));
                nibbles.push(format!("{:x}", (byte >> 4) & 0x0f));
            }
            format!("{}.ip6.arpa", nibbles.join("."))
        }
    }
}
