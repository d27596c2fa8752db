//! Mapping between `ferrous_socks_domain::RecordType` and `hickory_proto::rr::RecordType`.

use ferrous_socks_domain::RecordType;
use hickory_proto::rr::RecordType as HickoryRecordType;

pub struct RecordTypeMapper;

impl RecordTypeMapper {
    /// Domain type → hickory type, for building queries.
    pub fn to_hickory(record_type: &RecordType) -> HickoryRecordType {
        match record_type {
            RecordType::A => HickoryRecordType::A,
            RecordType::NS => HickoryRecordType::NS,
            RecordType::CNAME => HickoryRecordType::CNAME,
            RecordType::SOA => HickoryRecordType::SOA,
            RecordType::PTR => HickoryRecordType::PTR,
            RecordType::MX => HickoryRecordType::MX,
            RecordType::TXT => HickoryRecordType::TXT,

            // DNSSEC records
            RecordType::DS => HickoryRecordType::DS,
            RecordType::RRSIG => HickoryRecordType::RRSIG,
            RecordType::DNSKEY => HickoryRecordType::DNSKEY,
        }
    }
}
