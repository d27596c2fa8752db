use super::reader::{DnsWireReader, HEADER_LEN};
use ferrous_socks_domain::{
    DecodeError, DnsQuery, DnsRecord, DnsResponse, DnskeyData, DsData, HeaderFlags, RecordData,
    RecordType, RrsigData, Section, SoaData,
};
use std::net::Ipv4Addr;

/// Fixed part of an RRSIG RDATA before the signer name.
const RRSIG_FIXED_LEN: usize = 18;

/// Decodes a complete DNS response from its wire form.
///
/// Decoding is all-or-nothing: a truncated or malformed buffer yields an
/// error, never a partially filled response.
pub struct DnsMessageDecoder;

impl DnsMessageDecoder {
    pub fn decode(buf: &[u8]) -> Result<DnsResponse, DecodeError> {
        let mut reader = DnsWireReader::new(buf);
        reader.read_bytes_at(0, HEADER_LEN)?;

        let mut response = DnsResponse {
            id: reader.u16_at(0)?,
            flags: HeaderFlags::from_u16(reader.u16_at(2)?),
            query_count: reader.u16_at(4)?,
            answer_count: reader.u16_at(6)?,
            nameserver_count: reader.u16_at(8)?,
            additional_count: reader.u16_at(10)?,
            ..DnsResponse::default()
        };

        for _ in 0..response.query_count {
            let name = reader.read_domain_label()?;
            let type_code = reader.read_u16()?;
            let class = reader.read_u16()?;
            response.queries.push(DnsQuery {
                name,
                type_code,
                class,
            });
        }

        let sections = [
            (Section::Answer, response.answer_count),
            (Section::Nameserver, response.nameserver_count),
            (Section::Additional, response.additional_count),
        ];
        for (section, count) in sections {
            for _ in 0..count {
                let record = Self::read_record(&mut reader)?;
                response.add_record(record, section);
            }
        }

        Ok(response)
    }

    fn read_record(reader: &mut DnsWireReader<'_>) -> Result<DnsRecord, DecodeError> {
        let domain = reader.read_domain_label()?;
        let type_code = reader.read_u16()?;
        let class = reader.read_u16()?;
        let ttl = reader.read_u32()?;
        let rdlength = reader.read_u16()? as usize;

        let data = match RecordType::from_u16(type_code) {
            Some(RecordType::A) => {
                let b = reader.read_bytes(4)?;
                RecordData::A(Ipv4Addr::new(b[0], b[1], b[2], b[3]))
            }
            Some(RecordType::NS) => RecordData::Ns(reader.read_domain_label()?),
            Some(RecordType::CNAME) => RecordData::Cname(reader.read_domain_label()?),
            Some(RecordType::PTR) => RecordData::Ptr(reader.read_domain_label()?),
            Some(RecordType::MX) => {
                let priority = reader.read_u16()?;
                let server = reader.read_domain_label()?;
                RecordData::Mx { priority, server }
            }
            Some(RecordType::SOA) => RecordData::Soa(SoaData {
                nameserver: reader.read_domain_label()?,
                responsible: reader.read_domain_label()?,
                serial: reader.read_u32()?,
                refresh: reader.read_u32()?,
                retry: reader.read_u32()?,
                expiry: reader.read_u32()?,
                min_ttl: reader.read_u32()?,
            }),
            Some(RecordType::TXT) => RecordData::Txt(reader.read_bytes(rdlength)?.to_vec()),
            Some(RecordType::DS) => {
                let rdata = reader.read_bytes(rdlength)?;
                if rdata.len() < 4 {
                    return Err(DecodeError::Truncated {
                        offset: reader.position() - rdata.len(),
                        needed: 4,
                        available: rdata.len(),
                    });
                }
                RecordData::Ds(DsData {
                    key_tag: u16::from_be_bytes([rdata[0], rdata[1]]),
                    algorithm: rdata[2],
                    digest_type: rdata[3],
                    digest: rdata[4..].to_vec(),
                })
            }
            Some(RecordType::DNSKEY) => {
                let rdata = reader.read_bytes(rdlength)?;
                if rdata.len() < 4 {
                    return Err(DecodeError::Truncated {
                        offset: reader.position() - rdata.len(),
                        needed: 4,
                        available: rdata.len(),
                    });
                }
                RecordData::Dnskey(DnskeyData::new(
                    u16::from_be_bytes([rdata[0], rdata[1]]),
                    rdata[2],
                    rdata[3],
                    rdata[4..].to_vec(),
                ))
            }
            Some(RecordType::RRSIG) => Self::read_rrsig(reader, rdlength)?,
            None => RecordData::Raw(reader.read_bytes(rdlength)?.to_vec()),
        };

        Ok(DnsRecord::new(domain, type_code, class, ttl, data))
    }

    fn read_rrsig(
        reader: &mut DnsWireReader<'_>,
        rdlength: usize,
    ) -> Result<RecordData, DecodeError> {
        let type_covered = reader.read_u16()?;
        let algorithm = reader.read_u8()?;
        let labels = reader.read_u8()?;
        let original_ttl = reader.read_u32()?;
        let expiration = reader.read_u32()?;
        let inception = reader.read_u32()?;
        let key_tag = reader.read_u16()?;

        let name_start = reader.position();
        let signer_name = reader.read_domain_label()?;
        let name_len = reader.position() - name_start;

        let signature_len = rdlength.saturating_sub(RRSIG_FIXED_LEN + name_len);
        let signature = reader.read_bytes(signature_len)?.to_vec();

        Ok(RecordData::Rrsig(RrsigData {
            type_covered,
            algorithm,
            labels,
            original_ttl,
            expiration,
            inception,
            key_tag,
            signer_name,
            signature,
        }))
    }
}
