use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;

const ZONE_KEY_FLAG: u16 = 0x0100;
const SECURE_ENTRY_POINT_FLAG: u16 = 0x0001;

fn algorithm_name(algorithm: u8) -> &'static str {
    match algorithm {
        5 => "RSA/SHA-1",
        7 => "RSASHA1-NSEC3-SHA1",
        8 => "RSA/SHA-256",
        10 => "RSA/SHA-512",
        13 => "ECDSA P-256/SHA-256",
        14 => "ECDSA P-384/SHA-384",
        15 => "Ed25519",
        16 => "Ed448",
        _ => "Unknown",
    }
}

/// RFC 4034 Appendix B key tag over a DNSKEY RDATA.
pub fn key_tag(rdata: &[u8]) -> u16 {
    let mut accumulator: u32 = 0;

    for (i, &byte) in rdata.iter().enumerate() {
        accumulator += if i & 1 == 0 {
            u32::from(byte) << 8
        } else {
            u32::from(byte)
        };
    }

    accumulator += accumulator >> 16;
    (accumulator & 0xFFFF) as u16
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsData {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: u8,
    pub digest: Vec<u8>,
}

impl DsData {
    /// Digest rendered as uppercase hex, two characters per byte.
    pub fn digest_hex(&self) -> String {
        self.digest.iter().map(|b| format!("{:02X}", b)).collect()
    }

    pub fn algorithm_name(&self) -> &'static str {
        algorithm_name(self.algorithm)
    }
}

impl fmt::Display for DsData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.key_tag,
            self.algorithm,
            self.digest_type,
            self.digest_hex()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnskeyData {
    pub flags: u16,
    pub protocol: u8,
    pub algorithm: u8,
    pub public_key: Vec<u8>,
    /// Key tag derived from the full RDATA when the record was decoded.
    pub key_tag: u16,
}

impl DnskeyData {
    pub fn new(flags: u16, protocol: u8, algorithm: u8, public_key: Vec<u8>) -> Self {
        let mut data = Self {
            flags,
            protocol,
            algorithm,
            public_key,
            key_tag: 0,
        };
        data.key_tag = key_tag(&data.to_rdata());
        data
    }

    /// Bit 7 of the flags field, counting from the most significant bit.
    pub fn is_zone_key(&self) -> bool {
        self.flags & ZONE_KEY_FLAG != 0
    }

    /// Bit 15 of the flags field, counting from the most significant bit.
    pub fn is_secure_entry_point(&self) -> bool {
        self.flags & SECURE_ENTRY_POINT_FLAG != 0
    }

    pub fn to_rdata(&self) -> Vec<u8> {
        let mut wire = Vec::with_capacity(4 + self.public_key.len());
        wire.extend_from_slice(&self.flags.to_be_bytes());
        wire.push(self.protocol);
        wire.push(self.algorithm);
        wire.extend_from_slice(&self.public_key);
        wire
    }

    pub fn public_key_base64(&self) -> String {
        STANDARD.encode(&self.public_key)
    }

    pub fn algorithm_name(&self) -> &'static str {
        algorithm_name(self.algorithm)
    }
}

impl fmt::Display for DnskeyData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DNSKEY(flags={}, algo={}, tag={}, {})",
            self.flags,
            self.algorithm_name(),
            self.key_tag,
            if self.is_secure_entry_point() { "KSK" } else { "ZSK" }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RrsigData {
    pub type_covered: u16,
    pub algorithm: u8,
    pub labels: u8,
    pub original_ttl: u32,
    pub expiration: u32,
    pub inception: u32,
    pub key_tag: u16,
    pub signer_name: String,
    pub signature: Vec<u8>,
}

impl RrsigData {
    pub fn signature_base64(&self) -> String {
        STANDARD.encode(&self.signature)
    }

    pub fn algorithm_name(&self) -> &'static str {
        algorithm_name(self.algorithm)
    }

    pub fn is_valid_at(&self, now: u32) -> bool {
        now >= self.inception && now <= self.expiration
    }
}

impl fmt::Display for RrsigData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RRSIG(type={}, algo={}, tag={}, signer={})",
            super::RecordType::mnemonic(self.type_covered),
            self.algorithm_name(),
            self.key_tag,
            self.signer_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_map_to_zone_key_and_sep() {
        let ksk = DnskeyData::new(257, 3, 8, vec![1, 2, 3]);
        assert!(ksk.is_zone_key());
        assert!(ksk.is_secure_entry_point());

        let zsk = DnskeyData::new(256, 3, 8, vec![1, 2, 3]);
        assert!(zsk.is_zone_key());
        assert!(!zsk.is_secure_entry_point());
    }

    #[test]
    fn test_key_tag_odd_length_rdata() {
        // 0x0100 + 0x0308 + (0x01 << 8) = 0x0508
        assert_eq!(key_tag(&[0x01, 0x00, 0x03, 0x08, 0x01]), 0x0508);
    }

    #[test]
    fn test_key_tag_folds_carry() {
        let rdata = vec![0xFF; 4];
        // 0xFFFF * 2 = 0x1FFFE, fold -> 0xFFFE + 1
        assert_eq!(key_tag(&rdata), 0xFFFF);
    }

    #[test]
    fn test_ds_digest_hex_uppercase() {
        let ds = DsData {
            key_tag: 1,
            algorithm: 8,
            digest_type: 2,
            digest: vec![0xab, 0x0c, 0xff],
        };
        assert_eq!(ds.digest_hex(), "AB0CFF");
    }
}
