use ferrous_socks_domain::DecodeError;
use std::borrow::Cow;

/// Size of the fixed DNS header; the cursor starts right after it.
pub const HEADER_LEN: usize = 12;

/// Maximum number of compression pointers followed for one name.
const MAX_COMPRESSION_JUMPS: usize = 128;

/// Maximum wire length of a domain name (RFC 1035 §2.3.4).
const MAX_NAME_LEN: usize = 255;

/// Cursor over a raw DNS message.
///
/// Sequential reads advance the cursor; `*_at` reads take an absolute offset
/// and leave it untouched. Any read past the end of the buffer fails with
/// [`DecodeError::Truncated`].
#[derive(Debug, Clone)]
pub struct DnsWireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> DnsWireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: HEADER_LEN,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn read_bytes_at(&self, offset: usize, count: usize) -> Result<&'a [u8], DecodeError> {
        let end = offset.checked_add(count).filter(|&end| end <= self.buf.len());
        match end {
            Some(end) => Ok(&self.buf[offset..end]),
            None => Err(DecodeError::Truncated {
                offset,
                needed: count,
                available: self.buf.len().saturating_sub(offset),
            }),
        }
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], DecodeError> {
        let bytes = self.read_bytes_at(self.pos, count)?;
        self.pos += count;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn u16_at(&self, offset: usize) -> Result<u16, DecodeError> {
        let b = self.read_bytes_at(offset, 2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    /// Reads a possibly compressed name at the cursor and returns it with its
    /// labels joined by `.` (the root name is the empty string).
    ///
    /// A length byte of 64 or more is a pointer; its target must lie strictly
    /// before every offset this name has already visited. The cursor moves past this name's own
    /// encoding only, never past the bytes a pointer leads to.
    pub fn read_domain_label(&mut self) -> Result<String, DecodeError> {
        let (name, consumed) = self.read_domain_label_at(self.pos)?;
        self.pos += consumed;
        Ok(name)
    }

    /// Same as [`read_domain_label`](Self::read_domain_label) at an absolute
    /// offset. Returns the name and how many bytes it occupies at `offset`.
    pub fn read_domain_label_at(&self, offset: usize) -> Result<(String, usize), DecodeError> {
        let mut labels: Vec<Cow<'a, str>> = Vec::new();
        let mut wire_len = 1usize;
        let mut pos = offset;
        let mut consumed = None;
        let mut jumps = 0usize;
        let mut lowest = offset;

        loop {
            let len = self.read_bytes_at(pos, 1)?[0] as usize;

            if len == 0 {
                if consumed.is_none() {
                    consumed = Some(pos + 1 - offset);
                }
                break;
            }

            if len >= 64 {
                let low = self.read_bytes_at(pos + 1, 1)?[0] as usize;
                let target = ((len & 0x3F) << 8) | low;
                if target >= lowest {
                    return Err(DecodeError::CompressionLoop { offset: pos, target });
                }
                lowest = target;
                jumps += 1;
                if jumps > MAX_COMPRESSION_JUMPS {
                    return Err(DecodeError::TooManyPointers { offset });
                }
                if consumed.is_none() {
                    consumed = Some(pos + 2 - offset);
                }
                pos = target;
                continue;
            }

            wire_len += 1 + len;
            if wire_len > MAX_NAME_LEN {
                return Err(DecodeError::NameTooLong {
                    offset,
                    max: MAX_NAME_LEN,
                });
            }

            labels.push(String::from_utf8_lossy(self.read_bytes_at(pos + 1, len)?));
            pos += 1 + len;
        }

        Ok((labels.join("."), consumed.unwrap_or(0)))
    }
}
