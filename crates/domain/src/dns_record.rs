mod dnssec;
mod record;
mod record_type;

pub use dnssec::{key_tag, DnskeyData, DsData, RrsigData};
pub use record::{DnsRecord, RecordData, SoaData};
pub use record_type::{RecordType, UNKNOWN_MNEMONIC};
