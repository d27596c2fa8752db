mod decoder;
mod reader;

pub use decoder::DnsMessageDecoder;
pub use reader::{DnsWireReader, HEADER_LEN};
