//! Ferrous SOCKS Domain Layer
pub mod config;
pub mod connection_state;
pub mod dns_query;
pub mod dns_record;
pub mod dns_response;
pub mod dns_server;
pub mod errors;
pub mod proxy;

pub use config::{CliOverrides, Config, ConfigError};
pub use connection_state::ConnectionState;
pub use dns_query::{reverse_name, DnsQuery};
pub use dns_record::{
    key_tag, DnsRecord, DnskeyData, DsData, RecordData, RecordType, RrsigData, SoaData,
};
pub use dns_response::{DnsResponse, HeaderFlags, Section};
pub use dns_server::{DnsServerAddr, DEFAULT_DNS_PORT, DEFAULT_DNS_SERVER};
pub use errors::{ConnectionError, DecodeError, ResolverError};
pub use proxy::{Credentials, Proxy, LOCALHOST};
