pub mod connector;
pub mod dns;
pub mod errors;
pub mod logging;
pub mod root;

pub use connector::ConnectorConfig;
pub use dns::{DnsConfig, DEFAULT_RESOLV_CONF};
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
