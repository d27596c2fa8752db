use thiserror::Error;

/// Failures while decoding a DNS message from wire format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("DNS message truncated: need {needed} bytes at offset {offset}, buffer has {available}")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Compression pointer at offset {offset} targets {target}, which is not strictly behind it")]
    CompressionLoop { offset: usize, target: usize },

    #[error("Too many compression pointers while reading name at offset {offset}")]
    TooManyPointers { offset: usize },

    #[error("Domain name exceeds {max} bytes at offset {offset}")]
    NameTooLong { offset: usize, max: usize },
}

/// Failures of a single DNS query/response exchange.
#[derive(Error, Debug, Clone)]
pub enum ResolverError {
    #[error("Resolver closed while a query was outstanding")]
    Closing,

    #[error("Timeout waiting for DNS response from {server}")]
    Timeout { server: String },

    #[error("DNS socket error talking to {server}: {message}")]
    Io { server: String, message: String },

    #[error("Invalid DNS server address: {0}")]
    InvalidServer(String),

    #[error("Invalid query name '{name}': {message}")]
    InvalidQuery { name: String, message: String },

    #[error("Failed to decode DNS response: {0}")]
    Decode(#[from] DecodeError),
}

impl ResolverError {
    /// The teardown report a cancelled resolver hands back. Never fatal.
    pub fn is_closing(&self) -> bool {
        matches!(self, ResolverError::Closing)
    }
}

/// Fatal outcomes of driving a connection through the proxy.
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Proxy unreachable: {0}")]
    UnreachableProxy(String),

    #[error("Step {step} made no progress for {elapsed_ms} ms (limit {limit_ms} ms)")]
    StepStuck {
        step: &'static str,
        elapsed_ms: u64,
        limit_ms: u64,
    },

    #[error("Connection not established: {0}")]
    ConnectionNotEstablished(String),

    #[error("Socket error: {0}")]
    Socket(#[from] std::io::Error),

    #[error("SOCKS5 protocol violation: {0}")]
    Protocol(String),
}

impl From<ResolverError> for ConnectionError {
    fn from(err: ResolverError) -> Self {
        ConnectionError::ConnectionNotEstablished(err.to_string())
    }
}
