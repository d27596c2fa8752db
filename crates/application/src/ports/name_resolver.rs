use ferrous_socks_domain::{DnsResponse, DnsServerAddr, RecordType, ResolverError};

/// One outstanding DNS exchange, driven by repeated `poll` calls.
pub trait NameResolver: Send {
    /// Sends the query. Calling again while a query is outstanding does nothing.
    fn query(&mut self, name: &str, record_type: RecordType) -> Result<(), ResolverError>;

    /// One non-blocking receive attempt.
    ///
    /// `None` while nothing has arrived. `Some` is yielded exactly once; the
    /// resolver is finished afterwards.
    fn poll(&mut self) -> Option<Result<DnsResponse, ResolverError>>;

    /// Releases the socket. Returns [`ResolverError::Closing`] when a query
    /// was still outstanding.
    fn cancel(&mut self) -> Option<ResolverError>;
}

/// Builds a fresh resolver for each resolution.
pub trait ResolverFactory: Send + Sync {
    fn create(&self, server: &DnsServerAddr) -> Result<Box<dyn NameResolver>, ResolverError>;
}
