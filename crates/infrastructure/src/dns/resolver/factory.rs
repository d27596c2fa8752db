use super::datagram::UdpDatagram;
use super::udp::UdpStubResolver;
use ferrous_socks_application::ports::{Clock, NameResolver, ResolverFactory};
use ferrous_socks_domain::{DnsServerAddr, ResolverError};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Opens a fresh UDP socket per resolution.
pub struct UdpResolverFactory {
    clock: Arc<dyn Clock>,
    query_timeout: Duration,
}

impl UdpResolverFactory {
    pub fn new(clock: Arc<dyn Clock>, query_timeout: Duration) -> Self {
        Self {
            clock,
            query_timeout,
        }
    }
}

impl ResolverFactory for UdpResolverFactory {
    fn create(&self, server: &DnsServerAddr) -> Result<Box<dyn NameResolver>, ResolverError> {
        let addr = server
            .socket_addr()
            .ok_or_else(|| ResolverError::InvalidServer(server.to_string()))?;

        let socket = UdpDatagram::connect(addr).map_err(|e| ResolverError::Io {
            server: server.to_string(),
            message: e.to_string(),
        })?;

        debug!(server = %server, "Opened UDP socket for DNS query");

        Ok(Box::new(UdpStubResolver::new(
            server.clone(),
            socket,
            Arc::clone(&self.clock),
            self.query_timeout,
        )))
    }
}
