mod state_machine;
mod step_guard;

pub use state_machine::ConnectionStateMachine;
pub use step_guard::StepStuckGuard;

use crate::ports::{Clock, DnsCachePort, ResolverFactory, SocksSocket};
use ferrous_socks_domain::{DnsServerAddr, Proxy};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub dns_server: DnsServerAddr,
    pub step_timeout: Duration,
    pub socket_timeout: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            dns_server: DnsServerAddr::default(),
            step_timeout: Duration::from_secs(10),
            socket_timeout: Duration::from_secs(10),
        }
    }
}

/// Shared entry point: every machine it creates uses the same DNS cache,
/// resolver factory and clock.
#[derive(Clone)]
pub struct Connector {
    cache: Arc<dyn DnsCachePort>,
    resolvers: Arc<dyn ResolverFactory>,
    clock: Arc<dyn Clock>,
    options: ConnectOptions,
}

impl Connector {
    pub fn new(
        cache: Arc<dyn DnsCachePort>,
        resolvers: Arc<dyn ResolverFactory>,
        clock: Arc<dyn Clock>,
        options: ConnectOptions,
    ) -> Self {
        Self {
            cache,
            resolvers,
            clock,
            options,
        }
    }

    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }

    pub fn cache(&self) -> &Arc<dyn DnsCachePort> {
        &self.cache
    }

    pub fn connect<S: SocksSocket>(
        &self,
        socket: S,
        proxy: Proxy,
        target_host: impl Into<String>,
        target_port: u16,
    ) -> ConnectionStateMachine<S> {
        ConnectionStateMachine::new(
            socket,
            proxy,
            target_host,
            target_port,
            self.options.clone(),
            Arc::clone(&self.cache),
            Arc::clone(&self.resolvers),
            Arc::clone(&self.clock),
        )
    }
}
