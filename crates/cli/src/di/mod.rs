use ferrous_socks_application::ports::{Clock, DnsCachePort};
use ferrous_socks_application::use_cases::{ConnectOptions, Connector};
use ferrous_socks_domain::{Config, DnsServerAddr};
use ferrous_socks_infrastructure::dns::{InMemoryDnsCache, UdpResolverFactory};
use ferrous_socks_infrastructure::system::{discover_dns_server, SystemClock};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct Services {
    pub resolvers: Arc<UdpResolverFactory>,
    pub dns_server: DnsServerAddr,
    pub connector: Connector,
}

impl Services {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let dns_server = discover_dns_server(
            config.dns.server.as_deref(),
            Path::new(&config.dns.resolv_conf_path),
        )?;
        info!(server = %dns_server, "Using DNS server");

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let cache: Arc<dyn DnsCachePort> =
            Arc::new(InMemoryDnsCache::new(config.dns.cache_ttl_secs));
        let resolvers = Arc::new(UdpResolverFactory::new(
            Arc::clone(&clock),
            Duration::from_secs(config.dns.query_timeout_secs),
        ));

        let connector = Connector::new(
            cache,
            resolvers.clone(),
            clock,
            ConnectOptions {
                dns_server: dns_server.clone(),
                step_timeout: config.connector.step_timeout(),
                socket_timeout: config.connector.socket_timeout(),
            },
        );

        Ok(Self {
            resolvers,
            dns_server,
            connector,
        })
    }
}
