use serde::{Deserialize, Serialize};

pub const DEFAULT_RESOLV_CONF: &str = "/etc/resolv.conf";

/// Stub resolver settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    /// Explicit `host` or `host:port`; falls back to resolv.conf, then 8.8.8.8.
    #[serde(default)]
    pub server: Option<String>,

    #[serde(default = "default_resolv_conf_path")]
    pub resolv_conf_path: String,

    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            server: None,
            resolv_conf_path: default_resolv_conf_path(),
            cache_ttl_secs: default_cache_ttl_secs(),
            query_timeout_secs: default_query_timeout_secs(),
        }
    }
}

fn default_resolv_conf_path() -> String {
    DEFAULT_RESOLV_CONF.to_string()
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_query_timeout_secs() -> u64 {
    5
}
