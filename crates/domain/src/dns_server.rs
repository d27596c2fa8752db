use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

pub const DEFAULT_DNS_PORT: u16 = 53;
pub const DEFAULT_DNS_SERVER: Ipv4Addr = Ipv4Addr::new(8, 8, 8, 8);

/// DNS server a stub resolver sends its query to.
///
/// Accepts `"host"`, `"host:port"` and `"[v6]:port"`; the port defaults to 53.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DnsServerAddr {
    pub host: String,
    pub port: u16,
}

impl DnsServerAddr {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Socket address, when the host is an IP literal.
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.host
            .parse::<IpAddr>()
            .ok()
            .map(|ip| SocketAddr::new(ip, self.port))
    }
}

impl Default for DnsServerAddr {
    fn default() -> Self {
        Self::new(DEFAULT_DNS_SERVER.to_string(), DEFAULT_DNS_PORT)
    }
}

impl fmt::Display for DnsServerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

fn parse_host_port(s: &str) -> Option<(&str, u16)> {
    if s.starts_with('[') {
        let end = s.find(']')?;
        let host = &s[1..end];
        let rest = &s[end + 1..];
        if rest.is_empty() {
            return Some((host, DEFAULT_DNS_PORT));
        }
        let port = rest.strip_prefix(':')?.parse::<u16>().ok()?;
        Some((host, port))
    } else if s.parse::<IpAddr>().is_ok() {
        Some((s, DEFAULT_DNS_PORT))
    } else if let Some((host, port_str)) = s.rsplit_once(':') {
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    } else {
        Some((s, DEFAULT_DNS_PORT))
    }
}

impl FromStr for DnsServerAddr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty DNS server address".to_string());
        }
        let (host, port) =
            parse_host_port(s).ok_or_else(|| format!("Invalid DNS server address '{}'", s))?;
        if host.is_empty() {
            return Err(format!("Missing host in DNS server address '{}'", s));
        }
        Ok(Self::new(host, port))
    }
}
