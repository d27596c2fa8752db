use ferrous_socks_domain::config::DEFAULT_RESOLV_CONF;
use ferrous_socks_domain::{DnsServerAddr, ResolverError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reads the first `nameserver` entry of a resolver configuration file.
pub struct ResolvConfReader {
    path: PathBuf,
}

impl ResolvConfReader {
    pub fn new() -> Self {
        Self::with_path(DEFAULT_RESOLV_CONF)
    }

    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when the file is missing, unreadable or has no nameserver line.
    pub fn first_nameserver(&self) -> Option<String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "No resolver configuration");
                return None;
            }
        };
        Self::parse_first_nameserver(&content)
    }

    pub fn parse_first_nameserver(content: &str) -> Option<String> {
        content.lines().find_map(|line| {
            let line = match line.find('#') {
                Some(idx) => &line[..idx],
                None => line,
            };
            let rest = line.trim().strip_prefix("nameserver")?;
            if !rest.starts_with(char::is_whitespace) {
                return None;
            }
            let server = rest.trim();
            (!server.is_empty()).then(|| server.to_string())
        })
    }
}

impl Default for ResolvConfReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Picks the DNS server: the explicit setting, else the first nameserver in
/// `resolv_conf`, else `8.8.8.8:53`.
///
/// An invalid explicit server is an error; an unusable resolv.conf entry only
/// falls back to the default.
pub fn discover_dns_server(
    explicit: Option<&str>,
    resolv_conf: &Path,
) -> Result<DnsServerAddr, ResolverError> {
    if let Some(server) = explicit {
        return server.parse().map_err(ResolverError::InvalidServer);
    }

    let reader = ResolvConfReader::with_path(resolv_conf);
    if let Some(nameserver) = reader.first_nameserver() {
        match nameserver.parse::<DnsServerAddr>() {
            Ok(addr) if addr.socket_addr().is_some() => {
                debug!(server = %addr, path = %resolv_conf.display(), "Using system nameserver");
                return Ok(addr);
            }
            Ok(addr) => {
                warn!(server = %addr, "System nameserver is not an IP address, using default");
            }
            Err(e) => {
                warn!(error = %e, "Unparseable system nameserver, using default");
            }
        }
    }

    Ok(DnsServerAddr::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_nameserver_wins() {
        let content = "search lan\nnameserver 192.168.1.1\nnameserver 1.1.1.1\n";
        assert_eq!(
            ResolvConfReader::parse_first_nameserver(content),
            Some("192.168.1.1".to_string())
        );
    }

    #[test]
    fn test_comments_are_stripped() {
        let content = "# nameserver 10.0.0.1\n  nameserver 9.9.9.9   # quad9\n";
        assert_eq!(
            ResolvConfReader::parse_first_nameserver(content),
            Some("9.9.9.9".to_string())
        );
    }

    #[test]
    fn test_no_nameserver() {
        assert_eq!(
            ResolvConfReader::parse_first_nameserver("options ndots:5\nnameservers x\n"),
            None
        );
        assert_eq!(ResolvConfReader::parse_first_nameserver(""), None);
    }

    #[test]
    fn test_tab_separated() {
        assert_eq!(
            ResolvConfReader::parse_first_nameserver("nameserver\t::1\n"),
            Some("::1".to_string())
        );
    }
}
