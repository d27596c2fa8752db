use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::str::FromStr;

pub const LOCALHOST: &str = "localhost";

/// SOCKS5 proxy endpoint. The server starts as whatever the caller wrote and
/// is rewritten to an IPv4 literal once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proxy {
    server: String,
    port: u16,
}

impl Proxy {
    pub fn new(server: impl Into<String>, port: u16) -> Self {
        Self {
            server: server.into(),
            port,
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn set_server(&mut self, server: impl Into<String>) {
        self.server = server.into();
    }

    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        self.server.parse().ok()
    }

    pub fn is_localhost(&self) -> bool {
        self.server == LOCALHOST
    }

    pub fn socket_addr(&self) -> Option<SocketAddrV4> {
        self.ipv4().map(|ip| SocketAddrV4::new(ip, self.port))
    }
}

impl fmt::Display for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.server, self.port)
    }
}

impl FromStr for Proxy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (server, port_str) = s
            .trim()
            .rsplit_once(':')
            .ok_or_else(|| format!("Proxy address '{}' must be host:port", s))?;
        if server.is_empty() {
            return Err(format!("Missing host in proxy address '{}'", s));
        }
        let port = port_str
            .parse::<u16>()
            .map_err(|_| format!("Invalid port in proxy address '{}'", s))?;
        Ok(Self::new(server, port))
    }
}

/// RFC 1929 username/password pair offered to the proxy.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
