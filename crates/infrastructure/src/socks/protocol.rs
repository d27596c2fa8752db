//! SOCKS5 wire layouts (RFC 1928) and username/password sub-negotiation
//! (RFC 1929).

use ferrous_socks_domain::{ConnectionError, Credentials};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

pub const SOCKS_VERSION: u8 = 0x05;
pub const AUTH_VERSION: u8 = 0x01;

pub const METHOD_NO_AUTH: u8 = 0x00;
pub const METHOD_USER_PASS: u8 = 0x02;
pub const METHOD_NO_ACCEPTABLE: u8 = 0xFF;

pub const CMD_CONNECT: u8 = 0x01;

pub const ATYP_IPV4: u8 = 0x01;
pub const ATYP_DOMAIN: u8 = 0x03;
pub const ATYP_IPV6: u8 = 0x04;

pub const REP_SUCCESS: u8 = 0x00;

pub fn reply_name(code: u8) -> &'static str {
    match code {
        0x00 => "succeeded",
        0x01 => "general SOCKS server failure",
        0x02 => "connection not allowed by ruleset",
        0x03 => "network unreachable",
        0x04 => "host unreachable",
        0x05 => "connection refused",
        0x06 => "TTL expired",
        0x07 => "command not supported",
        0x08 => "address type not supported",
        _ => "unassigned",
    }
}

/// Address the proxy reports in its CONNECT reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundAddr {
    Ip(SocketAddr),
    Domain(String, u16),
}

impl fmt::Display for BoundAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundAddr::Ip(addr) => write!(f, "{}", addr),
            BoundAddr::Domain(host, port) => write!(f, "{}:{}", host, port),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectReply {
    pub reply: u8,
    pub bound: BoundAddr,
}

impl ConnectReply {
    pub fn succeeded(&self) -> bool {
        self.reply == REP_SUCCESS
    }
}

/// Version/method-count/methods. Username/password is offered only when
/// credentials are configured.
pub fn encode_greeting(with_credentials: bool) -> Vec<u8> {
    if with_credentials {
        vec![SOCKS_VERSION, 2, METHOD_NO_AUTH, METHOD_USER_PASS]
    } else {
        vec![SOCKS_VERSION, 1, METHOD_NO_AUTH]
    }
}

pub fn encode_auth(credentials: &Credentials) -> Result<Vec<u8>, ConnectionError> {
    let user = credentials.username.as_bytes();
    let pass = credentials.password.as_bytes();
    if user.is_empty() || user.len() > 255 || pass.len() > 255 {
        return Err(ConnectionError::Protocol(
            "username and password must be 1-255 and 0-255 bytes".to_string(),
        ));
    }

    let mut request = Vec::with_capacity(3 + user.len() + pass.len());
    request.push(AUTH_VERSION);
    request.push(user.len() as u8);
    request.extend_from_slice(user);
    request.push(pass.len() as u8);
    request.extend_from_slice(pass);
    Ok(request)
}

/// CONNECT request. IP literals are sent as such, anything else as a domain
/// name for the proxy to resolve.
pub fn encode_connect(host: &str, port: u16) -> Result<Vec<u8>, ConnectionError> {
    let mut request = vec![SOCKS_VERSION, CMD_CONNECT, 0x00];

    match host.parse::<IpAddr>() {
        Ok(IpAddr::V4(ipv4)) => {
            request.push(ATYP_IPV4);
            request.extend_from_slice(&ipv4.octets());
        }
        Ok(IpAddr::V6(ipv6)) => {
            request.push(ATYP_IPV6);
            request.extend_from_slice(&ipv6.octets());
        }
        Err(_) => {
            if host.is_empty() || host.len() > 255 {
                return Err(ConnectionError::Protocol(format!(
                    "target host '{}' must be 1-255 bytes",
                    host
                )));
            }
            request.push(ATYP_DOMAIN);
            request.push(host.len() as u8);
            request.extend_from_slice(host.as_bytes());
        }
    }

    request.extend_from_slice(&port.to_be_bytes());
    Ok(request)
}

/// Parses a CONNECT reply from the front of `buf`.
///
/// `Ok(None)` while more bytes are needed; otherwise the reply and the number
/// of bytes it used.
pub fn parse_connect_reply(buf: &[u8]) -> Result<Option<(ConnectReply, usize)>, ConnectionError> {
    if buf.len() < 4 {
        return Ok(None);
    }
    if buf[0] != SOCKS_VERSION {
        return Err(ConnectionError::Protocol(format!(
            "reply version {:#04x}, expected 0x05",
            buf[0]
        )));
    }

    let reply = buf[1];
    let (addr_len, addr_start) = match buf[3] {
        ATYP_IPV4 => (4, 4),
        ATYP_IPV6 => (16, 4),
        ATYP_DOMAIN => match buf.get(4) {
            Some(&len) => (len as usize, 5),
            None => return Ok(None),
        },
        other => {
            return Err(ConnectionError::Protocol(format!(
                "unknown address type {:#04x} in reply",
                other
            )))
        }
    };

    let total = addr_start + addr_len + 2;
    if buf.len() < total {
        return Ok(None);
    }

    let addr = &buf[addr_start..addr_start + addr_len];
    let port = u16::from_be_bytes([buf[total - 2], buf[total - 1]]);
    let bound = match buf[3] {
        ATYP_IPV4 => BoundAddr::Ip(SocketAddr::new(
            IpAddr::V4(Ipv4Addr::new(addr[0], addr[1], addr[2], addr[3])),
            port,
        )),
        ATYP_IPV6 => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(addr);
            BoundAddr::Ip(SocketAddr::new(IpAddr::V6(Ipv6Addr::from(octets)), port))
        }
        _ => BoundAddr::Domain(String::from_utf8_lossy(addr).into_owned(), port),
    };

    Ok(Some((ConnectReply { reply, bound }, total)))
}
