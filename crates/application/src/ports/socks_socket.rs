use ferrous_socks_domain::ConnectionError;
use std::io;
use std::net::SocketAddrV4;
use std::time::Duration;

/// Method selection sent back by the proxy after the client greeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreetingReply {
    pub version: u8,
    pub method: u8,
}

/// Non-blocking SOCKS5 client socket.
///
/// Every `read_*` returns `Ok(None)` while the reply has not fully arrived.
pub trait SocksSocket: Send {
    /// Creates the non-blocking TCP socket with send/receive timeouts.
    fn open(&mut self, timeout: Duration) -> Result<(), ConnectionError>;

    /// One connect attempt. The raw OS result is returned so the caller can
    /// tell "in progress" from "already connected" from a real failure.
    fn connect_proxy(&mut self, proxy: SocketAddrV4) -> io::Result<()>;

    fn write_greeting(&mut self) -> Result<(), ConnectionError>;

    fn read_greeting(&mut self) -> Result<Option<GreetingReply>, ConnectionError>;

    fn check_greeting(&self, reply: &GreetingReply) -> Result<(), ConnectionError>;

    fn greeting_requires_auth(&self, reply: &GreetingReply) -> bool;

    fn write_auth(&mut self) -> Result<(), ConnectionError>;

    /// `Some(false)` when the proxy rejected the credentials.
    fn read_auth_status(&mut self) -> Result<Option<bool>, ConnectionError>;

    /// Sends the CONNECT request for the final destination.
    fn connect_target(&mut self, host: &str, port: u16) -> Result<(), ConnectionError>;

    /// `Some(false)` when the proxy refused the CONNECT request.
    fn read_connect_status(&mut self) -> Result<Option<bool>, ConnectionError>;

    fn close(&mut self);

    fn is_open(&self) -> bool;
}
