use super::protocol::{
    self, BoundAddr, AUTH_VERSION, METHOD_NO_ACCEPTABLE, METHOD_NO_AUTH, METHOD_USER_PASS,
    SOCKS_VERSION,
};
use ferrous_socks_application::ports::{GreetingReply, SocksSocket};
use ferrous_socks_domain::{ConnectionError, Credentials};
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io::{self, Read, Write};
use std::net::{SocketAddrV4, TcpStream};
use std::time::Duration;
use tracing::{debug, warn};

const READ_CHUNK: usize = 512;

/// Non-blocking SOCKS5 client over a `socket2::Socket`.
///
/// Outgoing messages are queued and flushed as the socket accepts them;
/// incoming bytes accumulate until a full reply is present, so every step
/// tolerates partial reads and writes across polls.
pub struct Socks5Socket {
    socket: Option<Socket>,
    credentials: Option<Credentials>,
    outbox: Vec<u8>,
    inbox: Vec<u8>,
    bound: Option<BoundAddr>,
}

impl Socks5Socket {
    pub fn new(credentials: Option<Credentials>) -> Self {
        Self {
            socket: None,
            credentials,
            outbox: Vec::new(),
            inbox: Vec::new(),
            bound: None,
        }
    }

    /// Address the proxy bound for the tunnel, once the CONNECT succeeded.
    pub fn bound_addr(&self) -> Option<&BoundAddr> {
        self.bound.as_ref()
    }

    /// Bytes received after the CONNECT reply; they belong to the tunnel.
    pub fn take_buffered(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.inbox)
    }

    /// Hands the connected socket over as a blocking `TcpStream`.
    pub fn into_tcp_stream(mut self) -> io::Result<TcpStream> {
        let socket = self
            .socket
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "socket not open"))?;
        socket.set_nonblocking(false)?;
        Ok(socket.into())
    }

    fn socket(&self) -> Result<&Socket, ConnectionError> {
        self.socket.as_ref().ok_or_else(|| {
            ConnectionError::Socket(io::Error::new(
                io::ErrorKind::NotConnected,
                "socket not open",
            ))
        })
    }

    fn queue(&mut self, bytes: &[u8]) -> Result<(), ConnectionError> {
        self.outbox.extend_from_slice(bytes);
        self.flush()
    }

    fn flush(&mut self) -> Result<(), ConnectionError> {
        while !self.outbox.is_empty() {
            let mut socket = self.socket()?;
            match socket.write(&self.outbox) {
                Ok(0) => {
                    return Err(ConnectionError::ConnectionNotEstablished(
                        "proxy stopped accepting data".to_string(),
                    ))
                }
                Ok(n) => {
                    self.outbox.drain(..n);
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Flushes pending output, then reads until at least `need` bytes are
    /// buffered or the socket would block.
    fn fill(&mut self, need: usize) -> Result<bool, ConnectionError> {
        self.flush()?;
        if !self.outbox.is_empty() {
            return Ok(false);
        }

        let mut chunk = [0u8; READ_CHUNK];
        while self.inbox.len() < need {
            let mut socket = self.socket()?;
            match socket.read(&mut chunk) {
                Ok(0) => {
                    return Err(ConnectionError::ConnectionNotEstablished(
                        "proxy closed the connection".to_string(),
                    ))
                }
                Ok(n) => self.inbox.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(self.inbox.len() >= need)
    }

    fn take_front(&mut self, n: usize) -> Vec<u8> {
        self.inbox.drain(..n).collect()
    }
}

impl SocksSocket for Socks5Socket {
    fn open(&mut self, timeout: Duration) -> Result<(), ConnectionError> {
        let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))?;
        socket.set_read_timeout(Some(timeout))?;
        socket.set_write_timeout(Some(timeout))?;
        socket.set_tcp_nodelay(true)?;
        socket.set_nonblocking(true)?;

        self.outbox.clear();
        self.inbox.clear();
        self.bound = None;
        self.socket = Some(socket);
        Ok(())
    }

    fn connect_proxy(&mut self, proxy: SocketAddrV4) -> io::Result<()> {
        let socket = self
            .socket
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "socket not open"))?;
        socket.connect(&SockAddr::from(proxy))
    }

    fn write_greeting(&mut self) -> Result<(), ConnectionError> {
        let greeting = protocol::encode_greeting(self.credentials.is_some());
        self.queue(&greeting)
    }

    fn read_greeting(&mut self) -> Result<Option<GreetingReply>, ConnectionError> {
        if !self.fill(2)? {
            return Ok(None);
        }
        let reply = self.take_front(2);
        Ok(Some(GreetingReply {
            version: reply[0],
            method: reply[1],
        }))
    }

    fn check_greeting(&self, reply: &GreetingReply) -> Result<(), ConnectionError> {
        if reply.version != SOCKS_VERSION {
            return Err(ConnectionError::Protocol(format!(
                "greeting version {:#04x}, expected 0x05",
                reply.version
            )));
        }
        match reply.method {
            METHOD_NO_AUTH => Ok(()),
            METHOD_USER_PASS if self.credentials.is_some() => Ok(()),
            METHOD_USER_PASS => Err(ConnectionError::Protocol(
                "proxy requires username/password but none is configured".to_string(),
            )),
            METHOD_NO_ACCEPTABLE => Err(ConnectionError::Protocol(
                "proxy accepted none of the offered authentication methods".to_string(),
            )),
            other => Err(ConnectionError::Protocol(format!(
                "proxy selected unoffered method {:#04x}",
                other
            ))),
        }
    }

    fn greeting_requires_auth(&self, reply: &GreetingReply) -> bool {
        reply.method == METHOD_USER_PASS
    }

    fn write_auth(&mut self) -> Result<(), ConnectionError> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            ConnectionError::Protocol("no credentials configured".to_string())
        })?;
        let request = protocol::encode_auth(credentials)?;
        debug!(username = %credentials.username, "Sending SOCKS5 credentials");
        self.queue(&request)
    }

    fn read_auth_status(&mut self) -> Result<Option<bool>, ConnectionError> {
        if !self.fill(2)? {
            return Ok(None);
        }
        let status = self.take_front(2);
        if status[0] != AUTH_VERSION {
            return Err(ConnectionError::Protocol(format!(
                "auth reply version {:#04x}, expected 0x01",
                status[0]
            )));
        }
        Ok(Some(status[1] == 0))
    }

    fn connect_target(&mut self, host: &str, port: u16) -> Result<(), ConnectionError> {
        let request = protocol::encode_connect(host, port)?;
        self.queue(&request)
    }

    fn read_connect_status(&mut self) -> Result<Option<bool>, ConnectionError> {
        loop {
            if let Some((reply, used)) = protocol::parse_connect_reply(&self.inbox)? {
                self.inbox.drain(..used);
                if !reply.succeeded() {
                    warn!(
                        code = reply.reply,
                        reason = protocol::reply_name(reply.reply),
                        "SOCKS5 CONNECT refused"
                    );
                    return Ok(Some(false));
                }
                debug!(bound = %reply.bound, "SOCKS5 CONNECT accepted");
                self.bound = Some(reply.bound);
                return Ok(Some(true));
            }

            let before = self.inbox.len();
            self.fill(before + 1)?;
            if self.inbox.len() == before {
                return Ok(None);
            }
        }
    }

    fn close(&mut self) {
        if self.socket.take().is_some() {
            debug!("SOCKS5 socket closed");
        }
        self.outbox.clear();
        self.inbox.clear();
    }

    fn is_open(&self) -> bool {
        self.socket.is_some()
    }
}
