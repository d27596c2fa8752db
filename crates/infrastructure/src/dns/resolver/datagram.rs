use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{SocketAddr, UdpSocket};

/// Connected, non-blocking datagram endpoint the stub resolver talks through.
pub trait DatagramSocket: Send {
    fn send(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// One receive attempt. `Ok(None)` when nothing is queued.
    fn try_recv(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>>;
}

/// UDP socket bound to an ephemeral port and connected to one DNS server.
#[derive(Debug)]
pub struct UdpDatagram {
    socket: UdpSocket,
}

impl UdpDatagram {
    pub fn connect(server: SocketAddr) -> io::Result<Self> {
        let domain = if server.is_ipv4() {
            Domain::IPV4
        } else {
            Domain::IPV6
        };

        let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;

        let bind_addr: SocketAddr = if server.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };

        socket.bind(&bind_addr.into())?;
        socket.connect(&server.into())?;
        socket.set_nonblocking(true)?;

        Ok(Self {
            socket: socket.into(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl DatagramSocket for UdpDatagram {
    fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.socket.send(buf)
    }

    fn try_recv(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>> {
        match self.socket.recv(buf) {
            Ok(n) => Ok(Some(n)),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }
}
