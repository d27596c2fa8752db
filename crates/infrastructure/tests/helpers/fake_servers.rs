#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, TcpListener, UdpSocket};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// Loopback UDP server answering up to `expected` queries with the datagrams
/// `respond(query)` returns. The join handle yields every query it received.
pub fn spawn_dns_server<F>(expected: usize, respond: F) -> (SocketAddr, JoinHandle<Vec<Vec<u8>>>)
where
    F: Fn(&[u8]) -> Vec<Vec<u8>> + Send + 'static,
{
    spawn_dns_server_idle(expected, IO_TIMEOUT, respond)
}

/// Same as [`spawn_dns_server`], giving up once no query arrived for `idle`.
pub fn spawn_dns_server_idle<F>(
    expected: usize,
    idle: Duration,
    respond: F,
) -> (SocketAddr, JoinHandle<Vec<Vec<u8>>>)
where
    F: Fn(&[u8]) -> Vec<Vec<u8>> + Send + 'static,
{
    let socket = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).expect("bind fake DNS server");
    socket.set_read_timeout(Some(idle)).expect("set read timeout");
    let addr = socket.local_addr().expect("local addr");

    let handle = thread::spawn(move || {
        let mut received = Vec::new();
        let mut buf = [0u8; 512];
        while received.len() < expected {
            let (len, peer) = match socket.recv_from(&mut buf) {
                Ok(r) => r,
                Err(_) => break,
            };
            let query = buf[..len].to_vec();
            for reply in respond(&query) {
                let _ = socket.send_to(&reply, peer);
            }
            received.push(query);
        }
        received
    });

    (addr, handle)
}

/// Query id of a DNS message.
pub fn query_id(query: &[u8]) -> u16 {
    u16::from_be_bytes([query[0], query[1]])
}

/// What the fake proxy answers at each step.
#[derive(Debug, Clone)]
pub struct ProxyScript {
    pub method: u8,
    pub auth_status: u8,
    pub reply: u8,
    /// Written right after a successful CONNECT reply.
    pub tunnel_payload: Vec<u8>,
}

impl ProxyScript {
    pub fn no_auth() -> Self {
        Self {
            method: 0x00,
            auth_status: 0x00,
            reply: 0x00,
            tunnel_payload: Vec::new(),
        }
    }

    pub fn user_pass() -> Self {
        Self {
            method: 0x02,
            ..Self::no_auth()
        }
    }
}

/// Raw client messages the fake proxy read.
#[derive(Debug, Default, Clone)]
pub struct ProxyTranscript {
    pub greeting: Vec<u8>,
    pub auth: Option<Vec<u8>>,
    pub connect: Option<Vec<u8>>,
}

/// Loopback SOCKS5 proxy serving a single client with `script`.
pub fn spawn_socks_proxy(script: ProxyScript) -> (SocketAddrV4, JoinHandle<ProxyTranscript>) {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).expect("bind fake proxy");
    let addr = match listener.local_addr().expect("local addr") {
        SocketAddr::V4(v4) => v4,
        SocketAddr::V6(_) => unreachable!("bound to an IPv4 address"),
    };

    let handle = thread::spawn(move || {
        let mut transcript = ProxyTranscript::default();
        let (mut stream, _) = match listener.accept() {
            Ok(conn) => conn,
            Err(_) => return transcript,
        };
        stream.set_read_timeout(Some(IO_TIMEOUT)).expect("set read timeout");

        let mut head = [0u8; 2];
        if stream.read_exact(&mut head).is_err() {
            return transcript;
        }
        let mut methods = vec![0u8; head[1] as usize];
        if stream.read_exact(&mut methods).is_err() {
            return transcript;
        }
        transcript.greeting = [head.to_vec(), methods].concat();
        let _ = stream.write_all(&[0x05, script.method]);
        if script.method == 0xFF {
            return transcript;
        }

        if script.method == 0x02 {
            let auth = match read_auth(&mut stream) {
                Some(auth) => auth,
                None => return transcript,
            };
            transcript.auth = Some(auth);
            let _ = stream.write_all(&[0x01, script.auth_status]);
            if script.auth_status != 0 {
                return transcript;
            }
        }

        let request = match read_connect(&mut stream) {
            Some(request) => request,
            None => return transcript,
        };
        transcript.connect = Some(request);
        let mut reply = vec![0x05, script.reply, 0x00, 0x01, 127, 0, 0, 1, 0x1F, 0x90];
        if script.reply == 0 {
            reply.extend_from_slice(&script.tunnel_payload);
        }
        let _ = stream.write_all(&reply);

        // hold the connection until the client is done with it
        let mut sink = [0u8; 64];
        let _ = stream.read(&mut sink);
        transcript
    });

    (addr, handle)
}

fn read_auth(stream: &mut impl Read) -> Option<Vec<u8>> {
    let mut out = vec![0u8; 2];
    stream.read_exact(&mut out).ok()?;
    let mut user = vec![0u8; out[1] as usize];
    stream.read_exact(&mut user).ok()?;
    out.extend_from_slice(&user);

    let mut plen = [0u8; 1];
    stream.read_exact(&mut plen).ok()?;
    out.push(plen[0]);
    let mut pass = vec![0u8; plen[0] as usize];
    stream.read_exact(&mut pass).ok()?;
    out.extend_from_slice(&pass);
    Some(out)
}

fn read_connect(stream: &mut impl Read) -> Option<Vec<u8>> {
    let mut out = vec![0u8; 4];
    stream.read_exact(&mut out).ok()?;
    let addr_len = match out[3] {
        0x01 => 4,
        0x04 => 16,
        0x03 => {
            let mut len = [0u8; 1];
            stream.read_exact(&mut len).ok()?;
            out.push(len[0]);
            len[0] as usize
        }
        _ => return None,
    };
    let mut rest = vec![0u8; addr_len + 2];
    stream.read_exact(&mut rest).ok()?;
    out.extend_from_slice(&rest);
    Some(out)
}
