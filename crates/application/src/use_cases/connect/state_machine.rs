use super::{ConnectOptions, StepStuckGuard};
use crate::ports::{Clock, DnsCachePort, NameResolver, ResolverFactory, SocksSocket};
use ferrous_socks_domain::{ConnectionError, ConnectionState, Proxy, RecordType};
use std::io;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectProgress {
    Pending,
    Connected,
}

fn classify_connect(result: io::Result<()>) -> io::Result<ConnectProgress> {
    match result {
        Ok(()) => Ok(ConnectProgress::Connected),
        Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(ConnectProgress::Pending),
        Err(e) => match e.raw_os_error() {
            Some(code) if code == libc::EINPROGRESS || code == libc::EALREADY => {
                Ok(ConnectProgress::Pending)
            }
            Some(code) if code == libc::EISCONN => Ok(ConnectProgress::Connected),
            _ => Err(e),
        },
    }
}

/// Drives one tunnel through a SOCKS5 proxy, one unit of work per `poll`.
///
/// The proxy host is resolved without DNS when it is an IPv4 literal,
/// `localhost`, or already cached; otherwise a stub resolver is created for the
/// duration of the lookup and its answer is written back to the shared cache.
pub struct ConnectionStateMachine<S: SocksSocket> {
    socket: S,
    proxy: Proxy,
    target_host: String,
    target_port: u16,
    options: ConnectOptions,
    cache: Arc<dyn DnsCachePort>,
    resolvers: Arc<dyn ResolverFactory>,
    clock: Arc<dyn Clock>,
    resolver: Option<Box<dyn NameResolver>>,
    query_sent: bool,
    guard: StepStuckGuard,
    ready: bool,
}

impl<S: SocksSocket> ConnectionStateMachine<S> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        socket: S,
        proxy: Proxy,
        target_host: impl Into<String>,
        target_port: u16,
        options: ConnectOptions,
        cache: Arc<dyn DnsCachePort>,
        resolvers: Arc<dyn ResolverFactory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let guard = StepStuckGuard::new(options.step_timeout, clock.now_millis());
        Self {
            socket,
            proxy,
            target_host: target_host.into(),
            target_port,
            options,
            cache,
            resolvers,
            clock,
            resolver: None,
            query_sent: false,
            guard,
            ready: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.guard.step()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn proxy(&self) -> &Proxy {
        &self.proxy
    }

    pub fn target_host(&self) -> &str {
        &self.target_host
    }

    pub fn target_port(&self) -> u16 {
        self.target_port
    }

    pub fn socket(&self) -> &S {
        &self.socket
    }

    /// Hands over the socket, typically once the machine is ready.
    pub fn into_socket(self) -> S {
        self.socket
    }

    /// Runs the current step. Errors are fatal: the caller should `stop()`
    /// and not poll again.
    pub fn poll(&mut self) -> Result<(), ConnectionError> {
        if self.state().is_terminal() {
            return Ok(());
        }

        self.run_step()?;

        if let Err(e) = self.guard.check(self.clock.now_millis()) {
            warn!(
                proxy = %self.proxy,
                step = %self.state(),
                error = %e,
                "Connection step stuck, tearing down"
            );
            self.stop();
            return Err(e);
        }

        Ok(())
    }

    /// Releases the socket and any in-flight resolver. Safe in any state.
    pub fn stop(&mut self) {
        if let Some(mut resolver) = self.resolver.take() {
            if let Some(report) = resolver.cancel() {
                debug!(error = %report, "Resolver closed during teardown");
            }
        }
        self.query_sent = false;
        self.socket.close();
        self.ready = false;
    }

    fn advance(&mut self, next: ConnectionState) {
        debug!(
            proxy = %self.proxy,
            from = %self.state(),
            to = %next,
            "Connection step advanced"
        );
        self.guard.set_step(next, self.clock.now_millis());
    }

    fn run_step(&mut self) -> Result<(), ConnectionError> {
        match self.state() {
            ConnectionState::Initial => {
                self.socket.open(self.options.socket_timeout)?;
                if self.resolve_without_dns() {
                    self.advance(ConnectionState::Connect);
                } else {
                    self.advance(ConnectionState::Resolve);
                }
            }
            ConnectionState::Resolve => self.resolve_step()?,
            ConnectionState::Connect => self.connect_step()?,
            ConnectionState::Greeting => {
                if let Some(reply) = self.socket.read_greeting()? {
                    self.socket.check_greeting(&reply)?;
                    if self.socket.greeting_requires_auth(&reply) {
                        self.socket.write_auth()?;
                        self.advance(ConnectionState::Auth);
                    } else {
                        self.advance(ConnectionState::SocketConnect);
                    }
                }
            }
            ConnectionState::Auth => match self.socket.read_auth_status()? {
                Some(true) => self.advance(ConnectionState::SocketConnect),
                Some(false) => {
                    return Err(ConnectionError::ConnectionNotEstablished(format!(
                        "proxy {} rejected the credentials",
                        self.proxy
                    )));
                }
                None => {}
            },
            ConnectionState::SocketConnect => {
                self.socket
                    .connect_target(&self.target_host, self.target_port)?;
                self.advance(ConnectionState::ReadStatus);
            }
            ConnectionState::ReadStatus => match self.socket.read_connect_status()? {
                Some(true) => {
                    self.advance(ConnectionState::Done);
                    self.ready = true;
                    info!(
                        proxy = %self.proxy,
                        destination = %self.target_host,
                        port = self.target_port,
                        "SOCKS5 tunnel established"
                    );
                }
                Some(false) => {
                    return Err(ConnectionError::ConnectionNotEstablished(format!(
                        "proxy {} refused CONNECT to {}:{}",
                        self.proxy, self.target_host, self.target_port
                    )));
                }
                None => {}
            },
            ConnectionState::Done => {}
        }

        Ok(())
    }

    /// Rewrites the proxy host to an IPv4 literal when that needs no query.
    fn resolve_without_dns(&mut self) -> bool {
        if self.proxy.ipv4().is_some() {
            return true;
        }

        if self.proxy.is_localhost() {
            self.proxy.set_server(Ipv4Addr::LOCALHOST.to_string());
            return true;
        }

        let now = self.clock.now_secs();
        if let Some(ip) = self.cache.lookup(self.proxy.server(), now) {
            debug!(host = %self.proxy.server(), ip = %ip, "Proxy host served from DNS cache");
            self.proxy.set_server(ip.to_string());
            return true;
        }

        false
    }

    fn resolve_step(&mut self) -> Result<(), ConnectionError> {
        if self.resolve_without_dns() {
            // Another connection may have filled the cache in the meantime.
            if let Some(mut resolver) = self.resolver.take() {
                resolver.cancel();
            }
            self.query_sent = false;
            self.advance(ConnectionState::Connect);
            return Ok(());
        }

        if self.resolver.is_none() {
            debug!(server = %self.options.dns_server, "Creating stub resolver");
            self.resolver = Some(self.resolvers.create(&self.options.dns_server)?);
        }
        let Some(resolver) = self.resolver.as_mut() else {
            return Ok(());
        };

        let hostname = self.proxy.server().to_string();
        if !self.query_sent {
            resolver.query(&hostname, RecordType::A)?;
            self.query_sent = true;
        }

        let Some(outcome) = resolver.poll() else {
            return Ok(());
        };

        self.resolver = None;
        self.query_sent = false;

        match outcome {
            Ok(response) => {
                let ip = response.first_ipv4().ok_or_else(|| {
                    ConnectionError::ConnectionNotEstablished(format!(
                        "no A record for proxy host {} ({})",
                        hostname,
                        response.flags.rcode_name()
                    ))
                })?;

                self.cache.insert(&hostname, ip, self.clock.now_secs());
                debug!(host = %hostname, ip = %ip, "Proxy host resolved");
                self.proxy.set_server(ip.to_string());
                self.advance(ConnectionState::Connect);
                Ok(())
            }
            Err(e) if e.is_closing() => {
                debug!(host = %hostname, "Resolver reported closing, ignoring");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn connect_step(&mut self) -> Result<(), ConnectionError> {
        let addr = self.proxy.socket_addr().ok_or_else(|| {
            ConnectionError::UnreachableProxy(format!(
                "proxy host {} is not an IPv4 address",
                self.proxy.server()
            ))
        })?;

        match classify_connect(self.socket.connect_proxy(addr)) {
            Ok(ConnectProgress::Pending) => Ok(()),
            Ok(ConnectProgress::Connected) => {
                self.socket.write_greeting()?;
                self.advance(ConnectionState::Greeting);
                Ok(())
            }
            Err(e) => Err(ConnectionError::UnreachableProxy(format!(
                "on connect to {}: {}",
                addr, e
            ))),
        }
    }
}
