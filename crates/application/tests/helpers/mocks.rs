#![allow(dead_code)]

use ferrous_socks_application::ports::{
    Clock, DnsCachePort, GreetingReply, NameResolver, ResolverFactory, SocksSocket,
};
use ferrous_socks_domain::{
    ConnectionError, DnsRecord, DnsResponse, DnsServerAddr, RecordData, RecordType, ResolverError,
    Section,
};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ── Clock ──────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    pub fn at_secs(secs: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(secs * 1000),
        }
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance_ms(secs * 1000);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

// ── DNS cache ──────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockDnsCache {
    entries: Mutex<HashMap<String, (Ipv4Addr, u64)>>,
    ttl_secs: u64,
}

impl MockDnsCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl_secs: 300,
        }
    }

    pub fn seed(&self, hostname: &str, ip: Ipv4Addr, now_secs: u64) {
        self.insert(hostname, ip, now_secs);
    }

    pub fn get(&self, hostname: &str) -> Option<Ipv4Addr> {
        self.entries
            .lock()
            .unwrap()
            .get(hostname)
            .map(|(ip, _)| *ip)
    }
}

impl DnsCachePort for MockDnsCache {
    fn lookup(&self, hostname: &str, now_secs: u64) -> Option<Ipv4Addr> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(hostname) {
            Some((ip, stored_at)) if now_secs.saturating_sub(*stored_at) < self.ttl_secs => {
                Some(*ip)
            }
            Some(_) => {
                entries.remove(hostname);
                None
            }
            None => None,
        }
    }

    fn insert(&self, hostname: &str, ipv4: Ipv4Addr, now_secs: u64) {
        self.entries
            .lock()
            .unwrap()
            .insert(hostname.to_string(), (ipv4, now_secs));
    }

    fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

// ── Resolver ───────────────────────────────────────────────────────────────

/// Shared script and call log for every resolver a factory hands out.
#[derive(Default)]
pub struct ResolverScript {
    pub outcomes: VecDeque<Option<Result<DnsResponse, ResolverError>>>,
    pub queries: Vec<(String, RecordType)>,
    pub created: usize,
    pub cancelled: usize,
    pub create_error: Option<ResolverError>,
}

pub struct MockResolver {
    script: Arc<Mutex<ResolverScript>>,
    outstanding: bool,
}

impl NameResolver for MockResolver {
    fn query(&mut self, name: &str, record_type: RecordType) -> Result<(), ResolverError> {
        if self.outstanding {
            return Ok(());
        }
        self.outstanding = true;
        self.script
            .lock()
            .unwrap()
            .queries
            .push((name.to_string(), record_type));
        Ok(())
    }

    fn poll(&mut self) -> Option<Result<DnsResponse, ResolverError>> {
        let outcome = self.script.lock().unwrap().outcomes.pop_front().flatten();
        if outcome.is_some() {
            self.outstanding = false;
        }
        outcome
    }

    fn cancel(&mut self) -> Option<ResolverError> {
        self.script.lock().unwrap().cancelled += 1;
        if std::mem::replace(&mut self.outstanding, false) {
            Some(ResolverError::Closing)
        } else {
            None
        }
    }
}

#[derive(Clone, Default)]
pub struct MockResolverFactory {
    pub script: Arc<Mutex<ResolverScript>>,
}

impl MockResolverFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the outcome of successive `poll` calls; `None` means nothing arrived.
    pub fn push_outcome(&self, outcome: Option<Result<DnsResponse, ResolverError>>) {
        self.script.lock().unwrap().outcomes.push_back(outcome);
    }

    pub fn fail_create(&self, error: ResolverError) {
        self.script.lock().unwrap().create_error = Some(error);
    }

    pub fn created(&self) -> usize {
        self.script.lock().unwrap().created
    }

    pub fn cancelled(&self) -> usize {
        self.script.lock().unwrap().cancelled
    }

    pub fn queries(&self) -> Vec<(String, RecordType)> {
        self.script.lock().unwrap().queries.clone()
    }
}

impl ResolverFactory for MockResolverFactory {
    fn create(&self, _server: &DnsServerAddr) -> Result<Box<dyn NameResolver>, ResolverError> {
        let mut script = self.script.lock().unwrap();
        if let Some(err) = script.create_error.clone() {
            return Err(err);
        }
        script.created += 1;
        Ok(Box::new(MockResolver {
            script: Arc::clone(&self.script),
            outstanding: false,
        }))
    }
}

pub fn a_response(name: &str, ip: Ipv4Addr) -> DnsResponse {
    let mut response = DnsResponse::default();
    response.flags.is_response = true;
    response.answer_count = 1;
    response.add_record(
        DnsRecord::new(name.to_string(), 1, 1, 300, RecordData::A(ip)),
        Section::Answer,
    );
    response
}

pub fn cname_only_response(name: &str, target: &str) -> DnsResponse {
    let mut response = DnsResponse::default();
    response.flags.is_response = true;
    response.answer_count = 1;
    response.add_record(
        DnsRecord::new(
            name.to_string(),
            5,
            1,
            300,
            RecordData::Cname(target.to_string()),
        ),
        Section::Answer,
    );
    response
}

// ── SOCKS socket ───────────────────────────────────────────────────────────

pub const NO_AUTH: u8 = 0x00;
pub const USER_PASS: u8 = 0x02;

/// Scripted socket. Each `read_*` pops the next queued reply; an empty queue
/// means the reply has not arrived yet.
#[derive(Default)]
pub struct MockSocksSocket {
    pub calls: Vec<&'static str>,
    pub connect_results: VecDeque<io::Result<()>>,
    pub connected_to: Option<SocketAddrV4>,
    pub greetings: VecDeque<GreetingReply>,
    pub auth_statuses: VecDeque<bool>,
    pub connect_statuses: VecDeque<bool>,
    pub target: Option<(String, u16)>,
    pub open: bool,
}

impl MockSocksSocket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Proxy that connects at once, offers no-auth and accepts the CONNECT.
    pub fn happy(method: u8) -> Self {
        let mut socket = Self::new();
        socket.greetings.push_back(GreetingReply { version: 5, method });
        if method == USER_PASS {
            socket.auth_statuses.push_back(true);
        }
        socket.connect_statuses.push_back(true);
        socket
    }

    pub fn called(&self, name: &str) -> bool {
        self.calls.contains(&name)
    }
}

impl SocksSocket for MockSocksSocket {
    fn open(&mut self, _timeout: Duration) -> Result<(), ConnectionError> {
        self.calls.push("open");
        self.open = true;
        Ok(())
    }

    fn connect_proxy(&mut self, proxy: SocketAddrV4) -> io::Result<()> {
        self.calls.push("connect_proxy");
        self.connected_to = Some(proxy);
        self.connect_results.pop_front().unwrap_or(Ok(()))
    }

    fn write_greeting(&mut self) -> Result<(), ConnectionError> {
        self.calls.push("write_greeting");
        Ok(())
    }

    fn read_greeting(&mut self) -> Result<Option<GreetingReply>, ConnectionError> {
        self.calls.push("read_greeting");
        Ok(self.greetings.pop_front())
    }

    fn check_greeting(&self, reply: &GreetingReply) -> Result<(), ConnectionError> {
        if reply.version != 5 || (reply.method != NO_AUTH && reply.method != USER_PASS) {
            return Err(ConnectionError::Protocol(format!(
                "unexpected greeting {:?}",
                reply
            )));
        }
        Ok(())
    }

    fn greeting_requires_auth(&self, reply: &GreetingReply) -> bool {
        reply.method == USER_PASS
    }

    fn write_auth(&mut self) -> Result<(), ConnectionError> {
        self.calls.push("write_auth");
        Ok(())
    }

    fn read_auth_status(&mut self) -> Result<Option<bool>, ConnectionError> {
        self.calls.push("read_auth_status");
        Ok(self.auth_statuses.pop_front())
    }

    fn connect_target(&mut self, host: &str, port: u16) -> Result<(), ConnectionError> {
        self.calls.push("connect_target");
        self.target = Some((host.to_string(), port));
        Ok(())
    }

    fn read_connect_status(&mut self) -> Result<Option<bool>, ConnectionError> {
        self.calls.push("read_connect_status");
        Ok(self.connect_statuses.pop_front())
    }

    fn close(&mut self) {
        self.calls.push("close");
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }
}
