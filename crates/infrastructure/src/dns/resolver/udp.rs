//! Single-exchange DNS stub resolver over UDP (RFC 1035 §4.2.1).
//!
//! One query, one response. The resolver never blocks: `poll` makes a single
//! receive attempt and the caller decides when to try again.

use super::datagram::DatagramSocket;
use crate::dns::forwarding::MessageBuilder;
use crate::dns::wire::DnsMessageDecoder;
use ferrous_socks_application::ports::{Clock, NameResolver};
use ferrous_socks_domain::{DnsResponse, DnsServerAddr, RecordType, ResolverError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Maximum UDP DNS response size accepted
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

#[derive(Debug)]
struct Outstanding {
    id: u16,
    name: String,
    sent_at_ms: u64,
}

pub struct UdpStubResolver<D: DatagramSocket> {
    server: DnsServerAddr,
    socket: Option<D>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
    outstanding: Option<Outstanding>,
}

impl<D: DatagramSocket> UdpStubResolver<D> {
    pub fn new(server: DnsServerAddr, socket: D, clock: Arc<dyn Clock>, timeout: Duration) -> Self {
        Self {
            server,
            socket: Some(socket),
            clock,
            timeout,
            outstanding: None,
        }
    }

    pub fn server(&self) -> &DnsServerAddr {
        &self.server
    }

    pub fn is_outstanding(&self) -> bool {
        self.outstanding.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.socket.is_none()
    }

    fn finish(
        &mut self,
        outcome: Result<DnsResponse, ResolverError>,
    ) -> Option<Result<DnsResponse, ResolverError>> {
        self.outstanding = None;
        self.socket = None;
        Some(outcome)
    }

    fn io_error(&self, err: std::io::Error) -> ResolverError {
        ResolverError::Io {
            server: self.server.to_string(),
            message: err.to_string(),
        }
    }

    fn timed_out(&self, now_ms: u64) -> bool {
        self.outstanding
            .as_ref()
            .is_some_and(|o| now_ms.saturating_sub(o.sent_at_ms) > self.timeout.as_millis() as u64)
    }
}

impl<D: DatagramSocket> NameResolver for UdpStubResolver<D> {
    fn query(&mut self, name: &str, record_type: RecordType) -> Result<(), ResolverError> {
        if self.outstanding.is_some() {
            return Ok(());
        }

        let built = MessageBuilder::build_query(name, &record_type)?;
        let sent = match self.socket.as_mut() {
            Some(socket) => socket.send(&built.bytes),
            None => return Err(ResolverError::Closing),
        };
        let bytes_sent = sent.map_err(|e| self.io_error(e))?;

        debug!(
            server = %self.server,
            name = %name,
            record_type = %record_type,
            id = built.id,
            bytes_sent = bytes_sent,
            "UDP query sent"
        );

        self.outstanding = Some(Outstanding {
            id: built.id,
            name: name.to_string(),
            sent_at_ms: self.clock.now_millis(),
        });
        Ok(())
    }

    fn poll(&mut self) -> Option<Result<DnsResponse, ResolverError>> {
        let expected_id = self.outstanding.as_ref()?.id;
        let socket = self.socket.as_mut()?;

        let mut recv_buf = [0u8; MAX_UDP_RESPONSE_SIZE];
        match socket.try_recv(&mut recv_buf) {
            Ok(Some(len)) => {
                let datagram = &recv_buf[..len];
                let id = (len >= 2).then(|| u16::from_be_bytes([datagram[0], datagram[1]]));
                if id == Some(expected_id) {
                    debug!(
                        server = %self.server,
                        id = expected_id,
                        bytes_received = len,
                        "UDP response received"
                    );
                    let decoded = DnsMessageDecoder::decode(datagram).map_err(ResolverError::from);
                    return self.finish(decoded);
                }
                warn!(
                    server = %self.server,
                    expected = expected_id,
                    received = ?id,
                    "Dropping DNS datagram with unexpected id"
                );
            }
            Ok(None) => {}
            Err(e) => {
                let err = self.io_error(e);
                return self.finish(Err(err));
            }
        }

        if self.timed_out(self.clock.now_millis()) {
            if let Some(o) = self.outstanding.as_ref() {
                debug!(server = %self.server, name = %o.name, "DNS query timed out");
            }
            let err = ResolverError::Timeout {
                server: self.server.to_string(),
            };
            return self.finish(Err(err));
        }

        None
    }

    fn cancel(&mut self) -> Option<ResolverError> {
        self.socket = None;
        self.outstanding.take().map(|_| ResolverError::Closing)
    }
}
