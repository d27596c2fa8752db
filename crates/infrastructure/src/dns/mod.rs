pub mod cache;
pub mod forwarding;
pub mod resolver;
pub mod wire;

pub use cache::{CachedHost, InMemoryDnsCache, DEFAULT_CACHE_TTL_SECS};
pub use forwarding::{BuiltQuery, MessageBuilder};
pub use resolver::{DatagramSocket, UdpDatagram, UdpResolverFactory, UdpStubResolver};
pub use wire::{DnsMessageDecoder, DnsWireReader};
