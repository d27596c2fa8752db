mod clock;
mod dns_cache_port;
mod name_resolver;
mod socks_socket;

pub use clock::Clock;
pub use dns_cache_port::DnsCachePort;
pub use name_resolver::{NameResolver, ResolverFactory};
pub use socks_socket::{GreetingReply, SocksSocket};
