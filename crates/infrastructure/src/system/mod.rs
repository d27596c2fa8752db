pub mod clock;
pub mod resolv_conf;

pub use clock::SystemClock;
pub use resolv_conf::{discover_dns_server, ResolvConfReader};
