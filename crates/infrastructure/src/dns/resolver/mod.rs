mod datagram;
mod factory;
mod udp;

pub use datagram::{DatagramSocket, UdpDatagram};
pub use factory::UdpResolverFactory;
pub use udp::UdpStubResolver;
