pub mod protocol;
mod socks5_socket;

pub use protocol::{BoundAddr, ConnectReply};
pub use socks5_socket::Socks5Socket;
