//! Ferrous SOCKS Infrastructure Layer
pub mod dns;
pub mod socks;
pub mod system;
