#![allow(dead_code)]

mod fake_servers;
mod wire;

pub use fake_servers::*;
pub use wire::*;
