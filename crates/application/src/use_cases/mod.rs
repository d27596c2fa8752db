pub mod connect;

pub use connect::{ConnectOptions, ConnectionStateMachine, Connector, StepStuckGuard};
