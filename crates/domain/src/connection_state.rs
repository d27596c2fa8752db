use std::fmt;

/// Steps of establishing a tunnel through the proxy, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ConnectionState {
    #[default]
    Initial,
    Resolve,
    Connect,
    Greeting,
    Auth,
    SocketConnect,
    ReadStatus,
    Done,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Initial => "initial",
            ConnectionState::Resolve => "resolve",
            ConnectionState::Connect => "connect",
            ConnectionState::Greeting => "greeting",
            ConnectionState::Auth => "auth",
            ConnectionState::SocketConnect => "socket_connect",
            ConnectionState::ReadStatus => "read_status",
            ConnectionState::Done => "done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ConnectionState::Done)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
