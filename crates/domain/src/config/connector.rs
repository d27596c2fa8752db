use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::proxy::Credentials;

/// How a single proxied connection is driven.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectorConfig {
    /// Longest a single handshake step may go without progress.
    #[serde(default = "default_step_timeout_secs")]
    pub step_timeout_secs: u64,

    /// SO_RCVTIMEO / SO_SNDTIMEO applied to the proxy socket.
    #[serde(default = "default_socket_timeout_secs")]
    pub socket_timeout_secs: u64,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

impl ConnectorConfig {
    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.step_timeout_secs)
    }

    pub fn socket_timeout(&self) -> Duration {
        Duration::from_secs(self.socket_timeout_secs)
    }

    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(Credentials::new(user.clone(), pass.clone())),
            (Some(user), None) => Some(Credentials::new(user.clone(), String::new())),
            _ => None,
        }
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            step_timeout_secs: default_step_timeout_secs(),
            socket_timeout_secs: default_socket_timeout_secs(),
            username: None,
            password: None,
        }
    }
}

fn default_step_timeout_secs() -> u64 {
    10
}

fn default_socket_timeout_secs() -> u64 {
    10
}
