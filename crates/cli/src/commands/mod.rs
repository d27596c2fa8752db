pub mod connect;
pub mod lookup;

use std::time::Duration;

/// Pause between two polls of a non-blocking operation.
pub const POLL_INTERVAL: Duration = Duration::from_millis(5);
