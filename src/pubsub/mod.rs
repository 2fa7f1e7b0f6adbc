/// Pub/sub transport: one interprocess endpoint per logical channel
pub mod publisher;
pub mod subscriber;

pub use publisher::*;
pub use subscriber::*;

use crate::utils::consts::ENDPOINT_PREFIX;

/// Transport endpoint for a logical channel index.
pub fn channel_endpoint(channel: u16) -> String {
    format!("{ENDPOINT_PREFIX}{channel}")
}
