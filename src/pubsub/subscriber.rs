use std::error::Error;
use std::time::Duration;

use tracing::info;

use crate::pubsub::channel_endpoint;
use crate::wire;

/// Consumer side of a channel: connects, subscribes to everything, and
/// decodes raw buffers back into samples.
pub struct Subscriber {
    socket: zmq::Socket,
}

impl Subscriber {
    pub fn connect(channel: u16) -> zmq::Result<Self> {
        let ctx = zmq::Context::new();
        let socket = ctx.socket(zmq::SUB)?;
        socket.set_subscribe(b"")?;
        let endpoint = channel_endpoint(channel);
        socket.connect(&endpoint)?;
        info!("channel {}: listening on {}", channel, endpoint);
        Ok(Self { socket })
    }

    /// Bound how long `recv_*` blocks. Without this the subscriber waits
    /// forever, like the original consumer did.
    pub fn set_timeout(&self, timeout: Duration) -> zmq::Result<()> {
        self.socket.set_rcvtimeo(timeout.as_millis() as i32)
    }

    /// Receive one raw wire buffer.
    pub fn recv_bytes(&self) -> zmq::Result<Vec<u8>> {
        self.socket.recv_bytes(0)
    }

    /// Receive one buffer and decode it to samples.
    pub fn recv_samples(&self) -> Result<Vec<f32>, Box<dyn Error>> {
        let bytes = self.recv_bytes()?;
        Ok(wire::decode_samples(&bytes)?)
    }
}
