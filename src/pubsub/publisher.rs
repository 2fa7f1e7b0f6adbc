use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use tracing::{debug, info, warn};

use crate::pubsub::channel_endpoint;
use crate::synth::{ToneGenerator, Waveform};
use crate::utils::consts::{
    BUFFER_SAMPLES, PACING_MARGIN, SAMPLE_RATE, SUBSCRIBE_WAIT_MS, WARMUP_MS,
};

/// Poll granularity while waiting for a subscriber, so a shutdown signal
/// does not have to wait out the whole handshake timeout
const READY_POLL_SLICE: Duration = Duration::from_millis(50);

/// How the publisher decides its channel is ready for the first buffer.
#[derive(Debug, Clone, Copy)]
pub enum Readiness {
    /// Fixed sleep before the first publish. zmq drops anything sent before
    /// a subscriber's pipe is attached, so this is the minimum courtesy a
    /// short-lived publisher can extend.
    WarmupSleep(Duration),
    /// Block until the first subscription event reaches the XPUB socket,
    /// falling back to the fixed warm-up sleep after `timeout`.
    AwaitSubscriber { timeout: Duration },
}

/// When the publish loop ends.
#[derive(Debug, Clone, Copy)]
pub enum StopCondition {
    /// Publish for a wall-clock duration.
    Duration(Duration),
    /// Publish a fixed number of buffers.
    Buffers(u64),
    /// Publish a single buffer.
    Once,
}

/// Configuration for one publishing channel
pub struct PublisherConfig {
    pub frequency: f32,
    pub sample_rate: u32,
    pub buffer_samples: usize,
    pub waveform: Waveform,
    pub readiness: Readiness,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            frequency: 440.0,
            sample_rate: SAMPLE_RATE,
            buffer_samples: BUFFER_SAMPLES,
            waveform: Waveform::Sine,
            readiness: Readiness::AwaitSubscriber {
                timeout: Duration::from_millis(SUBSCRIBE_WAIT_MS),
            },
        }
    }
}

/// Publishes generated tone buffers on one channel endpoint.
///
/// XPUB rather than PUB so subscription events flow back upstream and the
/// readiness handshake can block on the first subscriber instead of
/// guessing with a sleep.
pub struct Publisher {
    config: PublisherConfig,
    channel: u16,
    socket: zmq::Socket,
}

impl Publisher {
    /// Bind the channel endpoint. Each publisher owns its own zmq context,
    /// so channels stay fully independent of each other.
    pub fn bind(channel: u16, config: PublisherConfig) -> zmq::Result<Self> {
        let ctx = zmq::Context::new();
        let socket = ctx.socket(zmq::XPUB)?;
        let endpoint = channel_endpoint(channel);
        socket.bind(&endpoint)?;
        info!(
            "channel {}: sending {} Hz {:?} on {}",
            channel, config.frequency, config.waveform, endpoint
        );
        Ok(Self {
            config,
            channel,
            socket,
        })
    }

    /// Buffers the loop is expected to emit under `stop`; the estimate for
    /// a duration stop is the cadence rate times the wall-clock budget.
    pub fn planned_buffers(&self, stop: StopCondition) -> u64 {
        match stop {
            StopCondition::Once => 1,
            StopCondition::Buffers(n) => n,
            StopCondition::Duration(d) => (d.as_secs_f64() * self.buffers_per_sec()).ceil() as u64,
        }
    }

    fn buffers_per_sec(&self) -> f64 {
        self.config.sample_rate as f64 / self.config.buffer_samples as f64 + PACING_MARGIN
    }

    /// Sleep between buffers, slightly faster than real-time playback so
    /// the consumer never starves.
    fn cadence(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.buffers_per_sec())
    }

    /// Block until the first buffer can plausibly be delivered. Returns
    /// false if `shutdown` fired during the wait.
    fn wait_ready(&self, shutdown: Option<&Receiver<()>>) -> zmq::Result<bool> {
        match self.config.readiness {
            Readiness::WarmupSleep(warmup) => Ok(!sleep_interruptible(warmup, shutdown)),
            Readiness::AwaitSubscriber { timeout } => {
                let deadline = Instant::now() + timeout;
                loop {
                    if interrupted(shutdown) {
                        return Ok(false);
                    }
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        warn!(
                            "channel {}: no subscriber within {:?}, publishing after {} ms warm-up",
                            self.channel, timeout, WARMUP_MS
                        );
                        return Ok(!sleep_interruptible(
                            Duration::from_millis(WARMUP_MS),
                            shutdown,
                        ));
                    }
                    let slice = remaining.min(READY_POLL_SLICE);
                    let events = self
                        .socket
                        .poll(zmq::POLLIN, slice.as_millis() as i64)?;
                    if events > 0 {
                        // XPUB delivers subscriptions as 0x01-prefixed frames
                        let event = self.socket.recv_bytes(0)?;
                        debug!(
                            "channel {}: subscriber attached (event {:02x?})",
                            self.channel,
                            event.first()
                        );
                        return Ok(true);
                    }
                }
            }
        }
    }

    /// Run the publish loop until `stop` is reached or `shutdown` fires.
    /// `on_buffer` is called with the running count after each publish.
    /// Returns the number of buffers published.
    pub fn run(
        &self,
        stop: StopCondition,
        shutdown: Option<&Receiver<()>>,
        mut on_buffer: impl FnMut(u64),
    ) -> zmq::Result<u64> {
        let mut generator = ToneGenerator::new(
            self.config.waveform,
            self.config.frequency,
            self.config.sample_rate,
        );
        if !self.wait_ready(shutdown)? {
            info!("channel {}: interrupted before the first publish", self.channel);
            return Ok(0);
        }

        let cadence = self.cadence();
        let started = Instant::now();
        let mut sent = 0u64;
        loop {
            let buffer = generator.generate_bytes(self.config.buffer_samples);
            self.socket.send(buffer, 0)?;
            sent += 1;
            on_buffer(sent);

            let done = match stop {
                StopCondition::Once => true,
                StopCondition::Buffers(n) => sent >= n,
                StopCondition::Duration(d) => started.elapsed() >= d,
            };
            if done {
                break;
            }
            if sleep_interruptible(cadence, shutdown) {
                info!("channel {}: interrupted", self.channel);
                break;
            }
        }

        debug!(
            "channel {}: published {} buffers ({} samples)",
            self.channel,
            sent,
            generator.clock()
        );
        Ok(sent)
    }
}

fn interrupted(shutdown: Option<&Receiver<()>>) -> bool {
    shutdown.is_some_and(|rx| rx.try_recv().is_ok())
}

/// Sleep for `total`, waking early if `shutdown` fires. Returns true when
/// the sleep was cut short.
fn sleep_interruptible(total: Duration, shutdown: Option<&Receiver<()>>) -> bool {
    match shutdown {
        None => {
            std::thread::sleep(total);
            false
        }
        Some(rx) => rx.recv_timeout(total).is_ok(),
    }
}
