/// Log level (overridable via RUST_LOG)
pub const LOG_LEVEL: &str = "info";

/// Sample rate (Hz)
pub const SAMPLE_RATE: u32 = 48000;

/// Samples per published buffer
pub const BUFFER_SAMPLES: usize = 2048;

/// Filesystem namespace for channel endpoints
pub const ENDPOINT_PREFIX: &str = "ipc:///tmp/.psynth.";

/// Warm-up before the first publish when no subscriber handshake happens
/// (ms). zmq silently drops messages sent before a subscriber's pipe is
/// attached, so short-lived publishers need this grace period.
pub const WARMUP_MS: u64 = 250;

/// How long to wait for the first subscription event before falling back
/// to the fixed warm-up sleep (ms)
pub const SUBSCRIBE_WAIT_MS: u64 = 5000;

/// Extra buffers per second folded into the publish cadence, keeps the
/// publisher slightly ahead of real-time playback
pub const PACING_MARGIN: f64 = 10.0;
