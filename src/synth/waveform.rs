use std::f64::consts::TAU;

use clap::ValueEnum;

/// Shape of the generated signal.
///
/// `PhaseRamp` publishes the raw phase accumulator instead of its sine,
/// which gives a ramp in `[0, sample_rate)`. Useful as a test signal when a
/// consumer needs values it can distinguish sample-by-sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Waveform {
    Sine,
    PhaseRamp,
}

impl Waveform {
    /// Sample value at the given clock tick. Phase math is done in f64 and
    /// narrowed to f32 at the end, matching the wire format.
    pub fn sample(&self, frequency: f64, sample_rate: f64, clock: u64) -> f32 {
        let phase = clock as f64 * frequency * TAU;
        match self {
            Waveform::Sine => (phase / sample_rate).sin() as f32,
            Waveform::PhaseRamp => (phase % sample_rate) as f32,
        }
    }
}
