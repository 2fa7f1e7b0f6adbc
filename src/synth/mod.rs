/// Tone synthesis: waveform strategies and the sample-clocked generator
pub mod generator;
pub mod waveform;

pub use generator::*;
pub use waveform::*;
