pub mod pubsub;
pub mod synth;
pub mod ui;
pub mod utils;
pub mod wire;
