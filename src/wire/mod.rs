/// Wire format: headerless concatenated big-endian IEEE-754 f32 samples
pub mod codec;

pub use codec::*;
