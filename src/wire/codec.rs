use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

pub const BYTES_PER_SAMPLE: usize = 4;

/// Serialize samples as concatenated 4-byte big-endian floats, in order,
/// with no header or framing.
pub fn encode_samples(samples: &[f32]) -> Vec<u8> {
    let mut wtr = Vec::with_capacity(samples.len() * BYTES_PER_SAMPLE);
    for &sample in samples {
        // Writing into a Vec cannot fail on small writes
        wtr.write_f32::<BigEndian>(sample).unwrap();
    }
    wtr
}

/// Decode `len / 4` samples from a wire buffer. A trailing partial sample
/// is ignored; consumers sized in bytes get `4 * (len / 4)` bytes' worth.
pub fn decode_samples(bytes: &[u8]) -> std::io::Result<Vec<f32>> {
    let n_samples = bytes.len() / BYTES_PER_SAMPLE;
    let mut rdr = Cursor::new(bytes);
    let mut samples = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        samples.push(rdr.read_f32::<BigEndian>()?);
    }
    Ok(samples)
}
