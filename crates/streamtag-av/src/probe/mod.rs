//! Stream probing backed by external tools.

pub mod ffprobe;

pub use self::ffprobe::{parse_streams, FfprobeProber};
