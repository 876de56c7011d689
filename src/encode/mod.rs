//! Byte-level encoding and container sinks.
//!
//! The bitmap codec turns pixel buffers into payloads; sinks consume payloads in frame order.

/// 32-bit uncompressed bitmap codec.
pub mod bitmap;
/// Sink writing one bitmap file per frame.
pub mod bmp_dir;
/// `ffmpeg`-based video sink.
pub mod ffmpeg;
/// Explicit byte-order primitive writers.
pub mod primitive;
/// Container sink trait and the in-memory sink.
pub mod sink;
