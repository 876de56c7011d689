//! Framereel turns a scene of vector assets and per-frame placements into a frame sequence.
//!
//! Each frame is composited on a CPU rasterizer, encoded as an uncompressed 32-bit bitmap and
//! handed to a [`ContainerSink`]:
//!
//! - Build a [`Scene`] in code or load a [`SceneDef`] from JSON
//! - Pick a [`RenderConfig`]
//! - Call [`render_scene`] (or [`render_scene_parallel`]) with a sink
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Bitmap codec, byte-order writers and container sinks.
pub mod encode;
/// Rasterizer contract, CPU backend and frame compositing.
pub mod render;
/// Scene graph and its JSON boundary model.
pub mod scene;
/// Run configuration and the frame sequencer.
pub mod session;

pub use crate::foundation::core::{
    Affine, AssetId, BezPath, Canvas, FrameIndex, Point, Rgba8, Vec2,
};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::encode::bitmap::{BitmapEncoder, BitmapHeader, decode_bitmap};
pub use crate::encode::bmp_dir::BmpSequenceSink;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, VideoCodec};
pub use crate::encode::primitive::PrimitiveWrite;
pub use crate::encode::sink::{ContainerSink, InMemorySink, SinkConfig};
pub use crate::render::backend::{PixelBuffer, Rasterizer};
pub use crate::render::compositor::compose_frame;
pub use crate::render::cpu::CpuRasterizer;
pub use crate::scene::def::SceneDef;
pub use crate::scene::model::{Asset, AssetRender, Frame, Scene};
pub use crate::session::config::{RenderConfig, RenderThreading};
pub use crate::session::sequencer::{
    FrameSequencer, RenderStats, render_scene, render_scene_parallel,
};
