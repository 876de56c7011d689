use crate::encode::bitmap::BitmapEncoder;
use crate::encode::sink::{ContainerSink, SinkConfig};
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::backend::Rasterizer;
use crate::render::compositor::compose_frame;
use crate::scene::model::Scene;
use crate::session::config::{RenderConfig, RenderThreading};
use rayon::prelude::*;

/// Counters reported by a completed run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames the run was asked to produce (after `max_frames`).
    pub frames_total: u64,
    /// Frames handed to the sink.
    pub frames_written: u64,
    /// Payload bytes handed to the sink.
    pub bytes_written: u64,
}

/// Drives compositing and encoding across a scene's frames and feeds the sink.
///
/// Frames are emitted in declared order. The sink is opened once and closed exactly once on
/// every exit path; the first failing frame stops the run and its error is returned after the
/// sink is closed.
pub struct FrameSequencer<'a> {
    scene: &'a Scene,
    config: RenderConfig,
    canvas: Canvas,
    encoder: BitmapEncoder,
}

impl<'a> FrameSequencer<'a> {
    /// Validate `config` and prepare a run over `scene`.
    pub fn new(scene: &'a Scene, config: RenderConfig) -> ReelResult<Self> {
        config.validate()?;
        let canvas = config.canvas()?;
        Ok(Self {
            scene,
            config,
            canvas,
            encoder: BitmapEncoder::new(),
        })
    }

    /// Replace the bitmap encoder used for every frame.
    pub fn with_encoder(mut self, encoder: BitmapEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    fn sink_config(&self) -> SinkConfig {
        SinkConfig {
            width: self.canvas.width,
            height: self.canvas.height,
            fps: self.config.fps,
        }
    }

    fn frame_count(&self) -> usize {
        self.config.frame_limit(self.scene.frames().len())
    }

    /// Composite and encode frame `index` into a bitmap payload.
    pub fn produce_payload(
        &self,
        index: usize,
        rasterizer: &mut dyn Rasterizer,
    ) -> ReelResult<Vec<u8>> {
        let idx = FrameIndex(index as u64);
        let frame = self
            .scene
            .frames()
            .get(index)
            .ok_or_else(|| ReelError::validation(format!("scene has no frame {idx}")))?;
        let pixels = compose_frame(self.scene, frame, idx, self.canvas, rasterizer)
            .map_err(|e| e.at_frame(idx))?;
        self.encoder.encode(&pixels).map_err(|e| e.at_frame(idx))
    }

    /// Render every frame sequentially into `sink`.
    #[tracing::instrument(skip_all, fields(frames = self.frame_count()))]
    pub fn run(
        &self,
        rasterizer: &mut dyn Rasterizer,
        sink: &mut dyn ContainerSink,
    ) -> ReelResult<RenderStats> {
        let mut stats = RenderStats {
            frames_total: self.frame_count() as u64,
            ..RenderStats::default()
        };

        let outcome = sink.open(self.sink_config()).and_then(|()| {
            for index in 0..self.frame_count() {
                let payload = self.produce_payload(index, rasterizer)?;
                emit(sink, index, &payload, &mut stats)?;
            }
            Ok(())
        });

        finish_run(sink, outcome)?;
        tracing::info!(
            frames = stats.frames_written,
            bytes = stats.bytes_written,
            "render complete"
        );
        Ok(stats)
    }

    /// Render with compositing and encoding spread over a rayon pool.
    ///
    /// Frames are produced in chunks of `threading.chunk_size`, one rasterizer per worker from
    /// `make_rasterizer`. Each chunk is emitted in declared order before the next one starts,
    /// and emission stops at the first failed frame, exactly like [`FrameSequencer::run`].
    #[tracing::instrument(skip_all, fields(frames = self.frame_count()))]
    pub fn run_parallel<R, F>(
        &self,
        threading: &RenderThreading,
        make_rasterizer: F,
        sink: &mut dyn ContainerSink,
    ) -> ReelResult<RenderStats>
    where
        R: Rasterizer,
        F: Fn() -> R + Sync + Send,
    {
        let pool = build_thread_pool(threading.threads)?;
        let chunk_size = threading.chunk_size.max(1);
        let total = self.frame_count();
        let mut stats = RenderStats {
            frames_total: total as u64,
            ..RenderStats::default()
        };

        let outcome = sink.open(self.sink_config()).and_then(|()| {
            let mut chunk_start = 0usize;
            while chunk_start < total {
                let chunk_end = (chunk_start + chunk_size).min(total);
                let payloads: Vec<ReelResult<Vec<u8>>> = pool.install(|| {
                    (chunk_start..chunk_end)
                        .into_par_iter()
                        .map_init(&make_rasterizer, |r, index| self.produce_payload(index, r))
                        .collect()
                });
                tracing::debug!(start = chunk_start, end = chunk_end, "chunk produced");

                for (offset, payload) in payloads.into_iter().enumerate() {
                    emit(sink, chunk_start + offset, &payload?, &mut stats)?;
                }
                chunk_start = chunk_end;
            }
            Ok(())
        });

        finish_run(sink, outcome)?;
        tracing::info!(
            frames = stats.frames_written,
            bytes = stats.bytes_written,
            "parallel render complete"
        );
        Ok(stats)
    }
}

/// Render `scene` sequentially into `sink` with the default encoder.
pub fn render_scene(
    scene: &Scene,
    config: &RenderConfig,
    rasterizer: &mut dyn Rasterizer,
    sink: &mut dyn ContainerSink,
) -> ReelResult<RenderStats> {
    FrameSequencer::new(scene, config.clone())?.run(rasterizer, sink)
}

/// Render `scene` into `sink`, compositing and encoding chunks of frames in parallel.
pub fn render_scene_parallel<R, F>(
    scene: &Scene,
    config: &RenderConfig,
    threading: &RenderThreading,
    make_rasterizer: F,
    sink: &mut dyn ContainerSink,
) -> ReelResult<RenderStats>
where
    R: Rasterizer,
    F: Fn() -> R + Sync + Send,
{
    FrameSequencer::new(scene, config.clone())?.run_parallel(threading, make_rasterizer, sink)
}

fn emit(
    sink: &mut dyn ContainerSink,
    index: usize,
    payload: &[u8],
    stats: &mut RenderStats,
) -> ReelResult<()> {
    let idx = FrameIndex(index as u64);
    sink.add_frame(idx, payload).map_err(|e| e.at_frame(idx))?;
    stats.frames_written += 1;
    stats.bytes_written += payload.len() as u64;
    tracing::debug!(frame = idx.0, bytes = payload.len(), "frame emitted");
    Ok(())
}

/// Close the sink whatever happened, keeping the first error.
fn finish_run(sink: &mut dyn ContainerSink, outcome: ReelResult<()>) -> ReelResult<()> {
    let closed = sink.close();
    match (outcome, closed) {
        (Ok(()), closed) => closed,
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            tracing::warn!(error = %close_err, "sink close failed after an earlier error");
            Err(e)
        }
    }
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(ReelError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/sequencer.rs"]
mod tests;
