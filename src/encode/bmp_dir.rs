use crate::encode::bitmap::FILE_EXTENSION;
use crate::encode::sink::{ContainerSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use anyhow::Context as _;
use std::path::PathBuf;

/// Sink that writes every payload as its own numbered bitmap file.
///
/// Files are named `<prefix>_<index:05>.bmp` inside `dir`. Useful for inspecting individual
/// frames or feeding an external muxer later.
pub struct BmpSequenceSink {
    dir: PathBuf,
    prefix: String,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    written: Vec<PathBuf>,
}

impl BmpSequenceSink {
    /// Sink writing into `dir` with file names starting with `prefix`.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            cfg: None,
            last_idx: None,
            written: Vec::new(),
        }
    }

    /// Paths written so far, in frame order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir
            .join(format!("{}_{:05}.{FILE_EXTENSION}", self.prefix, idx.0))
    }
}

impl ContainerSink for BmpSequenceSink {
    fn open(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        cfg.validate()?;
        if self.prefix.trim().is_empty() {
            return Err(ReelError::validation("bitmap file prefix must not be blank"));
        }
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("failed to create output directory '{}'", self.dir.display())
        })?;
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.written.clear();
        Ok(())
    }

    fn add_frame(&mut self, idx: FrameIndex, payload: &[u8]) -> ReelResult<()> {
        if self.cfg.is_none() {
            return Err(ReelError::sink("bitmap sequence sink not opened"));
        }
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(ReelError::sink(format!(
                "bitmap sequence sink received out-of-order frame {idx} after {last}"
            )));
        }

        let path = self.frame_path(idx);
        std::fs::write(&path, payload)
            .with_context(|| format!("failed to write frame '{}'", path.display()))?;
        tracing::debug!(frame = idx.0, path = %path.display(), "wrote frame bitmap");
        self.last_idx = Some(idx);
        self.written.push(path);
        Ok(())
    }

    fn close(&mut self) -> ReelResult<()> {
        if self.cfg.take().is_some() {
            tracing::info!(
                frames = self.written.len(),
                dir = %self.dir.display(),
                "bitmap sequence complete"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/bmp_dir.rs"]
mod tests;
