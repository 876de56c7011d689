use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Caller configuration for a render run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Directory that receives rendered output.
    pub output_dir: PathBuf,
    /// Playback rate in frames per second.
    pub fps: u32,
    /// Render at most this many frames from the start of the scene. `None` renders all.
    #[serde(default)]
    pub max_frames: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            output_dir: PathBuf::from("out"),
            fps: 8,
            max_frames: None,
        }
    }
}

impl RenderConfig {
    /// Reject zero dimensions, a zero frame rate, an empty output dir and a zero frame cap.
    pub fn validate(&self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation(format!(
                "width/height must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.fps == 0 {
            return Err(ReelError::validation("fps must be non-zero"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ReelError::validation("output_dir must not be empty"));
        }
        if self.max_frames == Some(0) {
            return Err(ReelError::validation(
                "max_frames must be >= 1 when set (omit it to render every frame)",
            ));
        }
        Ok(())
    }

    /// Output canvas.
    pub fn canvas(&self) -> ReelResult<Canvas> {
        Canvas::new(self.width, self.height)
    }

    /// Number of frames a run renders from a scene with `available` frames.
    pub fn frame_limit(&self, available: usize) -> usize {
        match self.max_frames {
            Some(cap) => available.min(usize::try_from(cap).unwrap_or(usize::MAX)),
            None => available,
        }
    }

    /// Read a JSON config file.
    pub fn from_json_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        use anyhow::Context as _;

        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("open config '{}'", path.display()))?;
        serde_json::from_str(&s).map_err(|e| ReelError::serde(format!("config JSON: {e}")))
    }
}

/// Threading for [`crate::render_scene_parallel`].
#[derive(Clone, Debug)]
pub struct RenderThreading {
    /// Frames composited and encoded per parallel batch. `0` is treated as `1`.
    pub chunk_size: usize,
    /// Worker threads; `None` uses rayon's default.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            chunk_size: 64,
            threads: None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
