use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};

/// Configuration provided to a [`ContainerSink`] when a run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Playback rate in frames per second.
    pub fps: u32,
}

impl SinkConfig {
    /// Reject zero dimensions or frame rate.
    pub fn validate(&self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation("sink width/height must be non-zero"));
        }
        if self.fps == 0 {
            return Err(ReelError::validation("sink fps must be non-zero"));
        }
        Ok(())
    }
}

/// Container sink (muxer) contract.
///
/// Payloads are complete encoded bitmaps. Every frame is a key frame.
///
/// Ordering contract: `add_frame` is called in strictly increasing [`FrameIndex`] order
/// between one `open` and one `close`. `close` is called exactly once per run, including
/// after a failed frame, so the sink can leave a well-formed (possibly short) artifact.
pub trait ContainerSink: Send {
    /// Called once before any frame.
    fn open(&mut self, cfg: SinkConfig) -> ReelResult<()>;
    /// Append one encoded frame.
    fn add_frame(&mut self, idx: FrameIndex, payload: &[u8]) -> ReelResult<()>;
    /// Finalize the container.
    fn close(&mut self) -> ReelResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, Vec<u8>)>,
    opens: usize,
    closes: usize,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `open`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured payloads in arrival order.
    pub fn frames(&self) -> &[(FrameIndex, Vec<u8>)] {
        &self.frames
    }

    /// How many times `open` was called.
    pub fn open_count(&self) -> usize {
        self.opens
    }

    /// How many times `close` was called.
    pub fn close_count(&self) -> usize {
        self.closes
    }
}

impl ContainerSink for InMemorySink {
    fn open(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        cfg.validate()?;
        self.cfg = Some(cfg);
        self.frames.clear();
        self.opens += 1;
        Ok(())
    }

    fn add_frame(&mut self, idx: FrameIndex, payload: &[u8]) -> ReelResult<()> {
        if self.cfg.is_none() {
            return Err(ReelError::sink("in-memory sink not opened"));
        }
        if let Some((last, _)) = self.frames.last()
            && idx <= *last
        {
            return Err(ReelError::sink(format!(
                "out-of-order frame {idx} after {last}"
            )));
        }
        self.frames.push((idx, payload.to_vec()));
        Ok(())
    }

    fn close(&mut self) -> ReelResult<()> {
        self.closes += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
