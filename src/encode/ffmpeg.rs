use crate::encode::sink::{ContainerSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

/// Video codec used for the output container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoCodec {
    /// H.264 in yuv420p. Requires even width/height.
    H264,
    /// Uncompressed 32-bit BGRA frames (typically in an `.avi`).
    Uncompressed,
}

impl VideoCodec {
    /// `Uncompressed` for `.avi` outputs, `H264` otherwise.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("avi") => Self::Uncompressed,
            _ => Self::H264,
        }
    }
}

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output video path; the container is chosen by `ffmpeg` from the extension.
    pub out_path: PathBuf,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
    /// Output codec.
    pub codec: VideoCodec,
}

impl FfmpegSinkOpts {
    /// Options for writing `out_path`, codec inferred from its extension.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        let out_path = out_path.into();
        let codec = VideoCodec::for_path(&out_path);
        Self {
            out_path,
            overwrite: true,
            codec,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams bitmap payloads to its stdin.
///
/// Input is read with the `image2pipe` demuxer and `bmp` decoder, so each payload must be one
/// complete bitmap file.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            last_idx: None,
        }
    }
}

impl ContainerSink for FfmpegSink {
    fn open(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        cfg.validate()?;
        if self.opts.codec == VideoCodec::H264
            && (!cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2))
        {
            return Err(ReelError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p h264 output)",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(ReelError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(ReelError::sink(
                "ffmpeg is required for video output, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" });

        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "image2pipe",
            "-c:v",
            "bmp",
            "-framerate",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
        ]);
        match self.opts.codec {
            VideoCodec::H264 => {
                cmd.args([
                    "-c:v",
                    "libx264",
                    "-pix_fmt",
                    "yuv420p",
                    "-movflags",
                    "+faststart",
                ]);
            }
            VideoCodec::Uncompressed => {
                cmd.args(["-c:v", "rawvideo", "-pix_fmt", "bgra"]);
            }
        }
        cmd.arg(&self.opts.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            ReelError::sink(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReelError::sink("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ReelError::sink("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(
            out = %self.opts.out_path.display(),
            codec = ?self.opts.codec,
            fps = cfg.fps,
            "spawned ffmpeg"
        );
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.last_idx = None;
        Ok(())
    }

    fn add_frame(&mut self, idx: FrameIndex, payload: &[u8]) -> ReelResult<()> {
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(ReelError::sink(
                "ffmpeg sink received out-of-order frame index",
            ));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ReelError::sink("ffmpeg sink is not open"));
        };

        use std::io::Write as _;
        stdin.write_all(payload).map_err(|e| {
            ReelError::sink(format!("failed to write frame {idx} to ffmpeg stdin: {e}"))
        })?;
        self.last_idx = Some(idx);
        Ok(())
    }

    fn close(&mut self) -> ReelResult<()> {
        drop(self.stdin.take());
        let Some(mut child) = self.child.take() else {
            // Never opened (or open failed before spawning): nothing to finalize.
            return Ok(());
        };

        let status = child
            .wait()
            .map_err(|e| ReelError::sink(format!("failed to wait for ffmpeg to finish: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ReelError::sink("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| ReelError::sink(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(ReelError::sink(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        tracing::info!(out = %self.opts.out_path.display(), "video finalized");
        Ok(())
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
