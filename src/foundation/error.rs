use crate::foundation::core::{AssetId, FrameIndex};

/// Convenience result type used across framereel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by the rendering and encoding APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid user-provided configuration or scene data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A frame names an asset that is not part of the scene.
    #[error("reference error: frame {frame} references undefined asset {asset}")]
    Reference {
        /// The missing asset identifier.
        asset: AssetId,
        /// The frame that holds the dangling reference.
        frame: FrameIndex,
    },

    /// A bitmap variant this codec does not produce or read.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A pixel buffer whose byte length disagrees with its dimensions.
    #[error("size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// `width * height * 4`.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// The container sink failed to open, accept a frame, or finalize.
    #[error("sink error: {0}")]
    Sink(String),

    /// Errors when serializing or deserializing scene or config data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Raw stream or file write failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A failure that happened while producing a specific frame.
    #[error("frame {frame}: {source}")]
    Frame {
        /// Index of the frame being produced.
        frame: FrameIndex,
        /// Underlying failure.
        #[source]
        source: Box<ReelError>,
    },

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::UnsupportedFormat`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Build a [`ReelError::Sink`] value.
    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Attach frame context. Reference errors already carry their frame and pass through.
    pub fn at_frame(self, frame: FrameIndex) -> Self {
        match self {
            Self::Reference { .. } | Self::Frame { .. } => self,
            other => Self::Frame {
                frame,
                source: Box::new(other),
            },
        }
    }

    /// Frame index the failure is attributed to, if any.
    pub fn frame_index(&self) -> Option<FrameIndex> {
        match self {
            Self::Reference { frame, .. } | Self::Frame { frame, .. } => Some(*frame),
            _ => None,
        }
    }

    /// Strip frame context and return the underlying failure.
    pub fn root(&self) -> &ReelError {
        match self {
            Self::Frame { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
