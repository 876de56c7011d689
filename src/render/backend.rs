use crate::foundation::core::{Affine, BezPath, Canvas, Rgba8, rgba_len};
use crate::foundation::error::{ReelError, ReelResult};

/// A rendered frame as straight-alpha RGBA8 pixels.
///
/// Rows are tightly packed, row-major, top-down. The byte length is always
/// `width * height * 4`; the constructor enforces it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap existing RGBA8 bytes, checking the length against the dimensions.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> ReelResult<Self> {
        let expected = rgba_len(width, height).ok_or_else(|| {
            ReelError::validation(format!(
                "pixel buffer {width}x{height} is too large to address"
            ))
        })?;
        if data.len() != expected {
            return Err(ReelError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer filled with a single color.
    pub fn filled(canvas: Canvas, color: Rgba8) -> ReelResult<Self> {
        let len = canvas.rgba_len().ok_or_else(|| {
            ReelError::validation(format!(
                "pixel buffer {}x{} is too large to address",
                canvas.width, canvas.height
            ))
        })?;
        let data = color.to_array().repeat(len / 4);
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return its bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// The pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let p = &self.data[i..i + 4];
        Some(Rgba8::new(p[0], p[1], p[2], p[3]))
    }
}

/// Vector rasterizer contract consumed by the compositor.
///
/// A frame is produced by one `begin`, any number of `fill_path` / `stroke_path` calls painted
/// in call order, and one `finish`.
pub trait Rasterizer {
    /// Start a new canvas cleared to `background`.
    fn begin(&mut self, canvas: Canvas, background: Rgba8) -> ReelResult<()>;

    /// Fill `path` transformed by `transform` with `color`.
    fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Rgba8) -> ReelResult<()>;

    /// Stroke `path` transformed by `transform` with `color` at `width` pixels.
    fn stroke_path(
        &mut self,
        path: &BezPath,
        transform: Affine,
        color: Rgba8,
        width: f64,
    ) -> ReelResult<()>;

    /// Read back the canvas as a top-down straight-alpha RGBA buffer.
    fn finish(&mut self) -> ReelResult<PixelBuffer>;
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
