//! Byte-exact 32-bit uncompressed bitmap codec.
//!
//! Only one variant is produced: a 14-byte file header, a 40-byte info header, no color table,
//! and bottom-up BGRA rows. Every header field is a pure function of width and height.

use crate::encode::primitive::PrimitiveWrite;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::backend::PixelBuffer;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File header (14) + info header (40).
pub const HEADER_SIZE: u32 = 54;
/// Size of the `BITMAPINFOHEADER` block.
pub const INFO_HEADER_SIZE: u32 = 40;
/// Extension appended by [`BitmapEncoder::write_to_file`].
pub const FILE_EXTENSION: &str = "bmp";

const BYTES_PER_PIXEL: u32 = 4;
const BITS_PER_PIXEL: u16 = 32;
const MAGIC: &str = "BM";

/// Header fields of an encoded bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitmapHeader {
    /// Total file size: headers plus pixel data.
    pub file_size: u32,
    /// Offset from the start of the file to the first pixel byte.
    pub pixel_data_offset: u32,
    /// Info header size, always 40.
    pub info_header_size: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels. Positive, so rows are stored bottom-up.
    pub height: u32,
    /// Color planes, always 1.
    pub planes: u16,
    /// Bits per pixel, always 32.
    pub bits_per_pixel: u16,
    /// Compression method, always 0 (none).
    pub compression: u32,
    /// Pixel data length in bytes.
    pub image_size: u32,
    /// Horizontal resolution, unset.
    pub x_pixels_per_meter: i32,
    /// Vertical resolution, unset.
    pub y_pixels_per_meter: i32,
    /// Color table entries, always 0.
    pub colors_used: u32,
    /// Important colors, always 0.
    pub important_colors: u32,
}

impl BitmapHeader {
    /// Derive the header for a `width` x `height` image.
    ///
    /// Fails when a dimension is zero or does not fit the format's 32-bit size fields.
    pub fn for_dimensions(width: u32, height: u32) -> ReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReelError::validation(format!(
                "bitmap dimensions must be non-zero, got {width}x{height}"
            )));
        }
        if width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(ReelError::validation(format!(
                "bitmap dimensions {width}x{height} exceed the signed 32-bit header fields"
            )));
        }

        let image_size = width
            .checked_mul(height)
            .and_then(|px| px.checked_mul(BYTES_PER_PIXEL))
            .ok_or_else(|| {
                ReelError::validation(format!("bitmap {width}x{height} exceeds 4 GiB of pixels"))
            })?;
        let file_size = image_size.checked_add(HEADER_SIZE).ok_or_else(|| {
            ReelError::validation(format!("bitmap {width}x{height} exceeds 4 GiB file size"))
        })?;

        Ok(Self {
            file_size,
            pixel_data_offset: HEADER_SIZE,
            info_header_size: INFO_HEADER_SIZE,
            width,
            height,
            planes: 1,
            bits_per_pixel: BITS_PER_PIXEL,
            compression: 0,
            image_size,
            x_pixels_per_meter: 0,
            y_pixels_per_meter: 0,
            colors_used: 0,
            important_colors: 0,
        })
    }

    /// Bytes in one stored row.
    pub fn row_bytes(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL as usize
    }

    /// Serialize both headers (exactly 54 bytes), little-endian.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> ReelResult<()> {
        out.write_ascii(MAGIC)?;
        out.write_u32_le(self.file_size)?;
        out.write_u16_le(0)?;
        out.write_u16_le(0)?;
        out.write_u32_le(self.pixel_data_offset)?;

        out.write_u32_le(self.info_header_size)?;
        out.write_i32_le(self.width as i32)?;
        out.write_i32_le(self.height as i32)?;
        out.write_u16_le(self.planes)?;
        out.write_u16_le(self.bits_per_pixel)?;
        out.write_u32_le(self.compression)?;
        out.write_u32_le(self.image_size)?;
        out.write_i32_le(self.x_pixels_per_meter)?;
        out.write_i32_le(self.y_pixels_per_meter)?;
        out.write_u32_le(self.colors_used)?;
        out.write_u32_le(self.important_colors)?;
        Ok(())
    }
}

/// Encoder for 32-bit uncompressed bitmaps.
///
/// The compression and color-map knobs exist so callers asking for a variant this codec does
/// not produce get [`ReelError::UnsupportedFormat`] instead of silently different output.
#[derive(Clone, Copy, Debug, Default)]
pub struct BitmapEncoder {
    compression: u32,
    color_map_entries: u32,
}

impl BitmapEncoder {
    /// Encoder for the default (and only supported) variant.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a compression method. Anything but `0` is rejected at encode time.
    pub fn with_compression(mut self, compression: u32) -> Self {
        self.compression = compression;
        self
    }

    /// Request a color table. Anything but `0` entries is rejected at encode time.
    pub fn with_color_map(mut self, entries: u32) -> Self {
        self.color_map_entries = entries;
        self
    }

    fn check_supported(&self) -> ReelResult<()> {
        if self.color_map_entries > 0 {
            return Err(ReelError::unsupported(format!(
                "color maps are not supported ({} entries requested)",
                self.color_map_entries
            )));
        }
        if self.compression != 0 {
            return Err(ReelError::unsupported(format!(
                "compression method {} is not supported; only uncompressed 32-bit RGBA",
                self.compression
            )));
        }
        Ok(())
    }

    /// Encode a top-down RGBA buffer into a complete bitmap byte sequence.
    pub fn encode(&self, pixels: &PixelBuffer) -> ReelResult<Vec<u8>> {
        self.check_supported()?;
        let header = BitmapHeader::for_dimensions(pixels.width(), pixels.height())?;
        let mut out = Vec::with_capacity(header.file_size as usize);
        write_bitmap(&header, pixels, &mut out)?;
        Ok(out)
    }

    /// Stream the encoded bitmap into `out`.
    ///
    /// Validation happens before the first byte is written.
    pub fn encode_to<W: Write + ?Sized>(&self, pixels: &PixelBuffer, out: &mut W) -> ReelResult<()> {
        self.check_supported()?;
        let header = BitmapHeader::for_dimensions(pixels.width(), pixels.height())?;
        write_bitmap(&header, pixels, out)
    }

    /// Encode and write `<dir>/<stem>.bmp`, creating `dir` if needed.
    pub fn write_to_file(
        &self,
        pixels: &PixelBuffer,
        dir: impl AsRef<Path>,
        stem: &str,
    ) -> ReelResult<PathBuf> {
        use anyhow::Context as _;

        if stem.trim().is_empty() {
            return Err(ReelError::validation("bitmap file stem must not be blank"));
        }
        let dir = dir.as_ref();
        let bytes = self.encode(pixels)?;

        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
        let path = dir.join(format!("{stem}.{FILE_EXTENSION}"));
        std::fs::write(&path, &bytes)
            .with_context(|| format!("failed to write bitmap '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote bitmap");
        Ok(path)
    }
}

fn write_bitmap<W: Write + ?Sized>(
    header: &BitmapHeader,
    pixels: &PixelBuffer,
    out: &mut W,
) -> ReelResult<()> {
    header.write_to(out)?;

    let row_bytes = header.row_bytes();
    let mut row = vec![0u8; row_bytes];
    // Bottom-up: the last source row is stored first.
    for src in pixels.data().chunks_exact(row_bytes).rev() {
        for (d, s) in row.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
            d[0] = s[2];
            d[1] = s[1];
            d[2] = s[0];
            d[3] = s[3];
        }
        out.write_all(&row)?;
    }
    Ok(())
}

/// Decode a bitmap produced by [`BitmapEncoder`] back into a top-down RGBA buffer.
///
/// Accepts exactly the variant the encoder writes. Top-down (negative height) files, other bit
/// depths, compression and color tables are reported as unsupported.
pub fn decode_bitmap(bytes: &[u8]) -> ReelResult<(BitmapHeader, PixelBuffer)> {
    if bytes.len() < HEADER_SIZE as usize {
        return Err(ReelError::validation(format!(
            "bitmap is {} bytes, shorter than the {HEADER_SIZE}-byte header",
            bytes.len()
        )));
    }
    if &bytes[0..2] != MAGIC.as_bytes() {
        return Err(ReelError::unsupported("missing 'BM' signature"));
    }

    let u16_at = |at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]);
    let u32_at = |at: usize| {
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    };
    let i32_at = |at: usize| u32_at(at) as i32;

    let info_header_size = u32_at(14);
    if info_header_size != INFO_HEADER_SIZE {
        return Err(ReelError::unsupported(format!(
            "info header of {info_header_size} bytes; only {INFO_HEADER_SIZE}"
        )));
    }
    let width = i32_at(18);
    let height = i32_at(22);
    if width <= 0 || height <= 0 {
        return Err(ReelError::unsupported(format!(
            "dimensions {width}x{height}; only positive (bottom-up) images"
        )));
    }
    let bits_per_pixel = u16_at(28);
    if bits_per_pixel != BITS_PER_PIXEL {
        return Err(ReelError::unsupported(format!(
            "{bits_per_pixel} bits per pixel; only {BITS_PER_PIXEL}"
        )));
    }
    let compression = u32_at(30);
    if compression != 0 {
        return Err(ReelError::unsupported(format!(
            "compression method {compression}"
        )));
    }
    let colors_used = u32_at(46);
    if colors_used != 0 {
        return Err(ReelError::unsupported(format!(
            "color table with {colors_used} entries"
        )));
    }

    let header = BitmapHeader {
        file_size: u32_at(2),
        pixel_data_offset: u32_at(10),
        info_header_size,
        width: width as u32,
        height: height as u32,
        planes: u16_at(26),
        bits_per_pixel,
        compression,
        image_size: u32_at(34),
        x_pixels_per_meter: i32_at(38),
        y_pixels_per_meter: i32_at(42),
        colors_used,
        important_colors: u32_at(50),
    };

    let row_bytes = header.row_bytes();
    let data_len = row_bytes
        .checked_mul(header.height as usize)
        .ok_or_else(|| ReelError::validation("bitmap pixel data length overflows"))?;
    let start = header.pixel_data_offset as usize;
    let pixel_bytes = start
        .checked_add(data_len)
        .and_then(|end| bytes.get(start..end))
        .ok_or_else(|| {
            ReelError::validation(format!(
                "bitmap truncated: need {data_len} pixel bytes at offset {start}, have {}",
                bytes.len()
            ))
        })?;

    let mut rgba = Vec::with_capacity(data_len);
    for src in pixel_bytes.chunks_exact(row_bytes).rev() {
        for s in src.chunks_exact(4) {
            rgba.extend_from_slice(&[s[2], s[1], s[0], s[3]]);
        }
    }

    let pixels = PixelBuffer::from_rgba(header.width, header.height, rgba)?;
    Ok((header, pixels))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/bitmap.rs"]
mod tests;
