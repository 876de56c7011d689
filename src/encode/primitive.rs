//! Explicit byte-order primitive writers.
//!
//! Every method names its byte order. Nothing here consults the host's native endianness, so
//! the same calls produce the same bytes on every platform.

use std::io::{self, Write};

/// Byte-order-explicit writes for any [`Write`] sink.
///
/// Blanket-implemented for all writers, so `Vec<u8>`, `File`, `BufWriter` and friends can all
/// be used directly.
pub trait PrimitiveWrite: Write {
    /// Write one raw byte.
    fn write_u8(&mut self, value: u8) -> io::Result<()> {
        self.write_all(&[value])
    }

    /// Write a 16-bit signed integer, most significant byte first.
    fn write_i16_be(&mut self, value: i16) -> io::Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    /// Write a 16-bit signed integer, least significant byte first.
    fn write_i16_le(&mut self, value: i16) -> io::Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    /// Write a 16-bit unsigned integer, most significant byte first.
    fn write_u16_be(&mut self, value: u16) -> io::Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    /// Write a 16-bit unsigned integer, least significant byte first.
    fn write_u16_le(&mut self, value: u16) -> io::Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    /// Write a 32-bit signed integer, most significant byte first.
    fn write_i32_be(&mut self, value: i32) -> io::Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    /// Write a 32-bit signed integer, least significant byte first.
    fn write_i32_le(&mut self, value: i32) -> io::Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    /// Write a 32-bit unsigned integer, least significant byte first.
    fn write_u32_le(&mut self, value: u32) -> io::Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    /// Write the IEEE-754 bits of a 32-bit float, most significant byte first.
    fn write_f32_be(&mut self, value: f32) -> io::Result<()> {
        self.write_all(&value.to_bits().to_be_bytes())
    }

    /// Write a length-prefixed UTF-16 string, big-endian throughout.
    ///
    /// The prefix is a `u16` count of UTF-16 code units, followed by each code unit.
    fn write_utf16_be(&mut self, value: &str) -> io::Result<()> {
        let units: Vec<u16> = value.encode_utf16().collect();
        let len = u16::try_from(units.len()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "string of {} UTF-16 units exceeds the u16 length prefix",
                    units.len()
                ),
            )
        })?;

        let mut buf = Vec::with_capacity(2 + units.len() * 2);
        buf.extend_from_slice(&len.to_be_bytes());
        for unit in units {
            buf.extend_from_slice(&unit.to_be_bytes());
        }
        self.write_all(&buf)
    }

    /// Write a single ASCII character as one byte.
    fn write_ascii_char(&mut self, value: char) -> io::Result<()> {
        if !value.is_ascii() {
            return Err(non_ascii(value));
        }
        self.write_u8(value as u8)
    }

    /// Write an ASCII string as raw bytes, with no length prefix.
    fn write_ascii(&mut self, value: &str) -> io::Result<()> {
        if let Some(c) = value.chars().find(|c| !c.is_ascii()) {
            return Err(non_ascii(c));
        }
        self.write_all(value.as_bytes())
    }
}

impl<W: Write + ?Sized> PrimitiveWrite for W {}

fn non_ascii(c: char) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("character {c:?} is not ASCII"),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/encode/primitive.rs"]
mod tests;
