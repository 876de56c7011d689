use super::*;

#[test]
fn i32_byte_order_is_explicit() {
    let mut be = Vec::new();
    be.write_i32_be(0x0102_0304).unwrap();
    assert_eq!(be, [0x01, 0x02, 0x03, 0x04]);

    let mut le = Vec::new();
    le.write_i32_le(0x0102_0304).unwrap();
    assert_eq!(le, [0x04, 0x03, 0x02, 0x01]);
}

#[test]
fn i16_byte_order_is_explicit() {
    let mut out = Vec::new();
    out.write_i16_be(0x0102).unwrap();
    out.write_i16_le(0x0102).unwrap();
    out.write_i16_be(-2).unwrap();
    out.write_i16_le(-2).unwrap();
    assert_eq!(out, [0x01, 0x02, 0x02, 0x01, 0xFF, 0xFE, 0xFE, 0xFF]);
}

#[test]
fn negative_i32_keeps_twos_complement_bytes() {
    let mut out = Vec::new();
    out.write_i32_be(-1).unwrap();
    out.write_i32_le(i32::MIN).unwrap();
    assert_eq!(out, [0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x80]);
}

#[test]
fn f32_is_written_msb_first() {
    let mut out = Vec::new();
    out.write_f32_be(1.0).unwrap();
    assert_eq!(out, [0x3F, 0x80, 0x00, 0x00]);

    let mut out = Vec::new();
    out.write_f32_be(-2.5).unwrap();
    assert_eq!(out, (-2.5f32).to_be_bytes());
}

#[test]
fn utf16_string_has_be_length_prefix() {
    let mut out = Vec::new();
    out.write_utf16_be("Hi").unwrap();
    assert_eq!(out, [0x00, 0x02, 0x00, b'H', 0x00, b'i']);

    let mut out = Vec::new();
    out.write_utf16_be("é").unwrap();
    assert_eq!(out, [0x00, 0x01, 0x00, 0xE9]);

    let mut out = Vec::new();
    out.write_utf16_be("").unwrap();
    assert_eq!(out, [0x00, 0x00]);
}

#[test]
fn utf16_length_counts_code_units_not_chars() {
    let mut out = Vec::new();
    out.write_utf16_be("\u{1F600}").unwrap();
    assert_eq!(out, [0x00, 0x02, 0xD8, 0x3D, 0xDE, 0x00]);
}

#[test]
fn utf16_rejects_oversized_strings() {
    let long = "a".repeat(usize::from(u16::MAX) + 1);
    let mut out = Vec::new();
    let err = out.write_utf16_be(&long).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    assert!(out.is_empty());
}

#[test]
fn ascii_writers_emit_raw_bytes() {
    let mut out = Vec::new();
    out.write_ascii_char('B').unwrap();
    out.write_ascii_char('M').unwrap();
    out.write_ascii("RIFF").unwrap();
    out.write_u8(0xAB).unwrap();
    assert_eq!(out, b"BMRIFF\xAB");
}

#[test]
fn ascii_writers_reject_non_ascii() {
    let mut out = Vec::new();
    assert!(out.write_ascii_char('é').is_err());
    assert!(out.write_ascii("caf\u{e9}").is_err());
    assert!(out.is_empty());
}
