use super::*;

fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn random_buffer(width: u32, height: u32, seed: u64) -> PixelBuffer {
    let len = (width * height * 4) as usize;
    let mut state = seed;
    let data = (0..len)
        .map(|_| {
            state = mix64(state.wrapping_add(0x9E37_79B9_7F4A_7C15));
            (state >> 56) as u8
        })
        .collect();
    PixelBuffer::from_rgba(width, height, data).unwrap()
}

fn u16_at(b: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([b[at], b[at + 1]])
}

fn u32_at(b: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

#[test]
fn single_pixel_swaps_red_and_blue() {
    let px = PixelBuffer::from_rgba(1, 1, vec![10, 20, 30, 40]).unwrap();
    let bytes = BitmapEncoder::new().encode(&px).unwrap();
    assert_eq!(bytes.len(), 58);
    assert_eq!(&bytes[54..58], &[30, 20, 10, 40]);
}

#[test]
fn header_fields_match_layout() {
    let px = random_buffer(3, 2, 1);
    let b = BitmapEncoder::new().encode(&px).unwrap();

    assert_eq!(&b[0..2], b"BM");
    assert_eq!(u32_at(&b, 2), 54 + 3 * 2 * 4);
    assert_eq!(u16_at(&b, 6), 0);
    assert_eq!(u16_at(&b, 8), 0);
    assert_eq!(u32_at(&b, 10), 54);
    assert_eq!(u32_at(&b, 14), 40);
    assert_eq!(u32_at(&b, 18), 3);
    assert_eq!(u32_at(&b, 22), 2);
    assert_eq!(u16_at(&b, 26), 1);
    assert_eq!(u16_at(&b, 28), 32);
    assert_eq!(u32_at(&b, 30), 0);
    assert_eq!(u32_at(&b, 34), 3 * 2 * 4);
    for at in [38, 42, 46, 50] {
        assert_eq!(u32_at(&b, at), 0, "field at offset {at}");
    }
}

#[test]
fn header_invariants_hold_across_sizes() {
    for (w, h) in [(1, 1), (1, 7), (7, 1), (5, 3), (64, 48), (640, 480)] {
        let header = BitmapHeader::for_dimensions(w, h).unwrap();
        assert_eq!(header.file_size, 54 + w * h * 4);
        assert_eq!(header.pixel_data_offset, 54);
        assert_eq!(header.compression, 0);
        assert_eq!(header.bits_per_pixel, 32);
        assert_eq!(header.colors_used, 0);

        let mut out = Vec::new();
        header.write_to(&mut out).unwrap();
        assert_eq!(out.len(), 54);
    }
}

#[test]
fn header_rejects_degenerate_and_oversized_dimensions() {
    assert!(BitmapHeader::for_dimensions(0, 1).is_err());
    assert!(BitmapHeader::for_dimensions(1, 0).is_err());
    assert!(BitmapHeader::for_dimensions(65_536, 65_536).is_err());
    assert!(BitmapHeader::for_dimensions(u32::MAX, 1).is_err());
}

#[test]
fn rows_are_stored_bottom_up() {
    // Row 0 red, row 1 green, row 2 blue.
    let mut data = Vec::new();
    for rgba in [[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]] {
        for _ in 0..2 {
            data.extend_from_slice(&rgba);
        }
    }
    let px = PixelBuffer::from_rgba(2, 3, data).unwrap();
    let b = BitmapEncoder::new().encode(&px).unwrap();

    let rows: Vec<&[u8]> = b[54..].chunks_exact(8).collect();
    assert_eq!(rows.len(), 3);
    // First stored row is the logical bottom (blue), in BGRA.
    assert_eq!(&rows[0][0..4], &[255, 0, 0, 255]);
    assert_eq!(&rows[1][0..4], &[0, 255, 0, 255]);
    // Last stored row is the logical top (red).
    assert_eq!(&rows[2][0..4], &[0, 0, 255, 255]);
}

#[test]
fn random_buffers_round_trip_exactly() {
    for (i, (w, h)) in [(1, 1), (2, 3), (17, 5), (31, 31), (100, 1)]
        .into_iter()
        .enumerate()
    {
        let px = random_buffer(w, h, i as u64 + 42);
        let bytes = BitmapEncoder::new().encode(&px).unwrap();
        assert_eq!(bytes.len(), 54 + (w * h * 4) as usize);

        let (header, decoded) = decode_bitmap(&bytes).unwrap();
        assert_eq!(header, BitmapHeader::for_dimensions(w, h).unwrap());
        assert_eq!(decoded, px);
    }
}

#[test]
fn encode_to_matches_encode() {
    let px = random_buffer(4, 4, 9);
    let enc = BitmapEncoder::new();
    let mut streamed = Vec::new();
    enc.encode_to(&px, &mut streamed).unwrap();
    assert_eq!(streamed, enc.encode(&px).unwrap());
}

#[test]
fn compression_and_color_maps_are_unsupported() {
    let px = random_buffer(2, 2, 3);

    let err = BitmapEncoder::new().with_compression(1).encode(&px).unwrap_err();
    assert!(matches!(err, ReelError::UnsupportedFormat(_)));

    let err = BitmapEncoder::new().with_color_map(256).encode(&px).unwrap_err();
    assert!(matches!(err, ReelError::UnsupportedFormat(_)));

    let mut out = Vec::new();
    assert!(
        BitmapEncoder::new()
            .with_compression(3)
            .encode_to(&px, &mut out)
            .is_err()
    );
    assert!(out.is_empty());
}

#[test]
fn write_to_file_appends_extension() {
    let dir = tempfile::tempdir().unwrap();
    let px = random_buffer(3, 3, 5);
    let path = BitmapEncoder::new()
        .write_to_file(&px, dir.path().join("nested"), "ray-test")
        .unwrap();
    assert_eq!(path.file_name().unwrap(), "ray-test.bmp");
    let on_disk = std::fs::read(&path).unwrap();
    assert_eq!(on_disk, BitmapEncoder::new().encode(&px).unwrap());
}

#[test]
fn write_to_file_rejects_blank_stem() {
    let dir = tempfile::tempdir().unwrap();
    let px = random_buffer(1, 1, 5);
    let err = BitmapEncoder::new()
        .write_to_file(&px, dir.path(), "  ")
        .unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
}

#[test]
fn decode_rejects_truncated_and_foreign_variants() {
    let px = random_buffer(2, 2, 11);
    let bytes = BitmapEncoder::new().encode(&px).unwrap();

    assert!(matches!(
        decode_bitmap(&bytes[..40]).unwrap_err(),
        ReelError::Validation(_)
    ));
    assert!(matches!(
        decode_bitmap(&bytes[..bytes.len() - 1]).unwrap_err(),
        ReelError::Validation(_)
    ));

    let mut bad = bytes.clone();
    bad[28] = 24;
    assert!(matches!(
        decode_bitmap(&bad).unwrap_err(),
        ReelError::UnsupportedFormat(_)
    ));

    let mut bad = bytes.clone();
    bad[30] = 1;
    assert!(matches!(
        decode_bitmap(&bad).unwrap_err(),
        ReelError::UnsupportedFormat(_)
    ));

    let mut bad = bytes;
    bad[0] = b'X';
    assert!(decode_bitmap(&bad).is_err());
}
