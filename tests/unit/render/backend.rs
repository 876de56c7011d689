use super::*;

#[test]
fn from_rgba_rejects_wrong_length() {
    let err = PixelBuffer::from_rgba(2, 2, vec![0; 15]).unwrap_err();
    assert!(matches!(
        err,
        ReelError::SizeMismatch {
            expected: 16,
            actual: 15
        }
    ));
    assert!(PixelBuffer::from_rgba(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn filled_buffer_repeats_color() {
    let canvas = Canvas::new(3, 2).unwrap();
    let buf = PixelBuffer::filled(canvas, Rgba8::new(1, 2, 3, 4)).unwrap();
    assert_eq!(buf.data().len(), 24);
    assert_eq!(buf.pixel(2, 1), Some(Rgba8::new(1, 2, 3, 4)));
    assert_eq!(buf.pixel(3, 0), None);
    assert_eq!(buf.pixel(0, 2), None);
}

#[test]
fn pixel_indexes_row_major_top_down() {
    let data: Vec<u8> = (0u8..16).collect();
    let buf = PixelBuffer::from_rgba(2, 2, data).unwrap();
    assert_eq!(buf.pixel(0, 0), Some(Rgba8::new(0, 1, 2, 3)));
    assert_eq!(buf.pixel(1, 0), Some(Rgba8::new(4, 5, 6, 7)));
    assert_eq!(buf.pixel(0, 1), Some(Rgba8::new(8, 9, 10, 11)));
}

#[test]
fn oversized_dimensions_are_rejected_not_wrapped() {
    let err = PixelBuffer::from_rgba(1 << 31, 1 << 31, Vec::new()).unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));

    let huge = Canvas {
        width: u32::MAX,
        height: u32::MAX,
    };
    assert!(PixelBuffer::filled(huge, Rgba8::WHITE).is_err());
}
