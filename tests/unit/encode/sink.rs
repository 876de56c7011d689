use super::*;

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 4,
        height: 2,
        fps: 8,
    }
}

#[test]
fn config_validation_catches_bad_values() {
    assert!(cfg().validate().is_ok());
    assert!(SinkConfig { width: 0, ..cfg() }.validate().is_err());
    assert!(SinkConfig { height: 0, ..cfg() }.validate().is_err());
    assert!(SinkConfig { fps: 0, ..cfg() }.validate().is_err());
}

#[test]
fn in_memory_sink_records_frames_and_lifecycle() {
    let mut sink = InMemorySink::new();
    sink.open(cfg()).unwrap();
    sink.add_frame(FrameIndex(0), b"a").unwrap();
    sink.add_frame(FrameIndex(1), b"bc").unwrap();
    sink.close().unwrap();

    assert_eq!(sink.config(), Some(cfg()));
    assert_eq!(sink.open_count(), 1);
    assert_eq!(sink.close_count(), 1);
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1], (FrameIndex(1), b"bc".to_vec()));
}

#[test]
fn in_memory_sink_rejects_unopened_and_out_of_order() {
    let mut sink = InMemorySink::new();
    assert!(sink.add_frame(FrameIndex(0), b"x").is_err());

    sink.open(cfg()).unwrap();
    sink.add_frame(FrameIndex(3), b"x").unwrap();
    let err = sink.add_frame(FrameIndex(3), b"y").unwrap_err();
    assert!(matches!(err, ReelError::Sink(_)));
}
