/// Render run configuration.
pub mod config;
/// Frame sequencer: composite, encode and stream frames into a sink.
pub mod sequencer;
