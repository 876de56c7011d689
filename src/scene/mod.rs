/// JSON boundary model for scenes.
pub mod def;
/// Runtime scene graph: assets, frames, placements.
pub mod model;
/// Built-in outline generators.
pub mod shapes;
