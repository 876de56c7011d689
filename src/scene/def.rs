use crate::foundation::core::{AssetId, Rgba8, Vec2, deserialize_vec2};
use crate::foundation::error::{ReelError, ReelResult};
use crate::scene::model::{Asset, AssetRender, Frame, Scene};
use crate::scene::shapes;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// JSON form of a [`Scene`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDef {
    /// Stage color behind every frame.
    #[serde(default = "default_background")]
    pub background: Rgba8,
    /// Asset library.
    #[serde(default)]
    pub assets: Vec<AssetDef>,
    /// Frames in playback order.
    #[serde(default)]
    pub frames: Vec<FrameDef>,
}

/// JSON form of an [`Asset`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDef {
    /// Unique asset identifier.
    pub id: AssetId,
    /// Outlines in paint order.
    pub outlines: Vec<OutlineDef>,
    /// Fill color.
    #[serde(default = "default_fill")]
    pub fill: Rgba8,
    /// Stroke color.
    #[serde(default = "default_stroke")]
    pub stroke: Rgba8,
    /// Stroke width in pixels, `0` disables stroking.
    #[serde(default)]
    pub stroke_width: f64,
}

/// Outline geometry, either raw SVG path data or a built-in shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutlineDef {
    /// SVG path data (`d` attribute syntax).
    Svg {
        /// Path data.
        d: String,
    },
    /// Five-pointed star centered on the origin.
    Star {
        /// Radius of the points.
        outer_radius: f64,
        /// Radius of the notches; defaults to `outer_radius / 2.5`.
        #[serde(default)]
        inner_radius: Option<f64>,
    },
    /// Circle centered on the origin.
    Circle {
        /// Radius.
        radius: f64,
    },
}

/// JSON form of a [`Frame`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameDef {
    /// Placements in paint order.
    #[serde(default)]
    pub renders: Vec<RenderDef>,
}

/// JSON form of an [`AssetRender`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderDef {
    /// Referenced asset id.
    pub asset: AssetId,
    /// Canvas position, `[x, y]` or `{ "x": .., "y": .. }`.
    #[serde(default, deserialize_with = "deserialize_vec2")]
    pub position: Vec2,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation_deg: f64,
}

fn default_background() -> Rgba8 {
    Rgba8::WHITE
}

fn default_fill() -> Rgba8 {
    Rgba8::RED
}

fn default_stroke() -> Rgba8 {
    Rgba8::BLACK
}

impl OutlineDef {
    /// Build the outline geometry.
    pub fn to_path(&self) -> ReelResult<kurbo::BezPath> {
        match self {
            Self::Svg { d } => shapes::svg_path(d),
            Self::Star {
                outer_radius,
                inner_radius,
            } => shapes::star(
                *outer_radius,
                inner_radius.unwrap_or(*outer_radius / shapes::DEFAULT_STAR_RATIO),
            ),
            Self::Circle { radius } => shapes::circle(*radius),
        }
    }
}

impl SceneDef {
    /// Parse a scene from a JSON string.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        serde_json::from_str(s).map_err(|e| ReelError::serde(format!("scene JSON: {e}")))
    }

    /// Read and parse a scene JSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        use anyhow::Context as _;

        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("open scene '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Validate and build the runtime [`Scene`].
    ///
    /// Outline geometry is built here; stroke widths must be finite and non-negative and
    /// positions/rotations finite. Asset references are not checked; see
    /// [`Scene::validate_references`].
    pub fn into_scene(self) -> ReelResult<Scene> {
        let mut scene = Scene::new(self.background);

        for def in self.assets {
            if !def.stroke_width.is_finite() || def.stroke_width < 0.0 {
                return Err(ReelError::validation(format!(
                    "asset {}: stroke_width must be finite and >= 0",
                    def.id
                )));
            }
            let outlines = def
                .outlines
                .iter()
                .map(OutlineDef::to_path)
                .collect::<ReelResult<Vec<_>>>()
                .map_err(|e| ReelError::validation(format!("asset {}: {e}", def.id)))?;
            scene.add_asset(Asset {
                id: def.id,
                outlines,
                stroke: def.stroke,
                fill: def.fill,
                stroke_width: def.stroke_width,
            })?;
        }

        for (i, def) in self.frames.into_iter().enumerate() {
            let mut frame = Frame::new();
            for r in def.renders {
                if !(r.position.is_finite() && r.rotation_deg.is_finite()) {
                    return Err(ReelError::validation(format!(
                        "frame {i}: asset {} placement must be finite",
                        r.asset
                    )));
                }
                frame.renders.push(AssetRender {
                    asset: r.asset,
                    position: r.position,
                    rotation_deg: r.rotation_deg,
                });
            }
            scene.push_frame(frame);
        }

        Ok(scene)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/def.rs"]
mod tests;
