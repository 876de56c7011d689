use crate::foundation::core::{AssetId, BezPath, FrameIndex, Rgba8, Vec2};
use crate::foundation::error::{ReelError, ReelResult};
use std::collections::HashMap;

/// A reusable vector shape: one or more outlines painted with shared colors.
#[derive(Clone, Debug)]
pub struct Asset {
    /// Identifier, unique within its scene.
    pub id: AssetId,
    /// Outlines in paint order, in the asset's local coordinate space.
    pub outlines: Vec<BezPath>,
    /// Stroke color, used when `stroke_width > 0`.
    pub stroke: Rgba8,
    /// Fill color.
    pub fill: Rgba8,
    /// Stroke width in pixels. `0.0` disables stroking.
    pub stroke_width: f64,
}

impl Asset {
    /// Asset with no outlines, red fill and black (disabled) stroke.
    pub fn new(id: AssetId) -> Self {
        Self {
            id,
            outlines: Vec::new(),
            stroke: Rgba8::BLACK,
            fill: Rgba8::RED,
            stroke_width: 0.0,
        }
    }

    /// Append an outline.
    pub fn with_outline(mut self, outline: BezPath) -> Self {
        self.outlines.push(outline);
        self
    }

    /// Set the fill color.
    pub fn with_fill(mut self, fill: Rgba8) -> Self {
        self.fill = fill;
        self
    }

    /// Set the stroke color and width.
    pub fn with_stroke(mut self, stroke: Rgba8, width: f64) -> Self {
        self.stroke = stroke;
        self.stroke_width = width;
        self
    }
}

/// One placement of an asset inside a frame.
///
/// Holds the asset's identifier only; the asset itself is owned by the [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AssetRender {
    /// Referenced asset.
    pub asset: AssetId,
    /// Where the asset's origin lands on the canvas.
    pub position: Vec2,
    /// Rotation about the asset's origin, in degrees.
    pub rotation_deg: f64,
}

impl AssetRender {
    /// Place `asset` at `position` without rotation.
    pub fn new(asset: AssetId, position: Vec2) -> Self {
        Self {
            asset,
            position,
            rotation_deg: 0.0,
        }
    }

    /// Set the rotation in degrees.
    pub fn rotated(mut self, rotation_deg: f64) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }
}

/// A single frame: placements painted in order, later entries on top.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Placements in paint order.
    pub renders: Vec<AssetRender>,
}

impl Frame {
    /// Empty frame (background only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a placement on top of the existing ones.
    pub fn with(mut self, render: AssetRender) -> Self {
        self.renders.push(render);
        self
    }
}

/// Asset library plus the ordered frame list.
#[derive(Clone, Debug)]
pub struct Scene {
    background: Rgba8,
    assets: Vec<Asset>,
    index: HashMap<AssetId, usize>,
    frames: Vec<Frame>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Rgba8::WHITE)
    }
}

impl Scene {
    /// Empty scene with the given background color.
    pub fn new(background: Rgba8) -> Self {
        Self {
            background,
            assets: Vec::new(),
            index: HashMap::new(),
            frames: Vec::new(),
        }
    }

    /// Background ("stage") color.
    pub fn background(&self) -> Rgba8 {
        self.background
    }

    /// Assets in insertion order.
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Frames in declared order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Add an asset. Identifiers must be unique.
    pub fn add_asset(&mut self, asset: Asset) -> ReelResult<()> {
        if self.index.contains_key(&asset.id) {
            return Err(ReelError::validation(format!(
                "duplicate asset id {}",
                asset.id
            )));
        }
        self.index.insert(asset.id, self.assets.len());
        self.assets.push(asset);
        Ok(())
    }

    /// Append a frame after the existing ones.
    pub fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Look up an asset by identifier. A miss is `None`, never a default asset.
    pub fn resolve_asset(&self, id: AssetId) -> Option<&Asset> {
        self.index.get(&id).map(|&i| &self.assets[i])
    }

    /// Check every placement in every frame resolves.
    ///
    /// Reports the first dangling reference in frame order.
    pub fn validate_references(&self) -> ReelResult<()> {
        for (i, frame) in self.frames.iter().enumerate() {
            if let Some(r) = frame
                .renders
                .iter()
                .find(|r| self.resolve_asset(r.asset).is_none())
            {
                return Err(ReelError::Reference {
                    asset: r.asset,
                    frame: FrameIndex(i as u64),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
