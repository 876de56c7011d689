use crate::foundation::core::{Affine, Canvas, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::backend::{PixelBuffer, Rasterizer};
use crate::scene::model::{AssetRender, Frame, Scene};

/// Composite one frame of `scene` into a pixel buffer.
///
/// Steps:
/// 1. clear the canvas to the scene background;
/// 2. for each placement in order, resolve its asset and paint every outline (fill, then
///    stroke when the asset has a stroke width), so later placements cover earlier ones;
/// 3. read back a top-down RGBA buffer.
///
/// A placement whose asset is missing fails the frame with [`ReelError::Reference`].
pub fn compose_frame(
    scene: &Scene,
    frame: &Frame,
    index: FrameIndex,
    canvas: Canvas,
    rasterizer: &mut dyn Rasterizer,
) -> ReelResult<PixelBuffer> {
    rasterizer.begin(canvas, scene.background())?;

    for render in &frame.renders {
        let asset = scene
            .resolve_asset(render.asset)
            .ok_or(ReelError::Reference {
                asset: render.asset,
                frame: index,
            })?;

        let transform = placement_transform(render);
        for outline in &asset.outlines {
            rasterizer.fill_path(outline, transform, asset.fill)?;
            if asset.stroke_width > 0.0 {
                rasterizer.stroke_path(outline, transform, asset.stroke, asset.stroke_width)?;
            }
        }
    }

    let pixels = rasterizer.finish()?;
    if pixels.width() != canvas.width || pixels.height() != canvas.height {
        return Err(ReelError::SizeMismatch {
            expected: canvas.rgba_len().unwrap_or(usize::MAX),
            actual: pixels.data().len(),
        });
    }
    Ok(pixels)
}

/// Rotate the shape about its own origin, then move it to the placement position.
pub fn placement_transform(render: &AssetRender) -> Affine {
    Affine::translate(render.position) * Affine::rotate(render.rotation_deg.to_radians())
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
