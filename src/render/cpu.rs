use crate::foundation::core::{Affine, BezPath, Canvas, Rgba8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::backend::{PixelBuffer, Rasterizer};

/// CPU rasterizer powered by `vello_cpu`.
///
/// `vello_cpu` renders premultiplied RGBA8; [`Rasterizer::finish`] converts back to straight
/// alpha so encoders see the same channel values the scene declared.
#[derive(Default)]
pub struct CpuRasterizer {
    target: Option<Target>,
}

struct Target {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl CpuRasterizer {
    /// Create an idle rasterizer; call [`Rasterizer::begin`] before drawing.
    pub fn new() -> Self {
        Self::default()
    }

    fn target_mut(&mut self) -> ReelResult<&mut Target> {
        self.target
            .as_mut()
            .ok_or_else(|| ReelError::validation("rasterizer used before begin()"))
    }
}

impl Rasterizer for CpuRasterizer {
    fn begin(&mut self, canvas: Canvas, background: Rgba8) -> ReelResult<()> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| ReelError::validation("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| ReelError::validation("canvas height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(ReelError::validation("canvas width/height must be non-zero"));
        }

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color_to_cpu(background));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));

        self.target = Some(Target { width, height, ctx });
        Ok(())
    }

    fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Rgba8) -> ReelResult<()> {
        let t = self.target_mut()?;
        t.ctx.set_transform(affine_to_cpu(transform));
        t.ctx.set_paint(color_to_cpu(color));
        t.ctx.fill_path(&bezpath_to_cpu(path));
        Ok(())
    }

    fn stroke_path(
        &mut self,
        path: &BezPath,
        transform: Affine,
        color: Rgba8,
        width: f64,
    ) -> ReelResult<()> {
        if !width.is_finite() || width <= 0.0 {
            return Err(ReelError::validation(format!(
                "stroke width must be finite and > 0, got {width}"
            )));
        }
        let t = self.target_mut()?;
        t.ctx.set_transform(affine_to_cpu(transform));
        t.ctx.set_paint(color_to_cpu(color));
        t.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        t.ctx.stroke_path(&bezpath_to_cpu(path));
        Ok(())
    }

    fn finish(&mut self) -> ReelResult<PixelBuffer> {
        let mut t = self
            .target
            .take()
            .ok_or_else(|| ReelError::validation("rasterizer finish() without begin()"))?;

        let mut pixmap = vello_cpu::Pixmap::new(t.width, t.height);
        t.ctx.flush();
        t.ctx.render_to_pixmap(&mut pixmap);

        let mut data = pixmap.data_as_u8_slice().to_vec();
        unpremultiply_in_place(&mut data);
        PixelBuffer::from_rgba(u32::from(t.width), u32::from(t.height), data)
    }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Premultiplied RGBA8 to straight RGBA8, rounding to nearest.
pub(crate) fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            let v = (u16::from(*c) * 255 + a / 2) / a;
            *c = v.min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
