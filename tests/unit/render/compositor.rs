use super::*;
use crate::foundation::core::{AssetId, BezPath, Point, Rgba8, Vec2};
use crate::render::cpu::CpuRasterizer;
use crate::scene::model::Asset;
use kurbo::Shape as _;

#[derive(Debug, PartialEq)]
enum Call {
    Begin(Rgba8),
    Fill(Rgba8, Affine),
    Stroke(Rgba8, f64),
    Finish,
}

#[derive(Default)]
struct Recording {
    calls: Vec<Call>,
    canvas: Option<Canvas>,
}

impl Rasterizer for Recording {
    fn begin(&mut self, canvas: Canvas, background: Rgba8) -> ReelResult<()> {
        self.canvas = Some(canvas);
        self.calls.push(Call::Begin(background));
        Ok(())
    }

    fn fill_path(&mut self, _path: &BezPath, transform: Affine, color: Rgba8) -> ReelResult<()> {
        self.calls.push(Call::Fill(color, transform));
        Ok(())
    }

    fn stroke_path(
        &mut self,
        _path: &BezPath,
        _transform: Affine,
        color: Rgba8,
        width: f64,
    ) -> ReelResult<()> {
        self.calls.push(Call::Stroke(color, width));
        Ok(())
    }

    fn finish(&mut self) -> ReelResult<PixelBuffer> {
        self.calls.push(Call::Finish);
        let canvas = self
            .canvas
            .ok_or_else(|| ReelError::validation("finish before begin"))?;
        PixelBuffer::filled(canvas, Rgba8::TRANSPARENT)
    }
}

fn square(half: f64) -> BezPath {
    kurbo::Rect::new(-half, -half, half, half).to_path(0.1)
}

fn scene() -> Scene {
    let mut s = Scene::new(Rgba8::WHITE);
    s.add_asset(
        Asset::new(AssetId(1))
            .with_outline(square(10.0))
            .with_outline(square(4.0))
            .with_fill(Rgba8::RED),
    )
    .unwrap();
    s.add_asset(
        Asset::new(AssetId(2))
            .with_outline(square(10.0))
            .with_fill(Rgba8::rgb(0, 0, 255))
            .with_stroke(Rgba8::BLACK, 2.0),
    )
    .unwrap();
    s
}

#[test]
fn paints_placements_and_outlines_in_order() {
    let scene = scene();
    let frame = Frame::new()
        .with(AssetRender::new(AssetId(1), Vec2::new(5.0, 5.0)))
        .with(AssetRender::new(AssetId(2), Vec2::new(7.0, 7.0)));
    let mut r = Recording::default();
    compose_frame(
        &scene,
        &frame,
        FrameIndex(0),
        Canvas::new(16, 16).unwrap(),
        &mut r,
    )
    .unwrap();

    let t1 = Affine::translate((5.0, 5.0));
    let t2 = Affine::translate((7.0, 7.0));
    assert_eq!(
        r.calls,
        vec![
            Call::Begin(Rgba8::WHITE),
            Call::Fill(Rgba8::RED, t1),
            Call::Fill(Rgba8::RED, t1),
            Call::Fill(Rgba8::rgb(0, 0, 255), t2),
            Call::Stroke(Rgba8::BLACK, 2.0),
            Call::Finish,
        ]
    );
}

#[test]
fn missing_asset_reports_id_and_frame() {
    let scene = scene();
    let frame = Frame::new()
        .with(AssetRender::new(AssetId(1), Vec2::ZERO))
        .with(AssetRender::new(AssetId(42), Vec2::ZERO));
    let mut r = Recording::default();
    let err = compose_frame(
        &scene,
        &frame,
        FrameIndex(6),
        Canvas::new(4, 4).unwrap(),
        &mut r,
    )
    .unwrap_err();
    match err {
        ReelError::Reference { asset, frame } => {
            assert_eq!(asset, AssetId(42));
            assert_eq!(frame, FrameIndex(6));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!r.calls.contains(&Call::Finish));
}

#[test]
fn rotation_is_about_shape_origin_then_translated() {
    let render = AssetRender::new(AssetId(1), Vec2::new(100.0, 50.0)).rotated(90.0);
    let t = placement_transform(&render);
    let p = t * Point::new(10.0, 0.0);
    assert!((p.x - 100.0).abs() < 1e-9);
    assert!((p.y - 60.0).abs() < 1e-9);

    let origin = t * Point::ORIGIN;
    assert!((origin.x - 100.0).abs() < 1e-9);
    assert!((origin.y - 50.0).abs() < 1e-9);
}

#[test]
fn later_placements_paint_over_earlier_ones() {
    let scene = scene();
    let frame = Frame::new()
        .with(AssetRender::new(AssetId(1), Vec2::new(16.0, 16.0)))
        .with(AssetRender::new(AssetId(2), Vec2::new(16.0, 16.0)));
    let mut r = CpuRasterizer::new();
    let px = compose_frame(
        &scene,
        &frame,
        FrameIndex(0),
        Canvas::new(32, 32).unwrap(),
        &mut r,
    )
    .unwrap();
    assert_eq!(px.pixel(16, 16), Some(Rgba8::rgb(0, 0, 255)));
    assert_eq!(px.pixel(0, 0), Some(Rgba8::WHITE));
}

#[test]
fn empty_frame_is_background() {
    let scene = scene();
    let mut r = CpuRasterizer::new();
    let px = compose_frame(
        &scene,
        &Frame::new(),
        FrameIndex(0),
        Canvas::new(5, 3).unwrap(),
        &mut r,
    )
    .unwrap();
    assert_eq!(px, PixelBuffer::filled(Canvas::new(5, 3).unwrap(), Rgba8::WHITE).unwrap());
}
