//! Built-in outline generators.
//!
//! Outlines are centered on the local origin so a placement's rotation spins them in place.

use crate::foundation::core::{BezPath, Point};
use crate::foundation::error::{ReelError, ReelResult};
use kurbo::Shape as _;

/// Ratio of outer to inner radius used when a star's inner radius is not given.
pub const DEFAULT_STAR_RATIO: f64 = 2.5;

const CIRCLE_TOLERANCE: f64 = 0.1;

/// A five-pointed star with its first point straight up (toward negative y).
pub fn star(outer_radius: f64, inner_radius: f64) -> ReelResult<BezPath> {
    check_radius("star outer_radius", outer_radius)?;
    check_radius("star inner_radius", inner_radius)?;

    let mut path = BezPath::new();
    for i in 0..10u32 {
        let deg = 270.0 + 36.0 * f64::from(i);
        let r = if i % 2 == 0 { outer_radius } else { inner_radius };
        let (sin, cos) = deg.to_radians().sin_cos();
        let p = Point::new(r * cos, r * sin);
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
    Ok(path)
}

/// A circle of `radius` around the origin, flattened to cubic segments.
pub fn circle(radius: f64) -> ReelResult<BezPath> {
    check_radius("circle radius", radius)?;
    Ok(kurbo::Circle::new(Point::ORIGIN, radius).to_path(CIRCLE_TOLERANCE))
}

/// Parse SVG path data (the `d` attribute).
pub fn svg_path(d: &str) -> ReelResult<BezPath> {
    BezPath::from_svg(d).map_err(|e| ReelError::validation(format!("invalid svg path data: {e}")))
}

fn check_radius(what: &str, r: f64) -> ReelResult<()> {
    if !r.is_finite() || r <= 0.0 {
        return Err(ReelError::validation(format!(
            "{what} must be finite and > 0, got {r}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/shapes.rs"]
mod tests;
