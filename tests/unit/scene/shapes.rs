use super::*;
use kurbo::Shape;

#[test]
fn star_has_ten_vertices_and_points_up() {
    let path = star(100.0, 40.0).unwrap();
    let els = path.elements();
    // move + 9 lines + close
    assert_eq!(els.len(), 11);
    match els[0] {
        kurbo::PathEl::MoveTo(p) => {
            assert!(p.x.abs() < 1e-9);
            assert!((p.y + 100.0).abs() < 1e-9);
        }
        other => panic!("expected MoveTo, got {other:?}"),
    }
    let bbox = path.bounding_box();
    assert!(bbox.min_y() >= -100.0 - 1e-9);
    assert!(bbox.max_x() <= 100.0 + 1e-9);
}

#[test]
fn circle_bounds_match_radius() {
    let path = circle(25.0).unwrap();
    let bbox = path.bounding_box();
    assert!((bbox.width() - 50.0).abs() < 0.5);
    assert!((bbox.center().x).abs() < 1e-6);
}

#[test]
fn bad_radii_are_rejected() {
    assert!(star(0.0, 1.0).is_err());
    assert!(star(10.0, -1.0).is_err());
    assert!(circle(f64::NAN).is_err());
}

#[test]
fn svg_path_parses_and_rejects_garbage() {
    let p = svg_path("M-50,-50 L50,50 Z").unwrap();
    assert_eq!(p.elements().len(), 3);
    assert!(svg_path("M 10 nope").is_err());
}
