use super::*;
use crate::morph::phases::{MorphConfig, RING_COUNT};
use crate::render::recording::{DrawCall, RecordingSurface};

fn section(w: u32, h: u32) -> MorphSection<RecordingSurface> {
    MorphSection::new(
        "morph",
        MorphTimeline::new(&MorphConfig::default()).unwrap(),
        ProgressHandle::new(1.0),
        RecordingSurface::new(w, h),
    )
}

#[test]
fn viewbox_maps_centre_to_surface_centre() {
    let xf = viewbox_transform((960, 1080));
    let c = xf * Point::new(960.0, 540.0);
    assert!((c.x - 480.0).abs() < 1e-9);
    assert!((c.y - 540.0).abs() < 1e-9);
    assert!((xf.as_coeffs()[0] - 0.5).abs() < 1e-12);
}

#[test]
fn draws_rings_then_sun() {
    let mut s = section(1920, 1080);
    assert!(s.draw().unwrap());
    let calls = s.surface().last_frame().unwrap();
    assert_eq!(calls[0], DrawCall::Clear);
    let strokes = calls
        .iter()
        .filter(|c| matches!(c, DrawCall::Stroke { .. }))
        .count();
    assert_eq!(strokes, RING_COUNT);
    assert!(matches!(calls.last(), Some(DrawCall::Fill { .. })));
}

#[test]
fn unchanged_progress_skips_redraw() {
    let mut s = section(100, 100);
    s.render().unwrap();
    assert!(!s.draw().unwrap());
    s.progress().set(0.3);
    assert!(s.draw().unwrap());
    s.invalidate();
    assert!(s.draw().unwrap());
    assert_eq!(s.surface().present_count(), 3);
}

#[test]
fn end_state_shows_only_drawer() {
    let mut s = section(1000, 500);
    s.progress().set(1.0);
    s.draw().unwrap();
    let calls = s.surface().last_frame().unwrap();
    assert_eq!(calls.len(), 2);
    let DrawCall::Fill { points, .. } = &calls[1] else {
        panic!("expected drawer fill, got {:?}", calls[1]);
    };
    assert!((points[0].x - 620.0).abs() < 1e-9);
    assert_eq!(s.last_frame().unwrap().overlay.drawer_x_percent, 0.0);
}
