use super::*;
use crate::morph::points::POINT_COUNT;

fn standard() -> MorphTimeline {
    MorphTimeline::new(&MorphConfig::default()).unwrap()
}

fn at_time(tl: &MorphTimeline, t: f64) -> MorphFrame {
    tl.evaluate(t / tl.duration()).unwrap()
}

#[test]
fn standard_layout_durations() {
    let tl = standard();
    // converge + hold + 3 * (bloom + settle + hold) + return + hold
    assert_eq!(tl.label_time(PORTAL_LABEL), Some(19.5));
    // drawer ends at 24.0, rows start 0.6 earlier and span 1.72
    assert!((tl.duration() - 25.12).abs() < 1e-9);

    let phases = tl.phases();
    assert_eq!(phases[0].0, MorphPhase::Converge);
    assert_eq!(phases[0].1, 0.0);
    assert!((phases[0].2 - 2.0 / tl.duration()).abs() < 1e-12);
    assert_eq!(
        phases[2].0,
        MorphPhase::Bloom {
            from: ShapeKind::Circle,
            to: ShapeKind::Square
        }
    );
    assert_eq!(phases.last().unwrap().0, MorphPhase::RadialFade);
    assert!(phases.windows(2).all(|w| w[0].2 <= w[1].1 + 1e-12));
}

#[test]
fn without_portal_ends_on_hold() {
    let tl = MorphTimeline::new(&MorphConfig {
        portal: false,
        ..MorphConfig::default()
    })
    .unwrap();
    assert_eq!(tl.duration(), 19.5);
    assert_eq!(tl.label_time(PORTAL_LABEL), None);
    let end = tl.evaluate(1.0).unwrap();
    assert_eq!(end.phase, "hold");
    assert_eq!(end.overlay.drawer_x_percent, 100.0);
    assert_eq!(end.geometry.sun_opacity, 1.0);
}

#[test]
fn intro_starts_scattered() {
    let tl = standard();
    let f = tl.evaluate(0.0).unwrap();
    assert_eq!(f.phase, "converge");
    assert_eq!(f.geometry.rings.len(), RING_COUNT);
    assert!(f.geometry.rings.iter().all(|r| r.len() == POINT_COUNT));
    assert_eq!(f.geometry.ring_opacity[0], PRIMARY_RING_OPACITY);
    assert!((f.geometry.ring_opacity[1] - 0.3).abs() < 1e-12);

    let c = f.geometry.rings[0].centroid().unwrap();
    assert!((c.x - (960.0 - 3.0 * SPACING)).abs() < 1e-9);
    let sun_r = (f.geometry.sun.points()[0] - CENTER).hypot();
    assert!((sun_r - 40.0).abs() < 1e-9);
}

#[test]
fn holds_freeze_previous_phase_end() {
    let tl = standard();
    let end_of_converge = MorphPhase::Converge.evaluate(1.0).unwrap().unwrap();
    let hold = at_time(&tl, 2.5);
    assert_eq!(hold.phase, "hold");
    assert_eq!(hold.geometry, end_of_converge);
}

#[test]
fn settle_hands_over_to_next_bloom_exactly() {
    let settle_end = MorphPhase::Settle {
        kind: ShapeKind::Square,
    }
    .evaluate(1.0)
    .unwrap()
    .unwrap();
    let bloom_start = MorphPhase::Bloom {
        from: ShapeKind::Square,
        to: ShapeKind::Triangle,
    }
    .evaluate(0.0)
    .unwrap()
    .unwrap();
    assert_eq!(settle_end.rings, bloom_start.rings);
    assert_eq!(settle_end.sun, bloom_start.sun);
}

#[test]
fn bloom_peaks_mid_phase() {
    let phase = MorphPhase::Bloom {
        from: ShapeKind::Circle,
        to: ShapeKind::Square,
    };
    let mid = phase.evaluate(0.5).unwrap().unwrap();
    assert!((mid.ring_opacity[3] - 0.5).abs() < 1e-12);
    let edge = phase.evaluate(0.0).unwrap().unwrap();
    assert!((edge.ring_opacity[3] - 0.1).abs() < 1e-12);
}

#[test]
fn radial_fade_clears_scene_and_overlay_arrives() {
    let tl = standard();
    let early = at_time(&tl, 19.7);
    assert_eq!(early.phase, "radial_fade");
    assert!(early.geometry.sun_opacity > 0.9);
    assert_eq!(early.overlay.video_opacity, 0.0);

    let faded = at_time(&tl, 22.0);
    assert_eq!(faded.phase, "radial_fade");
    assert!(faded.geometry.sun_opacity.abs() < 1e-12);
    assert!(faded.geometry.ring_opacity.iter().all(|o| o.abs() < 1e-12));
    let sun_r = (faded.geometry.sun.points()[5] - CENTER).hypot();
    assert!((sun_r - 1.5 * SPACING).abs() < 1e-9);

    let end = tl.evaluate(1.0).unwrap();
    assert!((end.overlay.video_opacity - 0.6).abs() < 1e-12);
    assert!((end.overlay.video_scale - 1.15).abs() < 1e-12);
    assert_eq!(end.overlay.drawer_x_percent, 0.0);
    assert_eq!(end.overlay.rows.len(), 10);
    assert!(end.overlay.rows.iter().all(|r| r.opacity == 1.0 && r.x == 0.0));
    assert_eq!(end.overlay.content_opacity, 1.0);
}

#[test]
fn client_rows_enter_in_order() {
    let tl = standard();
    let f = at_time(&tl, 23.6);
    let rows = &f.overlay.rows;
    assert!(rows[0].opacity > 0.0);
    assert!(rows.windows(2).all(|w| w[0].opacity >= w[1].opacity));
    assert_eq!(rows[9].opacity, 0.0);
}

#[test]
fn every_progress_yields_full_scene() {
    let tl = standard();
    for i in 0..=500 {
        let f = tl.evaluate(f64::from(i) / 500.0).unwrap();
        assert_eq!(f.geometry.rings.len(), RING_COUNT);
        assert_eq!(f.geometry.ring_opacity.len(), RING_COUNT);
        assert_eq!(f.geometry.sun.len(), POINT_COUNT);
        assert!(f.geometry.ring_opacity.iter().all(|o| (0.0..=1.0).contains(o)));
    }
    assert!(tl.evaluate(f64::NAN).is_ok());
}
