use std::cell::RefCell;

use super::*;
use crate::assets::PreparedImage;
use crate::frames::manifest::{FrameManifest, FrameNaming};
use crate::scene::page::StaticLayout;

#[derive(Default)]
struct Log {
    renders: u32,
    invalidations: u32,
    sizes: Vec<(f64, f64)>,
}

struct Tally(Rc<RefCell<Log>>);

impl Consumer for Tally {
    fn name(&self) -> &str {
        "tally"
    }

    fn render(&mut self) -> ScrollyteResult<()> {
        self.0.borrow_mut().renders += 1;
        Ok(())
    }

    fn invalidate(&mut self) {
        self.0.borrow_mut().invalidations += 1;
    }

    fn resize(&mut self, viewport: Viewport) -> ScrollyteResult<()> {
        self.0
            .borrow_mut()
            .sizes
            .push((viewport.width, viewport.height));
        Ok(())
    }

    fn snapshot(&self) -> Option<FrameRGBA> {
        None
    }
}

fn vp(w: f64, h: f64) -> Viewport {
    Viewport::new(w, h).unwrap()
}

fn stage() -> Stage {
    Stage::new(vp(1920.0, 1000.0), SmoothingConfig::default()).unwrap()
}

fn layout() -> StaticLayout {
    StaticLayout::new()
        .with_box("hero", 0.0, 3000.0)
        .with_box("after", 3000.0, 1000.0)
        .with_box("aside", 3200.0, 400.0)
        .with_parent("aside-item", "aside")
}

#[test]
fn first_tick_measures_before_bounding_scroll() {
    let mut s = stage();
    s.register(RegionSpec::new("hero").priority(1).pinned())
        .unwrap();
    assert!(s.remeasure_pending());

    let report = s.tick(0.016, &layout()).unwrap();
    let measured = report.remeasured.unwrap();
    assert_eq!(measured.document_height, 6000.0);
    assert_eq!(s.smoothing().max_scroll(), 5000.0);

    s.smoothing_mut().jump_to(1e9);
    assert_eq!(s.smoothing().position(), 5000.0);

    let report = s.tick(0.016, &layout()).unwrap();
    assert!(report.remeasured.is_none());
    assert_eq!(report.regions[0].progress, 1.0);
    assert_eq!(report.tick, 2);
}

#[test]
fn ready_sequence_schedules_one_remeasure() {
    let mut s = stage();
    s.register(RegionSpec::new("hero")).unwrap();
    let manifest = FrameManifest {
        base_path: "f".into(),
        naming: FrameNaming::Padded {
            width: 2,
            prefix: String::new(),
            suffix: ".webp".into(),
        },
        total_frames: 3,
        sampled_count: 3,
    };
    let seq = FrameSequence::new("hero", &manifest).unwrap();
    let _watch = s.watch_sequence(&seq);

    s.tick(0.016, &layout()).unwrap();
    assert!(s.tick(0.016, &layout()).unwrap().remeasured.is_none());

    let tickets = seq.begin_load().unwrap();
    for t in tickets {
        t.complete(Ok(PreparedImage::solid(1, 1, [0, 0, 0, 255])));
        assert!(!s.remeasure_pending() || seq.is_ready());
    }
    assert!(s.remeasure_pending());
    assert!(s.tick(0.016, &layout()).unwrap().remeasured.is_some());
    assert!(s.tick(0.016, &layout()).unwrap().remeasured.is_none());
}

#[test]
fn dropped_watch_no_longer_schedules_remeasure() {
    let mut s = stage();
    let manifest = FrameManifest {
        base_path: "f".into(),
        naming: FrameNaming::Padded {
            width: 2,
            prefix: String::new(),
            suffix: ".webp".into(),
        },
        total_frames: 2,
        sampled_count: 2,
    };
    let seq = FrameSequence::new("late", &manifest).unwrap();
    s.tick(0.016, &layout()).unwrap();

    drop(s.watch_sequence(&seq));
    for t in seq.begin_load().unwrap() {
        t.complete(Ok(PreparedImage::solid(1, 1, [0, 0, 0, 255])));
    }
    assert!(seq.is_ready());
    assert!(!s.remeasure_pending());

    // Watching an already-ready sequence schedules at once and holds nothing.
    let watch = s.watch_sequence(&seq);
    assert!(!watch.is_active());
    assert!(s.remeasure_pending());
}

#[test]
fn consumers_render_every_tick_and_reset_on_remeasure() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut s = stage();
    s.add_consumer(Box::new(Tally(log.clone()))).unwrap();
    assert_eq!(s.consumer_names(), vec!["tally"]);
    assert_eq!(log.borrow().sizes, vec![(1920.0, 1000.0)]);

    s.tick(0.016, &layout()).unwrap();
    s.tick(0.016, &layout()).unwrap();
    assert_eq!(log.borrow().renders, 2);
    assert_eq!(log.borrow().invalidations, 1);

    s.resize(vp(800.0, 600.0)).unwrap();
    assert_eq!(log.borrow().sizes.last(), Some(&(800.0, 600.0)));
    s.tick(0.016, &layout()).unwrap();
    assert_eq!(log.borrow().invalidations, 2);
}

#[test]
fn resize_rebounds_scroll() {
    let mut s = stage();
    s.register(RegionSpec::new("hero").pinned()).unwrap();
    s.tick(0.0, &layout()).unwrap();
    assert_eq!(s.smoothing().max_scroll(), 5000.0);

    // 1500px viewport: spacer 1500, document 5500.
    s.resize(vp(1920.0, 1500.0)).unwrap();
    s.tick(0.0, &layout()).unwrap();
    assert_eq!(s.smoothing().max_scroll(), 4000.0);
}

#[test]
fn unregister_triggers_remeasure() {
    let mut s = stage();
    let hero = s.register(RegionSpec::new("hero").pinned()).unwrap();
    s.tick(0.0, &layout()).unwrap();
    assert!(s.unregister(hero.id));
    let report = s.tick(0.0, &layout()).unwrap();
    assert_eq!(report.remeasured.unwrap().total_spacer, 0.0);
    assert_eq!(s.smoothing().max_scroll(), 3000.0);
}

#[test]
fn exempt_input_does_not_move_the_page() {
    let config = SmoothingConfig {
        exempt: vec![ElementId::from("aside")],
        ..Default::default()
    };
    let mut s = Stage::new(vp(1920.0, 1000.0), config).unwrap();
    s.tick(0.0, &layout()).unwrap();

    let lay = layout();
    let inner = ScrollInput::wheel(300.0).from_element("aside-item");
    assert_eq!(s.input(&inner, &lay), InputDisposition::Ignored);
    assert_eq!(s.tick(0.1, &lay).unwrap().scroll, 0.0);

    assert_eq!(
        s.input(&ScrollInput::wheel(300.0), &lay),
        InputDisposition::Captured
    );
    assert!(s.tick(0.1, &lay).unwrap().scroll > 0.0);
}

#[test]
fn settle_at_skips_scrub_lag() {
    let mut s = stage();
    let hero = s
        .register(RegionSpec::new("hero").pinned().scrub(0.5).span(87.0))
        .unwrap();
    s.settle_at(1000.0, &layout()).unwrap();
    assert_eq!(s.smoothing().position(), 1000.0);
    assert!((hero.progress.get() - 43.5).abs() < 1e-9);
}

#[test]
fn tick_report_serializes() {
    let mut s = stage();
    s.register(RegionSpec::new("hero")).unwrap();
    let report = s.tick(0.016, &layout()).unwrap();
    let v = serde_json::to_value(&report).unwrap();
    assert_eq!(v["tick"], 1);
    assert_eq!(v["regions"][0]["trigger"], "hero");
    assert!(v["remeasured"].is_object());
}
