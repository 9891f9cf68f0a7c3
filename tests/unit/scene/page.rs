use super::*;
use crate::assets::loader::{MemoryLoader, PlaceholderLoader};
use crate::render::recording::RecordingSurface;
use crate::scroll::offsets::Offset;

const PAGE: &str = r#"{
  "viewport": { "width": 1920, "height": 1000 },
  "elements": [
    { "id": "main", "top": 0, "height": 8000 },
    { "id": "hero", "top": 0, "height": 3000, "parent": "main" },
    { "id": "services", "top": 3000, "height": 1000, "parent": "main" },
    { "id": "copy", "top": 4000, "height": 600, "parent": "main" },
    { "id": "aside", "top": 4600, "height": 400, "parent": "main" }
  ],
  "smoothing": { "exempt": ["aside"] },
  "sections": [
    {
      "name": "hero",
      "preset": "hero",
      "consumer": {
        "kind": "frames",
        "frames": { "source": "hero" },
        "player": { "rounding": "round" }
      }
    },
    {
      "name": "services",
      "preset": "morph",
      "consumer": { "kind": "morph", "morph": { "client_rows": 4 } }
    },
    {
      "name": "copy",
      "region": { "trigger": "copy", "start": "top 80%", "end": "bottom 20%", "priority": 4 }
    }
  ]
}"#;

fn page() -> Page {
    Page::from_reader(PAGE.as_bytes()).unwrap()
}

#[test]
fn parses_and_validates() {
    let p = page();
    p.validate().unwrap();
    assert_eq!(p.def().sections.len(), 3);
    assert_eq!(p.def().smoothing.exempt, vec![ElementId::from("aside")]);
    assert_eq!(p.def().smoothing.touch_multiplier, 2.0);
}

#[test]
fn region_presets_resolve() {
    let p = page();
    let hero = region_for(&p.def().sections[0], Some(87.0));
    assert_eq!(hero.trigger, ElementId::from("hero"));
    assert!(hero.pin);
    assert_eq!(hero.scrub, Some(0.5));
    assert_eq!(hero.span, 87.0);
    assert_eq!(hero.priority, 1);

    let morph = region_for(&p.def().sections[1], None);
    assert_eq!(morph.end, Offset::viewports(1100.0));
    assert_eq!(morph.priority, 2);

    let copy = region_for(&p.def().sections[2], None);
    assert_eq!(copy.start, "top 80%".parse().unwrap());
    assert!(!copy.pin);
}

#[test]
fn title_reveal_scrubs_and_text_reveal_follows_directly() {
    use crate::scene::presets::RegionPreset;

    let title = RegionPreset::TitleReveal.spec("title", 1.0);
    assert_eq!(title.scrub, Some(1.0));
    assert!(!title.pin);
    assert_eq!(title.start, "top 85%".parse().unwrap());
    assert_eq!(title.end, "top 30%".parse().unwrap());

    let copy = RegionPreset::TextReveal.spec("copy", 1.0);
    assert_eq!(copy.scrub, None);
    assert_eq!(copy.priority, title.priority);
}

#[test]
fn rejects_broken_pages() {
    let mut def = page().def().clone();
    def.elements[1].parent = Some(ElementId::from("nowhere"));
    assert!(Page::from_def(def).validate().is_err());

    let mut def = page().def().clone();
    def.elements.push(def.elements[0].clone());
    assert!(Page::from_def(def).validate().is_err());

    let mut def = page().def().clone();
    def.sections[2].region = None;
    assert!(Page::from_def(def).validate().is_err());

    let mut def = page().def().clone();
    def.viewport.height = 0.0;
    assert!(Page::from_def(def).validate().is_err());

    assert!(matches!(
        Page::from_reader("{ not json".as_bytes()),
        Err(ScrollyteError::Serde(_))
    ));
}

#[test]
fn build_wires_sections_into_a_stage() {
    let p = page();
    let mut asked = Vec::new();
    let mut built = p
        .build(&PlaceholderLoader::new(4, 2), |section, vp| {
            asked.push(section.name.clone());
            Ok(RecordingSurface::new(vp.width as u32, vp.height as u32))
        })
        .unwrap();
    assert_eq!(asked, vec!["hero", "services"]);
    assert_eq!(built.stage.consumer_names(), vec!["hero", "services"]);

    let hero = built.section("hero").unwrap();
    let seq = hero.sequence.as_ref().unwrap();
    assert!(seq.is_ready());
    assert_eq!(seq.len(), 88);
    assert_eq!(hero.region.progress.span(), 87.0);
    assert!(built.section("copy").unwrap().sequence.is_none());

    let report = built.stage.tick(0.016, &built.layout).unwrap();
    let measured = report.remeasured.unwrap();
    // hero spacer 2000 + morph spacer 11000 on an 8000px page.
    assert_eq!(measured.total_spacer, 13_000.0);
    assert_eq!(measured.document_height, 21_000.0);
}

#[test]
fn missing_frames_do_not_fail_the_build() {
    let p = page();
    let built = p
        .build(&MemoryLoader::new(), |_, vp| {
            Ok(RecordingSurface::new(vp.width as u32, vp.height as u32))
        })
        .unwrap();
    let seq = built.section("hero").unwrap().sequence.clone().unwrap();
    assert!(seq.is_ready());
    assert_eq!(seq.errored_count(), 88);
}

#[test]
fn static_layout_reports_boxes_and_parents() {
    let layout = page().layout();
    assert_eq!(layout.document_height(), 8000.0);
    assert_eq!(
        layout.element_box(&ElementId::from("copy")),
        Some(ElementBox {
            top: 4000.0,
            height: 600.0
        })
    );
    assert_eq!(
        layout.parent(&ElementId::from("aside")),
        Some(ElementId::from("main"))
    );
    assert_eq!(layout.parent(&ElementId::from("main")), None);

    let mut layout = StaticLayout::new().with_box("a", 10.0, 5.0);
    assert_eq!(layout.document_height(), 15.0);
    assert!(layout.remove(&ElementId::from("a")).is_some());
    assert_eq!(layout.element_box(&ElementId::from("a")), None);
}
