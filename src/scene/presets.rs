use crate::{
    foundation::core::ElementId,
    scroll::offsets::{Edge, Offset},
    scroll::region::RegionSpec,
};

/// Region shapes used by the production page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionPreset {
    /// 300vh hero container pinned from `top top` to `bottom bottom`, scrub 0.5.
    Hero,
    /// Shape morph section pinned for eleven viewports, scrub 1.
    Morph,
    /// Shorter morph variant pinned for eight viewports.
    MorphCompact,
    /// Video overlay pinned for three viewports, scrub 1.
    VideoOverlay,
    /// Unpinned copy block, `top 80%` to `bottom 20%`.
    TextReveal,
    /// Unpinned section title, `top 85%` to `top 30%`, scrub 1.
    TitleReveal,
}

impl RegionPreset {
    /// Region spec for `trigger` with progress over `[0, span]`.
    pub fn spec(self, trigger: impl Into<ElementId>, span: f64) -> RegionSpec {
        let base = RegionSpec::new(trigger).span(span);
        match self {
            Self::Hero => base.priority(1).pinned().scrub(0.5),
            Self::Morph => base
                .priority(2)
                .pinned()
                .scrub(1.0)
                .end(Offset::viewports(1100.0)),
            Self::MorphCompact => base
                .priority(2)
                .pinned()
                .scrub(1.0)
                .end(Offset::viewports(800.0)),
            Self::VideoOverlay => base
                .priority(3)
                .pinned()
                .scrub(1.0)
                .end(Offset::viewports(300.0)),
            Self::TextReveal => base
                .priority(4)
                .start(anchor(Edge::Top, 80.0))
                .end(anchor(Edge::Bottom, 20.0)),
            Self::TitleReveal => base
                .priority(4)
                .scrub(1.0)
                .start(anchor(Edge::Top, 85.0))
                .end(anchor(Edge::Top, 30.0)),
        }
    }
}

fn anchor(element: Edge, viewport_pct: f64) -> Offset {
    Offset::Anchor {
        element,
        viewport: Edge::Percent(viewport_pct),
    }
}
