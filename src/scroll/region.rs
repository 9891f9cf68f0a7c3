use crate::{
    animation::progress::ProgressHandle,
    foundation::core::ElementId,
    foundation::error::{ScrollyteError, ScrollyteResult},
    scroll::offsets::Offset,
};

/// Natural (unpinned, spacer-free) document box of a page element.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElementBox {
    /// Offset of the element's top from the document top.
    pub top: f64,
    pub height: f64,
}

/// Host page layout as seen by the scheduler.
///
/// Positions are reported without any pin spacers; the scheduler adds those itself.
pub trait LayoutSource {
    /// Box of `id`, or `None` when the element is not (yet) in the page.
    fn element_box(&self, id: &ElementId) -> Option<ElementBox>;

    /// Natural document height.
    fn document_height(&self) -> f64;
}

/// Stable identifier of a registered region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct RegionId(pub u64);

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}", self.0)
    }
}

fn default_start() -> Offset {
    Offset::top_top()
}

fn default_end() -> Offset {
    Offset::bottom_bottom()
}

fn default_span() -> f64 {
    1.0
}

/// Registration request for a scroll-bound region.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RegionSpec {
    /// Element whose box the offsets are resolved against.
    pub trigger: ElementId,
    #[serde(default = "default_start")]
    pub start: Offset,
    #[serde(default = "default_end")]
    pub end: Offset,
    /// Measurement rank; lower values are measured first.
    #[serde(default)]
    pub priority: i32,
    /// Hold the trigger fixed between start and end, inserting a spacer of that length.
    #[serde(default)]
    pub pin: bool,
    /// Lag time constant in seconds; `None` follows scroll directly.
    #[serde(default)]
    pub scrub: Option<f64>,
    /// Upper bound of the region's progress value (`frameCount - 1` for frame sequences).
    #[serde(default = "default_span")]
    pub span: f64,
}

impl RegionSpec {
    /// A region over `trigger` with `"top top"` / `"bottom bottom"` offsets.
    pub fn new(trigger: impl Into<ElementId>) -> Self {
        Self {
            trigger: trigger.into(),
            start: default_start(),
            end: default_end(),
            priority: 0,
            pin: false,
            scrub: None,
            span: default_span(),
        }
    }

    pub fn start(mut self, start: Offset) -> Self {
        self.start = start;
        self
    }

    pub fn end(mut self, end: Offset) -> Self {
        self.end = end;
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn pinned(mut self) -> Self {
        self.pin = true;
        self
    }

    pub fn scrub(mut self, seconds: f64) -> Self {
        self.scrub = Some(seconds);
        self
    }

    pub fn span(mut self, span: f64) -> Self {
        self.span = span;
        self
    }

    pub fn validate(&self) -> ScrollyteResult<()> {
        if self.trigger.as_str().is_empty() {
            return Err(ScrollyteError::validation("region trigger must be non-empty"));
        }
        if !self.span.is_finite() || self.span < 0.0 {
            return Err(ScrollyteError::validation(
                "region span must be finite and >= 0",
            ));
        }
        if let Some(s) = self.scrub
            && (!s.is_finite() || s <= 0.0)
        {
            return Err(ScrollyteError::validation(
                "region scrub must be finite and > 0",
            ));
        }
        if matches!(self.start, Offset::Relative(_)) {
            return Err(ScrollyteError::validation(
                "region start cannot be relative",
            ));
        }
        Ok(())
    }
}

/// What `register` hands back: the region id and its progress value.
#[derive(Clone, Debug)]
pub struct RegionHandle {
    pub id: RegionId,
    pub progress: ProgressHandle,
}

/// Scroll range of a region after measurement.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ResolvedRange {
    /// Trigger top including spacers of earlier pinned regions.
    pub trigger_top: f64,
    pub start: f64,
    pub end: f64,
    /// Scroll length consumed by pinning (0 for unpinned regions).
    pub spacer: f64,
}

impl ResolvedRange {
    /// Normalized progress at `scroll`, clamped to `[0, 1]`.
    pub fn progress_at(&self, scroll: f64) -> f64 {
        let len = self.end - self.start;
        if len <= 0.0 {
            return if scroll >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll - self.start) / len).clamp(0.0, 1.0)
    }

    pub fn zone_at(&self, scroll: f64) -> Zone {
        if scroll < self.start {
            Zone::Before
        } else if scroll > self.end {
            Zone::After
        } else {
            Zone::Active
        }
    }
}

/// Where the scroll position sits relative to a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Before,
    Active,
    After,
}

/// Boundary crossing kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionEventKind {
    /// Scrolling down past the start.
    Enter,
    /// Scrolling down past the end.
    Leave,
    /// Scrolling up past the end.
    EnterBack,
    /// Scrolling up past the start.
    LeaveBack,
}

/// Emitted by the scheduler when the scroll position crosses a region boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RegionEvent {
    pub region: RegionId,
    pub kind: RegionEventKind,
}

/// Boundary events for a zone change, in crossing order.
pub fn zone_transition(from: Zone, to: Zone) -> &'static [RegionEventKind] {
    use RegionEventKind::*;
    match (from, to) {
        (Zone::Before, Zone::Active) => &[Enter],
        (Zone::Before, Zone::After) => &[Enter, Leave],
        (Zone::Active, Zone::After) => &[Leave],
        (Zone::After, Zone::Active) => &[EnterBack],
        (Zone::After, Zone::Before) => &[EnterBack, LeaveBack],
        (Zone::Active, Zone::Before) => &[LeaveBack],
        _ => &[],
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/region.rs"]
mod tests;
