use crate::foundation::error::{ScrollyteError, ScrollyteResult};

/// Where a new segment is placed on a [`Timeline`].
#[derive(Clone, Debug, PartialEq)]
pub enum Position {
    /// At the current end of the timeline.
    End,
    /// At an absolute time.
    At(f64),
    /// Relative to the current end (`-0.6` overlaps the previous segment by 0.6).
    FromEnd(f64),
    /// Relative to a named label.
    Label {
        /// Label name.
        name: String,
        /// Offset added to the label time.
        offset: f64,
    },
}

/// One placed segment.
#[derive(Clone, Debug)]
pub struct Segment<P> {
    /// Start time in timeline units.
    pub start: f64,
    /// Duration in timeline units (> 0).
    pub duration: f64,
    /// Caller data, typically a phase descriptor.
    pub payload: P,
}

impl<P> Segment<P> {
    /// End time in timeline units.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// A scroll-driven timeline: segments laid out in abstract duration units and sampled by a
/// normalized progress in `[0, 1]`.
///
/// Durations are relative; a region's progress maps linearly onto `[0, duration()]`, so each
/// segment owns the progress sub-range `[start / total, end / total]`.
#[derive(Clone, Debug)]
pub struct Timeline<P> {
    segments: Vec<Segment<P>>,
    labels: Vec<(String, f64)>,
}

impl<P> Default for Timeline<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Timeline<P> {
    /// Create an empty timeline.
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Place a segment and return its index.
    pub fn push(&mut self, position: Position, duration: f64, payload: P) -> ScrollyteResult<usize> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(ScrollyteError::validation(
                "timeline segment duration must be finite and > 0",
            ));
        }
        let start = self.resolve(&position)?;
        self.segments.push(Segment {
            start,
            duration,
            payload,
        });
        Ok(self.segments.len() - 1)
    }

    /// Append a segment at the current end.
    pub fn then(&mut self, duration: f64, payload: P) -> ScrollyteResult<usize> {
        self.push(Position::End, duration, payload)
    }

    /// Add a label at the current end.
    pub fn add_label(&mut self, name: impl Into<String>) {
        let at = self.duration();
        self.labels.push((name.into(), at));
    }

    /// Time of a label, if defined.
    pub fn label_time(&self, name: &str) -> Option<f64> {
        self.labels
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, t)| *t)
    }

    /// Total duration: the latest segment end.
    pub fn duration(&self) -> f64 {
        self.segments
            .iter()
            .map(Segment::end)
            .fold(0.0, f64::max)
    }

    /// All placed segments in insertion order.
    pub fn segments(&self) -> &[Segment<P>] {
        &self.segments
    }

    /// Normalized progress sub-range `[start, end]` owned by segment `idx`.
    pub fn sub_range(&self, idx: usize) -> Option<(f64, f64)> {
        let total = self.duration();
        let seg = self.segments.get(idx)?;
        if total <= 0.0 {
            return Some((0.0, 0.0));
        }
        Some((seg.start / total, seg.end() / total))
    }

    /// Map normalized progress to timeline time.
    pub fn time_at(&self, progress: f64) -> f64 {
        progress.clamp(0.0, 1.0) * self.duration()
    }

    /// Local progress of segment `idx` at normalized `progress`, clamped to `[0, 1]`.
    pub fn local_progress(&self, idx: usize, progress: f64) -> f64 {
        let Some(seg) = self.segments.get(idx) else {
            return 0.0;
        };
        let t = self.time_at(progress);
        ((t - seg.start) / seg.duration).clamp(0.0, 1.0)
    }

    /// The segment that owns `progress` for sequential timelines.
    ///
    /// Returns the latest-starting segment whose start is `<= t`, with its clamped local
    /// progress; before the first segment the first segment is returned at local 0.
    pub fn current(&self, progress: f64) -> Option<(usize, f64)> {
        if self.segments.is_empty() {
            return None;
        }
        let t = self.time_at(progress);
        let mut best: Option<usize> = None;
        for (i, seg) in self.segments.iter().enumerate() {
            if seg.start <= t {
                match best {
                    Some(b) if self.segments[b].start > seg.start => {}
                    _ => best = Some(i),
                }
            }
        }
        let idx = best.unwrap_or(0);
        Some((idx, self.local_progress(idx, progress)))
    }

    fn resolve(&self, position: &Position) -> ScrollyteResult<f64> {
        let start = match position {
            Position::End => self.duration(),
            Position::At(t) => *t,
            Position::FromEnd(off) => self.duration() + off,
            Position::Label { name, offset } => {
                let at = self.label_time(name).ok_or_else(|| {
                    ScrollyteError::validation(format!("unknown timeline label '{name}'"))
                })?;
                at + offset
            }
        };
        if !start.is_finite() {
            return Err(ScrollyteError::validation("timeline position must be finite"));
        }
        Ok(start.max(0.0))
    }
}

/// Local progress of item `index` in a staggered group.
///
/// The group's items each run for `item_duration`, starting `each` apart; `group_local` is the
/// group's own local progress over its full span `item_duration + each * (count - 1)`.
pub fn stagger_local(
    group_local: f64,
    index: usize,
    count: usize,
    each: f64,
    item_duration: f64,
) -> f64 {
    if count == 0 || item_duration <= 0.0 {
        return 0.0;
    }
    let span = item_duration + each * (count.saturating_sub(1) as f64);
    let t = group_local.clamp(0.0, 1.0) * span;
    ((t - each * index as f64) / item_duration).clamp(0.0, 1.0)
}

/// Span of a staggered group in timeline units.
pub fn stagger_span(count: usize, each: f64, item_duration: f64) -> f64 {
    item_duration + each * (count.saturating_sub(1) as f64)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
