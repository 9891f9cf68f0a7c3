use std::f64::consts::{PI, TAU};

use crate::{
    animation::ease::Ease,
    animation::lerp::ScalarTween,
    animation::timeline::{Position, Timeline, stagger_local, stagger_span},
    foundation::core::Point,
    foundation::error::{ScrollyteError, ScrollyteResult},
    morph::points::{PointSet, ShapeKind, generate, lerp},
};

/// Number of outline rings around the sun.
pub const RING_COUNT: usize = 13;
/// Base spacing unit; every radius in the scene is a multiple of it.
pub const SPACING: f64 = 104.0;
/// Scene coordinate space.
pub const VIEWBOX_WIDTH: f64 = 1920.0;
pub const VIEWBOX_HEIGHT: f64 = 1080.0;
/// Scene centre.
pub const CENTER: Point = Point::new(960.0, 540.0);
/// Peak distance rings travel from the centre while blooming.
pub const BLOOM_DISTANCE: f64 = 300.0;
/// Opacity of ring 0, the primary outline.
pub const PRIMARY_RING_OPACITY: f64 = 0.4;

/// Label placed where the radial fade begins.
pub const PORTAL_LABEL: &str = "portalStart";

// Initial scatter in units of SPACING, one per ring.
const SCATTER: [(f64, f64); RING_COUNT] = [
    (-3.0, 0.0),
    (3.0, 0.0),
    (0.0, -3.0),
    (0.0, 3.0),
    (-2.0, -2.0),
    (2.0, -2.0),
    (-2.0, 2.0),
    (2.0, 2.0),
    (-4.0, 0.0),
    (4.0, 0.0),
    (0.0, -4.0),
    (0.0, 4.0),
    (0.0, 0.0),
];

/// A geometry phase: a pure function from local progress to ring/sun state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MorphPhase {
    /// Scattered small circles converge into the centred presentation circle.
    Converge,
    /// Keep the previous phase's final state.
    Hold,
    /// Rings fly outward and back while morphing from `from` into `to`.
    Bloom { from: ShapeKind, to: ShapeKind },
    /// Rings grow from the bloom radius back to the presentation radius and fade.
    Settle { kind: ShapeKind },
    /// Morph the presentation shape back into a circle.
    Return { from: ShapeKind },
    /// Sun and rings fade out, revealing the layer behind.
    RadialFade,
}

impl MorphPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Converge => "converge",
            Self::Hold => "hold",
            Self::Bloom { .. } => "bloom",
            Self::Settle { .. } => "settle",
            Self::Return { .. } => "return",
            Self::RadialFade => "radial_fade",
        }
    }

    /// Geometry at local progress `p` in `[0, 1]`.
    ///
    /// [`MorphPhase::Hold`] has no geometry of its own; it yields `None`.
    pub fn evaluate(&self, p: f64) -> ScrollyteResult<Option<MorphGeometry>> {
        let p = p.clamp(0.0, 1.0);
        let (cx, cy) = (CENTER.x, CENTER.y);
        let d = SPACING;

        let geometry = match *self {
            Self::Hold => return Ok(None),
            Self::Converge => {
                let r = d * 0.8 + (d * 4.0 - d * 0.8) * p;
                let rings = SCATTER
                    .iter()
                    .map(|(ox, oy)| {
                        let sx = cx + ox * d;
                        let sy = cy + oy * d;
                        let x = sx + (cx - sx) * p;
                        let y = sy + (cy - sy) * p;
                        generate(ShapeKind::Circle, r, x, y, p * 2.0)
                    })
                    .collect();
                let sun_r = 40.0 + (d * 1.5 - 40.0) * p;
                MorphGeometry {
                    rings,
                    ring_opacity: ring_opacities(|_| 0.3 - p * 0.2),
                    sun: generate(ShapeKind::Circle, sun_r, cx, cy, 0.0),
                    sun_opacity: 1.0,
                }
            }
            Self::Bloom { from, to } => {
                let bloom = (p * PI).sin();
                let dist = bloom * BLOOM_DISTANCE;
                let start = generate(from, d * 4.0, cx, cy, 0.0);
                let rings = (0..RING_COUNT)
                    .map(|i| {
                        let angle = (i as f64 / RING_COUNT as f64) * TAU;
                        let end = generate(
                            to,
                            d * 2.0,
                            cx + angle.cos() * dist,
                            cy + angle.sin() * dist,
                            p,
                        );
                        lerp(&start, &end, p)
                    })
                    .collect::<ScrollyteResult<Vec<_>>>()?;
                // Leaving the intro circle the sun is still at its presentation size.
                let sun_from_r = if from == ShapeKind::Circle {
                    d * 1.5
                } else {
                    d * 2.0
                };
                let sun = lerp(
                    &generate(from, sun_from_r, cx, cy, 0.0),
                    &generate(to, d * 0.5, cx, cy, 0.0),
                    p,
                )?;
                MorphGeometry {
                    rings,
                    ring_opacity: vec![0.1 + bloom * 0.4; RING_COUNT],
                    sun,
                    sun_opacity: 1.0,
                }
            }
            Self::Settle { kind } => {
                let ring = lerp(
                    &generate(kind, d * 2.0, cx, cy, 0.0),
                    &generate(kind, d * 4.0, cx, cy, 0.0),
                    p,
                )?;
                let sun = lerp(
                    &generate(kind, d * 0.5, cx, cy, 0.0),
                    &generate(kind, d * 2.0, cx, cy, 0.0),
                    p,
                )?;
                MorphGeometry {
                    rings: vec![ring; RING_COUNT],
                    ring_opacity: ring_opacities(|_| 0.1 * (1.0 - p)),
                    sun,
                    sun_opacity: 1.0,
                }
            }
            Self::Return { from } => {
                let ring = lerp(
                    &generate(from, d * 4.0, cx, cy, 0.0),
                    &generate(ShapeKind::Circle, d * 4.0, cx, cy, 0.0),
                    p,
                )?;
                let sun = lerp(
                    &generate(from, d * 2.0, cx, cy, 0.0),
                    &generate(ShapeKind::Circle, d * 1.5, cx, cy, 0.0),
                    p,
                )?;
                MorphGeometry {
                    rings: vec![ring; RING_COUNT],
                    ring_opacity: ring_opacities(|_| 0.1),
                    sun,
                    sun_opacity: 1.0,
                }
            }
            Self::RadialFade => {
                let ring = generate(ShapeKind::Circle, d * 4.0, cx, cy, 0.0);
                MorphGeometry {
                    rings: vec![ring; RING_COUNT],
                    ring_opacity: vec![0.1 * (1.0 - p).powf(1.5); RING_COUNT],
                    sun: generate(ShapeKind::Circle, d * 1.5, cx, cy, 0.0),
                    sun_opacity: (1.0 - p).powf(0.5),
                }
            }
        };
        Ok(Some(geometry))
    }
}

fn ring_opacities(rest: impl Fn(usize) -> f64) -> Vec<f64> {
    (0..RING_COUNT)
        .map(|i| if i == 0 { PRIMARY_RING_OPACITY } else { rest(i) })
        .collect()
}

/// Ring and sun state in viewbox coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct MorphGeometry {
    /// Outline of every ring.
    pub rings: Vec<PointSet>,
    /// Stroke opacity per ring.
    pub ring_opacity: Vec<f64>,
    /// Filled centre shape.
    pub sun: PointSet,
    /// Sun fill opacity.
    pub sun_opacity: f64,
}

/// One client row in the sliding drawer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowState {
    pub opacity: f64,
    /// Horizontal offset in pixels (slides in from +40).
    pub x: f64,
}

/// Non-geometric tracks revealed after the portal.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayState {
    pub video_opacity: f64,
    pub video_scale: f64,
    /// Drawer translation as a percentage of its own width (100 = hidden off the right edge).
    pub drawer_x_percent: f64,
    pub rows: Vec<RowState>,
    pub content_opacity: f64,
    /// Vertical offset of the drawer heading in pixels.
    pub content_y: f64,
}

impl OverlayState {
    fn hidden(rows: usize) -> Self {
        Self {
            video_opacity: 0.0,
            video_scale: 1.0,
            drawer_x_percent: 100.0,
            rows: vec![
                RowState {
                    opacity: 0.0,
                    x: 40.0,
                };
                rows
            ],
            content_opacity: 0.0,
            content_y: 30.0,
        }
    }
}

/// Full scene state at one progress value.
#[derive(Clone, Debug, PartialEq)]
pub struct MorphFrame {
    /// Name of the geometry phase in effect.
    pub phase: &'static str,
    pub geometry: MorphGeometry,
    pub overlay: OverlayState,
}

/// Shape of a morph timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MorphConfig {
    /// Presentation shapes visited after the intro circle.
    pub shapes: Vec<ShapeKind>,
    /// Append the radial fade and the overlay tracks.
    pub portal: bool,
    /// Number of client rows in the drawer.
    pub client_rows: usize,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            shapes: vec![ShapeKind::Square, ShapeKind::Triangle, ShapeKind::Hexagon],
            portal: true,
            client_rows: 10,
        }
    }
}

#[derive(Clone, Debug)]
enum Track {
    Geometry(MorphPhase),
    VideoOpacity(ScalarTween),
    VideoScale(ScalarTween),
    Drawer(ScalarTween),
    Rows { count: usize, each: f64, item: f64 },
    Content,
}

const CONVERGE: f64 = 2.0;
const HOLD: f64 = 1.0;
const BLOOM: f64 = 2.0;
const SETTLE: f64 = 1.5;
const RETURN: f64 = 2.0;
const FADE: f64 = 2.0;
const ROW_STAGGER: f64 = 0.08;

/// The multi-phase morph choreography, sampled by normalized progress.
#[derive(Clone, Debug)]
pub struct MorphTimeline {
    timeline: Timeline<Track>,
    // Indices of geometry segments, in time order.
    geometry: Vec<usize>,
    client_rows: usize,
}

impl MorphTimeline {
    /// Build the canonical sequence: converge, hold, then bloom/settle/hold per shape, return to
    /// circle, hold, and (with `portal`) the radial fade plus overlay tracks.
    pub fn new(config: &MorphConfig) -> ScrollyteResult<Self> {
        let mut timeline = Timeline::new();
        let mut geometry = Vec::new();
        let mut geo = |tl: &mut Timeline<Track>, pos: Position, dur: f64, phase: MorphPhase| {
            tl.push(pos, dur, Track::Geometry(phase)).map(|i| geometry.push(i))
        };

        geo(&mut timeline, Position::End, CONVERGE, MorphPhase::Converge)?;
        geo(&mut timeline, Position::End, HOLD, MorphPhase::Hold)?;

        let mut prev = ShapeKind::Circle;
        for &kind in &config.shapes {
            geo(
                &mut timeline,
                Position::End,
                BLOOM,
                MorphPhase::Bloom {
                    from: prev,
                    to: kind,
                },
            )?;
            geo(&mut timeline, Position::End, SETTLE, MorphPhase::Settle { kind })?;
            geo(&mut timeline, Position::End, HOLD, MorphPhase::Hold)?;
            prev = kind;
        }

        geo(&mut timeline, Position::End, RETURN, MorphPhase::Return { from: prev })?;
        geo(&mut timeline, Position::End, HOLD, MorphPhase::Hold)?;

        if config.portal {
            timeline.add_label(PORTAL_LABEL);
            let at_portal = |offset: f64| Position::Label {
                name: PORTAL_LABEL.to_owned(),
                offset,
            };
            geo(&mut timeline, at_portal(0.0), FADE, MorphPhase::RadialFade)?;
            timeline.push(
                at_portal(0.5),
                2.5,
                Track::VideoOpacity(ScalarTween::new(0.0, 0.6, Ease::InOutCubic)),
            )?;
            timeline.push(
                at_portal(0.0),
                3.0,
                Track::VideoScale(ScalarTween::new(1.0, 1.15, Ease::Linear)),
            )?;
            timeline.then(
                1.5,
                Track::Drawer(ScalarTween::new(100.0, 0.0, Ease::OutCubic)),
            )?;
            if config.client_rows > 0 {
                timeline.push(
                    Position::FromEnd(-0.6),
                    stagger_span(config.client_rows, ROW_STAGGER, 1.0),
                    Track::Rows {
                        count: config.client_rows,
                        each: ROW_STAGGER,
                        item: 1.0,
                    },
                )?;
            }
            timeline.push(Position::FromEnd(-0.8), 0.8, Track::Content)?;
        }

        tracing::debug!(
            shapes = config.shapes.len(),
            portal = config.portal,
            duration = timeline.duration(),
            "morph timeline built"
        );

        Ok(Self {
            timeline,
            geometry,
            client_rows: config.client_rows,
        })
    }

    /// Total duration in timeline units.
    pub fn duration(&self) -> f64 {
        self.timeline.duration()
    }

    /// Time of a label, e.g. [`PORTAL_LABEL`].
    pub fn label_time(&self, name: &str) -> Option<f64> {
        self.timeline.label_time(name)
    }

    /// Geometry phases with their normalized progress sub-ranges.
    pub fn phases(&self) -> Vec<(MorphPhase, f64, f64)> {
        self.geometry
            .iter()
            .filter_map(|&i| {
                let Track::Geometry(phase) = self.timeline.segments()[i].payload else {
                    return None;
                };
                let (a, b) = self.timeline.sub_range(i)?;
                Some((phase, a, b))
            })
            .collect()
    }

    /// The geometry phase owning `progress` and its local progress.
    pub fn phase_at(&self, progress: f64) -> (MorphPhase, f64) {
        let idx = self.geometry[self.owner(progress)];
        (
            self.geometry_phase(idx),
            self.timeline.local_progress(idx, progress),
        )
    }

    /// Scene state at normalized `progress` in `[0, 1]`.
    ///
    /// Holds reproduce the end state of the nearest earlier phase.
    pub fn evaluate(&self, progress: f64) -> ScrollyteResult<MorphFrame> {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        let segs = self.timeline.segments();

        let (owner, local) = self.phase_at(progress);
        let mut k = self.owner(progress);
        let mut p = local;
        let geometry = loop {
            if let Some(g) = self.geometry_phase(self.geometry[k]).evaluate(p)? {
                break g;
            }
            if k == 0 {
                return Err(ScrollyteError::invariant(
                    "morph timeline starts with a hold",
                ));
            }
            k -= 1;
            p = 1.0;
        };

        let mut overlay = OverlayState::hidden(self.client_rows);
        for (i, seg) in segs.iter().enumerate() {
            let local = self.timeline.local_progress(i, progress);
            match &seg.payload {
                Track::Geometry(_) => {}
                Track::VideoOpacity(tw) => overlay.video_opacity = tw.value(local),
                Track::VideoScale(tw) => overlay.video_scale = tw.value(local),
                Track::Drawer(tw) => overlay.drawer_x_percent = tw.value(local),
                Track::Rows { count, each, item } => {
                    for (r, row) in overlay.rows.iter_mut().enumerate() {
                        let k = Ease::OutCubic.apply(stagger_local(local, r, *count, *each, *item));
                        row.opacity = k;
                        row.x = 40.0 * (1.0 - k);
                    }
                }
                Track::Content => {
                    let k = Ease::OutCubic.apply(local);
                    overlay.content_opacity = k;
                    overlay.content_y = 30.0 * (1.0 - k);
                }
            }
        }

        Ok(MorphFrame {
            phase: owner.name(),
            geometry,
            overlay,
        })
    }
}

impl MorphTimeline {
    // Position in `self.geometry` of the latest geometry segment started at `progress`.
    fn owner(&self, progress: f64) -> usize {
        let t = self.timeline.time_at(progress);
        let segs = self.timeline.segments();
        self.geometry
            .iter()
            .rposition(|&i| segs[i].start <= t)
            .unwrap_or(0)
    }

    fn geometry_phase(&self, segment: usize) -> MorphPhase {
        match self.timeline.segments()[segment].payload {
            Track::Geometry(phase) => phase,
            _ => MorphPhase::Hold,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/morph/phases.rs"]
mod tests;
