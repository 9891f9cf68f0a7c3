use crate::{
    animation::progress::ProgressHandle,
    foundation::core::{Affine, Point, Rgba8Premul, Viewport},
    foundation::error::ScrollyteResult,
    morph::phases::{MorphFrame, MorphTimeline, VIEWBOX_HEIGHT, VIEWBOX_WIDTH},
    render::{FrameRGBA, Surface},
    stage::Consumer,
};

/// Share of the surface width covered by the drawer once it has slid in.
const DRAWER_WIDTH: f64 = 0.38;
const RING_STROKE: f64 = 1.0;

/// Viewbox-to-surface transform: uniform scale, centred (SVG `xMidYMid meet`).
pub fn viewbox_transform(surface: (u32, u32)) -> Affine {
    let (w, h) = (f64::from(surface.0), f64::from(surface.1));
    let s = (w / VIEWBOX_WIDTH).min(h / VIEWBOX_HEIGHT);
    let tx = (w - VIEWBOX_WIDTH * s) / 2.0;
    let ty = (h - VIEWBOX_HEIGHT * s) / 2.0;
    Affine::translate((tx, ty)) * Affine::scale(s)
}

/// Draws a [`MorphTimeline`] driven by a normalized progress handle.
pub struct MorphSection<S: Surface> {
    name: String,
    timeline: MorphTimeline,
    progress: ProgressHandle,
    surface: S,
    last_progress: Option<f64>,
    last_frame: Option<MorphFrame>,
}

impl<S: Surface> MorphSection<S> {
    pub fn new(
        name: impl Into<String>,
        timeline: MorphTimeline,
        progress: ProgressHandle,
        surface: S,
    ) -> Self {
        Self {
            name: name.into(),
            timeline,
            progress,
            surface,
            last_progress: None,
            last_frame: None,
        }
    }

    pub fn timeline(&self) -> &MorphTimeline {
        &self.timeline
    }

    pub fn progress(&self) -> &ProgressHandle {
        &self.progress
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Scene state of the last draw.
    pub fn last_frame(&self) -> Option<&MorphFrame> {
        self.last_frame.as_ref()
    }

    /// Redraw when progress moved. Returns `true` when something was presented.
    pub fn draw(&mut self) -> ScrollyteResult<bool> {
        let p = self.progress.normalized();
        if self.last_progress == Some(p) {
            return Ok(false);
        }
        let frame = self.timeline.evaluate(p)?;
        self.paint(&frame)?;
        self.last_progress = Some(p);
        self.last_frame = Some(frame);
        Ok(true)
    }

    fn paint(&mut self, frame: &MorphFrame) -> ScrollyteResult<()> {
        let size = self.surface.size();
        let xf = viewbox_transform(size);
        let stroke = RING_STROKE * xf.as_coeffs()[0];
        let map = |pts: &[Point]| pts.iter().map(|p| xf * *p).collect::<Vec<_>>();

        self.surface.clear();
        let g = &frame.geometry;
        for (ring, opacity) in g.rings.iter().zip(&g.ring_opacity) {
            if *opacity <= 0.0 {
                continue;
            }
            self.surface
                .stroke_polygon(&map(ring.points()), stroke, Rgba8Premul::white(*opacity))?;
        }
        if g.sun_opacity > 0.0 {
            self.surface
                .fill_polygon(&map(g.sun.points()), Rgba8Premul::white(g.sun_opacity))?;
        }

        let visible = 1.0 - frame.overlay.drawer_x_percent / 100.0;
        if visible > 0.0 {
            let (w, h) = (f64::from(size.0), f64::from(size.1));
            let dw = w * DRAWER_WIDTH;
            let x0 = w - dw * visible;
            let panel = [
                Point::new(x0, 0.0),
                Point::new(x0 + dw, 0.0),
                Point::new(x0 + dw, h),
                Point::new(x0, h),
            ];
            self.surface
                .fill_polygon(&panel, Rgba8Premul::from_straight_rgba(9, 9, 11, 204))?;
        }
        self.surface.present()
    }
}

impl<S: Surface> Consumer for MorphSection<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&mut self) -> ScrollyteResult<()> {
        self.draw().map(|_| ())
    }

    fn invalidate(&mut self) {
        self.last_progress = None;
    }

    fn resize(&mut self, viewport: Viewport) -> ScrollyteResult<()> {
        let w = viewport.width.round().max(1.0) as u32;
        let h = viewport.height.round().max(1.0) as u32;
        if self.surface.size() != (w, h) {
            self.surface.resize(w, h)?;
            self.last_progress = None;
        }
        Ok(())
    }

    fn snapshot(&self) -> Option<FrameRGBA> {
        self.surface.snapshot()
    }
}

impl<S: Surface> std::fmt::Debug for MorphSection<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MorphSection")
            .field("name", &self.name)
            .field("duration", &self.timeline.duration())
            .field("last_progress", &self.last_progress)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/morph/section.rs"]
mod tests;
