use crate::{
    animation::progress::ProgressHandle,
    foundation::core::{Rect, Viewport},
    foundation::error::{ScrollyteError, ScrollyteResult},
    frames::sequence::{FrameChoice, FrameSequence},
    render::{FrameRGBA, Surface},
    stage::Consumer,
};

/// How a fractional progress value becomes a slot index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexRounding {
    /// Truncate toward zero.
    #[default]
    Floor,
    /// Round to nearest.
    Round,
}

/// Scaling policy from frame size to surface size.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScaleFit {
    /// Fill the surface, cropping overflow. `anchor_x`/`anchor_y` in `[0, 1]` pick which part of
    /// the overflow stays visible (`1.0, 0.5` keeps the right edge, vertically centred).
    Cover { anchor_x: f64, anchor_y: f64 },
    /// Fit inside the surface, centred, letterboxing the rest.
    Contain,
}

impl ScaleFit {
    /// Right-anchored, vertically centred cover.
    pub fn cover_right() -> Self {
        Self::Cover {
            anchor_x: 1.0,
            anchor_y: 0.5,
        }
    }
}

impl Default for ScaleFit {
    fn default() -> Self {
        Self::cover_right()
    }
}

/// Playback knobs for one frame player.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub fit: ScaleFit,
    pub rounding: IndexRounding,
}

/// Slot index for a progress value over `count` slots.
///
/// Progress is clamped to `[0, count - 1]` first; NaN reads as 0.
pub fn frame_index_for_progress(progress: f64, count: usize, rounding: IndexRounding) -> usize {
    if count == 0 {
        return 0;
    }
    let max = (count - 1) as f64;
    let p = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, max)
    };
    let idx = match rounding {
        IndexRounding::Floor => p.floor(),
        IndexRounding::Round => p.round(),
    };
    (idx as usize).min(count - 1)
}

/// Destination rectangle for an `image` sized frame on a `canvas` sized surface.
pub fn placement(fit: ScaleFit, image: (u32, u32), canvas: (u32, u32)) -> Rect {
    let (iw, ih) = (f64::from(image.0), f64::from(image.1));
    let (cw, ch) = (f64::from(canvas.0), f64::from(canvas.1));
    if iw <= 0.0 || ih <= 0.0 {
        return Rect::ZERO;
    }

    let (hr, vr) = (cw / iw, ch / ih);
    let (ratio, ax, ay) = match fit {
        ScaleFit::Cover { anchor_x, anchor_y } => (
            hr.max(vr),
            anchor_x.clamp(0.0, 1.0),
            anchor_y.clamp(0.0, 1.0),
        ),
        ScaleFit::Contain => (hr.min(vr), 0.5, 0.5),
    };

    let (w, h) = (iw * ratio, ih * ratio);
    let x = (cw - w) * ax;
    let y = (ch - h) * ay;
    Rect::new(x, y, x + w, y + h)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shown {
    Nothing,
    Slot(usize),
}

/// Draws the frame selected by a progress handle onto its own surface.
///
/// Redraws only when the chosen slot (or surface size) changes, so scrolling within one frame
/// costs nothing.
pub struct FramePlayer<S: Surface> {
    name: String,
    sequence: FrameSequence,
    progress: ProgressHandle,
    config: PlayerConfig,
    surface: S,
    shown: Option<Shown>,
    draws: u64,
}

impl<S: Surface> FramePlayer<S> {
    pub fn new(
        name: impl Into<String>,
        sequence: FrameSequence,
        progress: ProgressHandle,
        config: PlayerConfig,
        surface: S,
    ) -> Self {
        Self {
            name: name.into(),
            sequence,
            progress,
            config,
            surface,
            shown: None,
            draws: 0,
        }
    }

    pub fn sequence(&self) -> &FrameSequence {
        &self.sequence
    }

    pub fn progress(&self) -> &ProgressHandle {
        &self.progress
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Slot currently on screen, if any.
    pub fn shown_slot(&self) -> Option<usize> {
        match self.shown {
            Some(Shown::Slot(i)) => Some(i),
            _ => None,
        }
    }

    /// Number of presented redraws so far.
    pub fn draw_count(&self) -> u64 {
        self.draws
    }

    /// Slot the current progress maps to, before load-state fallback.
    pub fn target_index(&self) -> usize {
        frame_index_for_progress(self.progress.get(), self.sequence.len(), self.config.rounding)
    }

    /// Draw the current frame if it changed. Returns `true` when something was presented.
    pub fn draw(&mut self) -> ScrollyteResult<bool> {
        if self.sequence.is_empty() {
            return Ok(false);
        }
        let want = match self.sequence.choose(self.target_index()) {
            FrameChoice::Hold => return Ok(false),
            FrameChoice::Nothing => Shown::Nothing,
            FrameChoice::Draw(i) => Shown::Slot(i),
        };
        if self.shown == Some(want) {
            return Ok(false);
        }

        self.surface.clear();
        if let Shown::Slot(i) = want {
            let img = self.sequence.frame(i).ok_or_else(|| {
                ScrollyteError::invariant(format!("slot {i} chosen but not loaded"))
            })?;
            let dest = placement(
                self.config.fit,
                (img.width, img.height),
                self.surface.size(),
            );
            self.surface.draw_image(&img, dest)?;
        }
        self.surface.present()?;
        self.shown = Some(want);
        self.draws += 1;
        Ok(true)
    }
}

impl<S: Surface> Consumer for FramePlayer<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&mut self) -> ScrollyteResult<()> {
        self.draw().map(|_| ())
    }

    fn invalidate(&mut self) {
        self.shown = None;
    }

    fn resize(&mut self, viewport: Viewport) -> ScrollyteResult<()> {
        let w = viewport.width.round().max(1.0) as u32;
        let h = viewport.height.round().max(1.0) as u32;
        if self.surface.size() != (w, h) {
            self.surface.resize(w, h)?;
            self.shown = None;
        }
        Ok(())
    }

    fn snapshot(&self) -> Option<FrameRGBA> {
        self.surface.snapshot()
    }
}

impl<S: Surface> std::fmt::Debug for FramePlayer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramePlayer")
            .field("name", &self.name)
            .field("sequence", &self.sequence)
            .field("config", &self.config)
            .field("shown", &self.shown)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frames/player.rs"]
mod tests;
