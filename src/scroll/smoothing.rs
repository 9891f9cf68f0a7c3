use std::collections::BTreeSet;

use crate::{
    animation::ease::Ease,
    foundation::core::ElementId,
    foundation::error::{ScrollyteError, ScrollyteResult},
    foundation::events::{Listeners, Subscription},
};

// Ancestor walks stop after this many hops so a cyclic tree cannot hang the input path.
const MAX_ANCESTOR_DEPTH: usize = 512;

/// Smooth-scroll tuning knobs.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Time constant of the exponential approach, in seconds.
    pub tau: f64,
    pub wheel_multiplier: f64,
    pub touch_multiplier: f64,
    /// Distance in pixels under which the position snaps onto its target.
    pub snap_px: f64,
    /// Default duration of programmatic `scroll_to` animations, in seconds.
    pub scroll_duration: f64,
    /// Elements (and their descendants) that keep native scrolling.
    pub exempt: Vec<ElementId>,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            tau: 0.2,
            wheel_multiplier: 1.0,
            touch_multiplier: 2.0,
            snap_px: 0.5,
            scroll_duration: 1.2,
            exempt: Vec::new(),
        }
    }
}

impl SmoothingConfig {
    pub fn validate(&self) -> ScrollyteResult<()> {
        if !self.tau.is_finite() || self.tau <= 0.0 {
            return Err(ScrollyteError::validation("smoothing tau must be finite and > 0"));
        }
        for (name, v) in [
            ("wheel_multiplier", self.wheel_multiplier),
            ("touch_multiplier", self.touch_multiplier),
            ("snap_px", self.snap_px),
            ("scroll_duration", self.scroll_duration),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ScrollyteError::validation(format!(
                    "smoothing {name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

/// Parent relation of the host's element tree.
pub trait ElementTree {
    fn parent(&self, id: &ElementId) -> Option<ElementId>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Wheel,
    Touch,
}

/// One raw scroll input from the host.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollInput {
    /// Requested scroll distance in pixels (positive scrolls down).
    pub delta: f64,
    pub kind: InputKind,
    /// Element the event was dispatched on, if known.
    pub origin: Option<ElementId>,
}

impl ScrollInput {
    pub fn wheel(delta: f64) -> Self {
        Self {
            delta,
            kind: InputKind::Wheel,
            origin: None,
        }
    }

    pub fn touch(delta: f64) -> Self {
        Self {
            delta,
            kind: InputKind::Touch,
            origin: None,
        }
    }

    pub fn from_element(mut self, origin: impl Into<ElementId>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

/// What the smoothing layer did with an input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputDisposition {
    /// Left to the host (exempt origin, or smoothing stopped).
    Ignored,
    /// Folded into the smoothed target.
    Captured,
}

/// Published after every tick that moved the position.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ScrollEvent {
    pub scroll: f64,
    pub velocity: f64,
}

#[derive(Clone, Copy, Debug)]
struct ScrollAnimation {
    from: f64,
    to: f64,
    duration: f64,
    elapsed: f64,
}

/// Eased virtual scroll position driven by raw wheel/touch input.
///
/// The position approaches the target monotonically and never overshoots; `set_bounds` keeps
/// both within `[0, document - viewport]`.
#[derive(Debug)]
pub struct SmoothScroll {
    config: SmoothingConfig,
    exempt: BTreeSet<ElementId>,
    position: f64,
    target: f64,
    velocity: f64,
    max_scroll: f64,
    stopped: bool,
    animation: Option<ScrollAnimation>,
    listeners: Listeners<ScrollEvent>,
}

impl SmoothScroll {
    pub fn new(config: SmoothingConfig) -> ScrollyteResult<Self> {
        config.validate()?;
        let exempt = config.exempt.iter().cloned().collect();
        Ok(Self {
            config,
            exempt,
            position: 0.0,
            target: 0.0,
            velocity: 0.0,
            max_scroll: 0.0,
            stopped: false,
            animation: None,
            listeners: Listeners::new(),
        })
    }

    pub fn config(&self) -> &SmoothingConfig {
        &self.config
    }

    /// Fold one raw input into the target unless its origin sits inside an exempt element.
    pub fn on_input(&mut self, input: &ScrollInput, tree: &dyn ElementTree) -> InputDisposition {
        if self.stopped {
            return InputDisposition::Ignored;
        }
        if let Some(origin) = &input.origin
            && self.is_exempt(origin, tree)
        {
            tracing::trace!(origin = %origin, "input left to native scrolling");
            return InputDisposition::Ignored;
        }
        if !input.delta.is_finite() {
            return InputDisposition::Ignored;
        }

        let mult = match input.kind {
            InputKind::Wheel => self.config.wheel_multiplier,
            InputKind::Touch => self.config.touch_multiplier,
        };
        self.animation = None;
        self.target = self.clamp(self.target + input.delta * mult);
        InputDisposition::Captured
    }

    /// Return `true` when `origin` or any of its ancestors is exempt.
    pub fn is_exempt(&self, origin: &ElementId, tree: &dyn ElementTree) -> bool {
        if self.exempt.is_empty() {
            return false;
        }
        let mut cur = Some(origin.clone());
        for _ in 0..MAX_ANCESTOR_DEPTH {
            let Some(id) = cur else {
                return false;
            };
            if self.exempt.contains(&id) {
                return true;
            }
            cur = tree.parent(&id);
        }
        tracing::warn!(origin = %origin, "ancestor walk exceeded depth limit");
        false
    }

    pub fn add_exempt(&mut self, id: impl Into<ElementId>) {
        self.exempt.insert(id.into());
    }

    pub fn remove_exempt(&mut self, id: &ElementId) -> bool {
        self.exempt.remove(id)
    }

    /// Advance by `dt` seconds and return the new position.
    pub fn tick(&mut self, dt: f64) -> f64 {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let before = self.position;

        if let Some(mut anim) = self.animation {
            anim.elapsed += dt;
            let t = if anim.duration > 0.0 {
                (anim.elapsed / anim.duration).min(1.0)
            } else {
                1.0
            };
            self.position = anim.from + (anim.to - anim.from) * Ease::OutExpo.apply(t);
            if t >= 1.0 {
                self.position = anim.to;
                self.animation = None;
            } else {
                self.animation = Some(anim);
            }
        } else if dt > 0.0 {
            let k = 1.0 - (-dt / self.config.tau).exp();
            let next = self.position + (self.target - self.position) * k;
            self.position = if (self.target - next).abs() < self.config.snap_px {
                self.target
            } else {
                next
            };
        }

        self.velocity = if dt > 0.0 {
            (self.position - before) / dt
        } else {
            0.0
        };
        if self.position != before {
            self.listeners.emit(&ScrollEvent {
                scroll: self.position,
                velocity: self.velocity,
            });
        }
        self.position
    }

    /// Animate programmatically to `target` over `duration` seconds (config default when
    /// `None`); a zero duration jumps.
    pub fn scroll_to(&mut self, target: f64, duration: Option<f64>) {
        let to = self.clamp(target);
        let duration = duration
            .filter(|d| d.is_finite())
            .unwrap_or(self.config.scroll_duration)
            .max(0.0);
        self.target = to;
        if duration == 0.0 {
            self.jump_to(to);
            return;
        }
        self.animation = Some(ScrollAnimation {
            from: self.position,
            to,
            duration,
            elapsed: 0.0,
        });
    }

    /// Move position and target to `scroll` at once.
    pub fn jump_to(&mut self, scroll: f64) {
        let to = self.clamp(scroll);
        self.animation = None;
        self.target = to;
        self.velocity = 0.0;
        if to != self.position {
            self.position = to;
            self.listeners.emit(&ScrollEvent {
                scroll: to,
                velocity: 0.0,
            });
        }
    }

    /// Recompute the scroll limit; call after the regions were re-measured.
    pub fn set_bounds(&mut self, document_height: f64, viewport_height: f64) {
        let max = document_height - viewport_height;
        self.max_scroll = if max.is_finite() { max.max(0.0) } else { 0.0 };
        self.target = self.clamp(self.target);
        self.position = self.clamp(self.position);
        if let Some(anim) = self.animation.as_mut() {
            anim.to = anim.to.clamp(0.0, self.max_scroll);
        }
        tracing::debug!(max_scroll = self.max_scroll, "scroll bounds updated");
    }

    /// Stop capturing input; the position freezes where it is.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.animation = None;
        self.target = self.position;
        self.velocity = 0.0;
    }

    pub fn start(&mut self) {
        self.stopped = false;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn on_scroll(&self, f: impl FnMut(&ScrollEvent) + 'static) -> Subscription {
        self.listeners.subscribe(f)
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Pixels per second over the last tick.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn max_scroll(&self) -> f64 {
        self.max_scroll
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    fn clamp(&self, v: f64) -> f64 {
        if v.is_nan() {
            return 0.0;
        }
        v.clamp(0.0, self.max_scroll)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/smoothing.rs"]
mod tests;
