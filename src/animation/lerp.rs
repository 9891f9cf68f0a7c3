use crate::foundation::core::{Point, Vec2};

/// Linear interpolation between two values of the same type.
///
/// Implementations return `a` exactly at `t == 0.0` and `b` exactly at `t == 1.0`.
pub trait Lerp: Sized {
    /// Interpolate from `a` toward `b` by `t`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        // Endpoint-exact form: `a + (b - a) * t` can miss `b` by an ulp at `t == 1`.
        if t == 1.0 { *b } else { a + (b - a) * t }
    }
}

impl Lerp for f32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        if t == 1.0 {
            *b
        } else {
            (*a as f64 + ((*b as f64 - *a as f64) * t)) as f32
        }
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(f64::lerp(&a.x, &b.x, t), f64::lerp(&a.y, &b.y, t))
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Point::new(f64::lerp(&a.x, &b.x, t), f64::lerp(&a.y, &b.y, t))
    }
}

/// A `from -> to` scalar tween shaped by an [`Ease`](crate::animation::ease::Ease).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScalarTween {
    /// Value at local progress 0.
    pub from: f64,
    /// Value at local progress 1.
    pub to: f64,
    /// Ease applied to local progress.
    #[serde(default)]
    pub ease: crate::animation::ease::Ease,
}

impl ScalarTween {
    /// Create a tween.
    pub fn new(from: f64, to: f64, ease: crate::animation::ease::Ease) -> Self {
        Self { from, to, ease }
    }

    /// Sample at local progress `t` (clamped to `[0, 1]`).
    pub fn value(&self, t: f64) -> f64 {
        f64::lerp(&self.from, &self.to, self.ease.apply(t))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/lerp.rs"]
mod tests;
