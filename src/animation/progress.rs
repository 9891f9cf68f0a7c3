use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug)]
struct ProgressCell {
    value: Cell<f64>,
    span: Cell<f64>,
}

/// Shared, clamped animation progress owned by one region.
///
/// The value is a floating-point frame index in `[0, span]`, where `span` is `frameCount - 1`
/// for frame sequences and `1.0` for normalized timelines. The scheduler writes it every tick;
/// consumers read it. Hosts may also write through [`ProgressHandle::set`] for debug scrubbing.
#[derive(Clone, Debug)]
pub struct ProgressHandle {
    inner: Rc<ProgressCell>,
}

impl ProgressHandle {
    /// Create a handle at progress 0 over `[0, span]` (negative or non-finite spans become 0).
    pub fn new(span: f64) -> Self {
        let span = if span.is_finite() { span.max(0.0) } else { 0.0 };
        Self {
            inner: Rc::new(ProgressCell {
                value: Cell::new(0.0),
                span: Cell::new(span),
            }),
        }
    }

    /// Current value in `[0, span]`.
    pub fn get(&self) -> f64 {
        self.inner.value.get()
    }

    /// Overwrite the value; clamped into `[0, span]`, NaN becomes 0.
    pub fn set(&self, value: f64) {
        let span = self.inner.span.get();
        let v = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, span)
        };
        self.inner.value.set(v);
    }

    /// Upper bound of the value range.
    pub fn span(&self) -> f64 {
        self.inner.span.get()
    }

    /// Value divided by span, in `[0, 1]` (0 for an empty span).
    pub fn normalized(&self) -> f64 {
        let span = self.span();
        if span <= 0.0 { 0.0 } else { self.get() / span }
    }

    /// Return `true` when both handles refer to the same progress value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/progress.rs"]
mod tests;
