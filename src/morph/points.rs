use std::f64::consts::{FRAC_PI_4, TAU};

use crate::{
    animation::lerp::Lerp,
    foundation::core::Point,
    foundation::error::{ScrollyteError, ScrollyteResult},
};

/// Samples per generated shape. Every generated set has exactly this length, so any two
/// generated shapes can be interpolated point-for-point.
pub const POINT_COUNT: usize = 24;

/// Shape families the morph engine can generate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Circle,
    Square,
    Triangle,
    Hexagon,
}

impl ShapeKind {
    /// Number of polygon sides; `None` for the circle.
    pub fn sides(self) -> Option<usize> {
        match self {
            Self::Circle => None,
            Self::Triangle => Some(3),
            Self::Square => Some(4),
            Self::Hexagon => Some(6),
        }
    }

    /// Angle offset applied on top of the caller's rotation (squares sit on a corner otherwise).
    fn base_angle(self) -> f64 {
        match self {
            Self::Square => FRAC_PI_4,
            _ => 0.0,
        }
    }
}

/// Ordered 2D samples approximating one shape instance.
#[derive(Clone, Debug, PartialEq)]
pub struct PointSet {
    points: Vec<Point>,
}

impl PointSet {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Mean of all samples.
    pub fn centroid(&self) -> Option<Point> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(x, y), p| (x + p.x, y + p.y));
        Some(Point::new(sx / n, sy / n))
    }

    /// Render as an SVG `points` attribute value (`x,y x,y ...`).
    pub fn to_svg_points(&self) -> String {
        self.points
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Generate [`POINT_COUNT`] samples of `kind` with radius `r` around `(cx, cy)`, rotated by
/// `rot` radians.
///
/// Circles are sampled evenly. N-gons split the samples into N equal sectors and give every
/// sample in a sector the sector's corner angle, so a polygon's samples stack on its vertices.
pub fn generate(kind: ShapeKind, r: f64, cx: f64, cy: f64, rot: f64) -> PointSet {
    let points = (0..POINT_COUNT)
        .map(|i| {
            let angle = match kind.sides() {
                None => (i as f64 / POINT_COUNT as f64) * TAU + rot,
                Some(n) => {
                    let sector = i / (POINT_COUNT / n);
                    (sector as f64 / n as f64) * TAU + kind.base_angle() + rot
                }
            };
            Point::new(cx + r * angle.cos(), cy + r * angle.sin())
        })
        .collect();
    PointSet { points }
}

/// Pointwise interpolation from `a` to `b`.
///
/// Exact at `t == 0` and `t == 1`. Sets of different length cannot be paired and are reported
/// as [`ScrollyteError::Invariant`].
pub fn lerp(a: &PointSet, b: &PointSet, t: f64) -> ScrollyteResult<PointSet> {
    if a.len() != b.len() {
        return Err(ScrollyteError::invariant(format!(
            "cannot interpolate point sets of length {} and {}",
            a.len(),
            b.len()
        )));
    }
    if t == 0.0 {
        return Ok(a.clone());
    }
    let points = a
        .points
        .iter()
        .zip(&b.points)
        .map(|(p, q)| <Point as Lerp>::lerp(p, q, t))
        .collect();
    Ok(PointSet { points })
}

#[cfg(test)]
#[path = "../../tests/unit/morph/points.rs"]
mod tests;
