use std::str::FromStr;

use crate::foundation::error::{ScrollyteError, ScrollyteResult};

/// A point along an element or the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Edge {
    Top,
    Center,
    Bottom,
    /// Percentage of the box height from its top.
    Percent(f64),
    /// Pixels from the box top.
    Px(f64),
}

impl Edge {
    /// Distance of this edge from the top of a box of height `size`.
    pub fn offset_in(self, size: f64) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Center => size * 0.5,
            Self::Bottom => size,
            Self::Percent(p) => size * p / 100.0,
            Self::Px(px) => px,
        }
    }

    fn parse(token: &str) -> ScrollyteResult<Self> {
        match token {
            "top" => Ok(Self::Top),
            "center" => Ok(Self::Center),
            "bottom" => Ok(Self::Bottom),
            _ => {
                if let Some(n) = token.strip_suffix('%') {
                    parse_number(n, token).map(Self::Percent)
                } else if let Some(n) = token.strip_suffix("px") {
                    parse_number(n, token).map(Self::Px)
                } else {
                    parse_number(token, token).map(Self::Px)
                }
            }
        }
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Top => f.write_str("top"),
            Self::Center => f.write_str("center"),
            Self::Bottom => f.write_str("bottom"),
            Self::Percent(p) => write!(f, "{p}%"),
            Self::Px(px) => write!(f, "{px}px"),
        }
    }
}

/// Length of a relative offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    /// Percentage of the viewport height.
    Percent(f64),
    Px(f64),
}

impl Length {
    fn resolve(self, viewport_height: f64) -> f64 {
        match self {
            Self::Percent(p) => viewport_height * p / 100.0,
            Self::Px(px) => px,
        }
    }
}

/// A scroll-position expression for a region's start or end.
///
/// Grammar:
/// - `"<element-edge> <viewport-edge>"`: the scroll offset at which the element edge meets the
///   viewport edge (`"top top"`, `"bottom bottom"`, `"top 80%"`, `"center 100px"`);
/// - `"+=<n>%"` / `"+=<n>px"` (or `-=`): relative to the region's start, percentages of the
///   viewport height;
/// - a bare number: an absolute scroll offset.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Offset {
    Anchor { element: Edge, viewport: Edge },
    Relative(Length),
    Absolute(f64),
}

impl Offset {
    pub fn top_top() -> Self {
        Self::Anchor {
            element: Edge::Top,
            viewport: Edge::Top,
        }
    }

    pub fn bottom_bottom() -> Self {
        Self::Anchor {
            element: Edge::Bottom,
            viewport: Edge::Bottom,
        }
    }

    /// `"+=<percent>%"`.
    pub fn viewports(percent: f64) -> Self {
        Self::Relative(Length::Percent(percent))
    }

    /// Resolve to a scroll offset.
    ///
    /// `element_top`/`element_height` describe the (already shifted) trigger element;
    /// `start` is the resolved start, required for relative offsets.
    pub fn resolve(
        &self,
        element_top: f64,
        element_height: f64,
        viewport_height: f64,
        start: Option<f64>,
    ) -> ScrollyteResult<f64> {
        match *self {
            Self::Anchor { element, viewport } => Ok(element_top
                + element.offset_in(element_height)
                - viewport.offset_in(viewport_height)),
            Self::Relative(len) => {
                let start = start.ok_or_else(|| {
                    ScrollyteError::validation("relative offsets are only valid for a region end")
                })?;
                Ok(start + len.resolve(viewport_height))
            }
            Self::Absolute(px) => Ok(px),
        }
    }
}

impl FromStr for Offset {
    type Err = ScrollyteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let signed = |rest: &str, sign: f64| -> ScrollyteResult<Self> {
            let rest = rest.trim();
            let len = if let Some(n) = rest.strip_suffix('%') {
                Length::Percent(sign * parse_number(n, s)?)
            } else if let Some(n) = rest.strip_suffix("px") {
                Length::Px(sign * parse_number(n, s)?)
            } else {
                Length::Px(sign * parse_number(rest, s)?)
            };
            Ok(Self::Relative(len))
        };

        if let Some(rest) = s.strip_prefix("+=") {
            return signed(rest, 1.0);
        }
        if let Some(rest) = s.strip_prefix("-=") {
            return signed(rest, -1.0);
        }

        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(one), None, None) => {
                let px = one.strip_suffix("px").unwrap_or(one);
                parse_number(px, s).map(Self::Absolute)
            }
            (Some(element), Some(viewport), None) => Ok(Self::Anchor {
                element: Edge::parse(element)?,
                viewport: Edge::parse(viewport)?,
            }),
            _ => Err(ScrollyteError::validation(format!(
                "invalid scroll offset '{s}'"
            ))),
        }
    }
}

impl std::fmt::Display for Offset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anchor { element, viewport } => write!(f, "{element} {viewport}"),
            Self::Relative(Length::Percent(p)) if *p < 0.0 => write!(f, "-={}%", -p),
            Self::Relative(Length::Percent(p)) => write!(f, "+={p}%"),
            Self::Relative(Length::Px(px)) if *px < 0.0 => write!(f, "-={}px", -px),
            Self::Relative(Length::Px(px)) => write!(f, "+={px}px"),
            Self::Absolute(px) => write!(f, "{px}"),
        }
    }
}

impl TryFrom<String> for Offset {
    type Error = ScrollyteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Offset> for String {
    fn from(value: Offset) -> Self {
        value.to_string()
    }
}

fn parse_number(n: &str, whole: &str) -> ScrollyteResult<f64> {
    let v: f64 = n
        .trim()
        .parse()
        .map_err(|_| ScrollyteError::validation(format!("invalid scroll offset '{whole}'")))?;
    if !v.is_finite() {
        return Err(ScrollyteError::validation(format!(
            "scroll offset '{whole}' must be finite"
        )));
    }
    Ok(v)
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/offsets.rs"]
mod tests;
