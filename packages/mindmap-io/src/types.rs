//! Value types shared by the model, the reader and the writer.
//!
//! Each type owns its textual encoding: `FromStr` parses the attribute
//! form and `Display` produces it, so the two stay in lock-step.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::ValueError;

/// Color pattern: `#rrggbb`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static COLOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})$").expect("valid regex")
});

/// Point pattern: `dx;dy` with optional trailing separator. Commas are accepted too.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static POINT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(-?\d+)\s*[;,]\s*(-?\d+)\s*[;,]?\s*$").expect("valid regex")
});

/// An opaque RGB color.
///
/// # Examples
/// ```
/// use mindmap_io::types::Color;
///
/// let color: Color = "#FF8000".parse().unwrap();
/// assert_eq!(color, Color::new(255, 128, 0));
/// assert_eq!(color.to_string(), "#ff8000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Color {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = COLOR_PATTERN
            .captures(s)
            .ok_or_else(|| ValueError::InvalidColor(s.to_string()))?;
        let channel = |i: usize| {
            u8::from_str_radix(&caps[i], 16).map_err(|_| ValueError::InvalidColor(s.to_string()))
        };
        Ok(Self::new(channel(1)?, channel(2)?, channel(3)?))
    }
}

impl TryFrom<String> for Color {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A 2-D integer offset, used for connector bend points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl FromStr for Point {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::InvalidPoint(s.to_string());
        let caps = POINT_PATTERN.captures(s).ok_or_else(invalid)?;
        let x = caps[1].parse().map_err(|_| invalid())?;
        let y = caps[2].parse().map_err(|_| invalid())?;
        Ok(Self::new(x, y))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{};", self.x, self.y)
    }
}

/// Connector shape.
///
/// Token matching is exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Shape {
    /// Straight line.
    Line,
    /// Polyline through the bend points.
    LinearPath,
    /// Bezier curve through the bend points.
    #[default]
    CubicCurve,
    /// Drawn like a node edge.
    EdgeLike,
}

impl Shape {
    /// All shapes, in declaration order.
    pub const ALL: [Shape; 4] = [
        Shape::Line,
        Shape::LinearPath,
        Shape::CubicCurve,
        Shape::EdgeLike,
    ];

    /// Get the token used in documents.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Line => "LINE",
            Self::LinearPath => "LINEAR_PATH",
            Self::CubicCurve => "CUBIC_CURVE",
            Self::EdgeLike => "EDGE_LIKE",
        }
    }
}

impl FromStr for Shape {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.as_str() == s)
            .ok_or_else(|| ValueError::InvalidShape(s.to_string()))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arrowhead at either end of a connector.
///
/// Parsing upper-cases the input first, so `default` and `Default` are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArrowType {
    /// No arrowhead.
    None,
    /// Standard arrowhead.
    Default,
}

impl ArrowType {
    /// Get the token used in documents.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Default => "DEFAULT",
        }
    }
}

impl FromStr for ArrowType {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NONE" => Ok(Self::None),
            "DEFAULT" => Ok(Self::Default),
            _ => Err(ValueError::InvalidArrow(s.to_string())),
        }
    }
}

impl fmt::Display for ArrowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a signed integer attribute value.
pub fn parse_int(value: &str) -> Result<i32, ValueError> {
    value
        .parse()
        .map_err(|_| ValueError::InvalidInteger(value.to_string()))
}

/// Parse an opacity value in the range 0-255.
pub fn parse_alpha(value: &str) -> Result<u8, ValueError> {
    let raw: i64 = value
        .parse()
        .map_err(|_| ValueError::InvalidInteger(value.to_string()))?;
    u8::try_from(raw).map_err(|_| ValueError::InvalidAlpha(raw))
}

/// Parse a dash pattern: non-negative integers separated by single spaces.
///
/// An empty value is an empty pattern, which is different from no pattern.
pub fn parse_dash(value: &str) -> Result<Vec<u32>, ValueError> {
    if value.is_empty() {
        return Ok(Vec::new());
    }
    value
        .split(' ')
        .map(|token| match token.parse::<u32>() {
            Ok(n) => Ok(n),
            Err(_) if token.parse::<i64>().is_ok() => {
                Err(ValueError::NegativeInteger(token.to_string()))
            }
            Err(_) => Err(ValueError::InvalidInteger(token.to_string())),
        })
        .collect()
}

/// Format a dash pattern as space-joined integers.
#[must_use]
pub fn format_dash(dash: &[u32]) -> String {
    dash.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
