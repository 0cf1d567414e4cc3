//! Data structures for edge routing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingStyle {
    Straight,
    #[default]
    Curved,
    Orthogonal,
}

impl FromStr for RoutingStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "straight" => Ok(Self::Straight),
            "curved" => Ok(Self::Curved),
            "orthogonal" => Ok(Self::Orthogonal),
            _ => Err(Error::UnknownRoutingStyle(s.to_string())),
        }
    }
}

impl fmt::Display for RoutingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Straight => write!(f, "straight"),
            Self::Curved => write!(f, "curved"),
            Self::Orthogonal => write!(f, "orthogonal"),
        }
    }
}

/// Which vertical edge of a table an anchor sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Unit x direction pointing away from the table.
    pub fn outward(self) -> f64 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// One drawing operation. Every path starts with a `MoveTo`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PathCommand {
    MoveTo { to: Point },
    LineTo { to: Point },
    QuadTo { control: Point, to: Point },
    CubicTo { control1: Point, control2: Point, to: Point },
}

impl PathCommand {
    pub fn end(&self) -> Point {
        match *self {
            Self::MoveTo { to }
            | Self::LineTo { to }
            | Self::QuadTo { to, .. }
            | Self::CubicTo { to, .. } => to,
        }
    }

    /// Control points followed by the end point.
    pub fn points(&self) -> Vec<Point> {
        match *self {
            Self::MoveTo { to } | Self::LineTo { to } => vec![to],
            Self::QuadTo { control, to } => vec![control, to],
            Self::CubicTo {
                control1,
                control2,
                to,
            } => vec![control1, control2, to],
        }
    }

    pub fn map(self, f: impl Fn(Point) -> Point) -> Self {
        match self {
            Self::MoveTo { to } => Self::MoveTo { to: f(to) },
            Self::LineTo { to } => Self::LineTo { to: f(to) },
            Self::QuadTo { control, to } => Self::QuadTo {
                control: f(control),
                to: f(to),
            },
            Self::CubicTo {
                control1,
                control2,
                to,
            } => Self::CubicTo {
                control1: f(control1),
                control2: f(control2),
                to: f(to),
            },
        }
    }
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveTo { to } => write!(f, "M {} {}", to.x, to.y),
            Self::LineTo { to } => write!(f, "L {} {}", to.x, to.y),
            Self::QuadTo { control, to } => {
                write!(f, "Q {} {} {} {}", control.x, control.y, to.x, to.y)
            }
            Self::CubicTo {
                control1,
                control2,
                to,
            } => write!(
                f,
                "C {} {} {} {} {} {}",
                control1.x, control1.y, control2.x, control2.y, to.x, to.y
            ),
        }
    }
}

/// Filled triangle with its tip on the table edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowHead {
    pub tip: Point,
    pub left: Point,
    pub right: Point,
}

impl ArrowHead {
    pub fn points(&self) -> [Point; 3] {
        [self.tip, self.left, self.right]
    }
}

/// Geometry for one relationship, already multiplied by the zoom factor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedEdge {
    /// Index into the relationship list the edge was routed from.
    pub relationship_index: usize,
    pub anchor_from: Point,
    pub anchor_to: Point,
    pub from_side: Side,
    pub to_side: Side,
    pub path_commands: Vec<PathCommand>,
    pub arrow_heads: Vec<ArrowHead>,
}

impl RoutedEdge {
    /// SVG `d` attribute for the path.
    pub fn svg_path(&self) -> String {
        self.path_commands
            .iter()
            .map(PathCommand::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub(crate) fn scaled(self, factor: f64) -> Self {
        let s = |p: Point| p.scale(factor);
        Self {
            relationship_index: self.relationship_index,
            anchor_from: s(self.anchor_from),
            anchor_to: s(self.anchor_to),
            from_side: self.from_side,
            to_side: self.to_side,
            path_commands: self.path_commands.into_iter().map(|c| c.map(s)).collect(),
            arrow_heads: self
                .arrow_heads
                .into_iter()
                .map(|h| ArrowHead {
                    tip: s(h.tip),
                    left: s(h.left),
                    right: s(h.right),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoutingConfig {
    pub style: RoutingStyle,
    /// Zoom factor applied to every output coordinate.
    pub scale: f64,
    /// Bezier control distance as a fraction of the anchor distance.
    pub curve_factor: f64,
    pub max_control_distance: f64,
    pub corner_radius: f64,
    /// Distance of the side lane from the outermost anchor.
    pub lane_offset: f64,
    /// Minimum horizontal run leaving or entering a table.
    pub stub: f64,
    pub arrow_length: f64,
    pub arrow_width: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            style: RoutingStyle::default(),
            scale: 1.0,
            curve_factor: 0.4,
            max_control_distance: 150.0,
            corner_radius: 12.0,
            lane_offset: 30.0,
            stub: 20.0,
            arrow_length: 10.0,
            arrow_width: 8.0,
        }
    }
}
