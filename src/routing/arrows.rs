//! Arrowhead triangles.

use crate::geometry::Point;
use crate::schema::RelationKind;

use super::anchors::Anchors;
use super::path::{end_tangent, start_tangent};
use super::types::{ArrowHead, PathCommand, RoutingConfig};

/// Triangle with its tip at `tip`, pointing along `direction`.
pub fn arrow_head(tip: Point, direction: Point, length: f64, width: f64) -> ArrowHead {
    let dir = direction.normalize_or(Point::new(1.0, 0.0));
    let back = tip.sub(dir.scale(length));
    let half = dir.perpendicular().scale(width / 2.0);
    ArrowHead {
        tip,
        left: back.add(half),
        right: back.sub(half),
    }
}

/// Arrowheads for the ends `kind` points at, oriented along the path where
/// it meets each table.
pub fn arrow_heads(
    kind: RelationKind,
    commands: &[PathCommand],
    anchors: &Anchors,
    config: &RoutingConfig,
) -> Vec<ArrowHead> {
    let mut heads = Vec::new();
    if kind.arrow_at_from() {
        // Arriving at the start means travelling against the path.
        let direction = start_tangent(commands)
            .map(|t| t.scale(-1.0))
            .unwrap_or(Point::new(-anchors.from_side.outward(), 0.0));
        heads.push(arrow_head(
            anchors.from,
            direction,
            config.arrow_length,
            config.arrow_width,
        ));
    }
    if kind.arrow_at_to() {
        let direction =
            end_tangent(commands).unwrap_or(Point::new(-anchors.to_side.outward(), 0.0));
        heads.push(arrow_head(
            anchors.to,
            direction,
            config.arrow_length,
            config.arrow_width,
        ));
    }
    heads
}
