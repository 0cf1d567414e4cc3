//! Path shapes for each routing style.

use crate::geometry::Point;

use super::anchors::Anchors;
use super::types::{PathCommand, RoutingConfig, Side};

const EPSILON: f64 = 1e-6;

/// Direct line. A looped edge still has to leave the table, so it takes
/// the side lane with sharp corners.
pub fn straight(anchors: &Anchors, config: &RoutingConfig) -> Vec<PathCommand> {
    if anchors.looped {
        return rounded(&lane_points(anchors, config), 0.0);
    }
    vec![
        PathCommand::MoveTo { to: anchors.from },
        PathCommand::LineTo { to: anchors.to },
    ]
}

/// Cubic Bezier whose control points leave each anchor horizontally, away
/// from its table, by a fraction of the anchor distance.
pub fn curved(anchors: &Anchors, config: &RoutingConfig) -> Vec<PathCommand> {
    let reach = (anchors.from.distance(anchors.to) * config.curve_factor)
        .clamp(config.stub, config.max_control_distance.max(config.stub));
    let control1 = anchors
        .from
        .add(Point::new(anchors.from_side.outward() * reach, 0.0));
    let control2 = anchors
        .to
        .add(Point::new(anchors.to_side.outward() * reach, 0.0));
    vec![
        PathCommand::MoveTo { to: anchors.from },
        PathCommand::CubicTo {
            control1,
            control2,
            to: anchors.to,
        },
    ]
}

/// Axis-aligned route with rounded corners.
pub fn orthogonal(anchors: &Anchors, config: &RoutingConfig) -> Vec<PathCommand> {
    rounded(&orthogonal_points(anchors, config), config.corner_radius)
}

fn orthogonal_points(anchors: &Anchors, config: &RoutingConfig) -> Vec<Point> {
    if anchors.from_side == anchors.to_side {
        return lane_points(anchors, config);
    }

    let (from, to) = (anchors.from, anchors.to);
    let out = anchors.from_side.outward();
    // Horizontal room between the anchors, measured in the leaving direction.
    let room = (to.x - from.x) * out;

    if room >= 2.0 * config.stub {
        let mid_x = (from.x + to.x) / 2.0;
        vec![from, Point::new(mid_x, from.y), Point::new(mid_x, to.y), to]
    } else {
        let exit_x = from.x + out * config.stub;
        let entry_x = to.x + anchors.to_side.outward() * config.stub;
        let mid_y = (from.y + to.y) / 2.0;
        vec![
            from,
            Point::new(exit_x, from.y),
            Point::new(exit_x, mid_y),
            Point::new(entry_x, mid_y),
            Point::new(entry_x, to.y),
            to,
        ]
    }
}

/// Both anchors on the same side: run along a vertical lane just outside
/// the outermost anchor.
fn lane_points(anchors: &Anchors, config: &RoutingConfig) -> Vec<Point> {
    let (from, to) = (anchors.from, anchors.to);
    let lane_x = match anchors.from_side {
        Side::Left => from.x.min(to.x) - config.lane_offset,
        Side::Right => from.x.max(to.x) + config.lane_offset,
    };
    vec![from, Point::new(lane_x, from.y), Point::new(lane_x, to.y), to]
}

/// Drop repeated points and points in the middle of a straight run.
fn simplify(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last().is_some_and(|last| last.distance(p) < EPSILON) {
            continue;
        }
        if let [.., a, b] = out.as_slice() {
            let (ab, bp) = (b.sub(*a), p.sub(*b));
            let cross = ab.x * bp.y - ab.y * bp.x;
            let dot = ab.x * bp.x + ab.y * bp.y;
            if cross.abs() < EPSILON && dot > 0.0 {
                out.pop();
            }
        }
        out.push(p);
    }
    out
}

/// Polyline through `points` with each corner cut by a quadratic curve of
/// at most `radius`, shrunk to fit short segments.
pub fn rounded(points: &[Point], radius: f64) -> Vec<PathCommand> {
    let points = simplify(points);
    let Some((&first, rest)) = points.split_first() else {
        return Vec::new();
    };
    let mut commands = vec![PathCommand::MoveTo { to: first }];
    if rest.is_empty() {
        commands.push(PathCommand::LineTo { to: first });
        return commands;
    }

    for window in points.windows(3) {
        let [prev, corner, next] = [window[0], window[1], window[2]];
        let r = radius
            .max(0.0)
            .min(prev.distance(corner) / 2.0)
            .min(corner.distance(next) / 2.0);
        if r < EPSILON {
            commands.push(PathCommand::LineTo { to: corner });
            continue;
        }
        let fallback = Point::default();
        let before = corner.sub(corner.sub(prev).normalize_or(fallback).scale(r));
        let after = corner.add(next.sub(corner).normalize_or(fallback).scale(r));
        commands.push(PathCommand::LineTo { to: before });
        commands.push(PathCommand::QuadTo {
            control: corner,
            to: after,
        });
    }

    if let Some(&last) = points.last() {
        commands.push(PathCommand::LineTo { to: last });
    }
    commands
}

/// Unit direction the path travels as it arrives at its end.
pub fn end_tangent(commands: &[PathCommand]) -> Option<Point> {
    let points: Vec<Point> = commands.iter().flat_map(PathCommand::points).collect();
    let (&end, before) = points.split_last()?;
    let from = before.iter().rev().find(|p| p.distance(end) > EPSILON)?;
    Some(end.sub(*from).normalize_or(Point::default()))
}

/// Unit direction the path travels as it leaves its start.
pub fn start_tangent(commands: &[PathCommand]) -> Option<Point> {
    let points: Vec<Point> = commands.iter().flat_map(PathCommand::points).collect();
    let (&start, after) = points.split_first()?;
    let towards = after.iter().find(|p| p.distance(start) > EPSILON)?;
    Some(towards.sub(start).normalize_or(Point::default()))
}
