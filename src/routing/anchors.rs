//! Anchor points on table edges.

use crate::geometry::{Point, Rect};

use super::types::Side;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchors {
    pub from: Point,
    pub to: Point,
    pub from_side: Side,
    pub to_side: Side,
    /// Both ends are on the same table.
    pub looped: bool,
}

/// A field row on one table.
#[derive(Debug, Clone, Copy)]
pub struct RowEnd {
    pub rect: Rect,
    /// Row center, measured from the top of the table.
    pub offset: f64,
}

impl RowEnd {
    fn at(&self, side: Side) -> Point {
        let x = match side {
            Side::Left => self.rect.origin.x,
            Side::Right => self.rect.right(),
        };
        let y = self.rect.origin.y + self.offset.clamp(0.0, self.rect.size.height);
        Point::new(x, y)
    }
}

/// Pick the table edges an edge connects.
///
/// Horizontally dominant separation joins facing edges. Vertically
/// dominant separation joins both left edges so the path can run beside
/// the tables instead of through them. A table related to itself loops
/// off its right edge.
pub fn choose_anchors(from: RowEnd, to: RowEnd, same_table: bool) -> Anchors {
    let (from_side, to_side) = if same_table {
        (Side::Right, Side::Right)
    } else {
        let delta = to.rect.center().sub(from.rect.center());
        if delta.x.abs() >= delta.y.abs() {
            if delta.x >= 0.0 {
                (Side::Right, Side::Left)
            } else {
                (Side::Left, Side::Right)
            }
        } else {
            (Side::Left, Side::Left)
        }
    };

    Anchors {
        from: from.at(from_side),
        to: to.at(to_side),
        from_side,
        to_side,
        looped: same_table,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    fn end(x: f64, y: f64, offset: f64) -> RowEnd {
        RowEnd {
            rect: Rect::new(Point::new(x, y), Size::new(100.0, 80.0)),
            offset,
        }
    }

    #[test]
    fn test_horizontal_left_to_right() {
        let a = choose_anchors(end(0.0, 0.0, 48.0), end(300.0, 20.0, 72.0), false);
        assert_eq!((a.from_side, a.to_side), (Side::Right, Side::Left));
        assert_eq!(a.from, Point::new(100.0, 48.0));
        assert_eq!(a.to, Point::new(300.0, 92.0));
    }

    #[test]
    fn test_horizontal_right_to_left() {
        let a = choose_anchors(end(300.0, 0.0, 48.0), end(0.0, 0.0, 48.0), false);
        assert_eq!((a.from_side, a.to_side), (Side::Left, Side::Right));
        assert_eq!(a.from.x, 300.0);
        assert_eq!(a.to.x, 100.0);
    }

    #[test]
    fn test_vertical_uses_left_edges() {
        let a = choose_anchors(end(0.0, 0.0, 48.0), end(40.0, 400.0, 48.0), false);
        assert_eq!((a.from_side, a.to_side), (Side::Left, Side::Left));
        assert_eq!((a.from.x, a.to.x), (0.0, 40.0));
    }

    #[test]
    fn test_self_reference_loops_right() {
        let a = choose_anchors(end(0.0, 0.0, 48.0), end(0.0, 0.0, 72.0), true);
        assert!(a.looped);
        assert_eq!((a.from_side, a.to_side), (Side::Right, Side::Right));
    }

    #[test]
    fn test_offset_clamped_to_table() {
        let a = choose_anchors(end(0.0, 0.0, 500.0), end(300.0, 0.0, 48.0), false);
        assert_eq!(a.from.y, 80.0);
    }
}
