//! Grid placement.

use crate::geometry::{Point, Size};

use super::types::LayoutConfig;

/// Columns for `count` tables: 1, 2 and 3 tables get one column each,
/// anything larger gets four.
pub fn column_count(count: usize) -> usize {
    match count {
        0..=3 => count,
        _ => 4,
    }
}

/// Row-major grid of uniform cells, each as large as the largest size.
/// Returns the top-left corner of every cell relative to the grid origin,
/// and the grid's overall extent.
pub fn grid_cells(sizes: &[Size], spacing_x: f64, spacing_y: f64) -> (Vec<Point>, Size) {
    let cols = column_count(sizes.len());
    if cols == 0 {
        return (Vec::new(), Size::default());
    }
    let rows = sizes.len().div_ceil(cols);
    let (spacing_x, spacing_y) = (spacing_x.max(0.0), spacing_y.max(0.0));

    let cell_w = sizes.iter().map(|s| s.width).fold(0.0, f64::max);
    let cell_h = sizes.iter().map(|s| s.height).fold(0.0, f64::max);

    let cells = (0..sizes.len())
        .map(|i| {
            let (col, row) = (i % cols, i / cols);
            Point::new(
                col as f64 * (cell_w + spacing_x),
                row as f64 * (cell_h + spacing_y),
            )
        })
        .collect();

    let extent = Size::new(
        cols as f64 * cell_w + (cols - 1) as f64 * spacing_x,
        rows as f64 * cell_h + (rows - 1) as f64 * spacing_y,
    );
    (cells, extent)
}

/// Positions for freshly appearing tables.
///
/// The grid is centered horizontally on a canvas at least as large as the
/// configured one. With `below` set it starts one row gap under that y;
/// otherwise it is centered vertically too.
pub fn place_grid(sizes: &[Size], config: &LayoutConfig, below: Option<f64>) -> Vec<Point> {
    let (cells, extent) = grid_cells(sizes, config.spacing_x, config.spacing_y);
    if cells.is_empty() {
        return cells;
    }

    let canvas_w = config.canvas_width.max(extent.width + 2.0 * config.margin);
    let canvas_h = config.canvas_height.max(extent.height + 2.0 * config.margin);
    let left = (canvas_w - extent.width) / 2.0;
    let top = match below {
        Some(bottom) => bottom + config.spacing_y.max(0.0),
        None => (canvas_h - extent.height) / 2.0,
    };

    cells
        .into_iter()
        .map(|cell| cell.add(Point::new(left, top)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_breakpoints() {
        let cols: Vec<_> = [0, 1, 2, 3, 4, 5, 10, 40].into_iter().map(column_count).collect();
        assert_eq!(cols, vec![0, 1, 2, 3, 4, 4, 4, 4]);
    }

    #[test]
    fn test_cells_row_major() {
        let sizes = vec![Size::new(100.0, 50.0); 5];
        let (cells, extent) = grid_cells(&sizes, 10.0, 20.0);
        assert_eq!(cells[1], Point::new(110.0, 0.0));
        assert_eq!(cells[4], Point::new(0.0, 70.0));
        assert_eq!(extent, Size::new(430.0, 120.0));
    }

    #[test]
    fn test_cells_use_largest_size() {
        let sizes = vec![Size::new(100.0, 50.0), Size::new(200.0, 90.0)];
        let (cells, _) = grid_cells(&sizes, 0.0, 0.0);
        assert_eq!(cells[1].x, 200.0);
    }

    #[test]
    fn test_centered_on_canvas() {
        let config = LayoutConfig::default();
        let positions = place_grid(&[Size::new(200.0, 100.0)], &config, None);
        assert_eq!(positions, vec![Point::new(500.0, 350.0)]);
    }

    #[test]
    fn test_below_existing() {
        let config = LayoutConfig::default();
        let positions = place_grid(&[Size::new(200.0, 100.0)], &config, Some(300.0));
        assert_eq!(positions[0].y, 360.0);
    }
}
