//! Data structures for layout computation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size};
use crate::schema::Table;

/// Where a table sits and how big it is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub position: Point,
    pub size: Size,
}

impl Placement {
    pub fn new(position: Point, size: Size) -> Self {
        Self { position, size }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.size)
    }
}

/// Table name -> placement, in insertion order.
///
/// Names are matched by string equality only. A table that shares its name
/// with an earlier declaration shares its placement too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutResult {
    placements: IndexMap<String, Placement>,
}

impl LayoutResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Placement> {
        self.placements.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Placement> {
        self.placements.get_mut(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, placement: Placement) {
        self.placements.insert(name.into(), placement);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.placements.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Placement)> {
        self.placements.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Lowest edge of any placed table.
    pub fn bottom(&self) -> Option<f64> {
        self.placements
            .values()
            .map(|p| p.rect().bottom())
            .reduce(f64::max)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &Placement) -> bool) {
        self.placements.retain(|k, v| keep(k, v));
    }

    /// Copy positions and sizes onto the tables they name.
    pub fn apply_to(&self, tables: &mut [Table]) {
        for table in tables {
            if let Some(p) = self.placements.get(&table.name) {
                table.position = p.position;
                table.size = p.size;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Horizontal gap between grid cells.
    pub spacing_x: f64,
    /// Vertical gap between grid rows.
    pub spacing_y: f64,
    /// Minimum canvas the grid is centered on.
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub margin: f64,
    /// Largest cluster produced by auto layout.
    pub max_group_size: usize,
    /// Space between clusters in auto layout.
    pub group_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing_x: 80.0,
            spacing_y: 60.0,
            canvas_width: 1200.0,
            canvas_height: 800.0,
            margin: 40.0,
            max_group_size: 6,
            group_gap: 120.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bottom_and_apply() {
        let mut result = LayoutResult::new();
        assert_eq!(result.bottom(), None);
        result.insert("a", Placement::new(Point::new(0.0, 10.0), Size::new(100.0, 50.0)));
        result.insert("b", Placement::new(Point::new(200.0, 0.0), Size::new(100.0, 30.0)));
        assert_eq!(result.bottom(), Some(60.0));

        let mut tables = vec![Table::new("b"), Table::new("missing")];
        result.apply_to(&mut tables);
        assert_eq!(tables[0].position, Point::new(200.0, 0.0));
        assert_eq!(tables[0].size, Size::new(100.0, 30.0));
        assert_eq!(tables[1].position, Point::default());
    }

    #[test]
    fn test_serializes_as_map() {
        let mut result = LayoutResult::new();
        result.insert("a", Placement::new(Point::new(50.0, 50.0), Size::new(1.0, 2.0)));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["a"]["position"]["x"], 50.0);
        assert_eq!(json["a"]["size"]["height"], 2.0);
    }
}
