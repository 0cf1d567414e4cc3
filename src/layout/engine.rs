//! Layout engine core implementation.

use std::collections::HashSet;

use log::debug;

use crate::geometry::{Point, Size};
use crate::measure::TableMetrics;
use crate::schema::{Relationship, Table};

use super::grouping::group_tables;
use super::placement::{grid_cells, place_grid};
use super::types::{LayoutConfig, LayoutResult, Placement};

/// Layout engine configuration and computation.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    pub(crate) metrics: TableMetrics,
    pub(crate) config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(metrics: TableMetrics, config: LayoutConfig) -> Self {
        Self { metrics, config }
    }

    pub fn metrics(&self) -> &TableMetrics {
        &self.metrics
    }

    /// Place the tables that `existing` does not know about.
    ///
    /// Known tables keep their position exactly; only their size is
    /// refreshed. The result holds every distinct table name in `tables`
    /// and nothing else.
    pub fn layout(
        &self,
        tables: &[Table],
        existing: &LayoutResult,
        relationships: &[Relationship],
    ) -> LayoutResult {
        let mut result = LayoutResult::new();
        let mut fresh: Vec<(&str, Size)> = Vec::new();

        for table in unique_tables(tables) {
            let size = self.metrics.table_size(table);
            match existing.get(&table.name) {
                Some(prev) => result.insert(table.name.as_str(), Placement::new(prev.position, size)),
                None => fresh.push((table.name.as_str(), size)),
            }
        }

        let kept = result.len();
        let sizes: Vec<Size> = fresh.iter().map(|(_, size)| *size).collect();
        let positions = place_grid(&sizes, &self.config, result.bottom());
        for ((name, size), position) in fresh.into_iter().zip(positions) {
            result.insert(name, Placement::new(position, size));
        }

        debug!(
            kept,
            placed = result.len() - kept,
            relationships = relationships.len();
            "Layout calculated",
        );
        result
    }

    /// Re-place every table, clustering related ones.
    ///
    /// Each group is laid out as its own small grid; groups are packed in
    /// rows, left to right, wrapping at the canvas width.
    pub fn auto_layout(&self, tables: &[Table], relationships: &[Relationship]) -> LayoutResult {
        let unique: Vec<Table> = unique_tables(tables).cloned().collect();
        let groups = group_tables(&unique, relationships, self.config.max_group_size);

        let margin = self.config.margin;
        let gap = self.config.group_gap.max(0.0);
        let row_limit = self.config.canvas_width - margin;
        let mut cursor = Point::new(margin, margin);
        let mut row_height: f64 = 0.0;
        let mut result = LayoutResult::new();

        for group in &groups {
            let sizes: Vec<Size> = group
                .members
                .iter()
                .map(|&m| self.metrics.table_size(&unique[m]))
                .collect();
            let (cells, extent) = grid_cells(&sizes, self.config.spacing_x, self.config.spacing_y);

            if cursor.x > margin && cursor.x + extent.width > row_limit {
                cursor = Point::new(margin, cursor.y + row_height + gap);
                row_height = 0.0;
            }

            for ((&member, cell), size) in group.members.iter().zip(cells).zip(sizes) {
                result.insert(
                    unique[member].name.as_str(),
                    Placement::new(cursor.add(cell), size),
                );
            }

            cursor.x += extent.width + gap;
            row_height = row_height.max(extent.height);
        }

        debug!(
            tables = result.len(),
            groups = groups.len();
            "Auto layout calculated",
        );
        result
    }
}

/// First declaration of each name.
fn unique_tables(tables: &[Table]) -> impl Iterator<Item = &Table> {
    let mut seen = HashSet::new();
    tables.iter().filter(move |t| seen.insert(t.name.as_str()))
}
