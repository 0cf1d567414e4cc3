//! Edge routing: relationship lines between positioned tables.

mod anchors;
mod arrows;
mod path;
mod types;

pub use anchors::{Anchors, RowEnd, choose_anchors};
pub use arrows::arrow_head;
pub use types::{ArrowHead, PathCommand, RoutedEdge, RoutingConfig, RoutingStyle, Side};

use log::{debug, trace};

use crate::geometry::Rect;
use crate::measure::TableMetrics;
use crate::schema::{Endpoint, Relationship, Table};

/// Routes relationships into drawable geometry.
#[derive(Debug, Clone, Default)]
pub struct EdgeRouter {
    metrics: TableMetrics,
    config: RoutingConfig,
}

impl EdgeRouter {
    pub fn new(metrics: TableMetrics, config: RoutingConfig) -> Self {
        Self { metrics, config }
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// One edge per relationship whose tables and fields all exist.
    ///
    /// Tables are looked up by name, first declaration first. Geometry is
    /// computed in diagram units and then multiplied by `scale`.
    pub fn route(
        &self,
        tables: &[Table],
        relationships: &[Relationship],
        scale: f64,
        style: RoutingStyle,
    ) -> Vec<RoutedEdge> {
        let edges: Vec<RoutedEdge> = relationships
            .iter()
            .enumerate()
            .filter_map(|(index, rel)| {
                let edge = self.route_one(tables, index, rel, style);
                if edge.is_none() {
                    trace!(
                        index,
                        from = rel.from.table.as_str(),
                        to = rel.to.table.as_str();
                        "Skipping dangling relationship",
                    );
                }
                edge
            })
            .map(|edge| edge.scaled(scale))
            .collect();

        debug!(
            relationships = relationships.len(),
            edges = edges.len(),
            scale,
            style:% = style;
            "Edges routed",
        );
        edges
    }

    fn route_one(
        &self,
        tables: &[Table],
        index: usize,
        rel: &Relationship,
        style: RoutingStyle,
    ) -> Option<RoutedEdge> {
        let from = self.row_end(tables, &rel.from)?;
        let to = self.row_end(tables, &rel.to)?;
        let anchors = choose_anchors(from, to, rel.from.table == rel.to.table);

        let path_commands = match style {
            RoutingStyle::Straight => path::straight(&anchors, &self.config),
            RoutingStyle::Curved => path::curved(&anchors, &self.config),
            RoutingStyle::Orthogonal => path::orthogonal(&anchors, &self.config),
        };
        let arrow_heads = arrows::arrow_heads(rel.kind, &path_commands, &anchors, &self.config);

        Some(RoutedEdge {
            relationship_index: index,
            anchor_from: anchors.from,
            anchor_to: anchors.to,
            from_side: anchors.from_side,
            to_side: anchors.to_side,
            path_commands,
            arrow_heads,
        })
    }

    fn row_end(&self, tables: &[Table], endpoint: &Endpoint) -> Option<RowEnd> {
        let table = tables.iter().find(|t| t.name == endpoint.table)?;
        let field = table.field_index(&endpoint.field)?;
        let size = if table.size.is_empty() {
            self.metrics.table_size(table)
        } else {
            table.size
        };
        Some(RowEnd {
            rect: Rect::new(table.position, size),
            offset: self.metrics.row_center(field),
        })
    }
}
