//! Editing session: the text, the table positions and the view settings,
//! plus the derived diagram for the current text.

use log::debug;
use serde::Serialize;

use crate::config::DiagramConfig;
use crate::diagnostic::ValidationReport;
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::layout::{LayoutEngine, LayoutResult};
use crate::parser::extract;
use crate::routing::{EdgeRouter, RoutedEdge, RoutingStyle};
use crate::schema::Schema;
use crate::validate::validate;

/// Everything the host needs to draw the current state.
///
/// Table positions and sizes are in diagram units; edge geometry is already
/// multiplied by `scale`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub report: ValidationReport,
    pub schema: Schema,
    pub layout: LayoutResult,
    pub edges: Vec<RoutedEdge>,
    pub style: RoutingStyle,
    pub scale: f64,
}

#[derive(Debug, Clone)]
pub struct Diagram {
    engine: LayoutEngine,
    router: EdgeRouter,
    text: String,
    snapshot: Snapshot,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new(DiagramConfig::default())
    }
}

impl Diagram {
    pub fn new(config: DiagramConfig) -> Self {
        let snapshot = Snapshot {
            report: ValidationReport::new(Vec::new()),
            schema: Schema::default(),
            layout: LayoutResult::new(),
            edges: Vec::new(),
            style: config.routing.style,
            scale: config.routing.scale,
        };
        Self {
            engine: LayoutEngine::new(config.metrics.clone(), config.layout),
            router: EdgeRouter::new(config.metrics, config.routing),
            text: String::new(),
            snapshot,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Re-derive the diagram from new text.
    ///
    /// Validation and extraction run independently. Tables keep the position
    /// recorded under their name; names that disappeared are forgotten and
    /// only tables new to this text are placed.
    pub fn update(&mut self, text: &str) -> &Snapshot {
        let report = validate(text);
        let mut schema = extract(text);

        let mut prior = std::mem::take(&mut self.snapshot.layout);
        prior.retain(|name, _| schema.tables.iter().any(|t| t.name == name));
        let layout = self
            .engine
            .layout(&schema.tables, &prior, &schema.relationships);
        layout.apply_to(&mut schema.tables);

        debug!(
            tables = schema.tables.len(),
            relationships = schema.relationships.len(),
            diagnostics = report.diagnostics.len();
            "Diagram updated",
        );

        self.text = text.to_string();
        self.snapshot.report = report;
        self.snapshot.schema = schema;
        self.snapshot.layout = layout;
        self.reroute()
    }

    /// Record a dragged table's new top-left corner.
    pub fn move_table(&mut self, name: &str, x: f64, y: f64) -> Result<&Snapshot> {
        let placement = self
            .snapshot
            .layout
            .get_mut(name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))?;
        placement.position = Point::new(x, y);
        self.snapshot.layout.apply_to(&mut self.snapshot.schema.tables);
        Ok(self.reroute())
    }

    pub fn set_routing_style(&mut self, style: RoutingStyle) -> &Snapshot {
        self.snapshot.style = style;
        self.reroute()
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<&Snapshot> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(Error::InvalidScale(scale));
        }
        self.snapshot.scale = scale;
        Ok(self.reroute())
    }

    /// Re-place every table by relationship clusters. Manual positions are
    /// discarded.
    pub fn auto_layout(&mut self) -> &Snapshot {
        let schema = &mut self.snapshot.schema;
        let layout = self
            .engine
            .auto_layout(&schema.tables, &schema.relationships);
        layout.apply_to(&mut schema.tables);
        self.snapshot.layout = layout;
        self.reroute()
    }

    fn reroute(&mut self) -> &Snapshot {
        let snapshot = &mut self.snapshot;
        snapshot.edges = self.router.route(
            &snapshot.schema.tables,
            &snapshot.schema.relationships,
            snapshot.scale,
            snapshot.style,
        );
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_TABLES: &str = "Table users {\n  id int [pk]\n}\nTable posts {\n  id int [pk]\n  user_id int [ref: > users.id]\n}\n";

    #[test]
    fn test_update_places_and_routes() {
        let mut diagram = Diagram::default();
        let snapshot = diagram.update(TWO_TABLES);
        assert!(snapshot.report.is_valid);
        assert_eq!(snapshot.schema.tables.len(), 2);
        assert_eq!(snapshot.layout.len(), 2);
        assert_eq!(snapshot.edges.len(), 1);
        let users = &snapshot.schema.tables[0];
        assert_eq!(Some(users.position), snapshot.layout.get("users").map(|p| p.position));
        assert!(!users.size.is_empty());
    }

    #[test]
    fn test_dragged_position_survives_edits() {
        let mut diagram = Diagram::default();
        diagram.update(TWO_TABLES);
        diagram.move_table("users", 50.0, 50.0).unwrap();

        let text = format!("{TWO_TABLES}Table tags {{\n  id int\n}}\n");
        let snapshot = diagram.update(&text);
        assert_eq!(snapshot.layout.get("users").unwrap().position, Point::new(50.0, 50.0));
        assert_eq!(snapshot.layout.len(), 3);
        assert_eq!(diagram.text(), text);
    }

    #[test]
    fn test_removed_table_is_forgotten() {
        let mut diagram = Diagram::default();
        diagram.update(TWO_TABLES);
        diagram.move_table("posts", 900.0, 900.0).unwrap();
        diagram.update("Table users {\n  id int\n}\n");
        let snapshot = diagram.update(TWO_TABLES);
        assert_ne!(snapshot.layout.get("posts").unwrap().position, Point::new(900.0, 900.0));
    }

    #[test]
    fn test_move_unknown_table() {
        let mut diagram = Diagram::default();
        diagram.update(TWO_TABLES);
        assert!(matches!(
            diagram.move_table("ghosts", 0.0, 0.0),
            Err(Error::UnknownTable(name)) if name == "ghosts"
        ));
    }

    #[test]
    fn test_style_and_scale_reroute() {
        let mut diagram = Diagram::default();
        let curved = diagram.update(TWO_TABLES).edges.clone();
        let straight = diagram.set_routing_style(RoutingStyle::Straight).edges.clone();
        assert_ne!(curved, straight);
        assert_eq!(straight[0].path_commands.len(), 2);

        let zoomed = diagram.set_scale(2.0).unwrap();
        assert_eq!(zoomed.edges[0].anchor_from, straight[0].anchor_from.scale(2.0));
        assert!(matches!(diagram.set_scale(-1.0), Err(Error::InvalidScale(_))));
        assert!(diagram.set_scale(f64::NAN).is_err());
    }

    #[test]
    fn test_auto_layout_moves_everything() {
        let mut diagram = Diagram::default();
        diagram.update(TWO_TABLES);
        diagram.move_table("users", 5000.0, 5000.0).unwrap();
        let snapshot = diagram.auto_layout();
        assert_eq!(snapshot.layout.len(), 2);
        assert_ne!(snapshot.layout.get("users").unwrap().position, Point::new(5000.0, 5000.0));
        assert_eq!(snapshot.edges.len(), 1);
    }
}
