use std::fmt::{self, Write};

use crate::diagram::Snapshot;
use crate::error::Result;
use crate::geometry::Size;
use crate::measure::TableMetrics;
use crate::routing::RoutedEdge;
use crate::schema::Table;

const PADDING: f64 = 40.0;

/// Static SVG preview of a positioned diagram.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    metrics: TableMetrics,
}

impl SvgRenderer {
    pub fn new(metrics: TableMetrics) -> Self {
        Self { metrics }
    }

    pub fn render_snapshot(&self, snapshot: &Snapshot) -> Result<String> {
        self.render(&snapshot.schema.tables, &snapshot.edges, snapshot.scale)
    }

    /// Tables are drawn in diagram units inside a group scaled by `scale`;
    /// edges arrive pre-scaled and are drawn as they are.
    pub fn render(&self, tables: &[Table], edges: &[RoutedEdge], scale: f64) -> Result<String> {
        let mut svg = String::new();
        self.write_document(&mut svg, tables, edges, scale)?;
        Ok(svg)
    }

    fn write_document(
        &self,
        svg: &mut String,
        tables: &[Table],
        edges: &[RoutedEdge],
        scale: f64,
    ) -> fmt::Result {
        let extent = self.extent(tables, edges, scale);
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = extent.width,
            h = extent.height,
        )?;

        writeln!(
            svg,
            r#"<style>
  .table-bg {{ fill: #fff; }}
  .table-header {{ fill: #e0e0e0; }}
  .table-border {{ fill: none; stroke: #333; stroke-width: 1.5; }}
  .table-name {{ font-family: monospace; font-size: 14px; font-weight: bold; }}
  .field-text {{ font-family: monospace; font-size: 12px; }}
  .pk {{ font-weight: bold; }}
  .edge {{ stroke: #666; stroke-width: 1.5; fill: none; }}
  .arrow {{ fill: #666; }}
</style>"#
        )?;

        // Edges go first so tables cover their ends.
        for edge in edges {
            self.write_edge(svg, edge)?;
        }

        writeln!(svg, r#"<g transform="scale({scale})">"#)?;
        for table in tables {
            self.write_table(svg, table)?;
        }
        writeln!(svg, "</g>")?;
        writeln!(svg, "</svg>")
    }

    fn extent(&self, tables: &[Table], edges: &[RoutedEdge], scale: f64) -> Size {
        let table_corners = tables.iter().map(|t| {
            let size = self.size_of(t);
            (
                (t.position.x + size.width) * scale,
                (t.position.y + size.height) * scale,
            )
        });
        let edge_points = edges
            .iter()
            .flat_map(|e| e.path_commands.iter().flat_map(|c| c.points()))
            .map(|p| (p.x, p.y));
        let (w, h) = table_corners
            .chain(edge_points)
            .fold((0.0_f64, 0.0_f64), |(w, h), (x, y)| (w.max(x), h.max(y)));
        Size::new(w + PADDING, h + PADDING)
    }

    fn size_of(&self, table: &Table) -> Size {
        if table.size.is_empty() {
            self.metrics.table_size(table)
        } else {
            table.size
        }
    }

    fn write_table(&self, svg: &mut String, table: &Table) -> fmt::Result {
        let Size {
            width: w,
            height: h,
        } = self.size_of(table);
        let (x, y) = (table.position.x, table.position.y);
        let header_h = self.metrics.header_height;
        let header_fill = table
            .color
            .as_deref()
            .map(|c| format!(r#" style="fill: {}""#, escape_xml(c)))
            .unwrap_or_default();

        writeln!(
            svg,
            r#"<rect class="table-bg" x="{x}" y="{y}" width="{w}" height="{h}" rx="4" />"#
        )?;

        if table.fields.is_empty() {
            writeln!(
                svg,
                r#"<rect class="table-header"{header_fill} x="{x}" y="{y}" width="{w}" height="{h}" rx="4" />"#
            )?;
        } else {
            // Rounded top, square bottom.
            writeln!(
                svg,
                r#"<rect class="table-header"{header_fill} x="{x}" y="{y}" width="{w}" height="{header_h}" rx="4" />"#
            )?;
            writeln!(
                svg,
                r#"<rect class="table-header"{header_fill} x="{x}" y="{}" width="{w}" height="4" />"#,
                y + header_h - 4.0,
            )?;
        }

        writeln!(
            svg,
            r#"<text class="table-name" x="{}" y="{}" text-anchor="middle">{}</text>"#,
            x + w / 2.0,
            y + header_h / 2.0 + 5.0,
            escape_xml(&table.name)
        )?;

        if !table.fields.is_empty() {
            writeln!(
                svg,
                r##"<line x1="{x}" y1="{}" x2="{}" y2="{}" stroke="#333" stroke-width="1" />"##,
                y + header_h,
                x + w,
                y + header_h
            )?;

            for (i, field) in table.fields.iter().enumerate() {
                let row_y = y + self.metrics.row_center(i);
                // Rows past the clamped height are not drawn.
                if row_y > y + h {
                    break;
                }
                let (class, prefix) = if field.is_primary_key {
                    ("field-text pk", "◆ ")
                } else {
                    ("field-text", "  ")
                };
                writeln!(
                    svg,
                    r#"<text class="{class}" x="{}" y="{}" dominant-baseline="middle">{}</text>"#,
                    x + self.metrics.padding_x,
                    row_y,
                    escape_xml(&format!("{prefix}{}: {}", field.name, field.data_type))
                )?;
            }
        }

        writeln!(
            svg,
            r#"<rect class="table-border" x="{x}" y="{y}" width="{w}" height="{h}" rx="4" />"#
        )
    }

    fn write_edge(&self, svg: &mut String, edge: &RoutedEdge) -> fmt::Result {
        writeln!(
            svg,
            r#"<path class="edge" data-relationship="{}" d="{}" />"#,
            edge.relationship_index,
            edge.svg_path()
        )?;
        for head in &edge.arrow_heads {
            let points = head
                .points()
                .iter()
                .map(|p| format!("{},{}", p.x, p.y))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(svg, r#"<polygon class="arrow" points="{points}" />"#)?;
        }
        Ok(())
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::Diagram;

    #[test]
    fn test_render_basic() {
        let mut diagram = Diagram::default();
        let snapshot = diagram.update("Table User {\n  id int [pk]\n  name varchar\n}\n");
        let svg = SvgRenderer::default().render_snapshot(snapshot).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(">User</text>"));
        assert!(svg.contains("◆ id: int"));
        assert!(svg.contains("  name: varchar"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_render_empty_diagram() {
        let svg = SvgRenderer::default().render(&[], &[], 1.0).unwrap();
        assert!(svg.contains(r#"width="40" height="40""#));
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn test_render_unicode_and_escaping() {
        let mut diagram = Diagram::default();
        let snapshot = diagram.update("Table ユーザー {\n  名前 varchar\n  tags \"a<b>\"\n}\n");
        let svg = SvgRenderer::default().render_snapshot(snapshot).unwrap();

        assert!(svg.contains("ユーザー"));
        assert!(svg.contains("名前"));
        assert!(!svg.contains("a<b>"));
    }

    #[test]
    fn test_render_edges_and_header_color() {
        let mut diagram = Diagram::default();
        let snapshot = diagram.update(
            "Table users [headercolor: #3498DB] {\n  id int [pk]\n}\nTable posts {\n  user_id int\n}\nRef: posts.user_id <> users.id\n",
        );
        let svg = SvgRenderer::default().render_snapshot(snapshot).unwrap();

        assert!(svg.contains(r#"class="edge""#));
        assert_eq!(svg.matches(r#"class="arrow""#).count(), 2);
        assert!(svg.contains("fill: #3498DB"));
        assert!(svg.contains(r#"<g transform="scale(1)">"#));
    }
}
