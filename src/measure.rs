use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use crate::geometry::Size;
use crate::schema::Table;

/// Box metrics shared by layout, routing and rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableMetrics {
    pub char_width: f64,
    pub header_height: f64,
    pub row_height: f64,
    pub padding_x: f64,
    pub min_width: f64,
    pub max_width: f64,
    pub min_height: f64,
    pub max_height: f64,
}

impl Default for TableMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            header_height: 36.0,
            row_height: 24.0,
            padding_x: 12.0,
            min_width: 180.0,
            max_width: 360.0,
            min_height: 60.0,
            max_height: 600.0,
        }
    }
}

impl TableMetrics {
    pub fn text_width(&self, text: &str) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * self.char_width
    }

    /// Height grows with the field count; width follows the widest row.
    pub fn table_size(&self, table: &Table) -> Size {
        let height = table.fields.len() as f64 * self.row_height + self.header_height;

        let header_width = self.text_width(&table.name);
        let row_width = table
            .fields
            .iter()
            .map(|f| self.text_width(&f.name) + self.text_width(&f.data_type) + self.char_width * 3.0)
            .fold(0.0, f64::max);
        let width = header_width.max(row_width) + self.padding_x * 2.0;

        Size::new(
            width.clamp(self.min_width, self.max_width.max(self.min_width)),
            height.clamp(self.min_height, self.max_height.max(self.min_height)),
        )
    }

    /// Vertical offset of a field row's center from the top of its table.
    pub fn row_center(&self, field_index: usize) -> f64 {
        self.header_height + field_index as f64 * self.row_height + self.row_height / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;

    #[test]
    fn test_ascii_width() {
        let m = TableMetrics::default();
        assert_eq!(m.text_width("User"), 4.0 * 8.0);
    }

    #[test]
    fn test_unicode_width() {
        let m = TableMetrics::default();
        // Full-width characters take two cells.
        assert_eq!(m.text_width("ユーザー"), 8.0 * 8.0);
    }

    #[test]
    fn test_height_from_field_count() {
        let m = TableMetrics::default();
        let table = Table::new("t")
            .with_field(Field::new("a", "int"))
            .with_field(Field::new("b", "int"));
        assert_eq!(m.table_size(&table).height, 2.0 * 24.0 + 36.0);
    }

    #[test]
    fn test_height_is_clamped() {
        let m = TableMetrics::default();
        assert_eq!(m.table_size(&Table::new("empty")).height, 60.0);

        let mut big = Table::new("big");
        for i in 0..100 {
            big.fields.push(Field::new(format!("f{i}"), "int"));
        }
        assert_eq!(m.table_size(&big).height, 600.0);
    }

    #[test]
    fn test_width_is_clamped() {
        let m = TableMetrics::default();
        assert_eq!(m.table_size(&Table::new("t")).width, 180.0);
        let long = Table::new("x".repeat(200));
        assert_eq!(m.table_size(&long).width, 360.0);
    }

    #[test]
    fn test_row_center() {
        let m = TableMetrics::default();
        assert_eq!(m.row_center(0), 48.0);
        assert_eq!(m.row_center(2), 96.0);
    }
}
