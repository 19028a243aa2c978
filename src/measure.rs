use unicode_width::UnicodeWidthStr;

use crate::model::Table;

/// Layout constants shared with the renderer that draws table boxes.
///
/// `header_height` and `row_height` must match the drawing side: connector
/// anchors and the height floor are computed from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableMetrics {
    pub header_height: f64,
    pub row_height: f64,
    pub char_width: f64,
    pub padding_x: f64,
    pub min_table_width: f64,
}

impl Default for TableMetrics {
    fn default() -> Self {
        Self {
            header_height: 32.0,
            row_height: 24.0,
            char_width: 8.0,
            padding_x: 12.0,
            min_table_width: 120.0,
        }
    }
}

impl TableMetrics {
    pub fn text_width(&self, text: &str) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * self.char_width
    }

    /// Smallest height that fits the header plus `column_count` rows.
    pub fn min_height(&self, column_count: usize) -> f64 {
        self.header_height + column_count as f64 * self.row_height
    }

    /// Raises the table height to the floor. Never shrinks.
    pub fn fit_height(&self, table: &mut Table) {
        let min_height = self.min_height(table.columns.len());
        if table.size.height < min_height {
            table.size.height = min_height;
        }
    }

    /// Vertical center of the row at `index`, in canvas coordinates.
    pub fn row_center_y(&self, table: &Table, index: usize) -> f64 {
        table.position.y + self.header_height + index as f64 * self.row_height + self.row_height / 2.0
    }

    /// Width that fits the table name and every `name type` row.
    pub fn fit_width(&self, table: &Table) -> f64 {
        let header_width = self.text_width(table.display_name());

        let max_col_width = table
            .columns
            .iter()
            .map(|c| self.text_width(&c.name) + self.text_width(&c.typ) + self.char_width * 2.0)
            .fold(0.0, f64::max);

        let content_width = header_width.max(max_col_width) + self.padding_x * 2.0;
        content_width.max(self.min_table_width)
    }
}
