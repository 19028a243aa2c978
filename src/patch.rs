//! Partial updates for model values.
//!
//! Every field is optional; `None` leaves the target untouched. Fields that
//! are themselves optional on the model use `Option<Option<_>>` so a patch can
//! clear them (`Some(None)`). Ids are never patchable.

use serde::{Deserialize, Deserializer};

use crate::model::{CanvasSettings, Column, Position, Relationship, RelationshipType, Size, Table};

/// Distinguishes an explicit `null` from a missing field.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TablePatch {
    pub logical_name: Option<String>,
    pub physical_name: Option<String>,
    pub position: Option<Position>,
    pub size: Option<Size>,
    pub columns: Option<Vec<Column>>,
    #[serde(deserialize_with = "double_option")]
    pub comment: Option<Option<String>>,
}

impl TablePatch {
    pub fn position(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn size(size: Size) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    /// Merges into `table`. Does not enforce the height floor.
    pub fn apply(self, table: &mut Table) {
        if let Some(name) = self.logical_name {
            table.logical_name = name;
        }
        if let Some(name) = self.physical_name {
            table.physical_name = name;
        }
        if let Some(position) = self.position {
            table.position = position;
        }
        if let Some(size) = self.size {
            table.size = size;
        }
        if let Some(columns) = self.columns {
            table.columns = columns;
        }
        if let Some(comment) = self.comment {
            table.comment = comment;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub typ: Option<String>,
    pub is_primary_key: Option<bool>,
    pub is_foreign_key: Option<bool>,
    pub is_not_null: Option<bool>,
    #[serde(deserialize_with = "double_option")]
    pub default_value: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub comment: Option<Option<String>>,
}

impl ColumnPatch {
    pub fn apply(self, column: &mut Column) {
        if let Some(name) = self.name {
            column.name = name;
        }
        if let Some(typ) = self.typ {
            column.typ = typ;
        }
        if let Some(pk) = self.is_primary_key {
            column.is_primary_key = pk;
        }
        if let Some(fk) = self.is_foreign_key {
            column.is_foreign_key = fk;
        }
        if let Some(not_null) = self.is_not_null {
            column.is_not_null = not_null;
        }
        if let Some(default_value) = self.default_value {
            column.default_value = default_value;
        }
        if let Some(comment) = self.comment {
            column.comment = comment;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RelationshipPatch {
    #[serde(rename = "type")]
    pub kind: Option<RelationshipType>,
    #[serde(deserialize_with = "double_option")]
    pub label: Option<Option<String>>,
}

impl RelationshipPatch {
    pub fn apply(self, relationship: &mut Relationship) {
        if let Some(kind) = self.kind {
            relationship.kind = kind;
        }
        if let Some(label) = self.label {
            relationship.label = label;
        }
    }
}

/// Shallow merge into the canvas. No clamping happens here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasPatch {
    pub zoom: Option<f64>,
    pub pan_x: Option<f64>,
    pub pan_y: Option<f64>,
    pub grid_size: Option<f64>,
    pub show_grid: Option<bool>,
}

impl CanvasPatch {
    pub fn apply(self, canvas: &mut CanvasSettings) {
        if let Some(zoom) = self.zoom {
            canvas.zoom = zoom;
        }
        if let Some(pan_x) = self.pan_x {
            canvas.pan_x = pan_x;
        }
        if let Some(pan_y) = self.pan_y {
            canvas.pan_y = pan_y;
        }
        if let Some(grid_size) = self.grid_size {
            canvas.grid_size = grid_size;
        }
        if let Some(show_grid) = self.show_grid {
            canvas.show_grid = show_grid;
        }
    }
}
