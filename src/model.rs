//! Diagram data model shared with the rendering and persistence layers.
//!
//! Field names serialize in camelCase so a snapshot of the store has the same
//! shape as a saved document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub typ: String,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    pub is_not_null: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    /// User facing name, may contain any script
    pub logical_name: String,
    /// Name of the table in the database
    pub physical_name: String,
    pub position: Position,
    pub size: Size,
    /// Ordered top to bottom as drawn
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Table {
    /// Logical name, or the physical name when no logical name is set.
    pub fn display_name(&self) -> &str {
        if self.logical_name.trim().is_empty() {
            &self.physical_name
        } else {
            &self.logical_name
        }
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipType {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl RelationshipType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "one-to-one" => Some(Self::OneToOne),
            "one-to-many" => Some(Self::OneToMany),
            "many-to-one" => Some(Self::ManyToOne),
            "many-to-many" => Some(Self::ManyToMany),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneToOne => "one-to-one",
            Self::OneToMany => "one-to-many",
            Self::ManyToOne => "many-to-one",
            Self::ManyToMany => "many-to-many",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    pub from_table_id: String,
    pub to_table_id: String,
    pub from_column_id: String,
    pub to_column_id: String,
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Relationship {
    pub fn touches_table(&self, table_id: &str) -> bool {
        self.from_table_id == table_id || self.to_table_id == table_id
    }

    pub fn touches_column(&self, column_id: &str) -> bool {
        self.from_column_id == column_id || self.to_column_id == column_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSettings {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    pub grid_size: f64,
    pub show_grid: bool,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            grid_size: 20.0,
            show_grid: true,
        }
    }
}

/// One end of a relationship: a column inside a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub table_id: String,
    pub column_id: String,
}

impl Endpoint {
    pub fn new(table_id: impl Into<String>, column_id: impl Into<String>) -> Self {
        Self {
            table_id: table_id.into(),
            column_id: column_id.into(),
        }
    }
}

/// Identity and timestamps of a document, owned by whoever saves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persistence shape of one diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErdDocument {
    pub id: String,
    pub name: String,
    pub tables: Vec<Table>,
    pub relationships: Vec<Relationship>,
    pub canvas: CanvasSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
