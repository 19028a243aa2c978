//! The diagram state store.
//!
//! Holds the tables, relationships and canvas of one open document together
//! with transient interaction state (selection, connection gesture). Lookups
//! that miss are silent: mutators given an unknown id do nothing.

use log::{debug, trace};

use crate::config::StoreConfig;
use crate::connect::ConnectGesture;
use crate::error::StoreError;
use crate::ids::{IdGenerator, UuidGenerator};
use crate::model::{
    CanvasSettings, Column, DocumentInfo, Endpoint, ErdDocument, Position, Relationship,
    RelationshipType, Table,
};
use crate::patch::{CanvasPatch, ColumnPatch, RelationshipPatch, TablePatch};

/// What is currently selected. At most one thing at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Table(String),
    Relationship(String),
}

pub struct DiagramStore<G = UuidGenerator> {
    config: StoreConfig,
    ids: G,
    tables: Vec<Table>,
    relationships: Vec<Relationship>,
    canvas: CanvasSettings,
    selection: Selection,
    connect: ConnectGesture,
}

impl DiagramStore<UuidGenerator> {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default(), UuidGenerator)
    }
}

impl Default for DiagramStore<UuidGenerator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: IdGenerator> DiagramStore<G> {
    /// Empty store with the configured default canvas.
    pub fn with_config(config: StoreConfig, ids: G) -> Self {
        Self {
            canvas: config.canvas,
            config,
            ids,
            tables: Vec::new(),
            relationships: Vec::new(),
            selection: Selection::None,
            connect: ConnectGesture::default(),
        }
    }

    /// Store holding the contents of `doc`.
    ///
    /// Table heights are raised to fit their columns and relationships whose
    /// endpoints do not resolve are dropped.
    pub fn from_document(doc: ErdDocument, config: StoreConfig, ids: G) -> Self {
        let mut store = Self::with_config(config, ids);
        store.tables = doc.tables;
        store.canvas = doc.canvas;
        for table in &mut store.tables {
            store.config.metrics.fit_height(table);
        }

        let total = doc.relationships.len();
        let relationships: Vec<Relationship> = doc
            .relationships
            .into_iter()
            .filter(|r| {
                store.resolves(&r.from_table_id, &r.from_column_id)
                    && store.resolves(&r.to_table_id, &r.to_column_id)
            })
            .collect();
        if relationships.len() < total {
            debug!(
                "dropped {} dangling relationships from document {}",
                total - relationships.len(),
                doc.id
            );
        }
        store.relationships = relationships;
        store
    }

    /// Projects the live diagram onto the persistence shape.
    pub fn to_document(&self, info: DocumentInfo) -> ErdDocument {
        ErdDocument {
            id: info.id,
            name: info.name,
            tables: self.tables.clone(),
            relationships: self.relationships.clone(),
            canvas: self.canvas,
            created_at: info.created_at,
            updated_at: info.updated_at,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn canvas(&self) -> &CanvasSettings {
        &self.canvas
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn connect_gesture(&self) -> &ConnectGesture {
        &self.connect
    }

    // Tables

    /// Adds a table at `position` with a single `id` primary key column.
    pub fn add_table(&mut self, position: Position) -> Table {
        let column = Column {
            id: self.ids.next_id(),
            name: "id".to_string(),
            typ: "INT".to_string(),
            is_primary_key: true,
            is_foreign_key: false,
            is_not_null: true,
            default_value: None,
            comment: None,
        };
        let name = format!("Table_{}", self.tables.len() + 1);
        let mut table = Table {
            id: self.ids.next_id(),
            logical_name: name.clone(),
            physical_name: name,
            position,
            size: self.config.default_table_size,
            columns: vec![column],
            comment: None,
        };
        self.config.metrics.fit_height(&mut table);

        debug!("added table {} at ({}, {})", table.id, position.x, position.y);
        self.tables.push(table.clone());
        table
    }

    /// Merges `patch` into the table.
    ///
    /// The resulting height is never below the fit-to-columns floor. Columns
    /// dropped by a `columns` replacement take their relationships with them.
    pub fn update_table(&mut self, table_id: &str, patch: TablePatch) {
        let Some(table) = self.tables.iter_mut().find(|t| t.id == table_id) else {
            return;
        };

        let previous_columns: Option<Vec<String>> = patch
            .columns
            .as_ref()
            .map(|_| table.columns.iter().map(|c| c.id.clone()).collect());

        patch.apply(table);
        self.config.metrics.fit_height(table);

        if let Some(previous) = previous_columns {
            let removed: Vec<String> = previous
                .into_iter()
                .filter(|id| table.column(id).is_none())
                .collect();
            for column_id in &removed {
                self.cascade_column(column_id);
            }
        }
        trace!("updated table {}", table_id);
    }

    /// Removes the table and every relationship into or out of it.
    pub fn delete_table(&mut self, table_id: &str) {
        let Some(index) = self.tables.iter().position(|t| t.id == table_id) else {
            return;
        };
        self.tables.remove(index);

        let before = self.relationships.len();
        self.relationships.retain(|r| !r.touches_table(table_id));
        debug!(
            "deleted table {} and {} relationships",
            table_id,
            before - self.relationships.len()
        );

        if self.selection == Selection::Table(table_id.to_string()) {
            self.selection = Selection::None;
        }
        self.clear_dangling_relationship_selection();
        if self
            .connect
            .source()
            .is_some_and(|from| from.table_id == table_id)
        {
            self.connect.cancel();
        }
    }

    pub fn move_table(&mut self, table_id: &str, position: Position) {
        self.update_table(table_id, TablePatch::position(position));
    }

    // Columns

    /// Appends a default column, growing the table if needed.
    pub fn add_column(&mut self, table_id: &str) -> Option<Column> {
        let table = self.tables.iter_mut().find(|t| t.id == table_id)?;
        let column = Column {
            id: self.ids.next_id(),
            name: format!("column_{}", table.columns.len() + 1),
            typ: "VARCHAR(255)".to_string(),
            is_primary_key: false,
            is_foreign_key: false,
            is_not_null: false,
            default_value: None,
            comment: None,
        };
        table.columns.push(column.clone());
        self.config.metrics.fit_height(table);

        debug!("added column {} to table {}", column.id, table_id);
        Some(column)
    }

    pub fn update_column(&mut self, table_id: &str, column_id: &str, patch: ColumnPatch) {
        let column = self
            .tables
            .iter_mut()
            .find(|t| t.id == table_id)
            .and_then(|t| t.columns.iter_mut().find(|c| c.id == column_id));
        if let Some(column) = column {
            patch.apply(column);
            trace!("updated column {} of table {}", column_id, table_id);
        }
    }

    /// Removes the column and its relationships. The table keeps its height.
    pub fn delete_column(&mut self, table_id: &str, column_id: &str) {
        let Some(table) = self.tables.iter_mut().find(|t| t.id == table_id) else {
            return;
        };
        let Some(index) = table.column_index(column_id) else {
            return;
        };
        table.columns.remove(index);
        self.config.metrics.fit_height(table);

        debug!("deleted column {} from table {}", column_id, table_id);
        self.cascade_column(column_id);
    }

    fn cascade_column(&mut self, column_id: &str) {
        let before = self.relationships.len();
        self.relationships.retain(|r| !r.touches_column(column_id));
        let removed = before - self.relationships.len();
        if removed > 0 {
            debug!("column {} took {} relationships with it", column_id, removed);
        }

        self.clear_dangling_relationship_selection();
        if self
            .connect
            .source()
            .is_some_and(|from| from.column_id == column_id)
        {
            self.connect.cancel();
        }
    }

    // Relationships

    /// Adds a relationship without checking that its endpoints exist.
    ///
    /// Use [`try_add_relationship`](Self::try_add_relationship) when the ids
    /// did not just come out of this store.
    pub fn add_relationship(
        &mut self,
        from_table_id: &str,
        to_table_id: &str,
        from_column_id: &str,
        to_column_id: &str,
        kind: RelationshipType,
    ) -> Relationship {
        let relationship = Relationship {
            id: self.ids.next_id(),
            from_table_id: from_table_id.to_string(),
            to_table_id: to_table_id.to_string(),
            from_column_id: from_column_id.to_string(),
            to_column_id: to_column_id.to_string(),
            kind,
            label: None,
        };
        debug!(
            "added {} relationship {} ({}.{} -> {}.{})",
            kind.as_str(),
            relationship.id,
            from_table_id,
            from_column_id,
            to_table_id,
            to_column_id
        );
        self.relationships.push(relationship.clone());
        relationship
    }

    /// Like [`add_relationship`](Self::add_relationship) but rejects
    /// endpoints that do not resolve to a column of a table in the store.
    pub fn try_add_relationship(
        &mut self,
        from_table_id: &str,
        to_table_id: &str,
        from_column_id: &str,
        to_column_id: &str,
        kind: RelationshipType,
    ) -> Result<Relationship, StoreError> {
        for (table, column) in [(from_table_id, from_column_id), (to_table_id, to_column_id)] {
            if !self.resolves(table, column) {
                return Err(StoreError::InvalidReference {
                    table: table.to_string(),
                    column: column.to_string(),
                });
            }
        }
        Ok(self.add_relationship(from_table_id, to_table_id, from_column_id, to_column_id, kind))
    }

    pub fn update_relationship(&mut self, relationship_id: &str, patch: RelationshipPatch) {
        if let Some(relationship) = self
            .relationships
            .iter_mut()
            .find(|r| r.id == relationship_id)
        {
            patch.apply(relationship);
            trace!("updated relationship {}", relationship_id);
        }
    }

    pub fn delete_relationship(&mut self, relationship_id: &str) {
        let before = self.relationships.len();
        self.relationships.retain(|r| r.id != relationship_id);
        if self.relationships.len() < before {
            debug!("deleted relationship {}", relationship_id);
        }
        if self.selection == Selection::Relationship(relationship_id.to_string()) {
            self.selection = Selection::None;
        }
    }

    // Canvas

    pub fn update_canvas(&mut self, patch: CanvasPatch) {
        patch.apply(&mut self.canvas);
    }

    pub fn zoom_in(&mut self) {
        self.canvas.zoom = self.config.clamp_zoom(self.canvas.zoom * self.config.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.canvas.zoom = self.config.clamp_zoom(self.canvas.zoom / self.config.zoom_step);
    }

    pub fn reset_zoom(&mut self) {
        self.canvas.zoom = 1.0;
    }

    // Selection

    pub fn select_table(&mut self, table_id: Option<&str>) {
        self.selection = match table_id {
            Some(id) => Selection::Table(id.to_string()),
            None => Selection::None,
        };
    }

    pub fn select_relationship(&mut self, relationship_id: Option<&str>) {
        self.selection = match relationship_id {
            Some(id) => Selection::Relationship(id.to_string()),
            None => Selection::None,
        };
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
    }

    pub fn selected_table_id(&self) -> Option<&str> {
        match &self.selection {
            Selection::Table(id) => Some(id),
            _ => None,
        }
    }

    pub fn selected_relationship_id(&self) -> Option<&str> {
        match &self.selection {
            Selection::Relationship(id) => Some(id),
            _ => None,
        }
    }

    pub fn selected_table(&self) -> Option<&Table> {
        self.selected_table_id().and_then(|id| self.get_table_by_id(id))
    }

    pub fn selected_relationship(&self) -> Option<&Relationship> {
        self.selected_relationship_id()
            .and_then(|id| self.get_relationship_by_id(id))
    }

    fn clear_dangling_relationship_selection(&mut self) {
        let dangling = matches!(
            &self.selection,
            Selection::Relationship(id) if !self.relationships.iter().any(|r| &r.id == id)
        );
        if dangling {
            self.selection = Selection::None;
        }
    }

    // Connection gesture

    pub fn start_connect(&mut self, from_table_id: &str, from_column_id: &str) {
        debug!("connect started at {}.{}", from_table_id, from_column_id);
        self.connect
            .start(Endpoint::new(from_table_id, from_column_id));
    }

    pub fn update_connect_cursor(&mut self, position: Position) {
        trace!("connect cursor at ({}, {})", position.x, position.y);
        self.connect.move_cursor(position);
    }

    pub fn cancel_connect(&mut self) {
        if self.connect.is_connecting() {
            debug!("connect cancelled");
        }
        self.connect.cancel();
    }

    /// Ends the gesture with a one-to-many relationship into the target and
    /// selects it. Returns `None` when no gesture is in progress.
    pub fn complete_connect(&mut self, to_table_id: &str, to_column_id: &str) -> Option<Relationship> {
        let from = self.connect.finish()?;
        let relationship = self.add_relationship(
            &from.table_id,
            to_table_id,
            &from.column_id,
            to_column_id,
            RelationshipType::OneToMany,
        );
        self.selection = Selection::Relationship(relationship.id.clone());
        Some(relationship)
    }

    pub fn is_connecting(&self) -> bool {
        self.connect.is_connecting()
    }

    pub fn connect_from(&self) -> Option<&Endpoint> {
        self.connect.source()
    }

    pub fn connect_cursor(&self) -> Position {
        self.connect.cursor()
    }

    // Queries

    pub fn get_table_by_id(&self, table_id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == table_id)
    }

    pub fn get_relationship_by_id(&self, relationship_id: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == relationship_id)
    }

    /// Relationships starting or ending at the table.
    pub fn get_relationships_by_table_id(&self, table_id: &str) -> Vec<&Relationship> {
        self.relationships
            .iter()
            .filter(|r| r.touches_table(table_id))
            .collect()
    }

    pub fn get_column(&self, table_id: &str, column_id: &str) -> Option<&Column> {
        self.get_table_by_id(table_id)?.column(column_id)
    }

    pub fn get_column_index(&self, table_id: &str, column_id: &str) -> Option<usize> {
        self.get_table_by_id(table_id)?.column_index(column_id)
    }

    /// Y coordinate where a connector meets the column's row.
    pub fn get_column_center_y(&self, table_id: &str, column_id: &str) -> Option<f64> {
        let table = self.get_table_by_id(table_id)?;
        let index = table.column_index(column_id)?;
        Some(self.config.metrics.row_center_y(table, index))
    }

    /// Suggested width for the table's box given its current text.
    pub fn fit_table_width(&self, table_id: &str) -> Option<f64> {
        self.get_table_by_id(table_id)
            .map(|t| self.config.metrics.fit_width(t))
    }

    fn resolves(&self, table_id: &str, column_id: &str) -> bool {
        self.get_column(table_id, column_id).is_some()
    }
}
