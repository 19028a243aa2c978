pub mod config;
pub mod connect;
pub mod error;
pub mod ids;
pub mod measure;
pub mod model;
pub mod patch;
pub mod store;

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

use config::StoreConfig;
use error::StoreError;
use ids::{IdGenerator, UuidGenerator};
use model::{
    CanvasSettings, DocumentInfo, Endpoint, ErdDocument, Position, Relationship, RelationshipType,
    Table,
};
use patch::{CanvasPatch, ColumnPatch, RelationshipPatch, TablePatch};
use store::DiagramStore;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Everything the renderer reads to draw one frame.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    tables: &'a [Table],
    relationships: &'a [Relationship],
    canvas: &'a CanvasSettings,
    selected_table_id: Option<&'a str>,
    selected_relationship_id: Option<&'a str>,
    is_connecting: bool,
    connect_from: Option<&'a Endpoint>,
    connect_cursor: Position,
}

fn snapshot_json<G: IdGenerator>(store: &DiagramStore<G>) -> Result<String, StoreError> {
    let snapshot = Snapshot {
        tables: store.tables(),
        relationships: store.relationships(),
        canvas: store.canvas(),
        selected_table_id: store.selected_table_id(),
        selected_relationship_id: store.selected_relationship_id(),
        is_connecting: store.is_connecting(),
        connect_from: store.connect_from(),
        connect_cursor: store.connect_cursor(),
    };
    to_json(&snapshot)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, StoreError> {
    Ok(serde_json::to_string(value)?)
}

fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, StoreError> {
    Ok(serde_json::from_str(json)?)
}

fn parse_relationship_type(s: &str) -> Result<RelationshipType, StoreError> {
    RelationshipType::from_str(s).ok_or_else(|| StoreError::UnknownRelationshipType(s.to_string()))
}

fn js_error(err: StoreError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Diagram store handle owned by the editor view.
///
/// Structured values cross the boundary as JSON strings. Lookups that find
/// nothing return `undefined` rather than `null` (`completeConnect` while idle,
/// `addColumn` and `getTableById` for an unknown table, `getColumnCenterY` and
/// `fitTableWidth` for an unknown table or column); callers test with
/// `== null`. `getColumnIndex` is the exception and returns `-1`.
#[wasm_bindgen(js_name = "ErdStore")]
pub struct ErdStore {
    inner: DiagramStore<UuidGenerator>,
}

impl Default for ErdStore {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen(js_class = "ErdStore")]
impl ErdStore {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: DiagramStore::new(),
        }
    }

    /// Replaces the whole diagram with a saved document.
    #[wasm_bindgen(js_name = "loadDocument")]
    pub fn load_document(&mut self, json: &str) -> Result<(), JsValue> {
        let doc: ErdDocument = from_json(json).map_err(js_error)?;
        self.inner = DiagramStore::from_document(doc, StoreConfig::default(), UuidGenerator);
        Ok(())
    }

    /// `info` carries `id`, `name`, `createdAt` and `updatedAt`.
    #[wasm_bindgen(js_name = "toDocument")]
    pub fn to_document(&self, info: &str) -> Result<String, JsValue> {
        let info: DocumentInfo = from_json(info).map_err(js_error)?;
        to_json(&self.inner.to_document(info)).map_err(js_error)
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        snapshot_json(&self.inner).map_err(js_error)
    }

    #[wasm_bindgen(js_name = "addTable")]
    pub fn add_table(&mut self, x: f64, y: f64) -> Result<String, JsValue> {
        let table = self.inner.add_table(Position::new(x, y));
        to_json(&table).map_err(js_error)
    }

    #[wasm_bindgen(js_name = "updateTable")]
    pub fn update_table(&mut self, table_id: &str, patch: &str) -> Result<(), JsValue> {
        let patch: TablePatch = from_json(patch).map_err(js_error)?;
        self.inner.update_table(table_id, patch);
        Ok(())
    }

    #[wasm_bindgen(js_name = "deleteTable")]
    pub fn delete_table(&mut self, table_id: &str) {
        self.inner.delete_table(table_id);
    }

    #[wasm_bindgen(js_name = "moveTable")]
    pub fn move_table(&mut self, table_id: &str, x: f64, y: f64) {
        self.inner.move_table(table_id, Position::new(x, y));
    }

    #[wasm_bindgen(js_name = "addColumn")]
    pub fn add_column(&mut self, table_id: &str) -> Result<Option<String>, JsValue> {
        self.inner
            .add_column(table_id)
            .map(|column| to_json(&column))
            .transpose()
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = "updateColumn")]
    pub fn update_column(&mut self, table_id: &str, column_id: &str, patch: &str) -> Result<(), JsValue> {
        let patch: ColumnPatch = from_json(patch).map_err(js_error)?;
        self.inner.update_column(table_id, column_id, patch);
        Ok(())
    }

    #[wasm_bindgen(js_name = "deleteColumn")]
    pub fn delete_column(&mut self, table_id: &str, column_id: &str) {
        self.inner.delete_column(table_id, column_id);
    }

    #[wasm_bindgen(js_name = "addRelationship")]
    pub fn add_relationship(
        &mut self,
        from_table_id: &str,
        to_table_id: &str,
        from_column_id: &str,
        to_column_id: &str,
        kind: &str,
    ) -> Result<String, JsValue> {
        let kind = parse_relationship_type(kind).map_err(js_error)?;
        let relationship = self.inner.add_relationship(
            from_table_id,
            to_table_id,
            from_column_id,
            to_column_id,
            kind,
        );
        to_json(&relationship).map_err(js_error)
    }

    /// Fails when an endpoint does not name a column of an existing table.
    #[wasm_bindgen(js_name = "tryAddRelationship")]
    pub fn try_add_relationship(
        &mut self,
        from_table_id: &str,
        to_table_id: &str,
        from_column_id: &str,
        to_column_id: &str,
        kind: &str,
    ) -> Result<String, JsValue> {
        let kind = parse_relationship_type(kind).map_err(js_error)?;
        let relationship = self
            .inner
            .try_add_relationship(from_table_id, to_table_id, from_column_id, to_column_id, kind)
            .map_err(js_error)?;
        to_json(&relationship).map_err(js_error)
    }

    #[wasm_bindgen(js_name = "updateRelationship")]
    pub fn update_relationship(&mut self, relationship_id: &str, patch: &str) -> Result<(), JsValue> {
        let patch: RelationshipPatch = from_json(patch).map_err(js_error)?;
        self.inner.update_relationship(relationship_id, patch);
        Ok(())
    }

    #[wasm_bindgen(js_name = "deleteRelationship")]
    pub fn delete_relationship(&mut self, relationship_id: &str) {
        self.inner.delete_relationship(relationship_id);
    }

    #[wasm_bindgen(js_name = "updateCanvas")]
    pub fn update_canvas(&mut self, patch: &str) -> Result<(), JsValue> {
        let patch: CanvasPatch = from_json(patch).map_err(js_error)?;
        self.inner.update_canvas(patch);
        Ok(())
    }

    #[wasm_bindgen(js_name = "zoomIn")]
    pub fn zoom_in(&mut self) {
        self.inner.zoom_in();
    }

    #[wasm_bindgen(js_name = "zoomOut")]
    pub fn zoom_out(&mut self) {
        self.inner.zoom_out();
    }

    #[wasm_bindgen(js_name = "resetZoom")]
    pub fn reset_zoom(&mut self) {
        self.inner.reset_zoom();
    }

    #[wasm_bindgen(js_name = "selectTable")]
    pub fn select_table(&mut self, table_id: Option<String>) {
        self.inner.select_table(table_id.as_deref());
    }

    #[wasm_bindgen(js_name = "selectRelationship")]
    pub fn select_relationship(&mut self, relationship_id: Option<String>) {
        self.inner.select_relationship(relationship_id.as_deref());
    }

    #[wasm_bindgen(js_name = "clearSelection")]
    pub fn clear_selection(&mut self) {
        self.inner.clear_selection();
    }

    #[wasm_bindgen(js_name = "startConnect")]
    pub fn start_connect(&mut self, from_table_id: &str, from_column_id: &str) {
        self.inner.start_connect(from_table_id, from_column_id);
    }

    #[wasm_bindgen(js_name = "updateConnectCursor")]
    pub fn update_connect_cursor(&mut self, x: f64, y: f64) {
        self.inner.update_connect_cursor(Position::new(x, y));
    }

    #[wasm_bindgen(js_name = "cancelConnect")]
    pub fn cancel_connect(&mut self) {
        self.inner.cancel_connect();
    }

    /// Relationship JSON, or `undefined` when no connection was in progress.
    #[wasm_bindgen(js_name = "completeConnect")]
    pub fn complete_connect(&mut self, to_table_id: &str, to_column_id: &str) -> Result<Option<String>, JsValue> {
        self.inner
            .complete_connect(to_table_id, to_column_id)
            .map(|relationship| to_json(&relationship))
            .transpose()
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = "getTableById")]
    pub fn get_table_by_id(&self, table_id: &str) -> Result<Option<String>, JsValue> {
        self.inner
            .get_table_by_id(table_id)
            .map(to_json)
            .transpose()
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = "getRelationshipsByTableId")]
    pub fn get_relationships_by_table_id(&self, table_id: &str) -> Result<String, JsValue> {
        to_json(&self.inner.get_relationships_by_table_id(table_id)).map_err(js_error)
    }

    /// Row index of the column, or -1.
    #[wasm_bindgen(js_name = "getColumnIndex")]
    pub fn get_column_index(&self, table_id: &str, column_id: &str) -> i32 {
        self.inner
            .get_column_index(table_id, column_id)
            .map_or(-1, |index| index as i32)
    }

    /// Y of the row's center, or `undefined` for an unknown table or column.
    #[wasm_bindgen(js_name = "getColumnCenterY")]
    pub fn get_column_center_y(&self, table_id: &str, column_id: &str) -> Option<f64> {
        self.inner.get_column_center_y(table_id, column_id)
    }

    #[wasm_bindgen(js_name = "fitTableWidth")]
    pub fn fit_table_width(&self, table_id: &str) -> Option<f64> {
        self.inner.fit_table_width(table_id)
    }
}
