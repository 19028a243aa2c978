use crate::measure::TableMetrics;
use crate::model::{CanvasSettings, Size};

/// Tunables for a [`DiagramStore`](crate::store::DiagramStore).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreConfig {
    pub metrics: TableMetrics,
    /// Size of a freshly added table, before the height floor
    pub default_table_size: Size,
    pub canvas: CanvasSettings,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Factor applied by one zoom in / zoom out step
    pub zoom_step: f64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            metrics: TableMetrics::default(),
            default_table_size: Size::new(200.0, 100.0),
            canvas: CanvasSettings::default(),
            min_zoom: 0.1,
            max_zoom: 3.0,
            zoom_step: 1.2,
        }
    }
}

impl StoreConfig {
    /// Bounds `zoom` to `[min_zoom, max_zoom]`; `max_zoom` wins when the
    /// bounds are inverted.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }
}
