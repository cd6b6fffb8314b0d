//! Viewer configuration.
//!
//! Defaults: 1.25x zoom steps, 10%-800% zoom bounds, and a bounded undo
//! history. Configuration can be loaded from a JSON file or created
//! programmatically.

use crate::error::{ViewerError, ViewerResult};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Multiplier applied per zoom-in step (zoom-out divides by it).
    pub zoom_step: f32,

    /// Lower zoom bound (10%).
    pub min_zoom: f32,

    /// Upper zoom bound (800%).
    pub max_zoom: f32,

    /// Maximum number of retained undo snapshots.
    pub undo_depth: usize,

    /// Thumbnail target width in pixels.
    pub thumbnail_width: u32,

    /// Thumbnail target height in pixels.
    pub thumbnail_height: u32,

    /// Whether the thumbnail strip starts visible.
    pub thumbnails_visible: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zoom_step: viewer_core::ZOOM_STEP,
            min_zoom: viewer_core::MIN_ZOOM,
            max_zoom: viewer_core::MAX_ZOOM,
            undo_depth: 16,
            thumbnail_width: 128,
            thumbnail_height: 160,
            thumbnails_visible: true,
        }
    }
}

impl ViewerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zoom_step(mut self, step: f32) -> Self {
        self.zoom_step = step;
        self
    }

    pub fn with_zoom_bounds(mut self, min: f32, max: f32) -> Self {
        self.min_zoom = min;
        self.max_zoom = max;
        self
    }

    pub fn with_undo_depth(mut self, depth: usize) -> Self {
        self.undo_depth = depth;
        self
    }

    pub fn with_thumbnail_size(mut self, width: u32, height: u32) -> Self {
        self.thumbnail_width = width;
        self.thumbnail_height = height;
        self
    }

    pub fn from_json_file(path: &Path) -> ViewerResult<Self> {
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| ViewerError::Config(e.to_string()))
    }

    pub fn write_json_file(&self, path: &Path) -> ViewerResult<()> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| ViewerError::Config(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }
}
