//! Thumbnail strip state.
//!
//! Tracks visibility, the highlighted entry (kept in sync with the current
//! page), and the rendered thumbnail images. Images are regenerated by the
//! session after every load, delete, and undo.

use pdf_engine::RgbaImage;

#[derive(Debug, Default)]
pub struct ThumbnailStrip {
    visible: bool,
    selected: usize,
    images: Vec<RgbaImage>,
}

impl ThumbnailStrip {
    pub fn new(visible: bool) -> Self {
        Self { visible, selected: 0, images: Vec::new() }
    }

    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn select(&mut self, index: usize) {
        self.selected = if self.images.is_empty() {
            0
        } else {
            index.min(self.images.len() - 1)
        };
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_selected(&self, index: usize) -> bool {
        index == self.selected
    }

    pub fn set_images(&mut self, images: Vec<RgbaImage>) {
        self.images = images;
        self.select(self.selected);
    }

    pub fn images(&self) -> &[RgbaImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn clear(&mut self) {
        self.images.clear();
        self.selected = 0;
    }
}
