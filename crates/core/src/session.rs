//! Viewer session: the single owner of the live document.
//!
//! The session tracks viewport size, zoom state, the current page, the
//! bounded undo stack, and the thumbnail strip. Every operation runs to
//! completion on the calling thread and returns layout instructions
//! (`LayoutUpdate`) for the host surface to apply; the session itself never
//! draws anything.
//!
//! The document handle is replaced wholesale on load and undo through a
//! single transition point (`replace_document`), which closes the previous
//! handle and lets `relayout_update` revalidate the current page index
//! against the new page count.

use crate::config::ViewerConfig;
use crate::error::{ViewerError, ViewerResult};
use crate::thumbnail::ThumbnailStrip;
use crate::undo::UndoStack;
use log::{debug, warn};
use pdf_engine::{DocumentHandle, OpenSource, PdfEngine, RenderRequest, RgbaImage, ThumbnailSize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use viewer_core::{PageLayout, ScrollResponse, ViewMode, ZoomMode};

/// Where one page lands on the scrollable surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    pub page_index: usize,
    pub y_offset: f32,
    pub width: f32,
    pub height: f32,
}

/// Layout instructions for the host surface: scrollable extent, page
/// placements at the current zoom, and an optional scroll fraction to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutUpdate {
    pub zoom: f32,
    pub content_width: f32,
    pub content_height: f32,
    pub pages: Vec<PagePlacement>,
    pub scroll_target: Option<f32>,
}

/// What a wheel event did, so the host can decide whether anything moved.
#[derive(Debug, Clone, PartialEq)]
pub enum WheelOutcome {
    /// Scroll position changed; carries the new scroll fraction.
    Scrolled(f32),
    /// Scroll was not consumed and the session flipped a page instead.
    PageFlipped(LayoutUpdate),
    /// Nothing to do (boundary page, zero delta).
    Ignored,
}

pub struct ViewerSession<E: PdfEngine> {
    engine: E,
    config: ViewerConfig,
    document: Option<DocumentHandle>,
    file_path: Option<PathBuf>,
    current_page: usize,
    zoom: f32,
    zoom_mode: ZoomMode,
    view_mode: ViewMode,
    viewport_width: f32,
    viewport_height: f32,
    scroll_px: f32,
    layout: PageLayout,
    undo: UndoStack,
    thumbnails: ThumbnailStrip,
}

impl<E: PdfEngine> ViewerSession<E> {
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, ViewerConfig::default())
    }

    pub fn with_config(engine: E, config: ViewerConfig) -> Self {
        let undo = UndoStack::new(config.undo_depth);
        let thumbnails = ThumbnailStrip::new(config.thumbnails_visible);

        Self {
            engine,
            document: None,
            file_path: None,
            current_page: 0,
            zoom: 1.0,
            zoom_mode: ZoomMode::FitWidth,
            view_mode: ViewMode::Continuous,
            viewport_width: 1280.0,
            viewport_height: 800.0,
            scroll_px: 0.0,
            layout: PageLayout::default(),
            undo,
            thumbnails,
            config,
        }
    }

    pub fn open_path(&mut self, path: &Path) -> ViewerResult<LayoutUpdate> {
        let handle = self.engine.open(OpenSource::from(path))?;
        self.file_path = Some(path.to_path_buf());
        debug!("opened {}", path.display());

        self.load(handle)
    }

    pub fn open_bytes(&mut self, bytes: Vec<u8>) -> ViewerResult<LayoutUpdate> {
        let handle = self.engine.open(OpenSource::Bytes(bytes))?;
        self.file_path = None;

        self.load(handle)
    }

    /// Installs a freshly opened document: prior layout state and undo
    /// history are discarded, the current page resets to 0, and fit-to-width
    /// mode re-engages.
    fn load(&mut self, handle: DocumentHandle) -> ViewerResult<LayoutUpdate> {
        self.replace_document(handle);
        self.undo.clear();
        self.current_page = 0;
        self.zoom_mode = ZoomMode::FitWidth;
        self.scroll_px = 0.0;
        self.refresh_thumbnails()?;

        self.relayout_update()
    }

    fn replace_document(&mut self, handle: DocumentHandle) {
        if let Some(old) = self.document.take() {
            // The old handle may already be gone; replacing it is not an
            // error path.
            let _ = self.engine.close(old);
        }
        self.document = Some(handle);
    }

    fn handle(&self) -> ViewerResult<DocumentHandle> {
        self.document.ok_or(ViewerError::NoDocument)
    }

    pub fn page_count(&self) -> ViewerResult<usize> {
        let handle = self.handle()?;
        Ok(self.engine.page_count(handle)? as usize)
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) -> ViewerResult<Option<LayoutUpdate>> {
        self.viewport_width = width;
        self.viewport_height = height;

        if self.document.is_some() {
            Ok(Some(self.relayout_update()?))
        } else {
            Ok(None)
        }
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) -> ViewerResult<Option<LayoutUpdate>> {
        self.view_mode = mode;

        if self.document.is_some() {
            Ok(Some(self.relayout_update()?))
        } else {
            Ok(None)
        }
    }

    pub fn next_page(&mut self) -> ViewerResult<LayoutUpdate> {
        let count = self.page_count()?;
        self.go_to_page(viewer_core::next_page(self.current_page, count))
    }

    pub fn previous_page(&mut self) -> ViewerResult<LayoutUpdate> {
        self.handle()?;
        self.go_to_page(viewer_core::previous_page(self.current_page))
    }

    pub fn go_to_page(&mut self, index: usize) -> ViewerResult<LayoutUpdate> {
        let count = self.page_count()?;

        if index >= count {
            // Out-of-range navigation is silently ignored.
            return Ok(self.build_update(None));
        }

        self.current_page = index;
        self.relayout_update()
    }

    pub fn zoom_in(&mut self) -> ViewerResult<LayoutUpdate> {
        self.step_zoom(self.config.zoom_step)
    }

    pub fn zoom_out(&mut self) -> ViewerResult<LayoutUpdate> {
        self.step_zoom(1.0 / self.config.zoom_step)
    }

    /// Explicit zoom leaves fit-to-width mode until the next document load.
    fn step_zoom(&mut self, factor: f32) -> ViewerResult<LayoutUpdate> {
        self.handle()?;
        self.zoom_mode = ZoomMode::Explicit;
        self.zoom =
            viewer_core::step_zoom(self.zoom, factor, self.config.min_zoom, self.config.max_zoom);

        self.relayout_update()
    }

    pub fn ctrl_wheel_zoom(&mut self, delta: f32) -> ViewerResult<LayoutUpdate> {
        if delta > 0.0 {
            self.zoom_in()
        } else if delta < 0.0 {
            self.zoom_out()
        } else {
            Ok(self.build_update(None))
        }
    }

    /// Deletes one page after snapshotting the full document onto the undo
    /// stack. Deleting the last remaining page is rejected and leaves the
    /// document and undo stack untouched.
    pub fn delete_page(&mut self, index: usize) -> ViewerResult<LayoutUpdate> {
        let handle = self.handle()?;
        let page_count = self.engine.page_count(handle)? as usize;

        if page_count <= 1 {
            return Err(ViewerError::LastPage);
        }
        if index >= page_count {
            return Err(ViewerError::PageOutOfRange { page: index, page_count });
        }

        let snapshot = self.engine.save_bytes(handle)?;
        self.undo.push(snapshot);
        self.engine.delete_page(handle, index as u32)?;
        debug!(
            "deleted page {index}; undo stack holds {} snapshot(s), {} bytes",
            self.undo.len(),
            self.undo.retained_bytes()
        );

        self.current_page = index.saturating_sub(1);
        self.refresh_thumbnails()?;

        self.relayout_update()
    }

    pub fn delete_current_page(&mut self) -> ViewerResult<LayoutUpdate> {
        self.delete_page(self.current_page)
    }

    /// Pops the most recent snapshot and reloads it as the live document.
    /// Returns `Ok(None)` when there is nothing to undo. The snapshot goes
    /// through a temporary file; cleanup failures are logged and swallowed.
    pub fn undo(&mut self) -> ViewerResult<Option<LayoutUpdate>> {
        let Some(snapshot) = self.undo.pop() else {
            return Ok(None);
        };

        let temp_path = undo_temp_path();
        fs::write(&temp_path, &snapshot)?;
        let reopened = self.engine.open(OpenSource::from(temp_path.as_path()));

        if let Err(error) = fs::remove_file(&temp_path) {
            warn!("leaving undo temp file {}: {error}", temp_path.display());
        }

        let handle = reopened?;
        self.replace_document(handle);

        let page_count = self.engine.page_count(handle)? as usize;
        self.current_page = viewer_core::clamp_page_index(self.current_page, page_count);
        self.refresh_thumbnails()?;
        debug!("undo restored a {page_count}-page document");

        Ok(Some(self.relayout_update()?))
    }

    /// Applies a wheel delta (positive scrolls toward later pages). When the
    /// scroll is not consumed (pointer off the content surface, content that
    /// fits the viewport, or an extreme already reached), the session falls
    /// back to flipping a page in the scroll direction.
    pub fn handle_wheel(&mut self, delta: f32, over_content: bool) -> ViewerResult<WheelOutcome> {
        self.handle()?;

        let (next, response) = viewer_core::apply_scroll(
            self.scroll_px,
            delta,
            self.viewport_height,
            self.layout.content_height,
            over_content,
        );

        if response == ScrollResponse::Consumed {
            self.scroll_px = next;
            if self.view_mode == ViewMode::Continuous {
                self.current_page = viewer_core::current_page_from_scroll(
                    self.scroll_px,
                    self.viewport_height,
                    &self.layout,
                );
                self.thumbnails.select(self.current_page);
            }
            return Ok(WheelOutcome::Scrolled(self.scroll_fraction()));
        }

        let before = self.current_page;
        let update = if delta > 0.0 {
            self.next_page()?
        } else if delta < 0.0 {
            self.previous_page()?
        } else {
            return Ok(WheelOutcome::Ignored);
        };

        if self.current_page == before {
            Ok(WheelOutcome::Ignored)
        } else {
            Ok(WheelOutcome::PageFlipped(update))
        }
    }

    pub fn save_as(&mut self, path: &Path) -> ViewerResult<()> {
        let handle = self.handle()?;
        self.engine.save(handle, path)?;
        debug!("saved document to {}", path.display());

        Ok(())
    }

    pub fn toggle_thumbnails(&mut self) -> bool {
        self.thumbnails.toggle()
    }

    pub fn render_current_page(&self) -> ViewerResult<RgbaImage> {
        let handle = self.handle()?;
        let image = self.engine.render_page(
            handle,
            RenderRequest { page_index: self.current_page as u32, scale: self.zoom },
        )?;

        Ok(image)
    }

    fn refresh_thumbnails(&mut self) -> ViewerResult<()> {
        let handle = self.handle()?;
        let page_count = self.engine.page_count(handle)?;
        let target = ThumbnailSize {
            width_px: self.config.thumbnail_width,
            height_px: self.config.thumbnail_height,
        };

        let mut images = Vec::with_capacity(page_count as usize);
        for index in 0..page_count {
            images.push(self.engine.render_thumbnail(handle, index, target)?);
        }
        self.thumbnails.set_images(images);

        Ok(())
    }

    /// Recomputes zoom (in fit-to-width mode), page placements, and the
    /// scroll target centering the current page.
    fn relayout_update(&mut self) -> ViewerResult<LayoutUpdate> {
        let handle = self.handle()?;
        let page_count = self.engine.page_count(handle)? as usize;

        self.current_page = viewer_core::clamp_page_index(self.current_page, page_count);
        self.thumbnails.select(self.current_page);

        if self.zoom_mode == ZoomMode::FitWidth {
            let size = self.engine.page_size(handle, self.current_page as u32)?;
            self.zoom = viewer_core::fit_width_zoom(self.viewport_width, size.width_pt);
        }

        let sizes_px = match self.view_mode {
            ViewMode::Continuous => {
                let mut sizes = Vec::with_capacity(page_count);
                for index in 0..page_count {
                    let size = self.engine.page_size(handle, index as u32)?;
                    sizes.push((size.width_pt * self.zoom, size.height_pt * self.zoom));
                }
                sizes
            }
            ViewMode::SinglePage => {
                let size = self.engine.page_size(handle, self.current_page as u32)?;
                vec![(size.width_pt * self.zoom, size.height_pt * self.zoom)]
            }
        };

        self.layout = viewer_core::layout_pages(&sizes_px, self.viewport_width);

        let scroll_target = match self.view_mode {
            ViewMode::Continuous => {
                let target = viewer_core::scroll_target_fraction(
                    self.current_page,
                    &self.layout,
                    self.viewport_height,
                );
                if let Some(fraction) = target {
                    self.scroll_px = fraction * self.layout.content_height;
                }
                target
            }
            ViewMode::SinglePage => {
                self.scroll_px = 0.0;
                None
            }
        };

        Ok(self.build_update(scroll_target))
    }

    fn build_update(&self, scroll_target: Option<f32>) -> LayoutUpdate {
        let pages = if self.layout.is_empty() {
            Vec::new()
        } else {
            match self.view_mode {
                ViewMode::Continuous => self
                    .layout
                    .offsets
                    .iter()
                    .enumerate()
                    .map(|(index, &y_offset)| PagePlacement {
                        page_index: index,
                        y_offset,
                        width: self.layout.widths[index],
                        height: self.layout.heights[index],
                    })
                    .collect(),
                ViewMode::SinglePage => vec![PagePlacement {
                    page_index: self.current_page,
                    y_offset: 0.0,
                    width: self.layout.widths[0],
                    height: self.layout.heights[0],
                }],
            }
        };

        LayoutUpdate {
            zoom: self.zoom,
            content_width: self.layout.content_width,
            content_height: self.layout.content_height,
            pages,
            scroll_target,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn zoom_mode(&self) -> ZoomMode {
        self.zoom_mode
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn scroll_fraction(&self) -> f32 {
        if self.layout.content_height > 0.0 {
            (self.scroll_px / self.layout.content_height).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn thumbnails(&self) -> &ThumbnailStrip {
        &self.thumbnails
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.depth()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }
}

fn undo_temp_path() -> PathBuf {
    let nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();

    std::env::temp_dir().join(format!("paperview-undo-{nanos}.pdf"))
}
