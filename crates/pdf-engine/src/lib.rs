use image::{ImageBuffer, Rgba};
use lopdf::Document;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub mod fixtures;

pub type RgbaImage = ImageBuffer<Rgba<u8>, Vec<u8>>;

/// Default page size when a page carries no usable MediaBox (US Letter).
const FALLBACK_PAGE_SIZE: PageSize = PageSize { width_pt: 612.0, height_pt: 792.0 };

/// Thumbnails are rendered at a reduced scale before downsampling.
const THUMBNAIL_RENDER_SCALE: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentHandle(u64);

impl DocumentHandle {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_pt: f32,
    pub height_pt: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRequest {
    pub page_index: u32,
    pub scale: f32,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self { page_index: 0, scale: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSize {
    pub width_px: u32,
    pub height_px: u32,
}

impl Default for ThumbnailSize {
    fn default() -> Self {
        Self { width_px: 128, height_px: 160 }
    }
}

#[derive(Debug, Clone)]
pub enum OpenSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl From<PathBuf> for OpenSource {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<&Path> for OpenSource {
    fn from(value: &Path) -> Self {
        Self::Path(value.to_path_buf())
    }
}

impl From<Vec<u8>> for OpenSource {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PdfEngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF parse error: {0}")]
    Parse(#[from] lopdf::Error),
    #[error("invalid handle {0}")]
    InvalidHandle(u64),
    #[error("page {page} out of range (page_count={page_count})")]
    PageOutOfRange { page: u32, page_count: u32 },
    #[error("encrypted PDFs are not supported")]
    EncryptedUnsupported,
    #[error("document has no pages")]
    EmptyDocument,
    #[error("cannot delete the only remaining page")]
    LastPage,
}

/// Document source collaborator: opening, measuring, rendering, and mutating
/// PDF documents. The viewer session drives this through handles and never
/// touches the parsed document directly.
pub trait PdfEngine {
    fn open(&mut self, source: OpenSource) -> Result<DocumentHandle, PdfEngineError>;
    fn page_count(&self, handle: DocumentHandle) -> Result<u32, PdfEngineError>;
    fn page_size(
        &self,
        handle: DocumentHandle,
        page_index: u32,
    ) -> Result<PageSize, PdfEngineError>;
    fn render_page(
        &self,
        handle: DocumentHandle,
        request: RenderRequest,
    ) -> Result<RgbaImage, PdfEngineError>;
    fn render_thumbnail(
        &self,
        handle: DocumentHandle,
        page_index: u32,
        target: ThumbnailSize,
    ) -> Result<RgbaImage, PdfEngineError>;
    /// Removes a single page from the live document. Refuses to produce an
    /// empty document.
    fn delete_page(
        &mut self,
        handle: DocumentHandle,
        page_index: u32,
    ) -> Result<(), PdfEngineError>;
    /// Serializes the current document state to bytes (undo snapshots).
    fn save_bytes(&mut self, handle: DocumentHandle) -> Result<Vec<u8>, PdfEngineError>;
    fn save(&mut self, handle: DocumentHandle, path: &Path) -> Result<(), PdfEngineError>;
    fn close(&mut self, handle: DocumentHandle) -> Result<(), PdfEngineError>;
}

struct DocumentRecord {
    doc: Document,
    page_sizes: Vec<PageSize>,
}

#[derive(Default)]
pub struct LopdfEngine {
    next_handle: u64,
    docs: HashMap<DocumentHandle, DocumentRecord>,
}

impl LopdfEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, handle: DocumentHandle) -> Result<&DocumentRecord, PdfEngineError> {
        self.docs.get(&handle).ok_or(PdfEngineError::InvalidHandle(handle.raw()))
    }

    fn record_mut(
        &mut self,
        handle: DocumentHandle,
    ) -> Result<&mut DocumentRecord, PdfEngineError> {
        self.docs.get_mut(&handle).ok_or(PdfEngineError::InvalidHandle(handle.raw()))
    }
}

fn media_box_size(doc: &Document, page_id: lopdf::ObjectId) -> Option<PageSize> {
    let dict = doc.get_dictionary(page_id).ok()?;
    let array = dict.get(b"MediaBox").ok()?.as_array().ok()?;

    if array.len() != 4 {
        return None;
    }

    let x0 = array[0].as_float().ok()?;
    let y0 = array[1].as_float().ok()?;
    let x1 = array[2].as_float().ok()?;
    let y1 = array[3].as_float().ok()?;

    Some(PageSize { width_pt: (x1 - x0).abs(), height_pt: (y1 - y0).abs() })
}

fn collect_page_sizes(doc: &Document) -> Result<Vec<PageSize>, PdfEngineError> {
    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(PdfEngineError::EmptyDocument);
    }

    Ok(pages
        .values()
        .map(|&page_id| media_box_size(doc, page_id).unwrap_or(FALLBACK_PAGE_SIZE))
        .collect())
}

impl PdfEngine for LopdfEngine {
    fn open(&mut self, source: OpenSource) -> Result<DocumentHandle, PdfEngineError> {
        let bytes = match source {
            OpenSource::Path(path) => fs::read(path)?,
            OpenSource::Bytes(bytes) => bytes,
        };

        // Encryption is detected before parsing; lopdf cannot decrypt.
        if bytes.windows("/Encrypt".len()).any(|window| window == b"/Encrypt") {
            return Err(PdfEngineError::EncryptedUnsupported);
        }

        let doc = Document::load_mem(&bytes)?;
        let page_sizes = collect_page_sizes(&doc)?;

        self.next_handle += 1;
        let handle = DocumentHandle(self.next_handle);
        self.docs.insert(handle, DocumentRecord { doc, page_sizes });

        Ok(handle)
    }

    fn page_count(&self, handle: DocumentHandle) -> Result<u32, PdfEngineError> {
        Ok(self.record(handle)?.page_sizes.len() as u32)
    }

    fn page_size(
        &self,
        handle: DocumentHandle,
        page_index: u32,
    ) -> Result<PageSize, PdfEngineError> {
        let record = self.record(handle)?;
        record.page_sizes.get(page_index as usize).copied().ok_or(
            PdfEngineError::PageOutOfRange {
                page: page_index,
                page_count: record.page_sizes.len() as u32,
            },
        )
    }

    fn render_page(
        &self,
        handle: DocumentHandle,
        request: RenderRequest,
    ) -> Result<RgbaImage, PdfEngineError> {
        let page_size = self.page_size(handle, request.page_index)?;
        let scale = if request.scale > 0.0 { request.scale } else { 1.0 };

        let width = (page_size.width_pt * scale).round().max(1.0) as u32;
        let height = (page_size.height_pt * scale).round().max(1.0) as u32;

        // Placeholder rasterizer: a white sheet with a hairline border. Real
        // content rasterization is delegated to an external rendering library.
        let mut image = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
        draw_border(&mut image, Rgba([220, 220, 220, 255]));

        Ok(image)
    }

    fn render_thumbnail(
        &self,
        handle: DocumentHandle,
        page_index: u32,
        target: ThumbnailSize,
    ) -> Result<RgbaImage, PdfEngineError> {
        let page = self.render_page(
            handle,
            RenderRequest { page_index, scale: THUMBNAIL_RENDER_SCALE },
        )?;

        Ok(image::imageops::thumbnail(&page, target.width_px.max(1), target.height_px.max(1)))
    }

    fn delete_page(
        &mut self,
        handle: DocumentHandle,
        page_index: u32,
    ) -> Result<(), PdfEngineError> {
        let record = self.record_mut(handle)?;
        let page_count = record.page_sizes.len() as u32;

        if page_index >= page_count {
            return Err(PdfEngineError::PageOutOfRange { page: page_index, page_count });
        }
        if page_count <= 1 {
            return Err(PdfEngineError::LastPage);
        }

        // lopdf numbers pages from 1.
        record.doc.delete_pages(&[page_index + 1]);
        record.page_sizes = collect_page_sizes(&record.doc)?;

        Ok(())
    }

    fn save_bytes(&mut self, handle: DocumentHandle) -> Result<Vec<u8>, PdfEngineError> {
        let record = self.record_mut(handle)?;

        let mut bytes = Vec::new();
        record.doc.save_to(&mut bytes)?;

        Ok(bytes)
    }

    fn save(&mut self, handle: DocumentHandle, path: &Path) -> Result<(), PdfEngineError> {
        let record = self.record_mut(handle)?;
        record.doc.save(path)?;

        Ok(())
    }

    fn close(&mut self, handle: DocumentHandle) -> Result<(), PdfEngineError> {
        self.docs.remove(&handle).map(|_| ()).ok_or(PdfEngineError::InvalidHandle(handle.raw()))
    }
}

fn draw_border(image: &mut RgbaImage, color: Rgba<u8>) {
    let (width, height) = image.dimensions();
    if width < 4 || height < 4 {
        return;
    }

    for x in 0..width {
        image.put_pixel(x, 0, color);
        image.put_pixel(x, height - 1, color);
    }
    for y in 0..height {
        image.put_pixel(0, y, color);
        image.put_pixel(width - 1, y, color);
    }
}

pub fn default_engine() -> LopdfEngine {
    LopdfEngine::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn open_fixture(engine: &mut LopdfEngine, sizes: &[(f32, f32)]) -> DocumentHandle {
        engine
            .open(OpenSource::Bytes(fixtures::sample_pdf(sizes)))
            .expect("fixture should open")
    }

    #[test]
    fn opens_pdf_and_reads_page_count() {
        let mut engine = LopdfEngine::new();
        let handle = open_fixture(&mut engine, &[(600.0, 800.0); 3]);

        assert_eq!(engine.page_count(handle).expect("count"), 3);
    }

    #[test]
    fn page_size_comes_from_media_box() {
        let mut engine = LopdfEngine::new();
        let handle = open_fixture(&mut engine, &[(600.0, 800.0), (300.0, 500.0)]);

        let size = engine.page_size(handle, 1).expect("size");
        assert_eq!(size.width_pt, 300.0);
        assert_eq!(size.height_pt, 500.0);
    }

    #[test]
    fn page_size_out_of_range_is_an_error() {
        let mut engine = LopdfEngine::new();
        let handle = open_fixture(&mut engine, &[(600.0, 800.0)]);

        let err = engine.page_size(handle, 5).expect_err("should be out of range");
        assert!(matches!(err, PdfEngineError::PageOutOfRange { page: 5, page_count: 1 }));
    }

    #[test]
    fn delete_page_removes_exactly_one_page() {
        let mut engine = LopdfEngine::new();
        let handle =
            open_fixture(&mut engine, &[(600.0, 800.0), (300.0, 500.0), (600.0, 800.0)]);

        engine.delete_page(handle, 1).expect("delete");

        assert_eq!(engine.page_count(handle).expect("count"), 2);
        // The surviving pages keep their sizes in order.
        assert_eq!(engine.page_size(handle, 0).expect("size").width_pt, 600.0);
        assert_eq!(engine.page_size(handle, 1).expect("size").width_pt, 600.0);
    }

    #[test]
    fn deleting_the_only_page_is_refused() {
        let mut engine = LopdfEngine::new();
        let handle = open_fixture(&mut engine, &[(600.0, 800.0)]);

        let err = engine.delete_page(handle, 0).expect_err("should refuse");
        assert!(matches!(err, PdfEngineError::LastPage));
        assert_eq!(engine.page_count(handle).expect("count"), 1);
    }

    #[test]
    fn snapshot_bytes_reopen_to_the_same_document() {
        let mut engine = LopdfEngine::new();
        let handle = open_fixture(&mut engine, &[(600.0, 800.0), (300.0, 500.0)]);

        let snapshot = engine.save_bytes(handle).expect("snapshot");
        engine.delete_page(handle, 0).expect("delete");
        assert_eq!(engine.page_count(handle).expect("count"), 1);

        let restored = engine.open(OpenSource::Bytes(snapshot)).expect("reopen");
        assert_eq!(engine.page_count(restored).expect("count"), 2);
        assert_eq!(engine.page_size(restored, 1).expect("size").width_pt, 300.0);
    }

    #[test]
    fn save_writes_a_loadable_file() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("out.pdf");

        let mut engine = LopdfEngine::new();
        let handle = open_fixture(&mut engine, &[(600.0, 800.0), (600.0, 800.0)]);
        engine.save(handle, &path).expect("save");

        let reopened = engine.open(OpenSource::from(path.as_path())).expect("open saved file");
        assert_eq!(engine.page_count(reopened).expect("count"), 2);
    }

    #[test]
    fn render_page_scales_with_zoom() {
        let mut engine = LopdfEngine::new();
        let handle = open_fixture(&mut engine, &[(600.0, 800.0)]);

        let image = engine
            .render_page(handle, RenderRequest { page_index: 0, scale: 1.25 })
            .expect("render");

        assert_eq!(image.width(), 750);
        assert_eq!(image.height(), 1000);
    }

    #[test]
    fn render_thumbnail_produces_non_empty_image() {
        let mut engine = LopdfEngine::new();
        let handle = open_fixture(&mut engine, &[(600.0, 800.0)]);

        let image = engine
            .render_thumbnail(handle, 0, ThumbnailSize { width_px: 80, height_px: 100 })
            .expect("thumbnail");

        assert!(image.width() > 0);
        assert!(image.height() > 0);
    }

    #[test]
    fn invalid_handle_returns_error() {
        let engine = LopdfEngine::new();
        let err = engine.page_count(DocumentHandle(999)).expect_err("unknown handle");

        assert!(matches!(err, PdfEngineError::InvalidHandle(999)));
    }

    #[test]
    fn encrypted_documents_are_rejected() {
        let mut engine = LopdfEngine::new();
        let err = engine
            .open(OpenSource::Bytes(fixtures::encrypted_pdf(&[(600.0, 800.0)])))
            .expect_err("encrypted should be rejected");

        assert!(matches!(err, PdfEngineError::EncryptedUnsupported));
    }

    #[test]
    fn garbage_bytes_fail_to_parse() {
        let mut engine = LopdfEngine::new();
        let err = engine
            .open(OpenSource::Bytes(b"this is not a pdf".to_vec()))
            .expect_err("garbage should fail");

        assert!(matches!(err, PdfEngineError::Parse(_)));
    }
}
