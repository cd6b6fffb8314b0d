use pdf_engine::PdfEngineError;

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("engine error: {0}")]
    Engine(#[from] PdfEngineError),

    #[error("no document is loaded")]
    NoDocument,

    /// User-rejectable: surfaced as a warning, state left unchanged.
    #[error("cannot delete the only remaining page")]
    LastPage,

    #[error("page {page} out of range (page_count={page_count})")]
    PageOutOfRange { page: usize, page_count: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

pub type ViewerResult<T> = Result<T, ViewerError>;
