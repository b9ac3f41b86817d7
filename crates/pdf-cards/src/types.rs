use thiserror::Error;

/// 1-based page number inside the loaded PDF
pub type PageNumber = u32;

/// Failure reported by a PDF backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("page {page_number} is out of range (document has {page_count} pages)")]
    PageOutOfRange {
        page_number: PageNumber,
        page_count: usize,
    },
    #[error("invalid viewport: {0}")]
    InvalidViewport(String),
    #[error("PDF backend error: {0}")]
    Backend(String),
    #[error("Task join error: {0}")]
    TaskJoin(String),
}

impl From<tokio::task::JoinError> for SourceError {
    fn from(err: tokio::task::JoinError) -> Self {
        SourceError::TaskJoin(err.to_string())
    }
}

/// The document could not be opened by any load strategy
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("no document load strategies configured")]
    NoStrategies,
    #[error("failed to load PDF after {attempts} attempt(s): {last}")]
    Exhausted { attempts: usize, last: SourceError },
}

/// A single page failed to rasterize
#[derive(Error, Debug, Clone, PartialEq)]
#[error("failed to render page {page_number}: {source}")]
pub struct RenderError {
    pub page_number: PageNumber,
    #[source]
    pub source: SourceError,
}

impl RenderError {
    pub fn new(page_number: PageNumber, source: SourceError) -> Self {
        Self {
            page_number,
            source,
        }
    }
}

/// Reading or writing persisted viewed-state failed
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Misuse of the card viewer API
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CardError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("category {category} has no card {ordinal}")]
    NoSuchCard { category: String, ordinal: usize },
}

pub type Result<T, E = CardError> = std::result::Result<T, E>;

/// Page dimensions at a given scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl Viewport {
    /// Pixel size of a surface holding this viewport (fractional pixels are dropped)
    pub fn pixel_size(&self) -> (usize, usize) {
        (self.width.max(0.0) as usize, self.height.max(0.0) as usize)
    }
}

/// Rasterized page, RGBA8, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub width: usize,
    pub height: usize,
    pub rgba_data: Vec<u8>,
}

impl Surface {
    /// Transparent surface sized for `viewport`
    pub fn blank(viewport: &Viewport) -> Self {
        let (width, height) = viewport.pixel_size();
        Self {
            width,
            height,
            rgba_data: vec![0; width * height * 4],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
