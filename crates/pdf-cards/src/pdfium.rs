//! pdfium-backed implementation of the document traits
//!
//! Pdfium handles are not `Send`, so every operation binds the library and
//! opens the file inside `spawn_blocking`, the same way for loads and renders.

use crate::document::{DocumentLoader, PdfDocument, PdfPage, check_page_number};
use crate::types::{PageNumber, SourceError, Surface, Viewport};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};

/// Which pdfium shared library to bind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfiumBinding {
    /// Library shipped next to the app in `<dir>/`
    Vendored(PathBuf),
    System,
}

impl PdfiumBinding {
    fn bind(&self) -> Result<Pdfium, PdfiumError> {
        match self {
            PdfiumBinding::Vendored(dir) => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
                    .map(Pdfium::new)
            }
            PdfiumBinding::System => Pdfium::bind_to_system_library().map(Pdfium::new),
        }
    }
}

/// Default vendored library location, `vendor/pdfium/lib` under the working directory
pub fn vendored_library_dir() -> Option<PathBuf> {
    std::env::current_dir().ok().and_then(|mut p| {
        p.push("vendor/pdfium/lib");
        if p.exists() { Some(p) } else { None }
    })
}

fn backend_error(err: PdfiumError) -> SourceError {
    SourceError::Backend(err.to_string())
}

#[derive(Debug, Clone)]
pub struct PdfiumLoader {
    path: PathBuf,
    binding: PdfiumBinding,
}

impl PdfiumLoader {
    pub fn new(path: impl AsRef<Path>, binding: PdfiumBinding) -> Self {
        Self {
            path: path.as_ref().to_owned(),
            binding,
        }
    }

    /// Vendored library first (when present), then the system library
    pub fn strategies(path: impl AsRef<Path>) -> Vec<Self> {
        let mut loaders = Vec::new();
        if let Some(dir) = vendored_library_dir() {
            loaders.push(Self::new(&path, PdfiumBinding::Vendored(dir)));
        }
        loaders.push(Self::new(&path, PdfiumBinding::System));
        loaders
    }
}

impl DocumentLoader for PdfiumLoader {
    type Document = PdfiumDocument;

    fn describe(&self) -> String {
        match &self.binding {
            PdfiumBinding::Vendored(dir) => {
                format!("{} (pdfium from {})", self.path.display(), dir.display())
            }
            PdfiumBinding::System => format!("{} (system pdfium)", self.path.display()),
        }
    }

    async fn load(&self) -> Result<PdfiumDocument, SourceError> {
        let path = self.path.clone();
        let binding = self.binding.clone();

        let page_count = tokio::task::spawn_blocking(move || {
            let pdfium = binding.bind()?;
            let document = pdfium.load_pdf_from_file(&path, None)?;
            Ok::<_, PdfiumError>(document.pages().len() as usize)
        })
        .await?
        .map_err(backend_error)?;

        Ok(PdfiumDocument {
            path: self.path.clone(),
            binding: self.binding.clone(),
            page_count,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PdfiumDocument {
    path: PathBuf,
    binding: PdfiumBinding,
    page_count: usize,
}

impl PdfiumDocument {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PdfDocument for PdfiumDocument {
    type Page = PdfiumPage;

    fn page_count(&self) -> usize {
        self.page_count
    }

    async fn get_page(&self, page_number: PageNumber) -> Result<PdfiumPage, SourceError> {
        check_page_number(page_number, self.page_count)?;

        let path = self.path.clone();
        let binding = self.binding.clone();
        let index = page_number - 1;

        let (width, height) = tokio::task::spawn_blocking(move || {
            let pdfium = binding.bind()?;
            let document = pdfium.load_pdf_from_file(&path, None)?;
            let page = document.pages().get(index as u16)?;
            Ok::<_, PdfiumError>((page.width().value, page.height().value))
        })
        .await?
        .map_err(backend_error)?;

        Ok(PdfiumPage {
            path: self.path.clone(),
            binding: self.binding.clone(),
            index,
            width,
            height,
        })
    }
}

/// Page handle; sizes are in PDF points at scale 1
#[derive(Debug, Clone)]
pub struct PdfiumPage {
    path: PathBuf,
    binding: PdfiumBinding,
    index: u32,
    width: f32,
    height: f32,
}

impl PdfPage for PdfiumPage {
    fn viewport(&self, scale: f32) -> Viewport {
        Viewport {
            width: self.width * scale,
            height: self.height * scale,
            scale,
        }
    }

    async fn render(&self, target: &mut Surface, viewport: Viewport) -> Result<(), SourceError> {
        let path = self.path.clone();
        let binding = self.binding.clone();
        let index = self.index;
        let (width, height) = (target.width, target.height);

        let rgba_data = tokio::task::spawn_blocking(move || {
            let pdfium = binding.bind()?;
            let document = pdfium.load_pdf_from_file(&path, None)?;
            let page = document.pages().get(index as u16)?;

            let config = PdfRenderConfig::new()
                .set_target_width(width as Pixels)
                .set_target_height(height as Pixels);

            let bitmap = page.render_with_config(&config)?;
            Ok::<_, PdfiumError>((
                bitmap.as_rgba_bytes().to_vec(),
                bitmap.width() as usize,
                bitmap.height() as usize,
            ))
        })
        .await?
        .map_err(backend_error)?;

        let (rgba_data, rendered_width, rendered_height) = rgba_data;
        if (rendered_width, rendered_height) != (width, height) {
            log::debug!(
                "pdfium drew {}x{} for a {}x{} viewport (scale {})",
                rendered_width,
                rendered_height,
                width,
                height,
                viewport.scale
            );
        }

        target.width = rendered_width;
        target.height = rendered_height;
        target.rgba_data = rgba_data;
        Ok(())
    }
}
