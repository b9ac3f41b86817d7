//! Page rendering: scale a page to the available width and rasterize it

use crate::document::{PdfDocument, PdfPage, check_page_number};
use crate::types::{PageNumber, RenderError, SourceError, Surface};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Widest a card is ever drawn, in logical pixels
    pub max_width: f32,
    /// Horizontal space kept free around the card
    pub margin: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_width: 800.0,
            margin: 40.0,
        }
    }
}

impl RenderOptions {
    pub fn target_width(&self, available_width: f32) -> f32 {
        self.max_width.min(available_width - self.margin)
    }

    /// Scale factor that fits a page of `native_width` (at scale 1) into
    /// `available_width`. There is no lower bound, narrow views get small cards.
    pub fn scale_for(&self, available_width: f32, native_width: f32) -> Result<f32, SourceError> {
        if native_width.is_nan() || native_width <= 0.0 {
            return Err(SourceError::InvalidViewport(format!(
                "page width {} is not positive",
                native_width
            )));
        }
        let target = self.target_width(available_width);
        if target.is_nan() || target <= 0.0 {
            return Err(SourceError::InvalidViewport(format!(
                "available width {} leaves no room for the page",
                available_width
            )));
        }
        Ok(target / native_width)
    }
}

/// Render `page_number` of `document` to fit `available_width`.
///
/// Every call draws from scratch.
pub async fn render_page<D: PdfDocument>(
    document: &D,
    page_number: PageNumber,
    available_width: f32,
    options: &RenderOptions,
) -> Result<Surface, RenderError> {
    let result = async {
        check_page_number(page_number, document.page_count())?;
        let page = document.get_page(page_number).await?;

        let native = page.viewport(1.0);
        let scale = options.scale_for(available_width, native.width)?;
        let viewport = page.viewport(scale);

        let mut surface = Surface::blank(&viewport);
        page.render(&mut surface, viewport).await?;
        Ok::<_, SourceError>(surface)
    }
    .await;

    result.map_err(|source| {
        log::error!("Error rendering PDF page {}: {}", page_number, source);
        RenderError::new(page_number, source)
    })
}
