//! Gallery export to PDF.
//!
//! - [`layout`] - fixed page geometry and text wrapping
//! - [`metrics`] - Helvetica widths and text encoding
//! - [`document`] - lopdf page assembly
//!
//! One page per record, in the order the caller passes them. A record whose
//! image cannot be fetched or decoded still gets its page, without the image.

pub mod document;
pub mod layout;
pub mod metrics;

pub use document::{EmbeddedImage, PdfBuilder};
pub use layout::{ImageBox, PageLayout, PagePlan, TextLine, wrap_text};

use crate::config::ExportConfig;
use crate::error::Result;
use crate::fetcher::BlobFetcher;
use crate::types::{Event, GalleryRecord};
use crate::utils::{get_unique_path, timestamped_file_name};
use std::path::PathBuf;
use tokio::sync::broadcast;

/// A rendered document held in memory
#[derive(Clone, Debug)]
pub struct RenderedPdf {
    /// Serialized PDF
    pub bytes: Vec<u8>,
    /// Page plans, in page order
    pub pages: Vec<PagePlan>,
    /// Records whose image was left out
    pub skipped_images: Vec<String>,
}

/// Renders gallery records into a PDF
pub struct PdfExporter<'a> {
    layout: &'a PageLayout,
    fetcher: &'a dyn BlobFetcher,
    event_tx: Option<broadcast::Sender<Event>>,
}

impl<'a> PdfExporter<'a> {
    /// Exporter using `layout`, loading images through `fetcher`
    pub fn new(layout: &'a PageLayout, fetcher: &'a dyn BlobFetcher) -> Self {
        Self {
            layout,
            fetcher,
            event_tx: None,
        }
    }

    /// Publish per-page progress on `event_tx`
    pub fn with_events(mut self, event_tx: broadcast::Sender<Event>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    fn emit(&self, event: Event) {
        if let Some(tx) = &self.event_tx {
            tx.send(event).ok();
        }
    }

    async fn load_image(&self, record: &GalleryRecord) -> Result<EmbeddedImage> {
        let bytes = self.fetcher.fetch(&record.image_url).await?;
        EmbeddedImage::decode(&bytes)
    }

    /// Lay out one page per record, in slice order
    pub async fn render(&self, records: &[&GalleryRecord]) -> Result<RenderedPdf> {
        let mut builder = PdfBuilder::new(self.layout.clone());
        let mut pages = Vec::with_capacity(records.len());
        let mut skipped_images = Vec::new();

        for (page, record) in records.iter().enumerate() {
            let image = match self.load_image(record).await {
                Ok(image) => Some(image),
                Err(e) => {
                    tracing::warn!(id = %record.id, url = %record.image_url, error = %e, "skipping image");
                    self.emit(Event::ImageSkipped {
                        id: record.id.clone(),
                        error: e.to_string(),
                    });
                    skipped_images.push(record.id.clone());
                    None
                }
            };

            let plan = self.layout.plan_page(
                &record.id,
                image.as_ref().map(|i| (i.width, i.height)),
                record.description.as_deref(),
            );
            builder.add_page(&plan, image.as_ref())?;
            self.emit(Event::PageRendered {
                page,
                id: record.id.clone(),
            });
            pages.push(plan);
        }

        let bytes = builder.finish()?;
        tracing::info!(pages = pages.len(), skipped = skipped_images.len(), "rendered gallery PDF");

        Ok(RenderedPdf {
            bytes,
            pages,
            skipped_images,
        })
    }
}

/// Output path for an export, honouring the timestamp and collision settings
pub fn export_path(config: &ExportConfig) -> Result<PathBuf> {
    let file_name = if config.timestamped {
        timestamped_file_name(&config.file_name, &chrono::Local::now())
    } else {
        config.file_name.clone()
    };
    get_unique_path(&config.output_dir.join(file_name), config.file_collision)
}

/// Write a rendered document to its export path
pub async fn write_export(config: &ExportConfig, rendered: &RenderedPdf) -> Result<PathBuf> {
    tokio::fs::create_dir_all(&config.output_dir).await?;
    let path = export_path(config)?;
    tokio::fs::write(&path, &rendered.bytes).await?;
    tracing::info!(path = %path.display(), bytes = rendered.bytes.len(), "wrote gallery PDF");
    Ok(path)
}
