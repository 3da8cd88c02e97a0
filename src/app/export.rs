//! Export dispatch: PDF for the gallery, downloads for decks.
//!
//! Only one export runs at a time. The selected records are copied out of
//! the state before any I/O, so a reload during an export does not change
//! what is being exported.

use super::{AppState, GalleryApp};
use crate::download::DeckDownloader;
use crate::error::{Error, Result};
use crate::pdf::{PdfExporter, write_export};
use crate::types::{
    DeckRecord, DownloadOutcome, Event, ExportOutcome, ExportReport, GalleryRecord, ViewKind,
};

impl GalleryApp {
    /// Export the current view's selection
    pub async fn export(&self) -> Result<ExportOutcome> {
        match self.current_view().await {
            ViewKind::Gallery => self.export_gallery_pdf().await.map(ExportOutcome::Pdf),
            ViewKind::Decks => self
                .download_decks()
                .await
                .map(|outcomes| ExportOutcome::Downloads { outcomes }),
        }
    }

    /// Render the selected gallery records, one page each, and write the PDF
    pub async fn export_gallery_pdf(&self) -> Result<ExportReport> {
        let records: Vec<GalleryRecord> = self
            .begin(ViewKind::Gallery, |state| {
                state.gallery_selection.pick(&state.gallery).into_iter().cloned().collect()
            })
            .await?;

        let result = self.render_pdf(&records).await;
        self.finish().await;

        match &result {
            Ok(report) => self.emit(Event::ExportComplete {
                path: report.path.clone(),
                pages: report.pages,
            }),
            Err(e) => tracing::error!(error = %e, "PDF export failed"),
        }
        result
    }

    async fn render_pdf(&self, records: &[GalleryRecord]) -> Result<ExportReport> {
        let export = &self.config.export;
        let refs: Vec<&GalleryRecord> = records.iter().collect();

        let rendered = PdfExporter::new(&export.layout, self.fetcher.as_ref())
            .with_events(self.event_tx.clone())
            .render(&refs)
            .await?;
        let path = write_export(export, &rendered).await?;

        Ok(ExportReport {
            path,
            pages: rendered.pages.len(),
            skipped_images: rendered.skipped_images,
        })
    }

    /// Download the selected decks, staggered, in position order
    pub async fn download_decks(&self) -> Result<Vec<DownloadOutcome>> {
        let decks: Vec<DeckRecord> = self
            .begin(ViewKind::Decks, |state| {
                state.deck_selection.pick(&state.decks).into_iter().cloned().collect()
            })
            .await?;
        let refs: Vec<&DeckRecord> = decks.iter().collect();

        let outcomes = DeckDownloader::new(
            self.fetcher.as_ref(),
            self.target.as_ref(),
            self.config.download.stagger,
        )
        .with_events(self.event_tx.clone())
        .run(&refs)
        .await;

        self.finish().await;
        Ok(outcomes)
    }

    /// Claim the export slot for `view` and copy out the records to export
    async fn begin<T>(
        &self,
        view: ViewKind,
        pick: impl FnOnce(&AppState) -> Vec<T>,
    ) -> Result<Vec<T>> {
        let mut state = self.state.write().await;
        if state.running.is_some() {
            return Err(Error::Busy);
        }
        if state.selection(view).is_none_selected() {
            return Err(Error::EmptySelection { view });
        }

        let records = pick(&*state);
        state.running = Some(view);
        drop(state);

        tracing::info!(%view, total = records.len(), "export started");
        self.emit(Event::ExportStarted {
            view,
            total: records.len(),
        });
        Ok(records)
    }

    async fn finish(&self) {
        self.state.write().await.running = None;
    }
}
