//! Fetch orchestration: gallery plus optional decks.

use super::GalleryApp;
use crate::config::{ImageSource, LoadPolicy};
use crate::error::Result;
use crate::normalize::{
    FileNodesData, FileUrlMap, GalleryShell, MetaobjectsData, build_shells, file_references,
    file_url_map, finish_gallery, normalize_decks,
};
use crate::query;
use crate::types::{DeckRecord, Event, GalleryRecord, LoadState, LoadSummary, ResourceStatus};
use crate::view::LOAD_FAILED_MESSAGE;

impl GalleryApp {
    /// Fetch both record lists and replace the current ones
    ///
    /// Selections are cleared on success. On failure the records are dropped,
    /// the views switch to the error state and the error is returned.
    pub async fn load(&self) -> Result<LoadSummary> {
        self.state.write().await.load = LoadState::Loading;
        self.emit(Event::LoadStarted);
        tracing::info!(policy = ?self.config.load_policy, endpoint = %self.client.endpoint(), "loading records");

        let fetched = match self.config.load_policy {
            LoadPolicy::BestEffort => self.fetch_best_effort().await,
            LoadPolicy::AllOrNothing => self.fetch_all_or_nothing().await,
        };

        let mut state = self.state.write().await;
        match fetched {
            Ok((gallery, decks, decks_status)) => {
                state.gallery_selection.reset(gallery.len());
                state.deck_selection.reset(decks.len());
                state.gallery = gallery;
                state.decks = decks;
                state.decks_status = decks_status.clone();
                state.load = LoadState::Ready;

                self.emit(Event::GalleryLoaded {
                    count: state.gallery.len(),
                });
                match &decks_status {
                    ResourceStatus::Loaded { count } => self.emit(Event::DecksLoaded { count: *count }),
                    ResourceStatus::Unavailable { reason } => self.emit(Event::DecksUnavailable {
                        reason: reason.clone(),
                    }),
                    ResourceStatus::NotLoaded => {}
                }
                tracing::info!(gallery = state.gallery.len(), decks = state.decks.len(), "records loaded");

                Ok(LoadSummary {
                    gallery: state.gallery.len(),
                    decks: decks_status,
                })
            }
            Err(e) => {
                tracing::error!(error = %e, "load failed");
                state.gallery.clear();
                state.decks.clear();
                state.gallery_selection.reset(0);
                state.deck_selection.reset(0);
                state.decks_status = ResourceStatus::NotLoaded;
                state.load = LoadState::Failed {
                    message: LOAD_FAILED_MESSAGE.to_string(),
                };
                self.emit(Event::LoadFailed {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn fetch_best_effort(&self) -> Result<(Vec<GalleryRecord>, Vec<DeckRecord>, ResourceStatus)> {
        let gallery = self.fetch_gallery().await?;

        if !self.config.decks.enabled {
            return Ok((gallery, Vec::new(), decks_disabled()));
        }

        match self.fetch_decks().await {
            Ok(decks) => {
                let status = ResourceStatus::Loaded { count: decks.len() };
                Ok((gallery, decks, status))
            }
            Err(e) => {
                tracing::warn!(error = %e, "deck fetch failed, continuing without decks");
                let status = ResourceStatus::Unavailable {
                    reason: e.to_string(),
                };
                Ok((gallery, Vec::new(), status))
            }
        }
    }

    async fn fetch_all_or_nothing(&self) -> Result<(Vec<GalleryRecord>, Vec<DeckRecord>, ResourceStatus)> {
        if !self.config.decks.enabled {
            let gallery = self.fetch_gallery().await?;
            return Ok((gallery, Vec::new(), decks_disabled()));
        }

        let (gallery, decks) = tokio::try_join!(self.fetch_gallery(), self.fetch_decks())?;
        let status = ResourceStatus::Loaded { count: decks.len() };
        Ok((gallery, decks, status))
    }

    /// Fetch and normalize gallery records, resolving file references when configured
    pub async fn fetch_gallery(&self) -> Result<Vec<GalleryRecord>> {
        let gallery = &self.config.gallery;
        let data: Option<MetaobjectsData> = self
            .client
            .execute(&query::metaobjects(&gallery.metaobject_type, gallery.page_size))
            .await?;
        let shells: Vec<GalleryShell> = build_shells(data);

        let files = match gallery.image_source {
            ImageSource::DirectUrl => FileUrlMap::new(),
            ImageSource::FileReference => self.resolve_files(&shells).await?,
        };

        let records = finish_gallery(shells, &files, gallery.image_source);
        tracing::debug!(count = records.len(), "gallery normalized");
        Ok(records)
    }

    async fn resolve_files(&self, shells: &[GalleryShell]) -> Result<FileUrlMap> {
        let ids = file_references(shells);
        if ids.is_empty() {
            return Ok(FileUrlMap::new());
        }

        let data: Option<FileNodesData> = self.client.execute(&query::file_urls(&ids)).await?;
        let files = file_url_map(data.unwrap_or_default());
        tracing::debug!(requested = ids.len(), resolved = files.len(), "file references resolved");
        Ok(files)
    }

    /// Fetch and normalize deck records
    pub async fn fetch_decks(&self) -> Result<Vec<DeckRecord>> {
        let decks = &self.config.decks;
        let data: Option<MetaobjectsData> = self
            .client
            .execute(&query::metaobjects(&decks.metaobject_type, decks.page_size))
            .await?;
        let records = normalize_decks(data);
        tracing::debug!(count = records.len(), "decks normalized");
        Ok(records)
    }
}

fn decks_disabled() -> ResourceStatus {
    ResourceStatus::Unavailable {
        reason: "decks are disabled".to_string(),
    }
}
