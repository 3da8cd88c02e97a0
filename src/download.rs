//! Staggered deck downloads.
//!
//! Decks are processed strictly in the order given. The n-th deck (zero-based)
//! starts `n * stagger` after the run began, so a target that hands files to
//! a browser or download manager is never flooded with simultaneous saves.
//! A failed fetch falls back to handing the remote URL to the target; one
//! deck failing never stops the rest.

use crate::config::{DownloadConfig, FileCollisionAction};
use crate::error::Result;
use crate::fetcher::BlobFetcher;
use crate::types::{DeckRecord, DownloadOutcome, Event};
use crate::utils::{get_unique_path, sanitize_file_name};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::Instant;

/// Destination for downloaded deck files
#[async_trait]
pub trait DownloadTarget: Send + Sync {
    /// Store fetched bytes under `file_name`
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;

    /// Record `url` for a download that could not be fetched here
    async fn hand_off(&self, file_name: &str, url: &str) -> Result<PathBuf>;
}

/// Writes decks into a directory
///
/// Hand-offs become `<name>.url` Internet Shortcut files pointing at the
/// remote PDF, which desktop shells open in the browser.
#[derive(Clone, Debug)]
pub struct FsDownloadTarget {
    dir: PathBuf,
    collision: FileCollisionAction,
}

impl FsDownloadTarget {
    /// Target writing into `dir`
    pub fn new(dir: impl Into<PathBuf>, collision: FileCollisionAction) -> Self {
        Self {
            dir: dir.into(),
            collision,
        }
    }

    /// Target configured from the download settings
    pub fn from_config(config: &DownloadConfig) -> Self {
        Self::new(config.download_dir.clone(), config.file_collision)
    }

    async fn write(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = get_unique_path(&self.dir.join(file_name), self.collision)?;
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

#[async_trait]
impl DownloadTarget for FsDownloadTarget {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.write(file_name, bytes).await
    }

    async fn hand_off(&self, file_name: &str, url: &str) -> Result<PathBuf> {
        let shortcut = format!("[InternetShortcut]\r\nURL={url}\r\n");
        self.write(&format!("{file_name}.url"), shortcut.as_bytes())
            .await
    }
}

/// File name a deck is saved under
pub fn deck_file_name(deck: &DeckRecord) -> String {
    format!("{}.pdf", sanitize_file_name(&deck.title))
}

/// Runs one staggered download sequence
pub struct DeckDownloader<'a> {
    fetcher: &'a dyn BlobFetcher,
    target: &'a dyn DownloadTarget,
    stagger: Duration,
    event_tx: Option<broadcast::Sender<Event>>,
}

impl<'a> DeckDownloader<'a> {
    /// Downloader fetching through `fetcher` and saving into `target`
    pub fn new(fetcher: &'a dyn BlobFetcher, target: &'a dyn DownloadTarget, stagger: Duration) -> Self {
        Self {
            fetcher,
            target,
            stagger,
            event_tx: None,
        }
    }

    /// Publish per-deck progress on `event_tx`
    pub fn with_events(mut self, event_tx: broadcast::Sender<Event>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    fn emit(&self, event: Event) {
        if let Some(tx) = &self.event_tx {
            tx.send(event).ok();
        }
    }

    /// Download `decks` in order, returning one outcome per deck
    pub async fn run(&self, decks: &[&DeckRecord]) -> Vec<DownloadOutcome> {
        let started = Instant::now();
        let mut outcomes = Vec::with_capacity(decks.len());

        for (i, deck) in decks.iter().enumerate() {
            let due = started + self.stagger * i as u32;
            tokio::time::sleep_until(due).await;
            outcomes.push(self.download_one(deck).await);
        }

        self.emit(Event::DownloadsComplete { total: decks.len() });
        tracing::info!(total = decks.len(), "deck downloads finished");
        outcomes
    }

    async fn download_one(&self, deck: &DeckRecord) -> DownloadOutcome {
        let file_name = deck_file_name(deck);

        let fetch_error = match self.fetcher.fetch(&deck.pdf_url).await {
            Ok(bytes) => match self.target.save(&file_name, &bytes).await {
                Ok(path) => {
                    tracing::info!(title = %deck.title, path = %path.display(), "deck saved");
                    self.emit(Event::DeckSaved {
                        title: deck.title.clone(),
                        path: path.clone(),
                    });
                    return DownloadOutcome::Saved {
                        title: deck.title.clone(),
                        path,
                    };
                }
                Err(e) => return self.failed(deck, e.to_string()),
            },
            Err(e) => e,
        };

        tracing::warn!(title = %deck.title, url = %deck.pdf_url, error = %fetch_error, "deck fetch failed, handing off URL");
        match self.target.hand_off(&file_name, &deck.pdf_url).await {
            Ok(path) => {
                self.emit(Event::DeckHandedOff {
                    title: deck.title.clone(),
                    url: deck.pdf_url.clone(),
                });
                DownloadOutcome::HandedOff {
                    title: deck.title.clone(),
                    url: deck.pdf_url.clone(),
                    path,
                }
            }
            Err(e) => self.failed(deck, format!("{fetch_error}; hand-off failed: {e}")),
        }
    }

    fn failed(&self, deck: &DeckRecord, error: String) -> DownloadOutcome {
        tracing::error!(title = %deck.title, error = %error, "deck download failed");
        self.emit(Event::DeckFailed {
            title: deck.title.clone(),
            error: error.clone(),
        });
        DownloadOutcome::Failed {
            title: deck.title.clone(),
            error,
        }
    }
}
