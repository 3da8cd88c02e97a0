//! Top-level controller owning records, selections and export state.
//!
//! The `GalleryApp` struct and its methods are organized by domain:
//! - [`load`] - fetch orchestration and normalization
//! - [`interact`] - view switching, selection and view models
//! - [`export`] - PDF export and deck downloads

mod export;
mod interact;
mod load;


use crate::client::StorefrontClient;
use crate::config::Config;
use crate::download::{DownloadTarget, FsDownloadTarget};
use crate::error::Result;
use crate::fetcher::{BlobFetcher, HttpFetcher};
use crate::selection::SelectionSet;
use crate::types::{DeckRecord, Event, GalleryRecord, LoadState, ResourceStatus, ViewKind};
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

/// Capacity of the event channel; slow subscribers lag rather than block
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Everything the views are rendered from
#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// View the export action and select-all apply to
    pub current_view: ViewKind,
    /// Gallery records of the last successful load
    pub gallery: Vec<GalleryRecord>,
    /// Deck records of the last successful load
    pub decks: Vec<DeckRecord>,
    /// Selected gallery positions
    pub gallery_selection: SelectionSet,
    /// Selected deck positions
    pub deck_selection: SelectionSet,
    /// Primary load lifecycle
    pub load: LoadState,
    /// Whether decks were available in the last load
    pub decks_status: ResourceStatus,
    /// View whose export is running, if any
    pub running: Option<ViewKind>,
}

impl AppState {
    pub(crate) fn selection(&self, view: ViewKind) -> &SelectionSet {
        match view {
            ViewKind::Gallery => &self.gallery_selection,
            ViewKind::Decks => &self.deck_selection,
        }
    }

    pub(crate) fn selection_mut(&mut self, view: ViewKind) -> &mut SelectionSet {
        match view {
            ViewKind::Gallery => &mut self.gallery_selection,
            ViewKind::Decks => &mut self.deck_selection,
        }
    }
}

/// Gallery controller (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct GalleryApp {
    /// Configuration
    pub(crate) config: Arc<Config>,
    /// GraphQL transport
    pub(crate) client: StorefrontClient,
    /// Image and deck file fetcher
    pub(crate) fetcher: Arc<dyn BlobFetcher>,
    /// Where deck downloads go
    pub(crate) target: Arc<dyn DownloadTarget>,
    /// Records, selections and lifecycle
    pub(crate) state: Arc<RwLock<AppState>>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: broadcast::Sender<Event>,
}

impl GalleryApp {
    /// Create a controller talking HTTP, saving decks into the configured directory
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let client = StorefrontClient::new(&config.storefront)?;
        let target = FsDownloadTarget::from_config(&config.download);
        Ok(Self::with_components(
            config,
            client,
            Arc::new(HttpFetcher::new()),
            Arc::new(target),
        ))
    }

    /// Create a controller from explicit parts
    pub fn with_components(
        config: Config,
        client: StorefrontClient,
        fetcher: Arc<dyn BlobFetcher>,
        target: Arc<dyn DownloadTarget>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config: Arc::new(config),
            client,
            fetcher,
            target,
            state: Arc::new(RwLock::new(AppState::default())),
            event_tx,
        }
    }

    /// Subscribe to controller events
    ///
    /// Events sent before the call are not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> AppState {
        self.state.read().await.clone()
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn emit(&self, event: Event) {
        // no subscribers is fine
        self.event_tx.send(event).ok();
    }
}
