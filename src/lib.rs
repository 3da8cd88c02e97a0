//! # storefront-gallery
//!
//! Fetches gallery items and presentation decks from a storefront GraphQL
//! endpoint, presents them as selectable grids, and exports a selection as a
//! PDF (gallery) or as downloaded files (decks).
//!
//! ## Design
//!
//! - **One controller** - [`GalleryApp`] owns the records, both selections and
//!   the export state; front ends render its [`ViewModel`]s
//! - **One pipeline per resource kind** - a field table plus an inclusion rule
//!   turns raw metaobject field lists into typed records
//! - **Optional decks** - by default a failed deck fetch shows an empty decks
//!   view instead of failing the load
//! - **Event-driven** - consumers subscribe to [`Event`]s for progress
//!
//! ## Quick Start
//!
//! ```no_run
//! use storefront_gallery::{Config, GalleryApp, ViewKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.storefront.shop_domain = "shop.example.com".to_string();
//!     config.storefront.access_token = "storefront-token".to_string();
//!
//!     let app = GalleryApp::new(config)?;
//!
//!     let mut events = app.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     app.load().await?;
//!     app.toggle_all(ViewKind::Gallery).await;
//!     let outcome = app.export().await?;
//!     println!("{:?}", outcome);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Application controller
pub mod app;
/// Command-line front end
pub mod cli;
/// Storefront GraphQL transport
pub mod client;
/// Configuration types
pub mod config;
/// Staggered deck downloads
pub mod download;
/// Error types
pub mod error;
/// Binary fetching for images and deck files
pub mod fetcher;
/// Raw field lists to typed records
pub mod normalize;
/// PDF export
pub mod pdf;
/// GraphQL query documents
pub mod query;
/// Position-keyed selection
pub mod selection;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;
/// View models
pub mod view;

// Re-export commonly used types
pub use app::{AppState, GalleryApp};
pub use client::StorefrontClient;
pub use config::{Config, FileCollisionAction, ImageSource, LoadPolicy};
pub use download::{DownloadTarget, FsDownloadTarget};
pub use error::{Error, GraphQlError, Result};
pub use fetcher::{BlobFetcher, HttpFetcher};
pub use pdf::PageLayout;
pub use selection::SelectionSet;
pub use types::{
    DeckRecord, DownloadOutcome, Event, ExportOutcome, ExportReport, GalleryRecord, LoadState,
    LoadSummary, ResourceStatus, ViewKind,
};
pub use view::{ExportControl, Interaction, Tile, ViewModel};
