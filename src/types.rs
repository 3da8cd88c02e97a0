//! Core types for storefront-gallery

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A gallery item ready for display and export
///
/// Built once per load from a metaobject's field list and never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryRecord {
    /// Opaque identifier assigned by the storefront
    pub id: String,
    /// Absolute URL of the image
    pub image_url: String,
    /// Free-text description shown under the image
    pub description: Option<String>,
    /// Sort key (0 when absent)
    pub display_order: i64,
}

/// A presentation deck: a titled PDF with a thumbnail
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRecord {
    /// Opaque identifier assigned by the storefront
    pub id: String,
    /// Deck title, also used as the download file name
    pub title: String,
    /// URL of the linked PDF
    pub pdf_url: String,
    /// URL of the preview image
    pub thumbnail_url: String,
}

/// The two record lists a user can browse
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// Gallery items
    #[default]
    Gallery,
    /// Presentation decks
    Decks,
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewKind::Gallery => write!(f, "gallery"),
            ViewKind::Decks => write!(f, "decks"),
        }
    }
}

impl std::str::FromStr for ViewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gallery" => Ok(ViewKind::Gallery),
            "decks" => Ok(ViewKind::Decks),
            other => Err(format!("unknown view '{other}' (expected gallery or decks)")),
        }
    }
}

/// Availability of an optional resource after a load
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResourceStatus {
    /// Not loaded yet
    #[default]
    NotLoaded,
    /// Loaded with the given number of records (may be zero)
    Loaded {
        /// Number of records kept after normalization
        count: usize,
    },
    /// Fetch failed or the resource is disabled; treated as zero records
    Unavailable {
        /// Why the resource is unavailable
        reason: String,
    },
}

/// Lifecycle of the primary load
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    /// Nothing fetched yet
    #[default]
    Idle,
    /// A load is in flight
    Loading,
    /// Records are available for rendering
    Ready,
    /// The primary load failed; the views show an error instead of records
    Failed {
        /// Message shown to the user
        message: String,
    },
}

/// Counts reported by a successful load
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    /// Gallery records kept
    pub gallery: usize,
    /// Deck availability
    pub decks: ResourceStatus,
}

/// Result of a PDF export
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportReport {
    /// Where the document was written
    pub path: PathBuf,
    /// Number of pages (one per exported record)
    pub pages: usize,
    /// Ids of records whose image could not be placed
    pub skipped_images: Vec<String>,
}

/// What happened to one deck in a download run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DownloadOutcome {
    /// File fetched and written
    Saved {
        /// Deck title
        title: String,
        /// Written file
        path: PathBuf,
    },
    /// Fetch failed; the remote URL was handed to the download target instead
    HandedOff {
        /// Deck title
        title: String,
        /// Remote URL
        url: String,
        /// Where the hand-off was recorded
        path: PathBuf,
    },
    /// Both the fetch and the hand-off failed
    Failed {
        /// Deck title
        title: String,
        /// Error message
        error: String,
    },
}

/// Result of a view-dependent export action
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExportOutcome {
    /// Gallery selection rendered to a PDF
    Pdf(ExportReport),
    /// Deck selection downloaded
    Downloads {
        /// Per-deck outcomes, in download order
        outcomes: Vec<DownloadOutcome>,
    },
}

/// Event emitted by the controller
///
/// Subscribe with [`GalleryApp::subscribe`](crate::GalleryApp::subscribe).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A load started
    LoadStarted,
    /// Gallery records are available
    GalleryLoaded {
        /// Number of records kept
        count: usize,
    },
    /// Deck records are available
    DecksLoaded {
        /// Number of records kept
        count: usize,
    },
    /// Decks could not be loaded; the view shows the empty state
    DecksUnavailable {
        /// Why
        reason: String,
    },
    /// The primary load failed
    LoadFailed {
        /// Error message
        error: String,
    },
    /// A selection changed
    SelectionChanged {
        /// Which view
        view: ViewKind,
        /// Number of selected positions
        selected: usize,
    },
    /// An export or download run started
    ExportStarted {
        /// Which view is being exported
        view: ViewKind,
        /// Number of records in the run
        total: usize,
    },
    /// One PDF page was laid out
    PageRendered {
        /// Zero-based page number
        page: usize,
        /// Record placed on the page
        id: String,
    },
    /// An image could not be loaded; its page is left without one
    ImageSkipped {
        /// Record whose image was skipped
        id: String,
        /// Error message
        error: String,
    },
    /// The PDF was written
    ExportComplete {
        /// Output path
        path: PathBuf,
        /// Page count
        pages: usize,
    },
    /// A deck file was written
    DeckSaved {
        /// Deck title
        title: String,
        /// Written file
        path: PathBuf,
    },
    /// A deck was handed off by URL after its fetch failed
    DeckHandedOff {
        /// Deck title
        title: String,
        /// Remote URL
        url: String,
    },
    /// A deck could not be saved or handed off
    DeckFailed {
        /// Deck title
        title: String,
        /// Error message
        error: String,
    },
    /// All selected decks were processed
    DownloadsComplete {
        /// Number of decks processed
        total: usize,
    },
}
