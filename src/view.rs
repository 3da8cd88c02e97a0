//! View models for the gallery and deck grids.
//!
//! Rendering is a pure projection of records plus a selection into tiles;
//! hosts draw the tiles however they like and feed clicks back as
//! [`Interaction`]s.

use crate::selection::SelectionSet;
use crate::types::{DeckRecord, GalleryRecord, LoadState, ViewKind};
use serde::Serialize;

/// Shown instead of the grids when the primary load fails
pub const LOAD_FAILED_MESSAGE: &str =
    "Failed to load gallery items. Please refresh the page and try again.";

/// Empty gallery
pub const EMPTY_GALLERY_MESSAGE: &str = "No gallery items found.";

/// Empty or unavailable decks
pub const EMPTY_DECKS_MESSAGE: &str = "No presentation decks found. Add decks in Shopify Admin.";

/// One selectable entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Tile {
    /// Zero-based position in the list
    pub position: usize,
    /// Image to show (full image for gallery items, thumbnail for decks)
    pub image_url: String,
    /// Caption (description or title)
    pub label: String,
    /// Whether the toggle control is on
    pub selected: bool,
}

/// What a view shows
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewModel {
    /// Nothing to show yet
    Loading,
    /// The load failed
    Failed {
        /// Message for the user
        message: String,
    },
    /// Loaded with zero records
    Empty {
        /// Message for the user
        message: String,
    },
    /// Loaded records
    Grid {
        /// One tile per record, in list order
        tiles: Vec<Tile>,
    },
}

impl ViewModel {
    /// Tiles of a grid, empty otherwise
    pub fn tiles(&self) -> &[Tile] {
        match self {
            ViewModel::Grid { tiles } => tiles,
            _ => &[],
        }
    }
}

/// State of the export button
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportControl {
    /// Clickable
    pub enabled: bool,
    /// Caption
    pub label: &'static str,
}

/// User input on a grid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interaction {
    /// Click on an entry outside its toggle control
    EntryClicked(usize),
    /// The toggle control itself changed
    ToggleChanged(usize),
    /// The select-all control
    ToggleAll,
}

/// Export button caption while idle
pub const EXPORT_LABEL: &str = "Export PDF";
/// Caption while a PDF is generated
pub const GENERATING_LABEL: &str = "Generating PDF...";
/// Caption while decks download
pub const DOWNLOADING_LABEL: &str = "Downloading...";

/// Gallery grid
pub fn render_gallery(load: &LoadState, records: &[GalleryRecord], selection: &SelectionSet) -> ViewModel {
    render(load, EMPTY_GALLERY_MESSAGE, records, selection, |record| {
        (
            record.image_url.clone(),
            record.description.clone().unwrap_or_default(),
        )
    })
}

/// Deck grid
pub fn render_decks(load: &LoadState, records: &[DeckRecord], selection: &SelectionSet) -> ViewModel {
    render(load, EMPTY_DECKS_MESSAGE, records, selection, |record| {
        (record.thumbnail_url.clone(), record.title.clone())
    })
}

fn render<T>(
    load: &LoadState,
    empty_message: &str,
    records: &[T],
    selection: &SelectionSet,
    project: impl Fn(&T) -> (String, String),
) -> ViewModel {
    match load {
        LoadState::Idle | LoadState::Loading => ViewModel::Loading,
        LoadState::Failed { message } => ViewModel::Failed {
            message: message.clone(),
        },
        LoadState::Ready if records.is_empty() => ViewModel::Empty {
            message: empty_message.to_string(),
        },
        LoadState::Ready => ViewModel::Grid {
            tiles: records
                .iter()
                .enumerate()
                .map(|(position, record)| {
                    let (image_url, label) = project(record);
                    Tile {
                        position,
                        image_url,
                        label,
                        selected: selection.contains(position),
                    }
                })
                .collect(),
        },
    }
}

/// Export button for the current view's selection and any running export
pub fn export_control(selection: &SelectionSet, running: Option<ViewKind>) -> ExportControl {
    match running {
        Some(ViewKind::Gallery) => ExportControl {
            enabled: false,
            label: GENERATING_LABEL,
        },
        Some(ViewKind::Decks) => ExportControl {
            enabled: false,
            label: DOWNLOADING_LABEL,
        },
        None => ExportControl {
            enabled: !selection.is_none_selected(),
            label: EXPORT_LABEL,
        },
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn gallery(n: usize) -> Vec<GalleryRecord> {
        (0..n)
            .map(|i| GalleryRecord {
                id: format!("gid://gallery/{i}"),
                image_url: format!("https://cdn.example.com/{i}.jpg"),
                description: (i % 2 == 0).then(|| format!("item {i}")),
                display_order: 0,
            })
            .collect()
    }

    #[test]
    fn grid_has_one_tile_per_record_with_selection_flags() {
        let records = gallery(3);
        let mut selection = SelectionSet::new(3);
        selection.toggle(1).unwrap();

        let view = render_gallery(&LoadState::Ready, &records, &selection);
        let tiles = view.tiles();

        assert_eq!(tiles.len(), 3);
        assert_eq!(tiles[0].label, "item 0");
        assert_eq!(tiles[1].label, "", "missing description renders as empty label");
        assert!(!tiles[0].selected);
        assert!(tiles[1].selected);
        assert_eq!(tiles[2].image_url, "https://cdn.example.com/2.jpg");
    }

    #[test]
    fn deck_tiles_use_thumbnail_and_title() {
        let decks = vec![DeckRecord {
            id: "gid://deck/1".to_string(),
            title: "Lookbook".to_string(),
            pdf_url: "https://cdn.example.com/lookbook.pdf".to_string(),
            thumbnail_url: "https://cdn.example.com/lookbook.png".to_string(),
        }];

        let view = render_decks(&LoadState::Ready, &decks, &SelectionSet::new(1));

        assert_eq!(
            view.tiles()[0],
            Tile {
                position: 0,
                image_url: "https://cdn.example.com/lookbook.png".to_string(),
                label: "Lookbook".to_string(),
                selected: false,
            }
        );
    }

    #[test]
    fn empty_lists_show_their_messages() {
        let selection = SelectionSet::new(0);

        assert_eq!(
            render_gallery(&LoadState::Ready, &[], &selection),
            ViewModel::Empty {
                message: EMPTY_GALLERY_MESSAGE.to_string()
            }
        );
        assert_eq!(
            render_decks(&LoadState::Ready, &[], &selection),
            ViewModel::Empty {
                message: EMPTY_DECKS_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn failed_load_replaces_grid() {
        let records = gallery(2);
        let load = LoadState::Failed {
            message: LOAD_FAILED_MESSAGE.to_string(),
        };

        let view = render_gallery(&load, &records, &SelectionSet::new(2));

        assert!(matches!(view, ViewModel::Failed { .. }));
        assert!(view.tiles().is_empty());
    }

    #[test]
    fn export_control_follows_selection_and_running_export() {
        let mut selection = SelectionSet::new(2);
        assert!(!export_control(&selection, None).enabled);

        selection.toggle(0).unwrap();
        let control = export_control(&selection, None);
        assert!(control.enabled);
        assert_eq!(control.label, EXPORT_LABEL);

        let running = export_control(&selection, Some(ViewKind::Gallery));
        assert!(!running.enabled);
        assert_eq!(running.label, GENERATING_LABEL);

        let running = export_control(&selection, Some(ViewKind::Decks));
        assert_eq!(running.label, DOWNLOADING_LABEL);
    }
}
