//! Mapping raw metaobject field lists into typed records.
//!
//! Each resource kind has a field table (remote key -> record slot) and an
//! inclusion rule. Nodes are first turned into shells by [`build_shells`],
//! which is shared by all kinds; the kind-specific finish step then applies
//! the inclusion rule and drops incomplete shells without raising an error.

use crate::config::ImageSource;
use crate::query::ResourceKind;
use crate::types::{DeckRecord, GalleryRecord};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// `data` object of a metaobjects query
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MetaobjectsData {
    /// Missing when the type has no definition in the shop
    #[serde(default)]
    pub metaobjects: Option<MetaobjectConnection>,
}

/// Edge list of a metaobject connection
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MetaobjectConnection {
    /// Edges in source order
    #[serde(default)]
    pub edges: Vec<MetaobjectEdge>,
}

/// One edge of a connection
#[derive(Clone, Debug, Deserialize)]
pub struct MetaobjectEdge {
    /// The wrapped node
    pub node: MetaobjectNode,
}

/// A metaobject: identifier plus free-form key/value fields
#[derive(Clone, Debug, Deserialize)]
pub struct MetaobjectNode {
    /// Opaque identifier
    pub id: String,
    /// Field list
    #[serde(default)]
    pub fields: Vec<RawField>,
}

/// One key/value pair of a field list
#[derive(Clone, Debug, Deserialize)]
pub struct RawField {
    /// Field key as configured in the shop admin
    pub key: String,
    /// Field value; `null` for unset fields
    pub value: Option<String>,
}

/// `data` object of the file URL lookup
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FileNodesData {
    /// One entry per requested identifier, `null` when unknown
    #[serde(default)]
    pub nodes: Vec<Option<FileNode>>,
}

/// A resolved file node
#[derive(Clone, Debug, Deserialize)]
pub struct FileNode {
    /// File identifier
    pub id: String,
    /// Present for image files
    #[serde(default)]
    pub image: Option<FileImage>,
    /// Present for generic files
    #[serde(default)]
    pub url: Option<String>,
}

/// Image payload of a media image node
#[derive(Clone, Debug, Deserialize)]
pub struct FileImage {
    /// Image URL
    pub url: String,
}

/// File identifier -> URL, built once per load
pub type FileUrlMap = HashMap<String, String>;

/// A record under construction
///
/// Implementors declare which keys they understand; [`build_shells`] drives
/// them over every node of a connection.
pub trait RecordShell: Sized {
    /// Resource kind this shell belongs to
    const KIND: ResourceKind;

    /// Empty shell for the node `id`
    fn new(id: String) -> Self;

    /// Store `value` under `key`; returns false for keys outside the field table
    fn assign(&mut self, key: &str, value: String) -> bool;
}

/// Build one shell per node, in source order
///
/// Unset and empty values are treated as absent. Unknown keys are ignored.
pub fn build_shells<S: RecordShell>(data: Option<MetaobjectsData>) -> Vec<S> {
    let Some(connection) = data.and_then(|d| d.metaobjects) else {
        tracing::debug!(kind = %S::KIND, "response has no metaobjects");
        return Vec::new();
    };

    connection
        .edges
        .into_iter()
        .map(|edge| {
            let mut shell = S::new(edge.node.id);
            for field in edge.node.fields {
                let Some(value) = field.value.filter(|v| !v.is_empty()) else {
                    continue;
                };
                if !shell.assign(&field.key, value) {
                    tracing::trace!(kind = %S::KIND, key = %field.key, "ignoring unknown field");
                }
            }
            shell
        })
        .collect()
}

fn lookup<F: Copy>(table: &[(&str, F)], key: &str) -> Option<F> {
    table.iter().find(|(k, _)| *k == key).map(|(_, f)| *f)
}

#[derive(Clone, Copy)]
enum GalleryField {
    ImageUrl,
    ImageRef,
    Description,
    DisplayOrder,
}

const GALLERY_FIELDS: &[(&str, GalleryField)] = &[
    ("image_url", GalleryField::ImageUrl),
    ("image", GalleryField::ImageRef),
    ("description", GalleryField::Description),
    ("display_order", GalleryField::DisplayOrder),
];

/// Gallery item under construction
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GalleryShell {
    /// Node identifier
    pub id: String,
    /// Direct image URL
    pub image_url: Option<String>,
    /// File identifier to resolve
    pub image_ref: Option<String>,
    /// Description text
    pub description: Option<String>,
    /// Sort key
    pub display_order: i64,
}

impl RecordShell for GalleryShell {
    const KIND: ResourceKind = ResourceKind::Gallery;

    fn new(id: String) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    fn assign(&mut self, key: &str, value: String) -> bool {
        match lookup(GALLERY_FIELDS, key) {
            Some(GalleryField::ImageUrl) => self.image_url = Some(value),
            Some(GalleryField::ImageRef) => self.image_ref = Some(value),
            Some(GalleryField::Description) => self.description = Some(value),
            Some(GalleryField::DisplayOrder) => {
                self.display_order = value.trim().parse().unwrap_or_else(|_| {
                    tracing::debug!(id = %self.id, value = %value, "display_order is not an integer, using 0");
                    0
                });
            }
            None => return false,
        }
        true
    }
}

#[derive(Clone, Copy)]
enum DeckField {
    Title,
    PdfUrl,
    ThumbnailUrl,
}

const DECK_FIELDS: &[(&str, DeckField)] = &[
    ("title", DeckField::Title),
    ("pdf_url", DeckField::PdfUrl),
    ("thumbnail_url", DeckField::ThumbnailUrl),
];

/// Deck under construction
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeckShell {
    /// Node identifier
    pub id: String,
    /// Deck title
    pub title: Option<String>,
    /// Linked PDF
    pub pdf_url: Option<String>,
    /// Preview image
    pub thumbnail_url: Option<String>,
}

impl RecordShell for DeckShell {
    const KIND: ResourceKind = ResourceKind::Deck;

    fn new(id: String) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    fn assign(&mut self, key: &str, value: String) -> bool {
        match lookup(DECK_FIELDS, key) {
            Some(DeckField::Title) => self.title = Some(value),
            Some(DeckField::PdfUrl) => self.pdf_url = Some(value),
            Some(DeckField::ThumbnailUrl) => self.thumbnail_url = Some(value),
            None => return false,
        }
        true
    }
}

impl DeckShell {
    /// Complete record, or None when any of title, PDF or thumbnail is missing
    pub fn finish(self) -> Option<DeckRecord> {
        match (self.title, self.pdf_url, self.thumbnail_url) {
            (Some(title), Some(pdf_url), Some(thumbnail_url)) => Some(DeckRecord {
                id: self.id,
                title,
                pdf_url,
                thumbnail_url,
            }),
            _ => {
                tracing::debug!(id = %self.id, "dropping incomplete deck");
                None
            }
        }
    }
}

/// Normalize a deck response into complete records
pub fn normalize_decks(data: Option<MetaobjectsData>) -> Vec<DeckRecord> {
    build_shells::<DeckShell>(data)
        .into_iter()
        .filter_map(DeckShell::finish)
        .collect()
}

/// File identifiers referenced by the shells, first occurrence order, no repeats
pub fn file_references(shells: &[GalleryShell]) -> Vec<String> {
    let mut seen = HashSet::new();
    shells
        .iter()
        .filter_map(|s| s.image_ref.as_ref())
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

/// Build the identifier -> URL map from a lookup response
///
/// Null entries and nodes without a URL are left out.
pub fn file_url_map(data: FileNodesData) -> FileUrlMap {
    data.nodes
        .into_iter()
        .flatten()
        .filter_map(|node| {
            let url = node.image.map(|i| i.url).or(node.url)?;
            Some((node.id, url))
        })
        .collect()
}

/// Turn gallery shells into records
///
/// With [`ImageSource::DirectUrl`] a record needs its `image_url`. With
/// [`ImageSource::FileReference`] the image may come from `files` instead, a
/// non-blank description is also required, and the result is ordered by
/// `display_order` (stable, so equal keys keep source order).
pub fn finish_gallery(
    shells: Vec<GalleryShell>,
    files: &FileUrlMap,
    source: ImageSource,
) -> Vec<GalleryRecord> {
    let mut records: Vec<GalleryRecord> = shells
        .into_iter()
        .filter_map(|shell| {
            let image_url = match source {
                ImageSource::DirectUrl => shell.image_url,
                ImageSource::FileReference => shell.image_url.or_else(|| {
                    shell
                        .image_ref
                        .as_ref()
                        .and_then(|file_id| files.get(file_id).cloned())
                }),
            };

            let Some(image_url) = image_url else {
                tracing::debug!(id = %shell.id, "dropping gallery item without image");
                return None;
            };

            if source == ImageSource::FileReference
                && shell.description.as_deref().is_none_or(|d| d.trim().is_empty())
            {
                tracing::debug!(id = %shell.id, "dropping gallery item without description");
                return None;
            }

            Some(GalleryRecord {
                id: shell.id,
                image_url,
                description: shell.description,
                display_order: shell.display_order,
            })
        })
        .collect();

    if source == ImageSource::FileReference {
        records.sort_by_key(|r| r.display_order);
    }

    records
}
