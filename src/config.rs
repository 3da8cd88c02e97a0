//! Configuration types for storefront-gallery

use crate::error::{Error, Result};
use crate::pdf::PageLayout;
use serde::{Deserialize, Serialize};
use std::{path::Path, path::PathBuf, time::Duration};

/// Largest page the storefront API returns for a connection
pub const MAX_PAGE_SIZE: u32 = 250;

/// Storefront endpoint and credential
///
/// Treated as deploy-time configuration, never user input.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Shop domain, e.g. `shop.example.com`
    #[serde(default)]
    pub shop_domain: String,

    /// Storefront access token sent with every request
    #[serde(default)]
    pub access_token: String,

    /// API version path segment (default: "unstable")
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Full endpoint URL, overriding the one derived from `shop_domain`
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout (None = wait for the server)
    #[serde(default, with = "optional_duration_serde")]
    pub timeout: Option<Duration>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            shop_domain: String::new(),
            access_token: String::new(),
            api_version: default_api_version(),
            endpoint: None,
            timeout: None,
        }
    }
}

impl StorefrontConfig {
    /// GraphQL endpoint URL
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!(
                "https://{}/api/{}/graphql.json",
                self.shop_domain, self.api_version
            ),
        }
    }
}

/// Where gallery images come from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// The `image_url` field holds the absolute URL
    #[default]
    DirectUrl,
    /// The `image` field holds a file identifier resolved with a second lookup;
    /// records then also need a description and are ordered by `display_order`
    FileReference,
}

/// Gallery resource settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Metaobject type holding gallery items (default: "gallery_item")
    #[serde(default = "default_gallery_type")]
    pub metaobject_type: String,

    /// Result-count ceiling for one fetch (default: 50)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// How image URLs are obtained
    #[serde(default)]
    pub image_source: ImageSource,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            metaobject_type: default_gallery_type(),
            page_size: default_page_size(),
            image_source: ImageSource::default(),
        }
    }
}

/// Presentation deck resource settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeckConfig {
    /// Fetch decks at all (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metaobject type holding decks (default: "presentation_deck")
    #[serde(default = "default_deck_type")]
    pub metaobject_type: String,

    /// Result-count ceiling for one fetch (default: 50)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            metaobject_type: default_deck_type(),
            page_size: default_page_size(),
        }
    }
}

/// How the gallery and deck fetches combine into one load
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Gallery must succeed; a failed deck fetch counts as zero decks
    #[default]
    BestEffort,
    /// Both fetched concurrently; either failing fails the load
    AllOrNothing,
}

/// File collision handling
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCollisionAction {
    /// Append (1), (2), etc. to the file name
    #[default]
    Rename,
    /// Overwrite the existing file
    Overwrite,
    /// Refuse to write
    Skip,
}

/// PDF export settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory the document is written to (default: ".")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File name (default: "gallery-export.pdf")
    #[serde(default = "default_export_file_name")]
    pub file_name: String,

    /// Suffix the file name with a local timestamp
    #[serde(default)]
    pub timestamped: bool,

    /// What to do when the file exists
    #[serde(default)]
    pub file_collision: FileCollisionAction,

    /// Page geometry
    #[serde(default)]
    pub layout: PageLayout,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            file_name: default_export_file_name(),
            timestamped: false,
            file_collision: FileCollisionAction::default(),
            layout: PageLayout::default(),
        }
    }
}

/// Deck download settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Directory deck files are written to (default: "./decks")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Delay step between consecutive downloads, in milliseconds (default: 500)
    ///
    /// The n-th deck (zero-based) waits `n * stagger` before it starts.
    #[serde(default = "default_stagger", with = "millis_serde")]
    pub stagger: Duration,

    /// What to do when a file exists
    #[serde(default)]
    pub file_collision: FileCollisionAction,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            stagger: default_stagger(),
            file_collision: FileCollisionAction::default(),
        }
    }
}

/// Main configuration for [`GalleryApp`](crate::GalleryApp)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Endpoint and credential
    #[serde(default)]
    pub storefront: StorefrontConfig,

    /// Gallery resource
    #[serde(default)]
    pub gallery: GalleryConfig,

    /// Deck resource
    #[serde(default)]
    pub decks: DeckConfig,

    /// Combination of the two fetches
    #[serde(default)]
    pub load_policy: LoadPolicy,

    /// PDF export
    #[serde(default)]
    pub export: ExportConfig,

    /// Deck downloads
    #[serde(default)]
    pub download: DownloadConfig,
}

impl Config {
    /// Read a JSON configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Check the settings a load or export depends on
    pub fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.storefront.endpoint {
            url::Url::parse(endpoint).map_err(|e| {
                Error::config("storefront.endpoint", format!("invalid URL '{endpoint}': {e}"))
            })?;
        } else if self.storefront.shop_domain.trim().is_empty() {
            return Err(Error::config(
                "storefront.shop_domain",
                "shop domain is required",
            ));
        }

        if self.storefront.access_token.trim().is_empty() {
            return Err(Error::config(
                "storefront.access_token",
                "storefront access token is required",
            ));
        }

        check_page_size("gallery.page_size", self.gallery.page_size)?;
        check_page_size("decks.page_size", self.decks.page_size)?;

        if self.export.file_name.trim().is_empty() {
            return Err(Error::config("export.file_name", "file name is empty"));
        }

        self.export.layout.validate()
    }
}

fn check_page_size(key: &str, value: u32) -> Result<()> {
    if value == 0 || value > MAX_PAGE_SIZE {
        return Err(Error::config(
            key,
            format!("must be between 1 and {MAX_PAGE_SIZE}, got {value}"),
        ));
    }
    Ok(())
}

fn default_api_version() -> String {
    "unstable".to_string()
}

fn default_gallery_type() -> String {
    "gallery_item".to_string()
}

fn default_deck_type() -> String {
    "presentation_deck".to_string()
}

fn default_page_size() -> u32 {
    50
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_export_file_name() -> String {
    "gallery-export.pdf".to_string()
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("./decks")
}

fn default_stagger() -> Duration {
    Duration::from_millis(500)
}

// stagger is written as whole milliseconds
mod millis_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        u64::try_from(value.as_millis()).unwrap_or(u64::MAX).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

// request timeout is written as whole seconds, null for none
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        value.map(|d| d.as_secs()).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(d).map(|secs| secs.map(Duration::from_secs))
    }
}
