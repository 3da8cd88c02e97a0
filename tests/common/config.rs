//! Test configuration helpers for pointing the controller at a mock storefront

use super::GRAPHQL_PATH;
use std::time::Duration;
use storefront_gallery::{Config, Event, GalleryApp};
use tempfile::TempDir;
use tokio::sync::broadcast;
use wiremock::MockServer;

/// Configuration talking to `server`, writing everything under `temp_dir`
pub fn test_config(server: &MockServer, temp_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.storefront.shop_domain = "test-shop.example.com".to_string();
    config.storefront.access_token = "test-storefront-token".to_string();
    config.storefront.endpoint = Some(format!("{}{GRAPHQL_PATH}", server.uri()));
    config.storefront.timeout = Some(Duration::from_secs(10));
    config.export.output_dir = temp_dir.path().join("exports");
    config.download.download_dir = temp_dir.path().join("decks");
    config.download.stagger = Duration::from_millis(20);
    config
}

/// Controller for `server` with a fresh temp directory
///
/// Returns the app and temp directory (keep temp_dir alive for test duration)
pub fn create_test_app(server: &MockServer) -> (GalleryApp, TempDir) {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let app = GalleryApp::new(test_config(server, &temp_dir)).expect("valid test config");
    (app, temp_dir)
}

/// Drain every event currently buffered on `rx`
pub fn drain_events(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}
