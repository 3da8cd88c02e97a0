//! End-to-end tests against a mock storefront
//!
//! These tests drive the public controller API over real HTTP:
//! - GraphQL load with the best-effort deck policy
//! - PDF export of a gallery selection, including an image that fails to load
//! - Staggered deck downloads with the URL hand-off fallback

mod common;

use common::{
    FAKE_PDF, create_test_app, deck_edge, drain_events, errors_response, gallery_edge,
    metaobjects_response, mount_file, mount_metaobjects, png,
};
use storefront_gallery::view::{EMPTY_DECKS_MESSAGE, EMPTY_GALLERY_MESSAGE, LOAD_FAILED_MESSAGE};
use storefront_gallery::{
    DownloadOutcome, Error, Event, ExportOutcome, Interaction, ResourceStatus, ViewKind, ViewModel,
};
use wiremock::matchers::{header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn gallery_loads_with_token_and_decks_fall_back_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("X-Shopify-Storefront-Access-Token", "test-storefront-token"))
        .and(wiremock::matchers::body_partial_json(
            serde_json::json!({ "variables": { "type": "gallery_item", "first": 50 } }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(metaobjects_response(vec![
            gallery_edge(&server, 1, "Sour cherry drops"),
            gallery_edge(&server, 2, "Lemon fizz"),
            gallery_edge(&server, 3, "Peach rings"),
        ])))
        .expect(1)
        .mount(&server)
        .await;
    mount_metaobjects(
        &server,
        "presentation_deck",
        ResponseTemplate::new(200).set_body_json(errors_response("Access denied")),
    )
    .await;
    let (app, _temp_dir) = create_test_app(&server);

    let summary = app.load().await.unwrap();

    assert_eq!(summary.gallery, 3);
    assert!(matches!(summary.decks, ResourceStatus::Unavailable { .. }));

    let gallery = app.render_view(ViewKind::Gallery).await;
    let labels: Vec<_> = gallery.tiles().iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, ["Sour cherry drops", "Lemon fizz", "Peach rings"]);
    assert_eq!(
        app.render_view(ViewKind::Decks).await,
        ViewModel::Empty {
            message: EMPTY_DECKS_MESSAGE.to_string()
        }
    );
}

#[tokio::test]
async fn primary_failure_replaces_both_views() {
    let server = MockServer::start().await;
    mount_metaobjects(&server, "gallery_item", ResponseTemplate::new(401)).await;
    let (app, _temp_dir) = create_test_app(&server);

    let err = app.load().await.unwrap_err();

    assert!(err.is_fetch_failure());
    for view in [ViewKind::Gallery, ViewKind::Decks] {
        assert_eq!(
            app.render_view(view).await,
            ViewModel::Failed {
                message: LOAD_FAILED_MESSAGE.to_string()
            }
        );
    }
    assert!(!app.export_control().await.enabled);
}

#[tokio::test]
async fn empty_storefront_shows_empty_states() {
    let server = MockServer::start().await;
    mount_metaobjects(
        &server,
        "gallery_item",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": { "metaobjects": null } })),
    )
    .await;
    mount_metaobjects(
        &server,
        "presentation_deck",
        ResponseTemplate::new(200).set_body_json(metaobjects_response(vec![])),
    )
    .await;
    let (app, _temp_dir) = create_test_app(&server);

    let summary = app.load().await.unwrap();

    assert_eq!(summary.gallery, 0);
    assert_eq!(summary.decks, ResourceStatus::Loaded { count: 0 });
    assert_eq!(
        app.render().await,
        ViewModel::Empty {
            message: EMPTY_GALLERY_MESSAGE.to_string()
        }
    );
}

#[tokio::test]
async fn gallery_selection_exports_one_page_per_record() {
    let server = MockServer::start().await;
    mount_metaobjects(
        &server,
        "gallery_item",
        ResponseTemplate::new(200).set_body_json(metaobjects_response(vec![
            gallery_edge(&server, 1, "First"),
            gallery_edge(&server, 2, "Second, whose image is gone"),
            gallery_edge(&server, 3, "Third"),
            gallery_edge(&server, 4, "Not selected"),
        ])),
    )
    .await;
    mount_metaobjects(
        &server,
        "presentation_deck",
        ResponseTemplate::new(200).set_body_json(metaobjects_response(vec![])),
    )
    .await;
    mount_file(&server, "/cdn/1.png", png(64, 48)).await;
    mount_file(&server, "/cdn/3.png", png(48, 64)).await;
    mount_file(&server, "/cdn/4.png", png(8, 8)).await;
    let (app, temp_dir) = create_test_app(&server);
    let mut events = app.subscribe();
    app.load().await.unwrap();

    app.handle(Interaction::EntryClicked(2)).await.unwrap();
    app.handle(Interaction::ToggleChanged(0)).await.unwrap();
    app.handle(Interaction::EntryClicked(1)).await.unwrap();

    let report = match app.export().await.unwrap() {
        ExportOutcome::Pdf(report) => report,
        other => panic!("expected a PDF, got {other:?}"),
    };

    assert_eq!(report.pages, 3);
    assert_eq!(report.skipped_images, ["gid://shopify/Metaobject/2"]);
    assert!(report.path.starts_with(temp_dir.path().join("exports")));
    let document = lopdf::Document::load(&report.path).unwrap();
    assert_eq!(document.get_pages().len(), 3);

    let rendered: Vec<_> = drain_events(&mut events)
        .into_iter()
        .filter_map(|e| match e {
            Event::PageRendered { id, .. } => Some(id),
            _ => None,
        })
        .collect();
    assert_eq!(
        rendered,
        [
            "gid://shopify/Metaobject/1",
            "gid://shopify/Metaobject/2",
            "gid://shopify/Metaobject/3"
        ]
    );
}

#[tokio::test]
async fn deck_downloads_save_in_order_and_hand_off_missing_files() {
    let server = MockServer::start().await;
    mount_metaobjects(
        &server,
        "gallery_item",
        ResponseTemplate::new(200).set_body_json(metaobjects_response(vec![])),
    )
    .await;
    mount_metaobjects(
        &server,
        "presentation_deck",
        ResponseTemplate::new(200).set_body_json(metaobjects_response(vec![
            deck_edge(&server, 1, "Spring Lookbook", "spring"),
            deck_edge(&server, 2, "Wholesale: Terms/Prices", "wholesale"),
            deck_edge(&server, 3, "Retired", "retired"),
        ])),
    )
    .await;
    mount_file(&server, "/cdn/spring.pdf", FAKE_PDF.to_vec()).await;
    mount_file(&server, "/cdn/wholesale.pdf", FAKE_PDF.to_vec()).await;
    let (app, temp_dir) = create_test_app(&server);
    app.load().await.unwrap();

    app.switch_view(ViewKind::Decks).await;
    assert!(matches!(app.export().await, Err(Error::EmptySelection { view: ViewKind::Decks })));
    app.handle(Interaction::ToggleAll).await.unwrap();

    let outcomes = match app.export().await.unwrap() {
        ExportOutcome::Downloads { outcomes } => outcomes,
        other => panic!("expected downloads, got {other:?}"),
    };

    let decks_dir = temp_dir.path().join("decks");
    assert_eq!(
        outcomes[0],
        DownloadOutcome::Saved {
            title: "Spring Lookbook".to_string(),
            path: decks_dir.join("Spring Lookbook.pdf"),
        }
    );
    assert_eq!(
        outcomes[1],
        DownloadOutcome::Saved {
            title: "Wholesale: Terms/Prices".to_string(),
            path: decks_dir.join("Wholesale_ Terms_Prices.pdf"),
        }
    );
    match &outcomes[2] {
        DownloadOutcome::HandedOff { url, path, .. } => {
            assert!(url.ends_with("/cdn/retired.pdf"));
            assert_eq!(path, &decks_dir.join("Retired.pdf.url"));
        }
        other => panic!("expected hand-off, got {other:?}"),
    }
    assert_eq!(std::fs::read(decks_dir.join("Spring Lookbook.pdf")).unwrap(), FAKE_PDF);
}
