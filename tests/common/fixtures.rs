//! Storefront responses and binary content generators

use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the mock storefront answers GraphQL on
pub const GRAPHQL_PATH: &str = "/api/unstable/graphql.json";

/// One metaobject edge with the given field list
pub fn edge(id: &str, fields: &[(&str, &str)]) -> Value {
    let fields: Vec<_> = fields
        .iter()
        .map(|(key, value)| json!({ "key": key, "value": value }))
        .collect();
    json!({ "node": { "id": id, "fields": fields } })
}

/// A successful metaobjects response
pub fn metaobjects_response(edges: Vec<Value>) -> Value {
    json!({ "data": { "metaobjects": { "edges": edges } } })
}

/// A response carrying only GraphQL errors
pub fn errors_response(message: &str) -> Value {
    json!({ "errors": [{ "message": message, "extensions": { "code": "ACCESS_DENIED" } }] })
}

/// Gallery item whose image is served by `server` at `/cdn/{n}.png`
pub fn gallery_edge(server: &MockServer, n: usize, description: &str) -> Value {
    let image_url = format!("{}/cdn/{n}.png", server.uri());
    edge(
        &format!("gid://shopify/Metaobject/{n}"),
        &[("image_url", image_url.as_str()), ("description", description)],
    )
}

/// Deck whose PDF is served by `server` at `/cdn/{slug}.pdf`
pub fn deck_edge(server: &MockServer, n: usize, title: &str, slug: &str) -> Value {
    let pdf_url = format!("{}/cdn/{slug}.pdf", server.uri());
    let thumbnail_url = format!("{}/cdn/{slug}.png", server.uri());
    edge(
        &format!("gid://shopify/Metaobject/10{n}"),
        &[
            ("title", title),
            ("pdf_url", pdf_url.as_str()),
            ("thumbnail_url", thumbnail_url.as_str()),
        ],
    )
}

/// Answer metaobject queries for `metaobject_type` with `response`
pub async fn mount_metaobjects(server: &MockServer, metaobject_type: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "variables": { "type": metaobject_type } })))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Serve `bytes` for GET `route`
pub async fn mount_file(server: &MockServer, route: &str, bytes: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
        .mount(server)
        .await;
}

/// Encode a solid-colour PNG of the given size
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([30, 120, 200]));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode PNG");
    out.into_inner()
}

/// Smallest byte string a PDF viewer would sniff as a PDF
pub const FAKE_PDF: &[u8] = b"%PDF-1.4\n%%EOF\n";
