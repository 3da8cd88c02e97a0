//! Authenticated GraphQL transport for the storefront endpoint.

use crate::config::StorefrontConfig;
use crate::error::{Error, GraphQlError, Result};
use crate::query::GraphQlRequest;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Header carrying the storefront access token
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Response envelope: `data` and/or `errors`
#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

/// Client for one storefront endpoint
///
/// Issues exactly one POST per call. No retries; timeouts only when configured.
#[derive(Clone, Debug)]
pub struct StorefrontClient {
    http: reqwest::Client,
    endpoint: String,
}

impl StorefrontClient {
    /// Build a client from the storefront settings
    pub fn new(config: &StorefrontConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let token = HeaderValue::from_str(&config.access_token).map_err(|e| {
            Error::config(
                "storefront.access_token",
                format!("token is not a valid header value: {e}"),
            )
        })?;
        headers.insert(HeaderName::from_static("x-shopify-storefront-access-token"), token);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint_url(),
        })
    }

    /// Endpoint every request goes to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute one request and decode its `data` object
    ///
    /// Returns `Ok(None)` when the body carries neither data nor errors.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] for a non-success status
    /// - [`Error::Protocol`] for a non-empty `errors` array
    /// - [`Error::Network`] / [`Error::Serialization`] when the call or decode fails
    pub async fn execute<T: DeserializeOwned>(&self, request: &GraphQlRequest) -> Result<Option<T>> {
        let response = self.http.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint = %self.endpoint, status = status.as_u16(), "storefront request failed");
            return Err(Error::Transport {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let body = response.text().await?;
        let decoded: GraphQlResponse<T> = serde_json::from_str(&body)?;

        if let Some(errors) = decoded.errors
            && !errors.is_empty()
        {
            tracing::warn!(endpoint = %self.endpoint, count = errors.len(), "storefront returned GraphQL errors");
            return Err(Error::Protocol { errors });
        }

        Ok(decoded.data)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::query;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Shop {
        name: String,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct ShopData {
        shop: Shop,
    }

    fn client_for(server: &MockServer) -> StorefrontClient {
        let config = StorefrontConfig {
            shop_domain: "shop.example.com".to_string(),
            access_token: "secret-token".to_string(),
            endpoint: Some(format!("{}/api/unstable/graphql.json", server.uri())),
            ..Default::default()
        };
        StorefrontClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn execute_sends_token_and_decodes_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/unstable/graphql.json"))
            .and(header(ACCESS_TOKEN_HEADER, "secret-token"))
            .and(body_partial_json(json!({ "variables": { "type": "gallery_item" } })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "shop": { "name": "Drops" } } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let data: Option<ShopData> = client
            .execute(&query::metaobjects("gallery_item", 50))
            .await
            .unwrap();

        assert_eq!(
            data,
            Some(ShopData {
                shop: Shop {
                    name: "Drops".to_string()
                }
            })
        );
    }

    #[tokio::test]
    async fn non_success_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result: Result<Option<ShopData>> =
            client.execute(&query::metaobjects("gallery_item", 50)).await;

        match result {
            Err(Error::Transport { status, .. }) => assert_eq!(status, 401),
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_array_is_protocol_error_even_with_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{ "message": "Metaobject definition not found" }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result: Result<Option<ShopData>> =
            client.execute(&query::metaobjects("presentation_deck", 50)).await;

        match result {
            Err(Error::Protocol { errors }) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].message, "Metaobject definition not found");
            }
            other => panic!("expected protocol error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_error_array_is_not_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "shop": { "name": "Drops" } },
                "errors": []
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let data: Option<ShopData> = client
            .execute(&query::metaobjects("gallery_item", 50))
            .await
            .unwrap();

        assert!(data.is_some());
    }

    #[tokio::test]
    async fn malformed_body_is_serialization_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result: Result<Option<ShopData>> =
            client.execute(&query::metaobjects("gallery_item", 50)).await;

        let err = result.unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let config = StorefrontConfig {
            shop_domain: "shop.example.com".to_string(),
            access_token: "bad\ntoken".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            StorefrontClient::new(&config),
            Err(Error::Config { .. })
        ));
    }
}
