//! GraphQL documents sent to the storefront endpoint.
//!
//! Every query is a fixed document; only the metaobject type, the
//! result-count ceiling and the file identifier list vary, and they travel
//! as variables rather than being spliced into the query text.

use serde::Serialize;
use serde_json::json;

/// Resource kinds fetched from the storefront
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Gallery items
    Gallery,
    /// Presentation decks
    Deck,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Gallery => write!(f, "gallery"),
            ResourceKind::Deck => write!(f, "deck"),
        }
    }
}

/// First page of metaobjects of one type, each node with its raw field list
pub const METAOBJECTS_QUERY: &str = "\
query Metaobjects($type: String!, $first: Int!) {
  metaobjects(type: $type, first: $first) {
    edges {
      node {
        id
        fields {
          key
          value
        }
      }
    }
  }
}";

/// Batch lookup of file URLs by identifier
///
/// Images resolve through `MediaImage.image.url`, other files through
/// `GenericFile.url`. Unknown identifiers come back as `null` entries.
pub const FILE_URLS_QUERY: &str = "\
query FileUrls($ids: [ID!]!) {
  nodes(ids: $ids) {
    id
    ... on MediaImage {
      image {
        url
      }
    }
    ... on GenericFile {
      url
    }
  }
}";

/// Request body: a query document plus its variables
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphQlRequest {
    /// Query document
    pub query: &'static str,
    /// Variables for the document
    pub variables: serde_json::Value,
}

/// Query for the first `first` metaobjects of `metaobject_type`
///
/// No pagination: anything past the ceiling is not returned.
pub fn metaobjects(metaobject_type: &str, first: u32) -> GraphQlRequest {
    GraphQlRequest {
        query: METAOBJECTS_QUERY,
        variables: json!({ "type": metaobject_type, "first": first }),
    }
}

/// Query resolving each file identifier to its URL
pub fn file_urls(ids: &[String]) -> GraphQlRequest {
    GraphQlRequest {
        query: FILE_URLS_QUERY,
        variables: json!({ "ids": ids }),
    }
}
