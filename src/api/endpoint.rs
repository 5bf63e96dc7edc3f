use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    Query,
    Mutation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Request derived from an endpoint's arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Unencoded path segments relative to the API base URL.
    pub segments: Vec<String>,
    /// Query string parameters, in order.
    pub params: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl ApiRequest {
    /// GET request for a fixed path such as `/dashboard/stats`.
    pub fn get(path: &str) -> Self {
        Self {
            method: HttpMethod::Get,
            segments: split_path(path),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn with_method(method: HttpMethod, path: &str, body: Value) -> Self {
        Self {
            method,
            segments: split_path(path),
            params: Vec::new(),
            body: Some(body),
        }
    }

    /// Appends one path segment taken verbatim; the transport percent-encodes
    /// it, so `/` or `?` inside an id stay part of the segment.
    pub fn segment(mut self, value: impl ToString) -> Self {
        self.segments.push(value.to_string());
        self
    }

    /// `/`-joined path, unencoded. For logs and assertions.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Appends a query parameter when `value` is present.
    pub fn param(mut self, name: &str, value: Option<impl ToString>) -> Self {
        if let Some(value) = value {
            self.params.push((name.to_string(), value.to_string()));
        }
        self
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Cache tag used to link mutations to the query entries they make stale.
///
/// A tag without an id matches every entry providing that tag kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Tag {
    pub fn kind(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            id: None,
        }
    }

    pub fn id(kind: &str, id: impl ToString) -> Self {
        Self {
            kind: kind.to_string(),
            id: Some(id.to_string()),
        }
    }

    /// Whether invalidating `self` marks an entry providing `provided` as stale.
    pub fn invalidates(&self, provided: &Tag) -> bool {
        if self.kind != provided.kind {
            return false;
        }
        match &self.id {
            None => true,
            Some(id) => provided.id.as_deref() == Some(id.as_str()),
        }
    }
}

/// A named, typed query or mutation against the backend.
///
/// Implementors are marker types; the associated types pin the argument
/// and response shapes at compile time.
pub trait Endpoint: Send + Sync + 'static {
    /// Unique name, used as the first half of the cache key.
    const NAME: &'static str;

    const KIND: EndpointKind;

    type Args: Serialize + Clone + Send + Sync + 'static;

    type Output: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    /// Build the HTTP request for the given arguments.
    fn request(args: &Self::Args) -> ApiRequest;

    /// Tags attached to a successful query result.
    fn provides_tags(_args: &Self::Args, _output: &Self::Output) -> Vec<Tag> {
        Vec::new()
    }

    /// Tags made stale by a successful mutation.
    fn invalidates_tags(_args: &Self::Args) -> Vec<Tag> {
        Vec::new()
    }
}
