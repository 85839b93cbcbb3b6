//! Core data types for the gateway kernel contract.
//!
//! These types are shared across all gateway traits
//! ([`GatewayRouter`](super::router::GatewayRouter),
//! [`GatewayFilter`](super::filter::GatewayFilter),
//! [`BackendHandler`](super::backend::BackendHandler))
//! and carry no runtime dependencies beyond `serde`, `uuid` and `std`.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

/// Path variables captured from `{name}` segments of a matched pattern.
pub type PathParams = HashMap<String, String>;

/// Attribute key under which the matched route id is exposed.
pub const ROUTE_ID_ATTR: &str = "route.id";
/// Attribute key under which the matched route's target URL is exposed.
pub const ROUTE_TARGET_URL_ATTR: &str = "route.targetUrl";
/// Attribute key under which the captured path variables are exposed.
pub const ROUTE_PATH_PARAMS_ATTR: &str = "route.pathParams";

// ─────────────────────────────────────────────────────────────────────────────
// HTTP primitives
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP method, covering the standard verbs used in REST and proxy scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[non_exhaustive]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    /// Case-insensitive parse from a string slice.
    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            "HEAD" => Some(HttpMethod::Head),
            "OPTIONS" => Some(HttpMethod::Options),
            _ => None,
        }
    }

    /// Return the standard uppercase string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request context
// ─────────────────────────────────────────────────────────────────────────────

/// Per-request routing metadata and filter scratch space.
///
/// The dispatcher fills the typed route fields after a successful lookup;
/// filters exchange their own data through `attributes`.  A context is never
/// shared between requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    /// Id of the matched route; `None` until routing has happened.
    pub route_id: Option<String>,
    /// Target URL of the matched route.
    pub target_url: Option<String>,
    /// Variables captured by the matched pattern (possibly empty).
    pub path_params: Option<PathParams>,
    /// Free-form attributes written and read by filters and backends.
    pub attributes: HashMap<String, serde_json::Value>,
}

impl RequestContext {
    /// Read a typed attribute, returning `None` if absent or if
    /// deserialization fails.
    ///
    /// The well-known keys [`ROUTE_ID_ATTR`], [`ROUTE_TARGET_URL_ATTR`] and
    /// [`ROUTE_PATH_PARAMS_ATTR`] resolve to the typed route fields.
    pub fn get_attr<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = match key {
            ROUTE_ID_ATTR => serde_json::to_value(self.route_id.as_ref()?).ok()?,
            ROUTE_TARGET_URL_ATTR => serde_json::to_value(self.target_url.as_ref()?).ok()?,
            ROUTE_PATH_PARAMS_ATTR => serde_json::to_value(self.path_params.as_ref()?).ok()?,
            _ => self.attributes.get(key)?.clone(),
        };
        serde_json::from_value(value).ok()
    }

    /// Write a serializable attribute.  Values that fail to serialize are
    /// dropped.
    ///
    /// The well-known route keys write through to the typed fields, so a
    /// filter can retarget a request with
    /// `set_attr(ROUTE_TARGET_URL_ATTR, "http://canary")`.  A value of the
    /// wrong shape for such a key is dropped with a warning.
    pub fn set_attr<T: serde::Serialize + ?Sized>(&mut self, key: impl Into<String>, val: &T) {
        let key = key.into();
        let Ok(value) = serde_json::to_value(val) else {
            warn!(key = %key, "attribute value is not serializable, dropped");
            return;
        };
        let applied = match key.as_str() {
            ROUTE_ID_ATTR => serde_json::from_value(value).map(|v| self.route_id = Some(v)),
            ROUTE_TARGET_URL_ATTR => serde_json::from_value(value).map(|v| self.target_url = Some(v)),
            ROUTE_PATH_PARAMS_ATTR => {
                serde_json::from_value(value).map(|v| self.path_params = Some(v))
            }
            _ => {
                self.attributes.insert(key, value);
                return;
            }
        };
        if let Err(err) = applied {
            warn!(key = %key, error = %err, "ill-typed value for route attribute, dropped");
        }
    }

    /// Remove and return an attribute.  Well-known route keys clear the
    /// corresponding typed field.
    pub fn remove_attr(&mut self, key: &str) -> Option<serde_json::Value> {
        let taken = match key {
            ROUTE_ID_ATTR => serde_json::to_value(self.route_id.take()?),
            ROUTE_TARGET_URL_ATTR => serde_json::to_value(self.target_url.take()?),
            ROUTE_PATH_PARAMS_ATTR => serde_json::to_value(self.path_params.take()?),
            _ => return self.attributes.remove(key),
        };
        taken.ok()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request / Response
// ─────────────────────────────────────────────────────────────────────────────

/// An inbound request flowing through the gateway.
///
/// All fields use owned types so the struct can be moved across async task
/// boundaries without lifetime complications.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayRequest {
    /// Unique identifier for correlating this request across logs and traces.
    pub id: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path, e.g. `/api/users/42`.
    pub path: String,
    /// HTTP headers.  Names are expected lowercase; use
    /// [`insert_header`](Self::insert_header) to keep it that way.
    pub headers: HashMap<String, String>,
    /// Raw body bytes.
    pub body: Vec<u8>,
    /// Routing metadata and filter attributes for this request only.
    pub context: RequestContext,
}

impl GatewayRequest {
    /// Construct a minimal request with a fresh id.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: Vec::new(),
            context: RequestContext::default(),
        }
    }

    /// Start building a request.
    pub fn builder() -> GatewayRequestBuilder {
        GatewayRequestBuilder::default()
    }

    /// Look up a header by (case-insensitive) name.
    ///
    /// Names inserted through the builder are stored lowercased and hit the
    /// map directly; names pushed into `headers` by hand in another case are
    /// still found by a scan.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .or_else(|| {
                self.headers
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v)
            })
            .map(String::as_str)
    }

    /// Insert a header, lowercasing its name.
    pub fn insert_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
    }

    /// Shorthand for [`RequestContext::get_attr`].
    pub fn get_attr<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.context.get_attr(key)
    }

    /// Shorthand for [`RequestContext::set_attr`].
    pub fn set_attr<T: serde::Serialize + ?Sized>(&mut self, key: impl Into<String>, val: &T) {
        self.context.set_attr(key, val);
    }

    /// Captured path variable by name, once the request has been routed.
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.context
            .path_params
            .as_ref()?
            .get(name)
            .map(String::as_str)
    }
}

/// Fluent builder for [`GatewayRequest`].
#[derive(Debug, Default)]
pub struct GatewayRequestBuilder {
    id: Option<String>,
    method: Option<HttpMethod>,
    path: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl GatewayRequestBuilder {
    /// Use an explicit request id instead of a generated one.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the HTTP method (defaults to `GET`).
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Set the request path.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Attach a header; the name is lowercased.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into().to_lowercase(), value.into());
        self
    }

    /// Set the body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> GatewayRequest {
        GatewayRequest {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            method: self.method.unwrap_or(HttpMethod::Get),
            path: self.path,
            headers: self.headers,
            body: self.body,
            context: RequestContext::default(),
        }
    }
}

/// An outbound response returned through the gateway.
///
/// Produced by the backend handler, by a short-circuiting filter, or
/// synthesized by the dispatcher when no route matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayResponse {
    /// HTTP status code (100–599).
    pub status: u16,
    /// Response headers (names are lowercased).
    pub headers: HashMap<String, String>,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl GatewayResponse {
    /// Construct an empty response with the given status.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// `200 OK` carrying `body`.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200).with_body(body)
    }

    /// `401 Unauthorized` carrying `body`.
    pub fn unauthorized(body: impl Into<Vec<u8>>) -> Self {
        Self::new(401).with_body(body)
    }

    /// Empty `404 Not Found`, used for routing misses.
    pub fn not_found() -> Self {
        Self::new(404)
    }

    /// Builder helper: attach a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into().to_lowercase(), value.into());
        self
    }

    /// Builder helper: set the body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Body decoded as UTF-8, lossily.
    pub fn body_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
