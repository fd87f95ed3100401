//! # Transport Contract
//!
//! The core never talks HTTP directly. Every resource class is bound to an
//! `Arc<dyn Transport>` which turns `(method, path, options)` into a decoded
//! JSON:API document. See [`HttpTransport`](crate::clients::HttpTransport) for
//! the reqwest implementation and [`MockTransport`](crate::framework::mock::MockTransport)
//! for tests.

use crate::framework::error::TransportError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;

/// The request methods the core issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body and query parameters of one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// JSON document sent as the request body.
    pub body: Option<Value>,
    /// Structured query parameters; nested objects become `outer[inner]=v`.
    pub params: Map<String, Value>,
}

impl RequestOptions {
    pub fn with_body(body: Value) -> Self {
        Self {
            body: Some(body),
            params: Map::new(),
        }
    }

    pub fn with_params(params: Map<String, Value>) -> Self {
        Self { body: None, params }
    }
}

/// A decoded response document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    /// One record object, an array of records, or `null`.
    pub data: Value,
    pub meta: Map<String, Value>,
    pub links: Map<String, Value>,
}

impl Response {
    /// Split a top-level document `{data, meta?, links?}`.
    ///
    /// Anything that is not an object yields `data = null`.
    pub fn from_document(document: Value) -> Self {
        let Value::Object(mut doc) = document else {
            return Self::default();
        };
        let take_map = |doc: &mut Map<String, Value>, key: &str| match doc.remove(key) {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        let meta = take_map(&mut doc, "meta");
        let links = take_map(&mut doc, "links");
        Self {
            data: doc.remove("data").unwrap_or(Value::Null),
            meta,
            links,
        }
    }

    /// Response carrying only `data`.
    pub fn data(data: Value) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }
}

/// The transport collaborator every resource class is bound to.
///
/// Implementations own retries, timeouts and cancellation; the core awaits
/// each call before issuing the next and never interprets the error.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, TransportError>;
}
