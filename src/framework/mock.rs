//! # Mock Transport
//!
//! Utilities for testing resource classes without a server.
//!
//! Queue expectations with [`MockTransport::expect`] (or the `expect_get` /
//! `expect_post` / `expect_patch` shorthands), hand the transport to a
//! [`Namespace`](crate::framework::Namespace), run the code under test and
//! finish with [`MockTransport::verify`]. Every request is recorded, so the
//! exact wire traffic can be asserted with [`MockTransport::requests`].
//!
//! ```ignore
//! let mock = Arc::new(MockTransport::new());
//! mock.expect_get("/widgets/5").return_data(json!({"id": 5, "attributes": {}}));
//!
//! let ns = Namespace::builder(mock.clone()).register(widget_schema).build()?;
//! let widget = ns.class("Widget")?.find(5).await?;
//!
//! mock.verify(); // Ensures all expectations were met
//! ```

use crate::framework::error::TransportError;
use crate::framework::transport::{Method, RequestOptions, Response, Transport};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One request as the transport received it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub options: RequestOptions,
}

/// Represents an expected request and the response to give it.
struct Expectation {
    method: Method,
    path: String,
    body: Option<Value>,
    params: Option<Map<String, Value>>,
    response: Result<Response, TransportError>,
}

/// A transport answering from a queue of expectations, in order.
///
/// A request that does not match the next expectation panics, failing the test.
#[derive(Default)]
pub struct MockTransport {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    /// Creates a new mock transport with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects `method path` as the next request.
    pub fn expect(&self, method: Method, path: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            path: path.into(),
            body: None,
            params: None,
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_get(&self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Get, path)
    }

    pub fn expect_post(&self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Post, path)
    }

    pub fn expect_patch(&self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Patch, path)
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, TransportError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            path: path.to_string(),
            options: options.clone(),
        });

        let expectation = self.expectations.lock().unwrap().pop_front();
        let Some(expectation) = expectation else {
            panic!("Unexpected request: {method} {path}");
        };

        if expectation.method != method || expectation.path != path {
            panic!(
                "Expectation mismatch: expected {} {}, got {method} {path}",
                expectation.method, expectation.path
            );
        }
        if let Some(body) = &expectation.body {
            assert_eq!(options.body.as_ref(), Some(body), "Body mismatch for {method} {path}");
        }
        if let Some(params) = &expectation.params {
            assert_eq!(&options.params, params, "Params mismatch for {method} {path}");
        }
        expectation.response
    }
}

/// Builder for one expectation; finish with `return_*`.
pub struct ExpectationBuilder {
    method: Method,
    path: String,
    body: Option<Value>,
    params: Option<Map<String, Value>>,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl ExpectationBuilder {
    /// Also require this exact request body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Also require these exact query parameters. Non-object values match no parameters.
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(match params {
            Value::Object(map) => map,
            _ => Map::new(),
        });
        self
    }

    /// Respond with a document whose `data` is `data`.
    pub fn return_data(self, data: Value) {
        self.return_response(Response::data(data));
    }

    /// Respond with a full response.
    pub fn return_response(self, response: Response) {
        self.push(Ok(response));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: TransportError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Response, TransportError>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation {
            method: self.method,
            path: self.path,
            body: self.body,
            params: self.params,
            response,
        });
    }
}
