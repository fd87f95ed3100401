use crate::clients::config::HttpConfig;
use crate::framework::{Method, RequestOptions, Response, Transport, TransportError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

/// Media type of JSON:API documents, sent both ways.
pub const JSON_API: &str = "application/vnd.api+json";

/// [`Transport`] over HTTP with `reqwest`.
///
/// Paths are appended to the configured base URL. A non-2xx answer becomes
/// [`TransportError::Status`] carrying the raw body; an empty body decodes to
/// `data = null`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Result<Self, TransportError> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_API));
        if let Some(token) = &config.auth_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| TransportError::Config(format!("auth_token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| TransportError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, method, options), fields(method = %method))]
    async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, TransportError> {
        let url = self.url(path);
        let mut request = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Patch => self.client.patch(&url),
        };
        if !options.params.is_empty() {
            request = request.query(&query_pairs(&options.params));
        }
        if let Some(body) = &options.body {
            let bytes = serde_json::to_vec(body).map_err(|e| TransportError::Decode(e.to_string()))?;
            request = request.header(CONTENT_TYPE, JSON_API).body(bytes);
        }

        debug!(%url, "Sending request");
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Request failed");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Response::default());
        }

        let document: Value =
            serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))?;
        Ok(Response::from_document(document))
    }
}

/// Flatten structured params into bracketed query pairs.
///
/// `{"filter": {"widget_id": 5}}` becomes `filter[widget_id]=5`; arrays
/// repeat the key with a trailing `[]`; `null` is sent as an empty value.
pub fn query_pairs(params: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        flatten(key.clone(), value, &mut pairs);
    }
    pairs
}

fn flatten(prefix: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                flatten(format!("{prefix}[{key}]"), nested, pairs);
            }
        }
        Value::Array(items) => {
            for item in items {
                flatten(format!("{prefix}[]"), item, pairs);
            }
        }
        Value::String(s) => pairs.push((prefix, s.clone())),
        Value::Null => pairs.push((prefix, String::new())),
        other => pairs.push((prefix, other.to_string())),
    }
}
