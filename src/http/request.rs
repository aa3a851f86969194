//! HTTP request preparation

use crate::config::{HttpMethod, RequestConfig};
use crate::error::{Result, RestError};
use serde::Serialize;
use serde_json::Value;

/// Headers attached to every request.
pub const DEFAULT_HEADERS: [(&str, &str); 2] = [
    ("Content-Type", "application/json"),
    ("X-Requested-With", "XMLHttpRequest"),
];

/// Request body for `create` and `update`
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    #[default]
    Empty,
    /// Sent verbatim.
    Text(String),
    /// Serialized as JSON text before sending.
    Json(Value),
}

impl Body {
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Body::Json(serde_json::to_value(value)?))
    }

    /// The text to send, or `None` when the body is empty or falsy
    /// (`null`, `false`, `0`, `""`).
    pub fn into_payload(self) -> Result<Option<String>> {
        match self {
            Body::Empty => Ok(None),
            Body::Text(text) if text.is_empty() => Ok(None),
            Body::Text(text) => Ok(Some(text)),
            Body::Json(value) if is_falsy(&value) => Ok(None),
            Body::Json(Value::String(text)) => Ok(Some(text)),
            Body::Json(value) => Ok(Some(serde_json::to_string(&value)?)),
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

impl From<()> for Body {
    fn from(_: ()) -> Self {
        Body::Empty
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}

impl<T: Into<Body>> From<Option<T>> for Body {
    fn from(body: Option<T>) -> Self {
        body.map(Into::into).unwrap_or_default()
    }
}

/// Everything a transport needs to send one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    /// The assembled URL, possibly without a scheme.
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl PreparedRequest {
    /// Snapshot `config` into a request. GET and DELETE never carry a body.
    pub fn from_config(config: &RequestConfig, body: Body, epoch_millis: u128) -> Result<Self> {
        let method = config.method.ok_or_else(|| {
            RestError::Config("request method must be set before dispatch".to_string())
        })?;

        let body = match method {
            HttpMethod::Post | HttpMethod::Put => body.into_payload()?,
            HttpMethod::Get | HttpMethod::Delete => None,
        };

        Ok(Self {
            method,
            url: config.url_at(epoch_millis),
            headers: DEFAULT_HEADERS
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            body,
        })
    }
}
