//! HTTP response handling

use crate::error::{Result, RestError};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

/// A fully buffered response
///
/// Cloneable so the same response can be handed out both as the error and as
/// the response of a non-200 completion.
#[derive(Debug, Clone)]
pub struct RestResponse {
    status: StatusCode,
    headers: HeaderMap,
    url: Url,
    body: String,
}

impl RestResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, url: Url, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            url,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Final URL, after any redirects.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    pub fn into_text(self) -> String {
        self.body
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Only `200 OK` counts as success; every other status, including other
    /// 2xx codes, becomes [`RestError::Status`].
    pub fn ensure_ok(self) -> Result<Self> {
        if self.status == StatusCode::OK {
            Ok(self)
        } else {
            Err(RestError::Status(self))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RestResponse;
    use crate::error::RestError;
    use reqwest::header::HeaderMap;
    use reqwest::StatusCode;
    use serde_json::Value;
    use url::Url;

    fn response(status: u16, body: &str) -> RestResponse {
        RestResponse::new(
            StatusCode::from_u16(status).expect("status"),
            HeaderMap::new(),
            Url::parse("http://example.com/").expect("url"),
            body,
        )
    }

    #[test]
    fn ensure_ok_accepts_only_200() {
        assert!(response(200, "").ensure_ok().is_ok());

        for status in [201, 204, 304, 404, 500] {
            let err = response(status, "nope").ensure_ok().expect_err("non-200");
            let carried = err.response().expect("status error carries response");
            assert_eq!(carried.status().as_u16(), status);
            assert_eq!(carried.text(), "nope");
            assert!(matches!(err, RestError::Status(_)));
        }
    }

    #[test]
    fn json_decodes_body() {
        let value: Value = response(200, r#"{"id":7}"#).json().expect("json");
        assert_eq!(value["id"], 7);

        let err = response(200, "not json").json::<Value>().expect_err("invalid");
        assert!(matches!(err, RestError::Json(_)));
    }
}
