//! HTTP transport module
//!
//! This module provides the transport seam and its reqwest-backed
//! implementation.

use crate::config::TransportConfig;
use crate::error::{Result, RestError};
use crate::state::{ReadyState, StateReporter};
use crate::utils::UrlUtils;
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, ClientBuilder};

pub mod request;
pub mod response;

use request::PreparedRequest;
use response::RestResponse;

/// The capability that performs the actual network call
#[async_trait]
pub trait Transport: Send + Sync {
    /// Whether this transport can reach hosts other than the caller's own.
    fn supports_cross_origin(&self) -> bool {
        true
    }

    /// Send `request`, reporting every state transition to `reporter`.
    /// `OPENED` always comes first and `DONE` last, also on failure.
    ///
    /// Any status is returned as a response; deciding what counts as
    /// success is left to the caller.
    async fn send(&self, request: PreparedRequest, reporter: &StateReporter) -> Result<RestResponse>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new transport with the given configuration
    pub fn new(config: TransportConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .connect_timeout(config.connect_timeout)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(config.max_redirects as usize)
            } else {
                reqwest::redirect::Policy::none()
            });

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        let client = builder
            .build()
            .map_err(|e| RestError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn execute(&self, request: PreparedRequest, reporter: &StateReporter) -> Result<RestResponse> {
        reporter.report(ReadyState::Opened, 0);
        let url = UrlUtils::validate_url(&request.url)?;

        let mut builder = self.client.request(request.method.as_reqwest(), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let request = builder.build()?;
        debug!("{} {}", request.method(), request.url());

        let response = self.client.execute(request).await?;
        let status = response.status();
        reporter.report(ReadyState::HeadersReceived, status.as_u16());

        let headers = response.headers().clone();
        let final_url = response.url().clone();
        reporter.report(ReadyState::Loading, status.as_u16());
        let body = response.text().await?;
        reporter.report(ReadyState::Done, status.as_u16());

        debug!("{} answered {} ({} bytes)", final_url, status, body.len());
        Ok(RestResponse::new(status, headers, final_url, body))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: PreparedRequest, reporter: &StateReporter) -> Result<RestResponse> {
        let result = self.execute(request, reporter).await;
        if let Err(err) = &result {
            debug!("request failed: {}", err);
            reporter.report(ReadyState::Done, 0);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpTransport, Transport};
    use crate::config::{HttpMethod, TransportConfig};
    use crate::error::RestError;
    use crate::http::request::PreparedRequest;
    use crate::state::{ReadyState, StateChange, StateObserver, StateReporter};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct States(Mutex<Vec<(ReadyState, u16)>>);

    impl StateObserver for States {
        fn on_state_change(&self, change: &StateChange<'_>) {
            self.0.lock().expect("lock").push((change.state, change.status));
        }
    }

    #[tokio::test]
    async fn failed_request_reports_opened_before_done() {
        let transport = HttpTransport::new(TransportConfig::default()).expect("transport");
        let states = Arc::new(States::default());
        let request = PreparedRequest {
            method: HttpMethod::Get,
            url: "http://".to_string(),
            headers: Vec::new(),
            body: None,
        };
        let reporter = StateReporter::new(Some(states.clone()), request.url.clone(), request.method);

        let err = transport
            .send(request, &reporter)
            .await
            .expect_err("unparseable url");
        assert!(matches!(err, RestError::InvalidUrl(_)));

        let seen = states.0.lock().expect("lock").clone();
        assert_eq!(seen, [(ReadyState::Opened, 0), (ReadyState::Done, 0)]);
    }
}
