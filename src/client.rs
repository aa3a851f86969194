//! Fluent REST client
//!
//! [`RestClient`] accumulates URL configuration through chainable setters and
//! dispatches one of four verb operations:
//!
//! | verb     | method |
//! |----------|--------|
//! | `create` | POST   |
//! | `read`   | GET    |
//! | `update` | PUT    |
//! | `remove` | DELETE |
//!
//! Every verb snapshots the configuration at call time, so changing the
//! builder afterwards never affects a request already dispatched.
//!
//! ```no_run
//! # async fn demo() -> restcrud::Result<()> {
//! use restcrud::RestClient;
//! use serde_json::json;
//!
//! let mut client = RestClient::new()?;
//! let users = client
//!     .set_host("api.example.com")
//!     .set_path("/users")
//!     .read()
//!     .await?;
//! println!("{}", users.text());
//!
//! client.set_query("notify=1").create(json!({"name": "ada"})).await?;
//! # Ok(())
//! # }
//! ```

use crate::config::{HttpMethod, Query, QueryEncoding, RequestConfig, TransportConfig};
use crate::error::{Result, RestError};
use crate::http::request::{Body, PreparedRequest};
use crate::http::response::RestResponse;
use crate::http::{HttpTransport, Transport};
use crate::state::{LogObserver, StateObserver, StateReporter};
use crate::utils::epoch_millis;
use futures_util::future::{BoxFuture, FutureExt};
use log::warn;
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Outcome of a dispatched request
pub type Dispatch = BoxFuture<'static, Result<RestResponse>>;

/// Callback ignoring the outcome, for fire-and-forget `*_with` calls.
pub fn discard(_error: Option<RestError>, _response: Option<RestResponse>) {}

/// Fluent builder for REST requests
#[derive(Clone)]
pub struct RestClient {
    config: RequestConfig,
    transport: Arc<dyn Transport>,
    fallback: Option<Arc<dyn Transport>>,
    observer: Option<Arc<dyn StateObserver>>,
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("config", &self.config)
            .field("has_fallback", &self.fallback.is_some())
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}

impl RestClient {
    /// Create a client backed by reqwest with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(TransportConfig::default())
    }

    pub fn with_config(config: TransportConfig) -> Result<Self> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(config)?)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            config: RequestConfig::default(),
            transport,
            fallback: None,
            observer: None,
        }
    }

    /// Transport used when the primary one cannot make cross-origin requests.
    pub fn set_fallback_transport(&mut self, transport: Arc<dyn Transport>) -> &mut Self {
        self.fallback = Some(transport);
        self
    }

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    // Configuration
    // ------------------------------------------------------------------------

    pub fn set_host(&mut self, domain: impl Into<String>) -> &mut Self {
        self.config.host = domain.into();
        self
    }

    pub fn set_port(&mut self, port: impl fmt::Display) -> &mut Self {
        self.config.port = Some(format!(":{}", port));
        self
    }

    pub fn set_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.config.path = path.into();
        self
    }

    /// Raw query string (`"a=1&b=2"`) or key/value pairs encoded at dispatch.
    pub fn set_query(&mut self, query: impl Into<Query>) -> &mut Self {
        self.config.query = Some(query.into());
        self
    }

    pub fn clear_query(&mut self) -> &mut Self {
        self.config.query = None;
        self
    }

    pub fn set_query_encoding(&mut self, encoding: QueryEncoding) -> &mut Self {
        self.config.query_encoding = encoding;
        self
    }

    /// Append `d=<epoch millis>` to every URL to defeat HTTP caching.
    pub fn set_cache_bust(&mut self, cache_bust: bool) -> &mut Self {
        self.config.cache_bust = cache_bust;
        self
    }

    pub fn set_observer(&mut self, observer: Arc<dyn StateObserver>) -> &mut Self {
        self.observer = Some(observer);
        self
    }

    /// Install (or remove) a [`LogObserver`].
    pub fn set_debug(&mut self, debug: bool) -> &mut Self {
        self.observer = if debug {
            Some(Arc::new(LogObserver))
        } else {
            None
        };
        self
    }

    /// Restore every URL setting and the method to their defaults.
    pub fn reset(&mut self) -> &mut Self {
        self.config = RequestConfig::default();
        self
    }

    // Verbs
    // ------------------------------------------------------------------------

    pub fn create(&mut self, body: impl Into<Body>) -> Dispatch {
        self.dispatch(HttpMethod::Post, body.into())
    }

    pub fn read(&mut self) -> Dispatch {
        self.dispatch(HttpMethod::Get, Body::Empty)
    }

    pub fn update(&mut self, body: impl Into<Body>) -> Dispatch {
        self.dispatch(HttpMethod::Put, body.into())
    }

    pub fn remove(&mut self) -> Dispatch {
        self.dispatch(HttpMethod::Delete, Body::Empty)
    }

    // Callback verbs
    //
    // The callback receives `(None, Some(response))` on 200,
    // `(Some(Status(response)), Some(response))` on any other status, and
    // `(Some(error), None)` when no response was obtained. It runs exactly
    // once, on the ambient tokio runtime.
    // ------------------------------------------------------------------------

    pub fn create_with<F>(&mut self, callback: F, body: impl Into<Body>) -> &mut Self
    where
        F: FnOnce(Option<RestError>, Option<RestResponse>) + Send + 'static,
    {
        let dispatch = self.create(body);
        spawn_with_callback(dispatch, callback);
        self
    }

    pub fn read_with<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnOnce(Option<RestError>, Option<RestResponse>) + Send + 'static,
    {
        let dispatch = self.read();
        spawn_with_callback(dispatch, callback);
        self
    }

    pub fn update_with<F>(&mut self, callback: F, body: impl Into<Body>) -> &mut Self
    where
        F: FnOnce(Option<RestError>, Option<RestResponse>) + Send + 'static,
    {
        let dispatch = self.update(body);
        spawn_with_callback(dispatch, callback);
        self
    }

    pub fn remove_with<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnOnce(Option<RestError>, Option<RestResponse>) + Send + 'static,
    {
        let dispatch = self.remove();
        spawn_with_callback(dispatch, callback);
        self
    }

    fn dispatch(&mut self, method: HttpMethod, body: Body) -> Dispatch {
        self.config.method = Some(method);
        let prepared = PreparedRequest::from_config(&self.config, body, epoch_millis());
        let transport = self.select_transport();
        let observer = self.observer.clone();

        async move {
            let request = prepared?;
            let transport = transport?;
            let reporter = StateReporter::new(observer, request.url.clone(), request.method);
            transport.send(request, &reporter).await?.ensure_ok()
        }
        .boxed()
    }

    fn select_transport(&self) -> Result<Arc<dyn Transport>> {
        if self.transport.supports_cross_origin() {
            return Ok(self.transport.clone());
        }
        match &self.fallback {
            Some(fallback) => Ok(fallback.clone()),
            None => Err(RestError::Unsupported(
                "cross-origin requests are not supported by the available transport".to_string(),
            )),
        }
    }
}

fn spawn_with_callback<F>(dispatch: Dispatch, callback: F)
where
    F: FnOnce(Option<RestError>, Option<RestResponse>) + Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move { complete(dispatch.await, callback) });
        }
        Err(_) => {
            warn!("callback dispatch attempted outside of a tokio runtime");
            callback(
                Some(RestError::Unsupported(
                    "callback dispatch requires a tokio runtime".to_string(),
                )),
                None,
            );
        }
    }
}

fn complete<F>(outcome: Result<RestResponse>, callback: F)
where
    F: FnOnce(Option<RestError>, Option<RestResponse>),
{
    match outcome {
        Ok(response) => callback(None, Some(response)),
        Err(RestError::Status(response)) => {
            let error_response = response.clone();
            callback(Some(RestError::Status(error_response)), Some(response))
        }
        Err(err) => callback(Some(err), None),
    }
}
