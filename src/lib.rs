//! restcrud - a minuscule fluent builder for REST requests
//!
//! This crate provides [`RestClient`], which assembles a URL from host, port,
//! path and query settings and issues POST/GET/PUT/DELETE requests through a
//! pluggable [`Transport`](http::Transport), with optional cache-busting and
//! state-transition logging.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod state;
pub mod utils;

pub use client::{discard, Dispatch, RestClient};
pub use config::{HttpMethod, Query, QueryEncoding};
pub use error::{RestError, Result};
pub use http::request::Body;
pub use http::response::RestResponse;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
