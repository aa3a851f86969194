//! Request state reporting
//!
//! A transport walks every request through the same states an
//! `XMLHttpRequest` does and reports each transition to an optional
//! [`StateObserver`].

use crate::config::HttpMethod;
use log::info;
use std::fmt;
use std::sync::Arc;

/// Progress of a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    Unsent = 0,
    Opened = 1,
    HeadersReceived = 2,
    Loading = 3,
    Done = 4,
}

impl ReadyState {
    pub fn description(self) -> &'static str {
        match self {
            ReadyState::Unsent => "UNSENT",
            ReadyState::Opened => "OPENED",
            ReadyState::HeadersReceived => "HEADERS_RECEIVED",
            ReadyState::Loading => "LOADING",
            ReadyState::Done => "DONE",
        }
    }
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A single state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange<'a> {
    pub url: &'a str,
    pub method: HttpMethod,
    pub state: ReadyState,
    /// `0` until response headers arrive, and after a transport failure.
    pub status: u16,
}

/// Receives state transitions of dispatched requests
pub trait StateObserver: Send + Sync {
    fn on_state_change(&self, change: &StateChange<'_>);
}

/// Writes every transition through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl StateObserver for LogObserver {
    fn on_state_change(&self, change: &StateChange<'_>) {
        info!(
            "url: {} method: {} state: {} status: {}",
            change.url, change.method, change.state, change.status
        );
    }
}

/// Binds an optional observer to one request.
pub struct StateReporter {
    observer: Option<Arc<dyn StateObserver>>,
    url: String,
    method: HttpMethod,
}

impl StateReporter {
    pub fn new(observer: Option<Arc<dyn StateObserver>>, url: String, method: HttpMethod) -> Self {
        Self {
            observer,
            url,
            method,
        }
    }

    pub fn report(&self, state: ReadyState, status: u16) {
        if let Some(observer) = &self.observer {
            observer.on_state_change(&StateChange {
                url: &self.url,
                method: self.method,
                state,
                status,
            });
        }
    }
}
