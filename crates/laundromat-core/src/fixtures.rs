//! Test fixtures for Laundromat development and testing.
//!
//! This module provides pre-built washing machines with well-known
//! behaviors, plus a recording response context, for use in tests across
//! the workspace.
//!
//! # Example
//!
//! ```
//! use laundromat_core::fixtures::{InertMachine, RecordingResponse};
//! use laundromat_core::WashingMachine;
//!
//! let machine = InertMachine;
//! assert_eq!(machine.name(), "inert");
//!
//! let response = RecordingResponse::new();
//! assert!(response.redirects().is_empty());
//! ```

use crate::context::{ResponseContext, WashRequest};
use crate::machine::{BoxFuture, MachineOutcome, WashingMachine};
use crate::modification::Modification;
use http::StatusCode;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// A machine that never proposes anything.
#[derive(Debug, Default)]
pub struct InertMachine;

impl WashingMachine for InertMachine {
    fn name(&self) -> &'static str {
        "inert"
    }

    fn evaluate<'a>(
        &'a self,
        _request: &'a WashRequest,
        _status: StatusCode,
        _url: &'a str,
    ) -> BoxFuture<'a, MachineOutcome> {
        Box::pin(async { Ok(None) })
    }
}

/// A machine that fails every evaluation with the given message.
#[derive(Debug)]
pub struct FailingMachine {
    message: &'static str,
}

impl FailingMachine {
    /// Creates a failing machine.
    #[must_use]
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

impl WashingMachine for FailingMachine {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn evaluate<'a>(
        &'a self,
        _request: &'a WashRequest,
        _status: StatusCode,
        _url: &'a str,
    ) -> BoxFuture<'a, MachineOutcome> {
        let message = self.message;
        Box::pin(async move { Err(anyhow::anyhow!(message)) })
    }
}

/// A machine that proposes a fixed modification on its first evaluation,
/// then stays quiet.
///
/// The fired flag is shared across runs, matching a machine whose
/// trigger condition is satisfied exactly once.
#[derive(Debug)]
pub struct OneShotMachine {
    modification: Modification,
    fired: AtomicBool,
}

impl OneShotMachine {
    /// Creates a one-shot machine proposing the given modification.
    #[must_use]
    pub fn new(modification: Modification) -> Self {
        Self {
            modification,
            fired: AtomicBool::new(false),
        }
    }
}

impl WashingMachine for OneShotMachine {
    fn name(&self) -> &'static str {
        "one_shot"
    }

    fn evaluate<'a>(
        &'a self,
        _request: &'a WashRequest,
        _status: StatusCode,
        _url: &'a str,
    ) -> BoxFuture<'a, MachineOutcome> {
        let proposal = if self.fired.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(self.modification.clone().into_value())
        };
        Box::pin(async move { Ok(proposal) })
    }
}

/// A machine that proposes a fresh, distinct url on every evaluation.
///
/// Chains containing this machine never converge; they exist to exercise
/// the loop bound.
#[derive(Debug)]
pub struct RestlessMachine {
    base: &'static str,
    spins: AtomicU64,
}

impl RestlessMachine {
    /// Creates a restless machine; proposed urls are `{base}{n}`.
    #[must_use]
    pub fn new(base: &'static str) -> Self {
        Self {
            base,
            spins: AtomicU64::new(0),
        }
    }
}

impl WashingMachine for RestlessMachine {
    fn name(&self) -> &'static str {
        "restless"
    }

    fn evaluate<'a>(
        &'a self,
        _request: &'a WashRequest,
        _status: StatusCode,
        _url: &'a str,
    ) -> BoxFuture<'a, MachineOutcome> {
        let spin = self.spins.fetch_add(1, Ordering::SeqCst);
        let url = format!("{}{}", self.base, spin);
        Box::pin(async move { Ok(Some(Modification::default().with_url(url).into_value())) })
    }
}

/// A response context that records emitted redirects.
#[derive(Debug)]
pub struct RecordingResponse {
    status: Option<StatusCode>,
    redirects: Vec<(StatusCode, String)>,
}

impl RecordingResponse {
    /// Creates a recording response with a `200 OK` status.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: Some(StatusCode::OK),
            redirects: Vec::new(),
        }
    }

    /// Creates a recording response with the given status.
    #[must_use]
    pub fn with_status(status: StatusCode) -> Self {
        Self {
            status: Some(status),
            redirects: Vec::new(),
        }
    }

    /// Creates a recording response that reports no status at all.
    #[must_use]
    pub fn without_status() -> Self {
        Self {
            status: None,
            redirects: Vec::new(),
        }
    }

    /// The redirects emitted so far, in emission order.
    #[must_use]
    pub fn redirects(&self) -> &[(StatusCode, String)] {
        &self.redirects
    }
}

impl Default for RecordingResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseContext for RecordingResponse {
    fn status_code(&self) -> Option<StatusCode> {
        self.status
    }

    fn emit_redirect(&mut self, status: StatusCode, url: &str) {
        self.redirects.push((status, url.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_exactly_once() {
        let machine = OneShotMachine::new(Modification::default().with_url("/rinse"));
        let request = WashRequest::new("/stuff");

        let first =
            tokio_test::block_on(machine.evaluate(&request, StatusCode::OK, "/stuff")).unwrap();
        assert!(first.is_some());

        let second =
            tokio_test::block_on(machine.evaluate(&request, StatusCode::OK, "/stuff")).unwrap();
        assert!(second.is_none());
    }

    #[test]
    fn restless_never_repeats_a_url() {
        let machine = RestlessMachine::new("/spin/");
        let request = WashRequest::new("/stuff");

        let first =
            tokio_test::block_on(machine.evaluate(&request, StatusCode::OK, "/stuff")).unwrap();
        let second =
            tokio_test::block_on(machine.evaluate(&request, StatusCode::OK, "/stuff")).unwrap();
        assert_ne!(first.unwrap()["url"], second.unwrap()["url"]);
    }

    #[test]
    fn recording_response_captures_redirects() {
        let mut response = RecordingResponse::without_status();
        assert_eq!(response.status_code(), None);

        response.emit_redirect(StatusCode::SEE_OTHER, "http://so.me/new/url");
        assert_eq!(
            response.redirects(),
            &[(StatusCode::SEE_OTHER, "http://so.me/new/url".to_string())]
        );
    }
}
