//! Entry-contract types.
//!
//! The engine is invoked with a [`WashRequest`] and a mutable
//! [`ResponseContext`]. Both are deliberately narrow: the transport layer
//! that builds real HTTP requests and transmits redirects sits outside
//! this crate and only has to satisfy these two shapes.

use http::StatusCode;

/// The request view the wash cycle operates on.
///
/// Only two facts about the incoming request matter to the engine: the
/// url being resolved and whether the call is programmatic (XHR / API)
/// and therefore must never be redirected.
///
/// # Example
///
/// ```
/// use laundromat_core::WashRequest;
///
/// let request = WashRequest::new("http://so.me/stuff");
/// assert_eq!(request.url(), "http://so.me/stuff");
/// assert!(!request.is_xhr());
///
/// let api_call = WashRequest::new("http://so.me/api/v1/stuff").xhr(true);
/// assert!(api_call.is_xhr());
/// ```
#[derive(Debug, Clone)]
pub struct WashRequest {
    /// The url the run starts from.
    url: String,

    /// Set when the request is a programmatic call (XHR, API client)
    /// that must pass through untouched.
    xhr: bool,
}

impl WashRequest {
    /// Creates a request view for the given url.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            xhr: false,
        }
    }

    /// Marks the request as a programmatic call.
    #[must_use]
    pub fn xhr(mut self, xhr: bool) -> Self {
        self.xhr = xhr;
        self
    }

    /// Returns the request url.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns `true` when the request must skip the wash cycle.
    #[must_use]
    pub fn is_xhr(&self) -> bool {
        self.xhr
    }
}

/// The response-side capabilities the engine consumes.
///
/// The engine reads the initial status once at run start and, on the
/// single terminal "chain exhausted and state diverged" transition,
/// invokes [`emit_redirect`](ResponseContext::emit_redirect) exactly
/// once. It never inspects or retries the emission; the transport layer
/// owns what "emitting a redirect" actually means.
pub trait ResponseContext: Send {
    /// The status code the response currently carries, if any.
    ///
    /// The engine falls back to `200 OK` when this returns `None`.
    fn status_code(&self) -> Option<StatusCode>;

    /// Emits a redirect with the given status and url.
    ///
    /// Called at most once per run, and only when the converged state
    /// differs from the initial snapshot.
    fn emit_redirect(&mut self, status: StatusCode, url: &str);
}
