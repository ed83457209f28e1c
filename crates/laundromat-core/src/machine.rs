//! The washing machine trait.
//!
//! A washing machine is a single decision step: it inspects the current
//! (status, url) pair for a request and may propose a change. Machines
//! are registered once, never mutated, and shared read-only across all
//! runs of a chain, so implementations must be `Send + Sync` and keep any
//! internal state behind interior mutability.
//!
//! The trait is the step contract. Where the source system validated a
//! callable's arity at registration time, here a value that does not
//! implement [`WashingMachine`] simply cannot be registered: signature
//! errors are compile errors.
//!
//! # Example
//!
//! ```
//! use http::StatusCode;
//! use laundromat_core::{BoxFuture, MachineOutcome, Modification, WashRequest, WashingMachine};
//!
//! struct TrailingSlash;
//!
//! impl WashingMachine for TrailingSlash {
//!     fn name(&self) -> &'static str {
//!         "trailing_slash"
//!     }
//!
//!     fn evaluate<'a>(
//!         &'a self,
//!         _request: &'a WashRequest,
//!         _status: StatusCode,
//!         url: &'a str,
//!     ) -> BoxFuture<'a, MachineOutcome> {
//!         let proposal = url.strip_suffix('/').map(|trimmed| {
//!             Modification::default()
//!                 .with_status(StatusCode::MOVED_PERMANENTLY)
//!                 .with_url(trimmed)
//!                 .into_value()
//!         });
//!         Box::pin(async move { Ok(proposal) })
//!     }
//! }
//! ```

use crate::context::WashRequest;
use http::StatusCode;
use std::future::Future;
use std::pin::Pin;

/// A boxed future, as produced by a washing machine evaluation.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The outcome a washing machine delivers through its continuation.
///
/// - `Err(_)` - the machine failed; the run aborts immediately.
/// - `Ok(None)` - no proposal, the engine advances to the next machine.
/// - `Ok(Some(value))` - a proposed modification. The value is
///   shape-checked by the engine (see [`Modification::from_value`]);
///   anything that is not a key-value mapping is rejected.
///
/// [`Modification::from_value`]: crate::Modification::from_value
pub type MachineOutcome = Result<Option<serde_json::Value>, anyhow::Error>;

/// A registered decision step.
///
/// Machines only *propose* changes through their returned value. They
/// never touch the response context and never perform the redirect
/// themselves; the engine alone decides whether and when to emit one.
pub trait WashingMachine: Send + Sync + 'static {
    /// Returns the machine's name, used in logs and error context.
    fn name(&self) -> &'static str;

    /// Evaluates the current (status, url) pair and possibly proposes a
    /// modification.
    ///
    /// The machine may perform asynchronous work before resolving; the
    /// engine suspends at that point and no other machine of the same
    /// run executes concurrently.
    fn evaluate<'a>(
        &'a self,
        request: &'a WashRequest,
        status: StatusCode,
        url: &'a str,
    ) -> BoxFuture<'a, MachineOutcome>;
}

/// A washing machine built from an async function.
///
/// This allows registering simple machines without implementing the
/// trait directly.
///
/// # Example
///
/// ```
/// use http::StatusCode;
/// use laundromat_core::{FnMachine, MachineOutcome, WashRequest};
///
/// let machine = FnMachine::new(
///     "inert",
///     |_req: &WashRequest, _status: StatusCode, _url: &str| async { MachineOutcome::Ok(None) },
/// );
/// ```
pub struct FnMachine<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMachine<F> {
    /// Creates a new function-based washing machine.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F, Fut> WashingMachine for FnMachine<F>
where
    F: Fn(&WashRequest, StatusCode, &str) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MachineOutcome> + Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn evaluate<'a>(
        &'a self,
        request: &'a WashRequest,
        status: StatusCode,
        url: &'a str,
    ) -> BoxFuture<'a, MachineOutcome> {
        Box::pin((self.func)(request, status, url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modification::Modification;

    #[test]
    fn fn_machine_name() {
        let machine = FnMachine::new(
            "noop",
            |_req: &WashRequest, _status: StatusCode, _url: &str| async { Ok(None) },
        );
        assert_eq!(machine.name(), "noop");
    }

    #[test]
    fn fn_machine_evaluates() {
        let machine = FnMachine::new("rewrite", |_req: &WashRequest, _status: StatusCode, url: &str| {
            let proposal = if url.ends_with("/old") {
                Some(Modification::default().with_url("/new").into_value())
            } else {
                None
            };
            async move { Ok(proposal) }
        });

        let request = WashRequest::new("/old");
        let outcome = tokio_test::block_on(machine.evaluate(&request, StatusCode::OK, "/old"));
        let value = outcome.unwrap().unwrap();
        assert_eq!(value["url"], "/new");

        let outcome = tokio_test::block_on(machine.evaluate(&request, StatusCode::OK, "/new"));
        assert!(outcome.unwrap().is_none());
    }

    #[test]
    fn fn_machine_reports_failure() {
        let machine = FnMachine::new(
            "broken",
            |_req: &WashRequest, _status: StatusCode, _url: &str| async {
                Err(anyhow::anyhow!("lime-scale failure"))
            },
        );

        let request = WashRequest::new("/stuff");
        let outcome = tokio_test::block_on(machine.evaluate(&request, StatusCode::OK, "/stuff"));
        assert!(outcome.is_err());
    }
}
