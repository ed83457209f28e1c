//! # Laundromat
//!
//! Convergent redirect-resolution middleware.
//!
//! A [`Laundromat`] holds an ordered chain of washing machines: independent
//! decision steps that each inspect the current (status, url) pair for a
//! request and may propose a change, without knowing about each other or
//! about convergence. The engine walks the chain repeatedly until a full
//! pass produces no change, then performs at most one redirect:
//!
//! ```text
//!             ┌──────────── change proposed: restart ───────────┐
//!             ▼                                                 │
//! Request → machine[0] → machine[1] → ... → machine[N-1] ───────┘
//!             │
//!             └─ full pass, no change
//!                  ├─ (status, url) == initial → pass through
//!                  └─ (status, url) != initial → emit one redirect
//! ```
//!
//! A loop bound computed from the chain length stops chains that oscillate
//! instead of converging.
//!
//! ## Example
//!
//! ```
//! use http::StatusCode;
//! use laundromat::{FnMachine, Laundromat, Modification, Verdict, WashRequest};
//! use laundromat_core::fixtures::RecordingResponse;
//!
//! # tokio_test::block_on(async {
//! let mut laundromat = Laundromat::new();
//! laundromat.register(FnMachine::new("canonical_host", |_req: &WashRequest, _status: StatusCode, url: &str| {
//!     let proposal = url.strip_prefix("http://www.").map(|rest| {
//!         Modification::default()
//!             .with_status(StatusCode::MOVED_PERMANENTLY)
//!             .with_url(format!("http://{rest}"))
//!             .into_value()
//!     });
//!     async move { Ok(proposal) }
//! }));
//!
//! let request = WashRequest::new("http://www.so.me/stuff");
//! let mut response = RecordingResponse::new();
//! let verdict = laundromat.wash(&request, &mut response).await.unwrap();
//!
//! assert!(matches!(verdict, Verdict::Redirected { .. }));
//! assert_eq!(response.redirects().len(), 1);
//! # });
//! ```
//!
//! Machines never touch the response themselves; they communicate only
//! through the [`Modification`] value they return, and the engine alone
//! decides whether and when to emit the redirect.

#![doc(html_root_url = "https://docs.rs/laundromat/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod engine;
pub mod policy;

// Re-export main types at crate root
pub use chain::Laundromat;
pub use engine::Verdict;
pub use policy::loop_bound;

// Re-export the core contracts so most users need a single import path.
pub use laundromat_core::{
    BoxFuture, FnMachine, MachineOutcome, Modification, ModificationError, ResponseContext,
    WashError, WashRequest, WashResult, WashingMachine,
};
