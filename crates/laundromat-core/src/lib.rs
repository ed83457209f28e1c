//! # Laundromat Core
//!
//! Core contracts for the Laundromat redirect-resolution middleware.
//!
//! This crate provides the types shared between washing machines and the
//! convergence engine:
//!
//! - [`WashingMachine`] - The decision-step trait machines implement
//! - [`Modification`] - A machine's proposed (status, url) change
//! - [`WashRequest`] / [`ResponseContext`] - The in-process entry contract
//! - [`WashError`] - Run-time error types
//!
//! The engine itself lives in the `laundromat` crate.

#![doc(html_root_url = "https://docs.rs/laundromat-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
pub mod fixtures;
mod machine;
mod modification;

pub use context::{ResponseContext, WashRequest};
pub use error::{WashError, WashResult};
pub use machine::{BoxFuture, FnMachine, MachineOutcome, WashingMachine};
pub use modification::{Modification, ModificationError, STATUS_KEY, URL_KEY};
