//! The convergence engine.
//!
//! A wash cycle resolves the target (status, url) pair for one request by
//! evaluating the chain repeatedly until the pair stops changing:
//!
//! 1. Snapshot the initial (status, url) pair before any machine runs.
//! 2. Evaluate machines in chain order. A validated proposal that
//!    actually changes the state restarts the walk from the first
//!    machine; anything else advances to the next machine.
//! 3. When the chain is exhausted without a change, terminate: redirect
//!    once if the state diverged from the initial snapshot, otherwise
//!    pass through.
//!
//! Run state is a per-call local value. It is created when
//! [`Laundromat::wash`] is entered, mutated only by the engine itself
//! (machines can only *propose* changes), and dropped at termination, so
//! interleaved runs sharing one chain can never observe each other's
//! position or counters.

use crate::chain::Laundromat;
use crate::policy::loop_bound;
use http::StatusCode;
use laundromat_core::{Modification, ResponseContext, WashError, WashRequest, WashResult};

/// How a wash cycle terminated, short of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The converged state equals the initial snapshot: the request
    /// passes through and the caller proceeds as usual.
    Clean,

    /// The converged state diverged from the initial snapshot: the
    /// redirect was emitted and the caller must not produce a response
    /// of its own.
    Redirected {
        /// The status the redirect was emitted with.
        status: StatusCode,
        /// The url the redirect points at.
        url: String,
    },
}

/// Ephemeral state of one in-flight run.
struct CycleState {
    current_status: StatusCode,
    current_url: String,
    initial_status: StatusCode,
    initial_url: String,
    position: usize,
    iterations: u32,
}

impl CycleState {
    fn new(status: StatusCode, url: String) -> Self {
        Self {
            current_status: status,
            current_url: url.clone(),
            initial_status: status,
            initial_url: url,
            position: 0,
            iterations: 0,
        }
    }

    /// Merges a validated modification; returns whether anything changed.
    ///
    /// The status and url checks are independent; either alone marks the
    /// state as changed.
    fn apply(&mut self, modification: Modification) -> bool {
        let mut changed = false;
        if let Some(status) = modification.status {
            if status != self.current_status {
                self.current_status = status;
                changed = true;
            }
        }
        if let Some(url) = modification.url {
            if url != self.current_url {
                self.current_url = url;
                changed = true;
            }
        }
        changed
    }

    fn diverged(&self) -> bool {
        self.current_status != self.initial_status || self.current_url != self.initial_url
    }
}

impl Laundromat {
    /// Runs the wash cycle for one request.
    ///
    /// Programmatic requests (`request.is_xhr()`) skip the chain
    /// entirely: zero machines evaluate and no redirect is possible.
    /// Otherwise machines evaluate per the convergence protocol, and on
    /// termination the redirect emitter has been invoked at most once.
    ///
    /// Each call allocates its own run state, so one chain can serve any
    /// number of interleaved runs.
    ///
    /// # Errors
    ///
    /// - [`WashError::Machine`] when a machine reports failure; no
    ///   further machines evaluate and no redirect is emitted.
    /// - [`WashError::InvalidModification`] when a machine's proposal is
    ///   not a key-value mapping of the expected shape; same abort
    ///   semantics.
    /// - [`WashError::LoopBoundExceeded`] when the iteration count
    ///   surpasses [`loop_bound`] for the chain length, i.e. the chain
    ///   oscillates instead of converging.
    pub async fn wash<R: ResponseContext>(
        &self,
        request: &WashRequest,
        response: &mut R,
    ) -> WashResult<Verdict> {
        if request.is_xhr() {
            tracing::debug!(url = request.url(), "programmatic request, skipping wash cycle");
            return Ok(Verdict::Clean);
        }

        let initial_status = response.status_code().unwrap_or(StatusCode::OK);
        let mut state = CycleState::new(initial_status, request.url().to_string());
        let bound = loop_bound(self.len());

        loop {
            state.iterations += 1;

            if state.position == self.len() {
                if state.diverged() {
                    tracing::debug!(
                        status = %state.current_status,
                        url = %state.current_url,
                        iterations = state.iterations,
                        "wash cycle converged on a new destination"
                    );
                    response.emit_redirect(state.current_status, &state.current_url);
                    return Ok(Verdict::Redirected {
                        status: state.current_status,
                        url: state.current_url,
                    });
                }
                tracing::trace!(
                    iterations = state.iterations,
                    "wash cycle converged on the initial state"
                );
                return Ok(Verdict::Clean);
            }

            if state.iterations > bound {
                tracing::warn!(
                    iterations = state.iterations,
                    bound,
                    machines = self.len(),
                    "wash cycle is oscillating, aborting"
                );
                return Err(WashError::loop_bound_exceeded(
                    state.iterations,
                    bound,
                    self.len(),
                ));
            }

            let machine = self.machine(state.position);
            tracing::trace!(
                machine = machine.name(),
                position = state.position,
                iteration = state.iterations,
                "evaluating washing machine"
            );

            let proposal = machine
                .evaluate(request, state.current_status, &state.current_url)
                .await
                .map_err(|source| WashError::machine(machine.name(), source))?;

            let modification = match proposal {
                None => Modification::default(),
                Some(value) => Modification::from_value(&value)
                    .map_err(|source| WashError::invalid_modification(machine.name(), source))?,
            };

            if state.apply(modification) {
                tracing::debug!(
                    machine = machine.name(),
                    status = %state.current_status,
                    url = %state.current_url,
                    "state changed, restarting chain"
                );
                state.position = 0;
            } else {
                state.position += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_detects_status_changes() {
        let mut state = CycleState::new(StatusCode::OK, "/stuff".to_string());
        let changed = state.apply(Modification::default().with_status(StatusCode::SEE_OTHER));
        assert!(changed);
        assert_eq!(state.current_status, StatusCode::SEE_OTHER);
        assert!(state.diverged());
    }

    #[test]
    fn apply_detects_url_changes() {
        let mut state = CycleState::new(StatusCode::OK, "/stuff".to_string());
        let changed = state.apply(Modification::default().with_url("/rinse"));
        assert!(changed);
        assert_eq!(state.current_url, "/rinse");
        assert!(state.diverged());
    }

    #[test]
    fn apply_ignores_identical_values() {
        let mut state = CycleState::new(StatusCode::OK, "/stuff".to_string());
        let changed = state.apply(
            Modification::default()
                .with_status(StatusCode::OK)
                .with_url("/stuff"),
        );
        assert!(!changed);
        assert!(!state.diverged());
    }

    #[test]
    fn apply_of_empty_modification_changes_nothing() {
        let mut state = CycleState::new(StatusCode::OK, "/stuff".to_string());
        assert!(!state.apply(Modification::default()));
    }

    #[test]
    fn state_returning_to_the_snapshot_is_not_divergence() {
        let mut state = CycleState::new(StatusCode::OK, "/stuff".to_string());
        assert!(state.apply(Modification::default().with_url("/rinse")));
        assert!(state.apply(Modification::default().with_url("/stuff")));
        assert!(!state.diverged());
    }
}
