//! The loop-bound policy.

/// Maximum number of iterations permitted for a chain of `machines`
/// steps, defined as `n·(n+3)/2`.
///
/// The bound caps the (position, restart) interactions a run can perform
/// before the engine must conclude the chain is oscillating rather than
/// converging. It is deliberately larger than `n`: every restart
/// re-walks the chain, and a bounded number of restarts is legitimate
/// convergence behavior. It is computed once per run, at run start, from
/// the chain length at that time.
///
/// # Example
///
/// ```
/// use laundromat::loop_bound;
///
/// assert_eq!(loop_bound(2), 5);
/// assert_eq!(loop_bound(3), 9);
/// ```
#[must_use]
pub fn loop_bound(machines: usize) -> u32 {
    let n = u32::try_from(machines).unwrap_or(u32::MAX);
    n.saturating_mul(n.saturating_add(3)) / 2
}
