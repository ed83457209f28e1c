//! The washing machine chain.
//!
//! A [`Laundromat`] is an append-only, ordered collection of washing
//! machines. Registration order is significant: it defines both the
//! evaluation order of a run and the target a run restarts from after a
//! machine proposes a change.
//!
//! Registration takes `&mut self` while a run borrows `&self`, so the
//! chain cannot change while a run is in flight; during runs it is
//! read-only and may be shared freely across concurrent requests.

use laundromat_core::WashingMachine;
use std::sync::Arc;

/// An ordered chain of washing machines.
///
/// # Example
///
/// ```
/// use laundromat::Laundromat;
/// use laundromat_core::fixtures::InertMachine;
///
/// let mut laundromat = Laundromat::new();
/// laundromat.register(InertMachine).register(InertMachine);
///
/// assert_eq!(laundromat.len(), 2);
/// assert_eq!(laundromat.machine_names(), ["inert", "inert"]);
/// ```
#[derive(Default)]
pub struct Laundromat {
    machines: Vec<Arc<dyn WashingMachine>>,
}

impl Laundromat {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a machine to the chain.
    ///
    /// Returns the chain itself to permit chained registration.
    pub fn register<M: WashingMachine>(&mut self, machine: M) -> &mut Self {
        self.register_arc(Arc::new(machine))
    }

    /// Appends an already-shared machine to the chain.
    pub fn register_arc(&mut self, machine: Arc<dyn WashingMachine>) -> &mut Self {
        self.machines.push(machine);
        self
    }

    /// Returns the number of registered machines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.machines.len()
    }

    /// Returns `true` when no machine is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    /// Returns the machine names in evaluation order.
    #[must_use]
    pub fn machine_names(&self) -> Vec<&'static str> {
        self.machines.iter().map(|machine| machine.name()).collect()
    }

    /// The machine at the given chain position.
    pub(crate) fn machine(&self, position: usize) -> &dyn WashingMachine {
        self.machines[position].as_ref()
    }
}

impl std::fmt::Debug for Laundromat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Laundromat")
            .field("machines", &self.machine_names())
            .finish()
    }
}
