//! Input and Derived Cells
//!
//! The store's state is a set of cells of exactly two kinds:
//!
//! - [`Input`]: written directly, by the external ingestion layer or by a
//!   user edit. The only cells a write handler may push into.
//! - [`Derived`]: written only by the store's own recompute pass; outside
//!   the store crate it is read-only.
//!
//! Both kinds carry an explicit absent state: a value that cannot be
//! computed yet (missing price, no vault selected) is `None`, never a
//! sentinel number. The split is what rules out derivation cycles by
//! construction: the bidirectional creation solver works by one cell's
//! write handler pushing into its sibling's *input* slot, not by two
//! derived cells depending on each other.

/// An externally- or user-writable slot with an explicit absent state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input<T> {
    value: Option<T>,
}

impl<T> Input<T> {
    /// An absent input
    pub fn empty() -> Self {
        Self { value: None }
    }

    /// Replaces the value
    pub fn set(&mut self, value: T) {
        self.value = Some(value);
    }

    /// Resets to absent
    pub fn clear(&mut self) {
        self.value = None;
    }

    /// Current value, if any
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// True when a value is present
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

impl<T> Default for Input<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// A slot recomputed by the store; read-only outside the store crate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derived<T> {
    value: Option<T>,
}

impl<T> Derived<T> {
    /// An absent derived value
    pub fn empty() -> Self {
        Self { value: None }
    }

    /// Current value, if any
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// True when a value is present
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Writer reserved for the recompute pass
    pub(crate) fn write(&mut self, value: Option<T>) {
        self.value = value;
    }
}

impl<T> Default for Derived<T> {
    fn default() -> Self {
        Self::empty()
    }
}
