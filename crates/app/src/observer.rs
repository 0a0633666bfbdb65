//! Observer registry: how many clients are watching a resource.

/// Count of active observers. Never negative.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ObserverRegistry {
    count: usize,
}

impl ObserverRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one observer and return the new count.
    pub fn subscribe(&mut self) -> usize {
        self.count = self.count.saturating_add(1);
        self.count
    }

    /// Drop one observer and return the new count.
    ///
    /// Unsubscribing with no observers left keeps the count at zero.
    pub fn unsubscribe(&mut self) -> usize {
        self.count = self.count.saturating_sub(1);
        self.count
    }

    /// Forget every observer, e.g. after the transport reports none reachable.
    pub fn reset(&mut self) {
        self.count = 0;
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn has_observers(&self) -> bool {
        self.count > 0
    }
}
