//! Progress observer port notified once per identity.

/// Receives batch progress notifications. Purely informational.
pub trait ProgressObserver {
    /// Called before resolving the identity at 1-based `current` of `total`.
    fn on_progress(&self, current: usize, total: usize, display_name: &str);
}

impl<F> ProgressObserver for F
where
    F: Fn(usize, usize, &str),
{
    fn on_progress(&self, current: usize, total: usize, display_name: &str) {
        self(current, total, display_name);
    }
}

/// Observer that reports progress through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_progress(&self, current: usize, total: usize, display_name: &str) {
        tracing::info!(current, total, display_name, "resolving identity");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn closures_are_observers() {
        let seen = RefCell::new(Vec::new());
        let observer = |current: usize, total: usize, name: &str| {
            seen.borrow_mut().push(format!("{current}/{total} {name}"));
        };
        observer.on_progress(1, 2, "Jane");
        observer.on_progress(2, 2, "John");
        assert_eq!(*seen.borrow(), vec!["1/2 Jane", "2/2 John"]);
    }
}
