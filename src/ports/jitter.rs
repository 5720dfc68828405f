//! Jitter port supplying the random part of the inter-identity delay.

/// Produces uniformly distributed delay jitter.
///
/// Injected so batch timing is reproducible under a fixed seed or a fixed
/// test value.
pub trait JitterSource: Send + Sync {
    /// Returns a value in `[0, ceiling_ms)`, or 0 when `ceiling_ms` is 0.
    fn jitter_ms(&self, ceiling_ms: u64) -> u64;
}
