//! Fallback classification for quote errors.

/// How the fetch pipeline should react to an error.
///
/// Classification is decided by [`QuoteError::fallback_class`]
/// (crate::errors::QuoteError::fallback_class) and drives both the relay
/// retry loop and the degradation chain.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FallbackClass {
    /// Penalize the current relay and retry through the next-best one.
    /// Transport faults, timeouts, and unexpected payload shapes land here;
    /// they are indistinguishable from a bad relay.
    NextRelay,

    /// Switching relays will not help. Skip straight to the degradation
    /// chain (static table, then simulated).
    Degrade,

    /// Caller programming error. Surfaced as-is, never absorbed.
    Propagate,
}
