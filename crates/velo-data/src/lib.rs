//! Resilience and signaling primitives for VeloCommerce.
//!
//! - [`retry`]: bounded exponential-backoff retry around fallible async
//!   operations, with retryable/fatal classification and cancellation.
//! - [`cancel`]: clonable cancellation tokens honored between attempts and
//!   during backoff sleeps.
//! - [`signal`]: the cross-component refresh-signal bus that keeps
//!   independently mounted display surfaces in a consistent loading state
//!   during asynchronous navigation.

pub mod cancel;
pub mod retry;
pub mod signal;

pub use cancel::CancelToken;
pub use retry::{retry, RetryError, RetryPolicy};
pub use signal::{LoadingGate, RefreshKind, SignalBus};
