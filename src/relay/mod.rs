//! Relay transport layer.
//!
//! Third-party quote providers sit behind browser-origin restrictions, so
//! every request is routed through one of several untrusted public relay
//! endpoints. This module contains:
//!
//! - [`RelayPool`]: failure-count ranking and rotation over the configured
//!   endpoints
//! - [`RelayShape`]: tagged decoding of the relay's response envelope
//! - [`RelayTransport`]: the HTTP seam (with a `reqwest` implementation)

mod pool;
mod shape;
mod transport;

pub use pool::{RelayEndpoint, RelayPool, RelaySelection};
pub use shape::RelayShape;
pub use transport::{HttpTransport, RelayTransport};
