// src/fetch/mod.rs
// =============================================================================
// Everything between "I want this URL" and "it's a file on disk".
//
// Submodules:
// - names: URL -> safe flat file name
// - transport: the HTTP client behind a small trait
// - cache: skip-if-exists downloading with the politeness pause
// =============================================================================

mod cache;
mod names;
mod transport;

#[cfg(test)]
pub mod mock;

pub use cache::{FetchCache, FetchOutcome};
pub use names::{path_component, sanitize};
pub use transport::{HttpTransport, Transport};
