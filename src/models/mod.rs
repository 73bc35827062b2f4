//! Data models for the fan hub backend.
//!
//! JSON field names are camelCase to match the form and bot clients.

mod classification;
mod fan;
mod news;
mod snapshot;

pub use classification::*;
pub use fan::*;
pub use news::*;
pub use snapshot::*;
