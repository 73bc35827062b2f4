//! Fan data verification: identity checks and content classification.

pub mod classifier;
pub mod identity;
mod link;

pub use classifier::{classify, KeywordSet};
pub use link::LinkValidator;
