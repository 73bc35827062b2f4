//! Team page scraping: source, parser and the read-through cache in front of them.

mod cache;
mod parser;
mod source;

pub use cache::SnapshotCache;
pub use parser::{PageLinks, PageParser};
pub use source::{HttpPageSource, PageSource};
