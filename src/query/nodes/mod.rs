//! Leaf node implementations
//!
//! One leaf type per evaluation mode: boolean, span-collecting, and
//! index-resolving.

mod entry;
mod index_entry;
mod search_entry;

pub use entry::Entry;
pub use index_entry::IndexEntry;
pub use search_entry::SearchEntry;
