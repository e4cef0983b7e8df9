// src/checker/mod.rs
// =============================================================================
// This module contains all per-document link checking logic.
//
// Submodules:
// - html: Extracts href values from HTML (whole pages or single tags)
// - classify: Tells media / javascript: / mailto: links apart
// - not_found: Reports links whose target is missing on disk
// - unclosed: Reports <a> tags that are never closed
//
// Nothing in here touches shared state; every function works on one
// document's text, which keeps them easy to test.
// =============================================================================

mod classify;
mod html;
mod not_found;
mod unclosed;

use std::collections::HashSet;
use std::hash::Hash;

pub use classify::classify;
pub use html::extract_links;
pub use not_found::find_not_found_links;
pub use unclosed::find_unclosed_links;

// Drops repeated items, keeping the first occurrence of each
//
// Example: ["b", "a", "b"] -> ["b", "a"]
pub(crate) fn dedup_preserving_order<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
