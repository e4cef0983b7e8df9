// src/checker/not_found.rs
// =============================================================================
// Finds links whose target does not exist on disk.
//
// Every href is joined onto the folder that holds the HTML file and checked
// with Path::exists(). There is no scheme detection: "https://example.com"
// becomes "<folder>/https://example.com", which will not exist, so external
// links are reported too. Query strings and fragments are kept as part of
// the file name for the same reason.
//
// An absolute href such as "/etc/hosts" replaces the folder entirely
// (that is how Path::join works) and is checked as-is.
// =============================================================================

use std::path::Path;

use super::{dedup_preserving_order, extract_links};

// Returns the hrefs in `html` that do not resolve to an existing path
//
// Parameters:
//   html: the full page text
//   base_dir: the folder containing the page
//
// Returns: unique hrefs, in the order they first appear in the page
pub fn find_not_found_links(html: &str, base_dir: &Path) -> Vec<String> {
    let missing = extract_links(html)
        .into_iter()
        .filter(|link| !base_dir.join(link).exists());

    dedup_preserving_order(missing)
}
