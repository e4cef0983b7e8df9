// src/checker/unclosed.rs
// =============================================================================
// Finds <a> tags that are never closed.
//
// We deliberately do NOT build a DOM for this. An HTML parser silently fixes
// up a missing </a>, which is exactly the mistake we want to see. Instead we
// look at the raw text:
//
// 1. Record the byte offset of every "<a " (opening marker) and every
//    "</a>" (closing marker).
// 2. Same number of each? Report nothing. This is a count check, not a
//    proof: badly nested but balanced anchors pass.
// 3. Otherwise walk the openings two at a time, (opening, next_opening),
//    with a cursor on the closings. If the current closing sits strictly
//    between the two openings, the opening is matched and the cursor moves
//    on. If not, the opening is unmatched. Once the last closing has been
//    consumed the cursor stays on it, so every later opening is unmatched.
// 4. Tail: with no closings at all every opening is unmatched. Otherwise
//    the last opening is unmatched when it starts after the cursor.
// 5. For each unmatched opening, cut the text from the marker to the first
//    '>' (the whole opening tag) and pull the href out of it.
//
// Example:
//   <a href="x">text</a> <a href="y">
//   openings = [0, 21], closings = [16]
//   pair (0, 21): 0 < 16 < 21 -> matched, cursor stays on 16 (no more closings)
//   tail: 21 > 16 -> unmatched
//   result = ["y"]
// =============================================================================

use super::{dedup_preserving_order, extract_links};

const OPENING_MARKER: &str = "<a ";
const CLOSING_MARKER: &str = "</a>";

/// Byte offsets of every opening and closing anchor marker in a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorMarkers {
    pub openings: Vec<usize>,
    pub closings: Vec<usize>,
}

impl AnchorMarkers {
    /// Scans `html` for "<a " and "</a>", in document order
    pub fn scan(html: &str) -> Self {
        Self {
            openings: html.match_indices(OPENING_MARKER).map(|(pos, _)| pos).collect(),
            closings: html.match_indices(CLOSING_MARKER).map(|(pos, _)| pos).collect(),
        }
    }

    /// Offsets of the openings that have no matching closing marker
    pub fn unmatched_openings(&self) -> Vec<usize> {
        let openings = &self.openings;

        if openings.len() == self.closings.len() {
            return Vec::new();
        }

        let mut closings = self.closings.iter().copied();
        let Some(mut closing) = closings.next() else {
            // Nothing is ever closed
            return openings.clone();
        };

        let mut unmatched = Vec::new();

        for pair in openings.windows(2) {
            let (opening, next_opening) = (pair[0], pair[1]);

            if opening < closing && closing < next_opening {
                if let Some(next_closing) = closings.next() {
                    closing = next_closing;
                }
            } else {
                unmatched.push(opening);
            }
        }

        // `windows(2)` never treats the last opening as `opening`
        if let Some(&last) = openings.last() {
            if last > closing {
                unmatched.push(last);
            }
        }

        unmatched
    }
}

// Returns the hrefs of anchor tags in `html` that are never closed
//
// Returns: unique hrefs, in the order their unmatched tags appear
pub fn find_unclosed_links(html: &str) -> Vec<String> {
    let unmatched = AnchorMarkers::scan(html).unmatched_openings();

    let links = unmatched
        .into_iter()
        .flat_map(|start| extract_links(opening_tag_at(html, start)));

    dedup_preserving_order(links)
}

// The text of the tag starting at `start`, up to and including the first '>'
//
// A tag that never closes its bracket runs to the end of the input.
fn opening_tag_at(html: &str, start: usize) -> &str {
    let rest = &html[start..];
    match rest.find('>') {
        Some(end) => &rest[..=end],
        None => rest,
    }
}
