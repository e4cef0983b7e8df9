// src/checker/html.rs
// =============================================================================
// This module extracts links from HTML.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// html5ever never rejects input. Broken or truncated markup still produces a
// tree, so a fragment that ends mid-tag simply yields fewer (or zero) links.
//
// We parse with scripting turned off. With scripting on (scraper's default)
// the inside of <noscript> is kept as plain text and links in it vanish.
//
// Unlike a browser we do NOT resolve or normalize the href. The exact text
// from the markup is what ends up in the report.
// =============================================================================

use html5ever::driver::{self, ParseOpts};
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{local_name, namespace_url, ns, QualName};
use scraper::{Html, Selector};

// Extracts every href value from <a> tags, in document order
//
// Parameters:
//   html: a whole page or just a fragment such as a single opening tag
//
// Returns: Vec<String> with the raw href values (tags without href are skipped)
//
// Example:
//   html = "<a href='docs/index.html'>Docs</a><a name='top'></a>"
//   result = ["docs/index.html"]
pub fn extract_links(html: &str) -> Vec<String> {
    // "a[href]" is a constant selector, so parsing it cannot fail at runtime
    let selector = Selector::parse("a[href]").expect("a[href] is a valid selector");

    let fragment = parse_without_scripting(html);

    fragment
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

// Same as Html::parse_fragment, but with scripting disabled
fn parse_without_scripting(html: &str) -> Html {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };

    driver::parse_fragment(
        Html::new_fragment(),
        opts,
        QualName::new(None, ns!(html), local_name!("body")),
        Vec::new(),
    )
    .one(html)
}
