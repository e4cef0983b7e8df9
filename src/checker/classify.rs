// src/checker/classify.rs
// =============================================================================
// Small predicates that tell what kind of URL an href points at.
//
// These are informational: the detectors report every link regardless of
// its kind, and the inspector only uses the classification for debug logs.
// =============================================================================

// File extensions treated as media (compared case-sensitively)
const MEDIA_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// What an href points at, as far as we can tell from its text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// An image (jpg/jpeg/png)
    Media,
    /// A `javascript:` pseudo-URL
    Javascript,
    /// A `mailto:` address
    Mail,
    /// Anything else (a page, a folder, an external URL...)
    Document,
}

impl LinkKind {
    /// Whether a link of this kind is worth an existence check
    pub fn is_checkable(self) -> bool {
        matches!(self, LinkKind::Document)
    }
}

// True if the text after the last '.' is a media extension
//
// "logo.png" -> true, "logo.PNG" -> false, "png" -> false (no dot)
pub fn is_media_file(url: &str) -> bool {
    url.rsplit_once('.')
        .is_some_and(|(_, extension)| MEDIA_EXTENSIONS.contains(&extension))
}

// True if "javascript:" appears anywhere in the URL
pub fn is_javascript(url: &str) -> bool {
    url.contains("javascript:")
}

// True if the URL is a mailto: link
pub fn is_mail(url: &str) -> bool {
    url.starts_with("mailto:")
}

// Combines the predicates above (javascript wins over mail, mail over media)
pub fn classify(url: &str) -> LinkKind {
    if is_javascript(url) {
        LinkKind::Javascript
    } else if is_mail(url) {
        LinkKind::Mail
    } else if is_media_file(url) {
        LinkKind::Media
    } else {
        LinkKind::Document
    }
}
