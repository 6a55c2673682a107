//! Paste link extraction.
//!
//! Submissions reference their logs through paste.ee share links.
//! The share URL (`/p/<id>`) serves an HTML page; the raw log body
//! lives at the `/r/<id>` endpoint, so extracted links are rewritten
//! before fetching.

use std::sync::OnceLock;

use regex::Regex;

fn paste_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"https://paste\.ee/p/[^\s/]+").unwrap_or_else(|e| {
            // Pattern is a compile-time constant; this cannot fail
            unreachable!("invalid paste link pattern: {e}")
        })
    })
}

/// Extract all paste links from a submission text, rewritten to their
/// raw endpoints.
///
/// Returns an empty vector when the text carries no paste links; such
/// submissions are outside the daemon's interest.
pub fn extract_raw_links(text: &str) -> Vec<String> {
    paste_link_regex()
        .find_iter(text)
        .map(|m| m.as_str().replacen("/p/", "/r/", 1))
        .collect()
}
