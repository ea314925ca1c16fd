//! Link extraction from arbitrary scraped text.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// One pattern with ordered alternation. Leftmost-first matching consumes a
/// whole `vless://…` or `vmess://…` link before the `ss://` embedded in its
/// scheme can start a match of its own, and `hysteria2`/`ssr` sit before
/// their shorter collisions. A link runs to the next whitespace, quote or
/// angle bracket, not to end of line.
static LINK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:vmess|vless|trojan|hysteria2|hysteria|tuic|ssr|ss)://[^\s"'<>]+"#)
        .unwrap()
});

/// Scans raw text for protocol-prefixed link substrings.
///
/// Returns a set, so repeated postings of the same link collapse here.
/// Text without any match simply produces an empty set.
pub fn extract_links(text: &str) -> HashSet<String> {
    LINK_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
