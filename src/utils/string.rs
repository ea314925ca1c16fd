//! String utilities for display names and scraped markup

use crate::utils::url::url_decode;

/// Sanitizes a display name extracted from a URI fragment or embedded JSON.
///
/// Percent-decodes the value, strips C0/C1 control characters and trims
/// surrounding whitespace. Applying it twice yields the same result as once
/// for any already-clean name.
pub fn clean_name(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let decoded = url_decode(name);
    let stripped: String = decoded
        .chars()
        .filter(|c| {
            let cp = *c as u32;
            !(cp <= 0x1f || (0x7f..=0x9f).contains(&cp))
        })
        .collect();
    stripped.trim().to_string()
}

/// Reduces an HTML document to the visible text a reader would see.
///
/// Tags are dropped, `script`/`style` bodies are skipped entirely and the
/// handful of entities that show up in scraped pages are decoded. This is
/// deliberately not a full HTML parser; link extraction only needs the text
/// between tags.
pub fn html_to_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len() / 2);
    let mut chars = html.char_indices().peekable();
    let mut skip_until: Option<&str> = None;

    while let Some((pos, c)) = chars.next() {
        let rest = &html[pos..];
        if let Some(end_tag) = skip_until {
            if c == '<' && starts_with_ignore_case(rest, end_tag) {
                skip_until = None;
                for (_, tc) in chars.by_ref() {
                    if tc == '>' {
                        break;
                    }
                }
                text.push(' ');
            }
            continue;
        }
        if c == '<' {
            if starts_with_ignore_case(rest, "<script") {
                skip_until = Some("</script>");
            } else if starts_with_ignore_case(rest, "<style") {
                skip_until = Some("</style>");
            }
            // consume to the closing '>'
            for (_, tc) in chars.by_ref() {
                if tc == '>' {
                    break;
                }
            }
            text.push(' ');
        } else {
            text.push(c);
        }
    }

    decode_entities(&text)
}

fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn decode_entities(input: &str) -> String {
    input
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_name_percent_decodes() {
        assert_eq!(clean_name("My%20Server"), "My Server");
    }

    #[test]
    fn test_clean_name_strips_controls() {
        assert_eq!(clean_name("a\x01b\x7fc\u{9f}d"), "abcd");
    }

    #[test]
    fn test_clean_name_trims() {
        assert_eq!(clean_name("  spaced out  "), "spaced out");
    }

    #[test]
    fn test_clean_name_idempotent() {
        let once = clean_name("%20Fast\x02 Node \u{8f}");
        assert_eq!(clean_name(&once), once);
    }

    #[test]
    fn test_clean_name_empty() {
        assert_eq!(clean_name(""), "");
    }

    #[test]
    fn test_html_to_text_drops_tags_and_scripts() {
        let html = "<html><script>var x = 'vmess://junk';</script><p>vless://real&amp;more</p></html>";
        let text = html_to_text(html);
        assert!(!text.contains("junk"));
        assert!(text.contains("vless://real&more"));
    }

    #[test]
    fn test_html_to_text_separates_adjacent_tags() {
        let text = html_to_text("<div>ss://one</div><div>ss://two</div>");
        assert!(text.contains("ss://one "));
        assert!(text.contains("ss://two"));
    }
}
