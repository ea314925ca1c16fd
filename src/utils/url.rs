//! URL encoding/decoding utilities

/// Decodes a URL-encoded string.
///
/// Returns the original string if decoding fails, so callers never have to
/// handle malformed percent sequences in scraped input.
pub fn url_decode(input: &str) -> String {
    urlencoding::decode(input)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| input.to_string())
}

/// Encodes a string using URL encoding.
pub fn url_encode(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

/// Percent-encodes a display name for use as a URI fragment.
///
/// Unreserved ASCII and every non-ASCII code point (country flag emoji in
/// particular) are left literal so the name stays readable in clients;
/// everything else is percent-encoded.
pub fn fragment_encode(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for c in input.chars() {
        if !c.is_ascii() || c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~') {
            result.push(c);
        } else {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).as_bytes() {
                result.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    result
}
