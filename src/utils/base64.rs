use base64::{engine::general_purpose, Engine as _};

use crate::utils::url::url_decode;

/// Encodes a string to Base64 format.
pub fn base64_encode(input: &str) -> String {
    general_purpose::STANDARD.encode(input)
}

/// Decodes a Base64 segment copied out of scraped text.
///
/// Scraped payloads come with encoding noise, so before decoding the input is
/// percent-decoded, trimmed, translated from the URL-safe alphabet to the
/// standard one, and padded to a multiple of 4. Invalid UTF-8 in the decoded
/// bytes is replaced rather than raised.
///
/// # Returns
/// The decoded string, or an empty string if the input is not valid Base64.
pub fn safe_base64_decode(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let mut data = url_decode(input).trim().to_string();
    data = data.replace('-', "+").replace('_', "/");

    let padding = (4 - data.len() % 4) % 4;
    for _ in 0..padding {
        data.push('=');
    }

    match general_purpose::STANDARD.decode(&data) {
        Ok(decoded) => String::from_utf8_lossy(&decoded).to_string(),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    #[test]
    fn test_safe_base64_decode_standard() {
        assert_eq!(safe_base64_decode("aGVsbG8="), "hello");
    }

    #[test]
    fn test_safe_base64_decode_missing_padding() {
        assert_eq!(safe_base64_decode("aGVsbG8"), "hello");
    }

    #[test]
    fn test_safe_base64_decode_url_safe_alphabet() {
        let encoded = URL_SAFE_NO_PAD.encode("hi>there?");
        assert_eq!(safe_base64_decode(&encoded), "hi>there?");
    }

    #[test]
    fn test_safe_base64_decode_percent_encoded() {
        assert_eq!(safe_base64_decode("aGVsbG8%3D"), "hello");
    }

    #[test]
    fn test_safe_base64_decode_surrounding_whitespace() {
        assert_eq!(safe_base64_decode("  aGVsbG8=  "), "hello");
    }

    #[test]
    fn test_safe_base64_decode_invalid() {
        assert_eq!(safe_base64_decode("!!!not base64!!!"), "");
    }

    #[test]
    fn test_base64_encode_round_trip() {
        assert_eq!(
            safe_base64_decode(&base64_encode("méthode:pass")),
            "méthode:pass"
        );
    }
}
