use crate::models::{Protocol, ProxyRecord, Transport};
use crate::parser::DecodeError;
use crate::utils::safe_base64_decode;

/// Parse a ShadowsocksR link into a record.
///
/// The payload decodes to a colon-delimited string of at least six fields;
/// only address and port are modeled. Protocol, obfuscation and the other
/// legacy SSR fields are dropped, which also means SSR links are never
/// re-encoded.
pub fn explode_ssr(link: &str) -> Result<ProxyRecord, DecodeError> {
    let payload = &link[Protocol::Ssr.scheme_prefix().len()..];

    let decoded = safe_base64_decode(payload);
    if decoded.is_empty() {
        return Err(DecodeError::Base64);
    }

    let parts: Vec<&str> = decoded.split(':').collect();
    if parts.len() < 6 {
        return Err(DecodeError::TooFewFields);
    }

    Ok(ProxyRecord {
        protocol: Protocol::Ssr,
        address: parts[0].to_string(),
        port: parts[1].to_string(),
        identity: String::new(),
        transport: Transport::Ssr,
        display_name: String::new(),
        country: None,
        cdn: None,
        ip: None,
        original: link.to_string(),
    })
}
