//! URI re-encoding with a new display name.
//!
//! Every rebuild derives a fresh string from `record.original` and preserves
//! every component it does not intend to change. A rebuild that cannot be
//! performed falls back to the original link so a bad record never aborts a
//! batch.

use serde_json::Value;

use crate::models::{Protocol, ProxyRecord};
use crate::utils::{base64_encode, fragment_encode, safe_base64_decode};

/// Re-serializes the record's original URI with `name` substituted as its
/// display name. All other fields pass through untouched.
pub fn rebuild_uri(record: &ProxyRecord, name: &str) -> String {
    match record.protocol {
        Protocol::Vmess => {
            rebuild_vmess(&record.original, name).unwrap_or_else(|| record.original.clone())
        }
        // SSR metadata is not modeled, so the link is republished verbatim
        Protocol::Ssr => record.original.clone(),
        Protocol::Vless
        | Protocol::Trojan
        | Protocol::Ss
        | Protocol::Hysteria
        | Protocol::Hysteria2
        | Protocol::Tuic => rebuild_fragment(&record.original, name),
    }
}

/// Decodes the base64 JSON payload, overwrites `ps`, and reassembles the
/// link. `None` when the original payload cannot be decoded.
fn rebuild_vmess(original: &str, name: &str) -> Option<String> {
    let prefix_len = Protocol::Vmess.scheme_prefix().len();
    let payload = original.get(prefix_len..)?;

    let decoded = safe_base64_decode(payload);
    if decoded.is_empty() {
        return None;
    }

    let mut json: Value = serde_json::from_str(&decoded).ok()?;
    let object = json.as_object_mut()?;
    object.insert("ps".to_string(), Value::String(name.to_string()));

    let serialized = serde_json::to_string(&json).ok()?;
    Some(format!("vmess://{}", base64_encode(&serialized)))
}

/// Truncates the original at the first `#` and appends the new
/// percent-encoded fragment.
fn rebuild_fragment(original: &str, name: &str) -> String {
    let base = match original.find('#') {
        Some(pos) => &original[..pos],
        None => original,
    };
    format!("{}#{}", base, fragment_encode(name))
}
