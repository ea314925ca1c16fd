use serde_json::Value;

use crate::models::{Protocol, ProxyRecord, Transport};
use crate::parser::DecodeError;
use crate::utils::{clean_name, safe_base64_decode};

/// Parse a VMess link into a record.
///
/// The payload after `vmess://` is base64-wrapped JSON. `add`, `port` and
/// `id` are required; everything else is optional and kept empty when
/// absent. `port` may arrive as a JSON number or string.
pub fn explode_vmess(link: &str) -> Result<ProxyRecord, DecodeError> {
    let payload = &link[Protocol::Vmess.scheme_prefix().len()..];

    let decoded = safe_base64_decode(payload);
    if decoded.is_empty() {
        return Err(DecodeError::Base64);
    }

    let json: Value = serde_json::from_str(&decoded).map_err(|_| DecodeError::Json)?;
    if !json.is_object() {
        return Err(DecodeError::Json);
    }

    let address = json["add"].as_str().unwrap_or("").to_string();
    if address.is_empty() {
        return Err(DecodeError::MissingHost);
    }

    let port = match &json["port"] {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    };
    if port.is_empty() {
        return Err(DecodeError::MissingPort);
    }

    let identity = json["id"].as_str().unwrap_or("").to_string();
    if identity.is_empty() {
        return Err(DecodeError::MissingField("id"));
    }

    let field = |key: &str| json[key].as_str().unwrap_or("").to_string();

    Ok(ProxyRecord {
        protocol: Protocol::Vmess,
        address,
        port,
        identity,
        transport: Transport::Vmess {
            network: field("net"),
            host: field("host"),
            sni: field("sni"),
            header_type: field("type"),
            cipher: field("scy"),
            tls: field("tls"),
        },
        display_name: clean_name(&field("ps")),
        country: None,
        cdn: None,
        ip: None,
        original: link.to_string(),
    })
}
