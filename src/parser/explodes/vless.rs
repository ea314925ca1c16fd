use std::collections::HashMap;

use url::Url;

use crate::models::{Protocol, ProxyRecord, Transport};
use crate::parser::explodes::host_port;
use crate::parser::DecodeError;
use crate::utils::{clean_name, url_decode};

/// Parse a VLESS link into a record.
///
/// Standard URI form `vless://<uuid>@<host>:<port>?<query>#<fragment>`,
/// parsed with the generic URI grammar so bracketed IPv6 hosts and encoded
/// query values survive. The UUID comes from the userinfo slot, with an `id`
/// query parameter as fallback. Only a scheme mismatch or a missing host is
/// a failure.
pub fn explode_vless(link: &str) -> Result<ProxyRecord, DecodeError> {
    let url = Url::parse(link).map_err(|_| DecodeError::BadUri)?;
    if url.scheme() != "vless" {
        return Err(DecodeError::UnknownScheme);
    }

    let (address, port) = host_port(&url)?;

    let mut params = HashMap::new();
    for (key, value) in url.query_pairs() {
        params.insert(key.to_string(), value.to_string());
    }
    let param = |key: &str| params.get(key).cloned().unwrap_or_default();

    let mut identity = url_decode(url.username());
    if identity.is_empty() {
        identity = param("id");
    }

    let fingerprint = if params.contains_key("fp") {
        param("fp")
    } else {
        param("fingerprint")
    };
    let host = if params.contains_key("host") {
        param("host")
    } else {
        param("authority")
    };

    Ok(ProxyRecord {
        protocol: Protocol::Vless,
        address,
        port,
        identity,
        transport: Transport::Vless {
            network: param("type"),
            security: param("security"),
            flow: param("flow"),
            encryption: param("encryption"),
            header_type: param("headerType"),
            fingerprint,
            sni: param("sni"),
            host,
        },
        display_name: clean_name(url.fragment().unwrap_or("")),
        country: None,
        cdn: None,
        ip: None,
        original: link.to_string(),
    })
}
