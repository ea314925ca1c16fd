pub mod hysteria;
pub mod ss;
pub mod ssr;
pub mod trojan;
pub mod tuic;
pub mod vless;
pub mod vmess;

use url::Url;

use crate::parser::DecodeError;

/// Strips IPv6 brackets from a host literal; hostnames pass through.
pub(crate) fn strip_brackets(host: &str) -> String {
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host)
        .to_string()
}

/// Pulls host and optional port out of a parsed URI authority.
pub(crate) fn host_port(url: &Url) -> Result<(String, String), DecodeError> {
    let host = url.host_str().ok_or(DecodeError::MissingHost)?;
    if host.is_empty() {
        return Err(DecodeError::MissingHost);
    }
    let port = url.port().map(|p| p.to_string()).unwrap_or_default();
    Ok((strip_brackets(host), port))
}
