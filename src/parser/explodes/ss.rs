use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Protocol, ProxyRecord, Transport};
use crate::parser::explodes::strip_brackets;
use crate::parser::DecodeError;
use crate::utils::{clean_name, safe_base64_decode, url_decode};

/// Cipher family prefixes accepted when validating a base64-decoded
/// userinfo. An unlisted method makes the decoder fall back to the
/// plaintext interpretation of the userinfo.
const CIPHER_FAMILIES: [&str; 10] = [
    "aes-",
    "chacha20",
    "xchacha20",
    "2022-blake3-",
    "rc4",
    "salsa20",
    "bf-",
    "camellia-",
    "plain",
    "none",
];

static METHOD_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9._\-]+$").unwrap());
static PLAIN_USERINFO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9._\-]+):(.+)$").unwrap());

fn is_recognized_cipher(method: &str) -> bool {
    if !METHOD_TOKEN.is_match(method) {
        return false;
    }
    let lower = method.to_ascii_lowercase();
    CIPHER_FAMILIES
        .iter()
        .any(|family| lower.starts_with(family))
}

/// Splits `host:port`, stripping IPv6 brackets. The port must be a real
/// TCP port for the address to count as determined.
fn split_server(server_part: &str) -> Option<(String, String)> {
    let (host, port) = server_part.rsplit_once(':')?;
    if host.is_empty() {
        return None;
    }
    match port.parse::<u16>() {
        Ok(p) if p > 0 => Some((strip_brackets(host), port.to_string())),
        _ => None,
    }
}

/// Extracts and sanitizes the `plugin` query parameter: percent-decoded,
/// truncated at the first `;`, and restricted to a safe charset.
fn extract_plugin(query: &str) -> String {
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if key == "plugin" {
            let mut plugin = url_decode(&value);
            if let Some(pos) = plugin.find(';') {
                plugin.truncate(pos);
            }
            let plugin = plugin.trim();
            if METHOD_TOKEN.is_match(plugin) {
                return plugin.to_string();
            }
            return String::new();
        }
    }
    String::new()
}

/// Parse a Shadowsocks link into a record.
///
/// Both legal wire forms are supported: SIP002
/// (`ss://<userinfo>@<host>:<port>[?query][#fragment]`, userinfo either
/// base64(`method:password`) or already plaintext) and the legacy form where
/// the entire `method:password@host:port` blob is base64-encoded.
///
/// Acceptance is deliberately lenient: a record is returned whenever
/// address and port can be determined, even if the credentials could not be
/// read; method and password are then left empty.
pub fn explode_ss(link: &str) -> Result<ProxyRecord, DecodeError> {
    let mut content = link[Protocol::Ss.scheme_prefix().len()..].to_string();
    content = content.replace("/?", "?");

    let mut display_name = String::new();
    if let Some(pos) = content.find('#') {
        display_name = clean_name(&content[pos + 1..]);
        content.truncate(pos);
    }

    let mut method = String::new();
    let mut password = String::new();
    let mut plugin = String::new();
    let address;
    let port;

    if let Some(at) = content.rfind('@') {
        // SIP002 or plaintext form: userinfo@host:port[?query]
        let userinfo = &content[..at];
        let mut server_part = &content[at + 1..];

        if let Some(q) = server_part.find('?') {
            plugin = extract_plugin(&server_part[q + 1..]);
            server_part = &server_part[..q];
        }

        let (a, p) = split_server(server_part).ok_or(DecodeError::MissingPort)?;
        address = a;
        port = p;

        let decoded = safe_base64_decode(userinfo);
        if let Some((m, pw)) = decoded.split_once(':') {
            if is_recognized_cipher(m) {
                method = m.to_string();
                password = pw.to_string();
            }
        }
        if method.is_empty() {
            if let Some(caps) = PLAIN_USERINFO.captures(userinfo) {
                method = caps[1].to_string();
                password = caps[2].to_string();
            }
        }
    } else {
        // Legacy form: the entire authority lives inside the base64 blob
        let decoded = safe_base64_decode(&content);
        let decoded = decoded.trim();
        let at = decoded.rfind('@').ok_or(DecodeError::BadUri)?;
        let userinfo = &decoded[..at];
        let mut server_part = &decoded[at + 1..];

        if let Some(q) = server_part.find('?') {
            plugin = extract_plugin(&server_part[q + 1..]);
            server_part = &server_part[..q];
        }

        let (a, p) = split_server(server_part).ok_or(DecodeError::MissingPort)?;
        address = a;
        port = p;

        if let Some((m, pw)) = userinfo.split_once(':') {
            method = m.to_string();
            password = pw.to_string();
        }
    }

    Ok(ProxyRecord {
        protocol: Protocol::Ss,
        address,
        port,
        identity: password,
        transport: Transport::Ss { method, plugin },
        display_name,
        country: None,
        cdn: None,
        ip: None,
        original: link.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::base64_encode;

    #[test]
    fn test_explode_ss_sip002_base64_userinfo() {
        // base64("aes-256-gcm:pass")
        let link = "ss://YWVzLTI1Ni1nY206cGFzcw==@1.2.3.4:8388#old";
        let record = explode_ss(link).unwrap();

        assert_eq!(record.address, "1.2.3.4");
        assert_eq!(record.port, "8388");
        assert_eq!(record.identity, "pass");
        assert_eq!(record.display_name, "old");
        match &record.transport {
            Transport::Ss { method, .. } => assert_eq!(method, "aes-256-gcm"),
            other => panic!("wrong transport variant: {:?}", other),
        }
    }

    #[test]
    fn test_explode_ss_legacy_form_equivalent() {
        let legacy = format!("ss://{}#old", base64_encode("aes-256-gcm:pass@1.2.3.4:8388"));
        let sip002 = explode_ss("ss://YWVzLTI1Ni1nY206cGFzcw==@1.2.3.4:8388#old").unwrap();
        let record = explode_ss(&legacy).unwrap();

        assert_eq!(record.address, sip002.address);
        assert_eq!(record.port, sip002.port);
        assert_eq!(record.identity, sip002.identity);
        assert_eq!(record.transport, sip002.transport);
    }

    #[test]
    fn test_explode_ss_plaintext_userinfo() {
        let record = explode_ss("ss://aes-128-gcm:secret@example.com:8388").unwrap();
        assert_eq!(record.identity, "secret");
        match &record.transport {
            Transport::Ss { method, .. } => assert_eq!(method, "aes-128-gcm"),
            other => panic!("wrong transport variant: {:?}", other),
        }
    }

    #[test]
    fn test_explode_ss_unlisted_cipher_falls_back_to_plaintext() {
        // base64 decodes cleanly but the method is not a known family,
        // so the raw userinfo is reinterpreted as plaintext (and fails
        // the charset check, leaving credentials empty)
        let link = format!("ss://{}@9.9.9.9:8388", base64_encode("mystery-cipher:pw"));
        let record = explode_ss(&link).unwrap();
        assert_eq!(record.address, "9.9.9.9");
        match &record.transport {
            Transport::Ss { method, .. } => assert!(method.is_empty() || method != "mystery-cipher"),
            other => panic!("wrong transport variant: {:?}", other),
        }
    }

    #[test]
    fn test_explode_ss_lenient_when_credentials_unreadable() {
        let record = explode_ss("ss://%%%garbage%%%@5.6.7.8:443").unwrap();
        assert_eq!(record.address, "5.6.7.8");
        assert_eq!(record.port, "443");
        assert_eq!(record.identity, "");
    }

    #[test]
    fn test_explode_ss_plugin_extraction() {
        let link =
            "ss://YWVzLTI1Ni1nY206cGFzcw==@1.2.3.4:8388/?plugin=obfs-local%3Bobfs%3Dhttp#x";
        let record = explode_ss(link).unwrap();
        match &record.transport {
            Transport::Ss { plugin, .. } => assert_eq!(plugin, "obfs-local"),
            other => panic!("wrong transport variant: {:?}", other),
        }
    }

    #[test]
    fn test_explode_ss_plugin_bad_charset_dropped() {
        let link = "ss://YWVzLTI1Ni1nY206cGFzcw==@1.2.3.4:8388?plugin=ob%20fs!";
        let record = explode_ss(link).unwrap();
        match &record.transport {
            Transport::Ss { plugin, .. } => assert_eq!(plugin, ""),
            other => panic!("wrong transport variant: {:?}", other),
        }
    }

    #[test]
    fn test_explode_ss_ipv6_brackets_stripped() {
        let record = explode_ss("ss://YWVzLTI1Ni1nY206cGFzcw==@[2001:db8::1]:8388").unwrap();
        assert_eq!(record.address, "2001:db8::1");
    }

    #[test]
    fn test_explode_ss_password_with_colon() {
        let link = format!(
            "ss://{}@h.example.com:8388",
            base64_encode("chacha20-ietf-poly1305:pa:ss")
        );
        let record = explode_ss(&link).unwrap();
        assert_eq!(record.identity, "pa:ss");
    }

    #[test]
    fn test_explode_ss_no_resolvable_endpoint() {
        assert!(explode_ss("ss://notbase64!!!").is_err());
        assert!(explode_ss("ss://user@hostonly").is_err());
    }
}
