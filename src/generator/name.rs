//! Canonical display-name construction.
//!
//! Names are rebuilt from semantic record fields per a protocol-specific
//! grammar, with components joined by hyphens. The flag and CDN tables are
//! injected at construction so tests can substitute fixtures.

use std::collections::HashMap;

use crate::models::{Protocol, ProxyRecord, Transport};

/// Fallback flag for countries missing from the table.
const GLOBE_FLAG: &str = "🌐";

pub struct NameBuilder {
    country_flags: HashMap<String, String>,
    cdn_names: HashMap<String, String>,
}

impl NameBuilder {
    pub fn new(country_flags: HashMap<String, String>, cdn_names: HashMap<String, String>) -> Self {
        NameBuilder {
            country_flags,
            cdn_names,
        }
    }

    /// Builds the canonical name for a record at its 1-based position in
    /// the country's output list.
    pub fn build(&self, record: &ProxyRecord, index: usize) -> String {
        let mut parts: Vec<String> = vec![record.protocol.as_str().to_string()];

        match &record.transport {
            Transport::Vless {
                network,
                security,
                flow,
                encryption,
                header_type,
                fingerprint,
                ..
            } => {
                push_unless(&mut parts, flow, &["none"]);
                push_unless(&mut parts, encryption, &["none"]);
                parts.push(defaulted(network, "tcp"));
                push_unless(&mut parts, header_type, &["none"]);
                push_unless(&mut parts, security, &["none"]);
                push_unless(&mut parts, fingerprint, &[]);
            }
            Transport::Vmess {
                network,
                header_type,
                cipher,
                tls,
                ..
            } => {
                push_unless(&mut parts, cipher, &[]);
                parts.push(defaulted(network, "tcp"));
                push_unless(&mut parts, header_type, &["none", "http"]);
                push_unless(&mut parts, tls, &["none"]);
            }
            Transport::Trojan {
                network,
                security,
                header_type,
                ..
            } => {
                parts.push(defaulted(network, "tcp"));
                push_unless(&mut parts, header_type, &["none"]);
                parts.push(defaulted(security, "tls"));
            }
            Transport::Ss { method, plugin } => {
                push_unless(&mut parts, &method.replace('_', "-"), &[]);
                push_unless(&mut parts, plugin, &[]);
            }
            Transport::Ssr => {}
            Transport::Hysteria | Transport::Tuic => {
                parts.push("udp".to_string());
            }
        }

        // SSR names stay minimal: tag, country, index
        if record.protocol != Protocol::Ssr {
            if let Some(cdn) = &record.cdn {
                let label = self.cdn_names.get(cdn).cloned().unwrap_or_else(|| cdn.clone());
                push_unless(&mut parts, &label, &[]);
            }
        }

        let country = record.country.as_deref().unwrap_or("");
        let flag = self
            .country_flags
            .get(country)
            .map(String::as_str)
            .unwrap_or(GLOBE_FLAG);
        parts.push(format!("{}{}", country, flag));
        parts.push(index.to_string());

        parts.join("-")
    }
}

fn defaulted(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

fn push_unless(parts: &mut Vec<String>, value: &str, excluded: &[&str]) {
    if !value.is_empty() && !excluded.contains(&value) {
        parts.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_link;
    use crate::settings::Settings;
    use crate::utils::base64_encode;

    fn builder() -> NameBuilder {
        let settings = Settings::default();
        NameBuilder::new(settings.country_flags, settings.cdn_names)
    }

    fn with_country(mut record: ProxyRecord, cc: &str) -> ProxyRecord {
        record.country = Some(cc.to_string());
        record
    }

    #[test]
    fn test_vmess_name_default_network() {
        let link = format!(
            "vmess://{}",
            base64_encode(r#"{"add":"1.2.3.4","port":443,"id":"abc","ps":"old"}"#)
        );
        let record = with_country(parse_link(&link).unwrap(), "US");
        assert_eq!(builder().build(&record, 1), "vmess-tcp-US🇺🇸-1");
    }

    #[test]
    fn test_vmess_name_with_cipher_and_tls() {
        let link = format!(
            "vmess://{}",
            base64_encode(
                r#"{"add":"1.2.3.4","port":443,"id":"abc","scy":"auto","net":"ws","tls":"tls"}"#
            )
        );
        let record = with_country(parse_link(&link).unwrap(), "DE");
        assert_eq!(builder().build(&record, 3), "vmess-auto-ws-tls-DE🇩🇪-3");
    }

    #[test]
    fn test_vless_name_skips_none_components() {
        let link = "vless://u@h.example.com:443?type=grpc&security=reality&flow=none&encryption=none&fp=chrome";
        let record = with_country(parse_link(link).unwrap(), "NL");
        assert_eq!(
            builder().build(&record, 7),
            "vless-grpc-reality-chrome-NL🇳🇱-7"
        );
    }

    #[test]
    fn test_trojan_name_security_defaults_to_tls() {
        let record = with_country(parse_link("trojan://pw@h:443").unwrap(), "FR");
        assert_eq!(builder().build(&record, 2), "trojan-tcp-tls-FR🇫🇷-2");
    }

    #[test]
    fn test_ss_name_method_underscores_become_hyphens() {
        let link = format!(
            "ss://{}@1.2.3.4:8388",
            base64_encode("chacha20_ietf_poly1305:pw")
        );
        let record = with_country(parse_link(&link).unwrap(), "US");
        // plaintext fallback also hits the underscore path
        let name = builder().build(&record, 1);
        assert!(name.starts_with("ss-"));
        assert!(!name.contains('_'));
    }

    #[test]
    fn test_ssr_name_is_minimal() {
        let blob = "1.2.3.4:8388:origin:aes-256-cfb:plain:cGFzcw";
        let link = format!("ssr://{}", base64_encode(blob));
        let record = with_country(parse_link(&link).unwrap(), "RU");
        assert_eq!(builder().build(&record, 4), "ssr-RU🇷🇺-4");
    }

    #[test]
    fn test_hysteria_and_tuic_names_carry_udp() {
        let hy = with_country(parse_link("hysteria2://h:443#n").unwrap(), "TR");
        assert_eq!(builder().build(&hy, 1), "hysteria2-udp-TR🇹🇷-1");

        let tuic = with_country(parse_link("tuic://h:443#n").unwrap(), "TR");
        assert_eq!(builder().build(&tuic, 2), "tuic-udp-TR🇹🇷-2");
    }

    #[test]
    fn test_unknown_country_gets_globe() {
        let record = with_country(parse_link("trojan://pw@h:443").unwrap(), "XX");
        assert_eq!(builder().build(&record, 1), "trojan-tcp-tls-XX🌐-1");
    }

    #[test]
    fn test_cdn_label_included_when_set() {
        let mut record = with_country(parse_link("trojan://pw@h:443").unwrap(), "IR");
        record.cdn = Some("cloudflare".to_string());
        assert_eq!(
            builder().build(&record, 9),
            "trojan-tcp-tls-☁️Cloudflare-IR🇮🇷-9"
        );
    }
}
