//! Record model definitions
//!
//! Contains the core data structures for decoded proxy links.

use serde::{Deserialize, Serialize};

/// Represents the protocol of a proxy link.
/// This is the canonical enum used for protocol identification across the
/// application; adding a protocol is a compile-time-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Vmess,
    Vless,
    Trojan,
    Ss,
    Ssr,
    Hysteria,
    Hysteria2,
    Tuic,
}

impl Protocol {
    /// The lowercase tag used in output JSON and in generated names.
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Vmess => "vmess",
            Protocol::Vless => "vless",
            Protocol::Trojan => "trojan",
            Protocol::Ss => "ss",
            Protocol::Ssr => "ssr",
            Protocol::Hysteria => "hysteria",
            Protocol::Hysteria2 => "hysteria2",
            Protocol::Tuic => "tuic",
        }
    }

    /// The URI scheme prefix, including the `://` separator.
    pub fn scheme_prefix(self) -> &'static str {
        match self {
            Protocol::Vmess => "vmess://",
            Protocol::Vless => "vless://",
            Protocol::Trojan => "trojan://",
            Protocol::Ss => "ss://",
            Protocol::Ssr => "ssr://",
            Protocol::Hysteria => "hysteria://",
            Protocol::Hysteria2 => "hysteria2://",
            Protocol::Tuic => "tuic://",
        }
    }
}

/// Protocol-specific transport parameters.
///
/// One variant per protocol so a record can never carry a field that is
/// semantically foreign to its protocol. Empty strings mean the field was
/// absent from the link; values are never fabricated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    Vmess {
        network: String,
        host: String,
        sni: String,
        header_type: String,
        cipher: String,
        tls: String,
    },
    Vless {
        network: String,
        security: String,
        flow: String,
        encryption: String,
        header_type: String,
        fingerprint: String,
        sni: String,
        host: String,
    },
    Trojan {
        network: String,
        security: String,
        header_type: String,
        sni: String,
        host: String,
    },
    Ss {
        method: String,
        plugin: String,
    },
    // SSR metadata beyond address/port is not modeled
    Ssr,
    Hysteria,
    Tuic,
}

/// One successfully decoded proxy link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRecord {
    pub protocol: Protocol,
    /// Hostname or literal IP; IPv6 brackets stripped.
    pub address: String,
    /// Port kept as the decoded digit string.
    pub port: String,
    /// UUID for vmess/vless, password for trojan/ss, empty otherwise.
    pub identity: String,
    pub transport: Transport,
    /// Sanitized display name; may be empty.
    pub display_name: String,
    /// ISO country code, set by the classifier.
    pub country: Option<String>,
    /// CDN label, set by the classifier.
    pub cdn: Option<String>,
    /// Resolved endpoint IP, set by the classifier.
    pub ip: Option<String>,
    /// The exact input URI, preserved verbatim. Authoritative source of
    /// truth for re-encoding; never mutated.
    pub original: String,
}

impl ProxyRecord {
    /// The tuple that defines record identity for deduplication.
    pub fn dedup_key(&self) -> (Protocol, &str, &str, &str) {
        (self.protocol, &self.address, &self.port, &self.identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_tags() {
        assert_eq!(Protocol::Hysteria2.as_str(), "hysteria2");
        assert_eq!(Protocol::Ss.scheme_prefix(), "ss://");
    }

    #[test]
    fn test_dedup_key_ignores_display_name() {
        let make = |name: &str| ProxyRecord {
            protocol: Protocol::Trojan,
            address: "example.com".into(),
            port: "443".into(),
            identity: "pw".into(),
            transport: Transport::Trojan {
                network: String::new(),
                security: String::new(),
                header_type: String::new(),
                sni: String::new(),
                host: String::new(),
            },
            display_name: name.into(),
            country: None,
            cdn: None,
            ip: None,
            original: format!("trojan://pw@example.com:443#{}", name),
        };
        assert_eq!(make("a").dedup_key(), make("b").dedup_key());
    }
}
