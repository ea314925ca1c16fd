//! Protocol decoders
//!
//! Turns loosely-structured proxy link strings into normalized
//! [`ProxyRecord`]s. Every decoder is a pure function returning an explicit
//! failure reason; malformed input never panics.

pub mod explodes;

use thiserror::Error;

use crate::models::{Protocol, ProxyRecord};

/// Why a link could not be decoded into a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unrecognized scheme")]
    UnknownScheme,
    #[error("invalid base64 payload")]
    Base64,
    #[error("invalid JSON payload")]
    Json,
    #[error("missing host")]
    MissingHost,
    #[error("missing port")]
    MissingPort,
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("malformed URI")]
    BadUri,
    #[error("too few SSR fields")]
    TooFewFields,
}

/// Ordered scheme table. Longer prefixes come before their collisions
/// (`hysteria2` before `hysteria`, `ssr` before `ss`).
const SCHEME_ORDER: [Protocol; 8] = [
    Protocol::Vmess,
    Protocol::Vless,
    Protocol::Trojan,
    Protocol::Hysteria2,
    Protocol::Hysteria,
    Protocol::Tuic,
    Protocol::Ssr,
    Protocol::Ss,
];

/// Identifies the protocol of a link by its scheme prefix,
/// case-insensitively.
pub fn sniff_protocol(link: &str) -> Option<Protocol> {
    SCHEME_ORDER.into_iter().find(|protocol| {
        let prefix = protocol.scheme_prefix();
        link.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

/// Decodes one extracted link into a normalized record.
pub fn parse_link(link: &str) -> Result<ProxyRecord, DecodeError> {
    let link = link.trim();
    match sniff_protocol(link).ok_or(DecodeError::UnknownScheme)? {
        Protocol::Vmess => explodes::vmess::explode_vmess(link),
        Protocol::Vless => explodes::vless::explode_vless(link),
        Protocol::Trojan => explodes::trojan::explode_trojan(link),
        Protocol::Ss => explodes::ss::explode_ss(link),
        Protocol::Ssr => explodes::ssr::explode_ssr(link),
        Protocol::Hysteria | Protocol::Hysteria2 => explodes::hysteria::explode_hysteria(link),
        Protocol::Tuic => explodes::tuic::explode_tuic(link),
    }
}
