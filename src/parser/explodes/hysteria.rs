use url::Url;

use crate::models::{Protocol, ProxyRecord, Transport};
use crate::parser::explodes::host_port;
use crate::parser::DecodeError;
use crate::utils::clean_name;

/// Parse a Hysteria or Hysteria2 link into a record.
///
/// `hysteria://` and `hysteria2://` are distinct protocol tags; both use
/// the standard URI form with the fragment as display name. Only a missing
/// host is a failure.
pub fn explode_hysteria(link: &str) -> Result<ProxyRecord, DecodeError> {
    let url = Url::parse(link).map_err(|_| DecodeError::BadUri)?;
    let (protocol, transport) = match url.scheme() {
        "hysteria" => (Protocol::Hysteria, Transport::Hysteria),
        "hysteria2" => (Protocol::Hysteria2, Transport::Hysteria),
        _ => return Err(DecodeError::UnknownScheme),
    };

    let (address, port) = host_port(&url)?;

    Ok(ProxyRecord {
        protocol,
        address,
        port,
        identity: String::new(),
        transport,
        display_name: clean_name(url.fragment().unwrap_or("")),
        country: None,
        cdn: None,
        ip: None,
        original: link.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explode_hysteria_tags_are_distinct() {
        let one = explode_hysteria("hysteria://h.example.com:443?protocol=udp#a").unwrap();
        let two = explode_hysteria("hysteria2://h.example.com:443?insecure=1#a").unwrap();
        assert_eq!(one.protocol, Protocol::Hysteria);
        assert_eq!(two.protocol, Protocol::Hysteria2);
    }

    #[test]
    fn test_explode_hysteria_fragment_sanitized() {
        let record = explode_hysteria("hysteria2://h.example.com:443#My%20Node%01").unwrap();
        assert_eq!(record.display_name, "My Node");
    }

    #[test]
    fn test_explode_hysteria_port_optional() {
        let record = explode_hysteria("hysteria2://h.example.com#x").unwrap();
        assert_eq!(record.port, "");
    }
}
