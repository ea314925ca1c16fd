use std::collections::HashMap;

use url::Url;

use crate::models::{Protocol, ProxyRecord, Transport};
use crate::parser::explodes::host_port;
use crate::parser::DecodeError;
use crate::utils::{clean_name, url_decode};

/// Parse a Trojan link into a record.
///
/// Form `trojan://<password>@<host>:<port>?<query>#<fragment>`. Host and
/// port are both required.
pub fn explode_trojan(link: &str) -> Result<ProxyRecord, DecodeError> {
    let url = Url::parse(link).map_err(|_| DecodeError::BadUri)?;
    if url.scheme() != "trojan" {
        return Err(DecodeError::UnknownScheme);
    }

    let (address, port) = host_port(&url)?;
    if port.is_empty() {
        return Err(DecodeError::MissingPort);
    }

    let mut params = HashMap::new();
    for (key, value) in url.query_pairs() {
        params.insert(key.to_string(), value.to_string());
    }
    let param = |key: &str| params.get(key).cloned().unwrap_or_default();

    Ok(ProxyRecord {
        protocol: Protocol::Trojan,
        address,
        port,
        identity: url_decode(url.username()),
        transport: Transport::Trojan {
            network: param("type"),
            security: param("security"),
            header_type: param("headerType"),
            sni: param("sni"),
            host: param("host"),
        },
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
    fn test_explode_trojan_basic() {
        let link = "trojan://p%40ss@example.com:443?sni=sni.example.com&type=ws#Remark";
        let record = explode_trojan(link).unwrap();

        assert_eq!(record.protocol, Protocol::Trojan);
        assert_eq!(record.address, "example.com");
        assert_eq!(record.port, "443");
        assert_eq!(record.identity, "p@ss");
        assert_eq!(record.display_name, "Remark");
        match &record.transport {
            Transport::Trojan { sni, network, .. } => {
                assert_eq!(sni, "sni.example.com");
                assert_eq!(network, "ws");
            }
            other => panic!("wrong transport variant: {:?}", other),
        }
    }

    #[test]
    fn test_explode_trojan_missing_port() {
        assert_eq!(
            explode_trojan("trojan://pw@example.com#x"),
            Err(DecodeError::MissingPort)
        );
    }

    #[test]
    fn test_explode_trojan_ipv6() {
        let record = explode_trojan("trojan://pw@[::1]:8443").unwrap();
        assert_eq!(record.address, "::1");
        assert_eq!(record.port, "8443");
    }
}
