use std::fmt::{self, Display};

use url::{Host, Url};

use crate::common::Error;

pub const DEFAULT_HOST: &str = "localhost";
pub const MQTT_PORT: u16 = 1883;
pub const MQTTS_PORT: u16 = 8883;

/// Connection target derived from an `mqtt://` or `mqtts://` url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerUrl {
    pub host: String,
    pub port: u16,
    pub tls: bool,
}

impl BrokerUrl {
    pub fn parse(url: &str) -> Result<BrokerUrl, Error> {
        let url = Url::parse(url)?;
        let tls = match url.scheme() {
            "mqtt" => false,
            "mqtts" => true,
            scheme => return Err(Error::InvalidScheme(scheme.to_owned())),
        };

        let host = match url.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_owned(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            _ => DEFAULT_HOST.to_owned(),
        };

        let port = url
            .port()
            .filter(|port| *port != 0)
            .unwrap_or(if tls { MQTTS_PORT } else { MQTT_PORT });

        Ok(BrokerUrl { host, port, tls })
    }
}

impl Display for BrokerUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_scheme_defaults_to_1883() {
        let broker = BrokerUrl::parse("mqtt://mosquitto").unwrap();
        assert_eq!(
            broker,
            BrokerUrl {
                host: "mosquitto".to_owned(),
                port: 1883,
                tls: false
            }
        );
    }

    #[test]
    fn tls_scheme_defaults_to_8883() {
        let broker = BrokerUrl::parse("mqtts://secure-broker.com").unwrap();
        assert_eq!(broker.host, "secure-broker.com");
        assert_eq!(broker.port, 8883);
        assert!(broker.tls);
    }

    #[test]
    fn explicit_port_wins() {
        let broker = BrokerUrl::parse("mqtt://localhost:1884").unwrap();
        assert_eq!(broker.port, 1884);
        assert!(!broker.tls);

        let broker = BrokerUrl::parse("mqtts://10.0.0.5:1883").unwrap();
        assert_eq!(broker.host, "10.0.0.5");
        assert_eq!(broker.port, 1883);
        assert!(broker.tls);
    }

    #[test]
    fn zero_port_falls_back_to_scheme_default() {
        let broker = BrokerUrl::parse("mqtt://host:0").unwrap();
        assert_eq!(broker.port, 1883);

        let broker = BrokerUrl::parse("mqtts://host:0").unwrap();
        assert_eq!(broker.port, 8883);
    }

    #[test]
    fn ipv6_host_is_unbracketed() {
        let broker = BrokerUrl::parse("mqtt://[::1]:1883").unwrap();
        assert_eq!(broker.host, "::1");
    }

    #[test]
    fn missing_host_falls_back_to_localhost() {
        let broker = BrokerUrl::parse("mqtts://").unwrap();
        assert_eq!(broker.host, "localhost");
        assert_eq!(broker.port, 8883);
    }

    #[test]
    fn other_schemes_are_rejected() {
        for url in ["http://localhost:1883", "tcp://localhost", "ws://broker:8080"] {
            match BrokerUrl::parse(url) {
                Err(Error::InvalidScheme(_)) => (),
                v => panic!("{} should be rejected, got {:?}", url, v),
            }
        }

        let e = BrokerUrl::parse("http://localhost").unwrap_err();
        assert_eq!(
            e.to_string(),
            "Invalid MQTT scheme: http. Use 'mqtt://' or 'mqtts://'"
        );
    }

    #[test]
    fn garbage_is_not_a_url() {
        assert!(matches!(
            BrokerUrl::parse("not a url"),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn display_is_host_port() {
        let broker = BrokerUrl::parse("mqtt://localhost").unwrap();
        assert_eq!(broker.to_string(), "localhost:1883");
    }
}
