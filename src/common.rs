use std::io;

use once_cell::sync::Lazy;
use rumqttc::{ConnectReturnCode, Incoming};

use crate::broker::BrokerUrl;

/// Short random id used to tell runs apart on the broker side.
pub static UNIQUE_ID: Lazy<String> = Lazy::new(|| {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
});

pub fn default_client_id() -> String {
    format!("sensorpub-{}", *UNIQUE_ID)
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid broker URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Invalid MQTT scheme: {0}. Use 'mqtt://' or 'mqtts://'")]
    InvalidScheme(String),
    #[error("IO error = {0}")]
    Io(#[from] io::Error),
    #[error("Connection refused to {target}")]
    Refused { target: BrokerUrl },
    #[error("Connection failed with code {0:?}")]
    Rejected(ConnectReturnCode),
    #[error("Connection error = {0}")]
    Connection(rumqttc::ConnectionError),
    #[error("Client error = {0}")]
    Client(#[from] rumqttc::ClientError),
    #[error("Wrong packet = {0:?}")]
    WrongPacket(Incoming),
    #[error("Serialization error = {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Classifies a connection failure while talking to `target`.
    pub fn from_connection(e: rumqttc::ConnectionError, target: &BrokerUrl) -> Error {
        match e {
            rumqttc::ConnectionError::Io(e) if e.kind() == io::ErrorKind::ConnectionRefused => {
                Error::Refused {
                    target: target.clone(),
                }
            }
            rumqttc::ConnectionError::ConnectionRefused(code) => Error::Rejected(code),
            e => Error::Connection(e),
        }
    }

    /// Extra line printed under the error, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::Refused { .. } => Some("Make sure the MQTT broker is running and accessible"),
            Error::InvalidUrl(_) | Error::InvalidScheme(_) => {
                Some("Expected a URL like mqtt://localhost:1883 or mqtts://broker:8883")
            }
            _ => None,
        }
    }
}
