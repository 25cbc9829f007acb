use std::{fs, path::PathBuf, time::Duration};

use clap::Parser;
use rumqttc::{MqttOptions, Transport};

use crate::{
    broker::BrokerUrl,
    common::{default_client_id, Error},
};

#[derive(Debug, Parser)]
#[command(
    name = "sensorpub",
    about = "Send a randomized sensor reading to an MQTT broker.",
    version,
    after_help = "\
Examples:
  sensorpub --broker mqtt://localhost:1883 --topic environment_sensor
  sensorpub -b mqtt://mosquitto:1883 -t sensor/edge_1
  sensorpub -b mqtts://secure-broker.com:8883 -t data/environment"
)]
pub struct Cli {
    /// MQTT broker URL (e.g., mqtt://localhost:1883)
    #[arg(short = 'b', long, env = "MQTT_BROKER_URL", value_name = "URL")]
    pub broker: String,

    /// MQTT topic to publish to
    #[arg(short = 't', long)]
    pub topic: String,

    /// Pretty-print the JSON payload before sending
    #[arg(long)]
    pub pretty: bool,

    /// Keep alive interval in seconds
    #[arg(
        short = 'k',
        long,
        default_value = "60",
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(5..)
    )]
    pub keep_alive: u64,

    /// CA certificate (PEM) for mqtts:// brokers. Native roots are used when absent
    #[arg(short = 'R', long, value_name = "PATH")]
    pub ca_file: Option<PathBuf>,

    /// Client identifier. Defaults to a random `sensorpub-` id
    #[arg(short = 'i', long)]
    pub client_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub broker: BrokerUrl,
    pub topic: String,
    pub pretty: bool,
    pub keep_alive: u64,
    pub ca_file: Option<PathBuf>,
    pub client_id: String,
}

impl TryFrom<Cli> for RunnerConfig {
    type Error = Error;

    fn try_from(value: Cli) -> Result<Self, Self::Error> {
        Ok(Self {
            broker: BrokerUrl::parse(&value.broker)?,
            topic: value.topic,
            pretty: value.pretty,
            keep_alive: value.keep_alive,
            ca_file: value.ca_file,
            client_id: value.client_id.unwrap_or_else(default_client_id),
        })
    }
}

impl RunnerConfig {
    pub fn options(&self) -> Result<MqttOptions, Error> {
        let mut options = MqttOptions::new(&self.client_id, &self.broker.host, self.broker.port);
        options.set_keep_alive(Duration::from_secs(self.keep_alive));
        options.set_clean_session(true);

        if self.broker.tls {
            let transport = match &self.ca_file {
                Some(ca_file) => Transport::tls(fs::read(ca_file)?, None, None),
                None => Transport::tls_with_default_config(),
            };
            options.set_transport(transport);
        }

        Ok(options)
    }
}
