use colored::Colorize;
use rumqttc::{AsyncClient, Event, EventLoop, Incoming, Outgoing, QoS};

use crate::{
    broker::BrokerUrl,
    cli::RunnerConfig,
    common::Error,
    gendata::generate_reading,
};

const RULE: &str = "--------------------------------------------------";

#[tokio::main(flavor = "current_thread")]
pub(crate) async fn start(config: RunnerConfig) -> Result<(), Error> {
    println!("Connecting to {} (TLS: {})", config.broker, config.broker.tls);
    println!("Topic: {}", config.topic);
    println!("{}", RULE);

    let reading = generate_reading();
    let payload = reading.to_json(false)?;
    if config.pretty {
        println!("Payload:");
        println!("{}", reading.to_json(true)?);
    } else {
        println!("Payload: {}", payload);
    }
    println!("{}", RULE);

    send(&config, payload).await?;
    println!("{}", "✓ Done!".green().bold());
    Ok(())
}

/// Connects, publishes `payload` once at QoS 1, waits for the ack and
/// disconnects. Returns the packet id the broker acknowledged.
pub(crate) async fn send(config: &RunnerConfig, payload: String) -> Result<u16, Error> {
    let mut publisher = Publisher::new(config).await?;
    println!("{}", "✓ Connected to MQTT broker".green());

    let pkid = publisher.publish(&config.topic, payload).await?;
    println!(
        "{} (pkid: {})",
        "✓ Message published successfully".green(),
        pkid
    );

    publisher.disconnect().await?;
    Ok(pkid)
}

pub(crate) struct Publisher {
    broker: BrokerUrl,
    client: AsyncClient,
    eventloop: EventLoop,
}

impl Publisher {
    pub(crate) async fn new(config: &RunnerConfig) -> Result<Publisher, Error> {
        let (client, eventloop) = AsyncClient::new(config.options()?, 10);
        let mut publisher = Publisher {
            broker: config.broker.clone(),
            client,
            eventloop,
        };

        loop {
            if let Event::Incoming(v) = publisher.poll().await? {
                match v {
                    Incoming::ConnAck(_) => break,
                    incoming => return Err(Error::WrongPacket(incoming)),
                }
            }
        }

        info!("Id = {}, connected to {}", config.client_id, publisher.broker);
        Ok(publisher)
    }

    /// Publishes at least once and blocks until the matching PubAck.
    pub(crate) async fn publish(&mut self, topic: &str, payload: String) -> Result<u16, Error> {
        self.client
            .publish(topic, QoS::AtLeastOnce, false, payload)
            .await?;

        let mut sent = None;
        loop {
            match self.poll().await? {
                Event::Outgoing(Outgoing::Publish(pkid)) => sent = Some(pkid),
                Event::Incoming(Incoming::PubAck(ack)) if Some(ack.pkid) == sent => {
                    return Ok(ack.pkid)
                }
                Event::Incoming(Incoming::PubAck(ack)) => {
                    warn!("Unsolicited PubAck, pkid = {}", ack.pkid);
                }
                _ => (),
            }
        }
    }

    pub(crate) async fn disconnect(mut self) -> Result<(), Error> {
        self.client.disconnect().await?;

        loop {
            if let Event::Outgoing(Outgoing::Disconnect) = self.poll().await? {
                break;
            }
        }

        info!("disconnected from {}", self.broker);
        Ok(())
    }

    async fn poll(&mut self) -> Result<Event, Error> {
        match self.eventloop.poll().await {
            Ok(event) => {
                debug!("{:?}", event);
                Ok(event)
            }
            Err(e) => {
                debug!("Connection error = {:?}", e);
                Err(Error::from_connection(e, &self.broker))
            }
        }
    }
}
