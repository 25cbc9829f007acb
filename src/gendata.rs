use fake::{Dummy, Fake, Faker};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const SENSOR_ID: &str = "Edge_1";
pub const SENSOR_TYPE: &str = "Environment";

/// One environment sensor reading, in the shape Black Relay ingests.
/// Coordinates are around Raleigh, NC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Dummy)]
pub struct SensorReading {
    #[serde(rename = "Sensor_ID")]
    pub sensor_id: String,
    #[serde(rename = "Sensor-type")]
    pub sensor_type: String,
    #[serde(rename = "LAT")]
    #[dummy(faker = "35.7 .. 35.85")]
    pub lat: f64,
    #[serde(rename = "LON")]
    #[dummy(faker = "-78.7 .. -78.6")]
    pub lon: f64,
    /// gps fix status
    #[serde(rename = "Fix")]
    #[dummy(faker = "0 .. 2")]
    pub fix: u8,
    #[serde(rename = "Sats")]
    #[dummy(faker = "0 .. 13")]
    pub sats: u8,
    #[serde(rename = "Temp Fahrenheit")]
    #[dummy(faker = "60.0 .. 100.0")]
    pub temp_fahrenheit: f64,
    #[serde(rename = "Air Quality")]
    #[dummy(faker = "10000 .. 50001")]
    pub air_quality: u32,
}

impl SensorReading {
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

pub fn generate_reading() -> SensorReading {
    generate_reading_with_rng(&mut rand::thread_rng())
}

pub fn generate_reading_with_rng<R: Rng + ?Sized>(rng: &mut R) -> SensorReading {
    let reading: SensorReading = Faker.fake_with_rng(rng);

    SensorReading {
        sensor_id: SENSOR_ID.to_owned(),
        sensor_type: SENSOR_TYPE.to_owned(),
        lat: round_to(reading.lat, 6),
        lon: round_to(reading.lon, 6),
        temp_fahrenheit: round_to(reading.temp_fahrenheit, 3),
        ..reading
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
