// src/geo/gpsd.rs
//! GPSD client implementation

use super::data::PositionFix;
use crate::error::{FinderError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use tokio::{
    io::{AsyncWriteExt, BufReader},
    net::TcpStream,
};
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct GpsdMessage {
    class: String,
    #[serde(flatten)]
    data: HashMap<String, serde_json::Value>,
}

/// Connect to a gpsd daemon and return a stream reader
pub async fn connect_gpsd(host: &str, port: u16) -> Result<BufReader<TcpStream>> {
    let mut stream = TcpStream::connect(format!("{}:{}", host, port))
        .await
        .map_err(|e| {
            FinderError::Connection(format!("Failed to connect to gpsd at {}:{}: {}", host, port, e))
        })?;

    // Send WATCH command to start receiving JSON data
    let watch_cmd = "?WATCH={\"enable\":true,\"json\":true}\n";
    stream
        .write_all(watch_cmd.as_bytes())
        .await
        .map_err(|e| FinderError::Connection(format!("Failed to send WATCH command: {}", e)))?;

    Ok(BufReader::new(stream))
}

/// Parse a single line of gpsd JSON data
pub fn parse_gpsd_json(fix: &mut PositionFix, line: &str) -> Result<()> {
    let msg: GpsdMessage = serde_json::from_str(line)
        .map_err(|e| FinderError::Parse(format!("Failed to parse gpsd JSON: {}", e)))?;

    match msg.class.as_str() {
        "TPV" => parse_tpv_message(fix, &msg.data),
        "VERSION" => {
            if let Some(version) = msg.data.get("release").and_then(|v| v.as_str()) {
                info!(version, "Connected to gpsd");
            }
        }
        other => debug!(class = other, "Ignoring gpsd message"),
    }

    Ok(())
}

/// Parse TPV (Time Position Velocity) message
fn parse_tpv_message(fix: &mut PositionFix, msg_data: &HashMap<String, serde_json::Value>) {
    let field = |name: &str| msg_data.get(name).and_then(|v| v.as_f64());

    if let Some(lat) = field("lat") {
        fix.latitude = Some(lat);
    }

    if let Some(lon) = field("lon") {
        fix.longitude = Some(lon);
    }

    if let Some(alt) = field("alt") {
        fix.altitude = Some(alt);
    }

    if let Some(mode) = msg_data.get("mode").and_then(|v| v.as_u64()) {
        fix.mode = Some(mode as u8);
    }

    match (field("epx"), field("epy")) {
        (Some(x), Some(y)) => fix.accuracy = Some(x.max(y)),
        (Some(e), None) | (None, Some(e)) => fix.accuracy = Some(e),
        (None, None) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tpv_parsing() {
        let mut fix = PositionFix::new();
        let json = r#"{"class":"TPV","device":"/dev/ttyUSB0","mode":3,"time":"2023-01-01T12:00:00.000Z","ept":0.005,"lat":48.117,"lon":11.517,"alt":545.4,"epx":15.319,"epy":17.054,"epv":124.484,"track":10.3797,"speed":0.091}"#;

        parse_gpsd_json(&mut fix, json).unwrap();

        assert_eq!(fix.latitude, Some(48.117));
        assert_eq!(fix.longitude, Some(11.517));
        assert_eq!(fix.altitude, Some(545.4));
        assert_eq!(fix.mode, Some(3));
        assert_eq!(fix.accuracy, Some(17.054));
    }

    #[test]
    fn test_tpv_without_fix() {
        let mut fix = PositionFix::new();
        let json = r#"{"class":"TPV","device":"/dev/ttyUSB0","mode":1}"#;

        parse_gpsd_json(&mut fix, json).unwrap();

        assert!(!fix.has_fix());
        assert_eq!(fix.mode, Some(1));
    }

    #[test]
    fn test_other_classes_ignored() {
        let mut fix = PositionFix::new();
        let json = r#"{"class":"SKY","hdop":1.2,"satellites":[]}"#;

        parse_gpsd_json(&mut fix, json).unwrap();
        assert!(fix.hdop.is_none());
    }

    #[test]
    fn test_invalid_json() {
        let mut fix = PositionFix::new();
        let result = parse_gpsd_json(&mut fix, r#"{"invalid": json"#);
        assert!(result.is_err());
    }
}
