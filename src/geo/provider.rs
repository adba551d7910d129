// src/geo/provider.rs
//! One-shot position lookup across the supported sources

use super::{
    data::{ErrorCode, GeolocationError, Position, PositionFix},
    gpsd, nmea,
};
use crate::error::Result;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

/// Where the user's position comes from
#[derive(Debug, Clone, PartialEq)]
pub enum PositionSource {
    Fixed { latitude: f64, longitude: f64 },
    Gpsd { host: String, port: u16 },
    Serial { port: String, baudrate: u32 },
}

impl PositionSource {
    pub fn name(&self) -> &'static str {
        match self {
            PositionSource::Fixed { .. } => "fixed",
            PositionSource::Gpsd { .. } => "gpsd",
            PositionSource::Serial { .. } => "serial",
        }
    }
}

/// Options governing a single lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    /// Only accept fixes the receiver reports as valid
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
    /// No position is ever cached, so every lookup satisfies any age bound
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_millis(5000),
            maximum_age: Duration::ZERO,
        }
    }
}

/// Resolve the current position once, bounded by `options.timeout`
pub async fn current_position(
    source: &PositionSource,
    options: &PositionOptions,
) -> std::result::Result<Position, GeolocationError> {
    debug!(source = source.name(), ?options, "Requesting current position");

    let position = match source {
        PositionSource::Fixed { latitude, longitude } => {
            let position = Position::new(*latitude, *longitude, "fixed");
            if !position.is_valid() {
                return Err(GeolocationError::unavailable(format!(
                    "Invalid coordinates {}, {}",
                    latitude, longitude
                )));
            }
            position
        }
        live => tokio::time::timeout(options.timeout, acquire(live, options.enable_high_accuracy))
            .await
            .map_err(|_| GeolocationError::new(ErrorCode::Timeout, "Timeout expired"))??,
    };

    info!(%position, "Position acquired");
    Ok(position)
}

async fn acquire(
    source: &PositionSource,
    high_accuracy: bool,
) -> std::result::Result<Position, GeolocationError> {
    match source {
        PositionSource::Fixed { latitude, longitude } => Ok(Position::new(*latitude, *longitude, "fixed")),
        PositionSource::Gpsd { host, port } => {
            let mut reader = gpsd::connect_gpsd(host, *port)
                .await
                .map_err(|e| GeolocationError::unavailable(e.to_string()))?;
            read_fix(&mut reader, "gpsd", high_accuracy, parse_gpsd_line).await
        }
        PositionSource::Serial { port, baudrate } => {
            let serial = tokio_serial::new(port, *baudrate)
                .timeout(Duration::from_millis(1000))
                .open_native_async()
                .map_err(|e| {
                    let code = match e.kind() {
                        tokio_serial::ErrorKind::Io(std::io::ErrorKind::PermissionDenied) => {
                            ErrorCode::PermissionDenied
                        }
                        _ => ErrorCode::PositionUnavailable,
                    };
                    GeolocationError::new(code, format!("Failed to open serial port {}: {}", port, e))
                })?;
            let mut reader = BufReader::new(serial);
            read_fix(&mut reader, "serial", high_accuracy, nmea::parse_nmea_sentence).await
        }
    }
}

fn parse_gpsd_line(fix: &mut PositionFix, line: &str) {
    if let Err(e) = gpsd::parse_gpsd_json(fix, line) {
        warn!("Error parsing gpsd JSON: {}", e);
    }
}

/// Feed lines into a fix until it holds a usable position
pub(crate) async fn read_fix<R>(
    reader: &mut R,
    source_name: &str,
    high_accuracy: bool,
    parse: fn(&mut PositionFix, &str),
) -> std::result::Result<Position, GeolocationError>
where
    R: AsyncBufRead + Unpin,
{
    let mut fix = PositionFix::new();
    fix.set_source(source_name);
    let mut line = String::new();

    loop {
        line.clear();
        let read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| GeolocationError::unavailable(format!("Error reading from {}: {}", source_name, e)))?;
        if read == 0 {
            return Err(GeolocationError::unavailable(format!(
                "{} closed before a position fix was obtained",
                source_name
            )));
        }

        let sentence = line.trim();
        if sentence.is_empty() {
            continue;
        }
        fix.update_timestamp();
        parse(&mut fix, sentence);

        let usable = if high_accuracy { fix.has_quality_fix() } else { fix.has_fix() };
        if usable {
            debug!(
                fix = %fix.get_fix_description(),
                altitude = ?fix.altitude,
                hdop = ?fix.hdop,
                "Fix obtained"
            );
            if let Some(position) = fix.to_position() {
                return Ok(position);
            }
        }
    }
}

/// List available serial ports
pub fn list_serial_ports() -> Result<Vec<String>> {
    let ports = tokio_serial::available_ports()?;

    Ok(ports
        .into_iter()
        .map(|port| format!("{} - {:?}", port.port_name, port.port_type))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_source_resolves_immediately() {
        let source = PositionSource::Fixed { latitude: 60.1699, longitude: 24.9384 };
        let pos = current_position(&source, &PositionOptions::default()).await.unwrap();
        assert_eq!(pos.latitude, 60.1699);
        assert_eq!(pos.longitude, 24.9384);
        assert_eq!(pos.source, "fixed");
    }

    #[tokio::test]
    async fn test_fixed_source_rejects_out_of_range() {
        let source = PositionSource::Fixed { latitude: 123.0, longitude: 24.0 };
        let err = current_position(&source, &PositionOptions::default()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PositionUnavailable);
    }

    #[tokio::test]
    async fn test_read_fix_waits_for_quality_fix() {
        let input = concat!(
            "{\"class\":\"VERSION\",\"release\":\"3.25\"}\n",
            "{\"class\":\"TPV\",\"mode\":1,\"lat\":1.0,\"lon\":2.0}\n",
            "{\"class\":\"TPV\",\"mode\":3,\"lat\":60.2,\"lon\":24.8}\n",
        );
        let mut reader = input.as_bytes();
        let pos = read_fix(&mut reader, "gpsd", true, parse_gpsd_line).await.unwrap();
        assert_eq!(pos.latitude, 60.2);
        assert_eq!(pos.longitude, 24.8);
    }

    #[tokio::test]
    async fn test_read_fix_low_accuracy_takes_first_coordinates() {
        let input = "{\"class\":\"TPV\",\"mode\":1,\"lat\":1.0,\"lon\":2.0}\n";
        let mut reader = input.as_bytes();
        let pos = read_fix(&mut reader, "gpsd", false, parse_gpsd_line).await.unwrap();
        assert_eq!(pos.latitude, 1.0);
    }

    #[tokio::test]
    async fn test_read_fix_eof_is_unavailable() {
        let input = "$GPGGA,123519,,,,,0,00,,,M,,M,,*47\n";
        let mut reader = input.as_bytes();
        let err = read_fix(&mut reader, "serial", true, nmea::parse_nmea_sentence)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PositionUnavailable);
    }

    #[tokio::test]
    async fn test_gpsd_connection_refused_is_unavailable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let source = PositionSource::Gpsd { host: "127.0.0.1".to_string(), port };
        let err = current_position(&source, &PositionOptions::default()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PositionUnavailable);
    }

    #[tokio::test]
    async fn test_silent_gpsd_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(2)).await;
            drop(socket);
        });

        let source = PositionSource::Gpsd { host: "127.0.0.1".to_string(), port };
        let options = PositionOptions {
            timeout: Duration::from_millis(100),
            ..Default::default()
        };
        let err = current_position(&source, &options).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Timeout);
        server.abort();
    }
}
