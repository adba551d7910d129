// src/geo/nmea.rs
//! NMEA sentence parsing

use super::data::PositionFix;

/// Parse a single NMEA sentence and update the fix
pub fn parse_nmea_sentence(fix: &mut PositionFix, line: &str) {
    let body = line.split('*').next().unwrap_or(line);
    let parts: Vec<&str> = body.split(',').collect();

    if line.starts_with("$GPGGA") || line.starts_with("$GNGGA") {
        parse_gga(fix, &parts);
    } else if line.starts_with("$GPRMC") || line.starts_with("$GNRMC") {
        parse_rmc(fix, &parts);
    }
}

/// Convert NMEA `ddmm.mmmm` plus hemisphere into signed decimal degrees
fn parse_coordinate(value: &str, hemisphere: &str, negative: &str) -> Option<f64> {
    if value.is_empty() || hemisphere.is_empty() {
        return None;
    }
    let raw = value.parse::<f64>().ok()?;
    let degrees = (raw / 100.0).trunc();
    let minutes = raw - degrees * 100.0;
    let decimal = degrees + minutes / 60.0;
    Some(if hemisphere == negative { -decimal } else { decimal })
}

/// Parse GGA (Global Positioning System Fix Data) sentence
fn parse_gga(fix: &mut PositionFix, parts: &[&str]) {
    if parts.len() < 10 {
        return;
    }

    if let Some(lat) = parse_coordinate(parts[2], parts[3], "S") {
        fix.latitude = Some(lat);
    }
    if let Some(lon) = parse_coordinate(parts[4], parts[5], "W") {
        fix.longitude = Some(lon);
    }

    if let Ok(quality) = parts[6].parse::<u8>() {
        fix.fix_quality = Some(quality);
    }

    if let Ok(hdop) = parts[8].parse::<f64>() {
        fix.hdop = Some(hdop);
        // Rough UERE of 5 m per unit of HDOP
        fix.accuracy = Some(hdop * 5.0);
    }

    if let Ok(alt) = parts[9].parse::<f64>() {
        fix.altitude = Some(alt);
    }
}

/// Parse RMC (Recommended Minimum) sentence. Status `V` marks a void fix.
fn parse_rmc(fix: &mut PositionFix, parts: &[&str]) {
    if parts.len() < 7 || parts[2] != "A" {
        return;
    }

    if let Some(lat) = parse_coordinate(parts[3], parts[4], "S") {
        fix.latitude = Some(lat);
    }
    if let Some(lon) = parse_coordinate(parts[5], parts[6], "W") {
        fix.longitude = Some(lon);
    }
}
