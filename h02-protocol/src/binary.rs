use log::trace;

use crate::bcd;
use crate::error::{H02Error, Result};
use crate::frame::BINARY_MARKER;
use crate::grammar::ParsedFields;

/// Shortest binary location report, marker included.
pub const MIN_FRAME_LEN: usize = 29;

// Nibble offsets into the frame body (the bytes after `$`).
const SERIAL: (usize, usize) = (0, 10);
const TIME: (usize, usize) = (10, 6);
const DATE: (usize, usize) = (16, 6);
const LATITUDE: (usize, usize) = (22, 8);
// nibbles 30-31: battery level, unused
const LONGITUDE: (usize, usize) = (32, 9);
const FLAGS_NIBBLE: usize = 41;
const SPEED: (usize, usize) = (42, 3);
const HEADING: (usize, usize) = (45, 3);
/// Byte offset of the four status bytes in the body.
const STATUS_OFFSET: usize = 24;

const FLAG_VALID: u8 = 0x02;
const FLAG_NORTH: u8 = 0x04;
const FLAG_EAST: u8 = 0x08;

fn digits(body: &[u8], (start, count): (usize, usize), field: &str) -> Result<String> {
    bcd::read_digits(body, start, count, field)
}

/// Read a `$`-framed binary location report into protocol-native tokens.
///
/// Body layout (nibbles, high first):
/// `SSSSSSSSSS HHMMSS DDMMYY DDMMmmmm BB DDDMMmmmm F KKK CCC` followed by four
/// raw status bytes, where `F` holds the validity and hemisphere flags.
/// Trailing bytes after the status are ignored.
pub fn read_fields(raw: &[u8]) -> Result<ParsedFields> {
    if raw.first() != Some(&BINARY_MARKER) {
        return Err(H02Error::MalformedPacket("missing '$' marker".to_string()));
    }
    if raw.len() < MIN_FRAME_LEN {
        return Err(H02Error::MalformedPacket(format!(
            "binary frame too short: expected at least {MIN_FRAME_LEN} bytes, got {}",
            raw.len()
        )));
    }
    let body = &raw[1..];
    if raw.len() > MIN_FRAME_LEN {
        trace!("ignoring {} trailing bytes", raw.len() - MIN_FRAME_LEN);
    }

    let lat = digits(body, LATITUDE, "latitude")?;
    let lon = digits(body, LONGITUDE, "longitude")?;
    let flags = bcd::nibble(body, FLAGS_NIBBLE).unwrap_or_default();

    let mut status = <[String; 4]>::default();
    for (token, byte) in status.iter_mut().zip(&body[STATUS_OFFSET..STATUS_OFFSET + 4]) {
        *token = format!("{byte:02X}");
    }

    Ok(ParsedFields {
        maker: None,
        serial: digits(body, SERIAL, "serial")?,
        time: digits(body, TIME, "time")?,
        date: digits(body, DATE, "date")?,
        validity: if flags & FLAG_VALID != 0 { 'A' } else { 'V' },
        latitude: format!("{}.{}", &lat[..4], &lat[4..]),
        latitude_hemisphere: if flags & FLAG_NORTH != 0 { 'N' } else { 'S' },
        longitude: format!("{}.{}", &lon[..5], &lon[5..]),
        longitude_hemisphere: if flags & FLAG_EAST != 0 { 'E' } else { 'W' },
        speed: digits(body, SPEED, "speed")?,
        heading: digits(body, HEADING, "heading")?,
        status,
        cell: None,
    })
}
