use std::sync::LazyLock;

use regex::Regex;

use crate::error::{H02Error, Result};
use crate::frame::ASCII_MARKER;

/// End-of-frame marker for text transmissions.
pub const ASCII_TERMINATOR: char = '#';
/// Field separator for text transmissions.
pub const SEPARATOR: char = ',';

/// One named position in the text grammar.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// Shape of the token, as an unanchored regular expression.
    pub shape: &'static str,
}

const fn field(name: &'static str, shape: &'static str) -> FieldDescriptor {
    FieldDescriptor { name, shape }
}

pub const MAKER: &str = "maker";
pub const SERIAL: &str = "serial";
pub const COMMAND: &str = "command";
pub const TIME: &str = "time";
pub const VALIDITY: &str = "validity";
pub const LATITUDE: &str = "latitude";
pub const LATITUDE_HEMISPHERE: &str = "latitude_hemisphere";
pub const LONGITUDE: &str = "longitude";
pub const LONGITUDE_HEMISPHERE: &str = "longitude_hemisphere";
pub const SPEED: &str = "speed";
pub const HEADING: &str = "heading";
pub const DATE: &str = "date";
pub const STATUS: &str = "status";
pub const MOBILE_COUNTRY_CODE: &str = "mobile_country_code";
pub const MOBILE_NETWORK_CODE: &str = "mobile_network_code";
pub const LOCAL_AREA_CODE: &str = "local_area_code";
pub const CELL_ID: &str = "cell_id";

/// Location report (`V1`) layout, in transmission order.
///
/// `*HQ,865205030330012,V1,145452,A,2240.5518,N,11358.3238,E,000.00,000,100815,FFFFFBFF,460,00,10342,4283#`
pub const LOCATION_FIELDS: [FieldDescriptor; 17] = [
    field(MAKER, r"[0-9A-Za-z]+"),
    field(SERIAL, r"[0-9]+"),
    field(COMMAND, r"V1"),
    field(TIME, r"[0-9]{6}"),
    field(VALIDITY, r"[AV]"),
    field(LATITUDE, r"-?[0-9]{4}\.[0-9]{4}"),
    field(LATITUDE_HEMISPHERE, r"[NS]"),
    field(LONGITUDE, r"-?[0-9]{5}\.[0-9]{4}"),
    field(LONGITUDE_HEMISPHERE, r"[EW]"),
    field(SPEED, r"[0-9]+(\.[0-9]+)?"),
    field(HEADING, r"[0-9]{1,3}(\.[0-9]+)?"),
    field(DATE, r"[0-9]{6}"),
    field(STATUS, r"[0-9A-Fa-f]{8}"),
    field(MOBILE_COUNTRY_CODE, r"[0-9]+"),
    field(MOBILE_NETWORK_CODE, r"[0-9]+"),
    field(LOCAL_AREA_CODE, r"[0-9]+"),
    field(CELL_ID, r"[0-9]+"),
];

/// A field grammar with its shapes compiled.
pub struct Grammar {
    fields: Vec<(FieldDescriptor, Regex)>,
}

impl Grammar {
    pub fn new(descriptors: &[FieldDescriptor]) -> std::result::Result<Self, regex::Error> {
        let fields = descriptors
            .iter()
            .map(|d| Regex::new(&format!("^(?:{})$", d.shape)).map(|re| (*d, re)))
            .collect::<std::result::Result<_, _>>()?;
        Ok(Self { fields })
    }

    /// Match comma-separated `body` against the grammar.
    ///
    /// Either every field matches its shape, or the whole match fails.
    pub fn capture<'a>(&self, body: &'a str) -> Result<Captures<'a>> {
        let tokens: Vec<&str> = body.split(SEPARATOR).collect();
        if tokens.len() != self.fields.len() {
            return Err(H02Error::MalformedPacket(format!(
                "expected {} fields, got {}",
                self.fields.len(),
                tokens.len()
            )));
        }

        let mut values = Vec::with_capacity(tokens.len());
        for ((descriptor, shape), token) in self.fields.iter().zip(tokens) {
            if !shape.is_match(token) {
                return Err(H02Error::MalformedPacket(format!(
                    "{}: unexpected token {token:?}",
                    descriptor.name
                )));
            }
            values.push((descriptor.name, token));
        }
        Ok(Captures { values })
    }
}

static LOCATION_GRAMMAR: LazyLock<Grammar> =
    LazyLock::new(|| Grammar::new(&LOCATION_FIELDS).expect("location grammar"));

/// Tokens matched by a [`Grammar`], looked up by field name.
#[derive(Debug)]
pub struct Captures<'a> {
    values: Vec<(&'static str, &'a str)>,
}

impl<'a> Captures<'a> {
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    fn require(&self, name: &str) -> Result<&'a str> {
        self.get(name)
            .ok_or_else(|| H02Error::MalformedPacket(format!("{name}: field not in grammar")))
    }

    fn require_char(&self, name: &str) -> Result<char> {
        let token = self.require(name)?;
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(H02Error::MalformedPacket(format!(
                "{name}: expected one character, got {token:?}"
            ))),
        }
    }
}

/// Cell-tower identification reported alongside the fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellFields {
    pub mcc: String,
    pub mnc: String,
    pub lac: String,
    pub cell_id: String,
}

/// Protocol-native tokens of one location report.
///
/// Produced by either the text grammar or the binary reader; everything
/// derived from a transmission is computed from these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFields {
    /// Absent on binary frames.
    pub maker: Option<String>,
    pub serial: String,
    /// `HHMMSS`, UTC.
    pub time: String,
    /// `DDMMYY`.
    pub date: String,
    /// `A` or `V`.
    pub validity: char,
    pub latitude: String,
    pub latitude_hemisphere: char,
    pub longitude: String,
    pub longitude_hemisphere: char,
    /// Knots.
    pub speed: String,
    /// Degrees.
    pub heading: String,
    /// Two hex characters each, transmission order.
    pub status: [String; 4],
    /// Absent on binary frames.
    pub cell: Option<CellFields>,
}

/// Split an 8-character status blob into its four byte tokens.
pub fn split_status(blob: &str) -> Result<[String; 4]> {
    if blob.len() != 8 || !blob.is_ascii() {
        return Err(H02Error::MalformedPacket(format!(
            "status: expected 8 hex characters, got {blob:?}"
        )));
    }
    Ok([0, 2, 4, 6].map(|i| blob[i..i + 2].to_string()))
}

/// Extract the location report fields from a text transmission.
///
/// `text` starts at the `*` marker. The `#` terminator and a trailing line
/// ending are stripped; with `require_terminator` a missing `#` is an error.
pub fn extract_fields(text: &str, require_terminator: bool) -> Result<ParsedFields> {
    let body = text
        .strip_prefix(char::from(ASCII_MARKER))
        .ok_or_else(|| H02Error::MalformedPacket("missing '*' marker".to_string()))?;
    let body = body.trim_end_matches(['\r', '\n']);
    let body = match body.strip_suffix(ASCII_TERMINATOR) {
        Some(body) => body,
        None if require_terminator => {
            return Err(H02Error::MalformedPacket("missing '#' terminator".to_string()));
        }
        None => body,
    };

    let caps = LOCATION_GRAMMAR.capture(body)?;

    Ok(ParsedFields {
        maker: Some(caps.require(MAKER)?.to_string()),
        serial: caps.require(SERIAL)?.to_string(),
        time: caps.require(TIME)?.to_string(),
        date: caps.require(DATE)?.to_string(),
        validity: caps.require_char(VALIDITY)?,
        latitude: caps.require(LATITUDE)?.to_string(),
        latitude_hemisphere: caps.require_char(LATITUDE_HEMISPHERE)?,
        longitude: caps.require(LONGITUDE)?.to_string(),
        longitude_hemisphere: caps.require_char(LONGITUDE_HEMISPHERE)?,
        speed: caps.require(SPEED)?.to_string(),
        heading: caps.require(HEADING)?.to_string(),
        status: split_status(caps.require(STATUS)?)?,
        cell: Some(CellFields {
            mcc: caps.require(MOBILE_COUNTRY_CODE)?.to_string(),
            mnc: caps.require(MOBILE_NETWORK_CODE)?.to_string(),
            lac: caps.require(LOCAL_AREA_CODE)?.to_string(),
            cell_id: caps.require(CELL_ID)?.to_string(),
        }),
    })
}
