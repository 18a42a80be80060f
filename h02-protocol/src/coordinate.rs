use std::sync::LazyLock;

use regex::Regex;

use crate::error::{H02Error, Result};

/// Knots to km/h.
pub const KNOTS_TO_KMH: f64 = 1.852;

static LATITUDE: LazyLock<Regex> = LazyLock::new(|| Axis::Latitude.compile());
static LONGITUDE: LazyLock<Regex> = LazyLock::new(|| Axis::Longitude.compile());

/// Which coordinate a degrees-minutes token encodes.
///
/// Latitude tokens carry 2 degree digits (`DDMM.MMMM`), longitude tokens 3
/// (`DDDMM.MMMM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    pub fn degree_digits(self) -> usize {
        match self {
            Axis::Latitude => 2,
            Axis::Longitude => 3,
        }
    }

    /// `D{n}MM.MMMM` with an optional leading `-` kept on the degree part.
    fn compile(self) -> Regex {
        let shape = format!(r"^(-?[0-9]{{{}}})([0-9]{{2}}\.[0-9]{{4}})$", self.degree_digits());
        Regex::new(&shape).expect("coordinate pattern")
    }

    fn pattern(self) -> &'static Regex {
        match self {
            Axis::Latitude => &LATITUDE,
            Axis::Longitude => &LONGITUDE,
        }
    }
}

/// Convert a degrees-minutes token into decimal degrees, rounded to 6 places.
///
/// The degree part keeps a leading `-` and the minutes are added to it, so
/// `"-4413.5467"` is `-44 + 13.5467 / 60`. Hemisphere letters are not handled
/// here.
pub fn to_decimal_degrees(raw: &str, axis: Axis) -> Result<f64> {
    let malformed = || H02Error::MalformedCoordinate(raw.to_string());
    let caps = axis.pattern().captures(raw).ok_or_else(malformed)?;

    let degrees: i32 = caps[1].parse().map_err(|_| malformed())?;
    let minutes: f64 = caps[2].parse().map_err(|_| malformed())?;

    Ok(round_to(f64::from(degrees) + minutes / 60.0, 6))
}

/// Apply the hemisphere letter to a converted coordinate: `S` and `W` are negative.
pub fn apply_hemisphere(value: f64, hemisphere: char) -> f64 {
    match hemisphere {
        'S' | 'W' => -value,
        _ => value,
    }
}

/// Speed over ground: knots to km/h, rounded to 2 places.
pub fn knots_to_kmh(knots: f64) -> f64 {
    round_to(knots * KNOTS_TO_KMH, 2)
}

/// Parse a transmitted knots token (e.g. `"010.00"`) and convert it to km/h.
pub fn speed_kmh(token: &str) -> Result<f64> {
    let knots: f64 = token
        .parse()
        .map_err(|_| H02Error::MalformedPacket(format!("invalid speed token {token:?}")))?;
    Ok(knots_to_kmh(knots))
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}
