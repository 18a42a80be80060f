use std::fmt;

use crate::coordinate::{self, Axis};
use crate::error::{H02Error, Result};
use crate::grammar::{CellFields, ParsedFields};
use crate::status::{StatusBit, StatusBytes};

/// Whether the device reported a GPS fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Validity {
    /// `A`: the position comes from a current fix.
    Valid,
    /// `V`: the position is stale or estimated.
    Invalid,
}

impl Validity {
    pub fn from_flag(flag: char) -> Result<Self> {
        match flag {
            'A' => Ok(Validity::Valid),
            'V' => Ok(Validity::Invalid),
            other => Err(H02Error::MalformedPacket(format!(
                "validity: unexpected flag {other:?}"
            ))),
        }
    }

    pub fn is_valid(self) -> bool {
        self == Validity::Valid
    }
}

/// Cellular network cell the device was camped on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CellTower {
    pub mobile_country_code: String,
    pub mobile_network_code: String,
    pub local_area_code: String,
    pub cell_id: String,
}

impl From<CellFields> for CellTower {
    fn from(cell: CellFields) -> Self {
        Self {
            mobile_country_code: cell.mcc,
            mobile_network_code: cell.mnc,
            local_area_code: cell.lac,
            cell_id: cell.cell_id,
        }
    }
}

/// A decoded H02 location report.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LocationRecord {
    /// Manufacturer tag, e.g. `HQ`. Binary frames carry none.
    pub maker: Option<String>,
    /// Factory-set device ID.
    pub device_serial_number: String,
    /// UTC time of the fix, `HHMMSS` as transmitted.
    pub time: String,
    /// Date of the fix, `DDMMYY` as transmitted.
    pub date: String,
    pub validity: Validity,
    /// Decimal degrees (negative = South).
    pub latitude: f64,
    /// Decimal degrees (negative = West).
    pub longitude: f64,
    /// Speed over ground in km/h, 2 decimal places.
    pub speed_kmh: f64,
    /// Course in degrees (0–359), 0 = north.
    pub heading: f64,
    /// ACC (ignition) line active.
    pub acc_on: bool,
    pub status: StatusBytes,
    /// Binary frames carry no cell information.
    pub cell: Option<CellTower>,
}

impl LocationRecord {
    /// Derive every record field from the extracted tokens.
    pub fn from_fields(fields: ParsedFields, acc: StatusBit) -> Result<Self> {
        let latitude = coordinate::apply_hemisphere(
            coordinate::to_decimal_degrees(&fields.latitude, Axis::Latitude)?,
            fields.latitude_hemisphere,
        );
        let longitude = coordinate::apply_hemisphere(
            coordinate::to_decimal_degrees(&fields.longitude, Axis::Longitude)?,
            fields.longitude_hemisphere,
        );
        let heading: f64 = fields
            .heading
            .parse()
            .ok()
            .filter(|h| (0.0..360.0).contains(h))
            .ok_or_else(|| {
                H02Error::MalformedPacket(format!("heading: invalid token {:?}", fields.heading))
            })?;
        let status = StatusBytes::from_tokens(&fields.status)?;

        Ok(Self {
            validity: Validity::from_flag(fields.validity)?,
            speed_kmh: coordinate::speed_kmh(&fields.speed)?,
            acc_on: status.is_active(acc)?,
            maker: fields.maker,
            device_serial_number: fields.serial,
            time: fields.time,
            date: fields.date,
            latitude,
            longitude,
            heading,
            status,
            cell: fields.cell.map(CellTower::from),
        })
    }

    /// ACC off is the complement of [`acc_on`](Self::acc_on); both come from
    /// the same status bit.
    pub fn acc_off(&self) -> bool {
        !self.acc_on
    }
}

impl fmt::Display for LocationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}T{} {} {:.6},{:.6} {:.2} km/h {:.0}° acc={} status={}",
            self.device_serial_number,
            self.date,
            self.time,
            if self.validity.is_valid() { "A" } else { "V" },
            self.latitude,
            self.longitude,
            self.speed_kmh,
            self.heading,
            if self.acc_on { "on" } else { "off" },
            self.status,
        )?;
        if let Some(cell) = &self.cell {
            write!(
                f,
                " cell={}/{}/{}/{}",
                cell.mobile_country_code,
                cell.mobile_network_code,
                cell.local_area_code,
                cell.cell_id
            )?;
        }
        Ok(())
    }
}
