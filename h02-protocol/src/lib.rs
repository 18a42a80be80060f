//! Decoder for the H02 GPS tracker protocol.
//!
//! H02 devices report positions either as `*`-framed comma-separated text or
//! as `$`-framed packed BCD. Both encodings decode into the same
//! [`LocationRecord`]:
//!
//! ```
//! let raw = b"*HQ,865205030330012,V1,145452,A,4413.5467,N,12754.4324,E,010.00,045,100815,FFFFDFFF,282,02,10342,4283#";
//! let record = h02_protocol::decode(raw).unwrap();
//! assert_eq!(record.latitude, 44.225778);
//! assert_eq!(record.speed_kmh, 18.52);
//! assert!(record.acc_on);
//! ```
//!
//! Transport framing, connection handling and storage are left to the caller:
//! each call decodes exactly one already-split transmission.

pub mod bcd;
pub mod binary;
pub mod coordinate;
pub mod decoder;
pub mod error;
pub mod frame;
pub mod grammar;
pub mod location;
pub mod status;

pub use coordinate::{Axis, knots_to_kmh, to_decimal_degrees};
pub use decoder::{DecoderConfig, PacketDecoder, decode};
pub use error::{H02Error, Result};
pub use frame::FrameKind;
pub use grammar::ParsedFields;
pub use location::{CellTower, LocationRecord, Validity};
pub use status::{StatusBit, StatusBytes, read_status_bit};
