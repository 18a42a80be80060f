use crate::error::{H02Error, Result};

/// Parse a two-character hex token (e.g. `"9F"`) into its byte value.
pub fn parse_status_byte(token: &str) -> Result<u8> {
    if token.len() != 2 || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(H02Error::InvalidStatusByte(token.to_string()));
    }
    u8::from_str_radix(token, 16).map_err(|_| H02Error::InvalidStatusByte(token.to_string()))
}

/// Read one attribute bit from a hex status byte token.
///
/// `position` counts from the least significant bit, starting at 1
/// (1 = `0x01`, 8 = `0x80`). H02 uses negative logic: a cleared bit means
/// the attribute is active, so this returns `true` when the bit is 0.
pub fn read_status_bit(token: &str, position: u8) -> Result<bool> {
    let byte = parse_status_byte(token)?;
    bit_is_active(byte, position)
}

/// Negative-logic bit test on an already parsed status byte.
pub fn bit_is_active(byte: u8, position: u8) -> Result<bool> {
    if !(1..=8).contains(&position) {
        return Err(H02Error::InvalidBitPosition(position));
    }
    let mask = 1u8 << (position - 1);
    Ok(byte & mask == 0)
}

/// Location of a single attribute inside the four status bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBit {
    /// Status byte, 1-based in transmission order (1–4).
    pub byte: u8,
    /// Bit within that byte, 1-based from the LSB (1–8).
    pub bit: u8,
}

impl StatusBit {
    /// ACC (ignition) line for this protocol revision.
    pub const ACC: StatusBit = StatusBit { byte: 3, bit: 6 };
}

/// The four vehicle status bytes, in transmission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StatusBytes(pub [u8; 4]);

impl StatusBytes {
    /// Build from four hex tokens as split off the status blob.
    pub fn from_tokens(tokens: &[String; 4]) -> Result<Self> {
        let mut bytes = [0u8; 4];
        for (slot, token) in bytes.iter_mut().zip(tokens) {
            *slot = parse_status_byte(token)?;
        }
        Ok(Self(bytes))
    }

    /// Whether the attribute at `location` is active (negative logic).
    pub fn is_active(&self, location: StatusBit) -> Result<bool> {
        let index = match location.byte {
            1..=4 => usize::from(location.byte - 1),
            _ => return Err(H02Error::InvalidBitPosition(location.byte)),
        };
        bit_is_active(self.0[index], location.bit)
    }
}

impl std::fmt::Display for StatusBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for b in self.0 {
            write!(f, "{b:02X}")?;
        }
        Ok(())
    }
}
