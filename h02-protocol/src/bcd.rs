use crate::error::{H02Error, Result};

/// Extract the high nibble of a byte (the "H" digit).
fn hi(b: u8) -> u8 {
    (b >> 4) & 0x0F
}

/// Extract the low nibble of a byte (the "L" digit).
fn lo(b: u8) -> u8 {
    b & 0x0F
}

/// The nibble at `index`, counting high-nibble-first across the slice.
pub fn nibble(bytes: &[u8], index: usize) -> Option<u8> {
    let byte = *bytes.get(index / 2)?;
    Some(if index % 2 == 0 { hi(byte) } else { lo(byte) })
}

/// Read `count` BCD digits starting at nibble `start` as a decimal string.
///
/// Digits are packed two per byte, most significant first. For example
/// `[0x44, 0x13]` read from nibble 0 with count 4 yields `"4413"`. `field`
/// names the value in the error when a nibble is not a decimal digit.
pub fn read_digits(bytes: &[u8], start: usize, count: usize, field: &str) -> Result<String> {
    let mut digits = String::with_capacity(count);
    for index in start..start + count {
        let n = nibble(bytes, index)
            .ok_or_else(|| H02Error::MalformedPacket(format!("{field}: truncated BCD field")))?;
        if n > 9 {
            return Err(H02Error::MalformedPacket(format!(
                "{field}: invalid BCD nibble {n:#03x}"
            )));
        }
        digits.push(char::from(b'0' + n));
    }
    Ok(digits)
}
