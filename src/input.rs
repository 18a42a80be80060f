use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("empty input line")]
    Empty,

    #[error("hex dump has an odd number of digits")]
    OddLength,

    #[error("invalid hex digit {0:?}")]
    InvalidHexDigit(char),
}

/// Turn one input line into the raw bytes of a transmission.
///
/// Lines starting with `*` are text frames and are passed through as-is.
/// Anything else is a hex dump of the raw bytes (whitespace and `:` between
/// digits are ignored), which is how `$`-framed binary reports are given.
pub fn parse_line(line: &str) -> Result<Vec<u8>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(InputError::Empty);
    }
    if line.starts_with('*') {
        return Ok(line.as_bytes().to_vec());
    }
    decode_hex(line)
}

fn decode_hex(dump: &str) -> Result<Vec<u8>, InputError> {
    let digits = dump
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .map(|c| {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or(InputError::InvalidHexDigit(c))
        })
        .collect::<Result<Vec<u8>, _>>()?;
    if digits.len() % 2 != 0 {
        return Err(InputError::OddLength);
    }
    Ok(digits.chunks(2).map(|pair| pair[0] << 4 | pair[1]).collect())
}
