use thiserror::Error;

pub type Result<T> = std::result::Result<T, H02Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum H02Error {
    /// Empty input, or a leading byte that is neither `*` nor `$`.
    #[error("unsupported frame marker: {}", describe_marker(.0))]
    UnsupportedFrame(Option<u8>),

    #[error("transmission is not valid text: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("malformed packet: {0}")]
    MalformedPacket(String),

    #[error("malformed coordinate: {0:?}")]
    MalformedCoordinate(String),

    #[error("status bit position out of range: {0}")]
    InvalidBitPosition(u8),

    #[error("invalid status byte: {0:?}")]
    InvalidStatusByte(String),
}

fn describe_marker(marker: &Option<u8>) -> String {
    match marker {
        Some(b) => format!("{b:#04x}"),
        None => "empty transmission".to_string(),
    }
}
