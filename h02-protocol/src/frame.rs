/// Leading byte of a text (ASCII) transmission.
pub const ASCII_MARKER: u8 = b'*';
/// Leading byte of a binary transmission.
pub const BINARY_MARKER: u8 = b'$';

/// The encoding of a transmission, decided by its first byte alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// `*`-framed text report.
    Ascii,
    /// `$`-framed packed BCD report.
    Binary,
    /// Anything else; carries the offending byte (`None` for empty input).
    Unknown(Option<u8>),
}

impl FrameKind {
    pub fn classify(raw: &[u8]) -> Self {
        match raw.first().copied() {
            Some(ASCII_MARKER) => FrameKind::Ascii,
            Some(BINARY_MARKER) => FrameKind::Binary,
            other => FrameKind::Unknown(other),
        }
    }
}
