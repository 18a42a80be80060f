use log::{debug, trace};

use crate::binary;
use crate::error::{H02Error, Result};
use crate::frame::FrameKind;
use crate::grammar;
use crate::location::LocationRecord;
use crate::status::StatusBit;

/// Configuration for decoding.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Status byte and bit carrying the ACC (ignition) line.
    pub acc: StatusBit,
    /// Reject text frames that do not end in `#`.
    pub require_terminator: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            acc: StatusBit::ACC,
            require_terminator: false,
        }
    }
}

/// Decodes single H02 transmissions into [`LocationRecord`]s.
///
/// Holds no state between calls; one decoder can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct PacketDecoder {
    config: DecoderConfig,
}

impl PacketDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Decode one transmission, dispatching on its first byte.
    pub fn decode(&self, raw: &[u8]) -> Result<LocationRecord> {
        trace!("RX: {:02X?}", raw);

        let fields = match FrameKind::classify(raw) {
            FrameKind::Ascii => {
                debug!("decoding text frame ({} bytes)", raw.len());
                let text = std::str::from_utf8(raw)?;
                grammar::extract_fields(text, self.config.require_terminator)?
            }
            FrameKind::Binary => {
                debug!("decoding binary frame ({} bytes)", raw.len());
                binary::read_fields(raw)?
            }
            FrameKind::Unknown(marker) => {
                debug!("rejecting frame with marker {:02X?}", marker);
                return Err(H02Error::UnsupportedFrame(marker));
            }
        };

        LocationRecord::from_fields(fields, self.config.acc)
    }
}

/// Decode one transmission with the default configuration.
pub fn decode(raw: &[u8]) -> Result<LocationRecord> {
    PacketDecoder::default().decode(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::tests::SAMPLE as BINARY_SAMPLE;
    use crate::location::Validity;
    use crate::status::StatusBytes;

    const ASCII_SAMPLE: &[u8] =
        b"*HQ,865205030330012,V1,145452,A,4413.5467,N,12754.4324,E,010.00,045,100815,FFFFDFFF,282,02,10342,4283#";

    #[test]
    fn test_decode_ascii() {
        let record = decode(ASCII_SAMPLE).unwrap();
        assert_eq!(record.maker.as_deref(), Some("HQ"));
        assert_eq!(record.device_serial_number, "865205030330012");
        assert_eq!(record.time, "145452");
        assert_eq!(record.validity, Validity::Valid);
        assert_eq!(record.latitude, 44.225778);
        assert_eq!(record.longitude, 127.907207);
        assert_eq!(record.speed_kmh, 18.52);
        assert_eq!(record.heading, 45.0);
        assert!(record.acc_on);
        let cell = record.cell.unwrap();
        assert_eq!(cell.mobile_country_code, "282");
        assert_eq!(cell.mobile_network_code, "02");
        assert_eq!(cell.local_area_code, "10342");
        assert_eq!(cell.cell_id, "4283");
    }

    #[test]
    fn test_decode_binary() {
        let record = decode(&BINARY_SAMPLE).unwrap();
        assert_eq!(record.maker, None);
        assert_eq!(record.device_serial_number, "4106012736");
        assert_eq!(record.validity, Validity::Valid);
        assert_eq!(record.latitude, 44.225778);
        assert_eq!(record.longitude, 127.907207);
        assert_eq!(record.speed_kmh, 18.52);
        assert_eq!(record.heading, 45.0);
        assert!(record.acc_on);
        assert_eq!(record.status, StatusBytes([0xFF, 0xFF, 0xDF, 0xFF]));
        assert_eq!(record.cell, None);
    }

    #[test]
    fn test_both_paths_converge() {
        let ascii = decode(ASCII_SAMPLE).unwrap();
        let binary = decode(&BINARY_SAMPLE).unwrap();
        assert_eq!(ascii.latitude, binary.latitude);
        assert_eq!(ascii.longitude, binary.longitude);
        assert_eq!(ascii.speed_kmh, binary.speed_kmh);
        assert_eq!(ascii.heading, binary.heading);
        assert_eq!(ascii.acc_on, binary.acc_on);
        assert_eq!(ascii.status, binary.status);
        assert_eq!(ascii.date, binary.date);
        assert_eq!(ascii.time, binary.time);
    }

    #[test]
    fn test_unsupported_frame() {
        assert_eq!(
            decode(b"#garbage"),
            Err(H02Error::UnsupportedFrame(Some(b'#')))
        );
        assert_eq!(decode(b""), Err(H02Error::UnsupportedFrame(None)));
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let text = b"*HQ,865205030330012,V1,145452,A,4413.5467,N,12754.4324,E,010.00,045,100815,FFFFDFFF,282,02,10342#";
        assert!(matches!(decode(text), Err(H02Error::MalformedPacket(_))));
    }

    #[test]
    fn test_non_utf8_is_encoding_error() {
        let mut raw = ASCII_SAMPLE.to_vec();
        raw[5] = 0xFF;
        assert!(matches!(decode(&raw), Err(H02Error::Encoding(_))));
    }

    #[test]
    fn test_non_ascii_text_is_malformed() {
        let text = "*HQ,8652°5030330012,V1,145452,A,4413.5467,N,12754.4324,E,010.00,045,100815,FFFFDFFF,282,02,10342,4283#";
        assert!(matches!(
            decode(text.as_bytes()),
            Err(H02Error::MalformedPacket(_))
        ));
    }

    #[test]
    fn test_heading_out_of_range_rejected() {
        let text = std::str::from_utf8(ASCII_SAMPLE).unwrap().replace(",045,", ",999,");
        assert!(matches!(
            decode(text.as_bytes()),
            Err(H02Error::MalformedPacket(_))
        ));

        let mut raw = BINARY_SAMPLE;
        raw[23] = 0x03; // heading 360
        raw[24] = 0x60;
        assert!(matches!(decode(&raw), Err(H02Error::MalformedPacket(_))));
        raw[23] = 0x03; // heading 359
        raw[24] = 0x59;
        assert_eq!(decode(&raw).unwrap().heading, 359.0);
    }

    #[test]
    fn test_decode_is_repeatable() {
        assert_eq!(decode(ASCII_SAMPLE), decode(ASCII_SAMPLE));
        assert_eq!(decode(&BINARY_SAMPLE), decode(&BINARY_SAMPLE));
    }

    #[test]
    fn test_custom_acc_location() {
        let decoder = PacketDecoder::new(DecoderConfig {
            acc: StatusBit { byte: 1, bit: 1 },
            ..DecoderConfig::default()
        });
        // byte 1 = 0xFF: bit 1 set, so inactive
        assert!(!decoder.decode(ASCII_SAMPLE).unwrap().acc_on);
    }

    #[test]
    fn test_invalid_acc_location() {
        let decoder = PacketDecoder::new(DecoderConfig {
            acc: StatusBit { byte: 3, bit: 9 },
            ..DecoderConfig::default()
        });
        assert_eq!(
            decoder.decode(ASCII_SAMPLE),
            Err(H02Error::InvalidBitPosition(9))
        );
    }

    #[test]
    fn test_require_terminator() {
        let decoder = PacketDecoder::new(DecoderConfig {
            require_terminator: true,
            ..DecoderConfig::default()
        });
        let unterminated = &ASCII_SAMPLE[..ASCII_SAMPLE.len() - 1];
        assert!(decoder.decode(ASCII_SAMPLE).is_ok());
        assert!(matches!(
            decoder.decode(unterminated),
            Err(H02Error::MalformedPacket(_))
        ));
    }

    #[test]
    fn test_decoder_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PacketDecoder>();
    }

    proptest::proptest! {
        #[test]
        fn test_arbitrary_bytes_decode_deterministically(
            raw in proptest::collection::vec(proptest::prelude::any::<u8>(), 0..64)
        ) {
            proptest::prop_assert_eq!(decode(&raw), decode(&raw));
        }

        #[test]
        fn test_corrupted_binary_frame_never_panics(
            index in 1usize..29,
            value in proptest::prelude::any::<u8>()
        ) {
            let mut raw = BINARY_SAMPLE;
            raw[index] = value;
            let first = decode(&raw);
            proptest::prop_assert_eq!(&first, &decode(&raw));
        }

        #[test]
        fn test_text_frames_decode_deterministically(body in "[ -~]{0,120}") {
            let text = format!("*{body}");
            proptest::prop_assert_eq!(decode(text.as_bytes()), decode(text.as_bytes()));
        }
    }
}
