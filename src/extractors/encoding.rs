// src/extractors/encoding.rs

// --- Imports ---
use crate::utils::error::DecodeError;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};
use serde::Serialize;
use std::fmt;

// --- Constants ---
const BOM_LE: [u8; 2] = [0xFF, 0xFE];
const BOM_BE: [u8; 2] = [0xFE, 0xFF];

/// Encodings tried, in order, by the diagnostic sampler.
/// windows-1252 also answers for the latin1 / cp1252 / iso-8859-1 labels.
const SAMPLE_ENCODINGS: [&Encoding; 2] = [UTF_8, WINDOWS_1252];

// --- Data Structures ---
/// UTF-16 flavour selected from the first two bytes of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Utf16Variant {
    LittleEndian,
    BigEndian,
    /// No recognised marker. The remaining bytes may still carry one,
    /// otherwise they are read as little-endian.
    Unspecified,
}

impl fmt::Display for Utf16Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Utf16Variant::LittleEndian => "utf-16-le",
            Utf16Variant::BigEndian => "utf-16-be",
            Utf16Variant::Unspecified => "utf-16",
        };
        f.write_str(label)
    }
}

/// Inspects the byte-order mark and returns the variant together with the
/// bytes that follow the first two. Those two bytes are consumed even when
/// they are not a marker.
pub fn detect(bytes: &[u8]) -> (Utf16Variant, &[u8]) {
    let split = bytes.len().min(2);
    let (head, rest) = bytes.split_at(split);

    let variant = if head == BOM_LE {
        Utf16Variant::LittleEndian
    } else if head == BOM_BE {
        Utf16Variant::BigEndian
    } else {
        Utf16Variant::Unspecified
    };

    tracing::debug!("Detected {} from leading bytes {:02X?}", variant, head);
    (variant, rest)
}

/// Decodes `bytes` as UTF-16 of the given variant, failing on any malformed
/// or truncated input instead of substituting replacement characters.
pub fn decode(variant: Utf16Variant, bytes: &[u8]) -> Result<String, DecodeError> {
    if bytes.len() % 2 != 0 {
        return Err(DecodeError::Truncated(bytes.len()));
    }

    let (encoding, body) = match variant {
        Utf16Variant::LittleEndian => (UTF_16LE, bytes),
        Utf16Variant::BigEndian => (UTF_16BE, bytes),
        Utf16Variant::Unspecified => match bytes.get(..2) {
            Some(head) if head == BOM_LE => (UTF_16LE, &bytes[2..]),
            Some(head) if head == BOM_BE => (UTF_16BE, &bytes[2..]),
            _ => (UTF_16LE, bytes),
        },
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
        .ok_or(DecodeError::Malformed {
            encoding: encoding.name(),
            len: body.len(),
        })
}

/// Decodes a raw sample with the first encoding in [`SAMPLE_ENCODINGS`] that
/// accepts it. Used for manual inspection only, never for extraction.
pub fn decode_sample(sample: &[u8]) -> Option<(&'static str, String)> {
    SAMPLE_ENCODINGS.iter().find_map(|encoding| {
        encoding
            .decode_without_bom_handling_and_without_replacement(sample)
            .map(|text| (encoding.name(), text.into_owned()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(|unit| unit.to_le_bytes()).collect()
    }

    fn utf16be(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(|unit| unit.to_be_bytes()).collect()
    }

    #[test]
    fn test_detect_little_endian_marker() {
        let mut bytes = BOM_LE.to_vec();
        bytes.extend(utf16le("Alias"));

        let (variant, rest) = detect(&bytes);
        assert_eq!(variant, Utf16Variant::LittleEndian);
        assert_eq!(decode(variant, rest).unwrap(), "Alias");
    }

    #[test]
    fn test_detect_big_endian_marker() {
        let mut bytes = BOM_BE.to_vec();
        bytes.extend(utf16be("Item Name"));

        let (variant, rest) = detect(&bytes);
        assert_eq!(variant, Utf16Variant::BigEndian);
        assert_eq!(decode(variant, rest).unwrap(), "Item Name");
    }

    #[test]
    fn test_detect_without_marker_still_consumes_two_bytes() {
        let bytes = utf16le("ABC");

        let (variant, rest) = detect(&bytes);
        assert_eq!(variant, Utf16Variant::Unspecified);
        assert_eq!(rest.len(), bytes.len() - 2);
        // "A" is gone, the rest falls back to little-endian.
        assert_eq!(decode(variant, rest).unwrap(), "BC");
    }

    #[test]
    fn test_detect_short_input() {
        let (variant, rest) = detect(&[0x41]);
        assert_eq!(variant, Utf16Variant::Unspecified);
        assert!(rest.is_empty());
        assert_eq!(decode(variant, rest).unwrap(), "");
    }

    #[test]
    fn test_unspecified_honours_inner_marker() {
        let mut bytes = vec![0x00, 0x00];
        bytes.extend(BOM_BE);
        bytes.extend(utf16be("ok"));

        let (variant, rest) = detect(&bytes);
        assert_eq!(variant, Utf16Variant::Unspecified);
        assert_eq!(decode(variant, rest).unwrap(), "ok");
    }

    #[test]
    fn test_decode_rejects_odd_length() {
        let err = decode(Utf16Variant::LittleEndian, &[0x41, 0x00, 0x42]).unwrap_err();
        assert_eq!(err, DecodeError::Truncated(3));
    }

    #[test]
    fn test_decode_rejects_unpaired_surrogate() {
        // 0xD800 with nothing after it
        let result = decode(Utf16Variant::LittleEndian, &[0x00, 0xD8, 0x41, 0x00]);
        assert!(matches!(result, Err(DecodeError::Malformed { .. })));
    }

    #[test]
    fn test_decode_sample_prefers_utf8() {
        let (label, text) = decode_sample("Item Name=caf\u{e9}".as_bytes()).unwrap();
        assert_eq!(label, "UTF-8");
        assert_eq!(text, "Item Name=caf\u{e9}");
    }

    #[test]
    fn test_decode_sample_falls_back_to_single_byte() {
        let (label, text) = decode_sample(&[b'c', b'a', b'f', 0xE9]).unwrap();
        assert_eq!(label, "windows-1252");
        assert_eq!(text, "caf\u{e9}");
    }
}
