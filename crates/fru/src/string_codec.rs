/*
  ____                 __               __   _ __
 / __ \__ _____ ____  / /___ ____ _    / /  (_) /
/ /_/ / // / _ `/ _ \/ __/ // /  ' \  / /__/ / _ \
\___\_\_,_/\_,_/_//_/\__/\_,_/_/_/_/ /____/_/_.__/
    Part of the Quantum OS Project

Copyright 2025 Gavin Kellam

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and
associated documentation files (the "Software"), to deal in the Software without restriction,
including without limitation the rights to use, copy, modify, merge, publish, distribute,
sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or substantial
portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT
NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT
OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
*/

//! Encode/decode of a single IPMI FRU type/length string.

use crate::error::{FruError, Result};
use alloc::vec::Vec;

/// The end-of-list marker byte; never produced by [`encode`] and must be
/// checked for by the caller before calling [`decode`].
pub const END_OF_LIST: u8 = 0xC1;
/// The canonical "empty string" encoding.
const EMPTY_STRING: u8 = 0xC0;
/// Protocol cap on a single string's payload length.
pub const MAX_PAYLOAD_LEN: usize = 63;

/// The decoded semantic type of a TLV string. `Ascii8` and `Unicode` share the
/// same wire code (`3`); which one a string decodes to depends on the area's
/// language code and any caller override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringType {
    Binary,
    BcdPlus,
    SixBitAscii,
    Ascii8,
    Unicode,
}

impl StringType {
    fn wire_code(self) -> u8 {
        match self {
            StringType::Binary => 0,
            StringType::BcdPlus => 1,
            StringType::SixBitAscii => 2,
            StringType::Ascii8 | StringType::Unicode => 3,
        }
    }
}

/// A decoded string value: its semantic type plus payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedString {
    pub kind: StringType,
    pub payload: Vec<u8>,
}

/// Decode one TLV string starting at `bytes[0]`.
///
/// `language_is_english` and `force_unicode` together select whether a
/// wire-type-3 string decodes as `Ascii8` or `Unicode` (§4.1: non-English
/// areas may reinterpret ASCII-8 fields as Unicode).
///
/// Returns the decoded value and the number of bytes consumed (including the
/// 1-byte prefix). Callers must special-case [`END_OF_LIST`] before calling
/// this function; it is not a valid string prefix.
pub fn decode(
    bytes: &[u8],
    language_is_english: bool,
    force_unicode: bool,
) -> Result<(DecodedString, usize)> {
    let &prefix = bytes.first().ok_or(FruError::BadFormat)?;
    if prefix == END_OF_LIST {
        return Err(FruError::InvalidArgument);
    }

    let wire_type = (prefix >> 6) & 0x3;
    let len = (prefix & 0x3F) as usize;
    let consumed = 1 + len;

    if bytes.len() < consumed {
        return Err(FruError::BadFormat);
    }

    let payload = bytes[1..consumed].to_vec();
    let kind = match wire_type {
        0 => StringType::Binary,
        1 => StringType::BcdPlus,
        2 => StringType::SixBitAscii,
        3 if force_unicode || !language_is_english => StringType::Unicode,
        3 => StringType::Ascii8,
        _ => unreachable!("wire_type is masked to 2 bits"),
    };

    Ok((DecodedString { kind, payload }, consumed))
}

/// Encode a logical string value into its on-wire form. Payload is silently
/// truncated to [`MAX_PAYLOAD_LEN`] bytes (the protocol maximum; not an error).
/// An empty payload always encodes to the single canonical byte `0xC0`,
/// regardless of `kind`.
pub fn encode(kind: StringType, payload: &[u8]) -> Vec<u8> {
    let payload = &payload[..payload.len().min(MAX_PAYLOAD_LEN)];

    if payload.is_empty() {
        return alloc_vec_of(&[EMPTY_STRING]);
    }

    let prefix = (kind.wire_code() << 6) | (payload.len() as u8 & 0x3F);
    let mut raw = Vec::with_capacity(1 + payload.len());
    raw.push(prefix);
    raw.extend_from_slice(payload);
    raw
}

fn alloc_vec_of(bytes: &[u8]) -> Vec<u8> {
    bytes.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_encodes_to_canonical_byte() {
        assert_eq!(encode(StringType::Ascii8, &[]), alloc::vec![0xC0]);
        assert_eq!(encode(StringType::Binary, &[]), alloc::vec![0xC0]);
    }

    #[test]
    fn round_trips_ascii_english() {
        let raw = encode(StringType::Ascii8, b"ABC");
        let (decoded, consumed) = decode(&raw, true, false).unwrap();
        assert_eq!(consumed, raw.len());
        assert_eq!(decoded.kind, StringType::Ascii8);
        assert_eq!(decoded.payload, b"ABC");
    }

    #[test]
    fn non_english_area_reinterprets_type_3_as_unicode() {
        let raw = encode(StringType::Ascii8, b"ABC");
        let (decoded, _) = decode(&raw, false, false).unwrap();
        assert_eq!(decoded.kind, StringType::Unicode);
    }

    #[test]
    fn force_unicode_overrides_english_language() {
        let raw = encode(StringType::Ascii8, b"ABC");
        let (decoded, _) = decode(&raw, true, true).unwrap();
        assert_eq!(decoded.kind, StringType::Unicode);
    }

    #[test]
    fn truncated_declared_length_is_bad_format() {
        let raw = [0x03, b'A']; // declares 3 bytes, only 1 present
        assert_eq!(decode(&raw, true, false).unwrap_err(), FruError::BadFormat);
    }

    #[test]
    fn payload_over_63_bytes_is_truncated_not_rejected() {
        let payload = [b'x'; 100];
        let raw = encode(StringType::Binary, &payload);
        assert_eq!(raw.len(), 1 + MAX_PAYLOAD_LEN);
    }

    #[test]
    fn end_of_list_byte_is_rejected_by_decode() {
        assert_eq!(
            decode(&[END_OF_LIST], true, false).unwrap_err(),
            FruError::InvalidArgument
        );
    }
}
