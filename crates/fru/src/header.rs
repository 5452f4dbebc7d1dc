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

//! The 8-byte common header and the layout manager that keeps the five
//! area placements 8-byte aligned, monotone, and non-overlapping.

use crate::area::zero_sum_checksum;
use crate::error::{FruError, Result};

/// Protocol-wide cap on any area's starting offset.
pub const MAX_AREA_OFFSET: usize = 2040;
pub const HEADER_LEN: usize = 8;
const FORMAT_VERSION: u8 = 1;

/// Identifies one of the five areas, in common-header slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaId {
    InternalUse,
    Chassis,
    Board,
    Product,
    MultiRecord,
}

impl AreaId {
    pub const ALL: [AreaId; 5] = [
        AreaId::InternalUse,
        AreaId::Chassis,
        AreaId::Board,
        AreaId::Product,
        AreaId::MultiRecord,
    ];

    pub(crate) fn slot(self) -> usize {
        match self {
            AreaId::InternalUse => 0,
            AreaId::Chassis => 1,
            AreaId::Board => 2,
            AreaId::Product => 3,
            AreaId::MultiRecord => 4,
        }
    }
}

/// Decode and validate the 8-byte common header, returning the five
/// absolute byte offsets (0 meaning "area absent").
pub fn decode_header(buffer: &[u8]) -> Result<[u16; 5]> {
    if buffer.len() < HEADER_LEN {
        return Err(FruError::BadFormat);
    }

    if zero_sum_checksum(&buffer[..HEADER_LEN - 1]) != buffer[HEADER_LEN - 1] {
        lignan::warnln!("common header checksum mismatch");
        return Err(FruError::BadFormat);
    }

    if buffer[0] != FORMAT_VERSION {
        lignan::warnln!("unsupported FRU format version {}", buffer[0]);
        return Err(FruError::BadFormat);
    }

    let mut offsets = [0u16; 5];
    for (i, slot) in offsets.iter_mut().enumerate() {
        *slot = buffer[1 + i] as u16 * 8;
    }

    Ok(offsets)
}

/// Re-encode the 8-byte common header from absolute byte offsets,
/// recomputing the checksum.
pub fn encode_header(offsets: &[u16; 5]) -> [u8; HEADER_LEN] {
    let mut out = [0u8; HEADER_LEN];
    out[0] = FORMAT_VERSION;
    for (i, &offset) in offsets.iter().enumerate() {
        out[1 + i] = (offset / 8) as u8;
    }
    out[6] = 0;
    out[HEADER_LEN - 1] = zero_sum_checksum(&out[..HEADER_LEN - 1]);
    out
}

/// Validate that `(offset, length)` is a legal placement for `moving` given
/// the other currently-present areas, per the 8-byte alignment / 2040-byte
/// cap / monotone-non-overlap rules of the Layout Manager.
pub fn validate_placement(
    blob_len: usize,
    others: &[(AreaId, usize, usize)],
    offset: usize,
    length: usize,
) -> Result<()> {
    if offset == 0 || offset % 8 != 0 || length % 8 != 0 {
        return Err(FruError::InvalidArgument);
    }
    if offset > MAX_AREA_OFFSET.min(blob_len.saturating_sub(8)) {
        return Err(FruError::InvalidArgument);
    }
    if offset + length > blob_len {
        return Err(FruError::InvalidArgument);
    }

    let mut sorted: alloc::vec::Vec<(usize, usize)> =
        others.iter().map(|&(_, o, l)| (o, l)).collect();
    sorted.push((offset, length));
    sorted.sort_unstable_by_key(|&(o, _)| o);

    for window in sorted.windows(2) {
        let (prev_off, prev_len) = window[0];
        let (next_off, _) = window[1];
        if prev_off + prev_len > next_off {
            lignan::warnln!("area placement at {offset:#x}/{length:#x} overlaps a neighbor");
            return Err(FruError::InvalidArgument);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trips() {
        let offsets = [8u16, 16, 0, 0, 32];
        let bytes = encode_header(&offsets);
        assert_eq!(decode_header(&bytes).unwrap(), offsets);
    }

    #[test]
    fn bad_checksum_is_rejected() {
        let offsets = [8u16, 0, 0, 0, 0];
        let mut bytes = encode_header(&offsets);
        bytes[HEADER_LEN - 1] ^= 0x01;
        assert_eq!(decode_header(&bytes).unwrap_err(), FruError::BadFormat);
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let offsets = [8u16, 0, 0, 0, 0];
        let mut bytes = encode_header(&offsets);
        bytes[0] = 2;
        bytes[HEADER_LEN - 1] = zero_sum_checksum(&bytes[..HEADER_LEN - 1]);
        assert_eq!(decode_header(&bytes).unwrap_err(), FruError::BadFormat);
    }

    #[test]
    fn overlapping_areas_are_rejected() {
        let existing = [(AreaId::Chassis, 8usize, 16usize)];
        assert_eq!(
            validate_placement(64, &existing, 16, 16).unwrap_err(),
            FruError::InvalidArgument
        );
    }

    #[test]
    fn offset_past_cap_is_rejected() {
        assert_eq!(
            validate_placement(4096, &[], 2048, 8).unwrap_err(),
            FruError::InvalidArgument
        );
    }
}
