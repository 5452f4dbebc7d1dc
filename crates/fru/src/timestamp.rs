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

use crate::error::{FruError, Result};

/// Minutes since 1996-01-01 00:00:00 UTC, stored on the wire as 3 little-endian bytes.
const EPOCH_OFFSET_SECS: i64 = 820_476_000;

/// A FRU timestamp: 24-bit minute count since the 1996 epoch.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FruTimestamp(u32);

impl FruTimestamp {
    pub const ZERO: Self = Self(0);
    const MAX_MINUTES: u32 = 0x00FF_FFFF;

    /// Build a timestamp from a raw minute count, rejecting anything that
    /// would not fit in the 24-bit on-wire field.
    pub fn from_minutes(minutes: u32) -> Result<Self> {
        if minutes > Self::MAX_MINUTES {
            return Err(FruError::InvalidArgument);
        }
        Ok(Self(minutes))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    /// Convert from Unix epoch seconds, rounding to the nearest minute.
    pub fn from_unix_seconds(unix_secs: i64) -> Result<Self> {
        let delta = unix_secs - EPOCH_OFFSET_SECS;
        let minutes = (delta + 30) / 60;
        if minutes < 0 || minutes as i64 > Self::MAX_MINUTES as i64 {
            return Err(FruError::InvalidArgument);
        }
        Ok(Self(minutes as u32))
    }

    /// Convert back to Unix epoch seconds.
    pub fn to_unix_seconds(self) -> i64 {
        (self.0 as i64) * 60 + EPOCH_OFFSET_SECS
    }

    pub(crate) fn from_wire(bytes: [u8; 3]) -> Self {
        let minutes = bytes[0] as u32 | (bytes[1] as u32) << 8 | (bytes[2] as u32) << 16;
        Self(minutes)
    }

    pub(crate) fn to_wire(self) -> [u8; 3] {
        [
            (self.0 & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            ((self.0 >> 16) & 0xFF) as u8,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_wire_bytes() {
        let ts = FruTimestamp::from_minutes(0x00AB_CDEF & 0x00FF_FFFF).unwrap();
        let wire = ts.to_wire();
        assert_eq!(FruTimestamp::from_wire(wire), ts);
    }

    #[test]
    fn converts_unix_epoch_and_back_within_a_minute() {
        let unix_now = 1_700_000_000i64;
        let ts = FruTimestamp::from_unix_seconds(unix_now).unwrap();
        let back = ts.to_unix_seconds();
        assert!((back - unix_now).abs() <= 30);
    }

    #[test]
    fn rejects_pre_epoch_seconds() {
        assert_eq!(
            FruTimestamp::from_unix_seconds(0).unwrap_err(),
            FruError::InvalidArgument
        );
    }

    #[test]
    fn rejects_minutes_beyond_24_bits() {
        assert_eq!(
            FruTimestamp::from_minutes(FruTimestamp::MAX_MINUTES + 1).unwrap_err(),
            FruError::InvalidArgument
        );
    }
}
