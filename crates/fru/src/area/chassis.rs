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

//! The Chassis Info area. Always treats its strings as English (ASCII-8
//! never reinterpreted as Unicode), per the FRU spec.

use super::{encode_info_area, AreaState};
use crate::error::Result;
use crate::string_array::StringArray;
use crate::string_codec::StringType;
use crate::write_planner::WritePlanner;

pub const EMPTY_LENGTH: usize = 7;
const HEADER_LEN: usize = 3;
const NUM_FIXED: usize = 2;
const VERSION: u8 = 1;

pub const PART_NUMBER: usize = 0;
pub const SERIAL_NUMBER: usize = 1;

#[derive(Debug, Clone)]
pub struct ChassisArea {
    pub state: AreaState,
    chassis_type: u8,
    strings: StringArray,
}

impl ChassisArea {
    pub fn setup_new(offset: usize, length: usize) -> Self {
        let strings = StringArray::new_empty(NUM_FIXED, length - HEADER_LEN - 2);
        Self {
            state: AreaState::new(offset, length, EMPTY_LENGTH),
            chassis_type: 0,
            strings,
        }
    }

    pub fn decode(bytes: &[u8], offset: usize, blob_len: usize) -> Result<Self> {
        use crate::error::FruError;
        if offset + 2 > blob_len {
            return Err(FruError::BadFormat);
        }
        let body = &bytes[offset..];
        if body[0] != VERSION {
            return Err(FruError::BadFormat);
        }
        let length = body[1] as usize * 8;
        if length < EMPTY_LENGTH || offset + length > blob_len {
            return Err(FruError::BadFormat);
        }
        let chassis_type = body[2];
        let capacity = length - HEADER_LEN - 2;
        let (strings, _consumed) =
            StringArray::decode(&body[HEADER_LEN..], NUM_FIXED, capacity, true)?;
        let used_length = HEADER_LEN + strings.total_raw_len() + 2;
        Ok(Self {
            state: AreaState::new(offset, length, used_length),
            chassis_type,
            strings,
        })
    }

    pub fn chassis_type(&self) -> u8 {
        self.chassis_type
    }

    pub fn set_chassis_type(&mut self, value: u8) {
        self.chassis_type = value;
        self.state.mark_changed();
    }

    pub fn part_number(&self) -> Result<&[u8]> {
        Ok(self.strings.get(PART_NUMBER, false)?.payload())
    }

    pub fn set_part_number(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.strings.set(PART_NUMBER, kind, payload, false)?;
        self.state.mark_changed();
        Ok(())
    }

    pub fn serial_number(&self) -> Result<&[u8]> {
        Ok(self.strings.get(SERIAL_NUMBER, false)?.payload())
    }

    pub fn set_serial_number(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.strings.set(SERIAL_NUMBER, kind, payload, false)?;
        self.state.mark_changed();
        Ok(())
    }

    pub fn num_custom(&self) -> usize {
        self.strings.num_custom()
    }

    pub fn custom(&self, ordinal: usize) -> Result<&[u8]> {
        Ok(self.strings.get(ordinal, true)?.payload())
    }

    pub fn set_custom(&mut self, ordinal: usize, kind: Option<StringType>, payload: Option<&[u8]>) -> Result<()> {
        match (kind, payload) {
            (Some(kind), Some(payload)) => self.strings.set(ordinal, kind, payload, true)?,
            _ => self.strings.clear(ordinal, true)?,
        }
        self.state.mark_changed();
        Ok(())
    }

    pub fn set_length(&mut self, length: usize) {
        self.state.length = length as u16;
        self.strings.set_capacity(length - HEADER_LEN - 2);
        self.state.mark_changed();
        self.state.rewrite = true;
    }

    pub fn encode(&mut self, out: &mut [u8], planner: &mut WritePlanner) {
        let length_slot = (self.state.length / 8) as u8;
        let header = [VERSION, length_slot, self.chassis_type];
        encode_info_area(&mut self.state, &header, &mut self.strings, out, planner);
    }

    pub fn write_complete(&mut self) {
        self.state.write_complete();
        self.strings.clear_all_changed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_encode_decode() {
        let mut area = ChassisArea::setup_new(8, 16);
        area.set_part_number(StringType::Ascii8, b"PN123").unwrap();
        area.set_serial_number(StringType::Ascii8, b"SN").unwrap();

        let mut buf = [0u8; 32];
        let mut planner = WritePlanner::new();
        area.encode(&mut buf, &mut planner);
        assert!(!planner.into_ranges().is_empty());

        let decoded = ChassisArea::decode(&buf, 8, 32).unwrap();
        assert_eq!(decoded.part_number().unwrap(), b"PN123");
        assert_eq!(decoded.serial_number().unwrap(), b"SN");
    }

    #[test]
    fn checksum_makes_area_sum_to_zero() {
        let mut area = ChassisArea::setup_new(8, 16);
        area.set_chassis_type(3);
        let mut buf = [0u8; 32];
        let mut planner = WritePlanner::new();
        area.encode(&mut buf, &mut planner);
        let sum = buf[8..24].iter().fold(0u8, |a, &b| a.wrapping_add(b));
        assert_eq!(sum, 0);
    }
}
