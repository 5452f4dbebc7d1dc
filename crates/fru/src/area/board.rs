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

//! The Board Info area: language code, a manufacture timestamp, then five
//! fixed strings (manufacturer, product name, serial, part number, FRU
//! file id) followed by custom strings.

use super::{encode_info_area, AreaState};
use crate::error::Result;
use crate::string_array::StringArray;
use crate::string_codec::StringType;
use crate::timestamp::FruTimestamp;
use crate::write_planner::WritePlanner;

pub const EMPTY_LENGTH: usize = 13;
const HEADER_LEN: usize = 6;
const NUM_FIXED: usize = 5;
const VERSION: u8 = 1;
const ENGLISH_LANGUAGE_CODE: u8 = 25;

pub const MANUFACTURER: usize = 0;
pub const PRODUCT_NAME: usize = 1;
pub const SERIAL_NUMBER: usize = 2;
pub const PART_NUMBER: usize = 3;
pub const FRU_FILE_ID: usize = 4;

#[derive(Debug, Clone)]
pub struct BoardArea {
    pub state: AreaState,
    language_code: u8,
    mfg_date_time: FruTimestamp,
    strings: StringArray,
}

impl BoardArea {
    pub fn setup_new(offset: usize, length: usize) -> Self {
        let strings = StringArray::new_empty(NUM_FIXED, length - HEADER_LEN - 2);
        Self {
            state: AreaState::new(offset, length, EMPTY_LENGTH),
            language_code: ENGLISH_LANGUAGE_CODE,
            mfg_date_time: FruTimestamp::ZERO,
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
        let language_code = body[2];
        let mfg_date_time = FruTimestamp::from_wire([body[3], body[4], body[5]]);
        let capacity = length - HEADER_LEN - 2;
        let language_is_english = language_code == ENGLISH_LANGUAGE_CODE;
        let (strings, _consumed) =
            StringArray::decode(&body[HEADER_LEN..], NUM_FIXED, capacity, language_is_english)?;
        let used_length = HEADER_LEN + strings.total_raw_len() + 2;
        Ok(Self {
            state: AreaState::new(offset, length, used_length),
            language_code,
            mfg_date_time,
            strings,
        })
    }

    pub fn language_code(&self) -> u8 {
        self.language_code
    }

    pub fn set_language_code(&mut self, code: u8) {
        self.language_code = code;
        self.state.mark_changed();
        self.state.rewrite = true;
    }

    pub fn mfg_date_time(&self) -> FruTimestamp {
        self.mfg_date_time
    }

    pub fn set_mfg_date_time(&mut self, ts: FruTimestamp) {
        self.mfg_date_time = ts;
        self.state.mark_changed();
    }

    fn field(&self, index: usize) -> Result<&[u8]> {
        Ok(self.strings.get(index, false)?.payload())
    }

    fn set_field(&mut self, index: usize, kind: StringType, payload: &[u8]) -> Result<()> {
        self.strings.set(index, kind, payload, false)?;
        self.state.mark_changed();
        Ok(())
    }

    pub fn manufacturer(&self) -> Result<&[u8]> {
        self.field(MANUFACTURER)
    }
    pub fn set_manufacturer(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.set_field(MANUFACTURER, kind, payload)
    }

    pub fn product_name(&self) -> Result<&[u8]> {
        self.field(PRODUCT_NAME)
    }
    pub fn set_product_name(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.set_field(PRODUCT_NAME, kind, payload)
    }

    pub fn serial_number(&self) -> Result<&[u8]> {
        self.field(SERIAL_NUMBER)
    }
    pub fn set_serial_number(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.set_field(SERIAL_NUMBER, kind, payload)
    }

    pub fn part_number(&self) -> Result<&[u8]> {
        self.field(PART_NUMBER)
    }
    pub fn set_part_number(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.set_field(PART_NUMBER, kind, payload)
    }

    pub fn fru_file_id(&self) -> Result<&[u8]> {
        self.field(FRU_FILE_ID)
    }
    pub fn set_fru_file_id(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.set_field(FRU_FILE_ID, kind, payload)
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
        let wire_ts = self.mfg_date_time.to_wire();
        let header = [
            VERSION,
            length_slot,
            self.language_code,
            wire_ts[0],
            wire_ts[1],
            wire_ts[2],
        ];
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
    fn non_english_language_reinterprets_product_name_as_unicode() {
        let mut area = BoardArea::setup_new(8, 24);
        area.set_language_code(0);
        area.set_product_name(StringType::Ascii8, b"abc").unwrap();

        let mut buf = [0u8; 32];
        let mut planner = WritePlanner::new();
        area.encode(&mut buf, &mut planner);

        let decoded = BoardArea::decode(&buf, 8, 32).unwrap();
        assert_eq!(
            decoded.strings.get(PRODUCT_NAME, false).unwrap().kind(),
            StringType::Unicode
        );
    }

    #[test]
    fn timestamp_round_trips() {
        let mut area = BoardArea::setup_new(8, 24);
        let ts = FruTimestamp::from_minutes(123_456).unwrap();
        area.set_mfg_date_time(ts);
        let mut buf = [0u8; 32];
        let mut planner = WritePlanner::new();
        area.encode(&mut buf, &mut planner);
        let decoded = BoardArea::decode(&buf, 8, 32).unwrap();
        assert_eq!(decoded.mfg_date_time(), ts);
    }
}
