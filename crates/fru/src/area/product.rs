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

//! The Product Info area: language code, then seven fixed strings
//! (manufacturer, product name, part/model number, version, serial
//! number, asset tag, FRU file id) followed by custom strings.

use super::{encode_info_area, AreaState};
use crate::error::Result;
use crate::string_array::StringArray;
use crate::string_codec::StringType;
use crate::write_planner::WritePlanner;

pub const EMPTY_LENGTH: usize = 12;
const HEADER_LEN: usize = 3;
const NUM_FIXED: usize = 7;
const VERSION: u8 = 1;
const ENGLISH_LANGUAGE_CODE: u8 = 25;

pub const MANUFACTURER_NAME: usize = 0;
pub const PRODUCT_NAME: usize = 1;
pub const PART_MODEL_NUMBER: usize = 2;
pub const VERSION_FIELD: usize = 3;
pub const SERIAL_NUMBER: usize = 4;
pub const ASSET_TAG: usize = 5;
pub const FRU_FILE_ID: usize = 6;

#[derive(Debug, Clone)]
pub struct ProductArea {
    pub state: AreaState,
    language_code: u8,
    strings: StringArray,
}

impl ProductArea {
    pub fn setup_new(offset: usize, length: usize) -> Self {
        let strings = StringArray::new_empty(NUM_FIXED, length - HEADER_LEN - 2);
        Self {
            state: AreaState::new(offset, length, EMPTY_LENGTH),
            language_code: ENGLISH_LANGUAGE_CODE,
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
        let capacity = length - HEADER_LEN - 2;
        let language_is_english = language_code == ENGLISH_LANGUAGE_CODE;
        let (strings, _consumed) =
            StringArray::decode(&body[HEADER_LEN..], NUM_FIXED, capacity, language_is_english)?;
        let used_length = HEADER_LEN + strings.total_raw_len() + 2;
        Ok(Self {
            state: AreaState::new(offset, length, used_length),
            language_code,
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

    fn field(&self, index: usize) -> Result<&[u8]> {
        Ok(self.strings.get(index, false)?.payload())
    }

    fn set_field(&mut self, index: usize, kind: StringType, payload: &[u8]) -> Result<()> {
        self.strings.set(index, kind, payload, false)?;
        self.state.mark_changed();
        Ok(())
    }

    pub fn manufacturer_name(&self) -> Result<&[u8]> {
        self.field(MANUFACTURER_NAME)
    }
    pub fn set_manufacturer_name(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.set_field(MANUFACTURER_NAME, kind, payload)
    }

    pub fn product_name(&self) -> Result<&[u8]> {
        self.field(PRODUCT_NAME)
    }
    pub fn set_product_name(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.set_field(PRODUCT_NAME, kind, payload)
    }

    pub fn part_model_number(&self) -> Result<&[u8]> {
        self.field(PART_MODEL_NUMBER)
    }
    pub fn set_part_model_number(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.set_field(PART_MODEL_NUMBER, kind, payload)
    }

    pub fn version(&self) -> Result<&[u8]> {
        self.field(VERSION_FIELD)
    }
    pub fn set_version(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.set_field(VERSION_FIELD, kind, payload)
    }

    pub fn serial_number(&self) -> Result<&[u8]> {
        self.field(SERIAL_NUMBER)
    }
    pub fn set_serial_number(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.set_field(SERIAL_NUMBER, kind, payload)
    }

    pub fn asset_tag(&self) -> Result<&[u8]> {
        self.field(ASSET_TAG)
    }
    pub fn set_asset_tag(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.set_field(ASSET_TAG, kind, payload)
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
        let header = [VERSION, length_slot, self.language_code];
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
    fn custom_append_and_delete_round_trips_to_original() {
        let mut area = ProductArea::setup_new(8, 24);
        area.set_manufacturer_name(StringType::Ascii8, b"Acme").unwrap();

        let mut buf1 = [0u8; 32];
        let mut planner = WritePlanner::new();
        area.encode(&mut buf1, &mut planner);
        area.write_complete();

        area.set_custom(0, Some(StringType::Ascii8), Some(b"X")).unwrap();
        area.set_custom(0, None, None).unwrap();

        let mut buf2 = [0u8; 32];
        let mut planner2 = WritePlanner::new();
        area.encode(&mut buf2, &mut planner2);

        assert_eq!(buf1, buf2);
    }
}
