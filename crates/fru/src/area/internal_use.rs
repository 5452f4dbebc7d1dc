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

//! The Internal Use area: a version byte followed by opaque bytes, with
//! no terminator or checksum of its own.

use super::AreaState;
use crate::error::{FruError, Result};
use crate::write_planner::WritePlanner;
use alloc::vec::Vec;

pub const EMPTY_LENGTH: usize = 1;
const VERSION: u8 = 1;

#[derive(Debug, Clone)]
pub struct InternalUseArea {
    pub state: AreaState,
    payload: Vec<u8>,
}

impl InternalUseArea {
    pub fn setup_new(offset: usize, length: usize) -> Self {
        Self {
            state: AreaState::new(offset, length, 1),
            payload: Vec::new(),
        }
    }

    pub fn decode(bytes: &[u8], offset: usize, length: usize) -> Result<Self> {
        if length < EMPTY_LENGTH || bytes.len() < offset + length {
            return Err(FruError::BadFormat);
        }
        let body = &bytes[offset..offset + length];
        if body[0] != VERSION {
            return Err(FruError::BadFormat);
        }
        Ok(Self {
            state: AreaState::new(offset, length, length),
            payload: body[1..].to_vec(),
        })
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Replace the payload entirely. Fails `TooBig` if it (plus the
    /// version byte) would not fit in the area's reserved length.
    pub fn set_payload(&mut self, payload: &[u8]) -> Result<()> {
        if payload.len() + 1 > self.state.length as usize {
            return Err(FruError::TooBig);
        }
        self.payload = payload.to_vec();
        self.state.mark_changed();
        self.state.rewrite = true;
        Ok(())
    }

    pub fn encode(&mut self, out: &mut [u8], planner: &mut WritePlanner) {
        let offset = self.state.offset as usize;
        let length = self.state.length as usize;
        out[offset] = VERSION;
        out[offset + 1..offset + 1 + self.payload.len()].copy_from_slice(&self.payload);
        for b in out[offset + 1 + self.payload.len()..offset + length].iter_mut() {
            *b = 0;
        }
        self.state.used_length = length as u16;
        if self.state.changed {
            planner.emit(offset, length);
        }
    }

    pub fn write_complete(&mut self) {
        self.state.write_complete();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_payload_too_big_for_area() {
        let mut area = InternalUseArea::setup_new(8, 8);
        let err = area.set_payload(&[0u8; 8]).unwrap_err();
        assert_eq!(err, FruError::TooBig);
    }

    #[test]
    fn decode_rejects_wrong_version() {
        let mut buf = [0u8; 16];
        buf[8] = 2;
        assert_eq!(
            InternalUseArea::decode(&buf, 8, 8).unwrap_err(),
            FruError::BadFormat
        );
    }

    #[test]
    fn encode_writes_version_and_payload() {
        let mut area = InternalUseArea::setup_new(8, 8);
        area.set_payload(&[1, 2, 3]).unwrap();
        let mut buf = [0u8; 16];
        let mut planner = WritePlanner::new();
        area.encode(&mut buf, &mut planner);
        assert_eq!(&buf[8..16], &[1, 1, 2, 3, 0, 0, 0, 0]);
    }
}
