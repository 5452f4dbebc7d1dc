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

//! The Multi-Record area: a headerless chain of opaque typed records,
//! each with its own 5-byte header checksum and payload checksum, the
//! last one flagged end-of-list.

use super::{zero_sum_checksum, AreaState};
use crate::error::{FruError, Result};
use crate::write_planner::WritePlanner;
use alloc::vec::Vec;

const RECORD_HEADER_LEN: usize = 5;
const FORMAT_VERSION: u8 = 2;
const EOL_BIT: u8 = 0x80;

#[derive(Debug, Clone)]
pub struct MultiRecord {
    record_type: u8,
    format_version: u8,
    payload: Vec<u8>,
    offset: usize,
    changed: bool,
}

impl MultiRecord {
    pub fn record_type(&self) -> u8 {
        self.record_type
    }

    pub fn format_version(&self) -> u8 {
        self.format_version
    }

    pub fn data(&self) -> &[u8] {
        &self.payload
    }

    pub fn data_len(&self) -> usize {
        self.payload.len()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    fn wire_len(&self) -> usize {
        RECORD_HEADER_LEN + self.payload.len()
    }
}

#[derive(Debug, Clone)]
pub struct MultiRecordArea {
    pub state: AreaState,
    records: Vec<MultiRecord>,
}

impl MultiRecordArea {
    pub fn setup_new(offset: usize, length: usize) -> Self {
        Self {
            state: AreaState::new(offset, length, 0),
            records: Vec::new(),
        }
    }

    /// `length` is always `blob_len - offset`: the area has no header of
    /// its own and simply runs to the end of the blob.
    pub fn decode(bytes: &[u8], offset: usize, length: usize) -> Result<Self> {
        let mut records = Vec::new();
        let mut pos = 0usize;

        loop {
            if length - pos < RECORD_HEADER_LEN {
                return Err(FruError::BadFormat);
            }
            let abs = offset + pos;
            let header = &bytes[abs..abs + RECORD_HEADER_LEN];
            if zero_sum_checksum(&header[..RECORD_HEADER_LEN - 1]) != header[RECORD_HEADER_LEN - 1] {
                lignan::warnln!("multi-record header checksum mismatch at offset {abs:#x}");
                return Err(FruError::BadFormat);
            }

            let record_type = header[0];
            let version_byte = header[1];
            let eol = version_byte & EOL_BIT != 0;
            let format_version = version_byte & 0x0F;
            let rec_len = header[2] as usize;
            let payload_checksum = header[3];

            if pos + RECORD_HEADER_LEN + rec_len > length {
                return Err(FruError::BadFormat);
            }
            let payload = bytes[abs + RECORD_HEADER_LEN..abs + RECORD_HEADER_LEN + rec_len].to_vec();
            if zero_sum_checksum(&payload) != payload_checksum {
                return Err(FruError::BadFormat);
            }

            records.push(MultiRecord {
                record_type,
                format_version,
                payload,
                offset: pos,
                changed: false,
            });

            pos += RECORD_HEADER_LEN + rec_len;
            if eol {
                break;
            }
        }

        Ok(Self {
            state: AreaState::new(offset, length, pos),
            records,
        })
    }

    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    pub fn get(&self, index: usize) -> Result<&MultiRecord> {
        self.records.get(index).ok_or(FruError::NotFound)
    }

    fn total_wire_len(&self) -> usize {
        self.records.iter().map(MultiRecord::wire_len).sum()
    }

    /// `payload = None` deletes; an index at `num_records()` appends; any
    /// other existing index replaces in place.
    pub fn set(
        &mut self,
        index: usize,
        record_type: u8,
        format_version: u8,
        payload: Option<&[u8]>,
    ) -> Result<()> {
        let Some(payload) = payload else {
            if index >= self.records.len() {
                return Err(FruError::InvalidArgument);
            }
            let removed = self.records.remove(index);
            let diff = -(removed.wire_len() as isize);
            for r in self.records[index..].iter_mut() {
                r.offset = (r.offset as isize + diff) as usize;
                r.changed = true;
            }
            self.state.mark_changed();
            if let Some(last) = self.records.last_mut() {
                last.changed = true;
            }
            self.state.used_length = self.total_wire_len() as u16;
            return Ok(());
        };

        if index > self.records.len() {
            return Err(FruError::InvalidArgument);
        }

        let new_len = RECORD_HEADER_LEN + payload.len();
        let old_len = self.records.get(index).map(MultiRecord::wire_len).unwrap_or(0);
        let new_total = self.total_wire_len() + new_len - old_len;
        if new_total > self.state.length as usize {
            lignan::warnln!("multi-record area out of space: needs {new_total}, has {}", self.state.length);
            return Err(FruError::OutOfSpace);
        }

        if index == self.records.len() {
            if self.records.len() == self.records.capacity() {
                self.records.try_reserve(16).map_err(|_| FruError::OutOfMemory)?;
            }
            let offset = self.records.last().map(|r| r.offset + r.wire_len()).unwrap_or(0);
            self.records.push(MultiRecord {
                record_type,
                format_version: format_version & 0x0F,
                payload: payload.to_vec(),
                offset,
                changed: true,
            });
        } else {
            let rec = &mut self.records[index];
            rec.record_type = record_type;
            rec.format_version = format_version & 0x0F;
            rec.payload = payload.to_vec();
            rec.changed = true;
            let diff = new_len as isize - old_len as isize;
            for r in self.records[index + 1..].iter_mut() {
                r.offset = (r.offset as isize + diff) as usize;
                r.changed = true;
            }
        }

        if let Some(last) = self.records.last_mut() {
            last.changed = true;
        }

        self.state.mark_changed();
        self.state.used_length = self.total_wire_len() as u16;
        Ok(())
    }

    pub fn encode(&mut self, out: &mut [u8], planner: &mut WritePlanner) {
        let area_offset = self.state.offset as usize;
        let whole_area_rewrite = self.state.rewrite;
        let orig_used = self.state.orig_used_length as usize;

        let num_records = self.records.len();
        for (i, record) in self.records.iter_mut().enumerate() {
            let abs = area_offset + record.offset;
            let mut version_byte = FORMAT_VERSION & 0x0F;
            if i == num_records - 1 {
                version_byte |= EOL_BIT;
            }
            out[abs] = record.record_type;
            out[abs + 1] = version_byte;
            out[abs + 2] = record.payload.len() as u8;
            out[abs + 3] = zero_sum_checksum(&record.payload);
            out[abs + 4] = zero_sum_checksum(&out[abs..abs + 4]);
            out[abs + RECORD_HEADER_LEN..abs + RECORD_HEADER_LEN + record.payload.len()]
                .copy_from_slice(&record.payload);

            if record.changed && !whole_area_rewrite {
                planner.emit(abs, RECORD_HEADER_LEN + record.payload.len());
            }
        }

        let new_used = self.total_wire_len();
        self.state.used_length = new_used as u16;

        if new_used < orig_used && !whole_area_rewrite {
            let zero_start = area_offset + new_used;
            let zero_end = area_offset + orig_used;
            out[zero_start..zero_end].fill(0);
            planner.emit(zero_start, zero_end - zero_start);
        }

        if whole_area_rewrite {
            planner.emit(area_offset, self.state.length as usize);
        }
    }

    pub fn write_complete(&mut self) {
        self.state.write_complete();
        for r in &mut self.records {
            r.changed = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_bad_header_checksum() {
        let mut buf = [0u8; 16];
        buf[0] = 0x01;
        buf[1] = EOL_BIT | FORMAT_VERSION;
        buf[2] = 0;
        buf[3] = 0;
        buf[4] = 0xFF; // wrong checksum
        assert_eq!(
            MultiRecordArea::decode(&buf, 0, 5).unwrap_err(),
            FruError::BadFormat
        );
    }

    #[test]
    fn append_replace_delete_round_trip() {
        let mut area = MultiRecordArea::setup_new(0, 64);
        area.set(0, 0x01, 2, Some(&[1, 2, 3])).unwrap();
        area.set(1, 0x02, 2, Some(&[4, 5])).unwrap();

        let mut buf = [0u8; 64];
        let mut planner = WritePlanner::new();
        area.encode(&mut buf, &mut planner);
        area.write_complete();

        let decoded = MultiRecordArea::decode(&buf, 0, 64).unwrap();
        assert_eq!(decoded.num_records(), 2);
        assert_eq!(decoded.get(0).unwrap().data(), &[1, 2, 3]);
        assert_eq!(decoded.get(1).unwrap().data(), &[4, 5]);

        area.set(0, 0, 2, None).unwrap();
        assert_eq!(area.num_records(), 1);
        assert_eq!(area.get(0).unwrap().offset(), 0);
    }

    #[test]
    fn out_of_space_is_rejected() {
        let mut area = MultiRecordArea::setup_new(0, 8);
        let err = area.set(0, 0x01, 2, Some(&[0u8; 10])).unwrap_err();
        assert_eq!(err, FruError::OutOfSpace);
    }
}
