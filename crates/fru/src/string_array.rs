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

//! The ordered sequence of TLV strings that makes up an info area's body:
//! a fixed prefix of always-present fields followed by a variable tail of
//! "custom" fields, terminated on the wire by `0xC1` plus a checksum byte
//! that this module does not own (see `area::encode_info_area`).

use crate::error::{FruError, Result};
use crate::string_codec::{self, StringType};
use alloc::vec::Vec;

/// One decoded TLV string together with the bookkeeping the encoder needs
/// to reproduce it byte-exact when untouched, and to keep its neighbors'
/// offsets consistent when it grows, shrinks, or is removed.
#[derive(Debug, Clone)]
pub struct TlvString {
    kind: StringType,
    payload: Vec<u8>,
    offset: usize,
    raw: Vec<u8>,
    changed: bool,
}

impl TlvString {
    pub fn kind(&self) -> StringType {
        self.kind
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn raw_len(&self) -> usize {
        self.raw.len()
    }

    pub(crate) fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub(crate) fn is_changed(&self) -> bool {
        self.changed
    }

    pub(crate) fn clear_changed(&mut self) {
        self.changed = false;
    }
}

/// The strings of a single info area (Chassis/Board/Product). `num_fixed`
/// entries are always present; anything past that is a "custom" field.
#[derive(Debug, Clone)]
pub struct StringArray {
    entries: Vec<TlvString>,
    num_fixed: usize,
    capacity: usize,
}

impl StringArray {
    /// Build a brand new array with all fixed slots present and empty.
    pub fn new_empty(num_fixed: usize, capacity: usize) -> Self {
        let mut entries = Vec::with_capacity(num_fixed);
        for i in 0..num_fixed {
            entries.push(TlvString {
                kind: StringType::Ascii8,
                payload: Vec::new(),
                offset: i,
                raw: string_codec::encode(StringType::Ascii8, &[]),
                changed: false,
            });
        }
        Self {
            entries,
            num_fixed,
            capacity,
        }
    }

    /// Decode strings starting at `bytes[0]` until the end-of-list marker.
    /// Returns the array and the number of bytes consumed, including the
    /// terminator.
    pub fn decode(
        bytes: &[u8],
        num_fixed: usize,
        capacity: usize,
        language_is_english: bool,
    ) -> Result<(Self, usize)> {
        let mut entries = Vec::new();
        let mut pos = 0usize;

        loop {
            let Some(&prefix) = bytes.get(pos) else {
                return Err(FruError::BadFormat);
            };
            if prefix == string_codec::END_OF_LIST {
                pos += 1;
                break;
            }

            let (decoded, consumed) = string_codec::decode(&bytes[pos..], language_is_english, false)?;
            let raw = bytes[pos..pos + consumed].to_vec();
            entries.push(TlvString {
                kind: decoded.kind,
                payload: decoded.payload,
                offset: pos,
                raw,
                changed: false,
            });
            pos += consumed;
        }

        if entries.len() < num_fixed {
            return Err(FruError::BadFormat);
        }

        Ok((
            Self {
                entries,
                num_fixed,
                capacity,
            },
            pos,
        ))
    }

    pub fn total_raw_len(&self) -> usize {
        self.entries.iter().map(TlvString::raw_len).sum()
    }

    pub fn num_custom(&self) -> usize {
        self.entries.len() - self.num_fixed
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    fn resolve_index(&self, index: usize, is_custom: bool) -> Result<usize> {
        if is_custom {
            Ok(self.num_fixed + index)
        } else {
            if index >= self.num_fixed {
                return Err(FruError::InvalidArgument);
            }
            Ok(index)
        }
    }

    pub fn get(&self, index: usize, is_custom: bool) -> Result<&TlvString> {
        let actual = self.resolve_index(index, is_custom)?;
        self.entries.get(actual).ok_or(FruError::NotFound)
    }

    /// Set a field. Fixed slots must already exist; custom slots at or past
    /// the current end append a new entry.
    pub fn set(&mut self, index: usize, kind: StringType, payload: &[u8], is_custom: bool) -> Result<()> {
        let actual = self.resolve_index(index, is_custom)?;
        if !is_custom && actual >= self.entries.len() {
            return Err(FruError::InvalidArgument);
        }
        if actual > self.entries.len() {
            return Err(FruError::InvalidArgument);
        }

        let new_raw = string_codec::encode(kind, payload);
        let old_raw_len = self.entries.get(actual).map(TlvString::raw_len).unwrap_or(0);
        let raw_diff = new_raw.len() as isize - old_raw_len as isize;
        let new_total = (self.total_raw_len() as isize + raw_diff) as usize;
        if new_total > self.capacity {
            lignan::warnln!("string array out of space: needs {new_total}, has {}", self.capacity);
            return Err(FruError::OutOfSpace);
        }

        if actual == self.entries.len() {
            if self.entries.len() == self.entries.capacity() {
                self.entries.try_reserve(16).map_err(|_| FruError::OutOfMemory)?;
            }
            let offset = self
                .entries
                .last()
                .map(|e| e.offset + e.raw_len())
                .unwrap_or(0);
            self.entries.push(TlvString {
                kind,
                payload: payload.to_vec(),
                offset,
                raw: new_raw,
                changed: true,
            });
        } else {
            let entry = &mut self.entries[actual];
            entry.kind = kind;
            entry.payload = payload[..payload.len().min(string_codec::MAX_PAYLOAD_LEN)].to_vec();
            entry.raw = new_raw;
            entry.changed = true;
        }

        for e in self.entries[actual + 1..].iter_mut() {
            e.offset = (e.offset as isize + raw_diff) as usize;
            e.changed = true;
        }

        Ok(())
    }

    /// Clear a field: for a fixed slot this replaces it with the canonical
    /// empty encoding; for a custom slot it removes the entry entirely and
    /// slides everything after it down.
    pub fn clear(&mut self, index: usize, is_custom: bool) -> Result<()> {
        if !is_custom {
            return self.set(index, StringType::Ascii8, &[], false);
        }

        let actual = self.num_fixed + index;
        if actual >= self.entries.len() {
            return Err(FruError::NotFound);
        }

        let removed = self.entries.remove(actual);
        let diff = -(removed.raw_len() as isize);
        for e in self.entries[actual..].iter_mut() {
            e.offset = (e.offset as isize + diff) as usize;
            e.changed = true;
        }

        Ok(())
    }

    pub(crate) fn entries(&self) -> &[TlvString] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [TlvString] {
        &mut self.entries
    }

    pub(crate) fn clear_all_changed(&mut self) {
        for e in &mut self.entries {
            e.clear_changed();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_empty_has_fixed_slots_only() {
        let arr = StringArray::new_empty(2, 32);
        assert_eq!(arr.num_custom(), 0);
        assert_eq!(arr.get(0, false).unwrap().raw_len(), 1);
        assert_eq!(arr.get(1, false).unwrap().raw_len(), 1);
    }

    #[test]
    fn set_fixed_field_shifts_later_offsets() {
        let mut arr = StringArray::new_empty(2, 32);
        arr.set(0, StringType::Ascii8, b"ABC", false).unwrap();
        assert_eq!(arr.get(0, false).unwrap().raw_len(), 4);
        assert_eq!(arr.get(1, false).unwrap().offset(), 4);
        assert!(arr.get(1, false).unwrap().is_changed());
    }

    #[test]
    fn append_custom_then_delete_restores_offsets() {
        let mut arr = StringArray::new_empty(2, 32);
        arr.set(0, StringType::Ascii8, b"X", true).unwrap();
        arr.set(1, StringType::Ascii8, b"YY", true).unwrap();
        let before = arr.get(1, false).unwrap().offset();

        arr.clear(0, true).unwrap();
        assert_eq!(arr.num_custom(), 1);
        assert_eq!(arr.get(0, false).unwrap().offset(), before);
    }

    #[test]
    fn out_of_space_leaves_array_unchanged() {
        let mut arr = StringArray::new_empty(1, 2);
        let before = arr.total_raw_len();
        let err = arr.set(0, StringType::Ascii8, b"way too long for this", false);
        assert_eq!(err.unwrap_err(), FruError::OutOfSpace);
        assert_eq!(arr.total_raw_len(), before);
    }

    #[test]
    fn decode_round_trips_fixed_and_custom() {
        let mut arr = StringArray::new_empty(1, 32);
        arr.set(0, StringType::Ascii8, b"hi", false).unwrap();
        arr.set(0, StringType::Ascii8, b"custom", true).unwrap();

        let mut bytes = Vec::new();
        for e in arr.entries() {
            bytes.extend_from_slice(e.raw());
        }
        bytes.push(string_codec::END_OF_LIST);

        let (decoded, consumed) = StringArray::decode(&bytes, 1, 32, true).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(decoded.get(0, false).unwrap().payload(), b"hi");
        assert_eq!(decoded.get(0, true).unwrap().payload(), b"custom");
    }
}
