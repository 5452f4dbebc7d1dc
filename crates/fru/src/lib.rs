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

//! A codec and edit-tracking engine for the IPMI Platform Management FRU
//! Information Storage Definition.
//!
//! Decode a byte image into a [`Fru`], mutate fields through its
//! `<area>_<field>` accessors or the reflective [`reflect::Node`] tree,
//! then [`Fru::write`] it back out — `write` returns only the byte ranges
//! that actually changed, so a caller backed by slow EEPROM-style storage
//! never has to rewrite the whole image for a one-byte edit.

#![no_std]
extern crate alloc;

mod area;
mod error;
mod header;
mod oem;
mod reflect;
mod string_array;
mod string_codec;
mod timestamp;
mod write_planner;

pub use area::board::BoardArea;
pub use area::chassis::ChassisArea;
pub use area::internal_use::InternalUseArea;
pub use area::multirecord::{MultiRecord, MultiRecordArea};
pub use area::product::ProductArea;
pub use error::{FruError, Result};
pub use header::AreaId;
pub use oem::{
    deregister_oem_decoder, register_oem_decoder, OemDecoderFn, OemFields, OemRegistry, OemValue,
};
pub use reflect::{index_to_str, str_to_index, FieldKind, FieldOutcome, FieldValue, Node};
pub use string_codec::StringType;
pub use timestamp::FruTimestamp;
pub use write_planner::UpdateRange;

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

/// A refcounted, interior-mutable handle to a [`Fru`], the shape every
/// [`reflect::Node`] holds a back-reference through.
pub type FruHandle = Rc<RefCell<Fru>>;

/// The decoded, editable form of one FRU byte image.
///
/// `Fru` owns its area records outright; there is no shared mutable state
/// between them. Every mutating method takes `&mut self` — single-writer
/// discipline is therefore a property the borrow checker enforces, not a
/// lock this crate threads through its API (see the crate's Non-goals).
#[derive(Debug, Clone)]
pub struct Fru {
    blob_len: usize,
    header_changed: bool,
    internal_use: Option<InternalUseArea>,
    chassis: Option<ChassisArea>,
    board: Option<BoardArea>,
    product: Option<ProductArea>,
    multirecord: Option<MultiRecordArea>,
}

impl Fru {
    /// A brand new FRU of `blob_len` bytes with no areas present yet.
    pub fn new_empty(blob_len: usize) -> Self {
        Self {
            blob_len,
            header_changed: true,
            internal_use: None,
            chassis: None,
            board: None,
            product: None,
            multirecord: None,
        }
    }

    /// Decode a complete FRU image: the common header, then each present
    /// area, then a placement sanity check across all of them.
    pub fn decode(buffer: &[u8]) -> Result<Self> {
        let offsets = header::decode_header(buffer)?;
        let blob_len = buffer.len();

        let mut present_offsets: Vec<usize> =
            offsets.iter().copied().filter(|&o| o != 0).map(|o| o as usize).collect();
        present_offsets.sort_unstable();
        let next_boundary = |offset: usize| -> usize {
            present_offsets
                .iter()
                .copied()
                .find(|&o| o > offset)
                .unwrap_or(blob_len)
        };

        let internal_use = match offsets[AreaId::InternalUse.slot()] {
            0 => None,
            off => {
                let off = off as usize;
                let length = next_boundary(off) - off;
                Some(InternalUseArea::decode(buffer, off, length)?)
            }
        };
        let chassis = match offsets[AreaId::Chassis.slot()] {
            0 => None,
            off => Some(ChassisArea::decode(buffer, off as usize, blob_len)?),
        };
        let board = match offsets[AreaId::Board.slot()] {
            0 => None,
            off => Some(BoardArea::decode(buffer, off as usize, blob_len)?),
        };
        let product = match offsets[AreaId::Product.slot()] {
            0 => None,
            off => Some(ProductArea::decode(buffer, off as usize, blob_len)?),
        };
        let multirecord = match offsets[AreaId::MultiRecord.slot()] {
            0 => None,
            off => {
                let off = off as usize;
                Some(MultiRecordArea::decode(buffer, off, blob_len - off)?)
            }
        };

        let fru = Self {
            blob_len,
            header_changed: false,
            internal_use,
            chassis,
            board,
            product,
            multirecord,
        };
        fru.validate_all_placements()?;
        lignan::logln!("decoded FRU image ({blob_len} bytes)");
        Ok(fru)
    }

    fn placements(&self) -> Vec<(AreaId, usize, usize)> {
        let mut out = Vec::new();
        if let Some(a) = &self.internal_use {
            out.push((AreaId::InternalUse, a.state.offset as usize, a.state.length as usize));
        }
        if let Some(a) = &self.chassis {
            out.push((AreaId::Chassis, a.state.offset as usize, a.state.length as usize));
        }
        if let Some(a) = &self.board {
            out.push((AreaId::Board, a.state.offset as usize, a.state.length as usize));
        }
        if let Some(a) = &self.product {
            out.push((AreaId::Product, a.state.offset as usize, a.state.length as usize));
        }
        if let Some(a) = &self.multirecord {
            out.push((AreaId::MultiRecord, a.state.offset as usize, a.state.length as usize));
        }
        out
    }

    fn validate_all_placements(&self) -> Result<()> {
        let present = self.placements();
        for &(id, off, len) in &present {
            let others: Vec<_> = present.iter().copied().filter(|&(i, _, _)| i != id).collect();
            header::validate_placement(self.blob_len, &others, off, len)
                .map_err(|_| FruError::BadFormat)?;
        }
        Ok(())
    }

    fn area_offsets(&self) -> [u16; 5] {
        let mut offsets = [0u16; 5];
        for &(id, off, _) in &self.placements() {
            offsets[id.slot()] = off as u16;
        }
        offsets
    }

    /// Re-encode the whole FRU into `out` (which must be at least
    /// `blob_len` bytes) and return the list of byte ranges that changed
    /// since the last [`Fru::write_complete`].
    pub fn write(&mut self, out: &mut [u8]) -> Result<Vec<UpdateRange>> {
        if out.len() < self.blob_len {
            lignan::errorln!("write buffer ({} bytes) shorter than FRU blob ({} bytes)", out.len(), self.blob_len);
            return Err(FruError::InvalidArgument);
        }

        let mut planner = write_planner::WritePlanner::new();

        let offsets = self.area_offsets();
        let header_bytes = header::encode_header(&offsets);
        out[..header::HEADER_LEN].copy_from_slice(&header_bytes);
        if self.header_changed {
            planner.emit(0, header::HEADER_LEN);
        }

        if let Some(area) = &mut self.internal_use {
            area.encode(out, &mut planner);
        }
        if let Some(area) = &mut self.chassis {
            area.encode(out, &mut planner);
        }
        if let Some(area) = &mut self.board {
            area.encode(out, &mut planner);
        }
        if let Some(area) = &mut self.product {
            area.encode(out, &mut planner);
        }
        if let Some(area) = &mut self.multirecord {
            area.encode(out, &mut planner);
        }

        let ranges = planner.into_ranges();
        lignan::logln!("write produced {} update range(s)", ranges.len());
        Ok(ranges)
    }

    /// Acknowledge a successful write-back: clears every dirty flag this
    /// crate tracks, at every granularity.
    pub fn write_complete(&mut self) {
        self.header_changed = false;
        if let Some(a) = &mut self.internal_use {
            a.write_complete();
        }
        if let Some(a) = &mut self.chassis {
            a.write_complete();
        }
        if let Some(a) = &mut self.board {
            a.write_complete();
        }
        if let Some(a) = &mut self.product {
            a.write_complete();
        }
        if let Some(a) = &mut self.multirecord {
            a.write_complete();
        }
    }

    /// Wrap this FRU in the refcounted handle the tree navigator needs.
    pub fn into_handle(self) -> FruHandle {
        Rc::new(RefCell::new(self))
    }

    /// A navigation node rooted at this FRU.
    pub fn root_node(handle: &FruHandle) -> Node {
        Node::root(handle.clone())
    }

    // ---- area management -------------------------------------------------

    fn area_present(&self, area: AreaId) -> bool {
        match area {
            AreaId::InternalUse => self.internal_use.is_some(),
            AreaId::Chassis => self.chassis.is_some(),
            AreaId::Board => self.board.is_some(),
            AreaId::Product => self.product.is_some(),
            AreaId::MultiRecord => self.multirecord.is_some(),
        }
    }

    fn others_excluding(&self, area: AreaId) -> Vec<(AreaId, usize, usize)> {
        self.placements().into_iter().filter(|&(id, _, _)| id != area).collect()
    }

    /// Add a new area at `offset` with `length` reserved bytes, validating
    /// placement against every other currently-present area.
    pub fn add_area(&mut self, area: AreaId, offset: usize, length: usize) -> Result<()> {
        if self.area_present(area) {
            return Err(FruError::AlreadyExists);
        }
        let others = self.others_excluding(area);
        header::validate_placement(self.blob_len, &others, offset, length)?;

        match area {
            AreaId::InternalUse => {
                if length < area::internal_use::EMPTY_LENGTH {
                    return Err(FruError::InvalidArgument);
                }
                self.internal_use = Some(InternalUseArea::setup_new(offset, length));
            }
            AreaId::Chassis => {
                if length < area::chassis::EMPTY_LENGTH {
                    return Err(FruError::InvalidArgument);
                }
                self.chassis = Some(ChassisArea::setup_new(offset, length));
            }
            AreaId::Board => {
                if length < area::board::EMPTY_LENGTH {
                    return Err(FruError::InvalidArgument);
                }
                self.board = Some(BoardArea::setup_new(offset, length));
            }
            AreaId::Product => {
                if length < area::product::EMPTY_LENGTH {
                    return Err(FruError::InvalidArgument);
                }
                self.product = Some(ProductArea::setup_new(offset, length));
            }
            AreaId::MultiRecord => {
                self.multirecord = Some(MultiRecordArea::setup_new(offset, length));
            }
        }
        self.header_changed = true;
        Ok(())
    }

    pub fn delete_area(&mut self, area: AreaId) -> Result<()> {
        if !self.area_present(area) {
            return Err(FruError::NotFound);
        }
        match area {
            AreaId::InternalUse => self.internal_use = None,
            AreaId::Chassis => self.chassis = None,
            AreaId::Board => self.board = None,
            AreaId::Product => self.product = None,
            AreaId::MultiRecord => self.multirecord = None,
        }
        self.header_changed = true;
        Ok(())
    }

    pub fn set_area_offset(&mut self, area: AreaId, offset: usize) -> Result<()> {
        // Multi-Record has no length of its own to preserve: moving it keeps
        // the reserved region running to end-of-blob (§4.6).
        let length = if area == AreaId::MultiRecord {
            self.blob_len.saturating_sub(offset)
        } else {
            self.get_area_length(area)?
        };
        if length < self.get_area_used_length(area)? {
            return Err(FruError::TooBig);
        }
        let others = self.others_excluding(area);
        header::validate_placement(self.blob_len, &others, offset, length)?;

        match area {
            AreaId::InternalUse => {
                let a = self.internal_use.as_mut().ok_or(FruError::NotFound)?;
                a.state.offset = offset as u16;
                a.state.rewrite = true;
                a.state.mark_changed();
            }
            AreaId::Chassis => {
                let a = self.chassis.as_mut().ok_or(FruError::NotFound)?;
                a.state.offset = offset as u16;
                a.state.rewrite = true;
                a.state.mark_changed();
            }
            AreaId::Board => {
                let a = self.board.as_mut().ok_or(FruError::NotFound)?;
                a.state.offset = offset as u16;
                a.state.rewrite = true;
                a.state.mark_changed();
            }
            AreaId::Product => {
                let a = self.product.as_mut().ok_or(FruError::NotFound)?;
                a.state.offset = offset as u16;
                a.state.rewrite = true;
                a.state.mark_changed();
            }
            AreaId::MultiRecord => {
                let a = self.multirecord.as_mut().ok_or(FruError::NotFound)?;
                a.state.offset = offset as u16;
                a.state.length = length as u16;
                a.state.rewrite = true;
                a.state.mark_changed();
            }
        }
        self.header_changed = true;
        Ok(())
    }

    pub fn set_area_length(&mut self, area: AreaId, length: usize) -> Result<()> {
        let used = self.get_area_used_length(area)?;
        if length < used {
            return Err(FruError::TooBig);
        }
        let offset = self.get_area_offset(area)?;
        let others = self.others_excluding(area);
        header::validate_placement(self.blob_len, &others, offset, length)?;

        match area {
            AreaId::InternalUse => {
                let a = self.internal_use.as_mut().ok_or(FruError::NotFound)?;
                a.state.length = length as u16;
                a.state.rewrite = true;
                a.state.mark_changed();
            }
            AreaId::Chassis => self.chassis.as_mut().ok_or(FruError::NotFound)?.set_length(length),
            AreaId::Board => self.board.as_mut().ok_or(FruError::NotFound)?.set_length(length),
            AreaId::Product => self.product.as_mut().ok_or(FruError::NotFound)?.set_length(length),
            AreaId::MultiRecord => {
                let a = self.multirecord.as_mut().ok_or(FruError::NotFound)?;
                a.state.length = length as u16;
                a.state.rewrite = true;
                a.state.mark_changed();
            }
        }
        Ok(())
    }

    pub fn get_area_offset(&self, area: AreaId) -> Result<usize> {
        self.placements()
            .into_iter()
            .find(|&(id, _, _)| id == area)
            .map(|(_, off, _)| off)
            .ok_or(FruError::NotFound)
    }

    pub fn get_area_length(&self, area: AreaId) -> Result<usize> {
        self.placements()
            .into_iter()
            .find(|&(id, _, _)| id == area)
            .map(|(_, _, len)| len)
            .ok_or(FruError::NotFound)
    }

    pub fn get_area_used_length(&self, area: AreaId) -> Result<usize> {
        match area {
            AreaId::InternalUse => Ok(self.internal_use.as_ref().ok_or(FruError::NotFound)?.state.used_length as usize),
            AreaId::Chassis => Ok(self.chassis.as_ref().ok_or(FruError::NotFound)?.state.used_length as usize),
            AreaId::Board => Ok(self.board.as_ref().ok_or(FruError::NotFound)?.state.used_length as usize),
            AreaId::Product => Ok(self.product.as_ref().ok_or(FruError::NotFound)?.state.used_length as usize),
            AreaId::MultiRecord => Ok(self.multirecord.as_ref().ok_or(FruError::NotFound)?.state.used_length as usize),
        }
    }

    // ---- reflection back-doors (crate-private) ---------------------------

    pub(crate) fn internal_use_area(&self) -> Option<&InternalUseArea> {
        self.internal_use.as_ref()
    }
    pub(crate) fn chassis_area(&self) -> Option<&ChassisArea> {
        self.chassis.as_ref()
    }
    pub(crate) fn board_area(&self) -> Option<&BoardArea> {
        self.board.as_ref()
    }
    pub(crate) fn product_area(&self) -> Option<&ProductArea> {
        self.product.as_ref()
    }
    pub(crate) fn multirecord_area(&self) -> Option<&MultiRecordArea> {
        self.multirecord.as_ref()
    }

    // ---- internal use ------------------------------------------------------

    pub fn internal_use_data(&self) -> Result<&[u8]> {
        Ok(self.internal_use.as_ref().ok_or(FruError::NotFound)?.payload())
    }

    pub fn set_internal_use_data(&mut self, payload: &[u8]) -> Result<()> {
        self.internal_use.as_mut().ok_or(FruError::NotFound)?.set_payload(payload)
    }

    // ---- chassis info --------------------------------------------------------

    pub fn chassis_info_type(&self) -> Result<u8> {
        Ok(self.chassis.as_ref().ok_or(FruError::NotFound)?.chassis_type())
    }
    pub fn set_chassis_info_type(&mut self, value: u8) -> Result<()> {
        self.chassis.as_mut().ok_or(FruError::NotFound)?.set_chassis_type(value);
        Ok(())
    }
    pub fn chassis_info_part_number(&self) -> Result<&[u8]> {
        self.chassis.as_ref().ok_or(FruError::NotFound)?.part_number()
    }
    pub fn set_chassis_info_part_number(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.chassis.as_mut().ok_or(FruError::NotFound)?.set_part_number(kind, payload)
    }
    pub fn chassis_info_serial_number(&self) -> Result<&[u8]> {
        self.chassis.as_ref().ok_or(FruError::NotFound)?.serial_number()
    }
    pub fn set_chassis_info_serial_number(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.chassis.as_mut().ok_or(FruError::NotFound)?.set_serial_number(kind, payload)
    }
    pub fn num_chassis_info_custom(&self) -> Result<usize> {
        Ok(self.chassis.as_ref().ok_or(FruError::NotFound)?.num_custom())
    }
    pub fn chassis_info_custom(&self, ordinal: usize) -> Result<&[u8]> {
        self.chassis.as_ref().ok_or(FruError::NotFound)?.custom(ordinal)
    }
    pub fn set_chassis_info_custom(
        &mut self,
        ordinal: usize,
        kind: Option<StringType>,
        payload: Option<&[u8]>,
    ) -> Result<()> {
        self.chassis.as_mut().ok_or(FruError::NotFound)?.set_custom(ordinal, kind, payload)
    }

    // ---- board info ----------------------------------------------------------

    pub fn board_info_language_code(&self) -> Result<u8> {
        Ok(self.board.as_ref().ok_or(FruError::NotFound)?.language_code())
    }
    pub fn set_board_info_language_code(&mut self, code: u8) -> Result<()> {
        self.board.as_mut().ok_or(FruError::NotFound)?.set_language_code(code);
        Ok(())
    }
    pub fn board_info_mfg_date_time(&self) -> Result<FruTimestamp> {
        Ok(self.board.as_ref().ok_or(FruError::NotFound)?.mfg_date_time())
    }
    pub fn set_board_info_mfg_date_time(&mut self, ts: FruTimestamp) -> Result<()> {
        self.board.as_mut().ok_or(FruError::NotFound)?.set_mfg_date_time(ts);
        Ok(())
    }
    pub fn board_info_manufacturer(&self) -> Result<&[u8]> {
        self.board.as_ref().ok_or(FruError::NotFound)?.manufacturer()
    }
    pub fn set_board_info_manufacturer(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.board.as_mut().ok_or(FruError::NotFound)?.set_manufacturer(kind, payload)
    }
    pub fn board_info_product_name(&self) -> Result<&[u8]> {
        self.board.as_ref().ok_or(FruError::NotFound)?.product_name()
    }
    pub fn set_board_info_product_name(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.board.as_mut().ok_or(FruError::NotFound)?.set_product_name(kind, payload)
    }
    pub fn board_info_serial_number(&self) -> Result<&[u8]> {
        self.board.as_ref().ok_or(FruError::NotFound)?.serial_number()
    }
    pub fn set_board_info_serial_number(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.board.as_mut().ok_or(FruError::NotFound)?.set_serial_number(kind, payload)
    }
    pub fn board_info_part_number(&self) -> Result<&[u8]> {
        self.board.as_ref().ok_or(FruError::NotFound)?.part_number()
    }
    pub fn set_board_info_part_number(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.board.as_mut().ok_or(FruError::NotFound)?.set_part_number(kind, payload)
    }
    pub fn board_info_fru_file_id(&self) -> Result<&[u8]> {
        self.board.as_ref().ok_or(FruError::NotFound)?.fru_file_id()
    }
    pub fn set_board_info_fru_file_id(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.board.as_mut().ok_or(FruError::NotFound)?.set_fru_file_id(kind, payload)
    }
    pub fn num_board_info_custom(&self) -> Result<usize> {
        Ok(self.board.as_ref().ok_or(FruError::NotFound)?.num_custom())
    }
    pub fn board_info_custom(&self, ordinal: usize) -> Result<&[u8]> {
        self.board.as_ref().ok_or(FruError::NotFound)?.custom(ordinal)
    }
    pub fn set_board_info_custom(
        &mut self,
        ordinal: usize,
        kind: Option<StringType>,
        payload: Option<&[u8]>,
    ) -> Result<()> {
        self.board.as_mut().ok_or(FruError::NotFound)?.set_custom(ordinal, kind, payload)
    }

    // ---- product info --------------------------------------------------------

    pub fn product_info_language_code(&self) -> Result<u8> {
        Ok(self.product.as_ref().ok_or(FruError::NotFound)?.language_code())
    }
    pub fn set_product_info_language_code(&mut self, code: u8) -> Result<()> {
        self.product.as_mut().ok_or(FruError::NotFound)?.set_language_code(code);
        Ok(())
    }
    pub fn product_info_manufacturer_name(&self) -> Result<&[u8]> {
        self.product.as_ref().ok_or(FruError::NotFound)?.manufacturer_name()
    }
    pub fn set_product_info_manufacturer_name(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.product.as_mut().ok_or(FruError::NotFound)?.set_manufacturer_name(kind, payload)
    }
    pub fn product_info_product_name(&self) -> Result<&[u8]> {
        self.product.as_ref().ok_or(FruError::NotFound)?.product_name()
    }
    pub fn set_product_info_product_name(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.product.as_mut().ok_or(FruError::NotFound)?.set_product_name(kind, payload)
    }
    pub fn product_info_part_model_number(&self) -> Result<&[u8]> {
        self.product.as_ref().ok_or(FruError::NotFound)?.part_model_number()
    }
    pub fn set_product_info_part_model_number(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.product.as_mut().ok_or(FruError::NotFound)?.set_part_model_number(kind, payload)
    }
    pub fn product_info_version(&self) -> Result<&[u8]> {
        self.product.as_ref().ok_or(FruError::NotFound)?.version()
    }
    pub fn set_product_info_version(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.product.as_mut().ok_or(FruError::NotFound)?.set_version(kind, payload)
    }
    pub fn product_info_serial_number(&self) -> Result<&[u8]> {
        self.product.as_ref().ok_or(FruError::NotFound)?.serial_number()
    }
    pub fn set_product_info_serial_number(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.product.as_mut().ok_or(FruError::NotFound)?.set_serial_number(kind, payload)
    }
    pub fn product_info_asset_tag(&self) -> Result<&[u8]> {
        self.product.as_ref().ok_or(FruError::NotFound)?.asset_tag()
    }
    pub fn set_product_info_asset_tag(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.product.as_mut().ok_or(FruError::NotFound)?.set_asset_tag(kind, payload)
    }
    pub fn product_info_fru_file_id(&self) -> Result<&[u8]> {
        self.product.as_ref().ok_or(FruError::NotFound)?.fru_file_id()
    }
    pub fn set_product_info_fru_file_id(&mut self, kind: StringType, payload: &[u8]) -> Result<()> {
        self.product.as_mut().ok_or(FruError::NotFound)?.set_fru_file_id(kind, payload)
    }
    pub fn num_product_info_custom(&self) -> Result<usize> {
        Ok(self.product.as_ref().ok_or(FruError::NotFound)?.num_custom())
    }
    pub fn product_info_custom(&self, ordinal: usize) -> Result<&[u8]> {
        self.product.as_ref().ok_or(FruError::NotFound)?.custom(ordinal)
    }
    pub fn set_product_info_custom(
        &mut self,
        ordinal: usize,
        kind: Option<StringType>,
        payload: Option<&[u8]>,
    ) -> Result<()> {
        self.product.as_mut().ok_or(FruError::NotFound)?.set_custom(ordinal, kind, payload)
    }

    // ---- multi-record ----------------------------------------------------------

    pub fn num_multi_records(&self) -> Result<usize> {
        Ok(self.multirecord.as_ref().ok_or(FruError::NotFound)?.num_records())
    }
    pub fn get_multi_record_type(&self, index: usize) -> Result<u8> {
        Ok(self.multirecord.as_ref().ok_or(FruError::NotFound)?.get(index)?.record_type())
    }
    pub fn get_multi_record_format_version(&self, index: usize) -> Result<u8> {
        Ok(self.multirecord.as_ref().ok_or(FruError::NotFound)?.get(index)?.format_version())
    }
    pub fn get_multi_record_data_len(&self, index: usize) -> Result<usize> {
        Ok(self.multirecord.as_ref().ok_or(FruError::NotFound)?.get(index)?.data_len())
    }
    pub fn get_multi_record_data(&self, index: usize) -> Result<&[u8]> {
        Ok(self.multirecord.as_ref().ok_or(FruError::NotFound)?.get(index)?.data())
    }
    pub fn set_multi_record(
        &mut self,
        index: usize,
        record_type: u8,
        format_version: u8,
        payload: Option<&[u8]>,
    ) -> Result<()> {
        self.multirecord
            .as_mut()
            .ok_or(FruError::NotFound)?
            .set(index, record_type, format_version, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_fru(blob_len: usize) -> Fru {
        let mut fru = Fru::new_empty(blob_len);
        fru.add_area(AreaId::Chassis, 8, 16).unwrap();
        fru.add_area(AreaId::Board, 24, 32).unwrap();
        fru
    }

    #[test]
    fn decode_then_write_with_no_edits_round_trips_byte_exact() {
        let mut fru = layout_fru(64);
        fru.set_chassis_info_part_number(StringType::Ascii8, b"PN").unwrap();
        fru.set_board_info_manufacturer(StringType::Ascii8, b"Acme").unwrap();

        let mut buf = [0u8; 64];
        fru.write(&mut buf).unwrap();
        fru.write_complete();

        let mut decoded = Fru::decode(&buf).unwrap();
        let mut buf2 = [0u8; 64];
        let ranges = decoded.write(&mut buf2).unwrap();

        assert_eq!(buf, buf2);
        assert!(ranges.is_empty());
    }

    #[test]
    fn header_checksum_sums_to_zero() {
        let mut fru = layout_fru(64);
        let mut buf = [0u8; 64];
        fru.write(&mut buf).unwrap();
        let sum = buf[..8].iter().fold(0u8, |a, &b| a.wrapping_add(b));
        assert_eq!(sum, 0);
    }

    #[test]
    fn overlapping_area_add_is_rejected() {
        let mut fru = layout_fru(64);
        assert_eq!(
            fru.add_area(AreaId::Product, 16, 16).unwrap_err(),
            FruError::InvalidArgument
        );
    }

    #[test]
    fn delete_then_readd_area_is_allowed() {
        let mut fru = layout_fru(64);
        fru.delete_area(AreaId::Board).unwrap();
        fru.add_area(AreaId::Board, 24, 16).unwrap();
        assert_eq!(fru.get_area_length(AreaId::Board).unwrap(), 16);
    }

    #[test]
    fn shrinking_below_used_length_is_too_big() {
        let mut fru = layout_fru(64);
        fru.set_chassis_info_part_number(StringType::Ascii8, b"0123456789").unwrap();
        assert_eq!(
            fru.set_area_length(AreaId::Chassis, 8).unwrap_err(),
            FruError::TooBig
        );
    }

    #[test]
    fn resizing_board_area_emits_its_header_and_checksum_bytes() {
        let mut fru = layout_fru(64);
        fru.set_board_info_manufacturer(StringType::Ascii8, b"Acme").unwrap();

        let mut buf = [0u8; 64];
        fru.write(&mut buf).unwrap();
        fru.write_complete();

        fru.set_area_length(AreaId::Board, 40).unwrap();
        let ranges = fru.write(&mut buf).unwrap();

        // length/8 header byte sits right after the version byte; the
        // checksum sits on the last byte of the newly-grown area.
        let header_byte = 24 + 1;
        let checksum_byte = 24 + 40 - 1;
        assert!(ranges.iter().any(|r| r.offset <= header_byte && header_byte < r.offset + r.len));
        assert!(ranges.iter().any(|r| r.offset <= checksum_byte && checksum_byte < r.offset + r.len));
    }

    #[test]
    fn multi_record_area_round_trips_through_top_level() {
        let mut fru = Fru::new_empty(64);
        fru.add_area(AreaId::MultiRecord, 8, 56).unwrap();
        fru.set_multi_record(0, 0xC5, 2, Some(&[1, 2, 3])).unwrap();

        let mut buf = [0u8; 64];
        fru.write(&mut buf).unwrap();
        fru.write_complete();

        let decoded = Fru::decode(&buf).unwrap();
        assert_eq!(decoded.num_multi_records().unwrap(), 1);
        assert_eq!(decoded.get_multi_record_data(0).unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn moving_multi_record_area_keeps_it_running_to_end_of_blob() {
        let mut fru = Fru::new_empty(64);
        fru.add_area(AreaId::MultiRecord, 8, 56).unwrap();
        fru.set_area_offset(AreaId::MultiRecord, 16).unwrap();
        assert_eq!(fru.get_area_offset(AreaId::MultiRecord).unwrap(), 16);
        assert_eq!(fru.get_area_length(AreaId::MultiRecord).unwrap(), 48);
    }
}
