/*
  ____                 __               __   _ __
 / __ \__ _____ ____  / /___ ____ _    / /  (_) /
/ /_/ / // / _ `/ _ \/ __/ // '  ' \  / /__/ / _ \
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

//! A data-driven table of every reachable scalar/timestamp/string/binary
//! field, plus a small set of navigator [`Node`] shapes that expose them
//! (and the custom-string arrays and multi-record chain) through one
//! `get_field` primitive instead of per-field accessor fan-out.

use crate::error::{FruError, Result};
use crate::oem::{self, OemValue};
use crate::string_codec::StringType;
use crate::timestamp::FruTimestamp;
use crate::{Fru, FruHandle};
use alloc::vec::Vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    UInt,
    Time,
    Ascii,
    Binary,
    Float,
    Bool,
    SubNode,
}

#[derive(Clone, Copy)]
struct FieldDescriptor {
    name: &'static str,
    kind: FieldKind,
    has_num: bool,
}

/// Root reflection table. Index is the sole addressing scheme `get_field`
/// uses for the root node; `str_to_index`/`index_to_str` translate to and
/// from the names here.
const FIELDS: &[FieldDescriptor] = &[
    fd("internal-use.data", FieldKind::Binary, false), // 0
    fd("chassis-info.type", FieldKind::UInt, false),    // 1
    fd("chassis-info.part-number", FieldKind::Ascii, false), // 2
    fd("chassis-info.serial-number", FieldKind::Ascii, false), // 3
    fd("chassis-info.custom", FieldKind::Ascii, true),  // 4
    fd("board-info.language-code", FieldKind::UInt, false), // 5
    fd("board-info.mfg-date-time", FieldKind::Time, false), // 6
    fd("board-info.manufacturer", FieldKind::Ascii, false), // 7
    fd("board-info.product-name", FieldKind::Ascii, false), // 8
    fd("board-info.serial-number", FieldKind::Ascii, false), // 9
    fd("board-info.part-number", FieldKind::Ascii, false), // 10
    fd("board-info.fru-file-id", FieldKind::Ascii, false), // 11
    fd("board-info.custom", FieldKind::Ascii, true),    // 12
    fd("product-info.language-code", FieldKind::UInt, false), // 13
    fd("product-info.manufacturer-name", FieldKind::Ascii, false), // 14
    fd("product-info.product-name", FieldKind::Ascii, false), // 15
    fd("product-info.part-model-number", FieldKind::Ascii, false), // 16
    fd("product-info.version", FieldKind::Ascii, false), // 17
    fd("product-info.serial-number", FieldKind::Ascii, false), // 18
    fd("product-info.asset-tag", FieldKind::Ascii, false), // 19
    fd("product-info.fru-file-id", FieldKind::Ascii, false), // 20
    fd("product-info.custom", FieldKind::Ascii, true),  // 21
    fd("multirecords", FieldKind::SubNode, true),       // 22
];

const fn fd(name: &'static str, kind: FieldKind, has_num: bool) -> FieldDescriptor {
    FieldDescriptor { name, kind, has_num }
}

const IDX_CHASSIS_CUSTOM: usize = 4;
const IDX_BOARD_CUSTOM: usize = 12;
const IDX_PRODUCT_CUSTOM: usize = 21;
const IDX_MULTIRECORDS: usize = 22;

pub fn str_to_index(name: &str) -> Option<usize> {
    FIELDS.iter().position(|f| f.name == name)
}

pub fn index_to_str(index: usize) -> Option<&'static str> {
    FIELDS.get(index).map(|f| f.name)
}

/// A decoded value returned from a leaf field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    UInt(u32),
    Time(FruTimestamp),
    Ascii(Vec<u8>),
    Binary(Vec<u8>),
    Float(f32),
    Bool(bool),
}

/// What `get_field` returns: either a leaf value or a child node to keep
/// navigating into.
pub enum FieldOutcome {
    Value(FieldValue),
    Child(Node),
}

#[derive(Clone)]
enum NodePath {
    Root,
    Array { field_index: usize },
    MultiRecords,
    MultiRecordItem(usize),
    OemFields(alloc::rc::Rc<Vec<(&'static str, OemValue)>>),
}

/// A position in the FRU's field tree. Holds a refcounted back-reference
/// to the owning [`Fru`]; the FRU cannot be dropped while any node
/// referencing it still exists.
#[derive(Clone)]
pub struct Node {
    fru: FruHandle,
    path: NodePath,
}

impl Node {
    pub fn root(fru: FruHandle) -> Self {
        Self {
            fru,
            path: NodePath::Root,
        }
    }

    /// The sole traversal primitive: look up child/leaf `index` of this
    /// node, returning its name, kind, and either a scalar value or a
    /// child node to keep navigating into.
    pub fn get_field(&self, index: usize) -> Result<(&'static str, FieldKind, FieldOutcome)> {
        let (name, outcome) = match &self.path {
            NodePath::Root => self.root_field(index)?,
            NodePath::Array { field_index } => self.array_field(*field_index, index)?,
            NodePath::MultiRecords => self.multirecords_field(index)?,
            NodePath::MultiRecordItem(rec_index) => self.multirecord_item_field(*rec_index, index)?,
            NodePath::OemFields(fields) => {
                let (name, value) = fields.get(index).ok_or(FruError::NotFound)?;
                let value = match value {
                    OemValue::UInt(v) => FieldValue::UInt(*v),
                    OemValue::SInt(v) => FieldValue::UInt(*v as u32),
                    OemValue::Float(v) => FieldValue::Float(*v),
                    OemValue::Bool(v) => FieldValue::Bool(*v),
                };
                (*name, FieldOutcome::Value(value))
            }
        };
        let kind = match &outcome {
            FieldOutcome::Child(_) => FieldKind::SubNode,
            FieldOutcome::Value(FieldValue::UInt(_)) => FieldKind::UInt,
            FieldOutcome::Value(FieldValue::Time(_)) => FieldKind::Time,
            FieldOutcome::Value(FieldValue::Ascii(_)) => FieldKind::Ascii,
            FieldOutcome::Value(FieldValue::Binary(_)) => FieldKind::Binary,
            FieldOutcome::Value(FieldValue::Float(_)) => FieldKind::Float,
            FieldOutcome::Value(FieldValue::Bool(_)) => FieldKind::Bool,
        };
        Ok((name, kind, outcome))
    }

    fn child(&self, path: NodePath) -> Node {
        Node {
            fru: self.fru.clone(),
            path,
        }
    }

    fn root_field(&self, index: usize) -> Result<(&'static str, FieldOutcome)> {
        let desc = FIELDS.get(index).ok_or(FruError::NotFound)?;
        let name = desc.name;

        if desc.has_num {
            let child = if index == IDX_MULTIRECORDS {
                self.child(NodePath::MultiRecords)
            } else {
                self.child(NodePath::Array { field_index: index })
            };
            return Ok((name, FieldOutcome::Child(child)));
        }

        let fru = self.fru.borrow();
        let value = root_scalar_value(&fru, index)?;
        Ok((name, FieldOutcome::Value(value)))
    }

    fn array_field(&self, field_index: usize, ordinal: usize) -> Result<(&'static str, FieldOutcome)> {
        let fru = self.fru.borrow();
        let payload = match field_index {
            IDX_CHASSIS_CUSTOM => fru
                .chassis_area()
                .ok_or(FruError::NotFound)?
                .custom(ordinal)?,
            IDX_BOARD_CUSTOM => fru.board_area().ok_or(FruError::NotFound)?.custom(ordinal)?,
            IDX_PRODUCT_CUSTOM => fru
                .product_area()
                .ok_or(FruError::NotFound)?
                .custom(ordinal)?,
            _ => return Err(FruError::NotImplemented),
        };
        let name = FIELDS[field_index].name;
        Ok((name, FieldOutcome::Value(FieldValue::Ascii(payload.to_vec()))))
    }

    fn multirecords_field(&self, ordinal: usize) -> Result<(&'static str, FieldOutcome)> {
        let fru = self.fru.borrow();
        let area = fru.multirecord_area().ok_or(FruError::NotFound)?;
        area.get(ordinal)?;
        Ok(("multirecord", FieldOutcome::Child(self.child(NodePath::MultiRecordItem(ordinal)))))
    }

    fn multirecord_item_field(&self, rec_index: usize, child_index: usize) -> Result<(&'static str, FieldOutcome)> {
        let fru = self.fru.borrow();
        let area = fru.multirecord_area().ok_or(FruError::NotFound)?;
        let record = area.get(rec_index)?;

        match child_index {
            0 => Ok((
                "raw-data",
                FieldOutcome::Value(FieldValue::Binary(record.data().to_vec())),
            )),
            1 => {
                let fields = oem::global_get_root(record.record_type(), record.data())?;
                Ok((
                    "oem-decoded",
                    FieldOutcome::Child(self.child(NodePath::OemFields(alloc::rc::Rc::new(fields)))),
                ))
            }
            _ => Err(FruError::NotFound),
        }
    }
}

fn root_scalar_value(fru: &Fru, index: usize) -> Result<FieldValue> {
    Ok(match index {
        0 => FieldValue::Binary(
            fru.internal_use_area()
                .ok_or(FruError::NotFound)?
                .payload()
                .to_vec(),
        ),
        1 => FieldValue::UInt(fru.chassis_area().ok_or(FruError::NotFound)?.chassis_type() as u32),
        2 => FieldValue::Ascii(
            fru.chassis_area()
                .ok_or(FruError::NotFound)?
                .part_number()?
                .to_vec(),
        ),
        3 => FieldValue::Ascii(
            fru.chassis_area()
                .ok_or(FruError::NotFound)?
                .serial_number()?
                .to_vec(),
        ),
        5 => FieldValue::UInt(fru.board_area().ok_or(FruError::NotFound)?.language_code() as u32),
        6 => FieldValue::Time(fru.board_area().ok_or(FruError::NotFound)?.mfg_date_time()),
        7 => FieldValue::Ascii(
            fru.board_area()
                .ok_or(FruError::NotFound)?
                .manufacturer()?
                .to_vec(),
        ),
        8 => FieldValue::Ascii(
            fru.board_area()
                .ok_or(FruError::NotFound)?
                .product_name()?
                .to_vec(),
        ),
        9 => FieldValue::Ascii(
            fru.board_area()
                .ok_or(FruError::NotFound)?
                .serial_number()?
                .to_vec(),
        ),
        10 => FieldValue::Ascii(
            fru.board_area()
                .ok_or(FruError::NotFound)?
                .part_number()?
                .to_vec(),
        ),
        11 => FieldValue::Ascii(
            fru.board_area()
                .ok_or(FruError::NotFound)?
                .fru_file_id()?
                .to_vec(),
        ),
        13 => FieldValue::UInt(fru.product_area().ok_or(FruError::NotFound)?.language_code() as u32),
        14 => FieldValue::Ascii(
            fru.product_area()
                .ok_or(FruError::NotFound)?
                .manufacturer_name()?
                .to_vec(),
        ),
        15 => FieldValue::Ascii(
            fru.product_area()
                .ok_or(FruError::NotFound)?
                .product_name()?
                .to_vec(),
        ),
        16 => FieldValue::Ascii(
            fru.product_area()
                .ok_or(FruError::NotFound)?
                .part_model_number()?
                .to_vec(),
        ),
        17 => FieldValue::Ascii(
            fru.product_area()
                .ok_or(FruError::NotFound)?
                .version()?
                .to_vec(),
        ),
        18 => FieldValue::Ascii(
            fru.product_area()
                .ok_or(FruError::NotFound)?
                .serial_number()?
                .to_vec(),
        ),
        19 => FieldValue::Ascii(
            fru.product_area()
                .ok_or(FruError::NotFound)?
                .asset_tag()?
                .to_vec(),
        ),
        20 => FieldValue::Ascii(
            fru.product_area()
                .ok_or(FruError::NotFound)?
                .fru_file_id()?
                .to_vec(),
        ),
        _ => return Err(FruError::NotFound),
    })
}

/// Convenience helper used by `set_chassis_info_part_number`-style callers
/// that want to pass English text without naming a `StringType`.
pub const DEFAULT_STRING_TYPE: StringType = StringType::Ascii8;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fru;

    #[test]
    fn str_to_index_and_back_agree() {
        let idx = str_to_index("board-info.product-name").unwrap();
        assert_eq!(index_to_str(idx), Some("board-info.product-name"));
    }

    #[test]
    fn root_scalar_reads_chassis_type() {
        let mut fru = Fru::new_empty(64);
        fru.add_area(crate::header::AreaId::Chassis, 8, 16).unwrap();
        fru.set_chassis_info_type(5).unwrap();

        let handle = fru.into_handle();
        let root = Node::root(handle);
        let (name, kind, outcome) = root.get_field(1).unwrap();
        assert_eq!(name, "chassis-info.type");
        assert_eq!(kind, FieldKind::UInt);
        match outcome {
            FieldOutcome::Value(FieldValue::UInt(v)) => assert_eq!(v, 5),
            _ => panic!("expected scalar uint"),
        }
    }

    #[test]
    fn array_node_signals_end_with_not_found() {
        let mut fru = Fru::new_empty(64);
        fru.add_area(crate::header::AreaId::Chassis, 8, 24).unwrap();
        fru.set_chassis_info_custom(0, Some(DEFAULT_STRING_TYPE), Some(b"hi")).unwrap();

        let handle = fru.into_handle();
        let root = Node::root(handle);
        let (_, kind, outcome) = root.get_field(IDX_CHASSIS_CUSTOM).unwrap();
        assert_eq!(kind, FieldKind::SubNode);
        let FieldOutcome::Child(array) = outcome else {
            panic!("expected array child");
        };
        assert!(array.get_field(0).is_ok());
        assert_eq!(array.get_field(1).unwrap_err(), FruError::NotFound);
    }
}
