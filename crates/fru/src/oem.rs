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

//! Pluggable decoders for multi-record payloads, keyed by
//! `(manufacturer_id, record_type_id)`.
//!
//! Entries whose `record_type_id` is below `0xC0` are IPMI-defined and
//! match regardless of manufacturer id; this module installs three such
//! built-ins (power supply information, DC output, DC load).

use crate::error::{FruError, Result};
use alloc::vec::Vec;
use lignan::lock::DebugMutex;

/// One named field extracted from an OEM/IPMI-defined multi-record
/// payload, as exposed through the tree navigator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OemValue {
    UInt(u32),
    SInt(i32),
    Float(f32),
    Bool(bool),
}

pub type OemFields = Vec<(&'static str, OemValue)>;
pub type OemDecoderFn = fn(payload: &[u8]) -> Result<OemFields>;

/// IPMI-defined record types below this value ignore the manufacturer id
/// when matching a decoder.
pub const IPMI_DEFINED_CEILING: u8 = 0xC0;

pub const POWER_SUPPLY_INFORMATION: u8 = 0x00;
pub const DC_OUTPUT: u8 = 0x01;
pub const DC_LOAD: u8 = 0x02;

#[derive(Clone, Copy)]
struct Entry {
    manufacturer_id: u32,
    record_type_id: u8,
    decoder: OemDecoderFn,
}

/// A lookup table of OEM multi-record decoders. Construct one per host
/// (or per test) for isolation, or use [`global`] for a process-wide
/// singleton.
#[derive(Clone)]
pub struct OemRegistry {
    entries: Vec<Entry>,
}

impl OemRegistry {
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// A registry preloaded with the three IPMI-defined decoders this
    /// crate ships.
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        reg.register(0, POWER_SUPPLY_INFORMATION, decode_power_supply_information);
        reg.register(0, DC_OUTPUT, decode_dc_output);
        reg.register(0, DC_LOAD, decode_dc_load);
        reg
    }

    pub fn register(&mut self, manufacturer_id: u32, record_type_id: u8, decoder: OemDecoderFn) {
        self.deregister(manufacturer_id, record_type_id);
        self.entries.push(Entry {
            manufacturer_id,
            record_type_id,
            decoder,
        });
    }

    pub fn deregister(&mut self, manufacturer_id: u32, record_type_id: u8) {
        self.entries
            .retain(|e| !(e.manufacturer_id == manufacturer_id && e.record_type_id == record_type_id));
    }

    /// Find the entry matching `record_type_id`/`payload` without invoking
    /// its decoder, so callers holding a lock over the registry can drop it
    /// before running arbitrary decoder code.
    fn find(&self, record_type_id: u8, payload: &[u8]) -> Result<Entry> {
        if payload.len() < 3 {
            return Err(FruError::InvalidArgument);
        }
        let manufacturer_id =
            payload[0] as u32 | (payload[1] as u32) << 8 | (payload[2] as u32) << 16;

        self.entries
            .iter()
            .copied()
            .find(|e| {
                e.record_type_id == record_type_id
                    && (record_type_id < IPMI_DEFINED_CEILING || e.manufacturer_id == manufacturer_id)
            })
            .ok_or_else(|| {
                lignan::warnln!("no OEM decoder for record type {record_type_id:#x}");
                FruError::NotFound
            })
    }

    /// Decode `payload` for `record_type_id`, reading the manufacturer id
    /// from `payload[0..3]` (little-endian) when it matters.
    pub fn get_root(&self, record_type_id: u8, payload: &[u8]) -> Result<OemFields> {
        let entry = self.find(record_type_id, payload)?;
        (entry.decoder)(payload)
    }
}

impl Default for OemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_REGISTRY: DebugMutex<OemRegistry> = DebugMutex::new(OemRegistry::new());

fn lock_global() -> lignan::lock::DebugMutexGuard<'static, OemRegistry> {
    loop {
        if let Some(guard) = GLOBAL_REGISTRY.try_lock() {
            return guard;
        }
    }
}

/// Register a decoder in the process-wide singleton registry.
pub fn register_oem_decoder(manufacturer_id: u32, record_type_id: u8, decoder: OemDecoderFn) {
    lock_global().register(manufacturer_id, record_type_id, decoder);
}

/// Deregister a decoder from the process-wide singleton registry.
pub fn deregister_oem_decoder(manufacturer_id: u32, record_type_id: u8) {
    lock_global().deregister(manufacturer_id, record_type_id);
}

/// Look up a decoder in the process-wide singleton registry, installing
/// the built-in IPMI decoders on first use. The lock is dropped before the
/// decoder runs, so a decoder can never observe the registry as locked.
pub fn global_get_root(record_type_id: u8, payload: &[u8]) -> Result<OemFields> {
    let mut guard = lock_global();
    if guard.entries.is_empty() {
        *guard = OemRegistry::with_builtins();
    }
    let entry = guard.find(record_type_id, payload)?;
    drop(guard);
    (entry.decoder)(payload)
}

fn decode_power_supply_information(payload: &[u8]) -> Result<OemFields> {
    if payload.len() < 3 + 12 {
        return Err(FruError::BadFormat);
    }
    let p = &payload[3..];
    let capacity = u16::from_le_bytes([p[0], p[1]]) & 0x0FFF;
    let peak_va = u16::from_le_bytes([p[2], p[3]]);
    let overload_12v_compensation = p[4] & 0x80 != 0;
    let low_end_input_voltage_range1 = u16::from_le_bytes([p[5], p[6]]);
    let high_end_input_voltage_range1 = u16::from_le_bytes([p[7], p[8]]);

    Ok(alloc::vec![
        ("capacity-watts", OemValue::UInt(capacity as u32)),
        ("peak-va", OemValue::UInt(peak_va as u32)),
        (
            "overload-12v-compensation",
            OemValue::Bool(overload_12v_compensation)
        ),
        (
            "low-end-input-voltage-range-1",
            OemValue::UInt(low_end_input_voltage_range1 as u32)
        ),
        (
            "high-end-input-voltage-range-1",
            OemValue::UInt(high_end_input_voltage_range1 as u32)
        ),
    ])
}

fn decode_dc_output(payload: &[u8]) -> Result<OemFields> {
    if payload.len() < 3 + 10 {
        return Err(FruError::BadFormat);
    }
    let p = &payload[3..];
    let output_number = p[0] & 0x0F;
    let standby = p[0] & 0x80 != 0;
    let nominal_voltage = i16::from_le_bytes([p[1], p[2]]) as f32 / 100.0;
    let max_negative_voltage_deviation = i16::from_le_bytes([p[3], p[4]]) as f32 / 100.0;
    let max_positive_voltage_deviation = i16::from_le_bytes([p[5], p[6]]) as f32 / 100.0;
    let ripple_and_noise_mv = u16::from_le_bytes([p[7], p[8]]);

    Ok(alloc::vec![
        ("output-number", OemValue::UInt(output_number as u32)),
        ("standby", OemValue::Bool(standby)),
        ("nominal-voltage", OemValue::Float(nominal_voltage)),
        (
            "max-negative-voltage-deviation",
            OemValue::Float(max_negative_voltage_deviation)
        ),
        (
            "max-positive-voltage-deviation",
            OemValue::Float(max_positive_voltage_deviation)
        ),
        ("ripple-and-noise-mv", OemValue::UInt(ripple_and_noise_mv as u32)),
    ])
}

fn decode_dc_load(payload: &[u8]) -> Result<OemFields> {
    if payload.len() < 3 + 8 {
        return Err(FruError::BadFormat);
    }
    let p = &payload[3..];
    let output_number = p[0] & 0x0F;
    let nominal_voltage = i16::from_le_bytes([p[1], p[2]]) as f32 / 100.0;
    let min_voltage = i16::from_le_bytes([p[3], p[4]]) as f32 / 100.0;
    let max_voltage = i16::from_le_bytes([p[5], p[6]]) as f32 / 100.0;

    Ok(alloc::vec![
        ("output-number", OemValue::UInt(output_number as u32)),
        ("nominal-voltage", OemValue::Float(nominal_voltage)),
        ("min-voltage", OemValue::Float(min_voltage)),
        ("max-voltage", OemValue::Float(max_voltage)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipmi_defined_type_matches_regardless_of_manufacturer() {
        let mut payload = alloc::vec![0xAAu8, 0xBB, 0xCC];
        payload.extend_from_slice(&[0u8; 12]);
        let registry = OemRegistry::with_builtins();
        let fields = registry.get_root(POWER_SUPPLY_INFORMATION, &payload).unwrap();
        assert!(fields.iter().any(|(name, _)| *name == "capacity-watts"));
    }

    #[test]
    fn short_payload_is_rejected() {
        let registry = OemRegistry::with_builtins();
        assert_eq!(
            registry.get_root(POWER_SUPPLY_INFORMATION, &[1, 2]).unwrap_err(),
            FruError::InvalidArgument
        );
    }

    #[test]
    fn unregistered_type_is_not_found() {
        let registry = OemRegistry::new();
        let payload = [0u8; 16];
        assert_eq!(
            registry.get_root(0x55, &payload).unwrap_err(),
            FruError::NotFound
        );
    }

    #[test]
    fn dc_output_scales_voltage_by_100() {
        let mut payload = alloc::vec![0, 0, 0];
        payload.push(0x01); // output number 1
        payload.extend_from_slice(&1200i16.to_le_bytes()); // 12.00V
        payload.extend_from_slice(&(-500i16).to_le_bytes());
        payload.extend_from_slice(&500i16.to_le_bytes());
        payload.extend_from_slice(&50u16.to_le_bytes());

        let registry = OemRegistry::with_builtins();
        let fields = registry.get_root(DC_OUTPUT, &payload).unwrap();
        let nominal = fields.iter().find(|(n, _)| *n == "nominal-voltage").unwrap().1;
        assert_eq!(nominal, OemValue::Float(12.0));
    }
}
