//! Black-box end-to-end scenarios exercising the public API, one per
//! invariant called out for this codec: a minimal valid image, a rejected
//! header, a fixed-field edit, a custom-field append/delete round trip, a
//! multi-record chain with OEM decoding, and an out-of-space rejection.

use fru::{AreaId, Fru, FruError, OemRegistry, OemValue, StringType};

#[test]
fn s1_minimal_valid_fru_decodes() {
    let mut fru = Fru::new_empty(64);
    fru.add_area(AreaId::Chassis, 8, 8).unwrap();

    let mut buf = [0u8; 64];
    fru.write(&mut buf).unwrap();

    let decoded = Fru::decode(&buf).unwrap();
    assert_eq!(decoded.chassis_info_type().unwrap(), 0);
}

#[test]
fn s2_bad_header_checksum_is_rejected() {
    let mut fru = Fru::new_empty(64);
    fru.add_area(AreaId::Chassis, 8, 8).unwrap();

    let mut buf = [0u8; 64];
    fru.write(&mut buf).unwrap();
    buf[7] ^= 0x01;

    assert_eq!(Fru::decode(&buf).unwrap_err(), FruError::BadFormat);
}

#[test]
fn s3_set_fixed_string_grows_used_length_and_emits_multiple_ranges() {
    let mut fru = Fru::new_empty(64);
    fru.add_area(AreaId::Chassis, 8, 16).unwrap();

    let mut buf = [0u8; 64];
    fru.write(&mut buf).unwrap();
    fru.write_complete();

    let before_used = fru.get_area_used_length(AreaId::Chassis).unwrap();
    fru.set_chassis_info_part_number(StringType::Ascii8, b"ABC").unwrap();
    let after_used = fru.get_area_used_length(AreaId::Chassis).unwrap();
    assert_eq!(after_used, before_used + 3);

    let mut buf2 = [0u8; 64];
    let ranges = fru.write(&mut buf2).unwrap();
    assert!(ranges.len() >= 2, "expected at least the string bytes and the checksum byte, got {ranges:?}");
}

#[test]
fn s4_custom_append_then_delete_restores_the_original_image() {
    let mut fru = Fru::new_empty(64);
    fru.add_area(AreaId::Chassis, 8, 16).unwrap();

    let mut original = [0u8; 64];
    fru.write(&mut original).unwrap();
    fru.write_complete();

    fru.set_chassis_info_custom(0, Some(StringType::Ascii8), Some(b"X")).unwrap();
    fru.set_chassis_info_custom(0, None, None).unwrap();

    let mut after = [0u8; 64];
    fru.write(&mut after).unwrap();
    assert_eq!(original, after);
}

#[test]
fn s5_multi_record_round_trip_and_oem_decode() {
    let mut dc_output = vec![0u8, 0, 0, 0x01];
    dc_output.extend_from_slice(&1200i16.to_le_bytes());
    dc_output.extend_from_slice(&(-500i16).to_le_bytes());
    dc_output.extend_from_slice(&500i16.to_le_bytes());
    dc_output.extend_from_slice(&50u16.to_le_bytes());

    let mut dc_load = vec![0u8, 0, 0, 0x01];
    dc_load.extend_from_slice(&1200i16.to_le_bytes());
    dc_load.extend_from_slice(&1100i16.to_le_bytes());
    dc_load.extend_from_slice(&1300i16.to_le_bytes());

    let mut fru = Fru::new_empty(64);
    fru.add_area(AreaId::MultiRecord, 8, 56).unwrap();
    fru.set_multi_record(0, 0x01, 2, Some(&dc_output)).unwrap();
    fru.set_multi_record(1, 0x02, 2, Some(&dc_load)).unwrap();

    let mut buf = [0u8; 64];
    fru.write(&mut buf).unwrap();
    fru.write_complete();

    let mut decoded = Fru::decode(&buf).unwrap();
    assert_eq!(decoded.num_multi_records().unwrap(), 2);
    assert_eq!(decoded.get_multi_record_data(0).unwrap(), dc_output.as_slice());
    assert_eq!(decoded.get_multi_record_data(1).unwrap(), dc_load.as_slice());

    let registry = OemRegistry::with_builtins();
    let fields = registry.get_root(0x01, decoded.get_multi_record_data(0).unwrap()).unwrap();
    let nominal = fields.iter().find(|(name, _)| *name == "nominal-voltage").unwrap().1;
    assert_eq!(nominal, OemValue::Float(12.0));

    let mut buf2 = [0u8; 64];
    let ranges = decoded.write(&mut buf2).unwrap();
    assert_eq!(buf, buf2);
    assert!(ranges.is_empty());
}

#[test]
fn s6_out_of_space_leaves_prior_value_readable() {
    let mut fru = Fru::new_empty(64);
    fru.add_area(AreaId::Chassis, 8, 16).unwrap();
    fru.set_chassis_info_part_number(StringType::Ascii8, b"ABCDEFGH").unwrap();
    let before = fru.chassis_info_part_number().unwrap().to_vec();

    let err = fru
        .set_chassis_info_serial_number(StringType::Ascii8, &[0u8; 20])
        .unwrap_err();
    assert_eq!(err, FruError::OutOfSpace);

    assert_eq!(fru.chassis_info_part_number().unwrap(), before.as_slice());
}
