//! Layout assertions for the dump record and its wire image.
//!
//! The record is read bit-exactly by the host decoder, so offsets of the
//! leading fields and the encoded length are part of the contract.

use core::mem::offset_of;

use blackbox::profile::{CALL_STACK_SIZE, FILE_NAME_LEN};
use blackbox::record::{DumpRecord, FaultKind, RecordError};

#[test]
fn leading_field_offsets_are_fixed() {
    // The key pair must sit at the very start of the region: the validity
    // check runs before anything else is trusted.
    assert_eq!(offset_of!(DumpRecord, key), 0);
    assert_eq!(offset_of!(DumpRecord, anti_key), 4);
    assert_eq!(offset_of!(DumpRecord, software_version), 8);
    assert_eq!(offset_of!(DumpRecord, aux_code), 12);
    assert_eq!(offset_of!(DumpRecord, fault_kind), 16);
    assert_eq!(offset_of!(DumpRecord, line_number), 20);
    assert_eq!(offset_of!(DumpRecord, file_name), 24);
}

#[test]
fn encoded_len_tracks_the_feature_set() {
    let mut expected = 6 * 4 + FILE_NAME_LEN + CALL_STACK_SIZE * 4;
    if cfg!(feature = "hardware") {
        expected += (8 + 5) * 4;
    }
    if cfg!(feature = "os") {
        expected += 5 * CALL_STACK_SIZE * 4;
    }
    assert_eq!(DumpRecord::ENCODED_LEN, expected);
}

#[test]
fn encode_writes_keys_first() {
    let mut rec = DumpRecord::zeroed();
    rec.mark_valid();
    let mut blob = [0u8; DumpRecord::ENCODED_LEN];
    rec.encode_into(&mut blob).unwrap();
    assert_eq!(u32::from_le_bytes(blob[0..4].try_into().unwrap()), rec.key);
    assert_eq!(
        u32::from_le_bytes(blob[4..8].try_into().unwrap()),
        rec.anti_key
    );
}

#[test]
fn wire_round_trip_is_lossless_for_a_full_record() {
    let mut rec = DumpRecord::zeroed();
    rec.mark_valid();
    rec.software_version = 0x0102_0304;
    rec.aux_code = 0xFEED;
    rec.fault_kind = FaultKind::HardwareException.as_raw();
    rec.line_number = 4096;
    rec.set_file_name("crates/firmware/src/handlers.rs");
    for (i, slot) in rec.active_backtrace.iter_mut().enumerate() {
        *slot = 0x0800_0000 + 0x40 * i;
    }

    let mut blob = [0u8; DumpRecord::ENCODED_LEN];
    let len = rec.encode_into(&mut blob).unwrap();
    assert_eq!(len, DumpRecord::ENCODED_LEN);

    let back = DumpRecord::decode(&blob).unwrap();
    assert_eq!(back.software_version, rec.software_version);
    assert_eq!(back.aux_code, rec.aux_code);
    assert_eq!(back.fault_kind, rec.fault_kind);
    assert_eq!(back.line_number, rec.line_number);
    assert_eq!(back.file_name_str(), rec.file_name_str());
    assert_eq!(back.active_backtrace, rec.active_backtrace);
}

#[test]
fn decoder_rejects_garbage_and_short_blobs() {
    assert_eq!(
        DumpRecord::decode(&[0u8; DumpRecord::ENCODED_LEN]),
        Err(RecordError::BadKey)
    );
    assert_eq!(DumpRecord::decode(&[0u8; 7]), Err(RecordError::Truncated));
}

#[test]
fn long_file_names_truncate_from_the_right() {
    let mut rec = DumpRecord::zeroed();
    let long = "d/".repeat(100) + "leaf.rs";
    rec.set_file_name(&long);
    assert_eq!(rec.file_name[FILE_NAME_LEN - 1], 0);
    assert_eq!(rec.file_name_str().len(), FILE_NAME_LEN - 1);
    assert!(long.starts_with(rec.file_name_str()));
}
