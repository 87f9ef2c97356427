//! Fields from a newer schema version must survive decode / encode.

use crate::{TaskDef, WireMessage};
use prost::encoding::WireType;

// name = "x", then field 100 (varint 42)
const WITH_UNKNOWN_VARINT: [u8; 6] = [0x0a, 0x01, b'x', 0xa0, 0x06, 0x2a];

#[test]
fn test_unknown_varint_is_reencoded_unchanged() {
    let def = TaskDef::decode(&WITH_UNKNOWN_VARINT).unwrap();
    assert_eq!(def.name, "x");
    assert_eq!(def.unknown_fields.len(), 1);
    let field = def.unknown_fields.iter().next().unwrap();
    assert_eq!(field.number, 100);
    assert_eq!(field.wire_type, WireType::Varint);
    assert_eq!(field.raw.as_ref(), &[0xa0, 0x06, 0x2a]);

    assert_eq!(def.encode_to_vec(), WITH_UNKNOWN_VARINT.to_vec());
    assert_eq!(def.encoded_len(), WITH_UNKNOWN_VARINT.len());
}

#[test]
fn test_all_wire_types_are_kept_in_order() {
    let unknown: Vec<u8> = vec![
        0x6a, 0x03, b'n', b'e', b'w', // 13: length delimited
        0x71, 1, 2, 3, 4, 5, 6, 7, 8, // 14: fixed64
        0x7d, 9, 8, 7, 6, // 15: fixed32
        0x83, 0x01, 0x08, 0x01, 0x84, 0x01, // 16: group { 1: varint 1 }
    ];
    let mut bytes = vec![0x18, 0x02]; // retry_count = 2
    bytes.extend_from_slice(&unknown);

    let def = TaskDef::decode(&bytes).unwrap();
    assert_eq!(def.retry_count, 2);
    assert_eq!(def.unknown_fields.numbers(), vec![13, 14, 15, 16]);
    let wire_types: Vec<WireType> = def.unknown_fields.iter().map(|f| f.wire_type).collect();
    assert_eq!(
        wire_types,
        vec![
            WireType::LengthDelimited,
            WireType::SixtyFourBit,
            WireType::ThirtyTwoBit,
            WireType::StartGroup
        ]
    );
    assert_eq!(def.encode_to_vec(), bytes);
}

#[test]
fn test_unknown_fields_move_after_known_fields() {
    // field 100 first, then name
    let bytes = [0xa0, 0x06, 0x2a, 0x0a, 0x01, b'x'];
    let def = TaskDef::decode(&bytes).unwrap();
    assert_eq!(def.encode_to_vec(), WITH_UNKNOWN_VARINT.to_vec());
    // and the result is stable from then on
    let again = TaskDef::decode(&def.encode_to_vec()).unwrap();
    assert_eq!(again, def);
}

#[test]
fn test_round_trip_with_unknown_fields_and_edits() {
    let mut def = TaskDef::decode(&WITH_UNKNOWN_VARINT).unwrap();
    def.retry_count = 4;
    def.output_keys.push("result".to_string());
    let decoded = TaskDef::decode(&def.encode_to_vec()).unwrap();
    assert_eq!(decoded, def);
    assert_eq!(decoded.unknown_fields.numbers(), vec![100]);
}

#[test]
fn test_clear_unknown_fields() {
    let mut def = TaskDef::decode(&WITH_UNKNOWN_VARINT).unwrap();
    def.unknown_fields.clear();
    assert!(def.unknown_fields.is_empty());
    assert_eq!(def.encode_to_vec(), vec![0x0a, 0x01, b'x']);
}

#[test]
fn test_unknown_field_inside_template_entry_is_skipped() {
    // entry { key = "k"; 3: varint 1 }
    let bytes = [0x62, 0x05, 0x0a, 0x01, b'k', 0x18, 0x01];
    let def = TaskDef::decode(&bytes).unwrap();
    assert!(def.input_template.contains_key("k"));
    assert!(def.unknown_fields.is_empty());
}

#[test]
fn test_unknown_field_errors_are_still_reported() {
    // field 13 length delimited, length runs past the end
    let err = TaskDef::decode(&[0x6a, 0x04, b'a']).unwrap_err();
    assert_eq!(err.kind(), crate::DecodeErrorKind::Truncated);
}
