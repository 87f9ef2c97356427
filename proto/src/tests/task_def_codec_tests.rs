//! Wire encode / decode of TaskDef

use crate::enums::{RetryLogic, TimeoutPolicy};
use crate::template::json_to_value;
use crate::{DecodeError, DecodeErrorKind, TaskDef, WireMessage};
use prost::encoding::WireType;
use serde_json::json;

fn send_email() -> TaskDef {
    TaskDef {
        name: "sendEmail".to_string(),
        retry_count: 3,
        timeout_seconds: 60,
        input_keys: vec!["to".to_string(), "subject".to_string()],
        ..Default::default()
    }
}

fn full_def() -> TaskDef {
    let mut def = TaskDef {
        name: "encode_video".to_string(),
        description: "transcode the uploaded file".to_string(),
        retry_count: 2,
        timeout_seconds: 3600,
        input_keys: vec!["fileLocation".to_string(), "codec".to_string()],
        output_keys: vec!["outputLocation".to_string()],
        retry_delay_seconds: 30,
        response_timeout_seconds: 600,
        concurrent_exec_limit: 10,
        ..Default::default()
    };
    def.set_timeout_policy(TimeoutPolicy::TimeOutWf);
    def.set_retry_logic(RetryLogic::ExponentialBackoff);
    def.input_template.insert(
        "codec".to_string(),
        json_to_value(&json!("h264")),
    );
    def.input_template.insert(
        "options".to_string(),
        json_to_value(&json!({"bitrate": 1200, "twoPass": true, "tags": ["a", null]})),
    );
    def
}

// ==================== encode ====================

#[test]
fn test_send_email_wire_bytes() {
    let bytes = send_email().encode_to_vec();
    let mut expected = vec![0x0a, 0x09];
    expected.extend_from_slice(b"sendEmail");
    expected.extend_from_slice(&[0x18, 0x03]);
    expected.extend_from_slice(&[0x20, 0x3c]);
    expected.extend_from_slice(&[0x2a, 0x02]);
    expected.extend_from_slice(b"to");
    expected.extend_from_slice(&[0x2a, 0x07]);
    expected.extend_from_slice(b"subject");
    assert_eq!(bytes, expected);
    assert_eq!(bytes.len(), send_email().encoded_len());
}

#[test]
fn test_send_email_round_trip_keeps_defaults() {
    let decoded = TaskDef::decode(&send_email().encode_to_vec()).unwrap();
    assert_eq!(decoded, send_email());
    assert_eq!(decoded.retry_count, 3);
    assert_eq!(decoded.timeout_seconds, 60);
    assert_eq!(decoded.input_keys, vec!["to", "subject"]);
    assert_eq!(decoded.timeout_policy(), TimeoutPolicy::Retry);
    assert_eq!(decoded.retry_logic(), RetryLogic::Fixed);
    assert!(decoded.output_keys.is_empty());
    assert!(decoded.input_template.is_empty());
    assert_eq!(decoded.concurrent_exec_limit, 0);
}

#[test]
fn test_default_record_encodes_to_empty_payload() {
    assert!(TaskDef::default().encode_to_vec().is_empty());
    assert_eq!(TaskDef::default().encoded_len(), 0);
    assert_eq!(TaskDef::decode(&[]).unwrap(), TaskDef::default());
}

#[test]
fn test_full_round_trip() {
    let def = full_def();
    let bytes = def.encode_to_vec();
    assert_eq!(bytes.len(), def.encoded_len());
    assert_eq!(TaskDef::decode(&bytes).unwrap(), def);
}

#[test]
fn test_encoding_is_deterministic() {
    let a = full_def();
    // same content, template entries inserted in reverse order
    let mut b = TaskDef {
        input_template: Default::default(),
        ..a.clone()
    };
    for (k, v) in a.input_template.iter().rev() {
        b.input_template.insert(k.clone(), v.clone());
    }
    assert_eq!(a, b);
    assert_eq!(a.encode_to_vec(), b.encode_to_vec());
}

#[test]
fn test_negative_values_round_trip() {
    let def = TaskDef {
        retry_count: -1,
        timeout_seconds: i64::MIN,
        concurrent_exec_limit: i32::MIN,
        ..Default::default()
    };
    let bytes = def.encode_to_vec();
    // negative int32 is sign extended to a 10 byte varint
    assert_eq!(&bytes[..11], &[0x18, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01]);
    assert_eq!(TaskDef::decode(&bytes).unwrap(), def);
}

#[test]
fn test_template_entry_bytes() {
    let mut def = TaskDef::default();
    def.input_template
        .insert("a".to_string(), json_to_value(&json!("b")));
    assert_eq!(
        def.encode_to_vec(),
        vec![0x62, 0x08, 0x0a, 0x01, b'a', 0x12, 0x03, 0x1a, 0x01, b'b']
    );
}

#[test]
fn test_template_entry_with_default_key_and_value() {
    let mut def = TaskDef::default();
    def.input_template
        .insert(String::new(), prost_types::Value::default());
    let bytes = def.encode_to_vec();
    assert_eq!(bytes, vec![0x62, 0x00]);
    assert_eq!(TaskDef::decode(&bytes).unwrap(), def);
}

// ==================== decode ====================

#[test]
fn test_last_scalar_wins_and_repeated_appends() {
    let bytes = [
        0x18, 0x01, // retry_count = 1
        0x2a, 0x01, b'a', // input_keys += "a"
        0x18, 0x05, // retry_count = 5
        0x2a, 0x01, b'b', // input_keys += "b"
    ];
    let def = TaskDef::decode(&bytes).unwrap();
    assert_eq!(def.retry_count, 5);
    assert_eq!(def.input_keys, vec!["a", "b"]);
}

#[test]
fn test_later_template_entry_overrides() {
    let bytes = [
        0x62, 0x05, 0x0a, 0x01, b'k', 0x12, 0x00, // k = Value{} (kind unset)
        0x62, 0x08, 0x0a, 0x01, b'k', 0x12, 0x03, 0x1a, 0x01, b'v', // k = "v"
    ];
    let def = TaskDef::decode(&bytes).unwrap();
    assert_eq!(def.input_template.len(), 1);
    assert_eq!(def.input_template["k"], json_to_value(&json!("v")));
}

#[test]
fn test_unknown_enum_value_is_kept() {
    let bytes = [0x38, 0x63];
    let def = TaskDef::decode(&bytes).unwrap();
    assert_eq!(def.timeout_policy, 99);
    assert_eq!(def.timeout_policy(), TimeoutPolicy::Retry);
    assert_eq!(def.timeout_policy_name(), "99");
    assert_eq!(def.encode_to_vec(), bytes.to_vec());

    let def = TaskDef::decode(&[0x40, 0x07]).unwrap();
    assert_eq!(def.retry_logic, 7);
    assert_eq!(def.retry_logic_name(), "7");
}

#[test]
fn test_truncated_mid_varint() {
    let err = TaskDef::decode(&[0x20, 0xac]).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::Truncated);
    assert_eq!(err.offset(), 1);

    let err = TaskDef::decode(&[0x80]).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::Truncated);
}

#[test]
fn test_truncated_length_delimited() {
    let err = TaskDef::decode(&[0x0a, 0x05, b'a']).unwrap_err();
    assert_eq!(
        err,
        DecodeError::Truncated {
            offset: 2,
            needed: 4
        }
    );
}

#[test]
fn test_wire_type_mismatch() {
    // retry_count sent as length delimited
    let err = TaskDef::decode(&[0x1a, 0x00]).unwrap_err();
    assert_eq!(
        err,
        DecodeError::TypeMismatch {
            offset: 0,
            field: 3,
            expected: WireType::Varint,
            found: WireType::LengthDelimited,
        }
    );
    // name sent as varint
    let err = TaskDef::decode(&[0x0a, 0x01, b'x', 0x08, 0x01]).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::TypeMismatch);
    assert_eq!(err.offset(), 3);
}

#[test]
fn test_template_entry_errors() {
    // entry key encoded as varint
    let err = TaskDef::decode(&[0x62, 0x02, 0x08, 0x01]).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::TypeMismatch);
    assert_eq!(err.offset(), 2);

    // value payload is a broken google.protobuf.Value
    let err = TaskDef::decode(&[0x62, 0x04, 0x12, 0x02, 0x1a, 0x05]).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::Malformed);
}

#[test]
fn test_malformed_input() {
    // invalid wire type
    let err = TaskDef::decode(&[0x0f]).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::Malformed);
    // invalid utf-8 name
    let err = TaskDef::decode(&[0x0a, 0x02, 0xc3, 0x28]).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::Malformed);
    // stray end group (unknown field 13)
    let err = TaskDef::decode(&[0x6c]).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::Malformed);
}

#[test]
fn test_every_prefix_of_valid_payload_decodes_or_errors() {
    let bytes = full_def().encode_to_vec();
    for end in 0..bytes.len() {
        // must never panic
        let _ = TaskDef::decode(&bytes[..end]);
    }
}

// ==================== concurrency ====================

#[test]
fn test_shared_between_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TaskDef>();

    let def = full_def();
    let bytes = def.encode_to_vec();
    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                assert_eq!(def.encode_to_vec(), bytes);
                assert_eq!(TaskDef::decode(&bytes).unwrap(), def);
            });
        }
    });
}
