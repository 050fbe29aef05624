use num_bigint::BigInt;
use serde_json::json;
use stackwire::{
    decode_stack_value, encode_stack_value, CodecConfig, CodecError, FallbackPolicy, MapEntries,
    PrimitiveValue, ShapeChecking, StackValue, StackValueType,
};
use std::str::FromStr;

fn strict() -> CodecConfig {
    CodecConfig::default()
}

fn lenient() -> CodecConfig {
    CodecConfig::default().with_shape_checking(ShapeChecking::Lenient)
}

fn emit_null() -> CodecConfig {
    CodecConfig::default().with_fallback(FallbackPolicy::EmitNull)
}

#[test]
fn test_nested_value_round_trips() {
    let mut entries = MapEntries::new();
    entries.insert(PrimitiveValue::ByteString(b"name".to_vec()), StackValue::from("stackwire"));
    entries.insert(
        PrimitiveValue::Integer(BigInt::from(7)),
        StackValue::structure(vec![StackValue::Buffer(vec![0xff, 0x00]), StackValue::Null]),
    );
    let value = StackValue::array(vec![
        StackValue::from(true),
        StackValue::Pointer(-12),
        StackValue::InteropInterface(vec![1, 2, 3]),
        StackValue::map(entries),
    ]);

    let config = strict();
    let encoded = encode_stack_value(&value, &config).unwrap();
    let decoded = decode_stack_value(&encoded, &config).unwrap();

    assert_eq!(decoded, value);
    assert_eq!(encode_stack_value(&decoded, &config).unwrap(), encoded);
}

#[test]
fn test_integer_precision_survives() {
    let config = strict();
    for text in ["123456789012345678901234567890", "-1", "0"] {
        let json = json!({"type": "Integer", "value": text});
        let value = decode_stack_value(&json, &config).unwrap();
        assert_eq!(value, StackValue::Integer(BigInt::from_str(text).unwrap()));
        assert_eq!(encode_stack_value(&value, &config).unwrap(), json);
    }
}

#[test]
fn test_integer_with_separator_is_rejected() {
    let json = json!({"type": "Integer", "value": "1_000"});
    assert!(matches!(
        decode_stack_value(&json, &strict()),
        Err(CodecError::NumberFormat { .. })
    ));
}

#[test]
fn test_self_referencing_array_is_rejected() {
    let array = StackValue::array(vec![StackValue::from(1)]);
    assert!(array.push(array.clone()));

    assert_eq!(
        encode_stack_value(&array, &strict()),
        Err(CodecError::CyclicValue {
            kind: "Array".to_string()
        })
    );
}

#[test]
fn test_cycle_through_map_is_rejected() {
    let map = StackValue::map(MapEntries::new());
    let outer = StackValue::structure(vec![map.clone()]);
    if let StackValue::Map(entries) = &map {
        entries
            .borrow_mut()
            .insert(PrimitiveValue::Boolean(true), outer.clone());
    }

    assert!(matches!(
        encode_stack_value(&outer, &strict()),
        Err(CodecError::CyclicValue { .. })
    ));
}

#[test]
fn test_cycle_emits_null_when_configured() {
    let array = StackValue::array(vec![]);
    array.push(array.clone());

    let encoded = encode_stack_value(&array, &emit_null()).unwrap();
    assert_eq!(
        encoded,
        json!({"type": "Array", "value": [{"type": "Any", "value": null}]})
    );
}

#[test]
fn test_shared_child_is_expanded_twice() {
    let shared = StackValue::array(vec![StackValue::from(5)]);
    let diamond = StackValue::structure(vec![shared.clone(), shared]);

    let encoded = encode_stack_value(&diamond, &strict()).unwrap();
    let child = json!({"type": "Array", "value": [{"type": "Integer", "value": "5"}]});
    assert_eq!(encoded, json!({"type": "Struct", "value": [child.clone(), child]}));

    let decoded = decode_stack_value(&encoded, &strict()).unwrap();
    if let StackValue::Struct(items) = &decoded {
        let items = items.borrow();
        assert!(!items[0].same_object(&items[1]));
    } else {
        panic!("expected a struct, got {:?}", decoded);
    }
}

#[test]
fn test_invalid_base64_is_rejected() {
    let json = json!({"type": "ByteString", "value": "not-valid-base64!!"});
    assert!(matches!(
        decode_stack_value(&json, &strict()),
        Err(CodecError::InvalidEncoding { .. })
    ));
}

#[test]
fn test_unknown_type() {
    let json = json!({"type": "Float", "value": "1.5"});
    assert_eq!(
        decode_stack_value(&json, &strict()),
        Err(CodecError::UnrecognizedType {
            name: "Float".to_string()
        })
    );
    assert_eq!(decode_stack_value(&json, &emit_null()).unwrap(), StackValue::Null);

    assert!(matches!(
        decode_stack_value(&json!({"type": "Bogus", "value": 1}), &strict()),
        Err(CodecError::UnrecognizedType { .. })
    ));
}

#[test]
fn test_missing_type_is_unrecognized() {
    assert!(matches!(
        decode_stack_value(&json!({"value": true}), &strict()),
        Err(CodecError::UnrecognizedType { .. })
    ));
}

#[test]
fn test_later_map_key_wins() {
    let json = json!({
        "type": "Map",
        "value": [
            {"key": {"type": "Integer", "value": "1"}, "value": {"type": "Integer", "value": "10"}},
            {"key": {"type": "Integer", "value": "1"}, "value": {"type": "Integer", "value": "20"}}
        ]
    });
    let value = decode_stack_value(&json, &strict()).unwrap();

    let StackValue::Map(entries) = &value else {
        panic!("expected a map, got {:?}", value);
    };
    let entries = entries.borrow();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries.get(&PrimitiveValue::Integer(BigInt::from(1))),
        Some(&StackValue::from(20))
    );
}

#[test]
fn test_compound_map_key_is_rejected() {
    let json = json!({
        "type": "Map",
        "value": [{"key": {"type": "Array", "value": []}, "value": {"type": "Any", "value": null}}]
    });
    assert!(matches!(
        decode_stack_value(&json, &strict()),
        Err(CodecError::InvalidMapKey { .. })
    ));
}

#[test]
fn test_malformed_compound_payload() {
    let json = json!({"type": "Struct", "value": {"not": "an array"}});
    assert!(matches!(
        decode_stack_value(&json, &strict()),
        Err(CodecError::ShapeMismatch { .. })
    ));

    let value = decode_stack_value(&json, &lenient()).unwrap();
    assert_eq!(value.kind(), StackValueType::Struct);
    assert_eq!(value.len(), Some(0));
}

#[test]
fn test_lenient_skips_malformed_pairs() {
    let json = json!({
        "type": "Map",
        "value": [
            "junk",
            {"key": {"type": "Boolean", "value": true}},
            {"key": {"type": "Boolean", "value": false}, "value": {"type": "Integer", "value": "3"}}
        ]
    });
    assert!(decode_stack_value(&json, &strict()).is_err());

    let value = decode_stack_value(&json, &lenient()).unwrap();
    assert_eq!(value.len(), Some(1));
}

#[test]
fn test_pointer_payload() {
    let config = strict();
    assert_eq!(
        decode_stack_value(&json!({"type": "Pointer", "value": 7}), &config).unwrap(),
        StackValue::Pointer(7)
    );
    assert!(matches!(
        decode_stack_value(&json!({"type": "Pointer", "value": "7"}), &config),
        Err(CodecError::TypeMismatch { .. })
    ));
    assert!(matches!(
        decode_stack_value(&json!({"type": "Pointer", "value": 4294967296i64}), &config),
        Err(CodecError::NumberFormat { .. })
    ));
}

#[test]
fn test_depth_limit() {
    let config = strict().with_max_depth(3);
    let mut json = json!({"type": "Any", "value": null});
    for _ in 0..4 {
        json = json!({"type": "Array", "value": [json]});
    }
    assert_eq!(
        decode_stack_value(&json, &config),
        Err(CodecError::DepthExceeded { limit: 3 })
    );

    let mut value = StackValue::Null;
    for _ in 0..4 {
        value = StackValue::array(vec![value]);
    }
    assert_eq!(
        encode_stack_value(&value, &config),
        Err(CodecError::DepthExceeded { limit: 3 })
    );
}

#[test]
fn test_null_alias_and_case_insensitive_names() {
    let config = strict();
    let json = json!({"Type": "null", "VALUE": null});
    assert_eq!(decode_stack_value(&json, &config).unwrap(), StackValue::Null);

    let json = json!({"type": "bytestring", "value": "AQ=="});
    assert_eq!(
        decode_stack_value(&json, &config).unwrap(),
        StackValue::ByteString(vec![1])
    );
}
