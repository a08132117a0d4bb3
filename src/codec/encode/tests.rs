use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;

use super::{EncodeOptions, encode_value};
use crate::codec::{CodecError, Complex, CompositeValue, IntoValue, MessageValue, TypeHint, Value};

fn render(value: &Value, hint: Option<&TypeHint>, opt: &EncodeOptions) -> serde_json::Value {
	encode_value(value, hint, opt).expect("value encodes").to_json().expect("node renders")
}

fn host(tag: &str) -> serde_json::Value {
	json!({"hostType": {"type": "dataType", "value": tag}})
}

#[test]
fn scalars_carry_host_type_only_when_ambiguous() {
	let opt = EncodeOptions::default();
	assert_eq!(render(&Value::Null, None, &opt), json!({"type": "", "value": null}));
	assert_eq!(render(&Value::Bool(true), None, &opt), json!({"type": "boolean", "value": true}));
	assert_eq!(render(&Value::Int(3), None, &opt), json!({"type": "number", "value": 3, "metadata": host("int")}));
	assert_eq!(render(&Value::Float(1.5), None, &opt), json!({"type": "number", "value": 1.5, "metadata": host("float")}));
	assert_eq!(render(&Value::Long(7), None, &opt), json!({"type": "number", "value": 7, "metadata": host("long")}));
	assert_eq!(render(&"plain".into_value(), None, &opt), json!({"type": "string", "value": "plain"}));
}

#[test]
fn complex_becomes_two_float_nodes() {
	let out = render(&Value::Complex(Complex::new(1.0, -2.5)), None, &EncodeOptions::default());
	assert_eq!(
		out,
		json!({
			"type": "array",
			"value": [
				{"type": "number", "value": 1.0, "metadata": host("float")},
				{"type": "number", "value": -2.5, "metadata": host("float")},
			],
			"metadata": host("complex"),
		})
	);
}

#[test]
fn strings_are_escaped_only_on_request() {
	let value = "a/b c".into_value();
	assert_eq!(render(&value, None, &EncodeOptions::default())["value"], "a/b c");
	assert_eq!(render(&value, None, &EncodeOptions::for_context_broker())["value"], "a%2Fb%20c");
}

#[test]
fn list_without_hint_has_no_metadata() {
	let out = render(&vec![1, 2].into_value(), None, &EncodeOptions::default());
	assert!(out.get("metadata").is_none(), "list metadata should be omitted: {out}");
	assert_eq!(out["value"][0]["metadata"], host("int"));
}

#[test]
fn tuple_hint_is_stamped_on_the_node_not_children() {
	let hint = TypeHint::name("int32[2]");
	let out = render(&(1, 2).into_value(), Some(&hint), &EncodeOptions::default());
	assert_eq!(out["metadata"]["hostType"]["value"], "tuple");
	assert_eq!(out["metadata"]["dataType"], json!({"type": "dataType", "value": "int32[2]"}));
	assert!(out["value"][0]["metadata"].get("dataType").is_none());
}

#[test]
fn map_threads_hint_by_key() {
	let mut map: indexmap::IndexMap<String, Value> = indexmap::IndexMap::new();
	map.insert("samples".to_string(), vec![1.0, 2.0].into_value());
	map.insert("label".to_string(), "x".into_value());
	let hint = TypeHint::fields([("samples", TypeHint::name("float32[]"))]);

	let out = render(&Value::Map(map), Some(&hint), &EncodeOptions::default());
	assert_eq!(out["type"], "object");
	assert!(out.get("metadata").is_none());
	assert_eq!(out["value"]["samples"]["metadata"]["dataType"]["value"], "float32[]");
	assert!(out["value"]["label"].get("metadata").is_none());
}

#[test]
fn composite_skips_private_fields_and_threads_hints() {
	let item = CompositeValue::dynamic("Pose")
		.with_field("position", vec![0.0, 1.0])
		.with_field("_cache", 9)
		.with_field("frame", "map");
	let hint = TypeHint::fields([("position", TypeHint::name("float64[]"))]);

	let out = render(&Value::Composite(item), Some(&hint), &EncodeOptions::default());
	assert_eq!(out["type"], "Pose");
	assert_eq!(out["metadata"], host("class"));
	assert!(out["value"].get("_cache").is_none());
	assert_eq!(out["value"]["position"]["metadata"]["dataType"]["value"], "float64[]");
	assert_eq!(out["value"]["frame"]["value"], "map");
}

#[test]
fn declared_byte_array_switches_to_base64_at_threshold() {
	let below: Vec<u8> = (0..255).map(|i| i as u8).collect();
	let at: Vec<u8> = (0..256).map(|i| i as u8).collect();
	let msg = MessageValue::new("Image", "sensor_msgs/Image")
		.with_field("small", "uint8[]", below.iter().map(|b| i64::from(*b)).collect::<Vec<_>>())
		.with_field("data", "uint8[]", at.iter().map(|b| i64::from(*b)).collect::<Vec<_>>());

	let out = render(&Value::Message(msg), None, &EncodeOptions::default());
	assert_eq!(out["type"], "sensor_msgs/Image");
	assert_eq!(out["value"]["small"]["type"], "array");
	assert_eq!(out["value"]["small"]["value"].as_array().map(Vec::len), Some(255));

	let data = &out["value"]["data"];
	assert_eq!(data["type"], "base64");
	let expected = crate::codec::escape::escape(&STANDARD.encode(&at)).into_owned();
	assert_eq!(data["value"], expected.as_str());
	assert_eq!(data["metadata"], json!({"dataType": {"type": "dataType", "value": "uint8[]"}}));
}

#[test]
fn signed_byte_array_packs_twos_complement() {
	let values: Vec<i64> = (0..256).map(|i| i - 128).collect();
	let msg = MessageValue::new("Raw", "pkg/Raw").with_field("data", "int8[]", values);
	let node = encode_value(&Value::Message(msg), None, &EncodeOptions::default()).expect("message encodes");
	let json = node.to_json().expect("node renders");
	let text = crate::codec::escape::unescape(json["value"]["data"]["value"].as_str().expect("base64 text")).into_owned();
	let bytes = STANDARD.decode(text).expect("valid base64");
	assert_eq!(bytes[0], 0x80);
	assert_eq!(bytes[255], 0x7f);
}

#[test]
fn out_of_range_byte_is_rejected() {
	let mut values = vec![0_i64; 300];
	values[10] = 300;
	let msg = MessageValue::new("Raw", "pkg/Raw").with_field("data", "uint8[]", values);
	let err = encode_value(&Value::Message(msg), None, &EncodeOptions::default()).expect_err("300 does not fit uint8");
	assert!(matches!(err, CodecError::ByteOutOfRange { value: 300, .. }));
}

#[test]
fn threshold_is_configurable() {
	let msg = MessageValue::new("Raw", "pkg/Raw").with_field("data", "uint8[]", Value::Bytes(vec![1, 2, 3, 4]));
	let opt = EncodeOptions {
		byte_array_threshold: 4,
		..EncodeOptions::default()
	};
	assert_eq!(render(&Value::Message(msg.clone()), None, &opt)["value"]["data"]["type"], "base64");
	assert_eq!(render(&Value::Message(msg), None, &EncodeOptions::default())["value"]["data"]["type"], "array");
}

#[test]
fn hinted_blob_in_message_is_unpacked_below_threshold() {
	let msg = MessageValue::new("Blob", "pkg/Blob").with_field("payload", "string", Value::Bytes(vec![7, 8]));
	let hint = TypeHint::fields([("payload", TypeHint::name("uint8[]"))]);
	let out = render(&Value::Message(msg), Some(&hint), &EncodeOptions::default());
	let payload = &out["value"]["payload"];
	assert_eq!(payload["type"], "array");
	assert_eq!(payload["value"][1]["value"], 8);
	assert_eq!(payload["metadata"]["dataType"]["value"], "uint8[]");
}

#[test]
fn message_kind_is_escaped_with_encode() {
	let msg = MessageValue::new("Header", "std_msgs/Header").with_field("frame_id", "string", "base/link");
	let out = render(&Value::Message(msg), None, &EncodeOptions::for_context_broker());
	assert_eq!(out["type"], "std_msgs%2FHeader");
	assert_eq!(out["value"]["frame_id"]["value"], "base%2Flink");
}

#[test]
fn ignoring_host_metadata_strips_it_everywhere() {
	let opt = EncodeOptions {
		ignore_host_metadata: true,
		..EncodeOptions::default()
	};
	let out = render(&(1, 2.5).into_value(), None, &opt);
	assert_eq!(out, json!({"type": "array", "value": [{"type": "number", "value": 1}, {"type": "number", "value": 2.5}]}));
}

#[test]
fn opaque_objects_are_unrepresentable() {
	let value = Value::List(vec![Value::Opaque { type_name: "Socket".to_owned() }]);
	let err = encode_value(&value, None, &EncodeOptions::default()).expect_err("opaque value fails");
	assert!(matches!(err, CodecError::Unrepresentable { ref type_name } if type_name == "Socket"));
}

#[test]
fn nesting_beyond_max_depth_fails() {
	let mut value = Value::Int(0);
	for _ in 0..10 {
		value = Value::List(vec![value]);
	}
	let opt = EncodeOptions {
		max_depth: 5,
		..EncodeOptions::default()
	};
	let err = encode_value(&value, None, &opt).expect_err("depth guard trips");
	assert!(matches!(err, CodecError::DepthExceeded { max_depth: 5 }));
}

#[test]
fn non_finite_floats_are_rejected() {
	let err = encode_value(&Value::Float(f64::INFINITY), None, &EncodeOptions::default()).expect_err("infinity has no json form");
	assert!(matches!(err, CodecError::NonFiniteFloat { value } if value == f64::INFINITY));

	let err = encode_value(&Value::Complex(Complex::new(0.0, f64::NAN)), None, &EncodeOptions::default()).expect_err("nan has no json form");
	assert!(matches!(err, CodecError::NonFiniteFloat { value } if value.is_nan()));
}

#[test]
fn signed_field_rejects_blob_bytes_above_127() {
	let mut blob = vec![0_u8; 256];
	blob[3] = 200;
	let msg = MessageValue::new("Raw", "pkg/Raw").with_field("data", "int8[]", Value::Bytes(blob));
	let err = encode_value(&Value::Message(msg), None, &EncodeOptions::default()).expect_err("200 does not fit int8");
	assert!(matches!(err, CodecError::ByteOutOfRange { value: 200, .. }));
}

#[test]
fn declared_byte_field_packs_string_blob() {
	let text = "x".repeat(256);
	let msg = MessageValue::new("Blob", "pkg/Blob").with_field("payload", "uint8[]", text.as_str());
	let out = render(&Value::Message(msg), None, &EncodeOptions::default());
	let payload = &out["value"]["payload"];
	assert_eq!(payload["type"], "base64");
	let expected = crate::codec::escape(&STANDARD.encode(text.as_bytes())).into_owned();
	assert_eq!(payload["value"], expected.as_str());

	let short = MessageValue::new("Blob", "pkg/Blob").with_field("payload", "uint8[]", "ab");
	let out = render(&Value::Message(short), None, &EncodeOptions::default());
	assert_eq!(out["value"]["payload"]["type"], "array");
	assert_eq!(out["value"]["payload"]["value"][0]["value"], 97);
}
