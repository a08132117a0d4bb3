use std::borrow::Cow;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

use crate::codec::encode::DEFAULT_MAX_DEPTH;
use crate::codec::escape::unescape;
use crate::codec::tag::{ByteArrayKind, WireCategory, data_type_of, host_type_of};
use crate::codec::value::{Complex, CompositeValue, FieldLayout, FieldValue, Value};
use crate::codec::{CodecError, Result};

/// Behavior switches for tree-to-value decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Honor `hostType` metadata when picking among ambiguous representations.
	pub use_metadata: bool,
	/// The top-level node is already percent-decoded.
	///
	/// Applies to the top-level tag and string only. Nested nodes are always
	/// percent-decoded, so documents encoded without `encode` must not carry
	/// literal `%XX` sequences in nested strings.
	pub already_decoded: bool,
	/// Maximum nesting depth.
	pub max_depth: u32,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			use_metadata: true,
			already_decoded: false,
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}
}

impl DecodeOptions {
	/// Ignore all round-trip metadata and fall back to JSON-native shapes.
	pub fn lossy() -> Self {
		Self {
			use_metadata: false,
			..Self::default()
		}
	}
}

/// Representation a decoded value can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
	Float,
	Int,
	Long,
	Complex,
	Tuple,
	List,
	Class,
	Map,
}

impl Shape {
	fn name(self) -> &'static str {
		match self {
			Self::Float => "float",
			Self::Int => "int",
			Self::Long => "long",
			Self::Complex => "complex",
			Self::Tuple => "tuple",
			Self::List => "list",
			Self::Class => "class",
			Self::Map => "map",
		}
	}
}

/// 2^127; integral floats below it in magnitude convert to i128 exactly.
const I128_BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

const INTEGRAL_SHAPES: &[Shape] = &[Shape::Float, Shape::Int, Shape::Long];
const SEQUENCE_SHAPES: &[Shape] = &[Shape::Complex, Shape::Tuple, Shape::List];
const COMPOSITE_SHAPES: &[Shape] = &[Shape::Class, Shape::Map];

/// Metadata-guided type resolution.
///
/// Picks the candidate named by the host-type tag; anything else, including a
/// missing or disabled tag, resolves to the last candidate.
fn resolve(candidates: &[Shape], host: Option<&str>) -> Option<Shape> {
	host.and_then(|name| candidates.iter().copied().find(|shape| shape.name() == name))
		.or_else(|| candidates.last().copied())
}

/// Decode one tagged node into a host value.
pub fn decode_node(node: &JsonValue, opt: &DecodeOptions) -> Result<Value> {
	decode_impl(node, opt.use_metadata, opt.already_decoded, opt, 0)
}

fn decode_impl(node: &JsonValue, use_metadata: bool, already_decoded: bool, opt: &DecodeOptions, depth: u32) -> Result<Value> {
	if depth >= opt.max_depth {
		return Err(CodecError::DepthExceeded { max_depth: opt.max_depth });
	}

	let object = node.as_object().ok_or(CodecError::InvalidNode { found: json_kind(node) })?;
	let tag = object.get("type").ok_or(CodecError::MissingField { field: "type" })?;
	let raw = object.get("value").ok_or(CodecError::MissingField { field: "value" })?;
	let tag = tag.as_str().ok_or_else(|| CodecError::UnknownType { tag: tag.to_string() })?;
	let metadata = object.get("metadata").and_then(JsonValue::as_object);
	let host = if use_metadata { metadata.and_then(host_type_of) } else { None };
	let tag: Cow<'_, str> = if already_decoded { Cow::Borrowed(tag) } else { unescape(tag) };

	match WireCategory::classify(&tag) {
		WireCategory::PassThrough => plain_json(raw, opt, depth),
		WireCategory::Boolean => Ok(Value::Bool(coerce_bool(raw))),
		WireCategory::Number => decode_number(raw, host),
		WireCategory::Text => {
			let text = match raw {
				JsonValue::String(text) => text.clone(),
				other => other.to_string(),
			};
			// `str` and `unicode` share one host representation.
			Ok(Value::Str(if already_decoded { text } else { unescape(&text).into_owned() }))
		}
		WireCategory::Array => {
			let items = raw.as_array().ok_or_else(|| shape_error(&tag, "array", raw))?;
			let mut values = Vec::with_capacity(items.len());
			for item in items {
				values.push(decode_impl(item, opt.use_metadata, false, opt, depth + 1)?);
			}
			match resolve(SEQUENCE_SHAPES, host) {
				Some(Shape::Complex) => complex_from(&values),
				Some(Shape::Tuple) => Ok(Value::Tuple(values)),
				_ => Ok(Value::List(values)),
			}
		}
		WireCategory::Object => {
			let fields = raw.as_object().ok_or_else(|| shape_error(&tag, "object", raw))?;
			Ok(Value::Map(decode_fields(fields, opt, depth)?))
		}
		WireCategory::Base64 => decode_base64(&tag, raw, metadata),
		WireCategory::Other => {
			let fields = raw.as_object().ok_or_else(|| CodecError::UnknownType { tag: tag.clone().into_owned() })?;
			let fields = decode_fields(fields, opt, depth)?;
			match resolve(COMPOSITE_SHAPES, host) {
				Some(Shape::Class) => Ok(Value::Composite(CompositeValue {
					type_name: tag.into_owned(),
					layout: FieldLayout::Dynamic,
					fields: fields.into_iter().map(|(name, value)| FieldValue { name, value }).collect(),
				})),
				_ => Ok(Value::Map(fields)),
			}
		}
	}
}

fn decode_fields(fields: &Map<String, JsonValue>, opt: &DecodeOptions, depth: u32) -> Result<IndexMap<String, Value>> {
	let mut out = IndexMap::with_capacity(fields.len());
	for (key, item) in fields {
		out.insert(key.clone(), decode_impl(item, opt.use_metadata, false, opt, depth + 1)?);
	}
	Ok(out)
}

/// Strings are false only for `false`, `f`, and `0` (any case).
fn coerce_bool(raw: &JsonValue) -> bool {
	match raw {
		JsonValue::String(text) => !matches!(text.to_ascii_lowercase().as_str(), "false" | "f" | "0"),
		JsonValue::Bool(value) => *value,
		JsonValue::Null => false,
		JsonValue::Number(number) => number.as_f64().is_some_and(|value| value != 0.0),
		JsonValue::Array(items) => !items.is_empty(),
		JsonValue::Object(fields) => !fields.is_empty(),
	}
}

fn decode_number(raw: &JsonValue, host: Option<&str>) -> Result<Value> {
	let float = match raw {
		JsonValue::Number(number) => number.as_f64(),
		JsonValue::String(text) => text.trim().parse::<f64>().ok(),
		_ => None,
	}
	.ok_or_else(|| CodecError::InvalidNumber { found: raw.to_string() })?;

	if float.fract() != 0.0 {
		return Ok(Value::Float(float));
	}

	let shape = resolve(INTEGRAL_SHAPES, host);
	if shape == Some(Shape::Float) {
		return Ok(Value::Float(float));
	}

	let integer = match exact_integer(raw) {
		Some(value) => value,
		None if (-I128_BOUND..I128_BOUND).contains(&float) => float as i128,
		None => return Err(CodecError::InvalidNumber { found: raw.to_string() }),
	};
	// `int` values beyond i64 widen instead of saturating.
	Ok(match (shape, i64::try_from(integer)) {
		(Some(Shape::Int), Ok(value)) => Value::Int(value),
		_ => Value::Long(integer),
	})
}

/// Integer spelled exactly on the wire, without a float round-trip.
fn exact_integer(raw: &JsonValue) -> Option<i128> {
	match raw {
		JsonValue::Number(number) => number
			.as_i64()
			.map(i128::from)
			.or_else(|| number.as_u64().map(i128::from))
			.or_else(|| number.to_string().parse().ok()),
		JsonValue::String(text) => text.trim().parse().ok(),
		_ => None,
	}
}

fn complex_from(values: &[Value]) -> Result<Value> {
	match values {
		[re, im] => match (re.as_f64(), im.as_f64()) {
			(Some(re), Some(im)) => Ok(Value::Complex(Complex::new(re, im))),
			_ => Err(CodecError::MalformedComplex { len: values.len() }),
		},
		_ => Err(CodecError::MalformedComplex { len: values.len() }),
	}
}

fn decode_base64(tag: &str, raw: &JsonValue, metadata: Option<&Map<String, JsonValue>>) -> Result<Value> {
	let text = raw.as_str().ok_or_else(|| shape_error(tag, "string", raw))?;
	let declared = metadata.and_then(data_type_of).ok_or(CodecError::MissingField { field: "metadata.dataType" })?;
	let bytes = STANDARD.decode(unescape(text).as_bytes())?;

	let signed = declared.as_str().and_then(ByteArrayKind::of) == Some(ByteArrayKind::Signed);
	let values = if signed {
		bytes.into_iter().map(|byte| Value::Int(i64::from(byte as i8))).collect()
	} else {
		bytes.into_iter().map(|byte| Value::Int(i64::from(byte))).collect()
	};
	Ok(Value::List(values))
}

/// Untagged JSON converted as-is for pass-through nodes.
fn plain_json(raw: &JsonValue, opt: &DecodeOptions, depth: u32) -> Result<Value> {
	if depth >= opt.max_depth {
		return Err(CodecError::DepthExceeded { max_depth: opt.max_depth });
	}
	Ok(match raw {
		JsonValue::Null => Value::Null,
		JsonValue::Bool(value) => Value::Bool(*value),
		JsonValue::Number(number) => match number.as_i64() {
			Some(value) => Value::Int(value),
			None => match exact_integer(raw) {
				Some(value) => Value::Long(value),
				None => Value::Float(number.as_f64().unwrap_or(f64::NAN)),
			},
		},
		JsonValue::String(text) => Value::Str(text.clone()),
		JsonValue::Array(items) => {
			let mut out = Vec::with_capacity(items.len());
			for item in items {
				out.push(plain_json(item, opt, depth + 1)?);
			}
			Value::List(out)
		}
		JsonValue::Object(fields) => {
			let mut out = IndexMap::with_capacity(fields.len());
			for (key, item) in fields {
				out.insert(key.clone(), plain_json(item, opt, depth + 1)?);
			}
			Value::Map(out)
		}
	})
}

fn shape_error(tag: &str, expected: &'static str, raw: &JsonValue) -> CodecError {
	CodecError::ValueShape {
		tag: tag.to_owned(),
		expected,
		found: json_kind(raw),
	}
}

pub(crate) fn json_kind(value: &JsonValue) -> &'static str {
	match value {
		JsonValue::Null => "null",
		JsonValue::Bool(_) => "boolean",
		JsonValue::Number(_) => "number",
		JsonValue::String(_) => "string",
		JsonValue::Array(_) => "array",
		JsonValue::Object(_) => "object",
	}
}
