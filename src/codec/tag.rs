//! Wire-tag vocabulary and the metadata sidecar schema shared by both directions.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value as JsonValue};

use crate::codec::hint::TypeHint;

/// Metadata key recording the exact source type.
pub const HOST_TYPE_KEY: &str = "hostType";
/// Host-type key written by the Python converter; accepted on decode only.
pub const LEGACY_HOST_TYPE_KEY: &str = "python";
/// Metadata key recording a caller-supplied concrete type hint.
pub const DATA_TYPE_KEY: &str = "dataType";
/// `type` member of every metadata entry.
pub const METADATA_ENTRY_TYPE: &str = "dataType";

/// Wire tag for null pass-through nodes.
pub const TAG_NONE: &str = "";
/// Wire tag for booleans.
pub const TAG_BOOLEAN: &str = "boolean";
/// Wire tag for all real numbers.
pub const TAG_NUMBER: &str = "number";
/// Wire tag for strings.
pub const TAG_STRING: &str = "string";
/// Wire tag for sequences and complex numbers.
pub const TAG_ARRAY: &str = "array";
/// Wire tag for string-keyed mappings.
pub const TAG_OBJECT: &str = "object";
/// Wire tag for large byte arrays.
pub const TAG_BASE64: &str = "base64";

const BOOLEAN_TAGS: &[&str] = &["bool", "boolean"];
const NUMBER_TAGS: &[&str] = &["number", "integer", "int", "float", "double", "long"];
const TEXT_TAGS: &[&str] = &["string", "text"];
const ARRAY_TAGS: &[&str] = &["array", "list", "tuple", "vector"];
const OBJECT_TAGS: &[&str] = &["object", "obj"];

/// Decode-side category of a wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireCategory {
	/// Empty tag: value passes through untouched.
	PassThrough,
	/// Boolean synonyms.
	Boolean,
	/// Numeric synonyms.
	Number,
	/// String synonyms.
	Text,
	/// Sequence synonyms.
	Array,
	/// Mapping synonyms.
	Object,
	/// Base64-packed byte array.
	Base64,
	/// Any other tag, treated as a declared composite type.
	Other,
}

impl WireCategory {
	/// Classify a wire tag; comparison ignores ASCII case.
	pub fn classify(tag: &str) -> Self {
		if tag.is_empty() {
			return Self::PassThrough;
		}
		let lower = tag.to_ascii_lowercase();
		let tag = lower.as_str();
		if BOOLEAN_TAGS.contains(&tag) {
			Self::Boolean
		} else if NUMBER_TAGS.contains(&tag) {
			Self::Number
		} else if TEXT_TAGS.contains(&tag) {
			Self::Text
		} else if ARRAY_TAGS.contains(&tag) {
			Self::Array
		} else if OBJECT_TAGS.contains(&tag) {
			Self::Object
		} else if tag == TAG_BASE64 {
			Self::Base64
		} else {
			Self::Other
		}
	}
}

/// Exact source type recorded under [`HOST_TYPE_KEY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostType {
	/// Fixed-width integer.
	Int,
	/// Wide integer.
	Long,
	/// Floating point.
	Float,
	/// Complex number.
	Complex,
	/// Wide string flavor.
	Unicode,
	/// Fixed-arity sequence.
	Tuple,
	/// Composite object.
	Class,
}

impl HostType {
	/// Canonical tag text.
	pub fn name(self) -> &'static str {
		match self {
			Self::Int => "int",
			Self::Long => "long",
			Self::Float => "float",
			Self::Complex => "complex",
			Self::Unicode => "unicode",
			Self::Tuple => "tuple",
			Self::Class => "class",
		}
	}

	/// Parse canonical tag text.
	pub fn parse(name: &str) -> Option<Self> {
		Some(match name {
			"int" => Self::Int,
			"long" => Self::Long,
			"float" => Self::Float,
			"complex" => Self::Complex,
			"unicode" => Self::Unicode,
			"tuple" => Self::Tuple,
			"class" => Self::Class,
			_ => return None,
		})
	}
}

/// Signedness of a declared byte-array field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteArrayKind {
	/// `int8[...]` elements.
	Signed,
	/// `uint8[...]` elements.
	Unsigned,
}

impl ByteArrayKind {
	/// Classify a declared field type such as `int8[]` or `uint8[64]`.
	pub fn of(declared_type: &str) -> Option<Self> {
		let declared = declared_type.trim();
		if declared.starts_with("int8[") {
			Some(Self::Signed)
		} else if declared.starts_with("uint8[") {
			Some(Self::Unsigned)
		} else {
			None
		}
	}

	/// Whether `value` fits one element of this kind.
	pub fn fits(self, value: i128) -> bool {
		match self {
			Self::Signed => (-128..=127).contains(&value),
			Self::Unsigned => (0..=255).contains(&value),
		}
	}
}

/// Optional annotations attached to a [`ValueNode`](crate::codec::ValueNode).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
	/// Exact source type, when it is ambiguous on the wire.
	pub host_type: Option<HostType>,
	/// Concrete type hint for a downstream schema.
	pub data_type: Option<TypeHint>,
}

impl Metadata {
	/// Whether no annotation is present.
	pub fn is_empty(&self) -> bool {
		self.host_type.is_none() && self.data_type.is_none()
	}
}

struct Entry<'a, T: Serialize>(&'a T);

impl<T: Serialize> Serialize for Entry<'_, T> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(2))?;
		map.serialize_entry("type", METADATA_ENTRY_TYPE)?;
		map.serialize_entry("value", self.0)?;
		map.end()
	}
}

impl Serialize for Metadata {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let len = usize::from(self.host_type.is_some()) + usize::from(self.data_type.is_some());
		let mut map = serializer.serialize_map(Some(len))?;
		if let Some(host) = self.host_type {
			map.serialize_entry(HOST_TYPE_KEY, &Entry(&host.name()))?;
		}
		if let Some(hint) = &self.data_type {
			map.serialize_entry(DATA_TYPE_KEY, &Entry(hint))?;
		}
		map.end()
	}
}

/// Host-type tag text of an incoming `metadata` object, if any.
///
/// Accepts both `{"type": "dataType", "value": "<tag>"}` entries and bare strings.
pub fn host_type_of(metadata: &Map<String, JsonValue>) -> Option<&str> {
	let entry = metadata.get(HOST_TYPE_KEY).or_else(|| metadata.get(LEGACY_HOST_TYPE_KEY))?;
	match entry {
		JsonValue::String(text) => Some(text),
		JsonValue::Object(fields) => fields.get("value").and_then(JsonValue::as_str),
		_ => None,
	}
}

/// Value of the `dataType` entry of an incoming `metadata` object, if any.
pub fn data_type_of(metadata: &Map<String, JsonValue>) -> Option<&JsonValue> {
	metadata.get(DATA_TYPE_KEY)?.get("value")
}
