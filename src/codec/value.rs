use indexmap::IndexMap;

use crate::codec::convert::IntoValue;

/// Complex number stored as a `(real, imag)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
	/// Real part.
	pub re: f64,
	/// Imaginary part.
	pub im: f64,
}

impl Complex {
	/// Build a complex number from its parts.
	pub const fn new(re: f64, im: f64) -> Self {
		Self { re, im }
	}
}

/// Host value fed to the encoder and produced by the decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Explicit null marker.
	Null,
	/// Boolean scalar.
	Bool(bool),
	/// Fixed-width integer.
	Int(i64),
	/// Wide integer.
	Long(i128),
	/// Floating point scalar.
	Float(f64),
	/// Complex number.
	Complex(Complex),
	/// UTF-8 string.
	Str(String),
	/// Unsigned-byte-packed blob.
	Bytes(Vec<u8>),
	/// Fixed-arity ordered sequence.
	Tuple(Vec<Value>),
	/// Variable-length ordered sequence.
	List(Vec<Value>),
	/// String-keyed mapping in insertion order.
	Map(IndexMap<String, Value>),
	/// Plain object with a fixed or dynamic field set.
	Composite(CompositeValue),
	/// Object carrying an externally declared schema.
	Message(MessageValue),
	/// Object exposing no fields at all.
	Opaque {
		/// Host type name of the object.
		type_name: String,
	},
}

/// Runtime kind of a [`Value`], used for strict type checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
	/// [`Value::Null`].
	Null,
	/// [`Value::Bool`].
	Bool,
	/// [`Value::Int`].
	Int,
	/// [`Value::Long`].
	Long,
	/// [`Value::Float`].
	Float,
	/// [`Value::Complex`].
	Complex,
	/// [`Value::Str`].
	Str,
	/// [`Value::Bytes`].
	Bytes,
	/// [`Value::Tuple`].
	Tuple,
	/// [`Value::List`].
	List,
	/// [`Value::Map`].
	Map,
	/// [`Value::Composite`].
	Composite,
	/// [`Value::Message`].
	Message,
	/// [`Value::Opaque`].
	Opaque,
}

impl ValueKind {
	/// Stable lowercase label.
	pub fn name(self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool => "bool",
			Self::Int => "int",
			Self::Long => "long",
			Self::Float => "float",
			Self::Complex => "complex",
			Self::Str => "str",
			Self::Bytes => "bytes",
			Self::Tuple => "tuple",
			Self::List => "list",
			Self::Map => "map",
			Self::Composite => "composite",
			Self::Message => "message",
			Self::Opaque => "opaque",
		}
	}
}

impl Value {
	/// Runtime kind of this value.
	pub fn kind(&self) -> ValueKind {
		match self {
			Value::Null => ValueKind::Null,
			Value::Bool(_) => ValueKind::Bool,
			Value::Int(_) => ValueKind::Int,
			Value::Long(_) => ValueKind::Long,
			Value::Float(_) => ValueKind::Float,
			Value::Complex(_) => ValueKind::Complex,
			Value::Str(_) => ValueKind::Str,
			Value::Bytes(_) => ValueKind::Bytes,
			Value::Tuple(_) => ValueKind::Tuple,
			Value::List(_) => ValueKind::List,
			Value::Map(_) => ValueKind::Map,
			Value::Composite(_) => ValueKind::Composite,
			Value::Message(_) => ValueKind::Message,
			Value::Opaque { .. } => ValueKind::Opaque,
		}
	}

	/// Borrow string payload.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(text) => Some(text),
			_ => None,
		}
	}

	/// Integer payload when it fits in `i64`.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Value::Int(value) => Some(*value),
			Value::Long(value) => i64::try_from(*value).ok(),
			_ => None,
		}
	}

	/// Any real numeric payload widened to `f64`.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Int(value) => Some(*value as f64),
			Value::Long(value) => Some(*value as f64),
			Value::Float(value) => Some(*value),
			_ => None,
		}
	}

	/// Borrow sequence elements of a tuple or list.
	pub fn as_slice(&self) -> Option<&[Value]> {
		match self {
			Value::Tuple(items) | Value::List(items) => Some(items),
			_ => None,
		}
	}

	/// Whether this is [`Value::Null`].
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}
}

/// Whether an object declares its field list up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLayout {
	/// Field names are declared once and cannot grow.
	Fixed,
	/// Fields may be added at runtime.
	Dynamic,
}

/// Plain composite object with field names preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeValue {
	/// Host type name.
	pub type_name: String,
	/// Field-set flavor.
	pub layout: FieldLayout,
	/// Field values in declaration order.
	pub fields: Vec<FieldValue>,
}

/// Named field value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
	/// Field identifier.
	pub name: String,
	/// Field payload.
	pub value: Value,
}

impl CompositeValue {
	/// Empty object whose field list is fixed.
	pub fn fixed(type_name: impl Into<String>) -> Self {
		Self {
			type_name: type_name.into(),
			layout: FieldLayout::Fixed,
			fields: Vec::new(),
		}
	}

	/// Empty object whose field set may grow.
	pub fn dynamic(type_name: impl Into<String>) -> Self {
		Self {
			type_name: type_name.into(),
			layout: FieldLayout::Dynamic,
			fields: Vec::new(),
		}
	}

	/// Append a field; used to declare the shape of fixed objects too.
	pub fn with_field(mut self, name: impl Into<String>, value: impl IntoValue) -> Self {
		self.fields.push(FieldValue {
			name: name.into(),
			value: value.into_value(),
		});
		self
	}

	/// Look up one field by name.
	pub fn field(&self, name: &str) -> Option<&Value> {
		self.fields.iter().find(|field| field.name == name).map(|field| &field.value)
	}

	/// Mutable lookup of one field by name.
	pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
		self.fields.iter_mut().find(|field| field.name == name).map(|field| &mut field.value)
	}
}

/// Object whose fields carry externally declared types, e.g. a robotics message.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageValue {
	/// Host type name.
	pub type_name: String,
	/// Declared wire kind, e.g. `sensor_msgs/Image`.
	pub wire_kind: String,
	/// Declared fields in declaration order.
	pub fields: Vec<DeclaredField>,
}

/// Field of a [`MessageValue`] with its declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredField {
	/// Field identifier.
	pub name: String,
	/// Declared type string, e.g. `uint8[]` or `float64`.
	pub declared_type: String,
	/// Field payload.
	pub value: Value,
}

impl MessageValue {
	/// Empty message of the given host type and wire kind.
	pub fn new(type_name: impl Into<String>, wire_kind: impl Into<String>) -> Self {
		Self {
			type_name: type_name.into(),
			wire_kind: wire_kind.into(),
			fields: Vec::new(),
		}
	}

	/// Append a declared field.
	pub fn with_field(mut self, name: impl Into<String>, declared_type: impl Into<String>, value: impl IntoValue) -> Self {
		self.fields.push(DeclaredField {
			name: name.into(),
			declared_type: declared_type.into(),
			value: value.into_value(),
		});
		self
	}

	/// Look up one field by name.
	pub fn field(&self, name: &str) -> Option<&Value> {
		self.fields.iter().find(|field| field.name == name).map(|field| &field.value)
	}

	/// Mutable lookup of one field by name.
	pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
		self.fields.iter_mut().find(|field| field.name == name).map(|field| &mut field.value)
	}
}
