use indexmap::IndexMap;

use crate::codec::value::{CompositeValue, FieldLayout, MessageValue, Value};
use crate::codec::{CodecError, Result};

/// Field-name prefix marking private state that is never serialized.
pub const PRIVATE_PREFIX: char = '_';

/// Whether a field name is private to its host object.
pub fn is_private(name: &str) -> bool {
	name.starts_with(PRIVATE_PREFIX)
}

/// Uniform field access over maps, fixed-layout and dynamic objects.
///
/// Implement this for host types that should be encoded as entity roots or
/// receive decoded attributes. Names are reported in a stable order.
pub trait FieldCarrier {
	/// Host type name, used as the default entity kind.
	fn type_name(&self) -> &str;

	/// Ordered field names, private ones included.
	fn field_names(&self) -> Vec<String>;

	/// Current value of one field.
	fn field(&self, name: &str) -> Option<Value>;

	/// Overwrite or add one field.
	fn set_field(&mut self, name: &str, value: Value) -> Result<()>;

	/// Externally declared type of one field, for declared-schema objects.
	fn declared_type(&self, name: &str) -> Option<&str> {
		let _ = name;
		None
	}
}

impl FieldCarrier for IndexMap<String, Value> {
	fn type_name(&self) -> &str {
		"Map"
	}

	fn field_names(&self) -> Vec<String> {
		self.keys().cloned().collect()
	}

	fn field(&self, name: &str) -> Option<Value> {
		self.get(name).cloned()
	}

	fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
		self.insert(name.to_owned(), value);
		Ok(())
	}
}

impl FieldCarrier for CompositeValue {
	fn type_name(&self) -> &str {
		&self.type_name
	}

	fn field_names(&self) -> Vec<String> {
		self.fields.iter().map(|field| field.name.clone()).collect()
	}

	fn field(&self, name: &str) -> Option<Value> {
		CompositeValue::field(self, name).cloned()
	}

	fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
		if let Some(slot) = self.field_mut(name) {
			*slot = value;
			return Ok(());
		}
		match self.layout {
			FieldLayout::Dynamic => {
				self.fields.push(crate::codec::FieldValue {
					name: name.to_owned(),
					value,
				});
				Ok(())
			}
			FieldLayout::Fixed => Err(CodecError::UndeclaredField {
				type_name: self.type_name.clone(),
				field: name.to_owned(),
			}),
		}
	}
}

impl FieldCarrier for MessageValue {
	fn type_name(&self) -> &str {
		&self.type_name
	}

	fn field_names(&self) -> Vec<String> {
		self.fields.iter().map(|field| field.name.clone()).collect()
	}

	fn field(&self, name: &str) -> Option<Value> {
		MessageValue::field(self, name).cloned()
	}

	fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
		let Some(slot) = self.field_mut(name) else {
			return Err(CodecError::UndeclaredField {
				type_name: self.type_name.clone(),
				field: name.to_owned(),
			});
		};
		*slot = value;
		Ok(())
	}

	fn declared_type(&self, name: &str) -> Option<&str> {
		self.fields.iter().find(|field| field.name == name).map(|field| field.declared_type.as_str())
	}
}

impl Value {
	/// View a map, composite, or message as a field carrier.
	pub fn as_carrier(&self) -> Option<&dyn FieldCarrier> {
		match self {
			Value::Map(map) => Some(map),
			Value::Composite(item) => Some(item),
			Value::Message(item) => Some(item),
			_ => None,
		}
	}

	/// Mutable counterpart of [`Value::as_carrier`].
	pub fn as_carrier_mut(&mut self) -> Option<&mut dyn FieldCarrier> {
		match self {
			Value::Map(map) => Some(map),
			Value::Composite(item) => Some(item),
			Value::Message(item) => Some(item),
			_ => None,
		}
	}
}
