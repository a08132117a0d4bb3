use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Concrete-type hint stamped into `dataType` metadata.
///
/// Mirrors the field structure of the encoded object: a leaf names a type in
/// the downstream schema, a mapping holds per-field sub-hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeHint {
	/// Concrete type name, e.g. `int32` or `uint8[]`.
	Name(String),
	/// Per-field hints keyed by field name.
	Fields(IndexMap<String, TypeHint>),
}

impl TypeHint {
	/// Leaf hint.
	pub fn name(name: impl Into<String>) -> Self {
		Self::Name(name.into())
	}

	/// Mapping hint built from `(field, hint)` pairs.
	pub fn fields<K: Into<String>>(entries: impl IntoIterator<Item = (K, TypeHint)>) -> Self {
		Self::Fields(entries.into_iter().map(|(key, hint)| (key.into(), hint)).collect())
	}

	/// Sub-hint for one field; leaf hints have none.
	pub fn get(&self, field: &str) -> Option<&TypeHint> {
		match self {
			Self::Fields(fields) => fields.get(field),
			Self::Name(_) => None,
		}
	}

	/// Leaf type name.
	pub fn as_name(&self) -> Option<&str> {
		match self {
			Self::Name(name) => Some(name),
			Self::Fields(_) => None,
		}
	}
}
