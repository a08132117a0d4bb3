use indexmap::IndexMap;
use serde::Serialize;

use crate::codec::Result;
use crate::codec::tag::{HostType, Metadata};

/// One tagged node of the encoded tree: `{"type", "value", "metadata"?}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueNode {
	/// Wire tag, e.g. `number`, `array`, `base64`, or a class name.
	#[serde(rename = "type")]
	pub wire_type: String,
	/// Encoded payload.
	pub value: NodeValue,
	/// Round-trip annotations; omitted from output when empty.
	#[serde(skip_serializing_if = "Metadata::is_empty")]
	pub metadata: Metadata,
}

/// Payload of a [`ValueNode`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NodeValue {
	/// JSON null.
	Null,
	/// JSON boolean.
	Bool(bool),
	/// Integer within `i64`.
	Int(i64),
	/// Integer beyond `i64`.
	Long(i128),
	/// Floating point number.
	Float(f64),
	/// JSON string.
	Str(String),
	/// Tagged child nodes in order.
	Array(Vec<ValueNode>),
	/// Tagged child nodes by key.
	Object(IndexMap<String, ValueNode>),
}

impl ValueNode {
	/// Node without metadata.
	pub fn new(wire_type: impl Into<String>, value: NodeValue) -> Self {
		Self {
			wire_type: wire_type.into(),
			value,
			metadata: Metadata::default(),
		}
	}

	/// Record the exact host type unless `ignore` is set.
	pub(crate) fn with_host_type(mut self, host: HostType, ignore: bool) -> Self {
		if !ignore {
			self.metadata.host_type = Some(host);
		}
		self
	}

	/// Render as a JSON tree.
	pub fn to_json(&self) -> Result<serde_json::Value> {
		Ok(serde_json::to_value(self)?)
	}
}
