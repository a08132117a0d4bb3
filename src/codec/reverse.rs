use std::str::FromStr;

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use tracing::{debug, trace};

use crate::codec::carrier::FieldCarrier;
use crate::codec::decode::{DecodeOptions, decode_node, json_kind};
use crate::codec::encode::DEFAULT_MAX_DEPTH;
use crate::codec::escape::unescape;
use crate::codec::value::Value;
use crate::codec::{CodecError, Result};

/// How decoded attributes are merged onto a destination carrier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttachPolicy {
	/// Set every attribute, adding fields the destination lacks.
	Inject,
	/// Overwrite existing fields only, requiring the runtime kind to match.
	#[default]
	Strict,
	/// Overwrite existing fields only, whatever their kind.
	Permissive,
}

/// Behavior switches for attaching a decoded document.
#[derive(Debug, Clone)]
pub struct AttachOptions {
	/// Merge rule for payload attributes.
	pub policy: AttachPolicy,
	/// Honor `hostType` metadata while decoding attributes.
	pub use_metadata: bool,
	/// Identity and top-level attribute nodes are already percent-decoded.
	pub already_decoded: bool,
	/// Maximum nesting depth of each attribute.
	pub max_depth: u32,
}

impl Default for AttachOptions {
	fn default() -> Self {
		Self {
			policy: AttachPolicy::default(),
			use_metadata: true,
			already_decoded: false,
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}
}

impl AttachOptions {
	/// Default options with a different merge rule.
	pub fn with_policy(policy: AttachPolicy) -> Self {
		Self { policy, ..Self::default() }
	}

	/// Options used for decoding each top-level attribute node.
	pub fn decode_options(&self) -> DecodeOptions {
		DecodeOptions {
			use_metadata: self.use_metadata,
			already_decoded: self.already_decoded,
			max_depth: self.max_depth,
		}
	}
}

/// Parsed incoming document, decoded on demand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReverseEntity {
	/// Entity identifier, as found on the wire.
	pub id: Option<String>,
	/// Entity kind, as found on the wire.
	pub kind: Option<String>,
	/// Tagged attribute nodes keyed by field name.
	pub payload: IndexMap<String, JsonValue>,
}

impl ReverseEntity {
	/// Split a parsed document into identity and tagged attributes.
	pub fn from_json(document: &JsonValue) -> Result<Self> {
		let fields = document.as_object().ok_or(CodecError::InvalidNode { found: json_kind(document) })?;
		let mut entity = Self::default();
		for (key, value) in fields {
			match key.as_str() {
				"id" => entity.id = Some(identity_text(value, "id")?),
				"type" => entity.kind = Some(identity_text(value, "type")?),
				_ => {
					entity.payload.insert(key.clone(), value.clone());
				}
			}
		}
		Ok(entity)
	}

	/// Decode every attribute without touching any destination.
	pub fn decode_payload(&self, opt: &DecodeOptions) -> Result<IndexMap<String, Value>> {
		let mut out = IndexMap::with_capacity(self.payload.len());
		for (name, node) in &self.payload {
			out.insert(name.clone(), decode_node(node, opt)?);
		}
		Ok(out)
	}

	/// Decode the document and merge it onto `dest`.
	///
	/// Identity is written through [`FieldCarrier::set_field`] whenever the
	/// document carries it. Attributes are decoded in document order and the
	/// first failure aborts the merge; fields written before it stay written.
	pub fn attach(&self, dest: &mut dyn FieldCarrier, opt: &AttachOptions) -> Result<()> {
		debug!(
			kind = self.kind.as_deref().unwrap_or_default(),
			attributes = self.payload.len(),
			policy = ?opt.policy,
			"attach entity"
		);

		if let Some(id) = &self.id {
			dest.set_field("id", Value::Str(decode_identity(id, opt.already_decoded)))?;
		}
		if let Some(kind) = &self.kind {
			dest.set_field("type", Value::Str(decode_identity(kind, opt.already_decoded)))?;
		}

		let decode_opt = opt.decode_options();
		for (name, node) in &self.payload {
			let value = decode_node(node, &decode_opt)?;
			match opt.policy {
				AttachPolicy::Inject => dest.set_field(name, value)?,
				AttachPolicy::Strict | AttachPolicy::Permissive => {
					let Some(existing) = dest.field(name) else {
						trace!(field = name.as_str(), "dropping attribute absent from destination");
						continue;
					};
					if opt.policy == AttachPolicy::Strict && existing.kind() != value.kind() {
						return Err(CodecError::TypeMismatch {
							field: name.clone(),
							expected: existing.kind().name(),
							found: value.kind().name(),
						});
					}
					dest.set_field(name, value)?;
				}
			}
		}
		Ok(())
	}
}

impl FromStr for ReverseEntity {
	type Err = CodecError;

	fn from_str(document: &str) -> Result<Self> {
		let document: JsonValue = serde_json::from_str(document)?;
		Self::from_json(&document)
	}
}

fn decode_identity(text: &str, already_decoded: bool) -> String {
	if already_decoded { text.to_owned() } else { unescape(text).into_owned() }
}

fn identity_text(value: &JsonValue, field: &'static str) -> Result<String> {
	match value {
		JsonValue::String(text) => Ok(text.clone()),
		JsonValue::Number(number) => Ok(number.to_string()),
		other => Err(CodecError::InvalidIdentity {
			field,
			kind: json_kind(other),
		}),
	}
}

#[cfg(test)]
mod tests {
	use indexmap::IndexMap;
	use serde_json::json;

	use super::{AttachOptions, AttachPolicy, ReverseEntity};
	use crate::codec::{CodecError, CompositeValue, Value};

	fn payload_with_float_x() -> ReverseEntity {
		ReverseEntity::from_json(&json!({
			"id": "Robot1",
			"type": "Robot",
			"x": {"type": "number", "value": 1.5, "metadata": {"hostType": {"type": "dataType", "value": "float"}}},
		}))
		.expect("document parses")
	}

	fn robot() -> CompositeValue {
		CompositeValue::dynamic("Robot").with_field("x", 1)
	}

	#[test]
	fn strict_rejects_kind_change() {
		let mut dest = robot();
		let err = payload_with_float_x().attach(&mut dest, &AttachOptions::default()).expect_err("kind differs");
		assert!(matches!(err, CodecError::TypeMismatch { expected: "int", found: "float", .. }));
	}

	#[test]
	fn permissive_overwrites_regardless_of_kind() {
		let mut dest = robot();
		payload_with_float_x()
			.attach(&mut dest, &AttachOptions::with_policy(AttachPolicy::Permissive))
			.expect("attach succeeds");
		assert_eq!(dest.field("x"), Some(&Value::Float(1.5)));
	}

	#[test]
	fn inject_adds_missing_fields() {
		let mut dest = CompositeValue::dynamic("Robot");
		payload_with_float_x()
			.attach(&mut dest, &AttachOptions::with_policy(AttachPolicy::Inject))
			.expect("attach succeeds");
		assert_eq!(dest.field("x"), Some(&Value::Float(1.5)));
		assert_eq!(dest.field("id"), Some(&Value::Str("Robot1".into())));
	}

	#[test]
	fn merge_policies_drop_absent_fields() {
		for policy in [AttachPolicy::Strict, AttachPolicy::Permissive] {
			let mut dest = CompositeValue::dynamic("Robot");
			payload_with_float_x().attach(&mut dest, &AttachOptions::with_policy(policy)).expect("attach succeeds");
			assert_eq!(dest.field("x"), None, "{policy:?}");
			assert_eq!(dest.field("type"), Some(&Value::Str("Robot".into())));
		}
	}

	#[test]
	fn identity_is_unescaped_unless_already_decoded() {
		let entity: ReverseEntity = r#"{"id": "urn%3Aa", "type": "Foo%2FBar"}"#.parse().expect("document parses");
		let mut dest: IndexMap<String, Value> = IndexMap::new();
		entity.attach(&mut dest, &AttachOptions::default()).expect("attach succeeds");
		assert_eq!(dest["type"], Value::Str("Foo/Bar".into()));
		assert_eq!(dest["id"], Value::Str("urn:a".into()));

		let opt = AttachOptions {
			already_decoded: true,
			..AttachOptions::default()
		};
		let mut dest: IndexMap<String, Value> = IndexMap::new();
		entity.attach(&mut dest, &opt).expect("attach succeeds");
		assert_eq!(dest["type"], Value::Str("Foo%2FBar".into()));
	}

	#[test]
	fn fixed_layout_rejects_undeclared_injection() {
		let mut dest = CompositeValue::fixed("Robot").with_field("id", "").with_field("type", "");
		let err = payload_with_float_x()
			.attach(&mut dest, &AttachOptions::with_policy(AttachPolicy::Inject))
			.expect_err("x is undeclared");
		assert!(matches!(err, CodecError::UndeclaredField { field, .. } if field == "x"));
	}

	#[test]
	fn decode_payload_leaves_destination_alone() {
		let entity = payload_with_float_x();
		let values = entity.decode_payload(&AttachOptions::default().decode_options()).expect("payload decodes");
		assert_eq!(values["x"], Value::Float(1.5));
		assert_eq!(entity.kind.as_deref(), Some("Robot"));
		assert_eq!(entity.id.as_deref(), Some("Robot1"));
	}

	#[test]
	fn non_object_document_is_rejected() {
		assert!(matches!(ReverseEntity::from_json(&json!([1])), Err(CodecError::InvalidNode { found: "array" })));
		assert!(matches!("not json".parse::<ReverseEntity>(), Err(CodecError::Json(_))));
		assert!(matches!(
			ReverseEntity::from_json(&json!({"id": [1]})),
			Err(CodecError::InvalidIdentity { field: "id", kind: "array" })
		));
	}
}
