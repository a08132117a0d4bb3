use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::codec::carrier::{FieldCarrier, is_private};
use crate::codec::encode::{EncodeOptions, encode_field};
use crate::codec::escape::escape_if;
use crate::codec::hint::TypeHint;
use crate::codec::node::ValueNode;
use crate::codec::value::Value;
use crate::codec::{CodecError, Result};

/// Root of an encoded document: `{"id", "type", <attribute>: <node>, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
	/// Entity identifier; absent when identity output is disabled.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Entity kind; absent when identity output is disabled.
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	/// Encoded public fields of the source object.
	#[serde(flatten)]
	pub attributes: IndexMap<String, ValueNode>,
}

impl Entity {
	/// Render as a JSON tree.
	pub fn to_json(&self) -> Result<serde_json::Value> {
		Ok(serde_json::to_value(self)?)
	}
}

/// Encode a host object into an [`Entity`].
///
/// `hints` maps field names to concrete-type hints; each root attribute is
/// stamped with its own hint as `dataType` metadata.
pub fn encode_entity(root: &dyn FieldCarrier, hints: Option<&TypeHint>, opt: &EncodeOptions) -> Result<Entity> {
	let mut id = None;
	let mut kind = None;
	let mut attributes = IndexMap::new();

	for name in root.field_names() {
		let Some(value) = root.field(&name) else {
			continue;
		};
		if opt.show_id_value && name == "id" {
			id = Some(identity_text(&value, "id")?);
			continue;
		}
		if opt.show_id_value && name == "type" {
			kind = Some(identity_text(&value, "type")?);
			continue;
		}
		if is_private(&name) {
			continue;
		}

		let hint = hints.and_then(|hints| hints.get(&name));
		let mut node = encode_field(root, &name, &value, hint, opt, 1)?;
		if node.metadata.data_type.is_none() {
			node.metadata.data_type = hint.cloned();
		}
		attributes.insert(name, node);
	}

	let entity = if opt.show_id_value {
		let kind = kind.unwrap_or_else(|| root.type_name().to_owned());
		let id = id.unwrap_or_else(|| format!("{kind}{}", Uuid::new_v4()));
		Entity {
			id: Some(escape_if(&id, opt.encode)),
			kind: Some(escape_if(&kind, opt.encode)),
			attributes,
		}
	} else {
		Entity {
			id: None,
			kind: None,
			attributes,
		}
	};

	debug!(id = ?entity.id, kind = ?entity.kind, attributes = entity.attributes.len(), "encoded entity");
	Ok(entity)
}

/// Encode a host value that must be a map, composite, or message.
pub fn encode_entity_value(root: &Value, hints: Option<&TypeHint>, opt: &EncodeOptions) -> Result<Entity> {
	let carrier = root.as_carrier().ok_or(CodecError::NotACarrier { kind: root.kind().name() })?;
	encode_entity(carrier, hints, opt)
}

fn identity_text(value: &Value, field: &'static str) -> Result<String> {
	match value {
		Value::Str(text) => Ok(text.clone()),
		Value::Int(v) => Ok(v.to_string()),
		Value::Long(v) => Ok(v.to_string()),
		other => Err(CodecError::InvalidIdentity {
			field,
			kind: other.kind().name(),
		}),
	}
}
