use std::borrow::Cow;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;
use tracing::trace;

use crate::codec::carrier::{FieldCarrier, is_private};
use crate::codec::escape::{escape, escape_if};
use crate::codec::hint::TypeHint;
use crate::codec::node::{NodeValue, ValueNode};
use crate::codec::tag::{ByteArrayKind, HostType, TAG_ARRAY, TAG_BASE64, TAG_BOOLEAN, TAG_NONE, TAG_NUMBER, TAG_OBJECT, TAG_STRING};
use crate::codec::value::Value;
use crate::codec::{CodecError, Result};

/// Minimum element count at which declared byte arrays switch to base64.
pub const DEFAULT_BYTE_ARRAY_THRESHOLD: usize = 256;

/// Default recursion ceiling shared by encoder and decoder.
pub const DEFAULT_MAX_DEPTH: u32 = 64;

/// Behavior switches for object-to-tree encoding.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
	/// Suppress `hostType` round-trip metadata.
	pub ignore_host_metadata: bool,
	/// Emit entity `id`/`type`, taking them from the source when present.
	pub show_id_value: bool,
	/// Percent-encode identifiers, declared kinds, and string payloads.
	pub encode: bool,
	/// Element count at which declared byte arrays become base64.
	pub byte_array_threshold: usize,
	/// Maximum nesting depth.
	pub max_depth: u32,
}

impl Default for EncodeOptions {
	fn default() -> Self {
		Self {
			ignore_host_metadata: false,
			show_id_value: true,
			encode: false,
			byte_array_threshold: DEFAULT_BYTE_ARRAY_THRESHOLD,
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}
}

impl EncodeOptions {
	/// Preset for documents sent to a context broker, which forbids `/` and
	/// similar characters in ids, types, and values.
	pub fn for_context_broker() -> Self {
		Self {
			encode: true,
			..Self::default()
		}
	}
}

/// Encode one host value into a tagged node.
///
/// `hint` only stamps `dataType` metadata; it never changes the wire type.
pub fn encode_value(value: &Value, hint: Option<&TypeHint>, opt: &EncodeOptions) -> Result<ValueNode> {
	encode_impl(value, hint, opt, 0)
}

fn encode_impl(value: &Value, hint: Option<&TypeHint>, opt: &EncodeOptions, depth: u32) -> Result<ValueNode> {
	if depth >= opt.max_depth {
		return Err(CodecError::DepthExceeded { max_depth: opt.max_depth });
	}
	let ignore = opt.ignore_host_metadata;

	let node = match value {
		Value::Null => ValueNode::new(TAG_NONE, NodeValue::Null),
		Value::Bool(v) => ValueNode::new(TAG_BOOLEAN, NodeValue::Bool(*v)),
		Value::Int(v) => ValueNode::new(TAG_NUMBER, NodeValue::Int(*v)).with_host_type(HostType::Int, ignore),
		Value::Float(v) if !v.is_finite() => return Err(CodecError::NonFiniteFloat { value: *v }),
		Value::Float(v) => ValueNode::new(TAG_NUMBER, NodeValue::Float(*v)).with_host_type(HostType::Float, ignore),
		Value::Long(v) => ValueNode::new(TAG_NUMBER, NodeValue::Long(*v)).with_host_type(HostType::Long, ignore),
		Value::Complex(c) => {
			let parts = vec![
				encode_impl(&Value::Float(c.re), None, opt, depth + 1)?,
				encode_impl(&Value::Float(c.im), None, opt, depth + 1)?,
			];
			ValueNode::new(TAG_ARRAY, NodeValue::Array(parts)).with_host_type(HostType::Complex, ignore)
		}
		Value::Str(text) => ValueNode::new(TAG_STRING, NodeValue::Str(escape_if(text, opt.encode))),
		Value::Bytes(bytes) => {
			let mut items = Vec::with_capacity(bytes.len());
			for byte in bytes {
				items.push(encode_impl(&Value::Int(i64::from(*byte)), None, opt, depth + 1)?);
			}
			ValueNode::new(TAG_ARRAY, NodeValue::Array(items))
		}
		Value::Tuple(items) => {
			let mut node = encode_sequence(items, opt, depth)?.with_host_type(HostType::Tuple, ignore);
			node.metadata.data_type = hint.cloned();
			node
		}
		Value::List(items) => {
			let mut node = encode_sequence(items, opt, depth)?;
			node.metadata.data_type = hint.cloned();
			node
		}
		Value::Map(map) => {
			let mut out = IndexMap::with_capacity(map.len());
			for (key, item) in map {
				let child = encode_impl(item, hint.and_then(|hint| hint.get(key)), opt, depth + 1)?;
				out.insert(key.clone(), child);
			}
			ValueNode::new(TAG_OBJECT, NodeValue::Object(out))
		}
		Value::Composite(item) => {
			let fields = encode_fields(item, hint, opt, depth)?;
			ValueNode::new(item.type_name.clone(), NodeValue::Object(fields)).with_host_type(HostType::Class, ignore)
		}
		Value::Message(item) => {
			let fields = encode_fields(item, hint, opt, depth)?;
			ValueNode::new(escape_if(&item.wire_kind, opt.encode), NodeValue::Object(fields)).with_host_type(HostType::Class, ignore)
		}
		Value::Opaque { type_name } => {
			return Err(CodecError::Unrepresentable {
				type_name: type_name.clone(),
			});
		}
	};

	Ok(node)
}

fn encode_sequence(items: &[Value], opt: &EncodeOptions, depth: u32) -> Result<ValueNode> {
	let mut out = Vec::with_capacity(items.len());
	for item in items {
		out.push(encode_impl(item, None, opt, depth + 1)?);
	}
	Ok(ValueNode::new(TAG_ARRAY, NodeValue::Array(out)))
}

fn encode_fields(carrier: &dyn FieldCarrier, hint: Option<&TypeHint>, opt: &EncodeOptions, depth: u32) -> Result<IndexMap<String, ValueNode>> {
	let mut out = IndexMap::new();
	for name in carrier.field_names() {
		if is_private(&name) {
			continue;
		}
		let Some(value) = carrier.field(&name) else {
			continue;
		};
		let node = encode_field(carrier, &name, &value, hint.and_then(|hint| hint.get(&name)), opt, depth + 1)?;
		out.insert(name, node);
	}
	Ok(out)
}

/// Encode one field of a carrier at `depth`.
///
/// Fields of declared-schema carriers get the byte-array treatment: a
/// declared `int8[]`/`uint8[]` field at or above the threshold becomes a
/// `base64` node, and a blob hinted as `uint8[]` is unpacked or packed the
/// same way.
pub(crate) fn encode_field(
	carrier: &dyn FieldCarrier,
	name: &str,
	value: &Value,
	hint: Option<&TypeHint>,
	opt: &EncodeOptions,
	depth: u32,
) -> Result<ValueNode> {
	let Some(declared) = carrier.declared_type(name) else {
		return encode_impl(value, hint, opt, depth);
	};

	if let Some(kind) = ByteArrayKind::of(declared) {
		// Strings in byte-array fields are packed blobs, same as the hinted path.
		let value: Cow<'_, Value> = match value {
			Value::Str(text) => Cow::Owned(Value::Bytes(text.as_bytes().to_vec())),
			other => Cow::Borrowed(other),
		};
		if let Some(bytes) = pack_elements(name, declared, kind, &value, opt.byte_array_threshold)? {
			trace!(field = name, len = bytes.len(), declared, "declared byte array packed as base64");
			return Ok(base64_node(&bytes, TypeHint::name(declared)));
		}
		return encode_impl(&value, hint, opt, depth);
	}

	if let Some(hinted) = hint.and_then(TypeHint::as_name) {
		if ByteArrayKind::of(hinted) == Some(ByteArrayKind::Unsigned) {
			let blob = match value {
				Value::Bytes(bytes) => Some(bytes.clone()),
				Value::Str(text) => Some(text.as_bytes().to_vec()),
				_ => None,
			};
			if let Some(blob) = blob {
				if blob.len() >= opt.byte_array_threshold {
					trace!(field = name, len = blob.len(), hinted, "hinted byte blob packed as base64");
					return Ok(base64_node(&blob, TypeHint::name(hinted)));
				}
				let unpacked = Value::List(blob.into_iter().map(|byte| Value::Int(i64::from(byte))).collect());
				return encode_impl(&unpacked, hint, opt, depth);
			}
		}
	}

	encode_impl(value, hint, opt, depth)
}

/// Collect the raw bytes of a declared byte-array field long enough to pack.
///
/// Returns `None` when the field is below `threshold` or is not a sequence of
/// integers, in which case it is encoded as an ordinary array.
fn pack_elements(name: &str, declared: &str, kind: ByteArrayKind, value: &Value, threshold: usize) -> Result<Option<Vec<u8>>> {
	let items = match value {
		Value::Bytes(bytes) => {
			if bytes.len() < threshold {
				return Ok(None);
			}
			if let Some(byte) = bytes.iter().find(|byte| !kind.fits(i128::from(**byte))) {
				return Err(CodecError::ByteOutOfRange {
					field: name.to_owned(),
					declared_type: declared.to_owned(),
					value: i128::from(*byte),
				});
			}
			return Ok(Some(bytes.clone()));
		}
		Value::List(items) | Value::Tuple(items) => items,
		_ => return Ok(None),
	};
	if items.len() < threshold {
		return Ok(None);
	}

	let mut out = Vec::with_capacity(items.len());
	for item in items {
		let element = match item {
			Value::Int(v) => i128::from(*v),
			Value::Long(v) => *v,
			_ => return Ok(None),
		};
		if !kind.fits(element) {
			return Err(CodecError::ByteOutOfRange {
				field: name.to_owned(),
				declared_type: declared.to_owned(),
				value: element,
			});
		}
		out.push(match kind {
			ByteArrayKind::Signed => element as i8 as u8,
			ByteArrayKind::Unsigned => element as u8,
		});
	}
	Ok(Some(out))
}

fn base64_node(bytes: &[u8], data_type: TypeHint) -> ValueNode {
	let text = STANDARD.encode(bytes);
	let mut node = ValueNode::new(TAG_BASE64, NodeValue::Str(escape(&text).into_owned()));
	node.metadata.data_type = Some(data_type);
	node
}

#[cfg(test)]
mod tests;
