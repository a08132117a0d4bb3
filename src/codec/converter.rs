//! Whole-document helpers pairing the encoder with JSON text, and JSON text with attachment.

use serde::Serialize;
use serde_json::Value as JsonValue;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::codec::Result;
use crate::codec::carrier::FieldCarrier;
use crate::codec::encode::EncodeOptions;
use crate::codec::entity::encode_entity;
use crate::codec::hint::TypeHint;
use crate::codec::reverse::{AttachOptions, ReverseEntity};

/// Encode `root` as an entity document.
///
/// `indent` is the number of spaces per nesting level; `0` yields compact text.
/// Decoders percent-decode every nested string, so text meant to be read back
/// should be produced with [`EncodeOptions::encode`] set when strings may
/// contain `%`.
pub fn obj_to_fiware(root: &dyn FieldCarrier, hints: Option<&TypeHint>, opt: &EncodeOptions, indent: usize) -> Result<String> {
	let entity = encode_entity(root, hints, opt)?;
	if indent == 0 {
		return Ok(serde_json::to_string(&entity)?);
	}

	let pad = vec![b' '; indent];
	let mut buf = Vec::new();
	let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&pad));
	entity.serialize(&mut serializer)?;
	Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Parse an entity document and attach it onto `dest`.
pub fn fiware_to_obj(document: &str, dest: &mut dyn FieldCarrier, opt: &AttachOptions) -> Result<()> {
	document.parse::<ReverseEntity>()?.attach(dest, opt)
}

/// Attach an already parsed entity document onto `dest`.
pub fn fiware_value_to_obj(document: &JsonValue, dest: &mut dyn FieldCarrier, opt: &AttachOptions) -> Result<()> {
	ReverseEntity::from_json(document)?.attach(dest, opt)
}
