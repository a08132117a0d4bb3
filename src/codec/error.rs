use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors produced while encoding, decoding, and attaching tagged values.
#[derive(Debug, Error)]
pub enum CodecError {
	/// Source object exposes neither a fixed nor a dynamic field set.
	#[error("cannot get attributes from {type_name}")]
	Unrepresentable {
		/// Host type name of the offending value.
		type_name: String,
	},
	/// Entity root is not a map, composite, or declared-schema message.
	#[error("entity root must expose fields, got {kind}")]
	NotACarrier {
		/// Logical kind of the rejected root value.
		kind: &'static str,
	},
	/// Source `id`/`type` field cannot be rendered as an identifier.
	#[error("field {field} cannot be used as entity identity (got {kind})")]
	InvalidIdentity {
		/// Identity field name (`id` or `type`).
		field: &'static str,
		/// Logical kind of the field value.
		kind: &'static str,
	},
	/// Declared byte-array element does not fit the declared byte width.
	#[error("byte array field {field} holds {value}, outside the {declared_type} range")]
	ByteOutOfRange {
		/// Field being packed.
		field: String,
		/// Declared element type of the field.
		declared_type: String,
		/// Offending element value.
		value: i128,
	},
	/// Float payload is NaN or infinite and has no JSON number form.
	#[error("non-finite float {value} cannot be encoded as a JSON number")]
	NonFiniteFloat {
		/// Offending value.
		value: f64,
	},
	/// Recursive walk exceeded the configured nesting limit.
	#[error("nesting depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Tagged node is not a JSON object.
	#[error("tagged node must be an object, got {found}")]
	InvalidNode {
		/// JSON kind that was found instead.
		found: &'static str,
	},
	/// Tagged node is missing a required member.
	#[error("tagged node is missing {field}")]
	MissingField {
		/// Missing member, e.g. `type`, `value`, or `metadata.dataType`.
		field: &'static str,
	},
	/// Wire tag is unknown and its value is not a mapping.
	#[error("unknown object type {tag}: value is not an iterable mapping")]
	UnknownType {
		/// Unrecognized wire tag.
		tag: String,
	},
	/// Node value has the wrong JSON shape for its wire tag.
	#[error("value of {tag} node must be {expected}, got {found}")]
	ValueShape {
		/// Wire tag of the node.
		tag: String,
		/// JSON kind the tag requires.
		expected: &'static str,
		/// JSON kind that was found instead.
		found: &'static str,
	},
	/// Numeric node value is neither a number nor a numeric string.
	#[error("invalid numeric value {found}")]
	InvalidNumber {
		/// Offending raw value rendered as JSON.
		found: String,
	},
	/// Complex node does not decode to exactly two numeric elements.
	#[error("malformed complex encoding: expected two numeric elements, got {len}")]
	MalformedComplex {
		/// Decoded element count.
		len: usize,
	},
	/// Base64 payload could not be decoded.
	#[error("invalid base64 payload: {0}")]
	InvalidBase64(#[from] base64::DecodeError),
	/// Strict attachment found a runtime type disagreement.
	#[error("the field type does not match the JSON type for {field} ({expected} != {found})")]
	TypeMismatch {
		/// Destination field name.
		field: String,
		/// Runtime kind of the existing destination value.
		expected: &'static str,
		/// Runtime kind of the decoded value.
		found: &'static str,
	},
	/// Fixed-layout destination does not declare the written field.
	#[error("{type_name} does not declare field {field}")]
	UndeclaredField {
		/// Destination type name.
		type_name: String,
		/// Field that was written.
		field: String,
	},
	/// JSON text could not be produced or parsed.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
}
