//! Metadata-tagged object <-> JSON codec for context-broker entities.
//!
//! Host objects are encoded into documents where every value is a
//! `{"type", "value", "metadata"?}` node, and such documents are decoded back
//! onto destination objects under a chosen attachment policy.

/// Encoding, decoding, and attachment of tagged entity documents.
pub mod codec;
