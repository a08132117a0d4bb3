//! Percent-encoding applied at the document boundary.
//!
//! Context brokers reject characters such as `/` in identifiers and type
//! names, so everything outside the RFC 3986 unreserved set is escaped.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

const ESCAPED: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Percent-encode every byte outside `A-Z a-z 0-9 - . _ ~`.
pub fn escape(input: &str) -> Cow<'_, str> {
	utf8_percent_encode(input, ESCAPED).into()
}

/// Reverse [`escape`]; invalid UTF-8 sequences decode lossily.
pub fn unescape(input: &str) -> Cow<'_, str> {
	percent_decode_str(input).decode_utf8_lossy()
}

/// Escape only when `enabled`.
pub(crate) fn escape_if(input: &str, enabled: bool) -> String {
	if enabled { escape(input).into_owned() } else { input.to_owned() }
}

#[cfg(test)]
mod tests {
	use super::{escape, unescape};

	#[test]
	fn slash_in_type_name_is_escaped() {
		assert_eq!(escape("Foo/Bar"), "Foo%2FBar");
		assert_eq!(unescape("Foo%2FBar"), "Foo/Bar");
	}

	#[test]
	fn unreserved_characters_pass_through() {
		assert_eq!(escape("a-b.c_d~e09"), "a-b.c_d~e09");
	}

	#[test]
	fn reserved_and_non_ascii_round_trip() {
		let input = "urn:ngsi ld?x=1&y=äö#+/";
		let escaped = escape(input);
		assert!(!escaped.contains(['/', ':', ' ', '?', '&', '#', '+']));
		assert_eq!(unescape(&escaped), input);
	}
}
