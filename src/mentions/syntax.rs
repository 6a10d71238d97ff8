//! Textual encodings of a mention.

use std::fmt;

/// Literal tag used by the legacy double-brace encoding.
pub const LEGACY_TAG: &str = "entity";

const LEGACY_OPEN: &str = "{{entity:";
const LEGACY_CLOSE: &str = "}}";

/// The encodings a mention may take inside stored note content.
///
/// Both are always recognised when reading. A [`Tokenizer`](super::Tokenizer) picks
/// one of them as its canonical format for writing new mentions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MentionSyntax {
	/// `{type:id}`: lowercase type tag, colon, id, single braces.
	#[default]
	Braced,
	/// `{{entity:id}}`: double braces around the fixed tag `entity`.
	DoubleBrace,
}

impl MentionSyntax {
	/// Encode a mention in this syntax.
	///
	/// The double-brace form carries no type, so `entity_type` is dropped there.
	pub fn format(self, entity_type: &str, entity_id: &str) -> String {
		match self {
			Self::Braced => format!("{{{}:{}}}", entity_type.to_lowercase(), entity_id),
			Self::DoubleBrace => format!("{LEGACY_OPEN}{entity_id}{LEGACY_CLOSE}"),
		}
	}
}

impl fmt::Display for MentionSyntax {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Braced => f.write_str("{type:id}"),
			Self::DoubleBrace => f.write_str("{{entity:id}}"),
		}
	}
}

/// A mention recognised at the very start of a string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RawMention<'a> {
	pub len: usize,
	pub entity_type: &'a str,
	pub entity_id: &'a str,
	pub syntax: MentionSyntax,
}

/// Match a mention anchored at the start of `input`.
///
/// The double-brace form is tried first, otherwise `{{entity:x}}` would be read
/// as a stray `{` followed by the braced mention `{entity:x}`.
pub(crate) fn match_mention(input: &str) -> Option<RawMention<'_>> {
	match_double_brace(input).or_else(|| match_braced(input))
}

/// Returns true when `text` is exactly one mention and nothing else.
///
/// Only the shape is checked; whether the entity exists is the backend's business.
pub fn is_valid_mention(text: &str) -> bool {
	match_mention(text).is_some_and(|m| m.len == text.len())
}

#[derive(Clone, Copy)]
enum Scan {
	Open,
	Kind,
	Id { kind_end: usize },
}

fn match_braced(input: &str) -> Option<RawMention<'_>> {
	let mut state = Scan::Open;
	for (i, c) in input.char_indices() {
		state = match state {
			Scan::Open if c == '{' => Scan::Kind,
			Scan::Kind if is_kind_char(c) => Scan::Kind,
			Scan::Kind if c == ':' && i > 1 => Scan::Id { kind_end: i },
			Scan::Id { kind_end } if is_id_char(c) => Scan::Id { kind_end },
			Scan::Id { kind_end } if c == '}' && i > kind_end + 1 => {
				return Some(RawMention {
					len: i + 1,
					entity_type: &input[1..kind_end],
					entity_id: &input[kind_end + 1..i],
					syntax: MentionSyntax::Braced,
				});
			}
			_ => return None,
		};
	}
	None
}

fn match_double_brace(input: &str) -> Option<RawMention<'_>> {
	let rest = input.strip_prefix(LEGACY_OPEN)?;
	let id_len = rest
		.find(|c: char| !is_legacy_id_char(c))
		.unwrap_or(rest.len());
	if id_len == 0 || !rest[id_len..].starts_with(LEGACY_CLOSE) {
		return None;
	}
	Some(RawMention {
		len: LEGACY_OPEN.len() + id_len + LEGACY_CLOSE.len(),
		entity_type: LEGACY_TAG,
		entity_id: &rest[..id_len],
		syntax: MentionSyntax::DoubleBrace,
	})
}

fn is_kind_char(c: char) -> bool {
	c.is_ascii_lowercase() || c == '_'
}

fn is_id_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_'
}

// Legacy ids were opaque; anything but braces and whitespace.
fn is_legacy_id_char(c: char) -> bool {
	c != '{' && c != '}' && !c.is_whitespace()
}
