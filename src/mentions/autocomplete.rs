//! Detection of an in-progress mention under the caret.
//!
//! The detector is re-run on every keystroke and caret move, so it never keeps
//! state: each call rescans backward from the caret and either finds the
//! trigger that opened mention entry or gives up.
//!
//! Cost: locating the caret is linear in the caret offset; the backward scan
//! itself stops after [`MAX_QUERY_LEN`] characters. A `{` trigger needs no
//! separate balance pass because crossing a `}` on the way back ends the scan.

use std::fmt;

use super::syntax::LEGACY_TAG;
use crate::model::EntityKind;

/// Longest query the backward scan will accumulate before giving up.
pub const MAX_QUERY_LEN: usize = 30;

/// Character that opened mention entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trigger {
	/// `@`, shortcut for people.
	At,
	/// `#`, shortcut for projects.
	Hash,
	/// `*`, shortcut for habits.
	Star,
	/// `{`, the generic typed form.
	Brace,
}

impl Trigger {
	/// The trigger for `c`, if any.
	pub fn from_char(c: char) -> Option<Self> {
		match c {
			'@' => Some(Self::At),
			'#' => Some(Self::Hash),
			'*' => Some(Self::Star),
			'{' => Some(Self::Brace),
			_ => None,
		}
	}

	/// The trigger character.
	pub fn as_char(self) -> char {
		match self {
			Self::At => '@',
			Self::Hash => '#',
			Self::Star => '*',
			Self::Brace => '{',
		}
	}

	/// Shortcut triggers are bound to one entity kind and must start a word.
	pub fn is_shortcut(self) -> bool {
		self != Self::Brace
	}

	/// The entity kind a shortcut trigger stands for.
	pub fn entity_kind(self) -> Option<EntityKind> {
		match self {
			Self::At => Some(EntityKind::Person),
			Self::Hash => Some(EntityKind::Project),
			Self::Star => Some(EntityKind::Habit),
			Self::Brace => None,
		}
	}
}

impl fmt::Display for Trigger {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_char())
	}
}

/// The caret sits inside a mention being typed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutocompleteState {
	/// What opened mention entry.
	pub trigger: Trigger,
	/// Text typed since the trigger, trimmed.
	pub query: String,
	/// Char offset of the trigger character. For a `{{` opener this is the
	/// outer brace, so completion replaces both.
	pub trigger_position: usize,
}

impl AutocompleteState {
	/// Entity kind the candidates should be restricted to.
	///
	/// Shortcuts imply their kind. A brace query may name one as `kind:term`;
	/// the legacy `entity:term` prefix names none.
	pub fn kind_filter(&self) -> Option<EntityKind> {
		self.trigger.entity_kind().or_else(|| self.typed_tag().and_then(|(kind, _)| kind))
	}

	/// The part of the query used to match entity names.
	pub fn search_term(&self) -> &str {
		self.typed_tag().map_or(self.query.as_str(), |(_, term)| term)
	}

	fn typed_tag(&self) -> Option<(Option<EntityKind>, &str)> {
		if self.trigger != Trigger::Brace {
			return None;
		}
		let (tag, term) = self.query.split_once(':')?;
		if tag == LEGACY_TAG {
			return Some((None, term));
		}
		EntityKind::from_tag(tag).map(|kind| (Some(kind), term))
	}
}

/// Detect whether `caret` (a char offset into `content`) is inside a mention being typed.
///
/// Scans backward from the caret. The nearest trigger character wins. The scan
/// gives up on a newline, on a `}` (the group is already closed), on whitespace
/// before any query character has been seen, or after [`MAX_QUERY_LEN`]
/// characters. A shortcut trigger only counts at the start of text or after
/// whitespace, so the `@` in an email address is ignored. A `{` right after
/// another `{` belongs to a legacy `{{` opener, reported at the outer brace. A
/// caret past the end is clamped.
pub fn detect_autocomplete_context(content: &str, caret: usize) -> Option<AutocompleteState> {
	let (end, caret) = match content.char_indices().nth(caret) {
		Some((byte, _)) => (byte, caret),
		None => (content.len(), content.chars().count()),
	};
	let before = &content[..end];

	let mut seen_query = false;
	for (scanned, (byte, c)) in before.char_indices().rev().enumerate() {
		if scanned >= MAX_QUERY_LEN + 1 {
			return None;
		}
		if c == '\n' || c == '}' {
			return None;
		}
		if let Some(trigger) = Trigger::from_char(c) {
			let starts_word = before[..byte]
				.chars()
				.next_back()
				.is_none_or(char::is_whitespace);
			if trigger.is_shortcut() && !starts_word {
				return None;
			}
			let mut trigger_position = caret - scanned - 1;
			if trigger == Trigger::Brace && before[..byte].ends_with('{') {
				trigger_position -= 1;
			}
			return Some(AutocompleteState {
				trigger,
				query: before[byte + c.len_utf8()..].trim().to_owned(),
				trigger_position,
			});
		}
		if c.is_whitespace() {
			if !seen_query {
				return None;
			}
		} else {
			seen_query = true;
		}
	}
	None
}

/// Convert a UTF-16 code unit offset (as reported by browser selection APIs) to a char offset.
pub fn utf16_to_char_offset(text: &str, utf16: usize) -> usize {
	let mut units = 0;
	for (chars, c) in text.chars().enumerate() {
		if units >= utf16 {
			return chars;
		}
		units += c.len_utf16();
	}
	text.chars().count()
}

/// Convert a char offset to a UTF-16 code unit offset.
pub fn char_to_utf16_offset(text: &str, chars: usize) -> usize {
	text.chars().take(chars).map(char::len_utf16).sum()
}
