//! Building mentions and splicing them into text.
//!
//! All helpers return a new `String`; the input is never modified.

use super::autocomplete::AutocompleteState;
use super::byte_offset;
use super::tokenizer::Tokenizer;

/// Encode a mention in the canonical `{type:id}` form.
pub fn format_mention(entity_type: &str, entity_id: &str) -> String {
	Tokenizer::default().format(entity_type, entity_id)
}

/// Insert a canonical mention at char offset `position`.
///
/// Text before and after `position` is preserved byte for byte. A position past
/// the end appends.
pub fn insert_mention_at(text: &str, position: usize, entity_type: &str, entity_id: &str) -> String {
	Tokenizer::default().insert_at(text, position, entity_type, entity_id)
}

/// Replace the trigger and query of `state` with a canonical mention plus one space.
///
/// Returns the new text and the char offset right after the inserted space,
/// where the caret should go.
pub fn complete_mention(
	text: &str,
	state: &AutocompleteState,
	caret: usize,
	entity_type: &str,
	entity_id: &str,
) -> (String, usize) {
	Tokenizer::default().complete(text, state, caret, entity_type, entity_id)
}

impl Tokenizer {
	/// [`insert_mention_at`] using this tokenizer's canonical syntax.
	pub fn insert_at(&self, text: &str, position: usize, entity_type: &str, entity_id: &str) -> String {
		let at = byte_offset(text, position);
		let mention = self.format(entity_type, entity_id);
		let mut out = String::with_capacity(text.len() + mention.len());
		out.push_str(&text[..at]);
		out.push_str(&mention);
		out.push_str(&text[at..]);
		out
	}

	/// [`complete_mention`] using this tokenizer's canonical syntax.
	pub fn complete(
		&self,
		text: &str,
		state: &AutocompleteState,
		caret: usize,
		entity_type: &str,
		entity_id: &str,
	) -> (String, usize) {
		let start = byte_offset(text, state.trigger_position);
		let end = byte_offset(text, caret).max(start);
		let inserted = format!("{} ", self.format(entity_type, entity_id));

		let mut out = String::with_capacity(text.len() + inserted.len());
		out.push_str(&text[..start]);
		out.push_str(&inserted);
		out.push_str(&text[end..]);

		let caret = text[..start].chars().count() + inserted.chars().count();
		(out, caret)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mentions::{MentionSyntax, detect_autocomplete_context, tokenize};

	#[test]
	fn format_produces_canonical_form() {
		assert_eq!(format_mention("person", "ent_8f2a"), "{person:ent_8f2a}");
		assert_eq!(format_mention("Habit", "h1"), "{habit:h1}");
	}

	#[test]
	fn insert_at_end_of_text() {
		assert_eq!(
			insert_mention_at("Saí com ", 8, "person", "ent_8f2a"),
			"Saí com {person:ent_8f2a}"
		);
	}

	#[test]
	fn insert_in_the_middle_keeps_both_sides() {
		let out = insert_mention_at("Saí com  hoje", 8, "person", "ent_8f2a");
		assert_eq!(out, "Saí com {person:ent_8f2a} hoje");
	}

	#[test]
	fn insert_past_end_appends() {
		assert_eq!(insert_mention_at("ok", 10, "goal", "g"), "ok{goal:g}");
	}

	#[test]
	fn complete_replaces_trigger_and_query() {
		let text = "Olá @jo tudo bem";
		let state = detect_autocomplete_context(text, 7).unwrap();
		let (out, caret) = complete_mention(text, &state, 7, "person", "ent_1");
		assert_eq!(out, "Olá {person:ent_1}  tudo bem");
		assert_eq!(caret, "Olá {person:ent_1} ".chars().count());

		let tokens: Vec<_> = tokenize(&out).collect();
		assert_eq!(tokens.len(), 3);
		assert_eq!(tokens[1].raw(), "{person:ent_1}");
	}

	#[test]
	fn complete_in_legacy_canonical_form() {
		let tokenizer = Tokenizer::new(MentionSyntax::DoubleBrace);
		let text = "#pro";
		let state = detect_autocomplete_context(text, 4).unwrap();
		let (out, caret) = tokenizer.complete(text, &state, 4, "project", "p9");
		assert_eq!(out, "{{entity:p9}} ");
		assert_eq!(caret, 14);
	}

	#[test]
	fn complete_after_double_brace_leaves_no_stray_brace() {
		let text = "Vi {{ent hoje";
		let state = detect_autocomplete_context(text, 8).unwrap();

		let (out, caret) = complete_mention(text, &state, 8, "person", "p1");
		assert_eq!(out, "Vi {person:p1}  hoje");
		assert_eq!(caret, "Vi {person:p1} ".chars().count());
		let raws: Vec<_> = tokenize(&out).map(|t| t.raw()).collect();
		assert_eq!(raws, vec!["Vi ", "{person:p1}", "  hoje"]);

		let legacy = Tokenizer::new(MentionSyntax::DoubleBrace);
		let state = detect_autocomplete_context("{{ent", 5).unwrap();
		let (out, _) = legacy.complete("{{ent", &state, 5, "person", "p1");
		assert_eq!(out, "{{entity:p1}} ");
		let raws: Vec<_> = tokenize(&out).map(|t| t.raw()).collect();
		assert_eq!(raws, vec!["{{entity:p1}}", " "]);
	}
}
