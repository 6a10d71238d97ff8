//! Mention handling for note content.
//!
//! Notes reference entities inline with delimited text such as `{person:ent_8f2a}`.
//! Everything here is pure and allocation-light so it can run on every keystroke:
//!
//! - [`tokenizer`] splits content into text and mention tokens, losslessly.
//! - [`autocomplete`] detects an in-progress mention under the caret.
//! - [`edit`] builds mentions and splices them into text.
//!
//! Positions in this module are counted in Unicode scalar values (`char`s), not bytes.
//! Browser selection offsets are UTF-16 based; see [`autocomplete::utf16_to_char_offset`].

pub mod autocomplete;
pub mod edit;
pub mod syntax;
pub mod tokenizer;

pub use autocomplete::{AutocompleteState, Trigger, detect_autocomplete_context};
pub use edit::{complete_mention, format_mention, insert_mention_at};
pub use syntax::{MentionSyntax, is_valid_mention};
pub use tokenizer::{Mention, Token, Tokenizer, Tokens, mention_count, mention_references, tokenize};

/// Byte offset of the `chars`-th char of `text`, clamped to the end of the string.
pub(crate) fn byte_offset(text: &str, chars: usize) -> usize {
	text.char_indices()
		.nth(chars)
		.map_or(text.len(), |(i, _)| i)
}
