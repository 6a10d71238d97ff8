//! Splits note content into text runs and mentions.

use std::iter::FusedIterator;

use super::syntax::{MentionSyntax, match_mention};

/// A mention found in note content.
///
/// `entity_type` and `entity_id` are taken verbatim from the text; nothing is
/// checked against known entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mention<'a> {
	/// The full matched text, delimiters included.
	pub raw: &'a str,
	/// Type tag, or `"entity"` for the double-brace form.
	pub entity_type: &'a str,
	/// Opaque entity id.
	pub entity_id: &'a str,
	/// Which encoding the mention was written in.
	pub syntax: MentionSyntax,
}

/// A contiguous, classified slice of note content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
	/// Plain text, never empty.
	Text(&'a str),
	/// A parsed mention.
	Mention(Mention<'a>),
}

impl<'a> Token<'a> {
	/// The exact source text covered by this token.
	pub fn raw(&self) -> &'a str {
		match *self {
			Token::Text(text) => text,
			Token::Mention(mention) => mention.raw,
		}
	}

	/// Length of the covered source text in bytes.
	pub fn len(&self) -> usize {
		self.raw().len()
	}

	/// Tokens are never empty; provided for symmetry with [`Token::len`].
	pub fn is_empty(&self) -> bool {
		self.raw().is_empty()
	}

	/// The mention, if this token is one.
	pub fn as_mention(&self) -> Option<&Mention<'a>> {
		match self {
			Token::Mention(mention) => Some(mention),
			Token::Text(_) => None,
		}
	}
}

/// Tokenizer bound to a canonical write format.
///
/// Reading always accepts every [`MentionSyntax`]; the canonical one only decides
/// how [`Tokenizer::format`] and the edit helpers encode new mentions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tokenizer {
	canonical: MentionSyntax,
}

impl Tokenizer {
	/// Create a tokenizer that writes mentions as `canonical`.
	pub fn new(canonical: MentionSyntax) -> Self {
		Self { canonical }
	}

	/// The encoding used for new mentions.
	pub fn canonical(&self) -> MentionSyntax {
		self.canonical
	}

	/// Encode a mention in the canonical syntax.
	pub fn format(&self, entity_type: &str, entity_id: &str) -> String {
		self.canonical.format(entity_type, entity_id)
	}

	/// Lazily tokenize `content`.
	///
	/// The returned iterator covers the input with no gaps or overlaps:
	/// concatenating every [`Token::raw`] gives back `content`. Empty input
	/// yields no tokens at all. Unterminated or malformed delimiters are
	/// left inside text tokens.
	pub fn tokenize<'a>(&self, content: &'a str) -> Tokens<'a> {
		Tokens {
			content,
			pos: 0,
			pending: None,
		}
	}
}

/// Iterator over the tokens of a piece of content. See [`Tokenizer::tokenize`].
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
	content: &'a str,
	pos: usize,
	pending: Option<Mention<'a>>,
}

impl<'a> Tokens<'a> {
	/// Byte offset of the next token to be produced.
	pub fn offset(&self) -> usize {
		self.pos
	}
}

impl<'a> Iterator for Tokens<'a> {
	type Item = Token<'a>;

	fn next(&mut self) -> Option<Token<'a>> {
		if let Some(mention) = self.pending.take() {
			self.pos += mention.raw.len();
			return Some(Token::Mention(mention));
		}

		let content = self.content;
		let rest = &content[self.pos..];
		if rest.is_empty() {
			return None;
		}

		let mut from = 0;
		while let Some(found) = rest[from..].find('{') {
			let at = from + found;
			if let Some(m) = match_mention(&rest[at..]) {
				let mention = Mention {
					raw: &rest[at..at + m.len],
					entity_type: m.entity_type,
					entity_id: m.entity_id,
					syntax: m.syntax,
				};
				if at == 0 {
					self.pos += m.len;
					return Some(Token::Mention(mention));
				}
				self.pending = Some(mention);
				self.pos += at;
				return Some(Token::Text(&rest[..at]));
			}
			from = at + 1;
		}

		self.pos = self.content.len();
		Some(Token::Text(rest))
	}
}

impl FusedIterator for Tokens<'_> {}

/// Tokenize with the default tokenizer (canonical `{type:id}`).
pub fn tokenize(content: &str) -> Tokens<'_> {
	Tokenizer::default().tokenize(content)
}

/// Every mention in `content`, in order of appearance.
///
/// Callers hand these to the backend to resolve entity records.
pub fn mention_references(content: &str) -> impl Iterator<Item = Mention<'_>> {
	tokenize(content).filter_map(|token| token.as_mention().copied())
}

/// Number of mentions in `content`.
pub fn mention_count(content: &str) -> usize {
	mention_references(content).count()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn text(s: &str) -> Token<'_> {
		Token::Text(s)
	}

	#[test]
	fn extracts_mention_between_text_runs() {
		let tokens: Vec<_> = tokenize("Saí com {person:ent_8f2a} e foi legal").collect();
		assert_eq!(tokens.len(), 3);
		assert_eq!(tokens[0], text("Saí com "));
		assert_eq!(
			tokens[1],
			Token::Mention(Mention {
				raw: "{person:ent_8f2a}",
				entity_type: "person",
				entity_id: "ent_8f2a",
				syntax: MentionSyntax::Braced,
			})
		);
		assert_eq!(tokens[2], text(" e foi legal"));
	}

	#[test]
	fn empty_input_yields_nothing() {
		assert_eq!(tokenize("").count(), 0);
	}

	#[test]
	fn unterminated_brace_is_plain_text() {
		let tokens: Vec<_> = tokenize("unterminated {brace").collect();
		assert_eq!(tokens, vec![text("unterminated {brace")]);
	}

	#[test]
	fn adjacent_mentions_have_no_text_between() {
		let tokens: Vec<_> = tokenize("{person:a}{habit:b}").collect();
		assert_eq!(tokens.len(), 2);
		assert!(tokens.iter().all(|t| t.as_mention().is_some()));
	}

	#[test]
	fn legacy_form_is_read_alongside_canonical() {
		let content = "{{entity:ent_1}} met {person:ent_2}";
		let mentions: Vec<_> = mention_references(content).collect();
		assert_eq!(mentions.len(), 2);
		assert_eq!(mentions[0].syntax, MentionSyntax::DoubleBrace);
		assert_eq!(mentions[0].entity_id, "ent_1");
		assert_eq!(mentions[1].syntax, MentionSyntax::Braced);
		assert_eq!(mentions[1].entity_id, "ent_2");
	}

	#[test]
	fn stray_brace_before_mention_stays_in_text() {
		let tokens: Vec<_> = tokenize("a { b {goal:g1}").collect();
		assert_eq!(tokens[0], text("a { b "));
		assert_eq!(tokens[1].raw(), "{goal:g1}");
		assert_eq!(tokens.len(), 2);
	}

	#[test]
	fn tokens_cover_input_losslessly() {
		let content = "x {person:p1} {bad y {{entity:e9}} {project:p_2}z";
		let rebuilt: String = tokenize(content).map(|t| t.raw()).collect();
		assert_eq!(rebuilt, content);
		let total: usize = tokenize(content).map(|t| t.len()).sum();
		assert_eq!(total, content.len());
	}

	#[test]
	fn offset_tracks_consumed_bytes() {
		let mut tokens = tokenize("ab{person:x}");
		assert_eq!(tokens.offset(), 0);
		tokens.next();
		assert_eq!(tokens.offset(), 2);
		tokens.next();
		assert_eq!(tokens.offset(), 12);
		assert!(tokens.next().is_none());
		assert!(tokens.next().is_none());
	}

	#[test]
	fn mention_count_counts_both_syntaxes() {
		assert_eq!(mention_count("no mentions here"), 0);
		assert_eq!(mention_count("{person:a} and {{entity:b}} and {x"), 2);
	}

	#[test]
	fn canonical_format_follows_tokenizer() {
		let legacy = Tokenizer::new(MentionSyntax::DoubleBrace);
		assert_eq!(legacy.canonical(), MentionSyntax::DoubleBrace);
		assert_eq!(legacy.format("person", "ent_1"), "{{entity:ent_1}}");
		assert_eq!(Tokenizer::default().format("person", "ent_1"), "{person:ent_1}");
	}
}
