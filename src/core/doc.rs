//! Documents, spans and the similarity provider slots

use std::fmt;
use std::sync::Arc;

use super::{Embedding, Token, Vocab};
use crate::error::Result;

/// Provider a document routes similarity queries to
pub trait SimilarityHook: Send + Sync {
	fn similarity(&self, a: &[Token], b: &[Token]) -> Result<f32>;
}

pub struct Doc {
	tokens: Vec<Token>,
	vocab: Arc<Vocab>,
	similarity_hook: Option<Arc<dyn SimilarityHook>>,
	span_similarity_hook: Option<Arc<dyn SimilarityHook>>,
}

impl Doc {
	pub fn new(vocab: Arc<Vocab>, tokens: Vec<Token>) -> Self {
		Self {
			tokens,
			vocab,
			similarity_hook: None,
			span_similarity_hook: None,
		}
	}

	pub fn tokens(&self) -> &[Token] {
		&self.tokens
	}

	pub fn vocab(&self) -> &Vocab {
		&self.vocab
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	pub fn text(&self) -> String {
		join_tokens(&self.tokens)
	}

	/// Tokens `start..end`, or None when out of bounds
	pub fn span(&self, start: usize, end: usize) -> Option<Span<'_>> {
		if start > end || end > self.tokens.len() {
			return None;
		}
		Some(Span { doc: self, start, end })
	}

	pub fn set_similarity_hook(&mut self, hook: Arc<dyn SimilarityHook>) {
		self.similarity_hook = Some(hook);
	}

	pub fn set_span_similarity_hook(&mut self, hook: Arc<dyn SimilarityHook>) {
		self.span_similarity_hook = Some(hook);
	}

	pub fn has_similarity_hook(&self) -> bool {
		self.similarity_hook.is_some()
	}

	pub fn has_span_similarity_hook(&self) -> bool {
		self.span_similarity_hook.is_some()
	}

	pub fn vector(&self) -> Embedding {
		Embedding::average(&self.tokens, &self.vocab)
	}

	/// Score against another doc through the registered provider, or by mean-vector cosine
	pub fn similarity(&self, other: &Doc) -> Result<f32> {
		match &self.similarity_hook {
			Some(hook) => hook.similarity(&self.tokens, &other.tokens),
			None => Ok(self.vector().similarity(&other.vector())),
		}
	}
}

impl fmt::Debug for Doc {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Doc")
			.field("tokens", &self.tokens)
			.field("similarity_hook", &self.similarity_hook.is_some())
			.field("span_similarity_hook", &self.span_similarity_hook.is_some())
			.finish()
	}
}

#[derive(Debug, Clone, Copy)]
pub struct Span<'a> {
	doc: &'a Doc,
	start: usize,
	end: usize,
}

impl<'a> Span<'a> {
	pub fn tokens(&self) -> &'a [Token] {
		&self.doc.tokens[self.start..self.end]
	}

	pub fn text(&self) -> String {
		join_tokens(self.tokens())
	}

	pub fn vector(&self) -> Embedding {
		Embedding::average(self.tokens(), &self.doc.vocab)
	}

	pub fn similarity(&self, other: &Span<'_>) -> Result<f32> {
		match &self.doc.span_similarity_hook {
			Some(hook) => hook.similarity(self.tokens(), other.tokens()),
			None => Ok(self.vector().similarity(&other.vector())),
		}
	}
}

fn join_tokens(tokens: &[Token]) -> String {
	let mut text = String::new();
	for token in tokens {
		text.push_str(&token.text);
		if token.whitespace {
			text.push(' ');
		}
	}
	text
}
