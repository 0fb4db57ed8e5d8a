//! Token attributes consumed by the encoder

use crate::config::OOV_RANK;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
	pub text: String,
	pub rank: usize,
	pub has_vector: bool,
	pub is_punct: bool,
	pub is_space: bool,
	/// Followed by a single space in the source text
	pub whitespace: bool,
}

impl Token {
	pub fn word(text: &str, rank: usize, has_vector: bool) -> Self {
		Self {
			text: text.to_string(),
			rank,
			has_vector,
			is_punct: false,
			is_space: false,
			whitespace: false,
		}
	}

	pub fn punct(text: &str, rank: usize, has_vector: bool) -> Self {
		Self {
			is_punct: true,
			..Self::word(text, rank, has_vector)
		}
	}

	pub fn space(text: &str) -> Self {
		Self {
			is_space: true,
			..Self::word(text, OOV_RANK, false)
		}
	}

	pub fn is_oov(&self) -> bool {
		self.rank == OOV_RANK
	}
}
