//! Ranked vocabulary with pretrained word vectors
//!
//! Ranks are dense and follow insertion order, which for vector files is the
//! frequency order the vectors were exported in.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use finalfusion::compat::text::ReadText;
use finalfusion::embeddings::Embeddings;
use finalfusion::storage::NdArray;
use finalfusion::vocab::SimpleVocab;

use crate::error::{Result, ShimError};

/// A single vocabulary entry
#[derive(Debug, Clone)]
pub struct Lexeme {
	pub text: String,
	pub rank: usize,
	vector: Option<Vec<f32>>,
}

impl Lexeme {
	pub fn has_vector(&self) -> bool {
		self.vector.is_some()
	}

	pub fn vector(&self) -> Option<&[f32]> {
		self.vector.as_deref()
	}
}

#[derive(Debug, Clone, Default)]
pub struct Vocab {
	lexemes: Vec<Lexeme>,
	index: HashMap<String, usize>,
	vectors_length: usize,
}

impl Vocab {
	pub fn new(vectors_length: usize) -> Self {
		Self {
			lexemes: Vec::new(),
			index: HashMap::new(),
			vectors_length,
		}
	}

	/// Add a lexeme and return its rank. Re-adding known text returns the existing rank.
	pub fn add(&mut self, text: &str, vector: Option<Vec<f32>>) -> usize {
		if let Some(&rank) = self.index.get(text) {
			return rank;
		}

		let rank = self.lexemes.len();
		self.lexemes.push(Lexeme {
			text: text.to_string(),
			rank,
			vector,
		});
		self.index.insert(text.to_string(), rank);
		rank
	}

	/// Look up by exact text, falling back to lowercase
	pub fn get(&self, text: &str) -> Option<&Lexeme> {
		self.index
			.get(text)
			.or_else(|| self.index.get(&text.to_lowercase()))
			.map(|&rank| &self.lexemes[rank])
	}

	pub fn lexeme(&self, rank: usize) -> Option<&Lexeme> {
		self.lexemes.get(rank)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Lexeme> {
		self.lexemes.iter()
	}

	pub fn len(&self) -> usize {
		self.lexemes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.lexemes.is_empty()
	}

	pub fn vectors_length(&self) -> usize {
		self.vectors_length
	}

	pub fn n_vectors(&self) -> usize {
		self.lexemes.iter().filter(|lex| lex.has_vector()).count()
	}

	/// Load a word2vec-style text file
	pub fn load(path: &Path) -> Result<Self> {
		if !path.exists() {
			return Err(ShimError::ResourceNotFound(path.to_path_buf()));
		}
		crate::ui::debug(&format!("Loading vectors: {}", path.display()));
		let text = fs::read_to_string(path)?;
		Self::parse(&text, path)
	}

	/// Parse vector text: optional `count dim` header, then `word v1 .. vD` per line.
	/// Vector lines go through finalfusion's text reader. A line holding only a
	/// word adds a lexeme without a vector.
	pub fn parse(text: &str, origin: &Path) -> Result<Self> {
		let invalid = |reason: String| ShimError::Deserialize {
			path: PathBuf::from(origin),
			reason,
		};

		let mut lines = text.lines().peekable();
		let mut declared_dim = None;

		if let Some(&first) = lines.peek() {
			let fields: Vec<&str> = first.split_whitespace().collect();
			if let [count, dim] = fields.as_slice() {
				if let (Ok(_), Ok(dim)) = (count.parse::<usize>(), dim.parse::<usize>()) {
					declared_dim = Some(dim);
					lines.next();
				}
			}
		}

		// (word, has vector) in file order; repeated words keep their first line
		let mut entries: Vec<(&str, bool)> = Vec::new();
		let mut seen = HashSet::new();
		let mut vector_text = String::new();

		for line in lines {
			let mut fields = line.split_whitespace();
			let Some(word) = fields.next() else {
				continue;
			};
			if !seen.insert(word) {
				continue;
			}

			let has_vector = fields.next().is_some();
			if has_vector {
				vector_text.push_str(line.trim());
				vector_text.push('\n');
			}
			entries.push((word, has_vector));
		}

		let mut vectors = Vec::new();
		let mut dims = declared_dim.unwrap_or(0);

		if !vector_text.is_empty() {
			let embeddings: Embeddings<SimpleVocab, NdArray> =
				Embeddings::read_text(&mut vector_text.as_bytes()).map_err(|e| invalid(e.to_string()))?;

			if declared_dim.is_some_and(|declared| declared != embeddings.dims()) {
				return Err(invalid(format!(
					"header declares {} dimensions, vectors have {}",
					dims,
					embeddings.dims()
				)));
			}
			dims = embeddings.dims();

			// the reader l2-normalizes rows; restore the stored values
			vectors = embeddings
				.iter_with_norms()
				.map(|(_, embedding)| embedding.into_unnormalized().to_vec())
				.collect();
		}

		let mut vocab = Self::new(dims);
		let mut vectors = vectors.into_iter();
		for (word, has_vector) in entries {
			let vector = if has_vector { vectors.next() } else { None };
			vocab.add(word, vector);
		}

		crate::ui::debug(&format!(
			"Vocabulary: {} lexemes, {} vectors of width {}",
			vocab.len(),
			vocab.n_vectors(),
			vocab.vectors_length
		));

		Ok(vocab)
	}
}
