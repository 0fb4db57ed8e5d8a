//! Normalized mean vectors for the default similarity

use super::{Token, Vocab};

#[derive(Debug, Clone)]
pub struct Embedding(Vec<f32>);

impl Embedding {
	/// Create normalized embedding from raw data
	pub fn new(data: Vec<f32>) -> Self {
		Self(normalize(&data))
	}

	/// Mean of token vectors; tokens without a vector count as zeros
	pub fn average(tokens: &[Token], vocab: &Vocab) -> Self {
		let mut sum = vec![0.0f32; vocab.vectors_length()];
		if tokens.is_empty() {
			return Self(sum);
		}

		for vector in tokens
			.iter()
			.filter(|t| t.has_vector)
			.filter_map(|t| vocab.lexeme(t.rank).and_then(|lex| lex.vector()))
		{
			sum.iter_mut().zip(vector).for_each(|(s, v)| *s += v);
		}

		let n = tokens.len() as f32;
		sum.iter_mut().for_each(|s| *s /= n);
		Self::new(sum)
	}

	pub fn is_zero(&self) -> bool {
		self.0.iter().all(|&x| x == 0.0)
	}

	/// Cosine similarity; 0.0 when either side has no vector
	pub fn similarity(&self, other: &Self) -> f32 {
		self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
	}
}

fn normalize(v: &[f32]) -> Vec<f32> {
	let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
	if norm > 0.0 {
		v.iter().map(|x| x / norm).collect()
	} else {
		v.to_vec()
	}
}
