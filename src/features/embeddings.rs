//! Embedding table assembled from vocabulary vectors

use ndarray::Array2;

use crate::core::Vocab;
use crate::error::{Result, ShimError};

/// Build the (max_rank + 2) x vectors_length table.
///
/// Row 0 stays zero for padding and vectorless tokens; row `rank + 1` holds
/// the vector of the lexeme with that rank.
pub fn get_embeddings(vocab: &Vocab) -> Result<Array2<f32>> {
	let max_rank = vocab
		.iter()
		.filter(|lex| lex.has_vector())
		.map(|lex| lex.rank)
		.max()
		.ok_or_else(|| {
			ShimError::ConfigurationError("vocabulary has no word vectors".to_string())
		})?;

	let width = vocab.vectors_length();
	let rows = max_rank + 2;
	let mut vectors = Array2::<f32>::zeros((rows, width));

	for lex in vocab.iter() {
		let Some(vector) = lex.vector() else {
			continue;
		};

		if lex.rank + 1 >= rows {
			return Err(ShimError::ConfigurationError(format!(
				"rank {} exceeds embedding table of {} rows",
				lex.rank, rows
			)));
		}
		if vector.len() != width {
			return Err(ShimError::ConfigurationError(format!(
				"vector for '{}' has {} values, expected {}",
				lex.text,
				vector.len(),
				width
			)));
		}

		vectors
			.row_mut(lex.rank + 1)
			.iter_mut()
			.zip(vector)
			.for_each(|(dst, &src)| *dst = src);
	}

	crate::ui::debug(&format!("Embedding table: {} x {}", rows, width));
	Ok(vectors)
}
