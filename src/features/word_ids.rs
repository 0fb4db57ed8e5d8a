//! Fixed-length token id sequences

use ndarray::{Array1, Array2};

use crate::core::Token;

/// Maps one document to a 1 x max_length id batch
pub type FeatureExtractor = Box<dyn Fn(&[Token]) -> Array2<i32> + Send + Sync>;

fn is_content(token: &Token) -> bool {
	token.has_vector && !token.is_punct && !token.is_space
}

/// `rank + 1`, or None when the id does not fit an i32
fn token_id(token: &Token) -> Option<i32> {
	token.rank.checked_add(1).and_then(|id| i32::try_from(id).ok())
}

/// Encode one document as `rank + 1` ids, zero-padded to `max_length`.
/// Tokens whose id does not fit are skipped like any other non-content token.
pub fn doc_to_ids(tokens: &[Token], max_length: usize) -> Array1<i32> {
	let mut ids = Array1::<i32>::zeros(max_length);
	let content = tokens.iter().filter(|t| is_content(t)).filter_map(token_id);
	for (slot, id) in ids.iter_mut().zip(content) {
		*slot = id;
	}
	ids
}

/// Encode a batch of documents, one row each
pub fn get_word_ids(docs: &[&[Token]], max_length: usize) -> Array2<i32> {
	let mut ids = Array2::<i32>::zeros((docs.len(), max_length));
	for (mut row, tokens) in ids.rows_mut().into_iter().zip(docs) {
		row.assign(&doc_to_ids(tokens, max_length));
	}
	ids
}

/// Default extractor for the similarity shim
pub fn word_ids_extractor(max_length: usize) -> FeatureExtractor {
	Box::new(move |tokens: &[Token]| get_word_ids(&[tokens], max_length))
}
