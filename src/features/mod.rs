//! # Feature Extraction
//!
//! Embedding table assembly and document id encoding feeding the similarity model.

pub mod embeddings;
pub mod word_ids;

pub use embeddings::get_embeddings;
pub use word_ids::{doc_to_ids, get_word_ids, word_ids_extractor, FeatureExtractor};
