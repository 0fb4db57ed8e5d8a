//! Error types for model loading and similarity scoring

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShimError {
	/// config.json or the weights file is missing
	#[error("Resource not found: {}", .0.display())]
	ResourceNotFound(PathBuf),

	/// Loaded weights disagree with the reconstructed architecture
	#[error("Schema mismatch: {0}")]
	SchemaMismatch(String),

	/// Vocabulary cannot produce an embedding table
	#[error("Configuration error: {0}")]
	ConfigurationError(String),

	/// Predict was called on a shim without a model
	#[error("Similarity model not loaded")]
	NotLoaded,

	/// A resource exists but could not be parsed
	#[error("Failed to deserialize {}: {reason}", .path.display())]
	Deserialize { path: PathBuf, reason: String },

	/// Text could not be split into tokens
	#[error("Tokenization failed: {0}")]
	Tokenize(String),

	/// Encoded token id addresses a row outside the embedding table
	#[error("Token id {id} outside embedding table of {rows} rows")]
	IdOutOfRange { id: i32, rows: usize },

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ShimError>;
