//! Similarity shim: loads the model and serves document similarity

use ndarray::Array1;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::architecture::{Architecture, ModelConfig};
use super::attention::DecomposableAttention;
use super::weights;
use crate::config::{CONFIG_FILE, WEIGHTS_FILE};
use crate::core::{Doc, SimilarityHook, Token, Vocab};
use crate::error::{Result, ShimError};
use crate::features::{get_embeddings, word_ids_extractor, FeatureExtractor};

pub struct SimilarityShim {
	model: Option<DecomposableAttention>,
	get_features: Option<FeatureExtractor>,
}

impl SimilarityShim {
	/// Unloaded shim; `predict` fails until `load_model` succeeds
	pub fn new(get_features: Option<FeatureExtractor>) -> Self {
		Self {
			model: None,
			get_features,
		}
	}

	/// Load the model stored in `path`, with `vocab` vectors as its embedding layer
	pub fn load(path: &Path, vocab: &Vocab, get_features: Option<FeatureExtractor>) -> Result<Self> {
		let mut shim = Self::new(get_features);
		shim.load_model(path, vocab)?;
		Ok(shim)
	}

	pub fn load_model(&mut self, path: &Path, vocab: &Vocab) -> Result<()> {
		if self.model.is_some() {
			crate::ui::debug("Similarity model already loaded");
			return Ok(());
		}

		let arch = read_architecture(&path.join(CONFIG_FILE))?;
		crate::ui::debug(&format!(
			"Architecture: {} ({:?})",
			arch.class_name(),
			arch.config()
		));

		let stored = weights::load(&path.join(WEIGHTS_FILE))?;
		let embeddings = get_embeddings(vocab)?;

		let mut params = Vec::with_capacity(stored.len() + 1);
		params.push(embeddings.into_dyn());
		params.extend(stored);
		let model = DecomposableAttention::from_weights(&arch, params)?;

		let max_length = model.config().max_length;
		self.get_features
			.get_or_insert_with(|| word_ids_extractor(max_length));
		self.model = Some(model);

		crate::ui::debug(&format!("Similarity model loaded from {}", path.display()));
		Ok(())
	}

	pub fn is_loaded(&self) -> bool {
		self.model.is_some()
	}

	pub fn model(&self) -> Option<&DecomposableAttention> {
		self.model.as_ref()
	}

	/// Register this shim as the doc's similarity provider, for the doc and its spans
	pub fn attach(self: &Arc<Self>, doc: &mut Doc) {
		doc.set_similarity_hook(self.clone());
		doc.set_span_similarity_hook(self.clone());
	}

	/// Score one pair of documents; returns the first row of the model's output batch
	pub fn predict(&self, doc1: &[Token], doc2: &[Token]) -> Result<Array1<f32>> {
		let (Some(model), Some(get_features)) = (&self.model, &self.get_features) else {
			return Err(ShimError::NotLoaded);
		};

		let x1 = get_features(doc1);
		let x2 = get_features(doc2);
		let scores = model.predict(&x1, &x2)?;

		if scores.nrows() == 0 {
			return Err(ShimError::SchemaMismatch(
				"feature extractor produced an empty batch".to_string(),
			));
		}
		Ok(scores.row(0).to_owned())
	}
}

impl SimilarityHook for SimilarityShim {
	/// First output unit of the first batch row
	fn similarity(&self, a: &[Token], b: &[Token]) -> Result<f32> {
		Ok(self.predict(a, b)?[0])
	}
}

fn read_architecture(path: &Path) -> Result<Architecture> {
	if !path.exists() {
		return Err(ShimError::ResourceNotFound(path.to_path_buf()));
	}

	let invalid = |reason: String| ShimError::Deserialize {
		path: path.to_path_buf(),
		reason,
	};

	let text = fs::read_to_string(path)?;
	let config: ModelConfig = serde_json::from_str(&text).map_err(|e| invalid(e.to_string()))?;
	config.model.resolve().map_err(|e| invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn predict_before_load_is_not_loaded() {
		let shim = SimilarityShim::new(None);
		assert!(!shim.is_loaded());
		let tokens = vec![Token::word("a", 0, true)];
		assert!(matches!(
			shim.predict(&tokens, &tokens),
			Err(ShimError::NotLoaded)
		));
		assert!(matches!(
			shim.similarity(&tokens, &tokens),
			Err(ShimError::NotLoaded)
		));
	}

	#[test]
	fn missing_directory_is_resource_not_found() {
		let mut vocab = Vocab::new(2);
		vocab.add("a", Some(vec![1.0, 0.0]));
		let dir = tempfile::tempdir().unwrap();
		let err = SimilarityShim::load(dir.path(), &vocab, None).err().unwrap();
		assert!(matches!(err, ShimError::ResourceNotFound(p) if p.ends_with(CONFIG_FILE)));
	}

	#[test]
	fn malformed_config_is_deserialize_error() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join(CONFIG_FILE), "{\"model\": 3}").unwrap();
		let err = read_architecture(&dir.path().join(CONFIG_FILE)).unwrap_err();
		assert!(matches!(err, ShimError::Deserialize { .. }));
	}
}
