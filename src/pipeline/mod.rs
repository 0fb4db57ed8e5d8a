//! # Pipeline
//!
//! Tokenization followed by document components. The similarity shim is one
//! such component: it registers itself on every document it sees.

pub mod tokenizer;

use std::path::Path;
use std::sync::Arc;

use crate::core::{Doc, Vocab};
use crate::error::Result;
use crate::models::SimilarityShim;

pub use tokenizer::tokenize;

/// A processing step applied to every document
pub trait Component: Send + Sync {
	fn name(&self) -> &str;
	fn process(&self, doc: &mut Doc) -> Result<()>;
}

impl Component for Arc<SimilarityShim> {
	fn name(&self) -> &str {
		"similarity"
	}

	fn process(&self, doc: &mut Doc) -> Result<()> {
		self.attach(doc);
		Ok(())
	}
}

pub struct Pipeline {
	vocab: Arc<Vocab>,
	components: Vec<Box<dyn Component>>,
}

impl Pipeline {
	pub fn new(vocab: Arc<Vocab>) -> Self {
		Self {
			vocab,
			components: Vec::new(),
		}
	}

	pub fn add_component(&mut self, component: Box<dyn Component>) {
		crate::ui::debug(&format!("Pipeline component: {}", component.name()));
		self.components.push(component);
	}

	pub fn component_names(&self) -> Vec<&str> {
		self.components.iter().map(|c| c.name()).collect()
	}

	pub fn vocab(&self) -> &Arc<Vocab> {
		&self.vocab
	}

	/// Tokenize without running components
	pub fn make_doc(&self, text: &str) -> Result<Doc> {
		Ok(Doc::new(self.vocab.clone(), tokenize(text, &self.vocab)?))
	}

	pub fn process(&self, text: &str) -> Result<Doc> {
		let mut doc = self.make_doc(text)?;
		for component in &self.components {
			component.process(&mut doc)?;
		}
		Ok(doc)
	}
}

/// Pipeline whose documents score similarity with the model stored in `model_dir`
pub fn create_similarity_pipeline(vocab: Arc<Vocab>, model_dir: &Path) -> Result<Pipeline> {
	let shim = Arc::new(SimilarityShim::load(model_dir, &vocab, None)?);
	let mut pipeline = Pipeline::new(vocab);
	pipeline.add_component(Box::new(shim));
	Ok(pipeline)
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Counter;

	impl Component for Counter {
		fn name(&self) -> &str {
			"counter"
		}

		fn process(&self, doc: &mut Doc) -> Result<()> {
			assert!(!doc.is_empty());
			Ok(())
		}
	}

	#[test]
	fn components_run_in_order_of_addition() {
		let mut vocab = Vocab::new(1);
		vocab.add("hi", Some(vec![1.0]));
		let mut pipeline = Pipeline::new(Arc::new(vocab));
		pipeline.add_component(Box::new(Counter));
		pipeline.add_component(Box::new(Arc::new(SimilarityShim::new(None))));
		assert_eq!(pipeline.component_names(), vec!["counter", "similarity"]);

		let doc = pipeline.process("hi there").unwrap();
		assert!(doc.has_similarity_hook());
		assert!(doc.has_span_similarity_hook());
	}

	#[test]
	fn make_doc_skips_components() {
		let mut vocab = Vocab::new(1);
		vocab.add("hi", Some(vec![1.0]));
		let mut pipeline = Pipeline::new(Arc::new(vocab));
		pipeline.add_component(Box::new(Arc::new(SimilarityShim::new(None))));
		let doc = pipeline.make_doc("hi").unwrap();
		assert!(!doc.has_similarity_hook());
		assert!((doc.similarity(&doc).unwrap() - 1.0).abs() < 1e-6);
	}
}
