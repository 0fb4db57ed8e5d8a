// Library-level tests for loading and serving the similarity model

use std::fs;
use std::path::Path;
use std::sync::Arc;

use docsim::config::{CONFIG_FILE, WEIGHTS_FILE};
use docsim::core::{Doc, Token, Vocab};
use docsim::features::{get_embeddings, get_word_ids, word_ids_extractor};
use docsim::models::{
	weights, Activation, Architecture, ArchitectureSource, AttentionConfig, ModelConfig, SimilarityShim,
};
use docsim::pipeline::{create_similarity_pipeline, Pipeline};
use docsim::ShimError;
use rand::rngs::StdRng;
use rand::SeedableRng;

const VECTORS: &str = "6 3
the 0.1 0.2 0.3
cat 0.9 0.1 0.0
dog 0.8 0.2 0.1
sat -0.3 0.5 0.2
mat 0.0 -0.4 0.7
, 0.05 0.05 0.05
";

fn vocab() -> Vocab {
	Vocab::parse(VECTORS, Path::new("vectors.txt")).unwrap()
}

fn architecture(nr_class: usize, activation: Activation) -> Architecture {
	Architecture::DecomposableAttention(AttentionConfig {
		max_length: 8,
		embed_dim: 3,
		nr_hidden: 5,
		nr_class,
		activation,
	})
}

fn write_model(dir: &Path, arch: &Architecture, encode_as_string: bool) {
	let source = if encode_as_string {
		ArchitectureSource::Encoded(serde_json::to_string(arch).unwrap())
	} else {
		ArchitectureSource::Inline(arch.clone())
	};
	let config = ModelConfig { model: source };
	fs::write(dir.join(CONFIG_FILE), serde_json::to_string(&config).unwrap()).unwrap();

	let mut rng = StdRng::seed_from_u64(99);
	weights::save(&dir.join(WEIGHTS_FILE), &arch.random_weights(&mut rng)).unwrap();
}

#[test]
fn embedding_table_matches_vocabulary() {
	let vocab = vocab();
	let table = get_embeddings(&vocab).unwrap();
	assert_eq!(table.dim(), (vocab.len() + 1, 3));
	for lex in vocab.iter() {
		assert_eq!(table.row(lex.rank + 1).to_vec(), lex.vector().unwrap().to_vec());
	}
	assert!(table.row(0).iter().all(|&v| v == 0.0));
}

#[test]
fn load_and_predict() {
	let dir = tempfile::tempdir().unwrap();
	let arch = architecture(1, Activation::Sigmoid);
	write_model(dir.path(), &arch, false);

	let vocab = vocab();
	let shim = SimilarityShim::load(dir.path(), &vocab, None).unwrap();
	assert!(shim.is_loaded());
	assert_eq!(shim.model().unwrap().embedding_rows(), vocab.len() + 1);

	let pipeline = Pipeline::new(Arc::new(vocab));
	let a = pipeline.make_doc("the cat sat").unwrap();
	let b = pipeline.make_doc("the dog sat, on the mat").unwrap();
	let scores = shim.predict(a.tokens(), b.tokens()).unwrap();
	assert_eq!(scores.len(), 1);
	assert!((0.0..=1.0).contains(&scores[0]));

	// same inputs give the same score
	let again = shim.predict(a.tokens(), b.tokens()).unwrap();
	assert_eq!(scores, again);
}

#[test]
fn keras_style_string_architecture_loads() {
	let dir = tempfile::tempdir().unwrap();
	let arch = architecture(3, Activation::Softmax);
	write_model(dir.path(), &arch, true);

	let vocab = Arc::new(vocab());
	let shim = SimilarityShim::load(dir.path(), &vocab, None).unwrap();
	let doc = Pipeline::new(vocab).make_doc("cat on a mat").unwrap();
	let scores = shim.predict(doc.tokens(), doc.tokens()).unwrap();
	assert_eq!(scores.len(), 3);
	assert!((scores.sum() - 1.0).abs() < 1e-5);
}

#[test]
fn missing_weights_is_resource_not_found() {
	let dir = tempfile::tempdir().unwrap();
	write_model(dir.path(), &architecture(1, Activation::Sigmoid), false);
	fs::remove_file(dir.path().join(WEIGHTS_FILE)).unwrap();

	let err = SimilarityShim::load(dir.path(), &vocab(), None).err().unwrap();
	assert!(matches!(err, ShimError::ResourceNotFound(p) if p.ends_with(WEIGHTS_FILE)));
}

#[test]
fn weights_for_other_architecture_are_schema_mismatch() {
	let dir = tempfile::tempdir().unwrap();
	write_model(dir.path(), &architecture(1, Activation::Sigmoid), false);

	// config now claims a wider hidden layer than the stored weights
	let wider = Architecture::DecomposableAttention(AttentionConfig {
		nr_hidden: 6,
		..architecture(1, Activation::Sigmoid).config().clone()
	});
	let config = ModelConfig {
		model: ArchitectureSource::Inline(wider),
	};
	fs::write(dir.path().join(CONFIG_FILE), serde_json::to_string(&config).unwrap()).unwrap();

	let err = SimilarityShim::load(dir.path(), &vocab(), None).err().unwrap();
	assert!(matches!(err, ShimError::SchemaMismatch(_)));
}

#[test]
fn truncated_weight_list_is_schema_mismatch() {
	let dir = tempfile::tempdir().unwrap();
	let arch = architecture(1, Activation::Sigmoid);
	write_model(dir.path(), &arch, false);

	let mut stored = weights::load(&dir.path().join(WEIGHTS_FILE)).unwrap();
	stored.pop();
	weights::save(&dir.path().join(WEIGHTS_FILE), &stored).unwrap();

	let err = SimilarityShim::load(dir.path(), &vocab(), None).err().unwrap();
	assert!(matches!(err, ShimError::SchemaMismatch(_)));
}

#[test]
fn vectors_of_wrong_width_are_schema_mismatch() {
	let dir = tempfile::tempdir().unwrap();
	write_model(dir.path(), &architecture(1, Activation::Sigmoid), false);

	let mut narrow = Vocab::new(2);
	narrow.add("cat", Some(vec![1.0, 0.0]));
	let err = SimilarityShim::load(dir.path(), &narrow, None).err().unwrap();
	assert!(matches!(err, ShimError::SchemaMismatch(_)));
}

#[test]
fn vocabulary_without_vectors_is_configuration_error() {
	let dir = tempfile::tempdir().unwrap();
	write_model(dir.path(), &architecture(1, Activation::Sigmoid), false);

	let mut empty = Vocab::new(3);
	empty.add("cat", None);
	let err = SimilarityShim::load(dir.path(), &empty, None).err().unwrap();
	assert!(matches!(err, ShimError::ConfigurationError(_)));
}

#[test]
fn failed_load_leaves_shim_unloaded() {
	let dir = tempfile::tempdir().unwrap();
	let mut shim = SimilarityShim::new(None);
	assert!(shim.load_model(dir.path(), &vocab()).is_err());
	assert!(!shim.is_loaded());

	let tokens = vec![Token::word("cat", 1, true)];
	assert!(matches!(shim.predict(&tokens, &tokens), Err(ShimError::NotLoaded)));

	// a later successful load still transitions
	write_model(dir.path(), &architecture(1, Activation::Sigmoid), false);
	shim.load_model(dir.path(), &vocab()).unwrap();
	assert!(shim.predict(&tokens, &tokens).is_ok());
}

#[test]
fn custom_feature_extractor_is_used() {
	let dir = tempfile::tempdir().unwrap();
	write_model(dir.path(), &architecture(1, Activation::Sigmoid), false);
	let vocab = Arc::new(vocab());

	// ignore the document entirely: every doc encodes as "cat"
	let constant: docsim::features::FeatureExtractor = Box::new(|_tokens: &[Token]| {
		let cat = [Token::word("cat", 1, true)];
		get_word_ids(&[&cat[..]], 8)
	});
	let shim = SimilarityShim::load(dir.path(), &vocab, Some(constant)).unwrap();

	let pipeline = Pipeline::new(vocab);
	let a = pipeline.make_doc("the dog").unwrap();
	let b = pipeline.make_doc("mat , sat").unwrap();
	let c = pipeline.make_doc("cat").unwrap();
	assert_eq!(
		shim.predict(a.tokens(), b.tokens()).unwrap(),
		shim.predict(c.tokens(), c.tokens()).unwrap()
	);
}

#[test]
fn extractor_length_must_match_architecture() {
	let dir = tempfile::tempdir().unwrap();
	write_model(dir.path(), &architecture(1, Activation::Sigmoid), false);
	let vocab = vocab();

	let shim = SimilarityShim::load(dir.path(), &vocab, Some(word_ids_extractor(4))).unwrap();
	let tokens = vec![Token::word("cat", 1, true)];
	assert!(matches!(
		shim.predict(&tokens, &tokens),
		Err(ShimError::SchemaMismatch(_))
	));
}

#[test]
fn tokens_from_another_vocabulary_are_out_of_range() {
	let dir = tempfile::tempdir().unwrap();
	write_model(dir.path(), &architecture(1, Activation::Sigmoid), false);
	let shim = SimilarityShim::load(dir.path(), &vocab(), None).unwrap();

	let foreign = vec![Token::word("zebra", 500, true)];
	let known = vec![Token::word("cat", 1, true)];
	assert!(matches!(
		shim.predict(&foreign, &known),
		Err(ShimError::IdOutOfRange { id: 501, .. })
	));
}

#[test]
fn attach_routes_doc_and_span_similarity() {
	let dir = tempfile::tempdir().unwrap();
	write_model(dir.path(), &architecture(1, Activation::Sigmoid), false);
	let vocab = Arc::new(vocab());
	let shim = Arc::new(SimilarityShim::load(dir.path(), &vocab, None).unwrap());

	let pipeline = Pipeline::new(vocab.clone());
	let mut a: Doc = pipeline.make_doc("the cat sat").unwrap();
	let b = pipeline.make_doc("the dog sat").unwrap();
	let fallback = a.similarity(&b).unwrap();

	shim.attach(&mut a);
	assert!(a.has_similarity_hook() && a.has_span_similarity_hook());

	let expected = shim.predict(a.tokens(), b.tokens()).unwrap()[0];
	assert_eq!(a.similarity(&b).unwrap(), expected);
	assert_ne!(a.similarity(&b).unwrap(), fallback);

	let left = a.span(0, 2).unwrap();
	let right = a.span(1, 3).unwrap();
	let expected = shim.predict(left.tokens(), right.tokens()).unwrap()[0];
	assert_eq!(left.similarity(&right).unwrap(), expected);
}

#[test]
fn similarity_pipeline_attaches_to_every_doc() {
	let dir = tempfile::tempdir().unwrap();
	write_model(dir.path(), &architecture(1, Activation::Sigmoid), false);

	let pipeline = create_similarity_pipeline(Arc::new(vocab()), dir.path()).unwrap();
	assert_eq!(pipeline.component_names(), vec!["similarity"]);

	let a = pipeline.process("The cat sat on the mat.").unwrap();
	let b = pipeline.process("A dog sat.").unwrap();
	assert!(a.has_similarity_hook() && b.has_similarity_hook());

	let score = a.similarity(&b).unwrap();
	assert!((0.0..=1.0).contains(&score));
}

#[test]
fn similarity_pipeline_without_model_fails() {
	let dir = tempfile::tempdir().unwrap();
	let err = create_similarity_pipeline(Arc::new(vocab()), dir.path()).err().unwrap();
	assert!(matches!(err, ShimError::ResourceNotFound(_)));
}
