//! Model architecture description stored in config.json

use ndarray::{ArrayD, IxDyn};
use rand::{Rng, RngExt};
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_CLASSES, DEFAULT_HIDDEN, DEFAULT_MAX_LENGTH};
use crate::error::{Result, ShimError};

/// Output layer activation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
	#[default]
	Sigmoid,
	Softmax,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttentionConfig {
	#[serde(default = "default_max_length")]
	pub max_length: usize,
	pub embed_dim: usize,
	#[serde(default = "default_hidden")]
	pub nr_hidden: usize,
	#[serde(default = "default_classes")]
	pub nr_class: usize,
	#[serde(default)]
	pub activation: Activation,
}

fn default_max_length() -> usize {
	DEFAULT_MAX_LENGTH
}

fn default_hidden() -> usize {
	DEFAULT_HIDDEN
}

fn default_classes() -> usize {
	DEFAULT_CLASSES
}

/// Serialized architecture, `{"class_name": ..., "config": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class_name", content = "config")]
pub enum Architecture {
	DecomposableAttention(AttentionConfig),
}

/// Expected parameter shape; `None` dimensions are sized by the vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
	pub name: &'static str,
	pub shape: Vec<Option<usize>>,
}

impl ParamSpec {
	fn new(name: &'static str, shape: &[usize]) -> Self {
		Self {
			name,
			shape: shape.iter().copied().map(Some).collect(),
		}
	}

	pub fn matches(&self, shape: &[usize]) -> bool {
		self.shape.len() == shape.len()
			&& self
				.shape
				.iter()
				.zip(shape)
				.all(|(expected, &actual)| expected.map_or(true, |e| e == actual))
	}

	pub fn describe(&self) -> String {
		let dims: Vec<String> = self
			.shape
			.iter()
			.map(|d| d.map_or_else(|| "?".to_string(), |d| d.to_string()))
			.collect();
		format!("({})", dims.join(", "))
	}
}

impl Architecture {
	pub fn config(&self) -> &AttentionConfig {
		match self {
			Architecture::DecomposableAttention(config) => config,
		}
	}

	pub fn class_name(&self) -> &'static str {
		match self {
			Architecture::DecomposableAttention(_) => "DecomposableAttention",
		}
	}

	pub fn validate(&self) -> Result<()> {
		let c = self.config();
		for (name, value) in [
			("max_length", c.max_length),
			("embed_dim", c.embed_dim),
			("nr_hidden", c.nr_hidden),
			("nr_class", c.nr_class),
		] {
			if value == 0 {
				return Err(ShimError::SchemaMismatch(format!("{} must be positive", name)));
			}
		}
		Ok(())
	}

	/// Parameter list in model order; index 0 is the embedding table
	pub fn param_specs(&self) -> Vec<ParamSpec> {
		let c = self.config();
		let (e, h, k) = (c.embed_dim, c.nr_hidden, c.nr_class);

		let mut specs = vec![
			ParamSpec {
				name: "embedding",
				shape: vec![None, Some(e)],
			},
			ParamSpec::new("project/kernel", &[e, h]),
			ParamSpec::new("project/bias", &[h]),
		];
		for (names, input) in [(ATTEND, h), (COMPARE, 2 * h), (AGGREGATE, 2 * h)] {
			specs.extend(mlp_specs(names, input, h));
		}
		specs.push(ParamSpec::new("output/kernel", &[h, k]));
		specs.push(ParamSpec::new("output/bias", &[k]));
		specs
	}

	/// Glorot-uniform kernels and zero biases for every stored parameter (all but the embedding)
	pub fn random_weights<R: Rng>(&self, rng: &mut R) -> Vec<ArrayD<f32>> {
		self.param_specs()
			.iter()
			.skip(1)
			.map(|spec| {
				let shape: Vec<usize> = spec.shape.iter().map(|d| d.unwrap_or(0)).collect();
				match shape.as_slice() {
					[fan_in, fan_out] => {
						let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
						ArrayD::from_shape_simple_fn(IxDyn(&shape), || {
							rng.random_range(-limit..limit)
						})
					}
					_ => ArrayD::zeros(IxDyn(&shape)),
				}
			})
			.collect()
	}
}

const ATTEND: [&str; 4] = ["attend/0/kernel", "attend/0/bias", "attend/1/kernel", "attend/1/bias"];
const COMPARE: [&str; 4] = ["compare/0/kernel", "compare/0/bias", "compare/1/kernel", "compare/1/bias"];
const AGGREGATE: [&str; 4] = [
	"aggregate/0/kernel",
	"aggregate/0/bias",
	"aggregate/1/kernel",
	"aggregate/1/bias",
];

/// Two dense layers: input -> hidden -> hidden
fn mlp_specs(names: [&'static str; 4], input: usize, hidden: usize) -> [ParamSpec; 4] {
	[
		ParamSpec::new(names[0], &[input, hidden]),
		ParamSpec::new(names[1], &[hidden]),
		ParamSpec::new(names[2], &[hidden, hidden]),
		ParamSpec::new(names[3], &[hidden]),
	]
}

/// The `model` entry may be inline JSON or a JSON-encoded string
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArchitectureSource {
	Encoded(String),
	Inline(Architecture),
}

impl ArchitectureSource {
	pub fn resolve(self) -> serde_json::Result<Architecture> {
		match self {
			ArchitectureSource::Encoded(json) => serde_json::from_str(&json),
			ArchitectureSource::Inline(arch) => Ok(arch),
		}
	}
}

/// Contents of config.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
	pub model: ArchitectureSource,
}
