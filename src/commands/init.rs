//! Init command - write an untrained model bundle

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::Path;

use crate::config::{CONFIG_FILE, WEIGHTS_FILE};
use crate::core::Vocab;
use crate::models::{weights, Activation, Architecture, AttentionConfig, ArchitectureSource, ModelConfig};
use crate::ui;

pub struct InitOptions {
	pub hidden: usize,
	pub classes: usize,
	pub activation: Activation,
	pub max_length: usize,
	pub seed: u64,
	pub force: bool,
}

pub fn run(vectors: &Path, out: &Path, options: &InitOptions) -> Result<()> {
	let config_path = out.join(CONFIG_FILE);
	let weights_path = out.join(WEIGHTS_FILE);

	if !options.force && (config_path.exists() || weights_path.exists()) {
		anyhow::bail!(
			"Model already exists in {} (use --force to overwrite)",
			out.display()
		);
	}

	let vocab = Vocab::load(vectors).context("Failed to load word vectors")?;
	if vocab.n_vectors() == 0 {
		anyhow::bail!("No word vectors in {}", vectors.display());
	}

	let arch = Architecture::DecomposableAttention(AttentionConfig {
		max_length: options.max_length,
		embed_dim: vocab.vectors_length(),
		nr_hidden: options.hidden,
		nr_class: options.classes,
		activation: options.activation,
	});
	arch.validate()?;

	let mut rng = StdRng::seed_from_u64(options.seed);
	let stored = arch.random_weights(&mut rng);

	fs::create_dir_all(out).context("Failed to create model directory")?;

	let config = ModelConfig {
		model: ArchitectureSource::Inline(arch.clone()),
	};
	let json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
	fs::write(&config_path, json).context("Failed to write config.json")?;
	weights::save(&weights_path, &stored).context("Failed to write weights")?;

	ui::debug(&format!("Stored {} weight arrays", stored.len()));
	ui::success(&format!(
		"Initialised {} ({}d vectors, {} hidden) in {}",
		arch.class_name(),
		vocab.vectors_length(),
		options.hidden,
		ui::path_link(out)
	));

	Ok(())
}
