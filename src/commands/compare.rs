//! Compare command - score two texts

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::core::Vocab;
use crate::pipeline::create_similarity_pipeline;
use crate::ui;

pub fn run(vectors: &Path, model: Option<PathBuf>, first: &str, second: &str) -> Result<()> {
	let model_dir = super::resolve_model_dir(model)?;

	let vocab = Vocab::load(vectors).context("Failed to load word vectors")?;

	ui::info("Loading similarity model...");
	let load_start = Instant::now();
	let pipeline = create_similarity_pipeline(Arc::new(vocab), &model_dir)
		.with_context(|| format!("Failed to load model from {}", model_dir.display()))?;
	ui::success(&format!(
		"Model ready in {:.2}s",
		load_start.elapsed().as_secs_f32()
	));

	let doc1 = pipeline.process(first)?;
	let doc2 = pipeline.process(second)?;

	let score = doc1.similarity(&doc2)?;
	ui::debug(&format!(
		"Vector cosine: {:.4}",
		doc1.vector().similarity(&doc2.vector())
	));

	println!();
	println!("  {} {}", "A".bright_blue().bold(), doc1.text());
	println!("  {} {}", "B".bright_blue().bold(), doc2.text());
	println!(
		"  {} {}",
		"Similarity".bright_blue().bold(),
		format!("{:.4}", score).bright_white()
	);
	println!();

	Ok(())
}
