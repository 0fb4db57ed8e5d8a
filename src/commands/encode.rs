//! Encode command - show the ids a text feeds the model

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;

use crate::core::Vocab;
use crate::features::doc_to_ids;
use crate::pipeline::Pipeline;
use crate::ui;

pub fn run(vectors: &Path, max_length: usize, text: &str) -> Result<()> {
	let vocab = Vocab::load(vectors).context("Failed to load word vectors")?;
	let pipeline = Pipeline::new(Arc::new(vocab));
	let doc = pipeline.make_doc(text).context("Failed to tokenize text")?;

	ui::header("─── Tokens ───");
	for token in doc.tokens() {
		let kind = if token.is_space {
			"space".dimmed()
		} else if token.is_punct {
			"punct".yellow()
		} else if token.has_vector {
			"word".bright_green()
		} else {
			"oov".bright_red()
		};
		let rank = if token.is_oov() {
			"-".to_string()
		} else {
			token.rank.to_string()
		};
		println!("  {:<6} {:>8}  {:?}", kind, rank, token.text);
	}

	let ids = doc_to_ids(doc.tokens(), max_length);
	let used = ids.iter().filter(|&&id| id != 0).count();
	let shown: Vec<String> = ids.iter().take(used).map(|id| id.to_string()).collect();

	ui::header("─── Ids ───");
	println!("  [{}]", shown.join(", "));
	ui::info(&format!("{} of {} slots used", used, max_length));

	Ok(())
}
