//! Inspect command - show architecture and weight shapes

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use crate::config::{CONFIG_FILE, WEIGHTS_FILE};
use crate::models::{weights, ModelConfig};
use crate::ui;

pub fn run(model: Option<PathBuf>) -> Result<()> {
	let dir = super::resolve_model_dir(model)?;
	ui::info(&format!("Model: {}", ui::path_link(&dir)));

	let text = fs::read_to_string(dir.join(CONFIG_FILE)).context("Failed to read config.json")?;
	let config: ModelConfig = serde_json::from_str(&text).context("Failed to parse config.json")?;
	let arch = config.model.resolve().context("Failed to parse model architecture")?;
	let c = arch.config();

	ui::header(&format!("─── {} ───", arch.class_name()));
	println!("  max_length  {}", c.max_length);
	println!("  embed_dim   {}", c.embed_dim);
	println!("  nr_hidden   {}", c.nr_hidden);
	println!("  nr_class    {}", c.nr_class);
	println!("  activation  {:?}", c.activation);

	let stored = weights::load(&dir.join(WEIGHTS_FILE))?;
	let specs = arch.param_specs();

	ui::header("─── Parameters ───");
	let mut mismatches = 0;
	for (i, spec) in specs.iter().enumerate() {
		// index 0 comes from the vocabulary at load time
		let actual = if i == 0 {
			None
		} else {
			stored.get(i - 1).map(|w| w.shape().to_vec())
		};

		let status = match &actual {
			None if i == 0 => "vocab".dimmed(),
			Some(shape) if spec.matches(shape) => "ok".bright_green(),
			_ => {
				mismatches += 1;
				"mismatch".bright_red()
			}
		};

		let shape = actual.map_or_else(|| spec.describe(), |s| format!("{:?}", s));
		println!("  {:>2} {:<20} {:<14} {}", i, spec.name, shape, status);
	}

	if stored.len() + 1 != specs.len() {
		ui::warn(&format!(
			"Weights file holds {} arrays, architecture expects {}",
			stored.len(),
			specs.len() - 1
		));
	} else if mismatches > 0 {
		ui::warn(&format!("{} parameters disagree with the architecture", mismatches));
	} else {
		ui::success("Weights match the architecture");
	}

	Ok(())
}
