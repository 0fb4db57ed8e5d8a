//! # Command Implementations
//!
//! Each submodule handles one CLI command (init, compare, encode, inspect).

pub mod compare;
pub mod encode;
pub mod init;
pub mod inspect;

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config;

/// Model directory from --model, falling back to the configured locations
fn resolve_model_dir(model: Option<PathBuf>) -> Result<PathBuf> {
	if let Some(dir) = model {
		config::set_model_dir(dir);
	}

	let dir = config::model_dir().context(format!(
		"Model directory not found. Pass --model or set {}",
		config::MODEL_DIR_ENV
	))?;

	if !dir.is_dir() {
		anyhow::bail!("Model directory does not exist: {}", dir.display());
	}

	Ok(dir)
}
