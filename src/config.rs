//! Application configuration and constants

use std::path::PathBuf;
use std::sync::OnceLock;

static CUSTOM_MODEL_DIR: OnceLock<PathBuf> = OnceLock::new();

// === Model Files ===
pub const CONFIG_FILE: &str = "config.json";
pub const WEIGHTS_FILE: &str = "model";
pub const MODEL_SUBDIR: &str = "similarity";
pub const MODEL_DIR_ENV: &str = "DOCSIM_MODEL_DIR";

// === Model Parameters ===
pub const DEFAULT_MAX_LENGTH: usize = 100;
pub const DEFAULT_HIDDEN: usize = 200;
pub const DEFAULT_CLASSES: usize = 1;
pub const DEFAULT_SEED: u64 = 1234;

// === Vocabulary ===
/// Rank given to tokens whose text is not in the vocabulary
pub const OOV_RANK: usize = usize::MAX;

pub fn set_model_dir(path: PathBuf) {
	let _ = CUSTOM_MODEL_DIR.set(path);
}

/// Get model directory (--model, DOCSIM_MODEL_DIR, or models/similarity next to the executable)
pub fn model_dir() -> Option<PathBuf> {
	if let Some(custom) = CUSTOM_MODEL_DIR.get() {
		crate::ui::debug(&format!("Using custom model dir: {}", custom.display()));
		return Some(custom.clone());
	}

	if let Ok(env_path) = std::env::var(MODEL_DIR_ENV) {
		let path = PathBuf::from(&env_path);
		if path.is_dir() {
			crate::ui::debug(&format!("Using {}: {}", MODEL_DIR_ENV, env_path));
			return Some(path);
		}
	}

	if let Ok(exe) = std::env::current_exe() {
		if let Some(dir) = exe.parent() {
			let models = dir.join("models").join(MODEL_SUBDIR);
			if models.is_dir() {
				crate::ui::debug(&format!("Found model at: {}", models.display()));
				return Some(models);
			}
		}
	}

	None
}
