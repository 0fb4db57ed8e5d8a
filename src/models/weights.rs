//! Weight list file format and I/O

use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, ShimError};

/// One parameter array as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightArray {
	pub shape: Vec<usize>,
	pub data: Vec<f32>,
}

impl WeightArray {
	pub fn from_array(array: &ArrayD<f32>) -> Self {
		Self {
			shape: array.shape().to_vec(),
			data: array.iter().copied().collect(),
		}
	}

	pub fn into_array(self) -> Result<ArrayD<f32>> {
		let expected: usize = self.shape.iter().product();
		if expected != self.data.len() {
			return Err(ShimError::SchemaMismatch(format!(
				"weight of shape {:?} holds {} values",
				self.shape,
				self.data.len()
			)));
		}
		ArrayD::from_shape_vec(IxDyn(&self.shape), self.data)
			.map_err(|e| ShimError::SchemaMismatch(e.to_string()))
	}
}

/// Load weight list from disk
pub fn load(path: &Path) -> Result<Vec<ArrayD<f32>>> {
	if !path.exists() {
		return Err(ShimError::ResourceNotFound(path.to_path_buf()));
	}

	let bytes = fs::read(path)?;
	let stored: Vec<WeightArray> =
		rmp_serde::from_slice(&bytes).map_err(|e| ShimError::Deserialize {
			path: path.to_path_buf(),
			reason: e.to_string(),
		})?;

	stored.into_iter().map(WeightArray::into_array).collect()
}

/// Save weight list to disk
pub fn save(path: &Path, weights: &[ArrayD<f32>]) -> Result<()> {
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent)?;
	}

	let stored: Vec<WeightArray> = weights.iter().map(WeightArray::from_array).collect();
	let bytes = rmp_serde::to_vec(&stored).map_err(std::io::Error::other)?;
	fs::write(path, bytes)?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use ndarray::array;

	#[test]
	fn save_then_load_preserves_shapes() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("model");
		let weights = vec![
			array![[1.0f32, 2.0], [3.0, 4.0], [5.0, 6.0]].into_dyn(),
			array![0.5f32, -0.5].into_dyn(),
		];

		save(&path, &weights).unwrap();
		let loaded = load(&path).unwrap();
		assert_eq!(loaded, weights);
	}

	#[test]
	fn garbage_is_deserialize_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("model");
		fs::write(&path, b"not messagepack").unwrap();
		assert!(matches!(load(&path), Err(ShimError::Deserialize { .. })));
	}

	#[test]
	fn inconsistent_length_is_schema_mismatch() {
		let w = WeightArray {
			shape: vec![2, 2],
			data: vec![1.0, 2.0, 3.0],
		};
		assert!(matches!(w.into_array(), Err(ShimError::SchemaMismatch(_))));
	}
}
