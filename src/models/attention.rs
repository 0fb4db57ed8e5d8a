//! Decomposable attention network (Parikh et al., 2016)
//!
//! Both token sequences are embedded and projected, soft-aligned against each
//! other, compared position by position, summed and classified. Padding ids
//! (0) are masked out of the alignment and the sums.

use ndarray::{concatenate, Array1, Array2, ArrayD, ArrayView1, Axis, Ix1, Ix2};

use super::architecture::{Activation, Architecture, AttentionConfig};
use crate::error::{Result, ShimError};

struct Dense {
	kernel: Array2<f32>,
	bias: Array1<f32>,
}

impl Dense {
	fn forward(&self, x: &Array2<f32>) -> Array2<f32> {
		x.dot(&self.kernel) + &self.bias
	}
}

/// Two relu layers
struct Mlp {
	first: Dense,
	second: Dense,
}

impl Mlp {
	fn forward(&self, x: &Array2<f32>) -> Array2<f32> {
		let hidden = self.first.forward(x).mapv(relu);
		self.second.forward(&hidden).mapv(relu)
	}
}

pub struct DecomposableAttention {
	config: AttentionConfig,
	embeddings: Array2<f32>,
	project: Dense,
	attend: Mlp,
	compare: Mlp,
	aggregate: Mlp,
	output: Dense,
}

impl DecomposableAttention {
	/// Build the network from its full parameter list, embedding table first
	pub fn from_weights(arch: &Architecture, weights: Vec<ArrayD<f32>>) -> Result<Self> {
		arch.validate()?;
		let specs = arch.param_specs();

		if weights.len() != specs.len() {
			return Err(ShimError::SchemaMismatch(format!(
				"{} expects {} weight arrays, got {}",
				arch.class_name(),
				specs.len(),
				weights.len()
			)));
		}
		for (spec, w) in specs.iter().zip(&weights) {
			if !spec.matches(w.shape()) {
				return Err(ShimError::SchemaMismatch(format!(
					"{} expects shape {}, got {:?}",
					spec.name,
					spec.describe(),
					w.shape()
				)));
			}
		}

		let mut params = weights.into_iter();
		let embeddings = next_matrix(&mut params)?;
		let project = next_dense(&mut params)?;
		let attend = next_mlp(&mut params)?;
		let compare = next_mlp(&mut params)?;
		let aggregate = next_mlp(&mut params)?;
		let output = next_dense(&mut params)?;

		Ok(Self {
			config: arch.config().clone(),
			embeddings,
			project,
			attend,
			compare,
			aggregate,
			output,
		})
	}

	pub fn config(&self) -> &AttentionConfig {
		&self.config
	}

	pub fn embedding_rows(&self) -> usize {
		self.embeddings.nrows()
	}

	/// Score a batch of id pairs, returning (batch, nr_class)
	pub fn predict(&self, x1: &Array2<i32>, x2: &Array2<i32>) -> Result<Array2<f32>> {
		if x1.nrows() != x2.nrows() {
			return Err(ShimError::SchemaMismatch(format!(
				"input batches differ: {} vs {}",
				x1.nrows(),
				x2.nrows()
			)));
		}
		for x in [x1, x2] {
			if x.ncols() != self.config.max_length {
				return Err(ShimError::SchemaMismatch(format!(
					"expected sequences of length {}, got {}",
					self.config.max_length,
					x.ncols()
				)));
			}
		}

		let mut scores = Array2::<f32>::zeros((x1.nrows(), self.config.nr_class));
		for (i, mut row) in scores.rows_mut().into_iter().enumerate() {
			row.assign(&self.predict_pair(x1.row(i), x2.row(i))?);
		}
		Ok(scores)
	}

	fn predict_pair(&self, ids1: ArrayView1<i32>, ids2: ArrayView1<i32>) -> Result<Array1<f32>> {
		let (a, mask_a) = self.embed(ids1)?;
		let (b, mask_b) = self.embed(ids2)?;

		let a = self.project.forward(&a);
		let b = self.project.forward(&b);

		// e[i, j] = F(a_i) . F(b_j)
		let scores = self.attend.forward(&a).dot(&self.attend.forward(&b).t());
		let beta = masked_softmax(&scores, &mask_b).dot(&b);
		let alpha = masked_softmax(&scores.t().to_owned(), &mask_a).dot(&a);

		let v1 = self.compare.forward(&concat(&a, &beta)?);
		let v2 = self.compare.forward(&concat(&b, &alpha)?);

		let s1 = masked_sum(&v1, &mask_a);
		let s2 = masked_sum(&v2, &mask_b);
		let pooled = concatenate(Axis(0), &[s1.view(), s2.view()])
			.map_err(|e| ShimError::SchemaMismatch(e.to_string()))?
			.insert_axis(Axis(0));

		let hidden = self.aggregate.forward(&pooled);
		let logits = self.output.forward(&hidden).row(0).to_owned();

		Ok(match self.config.activation {
			Activation::Sigmoid => logits.mapv(sigmoid),
			Activation::Softmax => softmax(logits),
		})
	}

	/// Look up embedding rows, returning the padding mask alongside
	fn embed(&self, ids: ArrayView1<i32>) -> Result<(Array2<f32>, Vec<bool>)> {
		let rows = self.embeddings.nrows();
		let mut index = Vec::with_capacity(ids.len());
		for &id in ids {
			match usize::try_from(id) {
				Ok(row) if row < rows => index.push(row),
				_ => return Err(ShimError::IdOutOfRange { id, rows }),
			}
		}
		let mask = index.iter().map(|&row| row != 0).collect();
		Ok((self.embeddings.select(Axis(0), &index), mask))
	}
}

fn relu(x: f32) -> f32 {
	x.max(0.0)
}

fn sigmoid(x: f32) -> f32 {
	1.0 / (1.0 + (-x).exp())
}

fn softmax(logits: Array1<f32>) -> Array1<f32> {
	let max = logits.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
	let exp = logits.mapv(|v| (v - max).exp());
	let total = exp.sum();
	exp / total
}

/// Row-wise softmax over unmasked columns; rows with no valid column stay zero
fn masked_softmax(scores: &Array2<f32>, mask: &[bool]) -> Array2<f32> {
	let mut out = Array2::<f32>::zeros(scores.raw_dim());
	for (input, mut output) in scores.rows().into_iter().zip(out.rows_mut()) {
		let max = input
			.iter()
			.zip(mask)
			.filter(|(_, valid)| **valid)
			.fold(f32::NEG_INFINITY, |m, (&v, _)| m.max(v));
		if !max.is_finite() {
			continue;
		}

		let mut total = 0.0;
		for ((o, &v), &valid) in output.iter_mut().zip(input.iter()).zip(mask) {
			if valid {
				*o = (v - max).exp();
				total += *o;
			}
		}
		output.mapv_inplace(|v| v / total);
	}
	out
}

fn masked_sum(x: &Array2<f32>, mask: &[bool]) -> Array1<f32> {
	let mut sum = Array1::<f32>::zeros(x.ncols());
	for (row, _) in x.rows().into_iter().zip(mask).filter(|(_, valid)| **valid) {
		sum += &row;
	}
	sum
}

fn concat(a: &Array2<f32>, b: &Array2<f32>) -> Result<Array2<f32>> {
	concatenate(Axis(1), &[a.view(), b.view()]).map_err(|e| ShimError::SchemaMismatch(e.to_string()))
}

fn next_param(params: &mut impl Iterator<Item = ArrayD<f32>>) -> Result<ArrayD<f32>> {
	params
		.next()
		.ok_or_else(|| ShimError::SchemaMismatch("weight list ended early".to_string()))
}

fn next_matrix(params: &mut impl Iterator<Item = ArrayD<f32>>) -> Result<Array2<f32>> {
	next_param(params)?
		.into_dimensionality::<Ix2>()
		.map_err(|e| ShimError::SchemaMismatch(e.to_string()))
}

fn next_vector(params: &mut impl Iterator<Item = ArrayD<f32>>) -> Result<Array1<f32>> {
	next_param(params)?
		.into_dimensionality::<Ix1>()
		.map_err(|e| ShimError::SchemaMismatch(e.to_string()))
}

fn next_dense(params: &mut impl Iterator<Item = ArrayD<f32>>) -> Result<Dense> {
	Ok(Dense {
		kernel: next_matrix(params)?,
		bias: next_vector(params)?,
	})
}

fn next_mlp(params: &mut impl Iterator<Item = ArrayD<f32>>) -> Result<Mlp> {
	Ok(Mlp {
		first: next_dense(params)?,
		second: next_dense(params)?,
	})
}
