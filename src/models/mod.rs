//! # Similarity Model
//!
//! Architecture description, stored weights, the attention network and the
//! shim that serves it as a document similarity provider.

pub mod architecture;
pub mod attention;
pub mod shim;
pub mod weights;

pub use architecture::{
	Activation, Architecture, ArchitectureSource, AttentionConfig, ModelConfig, ParamSpec,
};
pub use attention::DecomposableAttention;
pub use shim::SimilarityShim;
