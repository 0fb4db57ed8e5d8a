//! Core domain types

pub mod doc;
pub mod embedding;
pub mod token;
pub mod vocab;

pub use doc::{Doc, SimilarityHook, Span};
pub use embedding::Embedding;
pub use token::Token;
pub use vocab::{Lexeme, Vocab};
