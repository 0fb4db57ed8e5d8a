//! # docsim Library
//!
//! Loads a pretrained decomposable-attention similarity model, injects a
//! vocabulary's word vectors as its embedding layer and registers it as the
//! similarity provider of pipeline documents.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod models;
pub mod pipeline;
pub mod ui;

pub use error::{Result, ShimError};
