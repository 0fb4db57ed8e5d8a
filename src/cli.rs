use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{DEFAULT_CLASSES, DEFAULT_HIDDEN, DEFAULT_MAX_LENGTH, DEFAULT_SEED};
use crate::models::Activation;

fn styles() -> Styles {
	let blue = Some(Color::Ansi(AnsiColor::Blue));
	Styles::styled()
		.header(Style::new().bold().fg_color(blue))
		.usage(Style::new().bold().fg_color(blue))
		.literal(Style::new().fg_color(blue))
		.placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
		.valid(Style::new().fg_color(blue))
		.invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))))
}

fn parse_activation(s: &str) -> Result<Activation, String> {
	match s.to_ascii_lowercase().as_str() {
		"sigmoid" => Ok(Activation::Sigmoid),
		"softmax" => Ok(Activation::Softmax),
		_ => Err(format!("'{}' is not an activation (sigmoid, softmax)", s)),
	}
}

#[derive(Parser, Debug)]
#[command(
	name = "docsim",
	author,
	version,
	about = "Neural document similarity with pretrained word vectors",
	styles = styles(),
	after_help = format!(
		"{title}
  {docsim} {init}     {init_args}   {init_desc}
  {docsim} {compare}  {compare_args}   {compare_desc}
  {docsim} {encode}   {encode_args}            {encode_desc}
  {docsim} {inspect}  {inspect_args}                     {inspect_desc}",
		title = "Examples:".bright_blue().bold(),
		docsim = "docsim".bright_blue(),
		init = "init".yellow(),
		init_args = "-V vectors.txt -o model/",
		init_desc = "Create an untrained model".dimmed(),
		compare = "compare".yellow(),
		compare_args = "-V vectors.txt \"a cat\" \"a dog\"",
		compare_desc = "Score two texts".dimmed(),
		encode = "encode".yellow(),
		encode_args = "-V vectors.txt \"a cat\"",
		encode_desc = "Show token ids".dimmed(),
		inspect = "inspect".yellow(),
		inspect_args = "-m model/",
		inspect_desc = "Show weight shapes".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose", global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Write a randomly initialised model sized to a vectors file
	Init {
		/// Word vectors file (word2vec text format)
		#[arg(short = 'V', long = "vectors", value_name = "FILE")]
		vectors: PathBuf,

		/// Output model directory
		#[arg(short = 'o', long = "out", value_name = "DIR")]
		out: PathBuf,

		/// Hidden layer width
		#[arg(long = "hidden", default_value_t = DEFAULT_HIDDEN)]
		hidden: usize,

		/// Number of output classes
		#[arg(long = "classes", default_value_t = DEFAULT_CLASSES)]
		classes: usize,

		/// Output activation: sigmoid or softmax
		#[arg(long = "activation", default_value = "sigmoid", value_parser = parse_activation)]
		activation: Activation,

		/// Tokens kept per document
		#[arg(long = "max-length", default_value_t = DEFAULT_MAX_LENGTH)]
		max_length: usize,

		/// Random seed
		#[arg(long = "seed", default_value_t = DEFAULT_SEED)]
		seed: u64,

		/// Overwrite an existing model
		#[arg(short = 'f', long = "force")]
		force: bool,
	},

	/// Score the similarity of two texts
	Compare {
		/// Word vectors file (word2vec text format)
		#[arg(short = 'V', long = "vectors", value_name = "FILE")]
		vectors: PathBuf,

		/// Model directory (defaults to DOCSIM_MODEL_DIR)
		#[arg(short = 'm', long = "model", value_name = "DIR")]
		model: Option<PathBuf>,

		/// First text
		first: String,

		/// Second text
		second: String,
	},

	/// Print the token ids a text encodes to
	Encode {
		/// Word vectors file (word2vec text format)
		#[arg(short = 'V', long = "vectors", value_name = "FILE")]
		vectors: PathBuf,

		/// Tokens kept per document
		#[arg(long = "max-length", default_value_t = DEFAULT_MAX_LENGTH)]
		max_length: usize,

		/// Text to encode
		text: String,
	},

	/// Show a model's architecture and stored weight shapes
	Inspect {
		/// Model directory (defaults to DOCSIM_MODEL_DIR)
		#[arg(short = 'm', long = "model", value_name = "DIR")]
		model: Option<PathBuf>,
	},
}
