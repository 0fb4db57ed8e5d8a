//! docsim - neural document similarity
//!
//! Command-line front-end for creating, inspecting and querying similarity models.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use docsim::cli::{Cli, Command};
use docsim::commands;
use docsim::commands::init::InitOptions;
use docsim::ui;

fn main() {
	let cli = Cli::parse();
	ui::Log::set_verbose(cli.verbose);

	if let Err(e) = run(cli.command) {
		ui::error(&format!("{:#}", e));
		std::process::exit(1);
	}
}

fn run(command: Command) -> Result<()> {
	print_header();

	match command {
		Command::Init {
			vectors,
			out,
			hidden,
			classes,
			activation,
			max_length,
			seed,
			force,
		} => {
			let options = InitOptions {
				hidden,
				classes,
				activation,
				max_length,
				seed,
				force,
			};
			commands::init::run(&vectors, &out, &options)
		}
		Command::Compare {
			vectors,
			model,
			first,
			second,
		} => commands::compare::run(&vectors, model, &first, &second),
		Command::Encode {
			vectors,
			max_length,
			text,
		} => commands::encode::run(&vectors, max_length, &text),
		Command::Inspect { model } => commands::inspect::run(model),
	}
}

fn print_header() {
	println!();
	println!(
		"{}",
		format!("─── docsim v{} ───", env!("CARGO_PKG_VERSION"))
			.bright_blue()
			.bold()
	);
}
