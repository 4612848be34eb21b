//! Fluent CLI entry point.
//!
//! Provides command-line tools for working with Fluent localization files:
//! - `ftl check` - Validate .ftl file syntax
//! - `ftl dump` - Print the AST of a file as JSON
//! - `ftl format` - Format one message from a locale directory
//! - `ftl coverage` - Compare message coverage across locales

mod commands;
mod output;

use std::process::exit;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{
    CheckArgs, CoverageArgs, DumpArgs, FormatArgs, run_check, run_coverage, run_dump, run_format,
};

/// Fluent localization file tools.
#[derive(Debug, Parser)]
#[command(name = "ftl")]
#[command(about = "Fluent localization file tools", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Color output control
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto, global = true)]
    pub color: ColorWhen,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// When to use colored output.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check .ftl file syntax
    Check(CheckArgs),
    /// Print the parsed AST of an .ftl file as JSON
    Dump(DumpArgs),
    /// Format a message from a directory of locale resources
    Format(FormatArgs),
    /// Report translation coverage across locales
    Coverage(CoverageArgs),
}

fn setup_colors(color_when: ColorWhen) {
    match color_when {
        // owo-colors checks TTY, NO_COLOR and FORCE_COLOR on its own
        ColorWhen::Auto => {}
        ColorWhen::Always => owo_colors::set_override(true),
        ColorWhen::Never => owo_colors::set_override(false),
    }
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    setup_colors(cli.color);

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;

    let result = match cli.command {
        Commands::Check(args) => run_check(&args, cli.verbose),
        Commands::Dump(args) => run_dump(&args),
        Commands::Format(args) => run_format(args, cli.verbose),
        Commands::Coverage(args) => run_coverage(&args),
    };

    match result {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("{e:?}");
            exit(exitcode::SOFTWARE);
        }
    }
}
