//! Core library entry for the `glean` CLI.
//!
//! Source trees are scanned with regex-driven extraction: files are walked
//! through the [`ports::FileSystem`] port, literals and comments are masked,
//! tagged records are pulled out, and the results are rendered as Markdown.

pub mod adapters;
pub mod barrel;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod css;
pub mod docs;
pub mod error;
pub mod extract;
pub mod logging;
pub mod mask;
pub mod output;
pub mod ports;
pub mod render;
pub mod scan;

use clap::Parser;

use crate::config::GleanConfig;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing, configuration loading,
/// or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    let cwd = std::env::current_dir().map_err(|e| format!("cannot resolve working directory: {e}"))?;
    let config = GleanConfig::load(cli.config.as_deref(), &cwd).map_err(|e| e.to_string())?;

    let level = if cli.quiet {
        "warn".to_string()
    } else {
        cli.log_level.clone().unwrap_or_else(|| config.logging.level.clone())
    };
    let format = match cli.log_format {
        Some(format) => format.as_str(),
        None => config.logging.format.as_str(),
    };
    logging::init(&level, format);

    commands::dispatch(&cli.command, &config)
}
