//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::extract::DocLanguage;

/// Top-level CLI parser for `glean`.
#[derive(Debug, Parser)]
#[command(name = "glean", version, about = "Extract doc comments and endpoint references into Markdown reports")]
pub struct Cli {
    /// Configuration file (defaults to `.glean.yaml` in the working directory).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `glean=trace`. `GLEAN_LOG` takes precedence.
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Log output format.
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Diagnostic log formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Multi-line, human-readable.
    Pretty,
    /// One line per event.
    Compact,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Name understood by [`crate::logging::init`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Json => "json",
        }
    }
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write one Markdown page per source file with substantial doc comments.
    Docs {
        /// Source language to extract.
        #[command(subcommand)]
        language: DocsCommand,
    },
    /// List client-side endpoint references and the files using them.
    Endpoints {
        /// Project root; `<root>/src` is preferred when present.
        #[arg(default_value = ".")]
        root: PathBuf,
        /// Markdown report path.
        #[arg(short, long, default_value = "api_references.md")]
        output: PathBuf,
        /// Also write every raw match as NDJSON.
        #[arg(long)]
        debug: bool,
        /// Path of the NDJSON debug log.
        #[arg(long, default_value = "api_references_debug.log")]
        debug_output: PathBuf,
    },
    /// List `[HttpPost]` controller routes, optionally split by client usage.
    Routes {
        /// Root searched for `*controller.cs` files.
        #[arg(default_value = ".")]
        root: PathBuf,
        /// Markdown report path.
        #[arg(short, long, default_value = "post_endpoints.md")]
        output: PathBuf,
        /// Endpoint list from `glean endpoints`; switches to the referenced/unreferenced report.
        #[arg(long, value_name = "MD")]
        references: Option<PathBuf>,
        /// Title of the combined report.
        #[arg(long)]
        title: Option<String>,
        /// Keep only actions reachable without authentication.
        #[arg(long)]
        anonymous_only: bool,
    },
    /// Count CSS/SCSS property usage by family.
    Css {
        /// Root folder to scan.
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Report directory (defaults to `_outputs/lists/<MMDD>`).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Create or refresh `index.ts` barrels in every directory.
    Barrel {
        /// Root folder.
        folder: PathBuf,
    },
    /// Write a Markdown checklist of matching files, one heading per directory.
    List {
        /// Root folder to scan.
        #[arg(default_value = ".")]
        root: PathBuf,
        /// Extension to include, without the dot; repeatable.
        #[arg(long = "ext", value_name = "EXT")]
        extensions: Vec<String>,
        /// Report path (defaults to `_outputs/lists/file_list.md`).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List TypeScript files without substantial JSDoc.
    Undocumented {
        /// Source folder to scan.
        #[arg(default_value = "src")]
        folder: PathBuf,
        /// Report path.
        #[arg(short, long, default_value = "docs/autodocs/not-documented.md")]
        output: PathBuf,
    },
}

impl Command {
    /// Subcommand name, used to label recordings.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Docs { language: DocsCommand::Ts(_) } => "docs ts",
            Self::Docs { language: DocsCommand::Cs(_) } => "docs cs",
            Self::Docs { language: DocsCommand::Py(_) } => "docs py",
            Self::Endpoints { .. } => "endpoints",
            Self::Routes { .. } => "routes",
            Self::Css { .. } => "css",
            Self::Barrel { .. } => "barrel",
            Self::List { .. } => "list",
            Self::Undocumented { .. } => "undocumented",
        }
    }
}

/// `docs` languages.
#[derive(Debug, Subcommand)]
pub enum DocsCommand {
    /// JSDoc in TypeScript and JavaScript.
    Ts(DocsArgs),
    /// XML doc comments in C#.
    Cs(DocsArgs),
    /// Python docstrings.
    Py(DocsArgs),
}

impl DocsCommand {
    /// Language and arguments.
    #[must_use]
    pub fn parts(&self) -> (DocLanguage, &DocsArgs) {
        match self {
            Self::Ts(args) => (DocLanguage::TypeScript, args),
            Self::Cs(args) => (DocLanguage::CSharp, args),
            Self::Py(args) => (DocLanguage::Python, args),
        }
    }
}

/// Arguments shared by every `docs` language.
#[derive(Debug, Args)]
pub struct DocsArgs {
    /// Folder to search.
    pub folder: PathBuf,
    /// Output directory for the Markdown pages.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
