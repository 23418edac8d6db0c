use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Replace configured identifier tokens in source files, with source maps.",
	long_about = "subst applies the token replacements defined in subst.toml to source \
	              files.\n\nKeys are matched lexically on word boundaries (or inside configured \
	              delimiters), longest key first, and every rewritten file can carry a \
	              position-accurate source map.\n\nQuick start:\n  subst check   Report files with \
	              pending replacements\n  subst apply   Rewrite files in place"
)]
pub struct SubstCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Explicit config file path, bypassing discovery of subst.toml.
	#[arg(long, short, global = true)]
	pub config: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Apply replacements to files.
	///
	/// Scans the given files (or walks the project root when none are
	/// given, honoring the config's include/exclude patterns) and rewrites
	/// every configured token occurrence. When source maps are enabled a
	/// `<file>.map` is written next to each rewritten file with `--map`.
	Apply {
		/// Files to transform. When empty, the project root is walked and
		/// every file passing the include/exclude filter is considered.
		paths: Vec<PathBuf>,

		/// Preview which files would change without writing anything.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Print the transformed text of a single file to stdout instead
		/// of writing it back.
		#[arg(long, default_value_t = false)]
		stdout: bool,

		/// Write a `<file>.map` source map next to each rewritten file.
		#[arg(long, default_value_t = false)]
		map: bool,
	},
	/// Check whether any file still contains pending replacements.
	///
	/// Exits with a non-zero status code when at least one file would be
	/// rewritten by `subst apply`. Ideal for CI pipelines.
	Check {
		/// Files to check. When empty, the project root is walked.
		paths: Vec<PathBuf>,

		/// Output format for check results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
