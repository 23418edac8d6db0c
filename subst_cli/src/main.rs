use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use subst_cli::Commands;
use subst_cli::OutputFormat;
use subst_cli::SubstCli;
use subst_core::ReplacePlugin;
use subst_core::SubstFileConfig;
use subst_core::Transformed;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = SubstCli::parse();

	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_writer(std::io::stderr)
		.init();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match args.command {
		Some(Commands::Apply {
			ref paths,
			dry_run,
			stdout,
			map,
		}) => run_apply(&args, paths, dry_run, stdout, map),
		Some(Commands::Check { ref paths, format }) => run_check(&args, paths, format),
		None => {
			eprintln!("No subcommand specified. Run `subst --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<subst_core::SubstError>() {
			Ok(subst_err) => {
				let report: miette::Report = (*subst_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn resolve_root(args: &SubstCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// The plugin plus everything needed to locate and name files.
struct Session {
	root: PathBuf,
	config_path: Option<PathBuf>,
	plugin: ReplacePlugin,
}

fn open_session(args: &SubstCli) -> Result<Option<Session>, Box<dyn std::error::Error>> {
	let root = resolve_root(args);

	let (config, config_path) = if let Some(path) = &args.config {
		(Some(SubstFileConfig::load_file(path)?), Some(path.clone()))
	} else {
		let config_path = SubstFileConfig::resolve_path(&root);
		(SubstFileConfig::load(&root)?, config_path)
	};

	let Some(config) = config else {
		return Ok(None);
	};

	let options = config.into_options()?;
	let plugin = ReplacePlugin::new(&options)?;

	Ok(Some(Session {
		root,
		config_path,
		plugin,
	}))
}

/// Collect candidate files: the explicit paths, or a walk of the project
/// root honoring `.gitignore`. The config file itself is never a transform
/// target; the include/exclude filter is applied by the plugin per file
/// identifier.
fn collect_files(session: &Session, paths: &[PathBuf]) -> Vec<PathBuf> {
	if !paths.is_empty() {
		return paths.to_vec();
	}

	let mut files = Vec::new();
	for entry in ignore::WalkBuilder::new(&session.root).build().flatten() {
		if !entry.file_type().is_some_and(|ft| ft.is_file()) {
			continue;
		}
		if session
			.config_path
			.as_deref()
			.is_some_and(|config| entry.path() == config)
		{
			continue;
		}
		files.push(entry.into_path());
	}
	files.sort();
	files
}

/// Make a path relative to root for display and filtering purposes.
fn file_id(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
		.replace('\\', "/")
}

/// Transform a single file, returning `None` for unreadable (e.g. binary)
/// files and files without any pending replacement.
fn transform_file(
	session: &Session,
	path: &Path,
	verbose: bool,
) -> Result<Option<Transformed>, Box<dyn std::error::Error>> {
	let id = file_id(path, &session.root);
	let Ok(code) = std::fs::read_to_string(path) else {
		if verbose {
			eprintln!("{} skipping unreadable file {id}", colored!("warning:", yellow));
		}
		return Ok(None);
	};

	Ok(session.plugin.transform(&code, &id)?)
}

fn run_apply(
	args: &SubstCli,
	paths: &[PathBuf],
	dry_run: bool,
	stdout: bool,
	map: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let Some(session) = open_session(args)? else {
		println!("No subst.toml found; nothing to do.");
		return Ok(());
	};

	if stdout {
		let [path] = paths else {
			return Err("--stdout requires exactly one file path".into());
		};

		match transform_file(&session, path, args.verbose)? {
			Some(transformed) => print!("{}", transformed.code),
			None => {
				let code = std::fs::read_to_string(path)?;
				print!("{code}");
			}
		}
		return Ok(());
	}

	let files = collect_files(&session, paths);
	let mut rewritten = Vec::new();

	for path in &files {
		let Some(transformed) = transform_file(&session, path, args.verbose)? else {
			continue;
		};

		if !dry_run {
			std::fs::write(path, &transformed.code)?;

			if map {
				if let Some(source_map) = &transformed.map {
					let map_path = map_path_for(path);
					std::fs::write(&map_path, source_map.to_string())?;
				}
			}
		}

		rewritten.push(file_id(path, &session.root));
	}

	if rewritten.is_empty() {
		println!("All files are already up to date.");
		return Ok(());
	}

	if dry_run {
		println!("Dry run: would rewrite {} file(s):", rewritten.len());
	} else {
		println!("Rewrote {} file(s).", rewritten.len());
	}

	if dry_run || args.verbose {
		for id in &rewritten {
			println!("  {id}");
		}
	}

	Ok(())
}

fn run_check(
	args: &SubstCli,
	paths: &[PathBuf],
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let Some(session) = open_session(args)? else {
		match format {
			OutputFormat::Json => println!("{}", serde_json::json!({ "ok": true, "pending": [] })),
			OutputFormat::Text => println!("No subst.toml found; nothing to check."),
		}
		return Ok(());
	};

	let files = collect_files(&session, paths);
	let mut pending = Vec::new();

	for path in &files {
		if transform_file(&session, path, args.verbose)?.is_some() {
			pending.push(file_id(path, &session.root));
		}
	}

	match format {
		OutputFormat::Json => {
			let output = serde_json::json!({
				"ok": pending.is_empty(),
				"pending": pending,
			});
			println!("{output}");
		}
		OutputFormat::Text => {
			if pending.is_empty() {
				println!("Check passed: no pending replacements.");
			} else {
				eprintln!("Check failed.");
				eprintln!("  files with pending replacements: {}", pending.len());
				eprintln!();
				for id in &pending {
					eprintln!("  {id}");
				}
				eprintln!();
				eprintln!(
					"{} run `subst apply` to rewrite these files.",
					colored!("hint:", bold)
				);
			}
		}
	}

	if !pending.is_empty() {
		process::exit(1);
	}

	Ok(())
}

/// Path of the source map written next to a rewritten file.
fn map_path_for(path: &Path) -> PathBuf {
	let mut name = path.as_os_str().to_os_string();
	name.push(".map");
	PathBuf::from(name)
}
