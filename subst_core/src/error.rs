use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum SubstError {
	#[error(transparent)]
	#[diagnostic(code(subst::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to compile the replacement pattern: {0}")]
	#[diagnostic(
		code(subst::pattern),
		help("replacement keys are escaped before compilation, so this usually means the combined pattern exceeded the regex size limit")
	)]
	Pattern(String),

	#[error("replacement value for key `{key}` failed: {reason}")]
	#[diagnostic(
		code(subst::replacement),
		help("the computed replacement closure returned an error; the whole file was left untouched")
	)]
	Replacement { key: String, reason: String },

	#[error("invalid edit span {start}..{end} (buffer length {len})")]
	#[diagnostic(code(subst::edit))]
	Edit { start: usize, end: usize, len: usize },

	#[error("edit span {start}..{end} overlaps an earlier edit ending at {previous_end}")]
	#[diagnostic(code(subst::overlapping_edit))]
	OverlappingEdit {
		start: usize,
		end: usize,
		previous_end: usize,
	},

	#[error("invalid filter pattern `{pattern}`: {reason}")]
	#[diagnostic(
		code(subst::filter_pattern),
		help("include/exclude entries use glob syntax, e.g. `src/**/*.js`")
	)]
	FilterPattern { pattern: String, reason: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(subst::config_parse),
		help("check that subst.toml is valid TOML; replacement values must be strings, numbers, or booleans")
	)]
	ConfigParse(String),
}

pub type SubstResult<T> = Result<T, SubstError>;
pub type AnyError = Box<dyn std::error::Error + Send + Sync>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
