use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;

use crate::AnyResult;
use crate::SubstError;
use crate::SubstResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["subst.toml", ".subst.toml", ".config/subst.toml"];

/// The function type accepted by [`Replacement::computed`]. The argument is
/// the identifier of the file (or chunk) being transformed.
pub type ReplacerFn = dyn Fn(&str) -> AnyResult<String> + Send + Sync;

/// A replacement value for a single key.
///
/// The variant is decided once when the options are built, so the engine
/// never inspects the value's shape per match. Literals ignore the file
/// identifier; computed values receive it on every invocation.
#[derive(Clone)]
pub enum Replacement {
	/// A fixed string substituted verbatim for every occurrence.
	Literal(String),
	/// A closure invoked with the current file identifier per occurrence.
	Computed(Arc<ReplacerFn>),
}

impl Replacement {
	/// Wrap a closure as a computed replacement.
	pub fn computed<F>(f: F) -> Self
	where
		F: Fn(&str) -> AnyResult<String> + Send + Sync + 'static,
	{
		Self::Computed(Arc::new(f))
	}

	/// Produce the replacement text for the given file identifier.
	///
	/// A failing computed closure propagates its error to the caller; the
	/// engine aborts the whole file's transformation in that case.
	pub fn resolve(&self, file_id: &str) -> AnyResult<String> {
		match self {
			Self::Literal(value) => Ok(value.clone()),
			Self::Computed(f) => f(file_id),
		}
	}
}

impl fmt::Debug for Replacement {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
			Self::Computed(_) => f.debug_tuple("Computed").field(&"<fn>").finish(),
		}
	}
}

impl From<&str> for Replacement {
	fn from(value: &str) -> Self {
		Self::Literal(value.to_string())
	}
}

impl From<String> for Replacement {
	fn from(value: String) -> Self {
		Self::Literal(value)
	}
}

impl From<bool> for Replacement {
	fn from(value: bool) -> Self {
		Self::Literal(value.to_string())
	}
}

impl From<i64> for Replacement {
	fn from(value: i64) -> Self {
		Self::Literal(value.to_string())
	}
}

impl From<f64> for Replacement {
	fn from(value: f64) -> Self {
		Self::Literal(value.to_string())
	}
}

/// Immutable replacement configuration, built once per plugin instance.
///
/// ```rust
/// use subst_core::ReplaceOptions;
///
/// let options = ReplaceOptions::new()
/// 	.value("VERSION", "1.2.3")
/// 	.compute("BUILD_FILE", |id| Ok(id.to_string()))
/// 	.delimiters("{{", "}}")
/// 	.sourcemap(false);
/// ```
///
/// When an explicit `values` mapping is supplied it alone defines the
/// replacement table and any keys added through [`value`](Self::value) or
/// [`compute`](Self::compute) are silently ignored. This mirrors the
/// configuration surface of the host pipeline, where `values` is a full
/// override rather than a merge.
#[derive(Debug, Clone, Default)]
pub struct ReplaceOptions {
	values: Option<BTreeMap<String, Replacement>>,
	top_level: BTreeMap<String, Replacement>,
	delimiters: Option<(String, String)>,
	include: Vec<String>,
	exclude: Vec<String>,
	replace_stage: Option<String>,
	sourcemap: Option<bool>,
}

impl ReplaceOptions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a single top-level replacement. Last write wins for duplicate
	/// keys.
	pub fn value(mut self, key: impl Into<String>, replacement: impl Into<Replacement>) -> Self {
		self.top_level.insert(key.into(), replacement.into());
		self
	}

	/// Add a computed top-level replacement.
	pub fn compute<F>(mut self, key: impl Into<String>, f: F) -> Self
	where
		F: Fn(&str) -> AnyResult<String> + Send + Sync + 'static,
	{
		self.top_level.insert(key.into(), Replacement::computed(f));
		self
	}

	/// Supply an explicit `values` mapping. This wins entirely over any
	/// top-level keys.
	pub fn values(mut self, values: BTreeMap<String, Replacement>) -> Self {
		self.values = Some(values);
		self
	}

	/// Require the escaped `open` string immediately before and `close`
	/// immediately after each key. The delimiters are part of the replaced
	/// span.
	pub fn delimiters(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
		self.delimiters = Some((open.into(), close.into()));
		self
	}

	/// Add an include glob pattern. When any include patterns are present,
	/// only matching file identifiers are transformed.
	pub fn include(mut self, pattern: impl Into<String>) -> Self {
		self.include.push(pattern.into());
		self
	}

	/// Add an exclude glob pattern. Exclusion wins over inclusion.
	pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
		self.exclude.push(pattern.into());
		self
	}

	/// Restrict replacement to a single named pipeline phase. Phase labels
	/// are opaque; the engine only compares them for equality.
	pub fn replace_stage(mut self, stage: impl Into<String>) -> Self {
		self.replace_stage = Some(stage.into());
		self
	}

	/// Enable or disable source map generation. Defaults to enabled.
	pub fn sourcemap(mut self, enabled: bool) -> Self {
		self.sourcemap = Some(enabled);
		self
	}

	pub fn delimiter_pair(&self) -> Option<&(String, String)> {
		self.delimiters.as_ref()
	}

	pub fn include_patterns(&self) -> &[String] {
		&self.include
	}

	pub fn exclude_patterns(&self) -> &[String] {
		&self.exclude
	}

	pub fn stage(&self) -> Option<&str> {
		self.replace_stage.as_deref()
	}

	/// Whether a position map should be produced for transformed files.
	pub fn sourcemap_enabled(&self) -> bool {
		self.sourcemap != Some(false)
	}

	pub(crate) fn replacements(&self) -> &BTreeMap<String, Replacement> {
		self.values.as_ref().unwrap_or(&self.top_level)
	}
}

/// The key → replacement mapping derived once from [`ReplaceOptions`].
///
/// When `values` was supplied it is used verbatim; otherwise the top-level
/// keys form the table. Reserved configuration fields never appear as keys
/// because they live in their own typed fields. An empty table is valid and
/// makes the engine a no-op.
#[derive(Debug, Clone, Default)]
pub struct ReplacementTable {
	entries: BTreeMap<String, Replacement>,
}

impl ReplacementTable {
	pub fn from_options(options: &ReplaceOptions) -> Self {
		Self {
			entries: options.replacements().clone(),
		}
	}

	pub fn get(&self, key: &str) -> Option<&Replacement> {
		self.entries.get(key)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}
}

/// Configuration loaded from a `subst.toml` file.
///
/// ```toml
/// delimiters = ["{{", "}}"]
/// include = ["src/**/*.js"]
/// exclude = ["vendor/**"]
/// replace_stage = "transform"
/// sourcemap = true
///
/// [values]
/// VERSION = "1.2.3"
/// DEBUG = false
/// ```
///
/// When the `[values]` table is absent, every non-reserved top-level key
/// becomes a replacement:
///
/// ```toml
/// VERSION = "1.2.3"
/// HOST = "example.dev"
/// exclude = ["vendor/**"]
/// ```
#[derive(Debug, Deserialize)]
pub struct SubstFileConfig {
	/// Explicit replacement mapping. When present it alone defines the
	/// table and top-level keys are ignored.
	#[serde(default)]
	pub values: Option<BTreeMap<String, toml::Value>>,
	/// Literal `[open, close]` strings bounding each match.
	#[serde(default)]
	pub delimiters: Option<(String, String)>,
	/// Glob patterns selecting which files are transformed.
	#[serde(default)]
	pub include: Vec<String>,
	/// Glob patterns excluding files from transformation. Exclusion wins.
	#[serde(default)]
	pub exclude: Vec<String>,
	/// Restrict replacement to one pipeline phase. `replaceStage` is
	/// accepted as an alias.
	#[serde(default, alias = "replaceStage")]
	pub replace_stage: Option<String>,
	/// Source map toggle. Either spelling set to `false` disables maps.
	#[serde(default)]
	pub sourcemap: Option<bool>,
	/// Alternate spelling of `sourcemap`, treated identically.
	#[serde(default, rename = "sourceMap")]
	pub source_map: Option<bool>,
	/// Arbitrary top-level keys. Only used when `[values]` is absent.
	#[serde(flatten)]
	pub extra: BTreeMap<String, toml::Value>,
}

impl SubstFileConfig {
	/// Find the first config file candidate under `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> SubstResult<Option<Self>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		Self::load_file(&config_path).map(Some)
	}

	/// Load the config from an explicit file path.
	pub fn load_file(path: &Path) -> SubstResult<Self> {
		let content = std::fs::read_to_string(path)?;
		toml::from_str(&content).map_err(|e| SubstError::ConfigParse(e.to_string()))
	}

	/// Whether a position map should be produced. Defaults to true; either
	/// flag spelling set to `false` turns it off.
	pub fn sourcemap_enabled(&self) -> bool {
		self.sourcemap != Some(false) && self.source_map != Some(false)
	}

	/// Convert the file configuration into engine options. Scalar values
	/// are coerced to their text form; arrays and tables are rejected.
	pub fn into_options(self) -> SubstResult<ReplaceOptions> {
		let sourcemap_enabled = self.sourcemap_enabled();
		let mut options = ReplaceOptions::new().sourcemap(sourcemap_enabled);

		if let Some((open, close)) = self.delimiters {
			options = options.delimiters(open, close);
		}

		for pattern in self.include {
			options = options.include(pattern);
		}

		for pattern in self.exclude {
			options = options.exclude(pattern);
		}

		if let Some(stage) = self.replace_stage {
			options = options.replace_stage(stage);
		}

		if let Some(values) = self.values {
			let mut table = BTreeMap::new();
			for (key, value) in values {
				table.insert(key.clone(), scalar_replacement(&key, value)?);
			}
			return Ok(options.values(table));
		}

		for (key, value) in self.extra {
			let replacement = scalar_replacement(&key, value)?;
			options = options.value(key, replacement);
		}

		Ok(options)
	}
}

/// Coerce a scalar TOML value into a literal replacement, mirroring the
/// text coercion the engine applies to computed values.
fn scalar_replacement(key: &str, value: toml::Value) -> SubstResult<Replacement> {
	let text = match value {
		toml::Value::String(s) => s,
		toml::Value::Integer(n) => n.to_string(),
		toml::Value::Float(n) => n.to_string(),
		toml::Value::Boolean(b) => b.to_string(),
		toml::Value::Datetime(dt) => dt.to_string(),
		toml::Value::Array(_) | toml::Value::Table(_) => {
			return Err(SubstError::ConfigParse(format!(
				"replacement value for `{key}` must be a string, number, or boolean"
			)));
		}
	};

	Ok(Replacement::Literal(text))
}
