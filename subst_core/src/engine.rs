use tracing::debug;
use tracing::trace;

use crate::SubstError;
use crate::SubstResult;
use crate::buffer::TrackedBuffer;
use crate::config::ReplaceOptions;
use crate::config::ReplacementTable;
use crate::pattern::TokenMatcher;
use crate::sourcemap::MapOptions;
use crate::sourcemap::SourceMap;

/// The result bundle for a file that had at least one replacement.
///
/// Absence of a bundle (`None` from [`ReplacementEngine::apply`]) is the
/// no-op signal: the original text was returned to the host untouched.
#[derive(Debug, Clone)]
pub struct Transformed {
	/// The text with every matched span rewritten.
	pub code: String,
	/// Position map from the rewritten text back to the original, present
	/// unless map generation was disabled.
	pub map: Option<SourceMap>,
}

/// Scans input text with the compiled pattern and applies replacements to
/// a tracked buffer.
///
/// The table and matcher are built once and reused read-only across every
/// file the plugin processes; each `apply` call owns its own buffer, so a
/// single engine can serve any number of invocations concurrently.
#[derive(Debug, Clone)]
pub struct ReplacementEngine {
	table: ReplacementTable,
	matcher: TokenMatcher,
	sourcemap: bool,
}

impl ReplacementEngine {
	pub fn new(options: &ReplaceOptions) -> SubstResult<Self> {
		let table = ReplacementTable::from_options(options);
		let matcher = TokenMatcher::build(table.keys(), options.delimiter_pair())?;
		debug!(keys = table.len(), "compiled replacement pattern");

		Ok(Self {
			table,
			matcher,
			sourcemap: options.sourcemap_enabled(),
		})
	}

	/// True when no keys are configured and every call is a no-op.
	pub fn is_noop(&self) -> bool {
		self.matcher.is_empty()
	}

	/// Replace every occurrence of a configured key in `code`.
	///
	/// Returns `Ok(None)` when nothing matched. A failing computed
	/// replacement aborts the whole call; no partial result is produced.
	pub fn apply(&self, code: &str, file_id: &str) -> SubstResult<Option<Transformed>> {
		if self.matcher.is_empty() {
			return Ok(None);
		}

		let mut buffer = TrackedBuffer::new(code);
		let mut replaced = 0usize;

		for hit in self.matcher.hits(code) {
			let Some(replacement) = self.table.get(hit.key) else {
				// The pattern is built from the table's keys, so every
				// capture resolves; an unknown key would mean the matcher
				// and table were built from different options.
				continue;
			};

			let value = replacement.resolve(file_id).map_err(|e| {
				SubstError::Replacement {
					key: hit.key.to_string(),
					reason: e.to_string(),
				}
			})?;

			trace!(key = hit.key, start = hit.start, end = hit.end, "replacing span");
			buffer.overwrite(hit.start, hit.end, value)?;
			replaced += 1;
		}

		if !buffer.is_dirty() {
			return Ok(None);
		}

		debug!(file = file_id, replaced, "rewrote file");
		Ok(Some(self.assemble(&buffer, file_id)))
	}

	/// Package the rendered text with a position map when maps are enabled.
	fn assemble(&self, buffer: &TrackedBuffer<'_>, file_id: &str) -> Transformed {
		let code = buffer.render();
		let map = self.sourcemap.then(|| {
			buffer.generate_map(&MapOptions {
				hires: true,
				file: None,
				source: Some(file_id.to_string()),
				include_content: false,
			})
		});

		Transformed { code, map }
	}
}
