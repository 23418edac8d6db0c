use crate::SubstResult;
use crate::config::ReplaceOptions;
use crate::engine::ReplacementEngine;
use crate::engine::Transformed;
use crate::filter::PathFilter;
use crate::stage::StageGate;

/// Phase label for per-file processing.
pub const TRANSFORM_STAGE: &str = "transform";
/// Phase label for final bundle assembly.
pub const RENDER_CHUNK_STAGE: &str = "renderChunk";

/// The pipeline hook surface exposed to the host bundler.
///
/// One plugin instance corresponds to one immutable configuration for its
/// whole lifetime: the replacement table, compiled pattern, stage gate, and
/// path filter are all built once here and shared read-only across every
/// subsequent hook invocation.
#[derive(Debug, Clone)]
pub struct ReplacePlugin {
	engine: ReplacementEngine,
	gate: StageGate,
	filter: PathFilter,
}

impl ReplacePlugin {
	pub fn new(options: &ReplaceOptions) -> SubstResult<Self> {
		Ok(Self {
			engine: ReplacementEngine::new(options)?,
			gate: StageGate::new(options.stage()),
			filter: PathFilter::new(options.include_patterns(), options.exclude_patterns())?,
		})
	}

	/// Per-file transform hook.
	pub fn transform(&self, code: &str, file_id: &str) -> SubstResult<Option<Transformed>> {
		self.run(TRANSFORM_STAGE, code, file_id)
	}

	/// Final-render hook, invoked once per output chunk.
	pub fn render_chunk(&self, code: &str, chunk_name: &str) -> SubstResult<Option<Transformed>> {
		self.run(RENDER_CHUNK_STAGE, code, chunk_name)
	}

	/// Run the engine for an arbitrary host-defined phase label.
	///
	/// Returns the no-op signal (`Ok(None)`) when the stage gate rejects
	/// the phase, no keys are configured, or the path filter rejects the
	/// file identifier.
	pub fn run(&self, phase: &str, code: &str, file_id: &str) -> SubstResult<Option<Transformed>> {
		if !self.gate.permits(phase) {
			return Ok(None);
		}
		if self.engine.is_noop() {
			return Ok(None);
		}
		if !self.filter.permits(file_id) {
			return Ok(None);
		}

		self.engine.apply(code, file_id)
	}
}
