use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;

use crate::SubstError;
use crate::SubstResult;

/// Include/exclude filtering of file identifiers.
///
/// With no include patterns every identifier passes unless excluded; with
/// include patterns present an identifier must match at least one of them.
/// Exclusion always wins.
#[derive(Debug, Clone)]
pub struct PathFilter {
	include: GlobSet,
	has_include: bool,
	exclude: GlobSet,
}

impl PathFilter {
	pub fn new(include: &[String], exclude: &[String]) -> SubstResult<Self> {
		Ok(Self {
			include: build_glob_set(include)?,
			has_include: !include.is_empty(),
			exclude: build_glob_set(exclude)?,
		})
	}

	pub fn permits(&self, file_id: &str) -> bool {
		if self.exclude.is_match(file_id) {
			return false;
		}
		if !self.has_include {
			return true;
		}
		self.include.is_match(file_id)
	}
}

/// Build a `GlobSet` from a list of glob pattern strings.
fn build_glob_set(patterns: &[String]) -> SubstResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = Glob::new(pattern).map_err(|e| {
			SubstError::FilterPattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
		builder.add(glob);
	}
	builder.build().map_err(|e| {
		SubstError::FilterPattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}
