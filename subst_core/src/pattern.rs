use regex::Regex;

use crate::SubstError;
use crate::SubstResult;

/// Escape a raw string so every regex metacharacter in it matches itself
/// when embedded in the combined pattern. Total over all inputs; the empty
/// string escapes to the empty string.
pub fn escape_key(raw: &str) -> String {
	regex::escape(raw)
}

/// A single occurrence of a configured key in the scanned text.
///
/// `start..end` covers the whole matched span (delimiters included, when
/// delimiter mode is active); `key` is the captured key alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenHit<'t> {
	pub start: usize,
	pub end: usize,
	pub key: &'t str,
}

/// One compiled pattern matching every configured key, built once per
/// plugin instance and reused across all files.
///
/// Keys are sorted by descending length before being joined into the
/// alternation, so when one key is a prefix of another (`VERSION` vs
/// `VERSION_MAJOR`) the longer key is tried first at each position. Without
/// delimiters the key must sit on word boundaries, so `VERSION` never
/// matches inside `VERSIONING`.
#[derive(Debug, Clone)]
pub struct TokenMatcher {
	pattern: Option<Regex>,
}

impl TokenMatcher {
	/// Compile the combined pattern from the table's keys and the optional
	/// delimiter pair. An empty key set produces a matcher that skips
	/// scanning entirely.
	pub fn build<'a, I>(keys: I, delimiters: Option<&(String, String)>) -> SubstResult<Self>
	where
		I: IntoIterator<Item = &'a str>,
	{
		let mut keys: Vec<&str> = keys.into_iter().collect();
		if keys.is_empty() {
			return Ok(Self { pattern: None });
		}

		keys.sort_by(|a, b| b.len().cmp(&a.len()));
		let alternation = keys
			.iter()
			.map(|key| escape_key(key))
			.collect::<Vec<_>>()
			.join("|");

		let source = match delimiters {
			Some((open, close)) => {
				format!(
					"{}({alternation}){}",
					escape_key(open),
					escape_key(close)
				)
			}
			None => format!(r"\b({alternation})\b"),
		};

		let pattern = Regex::new(&source).map_err(|e| SubstError::Pattern(e.to_string()))?;
		Ok(Self {
			pattern: Some(pattern),
		})
	}

	/// True when no keys were configured and scanning can be skipped.
	pub fn is_empty(&self) -> bool {
		self.pattern.is_none()
	}

	/// Lazily yield every non-overlapping occurrence in `text`, left to
	/// right. Consumed once per invocation.
	pub fn hits<'m, 't: 'm>(&'m self, text: &'t str) -> impl Iterator<Item = TokenHit<'t>> + 'm {
		self.pattern.iter().flat_map(move |pattern| {
			pattern.captures_iter(text).map(|caps| {
				// Group 0 always exists and group 1 is the key capture in
				// both pattern shapes.
				let full = caps.get(0).expect("match has a full span");
				let key = caps.get(1).expect("pattern captures the key");
				TokenHit {
					start: full.start(),
					end: full.end(),
					key: key.as_str(),
				}
			})
		})
	}
}
