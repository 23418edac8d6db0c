use std::fmt;
use std::fmt::Display;

use serde::Serialize;

/// A source map v3 artifact describing how offsets in the transformed text
/// correspond to offsets in the original input.
///
/// The shape matches the standard consumed by bundler map-chaining
/// machinery: `version`, source list, base64-VLQ `mappings`, and a `names`
/// list (always empty here; the engine does not rename symbols).
#[derive(Debug, Clone, Serialize)]
pub struct SourceMap {
	pub version: u8,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub file: Option<String>,
	pub sources: Vec<String>,
	#[serde(rename = "sourcesContent", skip_serializing_if = "Option::is_none")]
	pub sources_content: Option<Vec<String>>,
	pub names: Vec<String>,
	pub mappings: String,
}

impl Display for SourceMap {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
		write!(f, "{json}")
	}
}

/// Options controlling map generation.
#[derive(Debug, Clone, Default)]
pub struct MapOptions {
	/// Emit a mapping segment at every character of untouched text instead
	/// of one per line. The pipeline hooks always request hires maps.
	pub hires: bool,
	/// Name recorded in the map's `file` field.
	pub file: Option<String>,
	/// Name recorded in the map's `sources` list.
	pub source: Option<String>,
	/// Embed the original text in `sourcesContent`.
	pub include_content: bool,
}

const BASE64_CHARS: &[u8; 64] =
	b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Append the base64 VLQ encoding of `value`.
fn encode_vlq(value: i64, out: &mut String) {
	let mut vlq = if value < 0 {
		(value.unsigned_abs() << 1) | 1
	} else {
		(value as u64) << 1
	};

	loop {
		let mut digit = (vlq & 0b1_1111) as usize;
		vlq >>= 5;
		if vlq > 0 {
			digit |= 0b10_0000;
		}
		out.push(BASE64_CHARS[digit] as char);
		if vlq == 0 {
			break;
		}
	}
}

/// Incremental builder for the `mappings` string. Segments are delta
/// encoded: generated column resets per line, the other fields carry over
/// across the whole map.
#[derive(Debug, Default)]
pub(crate) struct MappingsBuilder {
	out: String,
	line_has_segment: bool,
	last_gen_col: i64,
	last_orig_line: i64,
	last_orig_col: i64,
}

impl MappingsBuilder {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	/// Start the next generated line.
	pub(crate) fn advance_line(&mut self) {
		self.out.push(';');
		self.line_has_segment = false;
		self.last_gen_col = 0;
	}

	/// Record that generated position (`gen_col` on the current line) maps
	/// to `orig_line:orig_col` in source 0.
	pub(crate) fn segment(&mut self, gen_col: usize, orig_line: usize, orig_col: usize) {
		if self.line_has_segment {
			self.out.push(',');
		}
		self.line_has_segment = true;

		let gen_col = gen_col as i64;
		let orig_line = orig_line as i64;
		let orig_col = orig_col as i64;

		encode_vlq(gen_col - self.last_gen_col, &mut self.out);
		// Single source file, so the source index delta is always zero.
		encode_vlq(0, &mut self.out);
		encode_vlq(orig_line - self.last_orig_line, &mut self.out);
		encode_vlq(orig_col - self.last_orig_col, &mut self.out);

		self.last_gen_col = gen_col;
		self.last_orig_line = orig_line;
		self.last_orig_col = orig_col;
	}

	pub(crate) fn finish(self) -> String {
		self.out
	}
}
