use crate::SubstError;
use crate::SubstResult;
use crate::sourcemap::MapOptions;
use crate::sourcemap::MappingsBuilder;
use crate::sourcemap::SourceMap;

/// One recorded span rewrite against the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
	start: usize,
	end: usize,
	content: String,
}

/// A mutable view over one file's original text.
///
/// The original text is read-only; mutation is recorded as a set of
/// non-overlapping span edits, kept sorted by start offset. A buffer is
/// created per transform invocation and discarded after producing its
/// result — offsets are only meaningful against the single immutable copy
/// of the source text it was created over, so buffers are never shared
/// across files or reused across calls.
#[derive(Debug)]
pub struct TrackedBuffer<'t> {
	original: &'t str,
	edits: Vec<Edit>,
}

impl<'t> TrackedBuffer<'t> {
	pub fn new(original: &'t str) -> Self {
		Self {
			original,
			edits: Vec::new(),
		}
	}

	/// True once at least one span has been overwritten.
	pub fn is_dirty(&self) -> bool {
		!self.edits.is_empty()
	}

	pub fn original(&self) -> &'t str {
		self.original
	}

	/// Record a replacement of `start..end` (byte offsets into the original
	/// text) with `content`. Spans must lie on character boundaries and must
	/// not overlap a previously recorded edit; zero-length spans and
	/// adjacent edits are allowed.
	pub fn overwrite(&mut self, start: usize, end: usize, content: String) -> SubstResult<()> {
		let len = self.original.len();
		if start > end
			|| end > len
			|| !self.original.is_char_boundary(start)
			|| !self.original.is_char_boundary(end)
		{
			return Err(SubstError::Edit { start, end, len });
		}

		let index = self.edits.partition_point(|edit| edit.end <= start);
		if let Some(next) = self.edits.get(index) {
			if next.start < end {
				return Err(SubstError::OverlappingEdit {
					start,
					end,
					previous_end: next.end,
				});
			}
		}
		if index > 0 {
			let previous = &self.edits[index - 1];
			if previous.end > start {
				return Err(SubstError::OverlappingEdit {
					start,
					end,
					previous_end: previous.end,
				});
			}
		}

		self.edits.insert(index, Edit {
			start,
			end,
			content,
		});
		Ok(())
	}

	/// Splice all recorded edits into the final text.
	pub fn render(&self) -> String {
		let extra: usize = self.edits.iter().map(|edit| edit.content.len()).sum();
		let mut out = String::with_capacity(self.original.len() + extra);
		let mut cursor = 0;

		for edit in &self.edits {
			out.push_str(&self.original[cursor..edit.start]);
			out.push_str(&edit.content);
			cursor = edit.end;
		}
		out.push_str(&self.original[cursor..]);
		out
	}

	/// Produce a position map describing how offsets in the rendered text
	/// correspond to offsets in the original.
	///
	/// Untouched regions map character for character (one segment per
	/// character in hires mode, one per line otherwise); each rewritten
	/// span maps the start of its replacement back to the start of the
	/// original span. Lines and columns are counted in characters.
	pub fn generate_map(&self, options: &MapOptions) -> SourceMap {
		let mut builder = MappingsBuilder::new();
		let mut orig_line = 0;
		let mut orig_col = 0;
		let mut gen_col = 0;
		let mut cursor = 0;

		for edit in &self.edits {
			walk_untouched(
				&self.original[cursor..edit.start],
				options.hires,
				&mut builder,
				&mut gen_col,
				&mut orig_line,
				&mut orig_col,
			);

			// The whole replacement maps back to the start of the span it
			// overwrote.
			builder.segment(gen_col, orig_line, orig_col);
			for ch in edit.content.chars() {
				if ch == '\n' {
					builder.advance_line();
					gen_col = 0;
				} else {
					gen_col += 1;
				}
			}

			for ch in self.original[edit.start..edit.end].chars() {
				if ch == '\n' {
					orig_line += 1;
					orig_col = 0;
				} else {
					orig_col += 1;
				}
			}
			cursor = edit.end;
		}

		walk_untouched(
			&self.original[cursor..],
			options.hires,
			&mut builder,
			&mut gen_col,
			&mut orig_line,
			&mut orig_col,
		);

		SourceMap {
			version: 3,
			file: options.file.clone(),
			sources: options.source.iter().cloned().collect(),
			sources_content: options
				.include_content
				.then(|| vec![self.original.to_string()]),
			names: Vec::new(),
			mappings: builder.finish(),
		}
	}
}

/// Advance through an untouched region, emitting identity mappings.
fn walk_untouched(
	text: &str,
	hires: bool,
	builder: &mut MappingsBuilder,
	gen_col: &mut usize,
	orig_line: &mut usize,
	orig_col: &mut usize,
) {
	// In low-res mode one segment is emitted at the region start and after
	// each newline.
	let mut needs_segment = !text.is_empty();

	for ch in text.chars() {
		if ch == '\n' {
			builder.advance_line();
			*gen_col = 0;
			*orig_line += 1;
			*orig_col = 0;
			needs_segment = true;
		} else {
			if hires || needs_segment {
				builder.segment(*gen_col, *orig_line, *orig_col);
				needs_segment = false;
			}
			*gen_col += 1;
			*orig_col += 1;
		}
	}
}
