//! `subst_core` is the token-replacement engine behind the `subst` build
//! step. It scans each processed file's text for configured identifier
//! tokens, replaces them with literal or computed values, and produces the
//! updated text together with a position-accurate source map.
//!
//! ## Processing Pipeline
//!
//! ```text
//! ReplaceOptions (immutable configuration)
//!   → ReplacementTable (key → literal | computed value)
//!   → TokenMatcher (one compiled pattern, longest key first)
//!   → ReplacePlugin hook (stage gate + path filter per file)
//!   → ReplacementEngine (scan, resolve, overwrite a TrackedBuffer)
//!   → Transformed { code, map } or the no-op signal
//! ```
//!
//! Matching is lexical, not AST-based: without delimiters a key only
//! matches on word boundaries, with delimiters the bounded span (delimiters
//! included) is replaced. Replacement is idempotent — once a key is gone,
//! re-running the engine reports no change.
//!
//! ## Key Types
//!
//! - [`ReplaceOptions`] — immutable configuration built once per plugin
//!   instance.
//! - [`Replacement`] — a tagged `Literal | Computed` value, decided when
//!   the table is built.
//! - [`ReplacePlugin`] — the `transform` / `render_chunk` hook surface
//!   exposed to the host pipeline.
//! - [`TrackedBuffer`] — per-invocation text buffer recording span
//!   rewrites with provenance.
//! - [`SourceMap`] — source map v3 artifact with base64-VLQ mappings.
//!
//! ## Quick Start
//!
//! ```rust
//! use subst_core::ReplaceOptions;
//! use subst_core::ReplacePlugin;
//!
//! let options = ReplaceOptions::new().value("VERSION", "1.2.3");
//! let plugin = ReplacePlugin::new(&options).unwrap();
//!
//! let result = plugin.transform("console.log(VERSION);", "a.js").unwrap();
//! let transformed = result.expect("VERSION occurs in the input");
//! assert_eq!(transformed.code, "console.log(1.2.3);");
//! assert!(transformed.map.is_some());
//! ```

pub use buffer::*;
pub use engine::*;
pub use error::*;
pub use filter::*;
pub use pattern::*;
pub use plugin::*;
pub use sourcemap::*;
pub use stage::*;

pub use config::*;

mod buffer;
pub mod config;
mod engine;
mod error;
mod filter;
mod pattern;
mod plugin;
mod sourcemap;
mod stage;
