//! # devtag
//!
//! A comment-macro preprocessor for JavaScript-like source.
//!
//! Instrumentation code (traces, logging, assertions) is shipped inertly as
//! tagged block comments, then switched on by a build step that names the
//! active tags. Given the tag `debug`, the comment `/*debug x=1;*/` becomes
//! the statement block `{x=1;}`; everything else in the file, including
//! strings, regexp literals, and ordinary comments, is copied byte for byte.
//!
//! The entry points are [`devtag::convert`] for a block of text and
//! [`devtag::convert_lines`] for pre-split lines; both are pure functions
//! from source text and tag declarations to rewritten text or a fatal
//! [`devtag::ConvertError`]. No I/O happens in the library.

pub mod devtag;

pub use devtag::{convert, convert_lines, convert_with_tags, ConvertError, Tag, TagSet};
