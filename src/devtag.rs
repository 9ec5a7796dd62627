//! Main module for the devtag preprocessor

pub mod error;
pub mod scanner;
pub mod stream;
pub mod tags;

pub use error::ConvertError;
pub use scanner::{convert, convert_lines, convert_with_tags};
pub use tags::{Tag, TagSet};
