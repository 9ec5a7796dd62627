//! Error types for the conversion pipeline
//!
//! Every failure is fatal: the conversion either produces a fully rewritten
//! text or one of these errors, never partial output. Scan-time errors carry
//! the 1-based source line they were detected on; configuration errors have
//! no line and report the literal marker `bad tag` instead.

use std::fmt;

/// Errors that can abort a conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// A tag declaration did not match the `tag` or `tag:method` pattern
    BadTag(String),
    /// The tag configuration was empty
    MissingTags,
    /// End of input inside a string literal; the line is where the literal began
    UnterminatedString { line: usize },
    /// End of input inside a regexp literal; the line is where the literal began
    UnterminatedRegexp { line: usize },
    /// A `*/` sequence appeared inside a literal being skipped within a tagged comment
    CloseCommentInLiteral { line: usize },
    /// A `//` or `/*` appeared where a regexp literal was expected to continue or close
    UnexpectedComment { line: usize },
    /// A `/*` appeared inside a block comment
    NestedComment { line: usize },
    /// End of input inside a block comment
    UnterminatedComment { line: usize },
    /// End of input before a tag condition's parens balanced
    UnterminatedCondition { line: usize },
    /// A tagged comment closed while brackets were still open, or a bracket closed too early
    UnbalancedBody { line: usize },
    /// End of input inside a tagged comment body
    UnterminatedBody { line: usize },
}

impl ConvertError {
    /// The 1-based source line the error was reported against, if any.
    ///
    /// Configuration errors (`BadTag`, `MissingTags`) happen before scanning
    /// and have no line.
    pub fn line(&self) -> Option<usize> {
        match self {
            ConvertError::BadTag(_) | ConvertError::MissingTags => None,
            ConvertError::UnterminatedString { line }
            | ConvertError::UnterminatedRegexp { line }
            | ConvertError::CloseCommentInLiteral { line }
            | ConvertError::UnexpectedComment { line }
            | ConvertError::NestedComment { line }
            | ConvertError::UnterminatedComment { line }
            | ConvertError::UnterminatedCondition { line }
            | ConvertError::UnbalancedBody { line }
            | ConvertError::UnterminatedBody { line } => Some(*line),
        }
    }
}

impl std::error::Error for ConvertError {}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::BadTag(decl) => write!(f, "bad tag: {:?}", decl),
            ConvertError::MissingTags => write!(f, "bad tag: no tags declared"),
            ConvertError::UnterminatedString { line } => {
                write!(f, "line {}: unterminated string literal", line)
            }
            ConvertError::UnterminatedRegexp { line } => {
                write!(f, "line {}: unterminated regexp literal", line)
            }
            ConvertError::CloseCommentInLiteral { line } => {
                write!(f, "line {}: unexpected close comment in literal", line)
            }
            ConvertError::UnexpectedComment { line } => {
                write!(f, "line {}: unexpected comment", line)
            }
            ConvertError::NestedComment { line } => {
                write!(f, "line {}: nested comment", line)
            }
            ConvertError::UnterminatedComment { line } => {
                write!(f, "line {}: unterminated comment", line)
            }
            ConvertError::UnterminatedCondition { line } => {
                write!(f, "line {}: unterminated condition", line)
            }
            ConvertError::UnbalancedBody { line } => {
                write!(f, "line {}: unbalanced comment body", line)
            }
            ConvertError::UnterminatedBody { line } => {
                write!(f, "line {}: unterminated comment body", line)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_errors_carry_their_line() {
        let err = ConvertError::UnterminatedString { line: 7 };
        assert_eq!(err.line(), Some(7));
        assert_eq!(err.to_string(), "line 7: unterminated string literal");
    }

    #[test]
    fn test_config_errors_have_no_line() {
        let err = ConvertError::BadTag("log: console.log".to_string());
        assert_eq!(err.line(), None);
        assert_eq!(err.to_string(), "bad tag: \"log: console.log\"");

        assert_eq!(ConvertError::MissingTags.line(), None);
    }
}
