//! Tag declarations
//!
//! A tag declaration is a string of the form `tag` or `tag:method`, where both
//! parts draw from the charset `[A-Za-z0-9_$.]`. The set of declarations is
//! parsed and validated once, before any scanning, into a `TagSet` that the
//! scanner only ever reads. The caller's strings are never mutated.

use crate::devtag::error::ConvertError;
use once_cell::sync::Lazy;
use regex::Regex;

static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9A-Za-z_$.]+)(?::([0-9A-Za-z_$.]+))?$")
        .expect("declaration pattern is valid")
});

/// Is `c` in the charset tags and candidate names are built from?
pub fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.'
}

/// One parsed tag declaration: a name and an optional bound call target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: String,
    method: Option<String>,
}

impl Tag {
    /// The tag name matched against comment openers.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound call target, if the declaration carried a `:method` suffix.
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }
}

/// An ordered set of tag declarations, fixed for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<Tag>,
}

impl TagSet {
    /// Parse and validate a list of declaration strings.
    ///
    /// An empty list is a configuration error: a conversion with nothing to
    /// expand is a caller mistake, not a no-op. Duplicate names are accepted;
    /// lookup returns the first match, so later duplicates are unreachable.
    pub fn parse<S: AsRef<str>>(declarations: &[S]) -> Result<TagSet, ConvertError> {
        if declarations.is_empty() {
            return Err(ConvertError::MissingTags);
        }
        let mut tags = Vec::with_capacity(declarations.len());
        for declaration in declarations {
            let declaration = declaration.as_ref();
            let captures = DECLARATION
                .captures(declaration)
                .ok_or_else(|| ConvertError::BadTag(declaration.to_string()))?;
            tags.push(Tag {
                name: captures[1].to_string(),
                method: captures.get(2).map(|m| m.as_str().to_string()),
            });
        }
        Ok(TagSet { tags })
    }

    /// Index of the first tag with the given name.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.tags.iter().position(|tag| tag.name == name)
    }

    /// The tag at a previously looked-up index.
    pub fn get(&self, index: usize) -> &Tag {
        &self.tags[index]
    }

    /// All tags, in declaration order.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }
}
