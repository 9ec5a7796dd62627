//! The conversion engine
//!
//! A single pass over the source classifies every character as string literal,
//! regexp literal, line comment, block comment, or ordinary text. Everything
//! is copied to the output unchanged except block comments that open with a
//! declared tag, which are rewritten into live code:
//!
//! ```text
//! /*debug x=1;*/                 ->  {x=1;}
//! /*debug(flag) x=1;*/           ->  if (flag) {x=1;}
//! /*log "hi"*/                   ->  {console.log("hi");}     (log:console.log)
//! /*alarm(level>5) "loud"*/      ->  if (level>5) {alert("loud");}   (alarm:alert)
//! ```
//!
//! There is no grammar here. Strings and regexps are skipped verbatim so that
//! comment-like sequences inside them are never misread, and a fixed set of
//! preceding characters decides whether a `/` opens a regexp or is a division
//! operator. Tagged-comment bodies must balance their brackets before the
//! closing `*/`. Any violation aborts the whole run with a `ConvertError`;
//! there is no partial output.

use crate::devtag::error::ConvertError;
use crate::devtag::stream::CharStream;
use crate::devtag::tags::{is_tag_char, TagSet};

/// Characters that, immediately preceding a `/`, mean the slash starts a
/// regexp literal rather than a division operator.
const REGEXP_PRECEDERS: [char; 12] = ['(', ',', '=', ':', '[', '!', '&', '|', '?', '{', '}', ';'];

fn precedes_regexp(left: Option<char>) -> bool {
    matches!(left, Some(c) if REGEXP_PRECEDERS.contains(&c))
}

type Scan<T = ()> = Result<T, ConvertError>;

/// One conversion run: the cursor, the tag set, and the output being built.
struct Converter<'a> {
    stream: CharStream,
    tags: &'a TagSet,
    output: String,
}

impl<'a> Converter<'a> {
    fn new(stream: CharStream, tags: &'a TagSet) -> Self {
        Converter {
            stream,
            tags,
            output: String::new(),
        }
    }

    /// Consume the next character; with `echo`, also copy it to the output.
    ///
    /// Echoed `get` and the `emit` helpers are the only paths that write the
    /// output buffer.
    fn get(&mut self, echo: bool) -> Option<char> {
        let c = self.stream.get();
        if echo {
            if let Some(c) = c {
                self.output.push(c);
            }
        }
        c
    }

    fn peek(&mut self) -> Option<char> {
        self.stream.peek()
    }

    fn unget(&mut self, c: char) {
        self.stream.unget(c);
    }

    fn emit(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn emit_char(&mut self, c: char) {
        self.output.push(c);
    }

    fn line(&self) -> usize {
        self.stream.line_number()
    }

    /// Copy a string literal through to its closing quote.
    ///
    /// A backslash escapes the next character unconditionally. Inside a tagged
    /// comment the literal may not contain `*/`, escaped or not, since that
    /// sequence would close the comment in the original source. Errors are
    /// reported against the line the literal began on.
    fn skip_string(&mut self, quote: char, in_comment: bool) -> Scan {
        let start_line = self.line();
        loop {
            let Some(mut c) = self.get(true) else {
                return Err(ConvertError::UnterminatedString { line: start_line });
            };
            if c == quote {
                return Ok(());
            }
            if c == '\\' {
                c = match self.get(true) {
                    Some(escaped) => escaped,
                    None => return Err(ConvertError::UnterminatedString { line: start_line }),
                };
            }
            if in_comment && c == '*' && self.peek() == Some('/') {
                return Err(ConvertError::CloseCommentInLiteral { line: start_line });
            }
        }
    }

    /// Copy a regexp literal through to its closing `/`.
    ///
    /// Inside a `[...]` character class a `]` is the only closer and `/` has
    /// no meaning; a backslash escapes anywhere. Inside a tagged comment the
    /// literal may not contain `*/`, and its closing `/` may not be followed
    /// by another `/` or a `*`, which would read as a comment opener. Errors
    /// are reported against the line the literal began on.
    fn skip_regexp(&mut self, in_comment: bool) -> Scan {
        let start_line = self.line();
        let mut in_class = false;
        loop {
            let Some(mut c) = self.get(true) else {
                return Err(ConvertError::UnterminatedRegexp { line: start_line });
            };
            let mut escaped = false;
            if c == '\\' {
                c = match self.get(true) {
                    Some(e) => e,
                    None => return Err(ConvertError::UnterminatedRegexp { line: start_line }),
                };
                escaped = true;
            }
            if !escaped {
                if in_class {
                    if c == ']' {
                        in_class = false;
                    }
                } else if c == '[' {
                    in_class = true;
                } else if c == '/' {
                    if in_comment && matches!(self.peek(), Some('/') | Some('*')) {
                        return Err(ConvertError::UnexpectedComment { line: start_line });
                    }
                    return Ok(());
                }
            }
            if in_comment && c == '*' && self.peek() == Some('/') {
                return Err(ConvertError::CloseCommentInLiteral { line: start_line });
            }
        }
    }

    /// Copy a tag condition through to the paren that balances the opening
    /// `(`, which the caller has already consumed and echoed.
    ///
    /// All three bracket kinds share one depth counter, so object and array
    /// literals inside the condition are fine. String and regexp literals are
    /// skipped with the comment-aware skippers.
    fn condition(&mut self) -> Scan {
        let mut left = '(';
        let mut depth = 1usize;
        loop {
            let Some(c) = self.get(true) else {
                return Err(ConvertError::UnterminatedCondition { line: self.line() });
            };
            match c {
                '(' | '{' | '[' => depth += 1,
                ')' | '}' | ']' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                '"' | '\'' => self.skip_string(c, true)?,
                '/' => {
                    if precedes_regexp(Some(left)) {
                        self.skip_regexp(true)?;
                    }
                }
                _ => {}
            }
            if c > ' ' {
                left = c;
            }
        }
    }

    /// Copy a tagged-comment body through to the closing `*/`.
    ///
    /// Leading spaces are dropped. The body's brackets must balance before
    /// the closer; a run of stars not followed by `/` is literal text. The
    /// `*/` itself is consumed and not echoed.
    fn stuff(&mut self) -> Scan {
        let mut left = '{';
        let mut depth = 0i32;
        while self.peek() == Some(' ') {
            self.get(false);
        }
        loop {
            while self.peek() == Some('*') {
                self.get(false);
                if self.peek() == Some('/') {
                    self.get(false);
                    if depth > 0 {
                        return Err(ConvertError::UnbalancedBody { line: self.line() });
                    }
                    return Ok(());
                }
                self.emit_char('*');
            }
            let Some(c) = self.get(true) else {
                return Err(ConvertError::UnterminatedBody { line: self.line() });
            };
            match c {
                '(' | '{' | '[' => depth += 1,
                ')' | '}' | ']' => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(ConvertError::UnbalancedBody { line: self.line() });
                    }
                }
                '"' | '\'' => self.skip_string(c, true)?,
                '/' => {
                    if precedes_regexp(Some(left)) {
                        self.skip_regexp(true)?;
                    }
                }
                _ => {}
            }
            if c > ' ' {
                left = c;
            }
        }
    }

    /// Rewrite a recognized tagged comment.
    ///
    /// Four shapes and no others: a bare block, an `if`-guarded block, a
    /// bound-method call, or an `if`-guarded bound-method call.
    fn expand(&mut self, index: usize) -> Scan {
        if self.peek() == Some('(') {
            self.emit("if ");
            self.get(true);
            self.condition()?;
            self.emit_char(' ');
        }
        self.emit_char('{');
        let method = self.tags.get(index).method().map(str::to_owned);
        match method {
            Some(method) => {
                self.emit(&method);
                self.emit_char('(');
                self.stuff()?;
                self.emit(");}");
            }
            None => {
                self.stuff()?;
                self.emit_char('}');
            }
        }
        Ok(())
    }

    /// Handle a block comment whose `/*` has been consumed but not echoed.
    ///
    /// The run of tag-charset characters after the opener is the candidate
    /// name; the first character past it goes back into the lookahead slot.
    /// A declared tag expands; anything else is copied through verbatim,
    /// rejecting nested or unterminated comments.
    fn comment(&mut self) -> Scan {
        let mut name = String::new();
        loop {
            match self.get(false) {
                Some(c) if is_tag_char(c) => name.push(c),
                Some(c) => {
                    self.unget(c);
                    break;
                }
                None => break,
            }
        }
        if let Some(index) = self.tags.find(&name) {
            return self.expand(index);
        }
        self.emit("/*");
        self.emit(&name);
        loop {
            let Some(c) = self.get(true) else {
                return Err(ConvertError::UnterminatedComment { line: self.line() });
            };
            match c {
                '*' if self.peek() == Some('/') => {
                    self.get(true);
                    return Ok(());
                }
                '/' if self.peek() == Some('*') => {
                    return Err(ConvertError::NestedComment { line: self.line() });
                }
                _ => {}
            }
        }
    }

    /// The main scan loop.
    ///
    /// `left` is the last significant character seen in ordinary code, used
    /// only to decide whether a bare `/` opens a regexp. It starts undefined,
    /// and comments do not update it (they are whitespace to the heuristic).
    fn run(&mut self) -> Scan {
        let mut left: Option<char> = None;
        loop {
            let Some(c) = self.get(false) else {
                return Ok(());
            };
            match c {
                '"' | '\'' => {
                    self.emit_char(c);
                    self.skip_string(c, false)?;
                    left = Some(c);
                }
                '/' => match self.peek() {
                    Some('/') => {
                        self.get(false);
                        self.emit("//");
                        while let Some(c) = self.get(true) {
                            if c == '\n' {
                                break;
                            }
                        }
                    }
                    Some('*') => {
                        self.get(false);
                        self.comment()?;
                    }
                    _ => {
                        self.emit_char('/');
                        if precedes_regexp(left) {
                            self.skip_regexp(false)?;
                        }
                        left = Some('/');
                    }
                },
                _ => {
                    self.emit_char(c);
                    if c > ' ' {
                        left = Some(c);
                    }
                }
            }
        }
    }
}

/// Convert a block of source text with an already-parsed tag set.
///
/// `comments` entries become `// <entry>` header lines ahead of the converted
/// text; an empty slice emits no header.
pub fn convert_with_tags(
    source: &str,
    tags: &TagSet,
    comments: &[&str],
) -> Result<String, ConvertError> {
    run_conversion(CharStream::from_text(source), tags, comments)
}

/// Convert a block of source text.
///
/// `tags` declares the active tags as `tag` or `tag:method` strings; see
/// [`TagSet::parse`] for validation rules. On any error the run aborts and
/// nothing is returned.
pub fn convert(source: &str, tags: &[&str], comments: &[&str]) -> Result<String, ConvertError> {
    let tag_set = TagSet::parse(tags)?;
    convert_with_tags(source, &tag_set, comments)
}

/// Convert pre-split source lines. Identical to joining the lines with `\n`
/// and calling [`convert`].
pub fn convert_lines(
    lines: &[&str],
    tags: &[&str],
    comments: &[&str],
) -> Result<String, ConvertError> {
    let tag_set = TagSet::parse(tags)?;
    run_conversion(CharStream::from_text(&lines.join("\n")), &tag_set, comments)
}

fn run_conversion(
    stream: CharStream,
    tags: &TagSet,
    comments: &[&str],
) -> Result<String, ConvertError> {
    let mut converter = Converter::new(stream, tags);
    for comment in comments {
        converter.emit("// ");
        converter.emit(comment);
        converter.emit_char('\n');
    }
    converter.run()?;
    Ok(converter.output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debug_only(source: &str) -> Result<String, ConvertError> {
        convert(source, &["debug"], &[])
    }

    #[test]
    fn test_bare_expansion() {
        assert_eq!(debug_only("/*debug x=1;*/").unwrap(), "{x=1;}");
    }

    #[test]
    fn test_guarded_expansion() {
        assert_eq!(debug_only("/*debug(flag) x=1;*/").unwrap(), "if (flag) {x=1;}");
    }

    #[test]
    fn test_bound_method_expansion() {
        let out = convert("/*log \"hi\"*/", &["log:console.log"], &[]).unwrap();
        assert_eq!(out, "{console.log(\"hi\");}");
    }

    #[test]
    fn test_guarded_bound_method_expansion() {
        let out = convert("/*alarm(level>5) \"loud\"*/", &["alarm:alert"], &[]).unwrap();
        assert_eq!(out, "if (level>5) {alert(\"loud\");}");
    }

    #[test]
    fn test_empty_body_expands_to_empty_block() {
        assert_eq!(debug_only("/*debug*/").unwrap(), "{}");
        assert_eq!(debug_only("/*debug(x)*/").unwrap(), "if (x) {}");
    }

    #[test]
    fn test_candidate_must_match_whole_name() {
        // "debugx" is a different name; the comment is not a tag.
        assert_eq!(debug_only("/*debugx 1*/").unwrap(), "/*debugx 1*/");
    }

    #[test]
    fn test_unknown_comment_is_preserved() {
        assert_eq!(debug_only("/*unknown stuff*/").unwrap(), "/*unknown stuff*/");
        assert_eq!(debug_only("/**/").unwrap(), "/**/");
        assert_eq!(debug_only("/* not a tag */").unwrap(), "/* not a tag */");
    }

    #[test]
    fn test_line_comment_is_preserved() {
        assert_eq!(debug_only("a; // trailing\nb;").unwrap(), "a; // trailing\nb;");
        assert_eq!(debug_only("// only").unwrap(), "// only");
    }

    #[test]
    fn test_stars_inside_body_are_literal() {
        assert_eq!(debug_only("/*debug a ** b;*/").unwrap(), "{a ** b;}");
    }

    #[test]
    fn test_body_spans_lines() {
        assert_eq!(debug_only("/*debug x;\ny;*/").unwrap(), "{x;\ny;}");
    }

    #[test]
    fn test_condition_allows_nested_brackets() {
        assert_eq!(
            debug_only("/*debug(o[{a:1}].b) x*/").unwrap(),
            "if (o[{a:1}].b) {x}"
        );
    }

    #[test]
    fn test_regexp_division_heuristic() {
        // After '=', a slash opens a regexp; the quote inside it is not a string.
        assert_eq!(debug_only("x = /\"/;").unwrap(), "x = /\"/;");
        // After an operand, a slash is division.
        assert_eq!(debug_only("x = a / b;").unwrap(), "x = a / b;");
    }

    #[test]
    fn test_string_hides_comment_opener() {
        assert_eq!(debug_only("s = \"/*debug x*/\";").unwrap(), "s = \"/*debug x*/\";");
    }

    #[test]
    fn test_escaped_close_in_body_string() {
        assert_eq!(
            debug_only("/*debug s=\"a*\\/b\";*/").unwrap(),
            "{s=\"a*\\/b\";}"
        );
    }

    #[test]
    fn test_header_comments_lead_the_output() {
        let out = convert("x;", &["debug"], &["Build A"]).unwrap();
        assert_eq!(out, "// Build A\nx;");
    }

    #[test]
    fn test_scanning_resumes_after_expansion() {
        assert_eq!(
            debug_only("a;/*debug b;*/c;").unwrap(),
            "a;{b;}c;"
        );
    }

    #[test]
    fn test_unbalanced_body_is_fatal() {
        assert_eq!(
            debug_only("/*debug if(x){y*/"),
            Err(ConvertError::UnbalancedBody { line: 1 })
        );
        assert_eq!(
            debug_only("/*debug )x*/"),
            Err(ConvertError::UnbalancedBody { line: 1 })
        );
    }

    #[test]
    fn test_balanced_body_is_accepted() {
        assert_eq!(debug_only("/*debug if(x){y}*/").unwrap(), "{if(x){y}}");
    }

    #[test]
    fn test_close_comment_inside_body_string_is_fatal() {
        assert_eq!(
            debug_only("/*debug s=\"a*/b\";*/"),
            Err(ConvertError::CloseCommentInLiteral { line: 1 })
        );
    }

    #[test]
    fn test_unterminated_string_reports_opening_line() {
        assert_eq!(
            debug_only("a;\nb = 'open\nc;"),
            Err(ConvertError::UnterminatedString { line: 2 })
        );
    }

    #[test]
    fn test_nested_comment_is_fatal() {
        assert_eq!(
            debug_only("/*plain /* inner */"),
            Err(ConvertError::NestedComment { line: 1 })
        );
    }
}
