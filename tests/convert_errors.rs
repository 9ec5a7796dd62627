//! Fatal error behavior of the conversion entry points
//!
//! Every failure aborts the whole run: there is no partial output. Scan
//! errors carry the 1-based line they are reported against; configuration
//! errors are detected before any scanning and carry no line.

use devtag::{convert, ConvertError};

#[test]
fn test_malformed_declaration_is_rejected_before_scanning() {
    // The source itself would also fail, but configuration is validated first.
    let result = convert("'unterminated", &["log: console.log"], &[]);
    assert_eq!(
        result,
        Err(ConvertError::BadTag("log: console.log".to_string()))
    );
}

#[test]
fn test_empty_tag_configuration_is_rejected() {
    let no_tags: &[&str] = &[];
    assert_eq!(convert("x;", no_tags, &[]), Err(ConvertError::MissingTags));
}

#[test]
fn test_bad_tag_message_has_no_line_number() {
    let err = convert("x;", &["a b"], &[]).unwrap_err();
    assert_eq!(err.line(), None);
    assert_eq!(err.to_string(), "bad tag: \"a b\"");
}

#[test]
fn test_unterminated_string_literal() {
    let err = convert("var s = 'open;\n", &["debug"], &[]).unwrap_err();
    assert_eq!(err, ConvertError::UnterminatedString { line: 1 });
}

#[test]
fn test_unterminated_string_cites_the_line_it_began_on() {
    let err = convert("a;\nb;\nvar s = \"open\nmore\nmore", &["debug"], &[]).unwrap_err();
    assert_eq!(err, ConvertError::UnterminatedString { line: 3 });
}

#[test]
fn test_unterminated_regexp_literal() {
    let err = convert("var re = /never", &["debug"], &[]).unwrap_err();
    assert_eq!(err, ConvertError::UnterminatedRegexp { line: 1 });
}

#[test]
fn test_close_comment_inside_body_string() {
    let err = convert("/*debug s=\"a*/b\";*/", &["debug"], &[]).unwrap_err();
    assert_eq!(err, ConvertError::CloseCommentInLiteral { line: 1 });
}

#[test]
fn test_close_comment_inside_body_regexp() {
    let err = convert("/*debug m=/a*/;*/", &["debug"], &[]).unwrap_err();
    assert_eq!(err, ConvertError::CloseCommentInLiteral { line: 1 });
}

#[test]
fn test_regexp_closer_starting_a_comment_in_body() {
    let err = convert("/*debug m=/a//; x*/", &["debug"], &[]).unwrap_err();
    assert_eq!(err, ConvertError::UnexpectedComment { line: 1 });
}

#[test]
fn test_unterminated_condition() {
    let err = convert("/*debug(a && b x;*/", &["debug"], &[]).unwrap_err();
    assert_eq!(err, ConvertError::UnterminatedCondition { line: 1 });
}

#[test]
fn test_unbalanced_body_open_bracket() {
    let err = convert("/*debug if(x){y*/", &["debug"], &[]).unwrap_err();
    assert_eq!(err, ConvertError::UnbalancedBody { line: 1 });
}

#[test]
fn test_unbalanced_body_early_close() {
    let err = convert("/*debug y)*/", &["debug"], &[]).unwrap_err();
    assert_eq!(err, ConvertError::UnbalancedBody { line: 1 });
}

#[test]
fn test_unterminated_body() {
    let err = convert("/*debug x;", &["debug"], &[]).unwrap_err();
    assert_eq!(err, ConvertError::UnterminatedBody { line: 1 });
}

#[test]
fn test_unterminated_plain_comment() {
    let err = convert("/* never closed", &["debug"], &[]).unwrap_err();
    assert_eq!(err, ConvertError::UnterminatedComment { line: 1 });
}

#[test]
fn test_nested_comment_in_plain_comment() {
    let err = convert("/* outer /* inner */ */", &["debug"], &[]).unwrap_err();
    assert_eq!(err, ConvertError::NestedComment { line: 1 });
}

#[test]
fn test_error_lines_count_from_one_across_lines() {
    let err = convert("a;\nb;\n/*debug x;", &["debug"], &[]).unwrap_err();
    assert_eq!(err, ConvertError::UnterminatedBody { line: 3 });
}

#[test]
fn test_scan_error_messages_are_human_readable() {
    let err = convert("/*debug if(x){y*/", &["debug"], &[]).unwrap_err();
    assert_eq!(err.to_string(), "line 1: unbalanced comment body");
    assert_eq!(err.line(), Some(1));
}
