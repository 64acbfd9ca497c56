use super::*;

#[test]
fn test_tokenize_strips_tags() {
    assert_eq!(tokenize("<b>Hello</b> world"), vec!["Hello", "world"]);
}

#[test]
fn test_tokenize_plain_text() {
    assert_eq!(tokenize("  just text  "), vec!["just text"]);
}

#[test]
fn test_tokenize_drops_empty_pieces() {
    assert_eq!(
        tokenize("<lightgrey></lightgrey><white>You see here</white>  <yellow>a scroll</yellow>"),
        vec!["You see here", "a scroll"]
    );
    assert!(tokenize("<red></red>").is_empty());
}

#[test]
fn test_tokenize_ignores_non_lowercase_tags() {
    // Only lowercase tag names count as markup
    assert_eq!(tokenize("a <B> b <1> c"), vec!["a <B> b <1> c"]);
}

#[test]
fn test_quote_extracts_tagged_line() {
    let body = "A mighty sword.\n__________\n\n<lightcyan>Sharp and true.\n</lightcyan>rest";
    assert_eq!(quote(body), vec!["Sharp and true."]);
}

#[test]
fn test_quote_requires_ten_underscores() {
    let body = "_________\n\n<w>Nine only.\n</w>";
    assert!(quote(body).is_empty());
}

#[test]
fn test_quote_requires_blank_line() {
    let body = "____________\n<w>No gap.\n</w>";
    assert!(quote(body).is_empty());
}

#[test]
fn test_quote_absent() {
    assert!(quote("nothing to see").is_empty());
}

#[test]
fn test_quote_is_non_greedy() {
    let body = "__________\n\n<a>first\n<b> then __________\n\n<c>second\n<d>";
    assert_eq!(quote(body), vec!["first"]);
}

#[test]
fn test_lines_preserves_empty() {
    assert_eq!(lines("a\n\nb"), vec!["a", "", "b"]);
    assert_eq!(lines("trailing\n"), vec!["trailing", ""]);
    assert_eq!(lines("  spaced  "), vec!["  spaced  "]);
}

#[test]
fn test_registry_names() {
    assert_eq!(names(), vec!["lines", "quote", "tokenize"]);
    assert!(is_known("quote"));
    assert!(!is_known("shout"));
}

#[test]
fn test_apply_known_hook() {
    assert_eq!(apply(Some("lines"), "x\ny"), vec!["x", "y"]);
}

#[test]
fn test_unknown_hook_matches_no_hook() {
    let text = "<b>kept</b>\nas is";
    assert_eq!(apply(Some("nonexistent"), text), apply(None, text));
    assert_eq!(apply(None, text), vec![text]);
}
