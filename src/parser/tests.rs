//! Unit tests for the tree notation reader.

use crate::errors::errors::{ErrorImpl, Location};

use super::parser::parse_source;

#[test]
fn test_parse_single_leaf() {
    let (ast, root) = parse_source("x", None).unwrap();

    assert_eq!(ast.tag(root), "x");
    assert!(ast.get(root).is_leaf());
}

#[test]
fn test_parse_nested_tree() {
    let source = "(factor (integer 2) + (simple (integer 3) * (integer 4)))";
    let (ast, root) = parse_source(source, None).unwrap();

    assert_eq!(ast.tag(root), "factor");
    assert_eq!(ast.children(root).len(), 3);
    assert_eq!(ast.child_tag(root, 1), Some("+"));
    assert_eq!(ast.to_notation(root), source);
}

#[test]
fn test_parse_preserves_layout_independence() {
    let source = "(modifiable_primary_field\n   (modifiable_primary r)\n   (modifiable_primary a))";
    let (ast, root) = parse_source(source, None).unwrap();

    assert_eq!(
        ast.to_notation(root),
        "(modifiable_primary_field (modifiable_primary r) (modifiable_primary a))"
    );
}

#[test]
fn test_parse_unclosed_paren() {
    let error = parse_source("(factor (integer 1)", None).unwrap_err();

    assert_eq!(error.get_impl(), &ErrorImpl::UnexpectedEndOfInput);
}

#[test]
fn test_parse_missing_tag() {
    let error = parse_source("(()", None).unwrap_err();

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::UnexpectedToken {
            token: "(".to_string()
        }
    );
    match error.get_location() {
        Location::Source(position) => assert_eq!(position.0, 1),
        other => panic!("Expected source location, found {:?}", other),
    }
}

#[test]
fn test_parse_rejects_trailing_trees() {
    let error = parse_source("(integer 1) (integer 2)", None).unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_parse_empty_input() {
    let error = parse_source("   ", None).unwrap_err();

    assert_eq!(error.get_impl(), &ErrorImpl::UnexpectedEndOfInput);
}
