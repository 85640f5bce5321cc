//! Integration tests for end-to-end analysis.
//!
//! These tests run the complete pipeline from tree notation text through
//! tokenization, reading, declaration, lvalue checking and constant folding.

use semantic_core::{
    analyzer::analyzer::{analyze, Analysis, AnalyzerOptions},
    ast::ast::{Ast, NodeId},
    errors::errors::Location,
    lexer::lexer::tokenize,
    parser::parser::parse,
    types::types::GeneratedType,
};

fn analyze_source(source: &str) -> (Ast, NodeId, Analysis) {
    let tokens = tokenize(source.to_string(), Some("test.tree".to_string())).unwrap();
    let (mut ast, root) = parse(tokens).unwrap();
    let analysis = analyze(&mut ast, root, &AnalyzerOptions::default());
    (ast, root, analysis)
}

#[test]
fn test_analyze_and_fold_program() {
    let source = r#"
        ; sums the first n squares
        (program
          (variable_declaration n (type integer) (simple (integer 3) * (integer 4)))
          (variable_declaration scale (type real) (factor (integer 1) + (real 0.5)))
          (routine_declaration squares
            (type integer)
            (body
              (variable_declaration_auto sum (integer 0))
              (for_loop i (range (integer 1) (modifiable_primary n))
                (body
                  (assignment (modifiable_primary sum)
                    (factor (modifiable_primary sum)
                      + (simple (modifiable_primary i) * (modifiable_primary i))))))
              (return_statement (modifiable_primary sum)))))
    "#;

    let (ast, root, analysis) = analyze_source(source);

    assert!(!analysis.has_errors());
    assert_eq!(
        ast.to_notation(root),
        "(program \
         (variable_declaration n (type integer) (integer 12)) \
         (variable_declaration scale (type real) (real 1.5)) \
         (routine_declaration squares (type integer) (body \
         (variable_declaration_auto sum (integer 0)) \
         (for_loop i (range (integer 1) (modifiable_primary n)) (body \
         (assignment (modifiable_primary sum) (factor (modifiable_primary sum) + \
         (simple (modifiable_primary i) * (modifiable_primary i)))))) \
         (return_statement (modifiable_primary sum)))))"
    );
    assert_eq!(analysis.table.count_variables(analysis.table.root(), true), 4);
}

#[test]
fn test_folded_tree_is_stable() {
    let source = "(program (variable_declaration x (type integer) \
                  (expression (relation (factor (integer 2) + (integer 2)) = (integer 4)) and (boolean true))))";

    let (ast, root, analysis) = analyze_source(source);
    assert!(!analysis.has_errors());
    let folded = ast.to_notation(root);
    assert_eq!(
        folded,
        "(program (variable_declaration x (type integer) (boolean true)))"
    );

    let (again, again_root, analysis) = analyze_source(&folded);
    assert!(!analysis.has_errors());
    assert_eq!(again.to_notation(again_root), folded);
}

#[test]
fn test_shadowing_across_routine_scope() {
    let source = r#"
        (program
          (variable_declaration x (type integer))
          (routine_declaration f
            (body
              (variable_declaration x (type real))
              (assignment (modifiable_primary x) (real 1.0)))))
    "#;

    let (_, _, analysis) = analyze_source(source);

    assert!(!analysis.has_errors());
    let table = &analysis.table;
    let f = table.get_sub_scope_table(table.root(), "f").unwrap();
    assert_eq!(table.get_generated_type(f, "x"), GeneratedType::Real);
    assert_eq!(table.get_generated_type(table.root(), "x"), GeneratedType::Integer);
}

#[test]
fn test_unknown_record_field() {
    let source = r#"
        (program
          (type_declaration Pair (type (record_type (variables_declaration
            (variable_declaration first (type integer))
            (variable_declaration second (type integer))))))
          (variable_declaration p (type Pair))
          (routine_declaration main
            (body
              (assignment (modifiable_primary_field (modifiable_primary p) (modifiable_primary first)) (integer 1))
              (assignment (modifiable_primary_field (modifiable_primary p) (modifiable_primary third)) (integer 3)))))
    "#;

    let (ast, _, analysis) = analyze_source(source);

    assert_eq!(analysis.errors.len(), 1);
    let error = &analysis.errors[0];
    assert_eq!(error.get_error_name(), "UnknownField");
    assert!(!error.is_fatal());
    assert_eq!(
        ast.to_notation(error.get_node().unwrap()),
        "(modifiable_primary third)"
    );
}

#[test]
fn test_fatal_boolean_conversion_in_condition() {
    let source = r#"
        (program
          (routine_declaration main
            (body
              (if_statement (expression (integer 2) and (boolean true))
                (body (return_statement)))
              (assignment (modifiable_primary missing) (integer 1)))))
    "#;

    let (_, _, analysis) = analyze_source(source);

    assert_eq!(analysis.errors.len(), 1);
    assert_eq!(
        analysis.fatal_error().map(|error| error.get_error_name()),
        Some("BooleanConversion")
    );
}

#[test]
fn test_unbalanced_input_reports_position() {
    let tokens = tokenize("(program (variable_declaration x".to_string(), None).unwrap();

    let error = parse(tokens).unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedEndOfInput");
    match error.get_location() {
        Location::Source(position) => {
            assert_eq!(position.0, 32);
            assert_eq!(position.1.as_str(), "shell");
        }
        other => panic!("Expected a source location, found {:?}", other),
    }
}

#[test]
fn test_print_tree() {
    let tokens = tokenize("(factor (integer 1) + (integer 2))".to_string(), None).unwrap();
    let (ast, root) = parse(tokens).unwrap();

    assert_eq!(
        ast.print_tree(root),
        "<factor>\n   <integer>\n      <1>\n   <+>\n   <integer>\n      <2>\n"
    );
}
