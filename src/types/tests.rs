use crate::ast::ast::NodeId;
use crate::errors::errors::ErrorImpl;

use super::symbol_table::SymbolTable;
use super::type_table::TypeTable;
use super::types::{GeneratedType, Type, Variable};

#[test]
fn test_type_table_rejects_duplicates() {
    let mut table = TypeTable::new();
    table.add_simple_type("count", Type::simple("integer")).unwrap();

    let error = table.add_simple_type("count", Type::simple("real")).unwrap_err();

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::TypeAlreadyDeclared {
            name: "count".to_string()
        }
    );
    assert_eq!(table.get_type("count"), Some(&Type::simple("integer")));
}

#[test]
fn test_type_table_array_and_record() {
    let mut table = TypeTable::new();
    table
        .add_array_type("vector", NodeId(4), Type::simple("real"))
        .unwrap();
    table
        .add_record_type(
            "point",
            vec![
                Variable::new("x", Type::simple("real"), None),
                Variable::new("y", Type::simple("real"), None),
            ],
        )
        .unwrap();

    assert_eq!(
        table.get_type("vector"),
        Some(&Type::array(Type::simple("real"), NodeId(4)))
    );
    assert!(table.is_type("point"));
    assert_eq!(table.len(), 2);
}

#[test]
fn test_type_table_remove() {
    let mut table = TypeTable::new();
    table.add_type("flag", Type::simple("boolean")).unwrap();

    assert!(table.remove_type("flag"));
    assert!(!table.remove_type("flag"));
    assert!(!table.is_type("flag"));
    assert!(table.is_empty());
}

#[test]
fn test_symbol_table_single_namespace() {
    let mut table = SymbolTable::new();
    table.add_variable("x", Type::simple("integer"), None).unwrap();

    assert!(table.add_function("x", Type::NoType, vec![]).is_err());
    assert!(table.add_variable("x", Type::simple("real"), None).is_err());
    assert!(table.is_variable("x"));
    assert!(!table.is_function("x"));
    assert_eq!(
        table.get_variable("x").map(|variable| &variable.var_type),
        Some(&Type::simple("integer"))
    );
}

#[test]
fn test_symbol_table_counts_only_variables() {
    let mut table = SymbolTable::new();
    table.add_variable("a", Type::simple("integer"), None).unwrap();
    table.add_variable("b", Type::Auto, Some(NodeId(0))).unwrap();
    table
        .add_function("f", Type::simple("real"), vec![Variable::new("p", Type::simple("real"), None)])
        .unwrap();

    assert_eq!(table.get_count_variables(), 2);
    assert_eq!(table.get_function("f").map(|f| f.parameters.len()), Some(1));
    assert!(table.get_variable("f").is_none());
}

#[test]
fn test_record_field_first_match() {
    let record = Type::Record(vec![
        Variable::new("a", Type::simple("integer"), None),
        Variable::new("a", Type::simple("real"), None),
    ]);

    assert_eq!(
        record.get_field("a").map(|field| &field.var_type),
        Some(&Type::simple("integer"))
    );
    assert!(record.get_field("b").is_none());
    assert!(Type::simple("integer").get_field("a").is_none());
}

#[test]
fn test_type_display() {
    let record = Type::Record(vec![
        Variable::new("a", Type::simple("integer"), None),
        Variable::new("b", Type::array(Type::simple("real"), NodeId(0)), None),
    ]);

    assert_eq!(record.to_string(), "record { a: integer, b: array of real }");
    assert_eq!(Type::Record(vec![]).to_string(), "record { }");
    assert_eq!(Type::Auto.to_string(), "auto");
}

#[test]
fn test_generated_type_categories() {
    assert_eq!(GeneratedType::from_type(&Type::simple("boolean")), GeneratedType::Boolean);
    assert_eq!(GeneratedType::from_type(&Type::simple("integer")), GeneratedType::Integer);
    assert_eq!(GeneratedType::from_type(&Type::simple("real")), GeneratedType::Real);
    assert_eq!(
        GeneratedType::from_type(&Type::array(Type::simple("integer"), NodeId(0))),
        GeneratedType::ArrayInteger
    );
    assert_eq!(
        GeneratedType::from_type(&Type::array(Type::Record(vec![]), NodeId(0))),
        GeneratedType::Error
    );
    assert_eq!(GeneratedType::from_type(&Type::Record(vec![])), GeneratedType::Error);
    assert_eq!(GeneratedType::from_type(&Type::Auto), GeneratedType::Error);
}
