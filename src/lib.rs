#![allow(clippy::module_inception)]

use std::{path::Path, rc::Rc};

use crate::{
    ast::ast::Ast,
    errors::errors::{Error, ErrorTip, Location},
};

pub mod analyzer;
pub mod ast;
pub mod control_table;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod types;

extern crate regex;

/// Byte offset into a named tree notation source.
#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Returns the 1-based line number, the line text and the offset within that line of
/// byte `position` in `content`. An offset one past the end maps onto the last line.
pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;
    if pos > content.len() {
        return None;
    }

    let mut start = 0;
    let mut last = None;
    for (index, line) in content.split_inclusive('\n').enumerate() {
        let end = start + line.len();
        if (start..end).contains(&pos) {
            return Some((index + 1, line.to_string(), pos - start));
        }

        last = Some((index + 1, line.to_string(), pos - start));
        start = end;
    }

    last
}

#[cfg(test)]
mod tests {
    const CONTENT: &str = "(program\n  (variable_declaration a\n    (type integer)))\n";

    #[test]
    fn test_get_line_at_position() {
        let (line_number, line, line_pos) = super::get_line_at_position(CONTENT, 3).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "(program\n");
        assert_eq!(line_pos, 3);

        let (line_number, line, line_pos) = super::get_line_at_position(CONTENT, 39).unwrap();
        assert_eq!(line_number, 3);
        assert_eq!(line, "    (type integer)))\n");
        assert_eq!(line_pos, 4);
    }

    #[test]
    fn test_get_line_at_end_of_input() {
        let (line_number, _, line_pos) =
            super::get_line_at_position("(program", 8).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line_pos, 8);

        assert!(super::get_line_at_position("(program", 9).is_none());
    }
}

fn print_header(error: &Error, file: &Path) {
    if let ErrorTip::None = error.get_tip() {
        println!("Error: {}", error.get_error_name());
    } else {
        println!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    println!("-> {}", file.as_os_str().to_string_lossy());
}

/// Prints an error with the offending source line or node.
///
/// ```text
/// Error: UnexpectedToken (Unexpected token: `)`, is a parenthesis unbalanced?)
/// -> input.tree
///    |
/// 20 | (factor (integer 1) +))
///    | ---------------------^
/// ```
///
/// Errors located at a node print the node in tree notation instead.
pub fn display_error(error: &Error, file: &Path, content: &str, ast: Option<&Ast>) {
    print_header(error, file);

    match error.get_location() {
        Location::Source(position) => {
            let Some((line, line_text, line_pos)) = get_line_at_position(content, position.0) else {
                println!("   | at byte {}", position.0);
                return;
            };

            let line_string = line.to_string();
            let padding = line_string.len() + 2;
            println!("{:>padding$}", "|");

            let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
            println!("{} | {}", line_string, line_text_removed.trim_end());

            let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
            println!("{:>padding$} {:->arrows$}", "|", "^");
        }
        Location::Node(node) => match ast {
            Some(ast) if node.0 < ast.len() => {
                println!("   | <{}>", ast.tag(*node));
                println!("   | {}", ast.to_notation(*node));
            }
            _ => println!("   | node {}", node.0),
        },
        Location::Unknown => {}
    }
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.chars().take_while(|c| *c == ' ').count();

    (String::from(&string[start..]), start)
}
