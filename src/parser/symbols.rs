// SPDX-License-Identifier: MIT OR Apache-2.0

//! Symbol extraction from source code using tree-sitter node traversal

use anyhow::Result;
use std::collections::{HashMap, HashSet};
use tree_sitter::{Node, Parser};

use crate::parser::languages::{self, LANGUAGES};

/// Symbol kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Function,
    Class,
    Interface,
    Type,
    Variable,
    Constant,
    Enum,
    Module,
    Struct,
    Trait,
    Method,
    Property,
    Unknown,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolKind::Function => write!(f, "function"),
            SymbolKind::Class => write!(f, "class"),
            SymbolKind::Interface => write!(f, "interface"),
            SymbolKind::Type => write!(f, "type"),
            SymbolKind::Variable => write!(f, "variable"),
            SymbolKind::Constant => write!(f, "constant"),
            SymbolKind::Enum => write!(f, "enum"),
            SymbolKind::Module => write!(f, "module"),
            SymbolKind::Struct => write!(f, "struct"),
            SymbolKind::Trait => write!(f, "trait"),
            SymbolKind::Method => write!(f, "method"),
            SymbolKind::Property => write!(f, "property"),
            SymbolKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Extracted symbol. Lines and columns are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
}

/// Symbol extractor using tree-sitter node traversal
pub struct SymbolExtractor;

impl Default for SymbolExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract symbols from source code
    pub fn extract(&self, source: &str, language: &str) -> Result<Vec<Symbol>> {
        let mut cache = HashMap::new();
        self.extract_with_cache(source, language, &mut cache)
    }

    /// Extract symbols while reusing parser instances per language. The
    /// indexer keeps one cache per worker thread.
    pub fn extract_with_cache(
        &self,
        source: &str,
        language: &str,
        cache: &mut HashMap<String, Parser>,
    ) -> Result<Vec<Symbol>> {
        use std::collections::hash_map::Entry;

        let parser = match cache.entry(language.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let lang = LANGUAGES.get(language).ok_or_else(|| {
                    anyhow::anyhow!(
                        "Unsupported language: {language} (supported: {})",
                        languages::supported().join(", ")
                    )
                })?;
                let mut parser = Parser::new();
                parser.set_language(lang)?;
                entry.insert(parser)
            }
        };

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("Failed to parse {language} source"))?;

        let mut symbols = Vec::new();
        traverse(tree.root_node(), source.as_bytes(), language, false, &mut symbols);

        let mut seen = HashSet::new();
        symbols.retain(|s| seen.insert((s.name.clone(), s.line, s.column)));
        symbols.sort_by(|a, b| (a.line, a.column).cmp(&(b.line, b.column)));

        Ok(symbols)
    }
}

/// Node kinds whose bodies turn contained functions into methods.
const TYPE_BODY_KINDS: [&str; 5] = [
    "class_definition",
    "impl_item",
    "trait_item",
    "class_specifier",
    "struct_specifier",
];

fn traverse(node: Node, source: &[u8], language: &str, in_type_body: bool, symbols: &mut Vec<Symbol>) {
    if let Some(symbol) = extract_symbol(node, source, language, in_type_body) {
        symbols.push(symbol);
    }

    let enclosed = in_type_body || TYPE_BODY_KINDS.contains(&node.kind());
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        traverse(child, source, language, enclosed, symbols);
    }
}

fn extract_symbol(node: Node, source: &[u8], language: &str, in_type_body: bool) -> Option<Symbol> {
    let node_kind = node.kind();

    let (kind, name) = match language {
        "c" | "cpp" => match_c_family(node, source, language, in_type_body)?,
        "go" if node_kind == "type_spec" => {
            let kind = match node.child_by_field_name("type").map(|t| t.kind()) {
                Some("struct_type") => SymbolKind::Struct,
                Some("interface_type") => SymbolKind::Interface,
                _ => SymbolKind::Type,
            };
            (kind, field_text(node, "name", source)?)
        }
        "java" if node_kind == "field_declaration" => {
            let declarator = node.child_by_field_name("declarator")?;
            (SymbolKind::Property, field_text(declarator, "name", source)?)
        }
        _ => {
            let (base_kind, name_field) = rule(language, node_kind)?;
            let kind = promote_to_method(base_kind, language, node_kind, in_type_body);
            (kind, field_text(node, name_field, source)?)
        }
    };

    Some(Symbol {
        name,
        kind,
        line: node.start_position().row + 1,
        column: node.start_position().column + 1,
        end_line: node.end_position().row + 1,
    })
}

/// The (kind, name-field) table for languages whose definition nodes carry a
/// plain `name` field.
fn rule(language: &str, node_kind: &str) -> Option<(SymbolKind, &'static str)> {
    let matched = match language {
        "typescript" | "javascript" => match node_kind {
            "function_declaration" | "generator_function_declaration" => {
                (SymbolKind::Function, "name")
            }
            "class_declaration" => (SymbolKind::Class, "name"),
            "interface_declaration" => (SymbolKind::Interface, "name"),
            "type_alias_declaration" => (SymbolKind::Type, "name"),
            "enum_declaration" => (SymbolKind::Enum, "name"),
            "method_definition" => (SymbolKind::Method, "name"),
            "variable_declarator" => (SymbolKind::Variable, "name"),
            _ => return None,
        },
        "python" => match node_kind {
            "function_definition" => (SymbolKind::Function, "name"),
            "class_definition" => (SymbolKind::Class, "name"),
            _ => return None,
        },
        "rust" => match node_kind {
            "function_item" => (SymbolKind::Function, "name"),
            "struct_item" => (SymbolKind::Struct, "name"),
            "trait_item" => (SymbolKind::Trait, "name"),
            "enum_item" => (SymbolKind::Enum, "name"),
            "mod_item" => (SymbolKind::Module, "name"),
            "const_item" | "static_item" => (SymbolKind::Constant, "name"),
            "type_item" => (SymbolKind::Type, "name"),
            _ => return None,
        },
        "go" => match node_kind {
            "function_declaration" => (SymbolKind::Function, "name"),
            "method_declaration" => (SymbolKind::Method, "name"),
            "const_spec" => (SymbolKind::Constant, "name"),
            "var_spec" => (SymbolKind::Variable, "name"),
            _ => return None,
        },
        "java" => match node_kind {
            "class_declaration" => (SymbolKind::Class, "name"),
            "interface_declaration" => (SymbolKind::Interface, "name"),
            "enum_declaration" => (SymbolKind::Enum, "name"),
            "method_declaration" | "constructor_declaration" => (SymbolKind::Method, "name"),
            _ => return None,
        },
        _ => return None,
    };
    Some(matched)
}

fn promote_to_method(
    kind: SymbolKind,
    language: &str,
    node_kind: &str,
    in_type_body: bool,
) -> SymbolKind {
    if !in_type_body {
        return kind;
    }
    let is_function_node = matches!(
        (language, node_kind),
        ("python", "function_definition") | ("rust", "function_item")
    );
    if is_function_node {
        SymbolKind::Method
    } else {
        kind
    }
}

/// C and C++ definitions hide their names inside declarator chains, and type
/// specifiers double as references, so they get their own matcher.
fn match_c_family(
    node: Node,
    source: &[u8],
    language: &str,
    in_type_body: bool,
) -> Option<(SymbolKind, String)> {
    match node.kind() {
        "function_definition" => {
            let name_node = declarator_identifier(node)?;
            let name = name_node.utf8_text(source).ok()?.trim().to_string();
            if name.is_empty() {
                return None;
            }
            let kind = if language == "cpp" && in_type_body {
                SymbolKind::Method
            } else {
                SymbolKind::Function
            };
            Some((kind, name))
        }
        // A specifier without a body is a reference, not a definition.
        "struct_specifier" | "union_specifier" if has_body(node) => {
            Some((SymbolKind::Struct, field_text(node, "name", source)?))
        }
        "class_specifier" if language == "cpp" && has_body(node) => {
            Some((SymbolKind::Class, field_text(node, "name", source)?))
        }
        "enum_specifier" if has_body(node) => {
            Some((SymbolKind::Enum, field_text(node, "name", source)?))
        }
        "type_definition" => Some((SymbolKind::Type, field_text(node, "declarator", source)?)),
        "namespace_definition" if language == "cpp" => {
            Some((SymbolKind::Module, field_text(node, "name", source)?))
        }
        _ => None,
    }
}

fn has_body(node: Node) -> bool {
    node.child_by_field_name("body").is_some()
}

fn field_text(node: Node, field: &str, source: &[u8]) -> Option<String> {
    let text = node.child_by_field_name(field)?.utf8_text(source).ok()?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Walk a declarator chain down to the identifier that names the definition,
/// e.g. `static Point *make_point(void)` or `Point::origin`.
fn declarator_identifier(node: Node) -> Option<Node> {
    let mut current = node.child_by_field_name("declarator")?;
    loop {
        match current.kind() {
            "identifier" | "field_identifier" | "type_identifier" | "operator_name"
            | "destructor_name" => return Some(current),
            "qualified_identifier" => {
                current = current.child_by_field_name("name")?;
            }
            _ => {
                if let Some(next) = current.child_by_field_name("declarator") {
                    current = next;
                } else {
                    // Reference and parenthesized declarators don't always
                    // expose a declarator field; scan named children.
                    let mut cursor = current.walk();
                    let next = current.named_children(&mut cursor).find(|child| {
                        child.kind().ends_with("declarator") || child.kind().ends_with("identifier")
                    })?;
                    current = next;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str, language: &str) -> Vec<Symbol> {
        SymbolExtractor::new()
            .extract(source, language)
            .expect("extract symbols")
    }

    fn find<'a>(symbols: &'a [Symbol], name: &str) -> &'a Symbol {
        symbols
            .iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("symbol {name:?} not found in {symbols:?}"))
    }

    #[test]
    fn typescript_classes_methods_and_interfaces() {
        let source = r#"
export class Calculator {
  memory: number = 0;
  add(a: number, b: number): number {
    return a + b;
  }
}

export interface Adder {
  add(a: number, b: number): number;
}

export function makeCalculator(): Calculator {
  return new Calculator();
}

export const DEFAULT_PRECISION = 2;
"#;
        let symbols = extract(source, "typescript");

        assert_eq!(find(&symbols, "Calculator").kind, SymbolKind::Class);
        assert_eq!(find(&symbols, "Adder").kind, SymbolKind::Interface);
        assert_eq!(find(&symbols, "makeCalculator").kind, SymbolKind::Function);
        assert_eq!(find(&symbols, "DEFAULT_PRECISION").kind, SymbolKind::Variable);
        // Only the class method counts; the interface signature is not a
        // method_definition node.
        let adds: Vec<_> = symbols.iter().filter(|s| s.name == "add").collect();
        assert_eq!(adds.len(), 1);
        assert_eq!(adds[0].kind, SymbolKind::Method);
        let class = find(&symbols, "Calculator");
        assert_eq!(class.line, 2);
        assert!(class.end_line > class.line);
    }

    #[test]
    fn python_functions_inside_classes_become_methods() {
        let source = r#"
import math

def helper(x):
    return x * 2

class Shape:
    def area(self):
        return 0

    def name(self):
        return "shape"
"#;
        let symbols = extract(source, "python");

        assert_eq!(find(&symbols, "helper").kind, SymbolKind::Function);
        assert_eq!(find(&symbols, "Shape").kind, SymbolKind::Class);
        assert_eq!(find(&symbols, "area").kind, SymbolKind::Method);
        assert_eq!(find(&symbols, "name").kind, SymbolKind::Method);
    }

    #[test]
    fn rust_items_and_impl_methods() {
        let source = r#"
pub struct Token {
    pub text: String,
}

pub trait Scan {
    fn scan(&self) -> Token;
}

impl Token {
    pub fn empty() -> Self {
        Token { text: String::new() }
    }
}

pub fn tokenize(input: &str) -> Vec<Token> {
    Vec::new()
}

pub const MAX_DEPTH: usize = 16;
"#;
        let symbols = extract(source, "rust");

        assert_eq!(find(&symbols, "Token").kind, SymbolKind::Struct);
        assert_eq!(find(&symbols, "Scan").kind, SymbolKind::Trait);
        assert_eq!(find(&symbols, "scan").kind, SymbolKind::Method);
        assert_eq!(find(&symbols, "empty").kind, SymbolKind::Method);
        assert_eq!(find(&symbols, "tokenize").kind, SymbolKind::Function);
        assert_eq!(find(&symbols, "MAX_DEPTH").kind, SymbolKind::Constant);
    }

    #[test]
    fn go_type_specs_distinguish_structs_and_interfaces() {
        let source = "
package calc

type Calculator struct {
\tMemory float64
}

type Adder interface {
\tAdd(a, b float64) float64
}

type Celsius float64

const MaxDigits = 10

func New() *Calculator {
\treturn &Calculator{}
}

func (c *Calculator) Add(a, b float64) float64 {
\treturn a + b
}
";
        let symbols = extract(source, "go");

        assert_eq!(find(&symbols, "Calculator").kind, SymbolKind::Struct);
        assert_eq!(find(&symbols, "Adder").kind, SymbolKind::Interface);
        assert_eq!(find(&symbols, "Celsius").kind, SymbolKind::Type);
        assert_eq!(find(&symbols, "MaxDigits").kind, SymbolKind::Constant);
        assert_eq!(find(&symbols, "New").kind, SymbolKind::Function);
        assert_eq!(find(&symbols, "Add").kind, SymbolKind::Method);
    }

    #[test]
    fn java_members_and_field_properties() {
        let source = r#"
public interface Calculator {
    double add(double a, double b);
}

class Operation {
    private String type;

    public Operation(String type) {
        this.type = type;
    }

    public String getType() {
        return type;
    }
}
"#;
        let symbols = extract(source, "java");

        assert_eq!(find(&symbols, "Calculator").kind, SymbolKind::Interface);
        assert_eq!(find(&symbols, "add").kind, SymbolKind::Method);
        assert_eq!(find(&symbols, "Operation").kind, SymbolKind::Class);
        assert_eq!(find(&symbols, "type").kind, SymbolKind::Property);
        assert_eq!(find(&symbols, "getType").kind, SymbolKind::Method);
        let constructors: Vec<_> = symbols
            .iter()
            .filter(|s| s.name == "Operation" && s.kind == SymbolKind::Method)
            .collect();
        assert_eq!(constructors.len(), 1);
    }

    #[test]
    fn c_definitions_resolve_declarator_names() {
        let source = r#"
#include <math.h>

struct Point {
    double x;
    double y;
};

typedef struct Point Point;

enum Direction { NORTH, SOUTH };

double distance(struct Point a, struct Point b) {
    double dx = a.x - b.x;
    double dy = a.y - b.y;
    return sqrt(dx * dx + dy * dy);
}
"#;
        let symbols = extract(source, "c");

        let structs: Vec<_> = symbols
            .iter()
            .filter(|s| s.name == "Point" && s.kind == SymbolKind::Struct)
            .collect();
        assert_eq!(structs.len(), 1, "bodyless references must not count");
        assert!(symbols
            .iter()
            .any(|s| s.name == "Point" && s.kind == SymbolKind::Type));
        assert_eq!(find(&symbols, "Direction").kind, SymbolKind::Enum);
        assert_eq!(find(&symbols, "distance").kind, SymbolKind::Function);
    }

    #[test]
    fn cpp_classes_namespaces_and_methods() {
        let source = r#"
#include <cmath>

namespace geometry {

class Point {
public:
    double x, y;

    Point(double x, double y) : x(x), y(y) {}

    double norm() const {
        return std::sqrt(x * x + y * y);
    }
};

double area(double radius);

double area(double radius) {
    return 3.14159 * radius * radius;
}

}
"#;
        let symbols = extract(source, "cpp");

        assert_eq!(find(&symbols, "geometry").kind, SymbolKind::Module);
        assert_eq!(find(&symbols, "Point").kind, SymbolKind::Class);
        assert_eq!(find(&symbols, "norm").kind, SymbolKind::Method);
        // The prototype is a declaration; only the definition counts.
        let areas: Vec<_> = symbols.iter().filter(|s| s.name == "area").collect();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].kind, SymbolKind::Function);
        assert!(symbols
            .iter()
            .any(|s| s.name == "Point" && s.kind == SymbolKind::Method));
    }

    #[test]
    fn unsupported_language_is_an_error() {
        let err = SymbolExtractor::new()
            .extract("def x; end", "ruby")
            .expect_err("ruby is not supported");
        assert!(err.to_string().contains("Unsupported language"));
    }

    #[test]
    fn empty_source_yields_no_symbols() {
        assert!(extract("", "rust").is_empty());
    }

    #[test]
    fn parser_cache_is_reused_across_files() {
        let extractor = SymbolExtractor::new();
        let mut cache = HashMap::new();
        extractor
            .extract_with_cache("fn a() {}", "rust", &mut cache)
            .expect("first file");
        extractor
            .extract_with_cache("fn b() {}", "rust", &mut cache)
            .expect("second file");
        extractor
            .extract_with_cache("def c(): pass", "python", &mut cache)
            .expect("third file");
        assert_eq!(cache.len(), 2);
    }
}
