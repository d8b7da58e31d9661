//! Syntax-independent intermediate representation of one source file.
//!
//! A [`Normalizer`] turns a [`SourceFile`] into a [`FileIr`]: the structural
//! facts rules are evaluated against. Nodes are produced once per file and
//! never mutated afterwards.

use crate::source::{FileRole, SourceFile};
use serde::{Deserialize, Serialize};

/// A line/column range inside a source file. Lines and columns are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// First line.
    pub start_line: usize,
    /// First column.
    pub start_column: usize,
    /// Last line.
    pub end_line: usize,
    /// Column just past the end.
    pub end_column: usize,
}

impl Span {
    /// Creates a span.
    #[must_use]
    pub fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// A zero-width span at one position.
    #[must_use]
    pub fn point(line: usize, column: usize) -> Self {
        Self::new(line, column, line, column)
    }

    /// Whether the span lies within a file of `line_count` lines.
    #[must_use]
    pub fn within(&self, line_count: usize) -> bool {
        self.start_line >= 1 && self.start_line <= self.end_line && self.end_line <= line_count
    }
}

/// Import groups in the documented precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportGroup {
    /// `react`, `react-dom`, `next`.
    Framework,
    /// Router packages.
    Routing,
    /// Data-fetching / query packages.
    Query,
    /// Form and validation packages.
    Form,
    /// Any other bare package.
    External,
    /// App-internal modules (aliases and relative paths).
    Internal,
    /// `import type …`.
    Type,
}

impl ImportGroup {
    /// Every group, in documented order.
    pub const ALL: [Self; 7] = [
        Self::Framework,
        Self::Routing,
        Self::Query,
        Self::Form,
        Self::External,
        Self::Internal,
        Self::Type,
    ];

    /// Returns the catalog name of this group.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Framework => "framework",
            Self::Routing => "routing",
            Self::Query => "query",
            Self::Form => "form",
            Self::External => "external",
            Self::Internal => "internal",
            Self::Type => "type",
        }
    }
}

impl std::fmt::Display for ImportGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ImportGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| format!("unknown import group `{s}`"))
    }
}

/// An import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// Module specifier without quotes (e.g., `@tanstack/react-query`).
    pub source: String,
    /// Classified group.
    pub group: ImportGroup,
    /// `import type …`.
    pub type_only: bool,
    /// Imported local names.
    pub specifiers: Vec<String>,
    /// Statement location.
    pub span: Span,
}

/// How a function was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionStyle {
    /// `function Foo() {}`
    Declaration,
    /// `const Foo = () => {}`
    Arrow,
    /// `const Foo = function () {}`
    Expression,
}

/// Block-body metrics of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionBody {
    /// Line of the opening brace.
    pub open_line: usize,
    /// Column of the opening brace.
    pub open_column: usize,
    /// Line of the closing brace.
    pub close_line: usize,
    /// The line right after the opening brace is blank.
    pub blank_line_after_open: bool,
}

impl FunctionBody {
    /// Lines spanned from opening to closing brace, inclusive.
    #[must_use]
    pub fn line_count(&self) -> usize {
        (self.close_line + 1).saturating_sub(self.open_line)
    }
}

/// A top-level function (declaration or arrow/function-expression binding).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    /// Binding name, or `default` for anonymous default exports.
    pub name: String,
    /// Exported as the module default.
    pub is_default_export: bool,
    /// Exported by name or as default.
    pub is_exported: bool,
    /// Declaration style.
    pub style: FunctionStyle,
    /// Block body metrics; `None` for expression-bodied arrows.
    pub body: Option<FunctionBody>,
    /// Some return path yields JSX.
    pub returns_jsx: bool,
    /// Declaration location.
    pub span: Span,
}

impl FunctionDecl {
    /// Body length in lines, if the function has a block body.
    #[must_use]
    pub fn body_line_count(&self) -> Option<usize> {
        self.body.map(|b| b.line_count())
    }
}

/// A hook invocation at the top level of a function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookCall {
    /// Hook name (e.g., `useState`).
    pub name: String,
    /// Enclosing function name.
    pub function: String,
    /// Statement index within the body (0-based).
    pub position: usize,
    /// A non-hook statement precedes this call.
    pub after_non_hook: bool,
    /// Call location.
    pub span: Span,
}

/// A `return` inside a top-level `if` of a function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarlyReturn {
    /// Enclosing function name.
    pub function: String,
    /// Source text of the returned expression, if any.
    pub expression: Option<String>,
    /// Statement location.
    pub span: Span,
}

impl EarlyReturn {
    /// Whether the return yields `null`.
    #[must_use]
    pub fn returns_null(&self) -> bool {
        self.expression.as_deref() == Some("null")
    }
}

/// A JSX attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsxAttribute {
    /// Attribute name.
    pub name: String,
    /// Literal value, when statically known.
    pub value: Option<String>,
    /// Attribute location.
    pub span: Span,
}

/// A JSX element with its nested elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsxElement {
    /// Tag name; `<>` for fragments.
    pub tag: String,
    /// Attributes in source order.
    pub attributes: Vec<JsxAttribute>,
    /// Nested elements, including those inside `{…}` expressions.
    pub children: Vec<JsxElement>,
    /// Element location.
    pub span: Span,
}

impl JsxElement {
    /// Looks up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&JsxAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// This element and all descendants, in pre-order.
    #[must_use]
    pub fn walk(&self) -> Vec<&JsxElement> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

/// Shape of the expression returned from a reducer case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnShape {
    /// `return initialState;`
    Identifier(String),
    /// `return { ...initialState, … };`
    Spread(String),
    /// Anything else.
    Other(String),
    /// No return in the case body.
    Missing,
}

impl ReturnShape {
    /// Short description for messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Identifier(name) => name.clone(),
            Self::Spread(name) => format!("a copy of `{name}`"),
            Self::Other(text) => text.clone(),
            Self::Missing => "nothing".to_string(),
        }
    }
}

/// A `case` of a reducer `switch` over an action type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducerCase {
    /// Action type literal (or enum member name).
    pub action_type: String,
    /// What the case returns.
    pub returns: ReturnShape,
    /// Case location.
    pub span: Span,
}

/// A context created with `createContext`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextDecl {
    /// Binding name.
    pub name: String,
    /// Declaration location.
    pub span: Span,
}

/// Kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// `interface Foo {}`
    Interface,
    /// `type Foo = A | B`
    Union,
    /// Any other `type` alias.
    Alias,
}

/// A string-literal `type` discriminant of a union member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMember {
    /// Literal value.
    pub literal: String,
    /// Literal location.
    pub span: Span,
}

/// An interface or type alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    /// Type name.
    pub name: String,
    /// Declaration kind.
    pub kind: TypeKind,
    /// `type` discriminants of union members.
    pub action_literals: Vec<TypeMember>,
    /// Declaration location.
    pub span: Span,
}

/// Quote style of a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    /// `'…'`
    Single,
    /// `"…"`
    Double,
}

impl QuoteStyle {
    /// The quote character.
    #[must_use]
    pub fn quote_char(self) -> char {
        match self {
            Self::Single => '\'',
            Self::Double => '"',
        }
    }
}

/// Where a string literal appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralContext {
    /// Ordinary code.
    Code,
    /// A JSX attribute value.
    JsxAttribute,
    /// An `import`/`export … from` module specifier.
    ImportSource,
}

/// A quoted string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    /// Contents without quotes.
    pub value: String,
    /// Quote style.
    pub quote: QuoteStyle,
    /// Syntactic context.
    pub context: LiteralContext,
    /// Literal location.
    pub span: Span,
}

/// A `+` expression with a string operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringConcat {
    /// Expression location.
    pub span: Span,
}

/// One structural fact about a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrNode {
    /// Import statement.
    Import(ImportDecl),
    /// Top-level function.
    Function(FunctionDecl),
    /// Hook call in a function body.
    HookCall(HookCall),
    /// Early return in a function body.
    EarlyReturn(EarlyReturn),
    /// Root of a JSX tree.
    Jsx(JsxElement),
    /// Reducer switch case.
    ReducerCase(ReducerCase),
    /// `createContext` binding.
    Context(ContextDecl),
    /// Interface or type alias.
    Type(TypeDecl),
    /// Quoted string literal.
    StringLiteral(StringLiteral),
    /// String concatenation.
    StringConcat(StringConcat),
}

impl IrNode {
    /// Location of this node.
    #[must_use]
    pub fn span(&self) -> &Span {
        match self {
            Self::Import(n) => &n.span,
            Self::Function(n) => &n.span,
            Self::HookCall(n) => &n.span,
            Self::EarlyReturn(n) => &n.span,
            Self::Jsx(n) => &n.span,
            Self::ReducerCase(n) => &n.span,
            Self::Context(n) => &n.span,
            Self::Type(n) => &n.span,
            Self::StringLiteral(n) => &n.span,
            Self::StringConcat(n) => &n.span,
        }
    }
}

macro_rules! node_accessor {
    ($(#[$doc:meta] $method:ident => $variant:ident($ty:ty);)*) => {
        $(
            #[$doc]
            pub fn $method(&self) -> impl Iterator<Item = &$ty> {
                self.nodes.iter().filter_map(|n| match n {
                    IrNode::$variant(inner) => Some(inner),
                    _ => None,
                })
            }
        )*
    };
}

/// Normalized representation of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIr {
    /// Role of the owning file.
    pub role: FileRole,
    /// Nodes in source order.
    pub nodes: Vec<IrNode>,
}

impl FileIr {
    /// Creates an IR for a file of the given role.
    #[must_use]
    pub fn new(role: FileRole, nodes: Vec<IrNode>) -> Self {
        Self { role, nodes }
    }

    node_accessor! {
        /// Import statements.
        imports => Import(ImportDecl);
        /// Top-level functions.
        functions => Function(FunctionDecl);
        /// Hook calls.
        hook_calls => HookCall(HookCall);
        /// Early returns.
        early_returns => EarlyReturn(EarlyReturn);
        /// JSX roots.
        jsx_roots => Jsx(JsxElement);
        /// Reducer cases.
        reducer_cases => ReducerCase(ReducerCase);
        /// Context declarations.
        contexts => Context(ContextDecl);
        /// Type declarations.
        types => Type(TypeDecl);
        /// String literals.
        string_literals => StringLiteral(StringLiteral);
        /// String concatenations.
        string_concats => StringConcat(StringConcat);
    }

    /// Looks up a top-level function by name.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions().find(|f| f.name == name)
    }
}

/// A file that could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    /// What went wrong.
    pub message: String,
    /// Line of the first syntax error (1-indexed).
    pub line: usize,
    /// Column of the first syntax error (1-indexed).
    pub column: usize,
}

/// Turns source text into [`FileIr`].
///
/// Implementations must be all-or-nothing: a file that fails to parse
/// yields a [`ParseError`] and no IR.
pub trait Normalizer: Send + Sync {
    /// Language identifier (e.g., `"typescript"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this normalizer handles, without dots.
    fn extensions(&self) -> &'static [&'static str];

    /// Normalizes one file.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the file has syntax errors.
    fn normalize(&self, file: &SourceFile) -> Result<FileIr, ParseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_line_count_is_inclusive() {
        let body = FunctionBody {
            open_line: 5,
            open_column: 20,
            close_line: 8,
            blank_line_after_open: true,
        };
        assert_eq!(body.line_count(), 4);
    }

    #[test]
    fn jsx_walk_is_preorder() {
        let leaf = |tag: &str, line| JsxElement {
            tag: tag.into(),
            attributes: vec![],
            children: vec![],
            span: Span::point(line, 1),
        };
        let root = JsxElement {
            tag: "ul".into(),
            attributes: vec![],
            children: vec![leaf("li", 2), leaf("li", 3)],
            span: Span::point(1, 1),
        };
        let tags: Vec<_> = root.walk().iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, ["ul", "li", "li"]);
    }

    #[test]
    fn accessors_filter_by_variant() {
        let ir = FileIr::new(
            FileRole::Util,
            vec![
                IrNode::StringConcat(StringConcat {
                    span: Span::point(1, 1),
                }),
                IrNode::Context(ContextDecl {
                    name: "CartContext".into(),
                    span: Span::point(2, 1),
                }),
            ],
        );
        assert_eq!(ir.string_concats().count(), 1);
        assert_eq!(ir.contexts().next().map(|c| c.name.as_str()), Some("CartContext"));
        assert_eq!(ir.imports().count(), 0);
    }

    #[test]
    fn span_bounds() {
        assert!(Span::new(1, 1, 3, 2).within(3));
        assert!(!Span::new(2, 1, 4, 1).within(3));
        assert!(!Span::point(0, 1).within(3));
    }

    #[test]
    fn groups_parse_in_order() {
        let parsed: Vec<ImportGroup> = ["framework", "query", "type"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        assert_eq!(parsed, [ImportGroup::Framework, ImportGroup::Query, ImportGroup::Type]);
        assert!(ImportGroup::Framework < ImportGroup::Internal);
    }
}
