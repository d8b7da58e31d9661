//! TypeScript/TSX normalization using tree-sitter.

use crate::imports::ImportClassifier;
use conform_core::ir::{
    ContextDecl, EarlyReturn, FunctionBody, FunctionDecl, FunctionStyle, HookCall, ImportDecl,
    IrNode, JsxAttribute, JsxElement, LiteralContext, QuoteStyle, ReducerCase, ReturnShape, Span,
    StringConcat, StringLiteral, TypeDecl, TypeKind, TypeMember,
};
use conform_core::{FileIr, Normalizer, ParseError, SourceFile};
use tracing::trace;
use tree_sitter::{Language, Node, Parser, Point};

/// Nodes that open a new function scope.
const FUNCTION_KINDS: &[&str] = &[
    "arrow_function",
    "function_expression",
    "function",
    "function_declaration",
    "generator_function_declaration",
    "method_definition",
    "class_declaration",
    "class",
];

const JSX_KINDS: &[&str] = &["jsx_element", "jsx_self_closing_element", "jsx_fragment"];

/// Component wrappers whose first argument is the component function.
const COMPONENT_WRAPPERS: &[&str] = &["memo", "forwardRef", "observer"];

/// Normalizes `.ts`, `.tsx`, `.js` and `.jsx` files.
///
/// `.ts` files are parsed with the plain TypeScript grammar; everything else
/// uses the TSX grammar so JSX is recognized.
pub struct TsxNormalizer {
    typescript: Language,
    tsx: Language,
    classifier: ImportClassifier,
}

impl Default for TsxNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TsxNormalizer {
    /// Creates a normalizer with the built-in import groups.
    #[must_use]
    pub fn new() -> Self {
        Self::with_classifier(ImportClassifier::default())
    }

    /// Creates a normalizer with a custom import classifier.
    #[must_use]
    pub fn with_classifier(classifier: ImportClassifier) -> Self {
        Self {
            typescript: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            tsx: tree_sitter_typescript::LANGUAGE_TSX.into(),
            classifier,
        }
    }

    fn language_for(&self, file: &SourceFile) -> &Language {
        match file.relative_path().extension().and_then(|e| e.to_str()) {
            Some("ts" | "mts" | "cts") => &self.typescript,
            _ => &self.tsx,
        }
    }
}

impl Normalizer for TsxNormalizer {
    fn language_id(&self) -> &'static str {
        "typescript"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["ts", "tsx", "js", "jsx"]
    }

    fn normalize(&self, file: &SourceFile) -> Result<FileIr, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(self.language_for(file))
            .map_err(|e| ParseError {
                message: format!("grammar rejected: {e}"),
                line: 1,
                column: 1,
            })?;
        let tree = parser.parse(file.text(), None).ok_or_else(|| ParseError {
            message: "parser produced no tree".to_string(),
            line: 1,
            column: 1,
        })?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(syntax_error(root, file.text()));
        }

        let mut extractor = Extractor::new(file.text(), &self.classifier);
        extractor.top_level(root);
        extractor.walk(root, false, false);
        let nodes = extractor.finish();
        trace!(
            file = %file.relative_path().display(),
            nodes = nodes.len(),
            "Normalized"
        );
        Ok(FileIr::new(file.role(), nodes))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Export {
    No,
    Named,
    Default,
}

struct Extractor<'a> {
    src: &'a str,
    lines: Vec<&'a str>,
    classifier: &'a ImportClassifier,
    nodes: Vec<IrNode>,
    functions: Vec<FunctionDecl>,
    /// Local names exported as default via `export default X` or a clause.
    default_names: Vec<String>,
    /// Local names exported through `export { X }`.
    exported_names: Vec<String>,
}

impl<'a> Extractor<'a> {
    fn new(src: &'a str, classifier: &'a ImportClassifier) -> Self {
        Self {
            src,
            lines: src.lines().collect(),
            classifier,
            nodes: Vec::new(),
            functions: Vec::new(),
            default_names: Vec::new(),
            exported_names: Vec::new(),
        }
    }

    fn text(&self, node: Node<'_>) -> &'a str {
        node.utf8_text(self.src.as_bytes()).unwrap_or("")
    }

    fn finish(mut self) -> Vec<IrNode> {
        for f in &mut self.functions {
            if self.default_names.contains(&f.name) {
                f.is_default_export = true;
                f.is_exported = true;
            }
            if self.exported_names.contains(&f.name) {
                f.is_exported = true;
            }
        }
        self.nodes
            .extend(self.functions.into_iter().map(IrNode::Function));
        self.nodes.sort_by_key(|n| {
            let s = n.span();
            (s.start_line, s.start_column)
        });
        self.nodes
    }

    // ---- top-level declarations ----

    fn top_level(&mut self, root: Node<'_>) {
        for node in named_children(root) {
            match node.kind() {
                "import_statement" => self.import(node),
                "export_statement" => self.export(node),
                "function_declaration" => self.function_declaration(node, node, Export::No),
                "lexical_declaration" | "variable_declaration" => {
                    self.variable_functions(node, node, Export::No);
                }
                _ => {}
            }
        }
    }

    fn import(&mut self, node: Node<'_>) {
        let Some(source) = node.child_by_field_name("source") else {
            return;
        };
        let source = unquote(self.text(source)).to_string();
        let type_only = has_token(node, "type");

        let mut specifiers = Vec::new();
        for clause in named_children(node) {
            if clause.kind() != "import_clause" {
                continue;
            }
            for item in named_children(clause) {
                match item.kind() {
                    "identifier" => specifiers.push(self.text(item).to_string()),
                    "named_imports" => {
                        for spec in named_children(item) {
                            let local = spec
                                .child_by_field_name("alias")
                                .or_else(|| spec.child_by_field_name("name"));
                            if let Some(local) = local {
                                specifiers.push(self.text(local).to_string());
                            }
                        }
                    }
                    "namespace_import" => {
                        if let Some(id) = item.named_child(0) {
                            specifiers.push(self.text(id).to_string());
                        }
                    }
                    _ => {}
                }
            }
        }

        let group = self.classifier.classify(&source, type_only);
        self.nodes.push(IrNode::Import(ImportDecl {
            source,
            group,
            type_only,
            specifiers,
            span: self.span(node),
        }));
    }

    fn export(&mut self, node: Node<'_>) {
        let export = if has_token(node, "default") {
            Export::Default
        } else {
            Export::Named
        };

        if let Some(decl) = node.child_by_field_name("declaration") {
            match decl.kind() {
                "function_declaration" => self.function_declaration(decl, node, export),
                "lexical_declaration" | "variable_declaration" => {
                    self.variable_functions(decl, node, export);
                }
                _ => {}
            }
        } else if let Some(value) = node.child_by_field_name("value") {
            self.default_value(value, node);
        } else {
            for clause in named_children(node) {
                if clause.kind() != "export_clause" {
                    continue;
                }
                for spec in named_children(clause) {
                    let Some(name) = spec.child_by_field_name("name") else {
                        continue;
                    };
                    let name = self.text(name).to_string();
                    match spec.child_by_field_name("alias").map(|a| self.text(a)) {
                        Some("default") => self.default_names.push(name),
                        _ => self.exported_names.push(name),
                    }
                }
            }
        }
    }

    fn default_value(&mut self, value: Node<'_>, outer: Node<'_>) {
        if value.kind() == "identifier" {
            self.default_names.push(self.text(value).to_string());
            return;
        }
        if value.kind() == "call_expression" {
            if let Some(arg) = first_argument(value).filter(|a| a.kind() == "identifier") {
                self.default_names.push(self.text(arg).to_string());
                return;
            }
        }
        if let Some((func, style)) = self.function_value(value) {
            let name = func
                .child_by_field_name("name")
                .map_or("default", |n| self.text(n))
                .to_string();
            self.push_function(name, func, outer, Export::Default, style);
        }
    }

    fn function_declaration(&mut self, decl: Node<'_>, outer: Node<'_>, export: Export) {
        let Some(name) = decl.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name).to_string();
        self.push_function(name, decl, outer, export, FunctionStyle::Declaration);
    }

    fn variable_functions(&mut self, decl: Node<'_>, outer: Node<'_>, export: Export) {
        for declarator in named_children(decl) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(name) = declarator
                .child_by_field_name("name")
                .filter(|n| n.kind() == "identifier")
            else {
                continue;
            };
            let Some(value) = declarator.child_by_field_name("value") else {
                continue;
            };
            if let Some((func, style)) = self.function_value(value) {
                let name = self.text(name).to_string();
                self.push_function(name, func, outer, export, style);
            }
        }
    }

    /// The function bound by an initializer, looking through component
    /// wrappers like `memo(...)`.
    fn function_value<'t>(&self, node: Node<'t>) -> Option<(Node<'t>, FunctionStyle)> {
        match node.kind() {
            "arrow_function" => Some((node, FunctionStyle::Arrow)),
            "function_expression" | "function" => Some((node, FunctionStyle::Expression)),
            "parenthesized_expression" | "as_expression" | "satisfies_expression" => {
                node.named_child(0).and_then(|inner| self.function_value(inner))
            }
            "call_expression" => {
                let callee = node.child_by_field_name("function")?;
                let callee = match callee.kind() {
                    "member_expression" => callee.child_by_field_name("property")?,
                    _ => callee,
                };
                if !COMPONENT_WRAPPERS.contains(&self.text(callee)) {
                    return None;
                }
                first_argument(node).and_then(|arg| self.function_value(arg))
            }
            _ => None,
        }
    }

    fn push_function(
        &mut self,
        name: String,
        func: Node<'_>,
        outer: Node<'_>,
        export: Export,
        style: FunctionStyle,
    ) {
        let (body, returns_jsx) = match func.child_by_field_name("body") {
            Some(block) if block.kind() == "statement_block" => {
                self.scan_body(&name, block);
                (Some(self.body_metrics(block)), block_returns_jsx(block))
            }
            Some(expr) => (None, is_jsx(expr)),
            None => (None, false),
        };
        self.functions.push(FunctionDecl {
            name,
            is_default_export: export == Export::Default,
            is_exported: export != Export::No,
            style,
            body,
            returns_jsx,
            span: self.span(outer),
        });
    }

    fn span(&self, node: Node<'_>) -> Span {
        let start = node.start_position();
        let end = node.end_position();
        Span::new(
            start.row + 1,
            self.column(start),
            end.row + 1,
            self.column(end),
        )
    }

    fn column(&self, point: Point) -> usize {
        char_column(self.lines.get(point.row).copied(), point.column)
    }

    fn body_metrics(&self, block: Node<'_>) -> FunctionBody {
        let open = block.start_position();
        let close = block.end_position();
        let blank_line_after_open = close.row > open.row
            && self
                .lines
                .get(open.row + 1)
                .is_some_and(|line| line.trim().is_empty());
        FunctionBody {
            open_line: open.row + 1,
            open_column: self.column(open),
            close_line: close.row + 1,
            blank_line_after_open,
        }
    }

    /// Records hook calls and early returns among the body's top-level
    /// statements.
    fn scan_body(&mut self, function: &str, block: Node<'_>) {
        let mut after_non_hook = false;
        for (position, statement) in statements(block).into_iter().enumerate() {
            let hooks = self.hook_calls(statement);
            if hooks.is_empty() {
                if statement.kind() == "if_statement" {
                    let mut returns = Vec::new();
                    collect_returns(statement, &mut returns);
                    for ret in returns {
                        let expression =
                            returned_expression(ret).map(|e| self.text(e).to_string());
                        self.nodes.push(IrNode::EarlyReturn(EarlyReturn {
                            function: function.to_string(),
                            expression,
                            span: self.span(ret),
                        }));
                    }
                }
                after_non_hook = true;
                continue;
            }
            for (name, call) in hooks {
                self.nodes.push(IrNode::HookCall(HookCall {
                    name,
                    function: function.to_string(),
                    position,
                    after_non_hook,
                    span: self.span(call),
                }));
            }
        }
    }

    fn hook_calls<'t>(&self, statement: Node<'t>) -> Vec<(String, Node<'t>)> {
        let mut calls = Vec::new();
        match statement.kind() {
            "expression_statement" => {
                if let Some(expr) = statement.named_child(0) {
                    calls.extend(self.hook_call(expr));
                }
            }
            "lexical_declaration" | "variable_declaration" => {
                for declarator in named_children(statement) {
                    if let Some(value) = declarator.child_by_field_name("value") {
                        calls.extend(self.hook_call(value));
                    }
                }
            }
            _ => {}
        }
        calls
    }

    fn hook_call<'t>(&self, expr: Node<'t>) -> Option<(String, Node<'t>)> {
        let call = if expr.kind() == "await_expression" {
            expr.named_child(0)?
        } else {
            expr
        };
        if call.kind() != "call_expression" {
            return None;
        }
        let callee = call.child_by_field_name("function")?;
        let name = match callee.kind() {
            "identifier" => self.text(callee),
            "member_expression" => self.text(callee.child_by_field_name("property")?),
            _ => return None,
        };
        is_hook_name(name).then(|| (name.to_string(), call))
    }

    // ---- whole-tree facts ----

    fn walk(&mut self, node: Node<'_>, mut in_jsx: bool, mut in_concat: bool) {
        match node.kind() {
            "string" => {
                self.string_literal(node);
                return;
            }
            "switch_statement" => self.reducer_cases(node),
            "variable_declarator" => self.context(node),
            "type_alias_declaration" | "interface_declaration" => self.type_decl(node),
            "binary_expression" if !in_concat && involves_string(node) => {
                self.nodes
                    .push(IrNode::StringConcat(StringConcat { span: self.span(node) }));
                in_concat = true;
            }
            kind if !in_jsx && JSX_KINDS.contains(&kind) => {
                let element = self.jsx_element(node);
                self.nodes.push(IrNode::Jsx(element));
                in_jsx = true;
            }
            _ => {}
        }
        for child in named_children(node) {
            self.walk(child, in_jsx, in_concat);
        }
    }

    fn string_literal(&mut self, node: Node<'_>) {
        let raw = self.text(node);
        let quote = match raw.chars().next() {
            Some('"') => QuoteStyle::Double,
            Some('\'') => QuoteStyle::Single,
            _ => return,
        };
        let context = self.literal_context(node);
        self.nodes.push(IrNode::StringLiteral(StringLiteral {
            value: unquote(raw).to_string(),
            quote,
            context,
            span: self.span(node),
        }));
    }

    fn literal_context(&self, node: Node<'_>) -> LiteralContext {
        let Some(parent) = node.parent() else {
            return LiteralContext::Code;
        };
        let grandparent = parent.parent();
        match parent.kind() {
            "import_statement" | "export_statement" | "import_require_clause" => {
                LiteralContext::ImportSource
            }
            "jsx_attribute" => LiteralContext::JsxAttribute,
            "jsx_expression" if grandparent.is_some_and(|g| g.kind() == "jsx_attribute") => {
                LiteralContext::JsxAttribute
            }
            "arguments" if grandparent.is_some_and(|g| self.is_module_call(g)) => {
                LiteralContext::ImportSource
            }
            _ => LiteralContext::Code,
        }
    }

    /// `import("x")` or `require("x")`.
    fn is_module_call(&self, call: Node<'_>) -> bool {
        call.kind() == "call_expression"
            && call
                .child_by_field_name("function")
                .is_some_and(|f| f.kind() == "import" || self.text(f) == "require")
    }

    fn reducer_cases(&mut self, switch: Node<'_>) {
        let Some(value) = switch.child_by_field_name("value") else {
            return;
        };
        if !self.text(value).contains("type") {
            return;
        }
        let Some(body) = switch.child_by_field_name("body") else {
            return;
        };

        // Fall-through cases share the next non-empty case's return.
        let mut pending: Vec<(String, Span)> = Vec::new();
        for case in named_children(body) {
            if case.kind() != "switch_case" {
                continue;
            }
            if let Some(action) = case
                .child_by_field_name("value")
                .and_then(|v| self.case_label(v))
            {
                pending.push((action, self.span(case)));
            }
            let mut cursor = case.walk();
            let case_body: Vec<Node<'_>> =
                case.children_by_field_name("body", &mut cursor).collect();
            if case_body.is_empty() {
                continue;
            }
            let returns = self.return_shape(&case_body);
            for (action_type, case_span) in pending.drain(..) {
                self.nodes.push(IrNode::ReducerCase(ReducerCase {
                    action_type,
                    returns: returns.clone(),
                    span: case_span,
                }));
            }
        }
        for (action_type, case_span) in pending {
            self.nodes.push(IrNode::ReducerCase(ReducerCase {
                action_type,
                returns: ReturnShape::Missing,
                span: case_span,
            }));
        }
    }

    fn case_label(&self, value: Node<'_>) -> Option<String> {
        match value.kind() {
            "string" => Some(unquote(self.text(value)).to_string()),
            "member_expression" => value
                .child_by_field_name("property")
                .map(|p| self.text(p).to_string()),
            _ => None,
        }
    }

    fn return_shape(&self, body: &[Node<'_>]) -> ReturnShape {
        let ret = body.iter().find_map(|s| {
            if s.kind() == "return_statement" {
                return Some(*s);
            }
            let mut found = Vec::new();
            collect_returns(*s, &mut found);
            found.into_iter().next()
        });
        let Some(expr) = ret.and_then(returned_expression) else {
            return ReturnShape::Missing;
        };
        match expr.kind() {
            "identifier" => ReturnShape::Identifier(self.text(expr).to_string()),
            "object" => named_children(expr)
                .into_iter()
                .find(|c| c.kind() == "spread_element")
                .and_then(|spread| spread.named_child(0))
                .filter(|id| id.kind() == "identifier")
                .map_or_else(
                    || ReturnShape::Other(compact(self.text(expr))),
                    |id| ReturnShape::Spread(self.text(id).to_string()),
                ),
            _ => ReturnShape::Other(compact(self.text(expr))),
        }
    }

    fn context(&mut self, declarator: Node<'_>) {
        let Some(call) = declarator
            .child_by_field_name("value")
            .filter(|v| v.kind() == "call_expression")
        else {
            return;
        };
        let Some(callee) = call.child_by_field_name("function") else {
            return;
        };
        let callee = match callee.kind() {
            "member_expression" => callee.child_by_field_name("property"),
            _ => Some(callee),
        };
        if !callee.is_some_and(|c| self.text(c) == "createContext") {
            return;
        }
        let Some(name) = declarator
            .child_by_field_name("name")
            .filter(|n| n.kind() == "identifier")
        else {
            return;
        };
        self.nodes.push(IrNode::Context(ContextDecl {
            name: self.text(name).to_string(),
            span: self.span(declarator),
        }));
    }

    fn type_decl(&mut self, node: Node<'_>) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let (kind, value) = if node.kind() == "interface_declaration" {
            (TypeKind::Interface, node.child_by_field_name("body"))
        } else {
            let value = node.child_by_field_name("value");
            let kind = if value.is_some_and(|v| v.kind() == "union_type") {
                TypeKind::Union
            } else {
                TypeKind::Alias
            };
            (kind, value)
        };
        let mut action_literals = Vec::new();
        if let Some(value) = value {
            self.action_literals(value, &mut action_literals);
        }
        self.nodes.push(IrNode::Type(TypeDecl {
            name: self.text(name).to_string(),
            kind,
            action_literals,
            span: self.span(node),
        }));
    }

    /// Collects `type: "LITERAL"` members from object types, looking through
    /// unions and intersections but not into nested property types.
    fn action_literals(&self, node: Node<'_>, out: &mut Vec<TypeMember>) {
        for child in named_children(node) {
            match child.kind() {
                "property_signature" => {
                    let is_type = child
                        .child_by_field_name("name")
                        .is_some_and(|n| self.text(n) == "type");
                    if !is_type {
                        continue;
                    }
                    let literal = child
                        .child_by_field_name("type")
                        .and_then(|annotation| annotation.named_child(0))
                        .filter(|t| t.kind() == "literal_type")
                        .and_then(|t| t.named_child(0))
                        .filter(|s| s.kind() == "string");
                    if let Some(literal) = literal {
                        out.push(TypeMember {
                            literal: unquote(self.text(literal)).to_string(),
                            span: self.span(literal),
                        });
                    }
                }
                "union_type" | "intersection_type" | "object_type" | "parenthesized_type"
                | "interface_body" => self.action_literals(child, out),
                _ => {}
            }
        }
    }

    // ---- JSX ----

    fn jsx_element(&self, node: Node<'_>) -> JsxElement {
        match node.kind() {
            "jsx_self_closing_element" => JsxElement {
                tag: self.jsx_tag(node),
                attributes: self.jsx_attributes(node),
                children: Vec::new(),
                span: self.span(node),
            },
            "jsx_element" => {
                let open = node.child_by_field_name("open_tag");
                JsxElement {
                    tag: open.map_or_else(|| "<>".to_string(), |o| self.jsx_tag(o)),
                    attributes: open.map(|o| self.jsx_attributes(o)).unwrap_or_default(),
                    children: self.jsx_children(node),
                    span: self.span(node),
                }
            }
            _ => JsxElement {
                tag: "<>".to_string(),
                attributes: Vec::new(),
                children: self.jsx_children(node),
                span: self.span(node),
            },
        }
    }

    fn jsx_tag(&self, opening: Node<'_>) -> String {
        opening
            .child_by_field_name("name")
            .map_or_else(|| "<>".to_string(), |n| self.text(n).to_string())
    }

    fn jsx_attributes(&self, opening: Node<'_>) -> Vec<JsxAttribute> {
        named_children(opening)
            .into_iter()
            .filter(|a| a.kind() == "jsx_attribute")
            .filter_map(|attr| {
                let name = attr.named_child(0)?;
                Some(JsxAttribute {
                    name: self.text(name).to_string(),
                    value: attr.named_child(1).and_then(|v| self.attribute_value(v)),
                    span: self.span(attr),
                })
            })
            .collect()
    }

    fn attribute_value(&self, value: Node<'_>) -> Option<String> {
        match value.kind() {
            "string" => Some(unquote(self.text(value)).to_string()),
            "jsx_expression" => {
                let inner = value.named_child(0)?;
                match inner.kind() {
                    "string" => Some(unquote(self.text(inner)).to_string()),
                    "template_string"
                        if !named_children(inner)
                            .iter()
                            .any(|c| c.kind() == "template_substitution") =>
                    {
                        Some(unquote(self.text(inner)).to_string())
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn jsx_children(&self, element: Node<'_>) -> Vec<JsxElement> {
        let mut out = Vec::new();
        for child in named_children(element) {
            match child.kind() {
                "jsx_opening_element" | "jsx_closing_element" => {}
                kind if JSX_KINDS.contains(&kind) => out.push(self.jsx_element(child)),
                _ => self.nested_jsx(child, &mut out),
            }
        }
        out
    }

    /// Elements inside `{...}` expressions, e.g. `items.map(i => <li/>)`.
    fn nested_jsx(&self, node: Node<'_>, out: &mut Vec<JsxElement>) {
        for child in named_children(node) {
            if JSX_KINDS.contains(&child.kind()) {
                out.push(self.jsx_element(child));
            } else {
                self.nested_jsx(child, out);
            }
        }
    }
}

// ---- free helpers ----

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
    children
}

/// Named statements of a block, comments excluded.
fn statements(block: Node<'_>) -> Vec<Node<'_>> {
    named_children(block)
        .into_iter()
        .filter(|n| n.kind() != "comment")
        .collect()
}

fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == token);
    found
}

/// One-based character column of a byte offset within `line`.
fn char_column(line: Option<&str>, byte_column: usize) -> usize {
    line.and_then(|l| l.get(..byte_column))
        .map_or(byte_column, |prefix| prefix.chars().count())
        + 1
}

fn unquote(raw: &str) -> &str {
    let quoted = raw.len() >= 2
        && matches!(raw.as_bytes()[0], b'"' | b'\'' | b'`')
        && raw.as_bytes()[raw.len() - 1] == raw.as_bytes()[0];
    if quoted {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}

fn compact(text: &str) -> String {
    const MAX: usize = 60;
    let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if joined.chars().count() <= MAX {
        return joined;
    }
    let mut short: String = joined.chars().take(MAX - 3).collect();
    short.push_str("...");
    short
}

fn is_hook_name(name: &str) -> bool {
    name == "use"
        || name
            .strip_prefix("use")
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_uppercase())
}

fn first_argument(call: Node<'_>) -> Option<Node<'_>> {
    let args = call.child_by_field_name("arguments")?;
    named_children(args)
        .into_iter()
        .find(|a| a.kind() != "comment")
}

fn unwrap_parens(mut node: Node<'_>) -> Node<'_> {
    while node.kind() == "parenthesized_expression" {
        match node.named_child(0) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

fn returned_expression(ret: Node<'_>) -> Option<Node<'_>> {
    named_children(ret)
        .into_iter()
        .find(|n| n.kind() != "comment")
        .map(unwrap_parens)
}

/// Return statements under `node`, not descending into nested functions.
fn collect_returns<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    for child in named_children(node) {
        if FUNCTION_KINDS.contains(&child.kind()) {
            continue;
        }
        if child.kind() == "return_statement" {
            out.push(child);
        } else {
            collect_returns(child, out);
        }
    }
}

fn block_returns_jsx(block: Node<'_>) -> bool {
    let mut returns = Vec::new();
    collect_returns(block, &mut returns);
    returns
        .into_iter()
        .filter_map(returned_expression)
        .any(is_jsx)
}

fn is_jsx(node: Node<'_>) -> bool {
    let node = unwrap_parens(node);
    match node.kind() {
        kind if JSX_KINDS.contains(&kind) => true,
        "ternary_expression" => {
            node.child_by_field_name("consequence").is_some_and(is_jsx)
                || node.child_by_field_name("alternative").is_some_and(is_jsx)
        }
        "binary_expression" => node.child_by_field_name("right").is_some_and(is_jsx),
        _ => false,
    }
}

fn is_plus(node: Node<'_>) -> bool {
    node.child_by_field_name("operator")
        .is_some_and(|op| op.kind() == "+")
}

/// A `+` chain with at least one string or template operand.
fn involves_string(node: Node<'_>) -> bool {
    match node.kind() {
        "string" | "template_string" => true,
        "parenthesized_expression" => node.named_child(0).is_some_and(involves_string),
        "binary_expression" => {
            is_plus(node)
                && (node.child_by_field_name("left").is_some_and(involves_string)
                    || node.child_by_field_name("right").is_some_and(involves_string))
        }
        _ => false,
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error())
        .find_map(first_error)
}

fn syntax_error(root: Node<'_>, src: &str) -> ParseError {
    let node = first_error(root).unwrap_or(root);
    let start = node.start_position();
    let message = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let line = node
            .utf8_text(src.as_bytes())
            .unwrap_or("")
            .lines()
            .next()
            .unwrap_or("")
            .trim();
        if line.is_empty() {
            "unexpected syntax".to_string()
        } else {
            let snippet: String = line.chars().take(24).collect();
            format!("unexpected `{snippet}`")
        }
    };
    ParseError {
        message,
        line: start.row + 1,
        column: char_column(src.lines().nth(start.row), start.column),
    }
}
