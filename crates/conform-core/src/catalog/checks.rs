//! Predicate evaluation for each check kind.
//!
//! Checks are pure: they read one file's IR and return the offending spans
//! with the placeholder values for their message.

use super::model::{Check, ExportStyle, NameCase, NamePattern, NamingTarget};
use crate::ir::{FileIr, ImportDecl, ImportGroup, QuoteStyle, ReturnShape, Span};
use crate::source::SourceFile;
use std::collections::HashSet;

/// One offending node found by a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Where to report.
    pub span: Span,
    /// Placeholder values for the rule message.
    pub args: Vec<(&'static str, String)>,
}

impl Finding {
    fn new(span: Span) -> Self {
        Self {
            span,
            args: Vec::new(),
        }
    }

    fn arg(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.args.push((name, value.into()));
        self
    }
}

/// A check that could not make sense of the IR it was given.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct EvalError {
    /// What was unexpected.
    pub message: String,
}

impl EvalError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Check {
    /// Evaluates this predicate against one file.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] when the IR has a shape the check cannot handle.
    pub fn evaluate(&self, file: &SourceFile, ir: &FileIr) -> Result<Vec<Finding>, EvalError> {
        match self {
            Self::Naming { target, pattern } => Ok(naming(*target, pattern, ir)),
            Self::FileName { pattern } => Ok(file_name(pattern, file)),
            Self::ExportStyle { expect } => Ok(export_style(*expect, file, ir)),
            Self::ImportOrder { order } => Ok(import_order(order, ir)),
            Self::HooksAtTop => Ok(ir
                .hook_calls()
                .filter(|h| h.after_non_hook)
                .map(|h| {
                    Finding::new(h.span)
                        .arg("hook", &h.name)
                        .arg("function", &h.function)
                })
                .collect()),
            Self::EarlyReturnNull => Ok(early_return_null(ir)),
            Self::ComponentBody {
                min_lines,
                blank_line_after_open,
            } => component_body(*min_lines, *blank_line_after_open, ir),
            Self::ClassNameOrder {
                responsive_prefixes,
            } => Ok(class_name_order(responsive_prefixes, ir)),
            Self::ActionTypeCase => Ok(action_type_case(ir)),
            Self::ResetReturnsInitialState {
                action,
                initial_state,
            } => Ok(reset_returns_initial_state(action, initial_state, ir)),
            Self::QuoteStyle { prefer } => Ok(quote_style(*prefer, ir)),
            Self::NoStringConcat => Ok(ir
                .string_concats()
                .map(|c| Finding::new(c.span))
                .collect()),
            Self::RequireImport { sources } => Ok(require_import(sources, ir)),
        }
    }
}

fn naming(target: NamingTarget, pattern: &NamePattern, ir: &FileIr) -> Vec<Finding> {
    let candidates: Vec<(&str, Span)> = match target {
        NamingTarget::Component => ir
            .functions()
            .filter(|f| f.returns_jsx)
            .map(|f| (f.name.as_str(), f.span))
            .collect(),
        NamingTarget::Function => ir
            .functions()
            .filter(|f| !f.returns_jsx)
            .map(|f| (f.name.as_str(), f.span))
            .collect(),
        NamingTarget::Hook => ir
            .functions()
            .filter(|f| f.name.starts_with("use"))
            .map(|f| (f.name.as_str(), f.span))
            .collect(),
        NamingTarget::Exported => ir
            .functions()
            .filter(|f| f.is_exported)
            .map(|f| (f.name.as_str(), f.span))
            .collect(),
        NamingTarget::Context => ir.contexts().map(|c| (c.name.as_str(), c.span)).collect(),
        NamingTarget::Type => ir.types().map(|t| (t.name.as_str(), t.span)).collect(),
    };
    candidates
        .into_iter()
        // Anonymous default exports have no name to check.
        .filter(|(name, _)| *name != "default" && !pattern.matches(name))
        .map(|(name, span)| {
            Finding::new(span)
                .arg("name", name)
                .arg("expected", pattern.describe())
                .arg("target", target.as_str())
        })
        .collect()
}

fn file_name(pattern: &NamePattern, file: &SourceFile) -> Vec<Finding> {
    let stem = file.stem();
    if stem == "index" || pattern.matches(stem) {
        return vec![];
    }
    vec![Finding::new(Span::point(1, 1))
        .arg("value", stem)
        .arg("expected", pattern.describe())]
}

fn export_style(expect: ExportStyle, file: &SourceFile, ir: &FileIr) -> Vec<Finding> {
    let components: Vec<_> = ir.functions().filter(|f| f.returns_jsx).collect();
    if components.is_empty() {
        return vec![];
    }
    match expect {
        ExportStyle::DefaultFunctionDeclaration => {
            let expected = "a default-exported function declaration";
            match components.iter().find(|f| f.is_default_export) {
                Some(f) if f.style == crate::ir::FunctionStyle::Declaration => vec![],
                Some(f) => vec![Finding::new(f.span)
                    .arg("name", &f.name)
                    .arg("expected", expected)],
                None => vec![Finding::new(Span::point(1, 1))
                    .arg("name", file.stem())
                    .arg("expected", expected)],
            }
        }
        ExportStyle::NamedArrow => components
            .into_iter()
            .filter(|f| f.is_default_export || f.style != crate::ir::FunctionStyle::Arrow)
            .map(|f| {
                Finding::new(f.span)
                    .arg("name", &f.name)
                    .arg("expected", "a named arrow-function export")
            })
            .collect(),
    }
}

/// Reports imports outside the longest run that already respects `order`.
///
/// Keeping the longest non-decreasing subsequence of group ranks means one
/// import moved across a group boundary yields exactly one finding, however
/// many imports it jumped over.
fn import_order(order: &[ImportGroup], ir: &FileIr) -> Vec<Finding> {
    let ranked: Vec<(&ImportDecl, usize)> = ir
        .imports()
        .filter_map(|imp| {
            order
                .iter()
                .position(|g| *g == imp.group)
                .map(|rank| (imp, rank))
        })
        .collect();
    if ranked.len() < 2 {
        return vec![];
    }

    let ranks: Vec<usize> = ranked.iter().map(|(_, r)| *r).collect();
    let kept = longest_non_decreasing(&ranks);

    ranked
        .iter()
        .enumerate()
        .filter(|(i, _)| !kept.contains(i))
        .map(|(i, (imp, rank))| {
            // The conflict is a group, never a specific import.
            let (position, conflict) = match ranked[..i].iter().find(|(_, r)| r > rank) {
                Some((other, _)) => ("before", other.group.as_str()),
                None => (
                    "after",
                    ranked[i + 1..]
                        .iter()
                        .find(|(_, r)| r < rank)
                        .map_or("", |(other, _)| other.group.as_str()),
                ),
            };
            Finding::new(imp.span)
                .arg("source", &imp.source)
                .arg("group", imp.group.as_str())
                .arg("position", position)
                .arg("conflict", conflict)
        })
        .collect()
}

/// Indices of a longest non-decreasing subsequence.
///
/// Ties prefer the subsequence ending at the smallest rank, then the
/// earliest index, so the result is deterministic.
fn longest_non_decreasing(ranks: &[usize]) -> HashSet<usize> {
    let n = ranks.len();
    let mut len = vec![1usize; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    for i in 0..n {
        for j in 0..i {
            if ranks[j] <= ranks[i] && len[j] + 1 > len[i] {
                len[i] = len[j] + 1;
                prev[i] = Some(j);
            }
        }
    }
    let best = len.iter().copied().max().unwrap_or(0);
    let mut cursor = (0..n)
        .filter(|&i| len[i] == best)
        .min_by_key(|&i| (ranks[i], i));
    let mut kept = HashSet::new();
    while let Some(i) = cursor {
        kept.insert(i);
        cursor = prev[i];
    }
    kept
}

fn early_return_null(ir: &FileIr) -> Vec<Finding> {
    let components: HashSet<&str> = ir
        .functions()
        .filter(|f| f.returns_jsx)
        .map(|f| f.name.as_str())
        .collect();
    ir.early_returns()
        .filter(|r| components.contains(r.function.as_str()) && !r.returns_null())
        .map(|r| {
            Finding::new(r.span)
                .arg("function", &r.function)
                .arg("returned", r.expression.as_deref().unwrap_or("nothing"))
        })
        .collect()
}

fn component_body(
    min_lines: usize,
    blank_line_after_open: bool,
    ir: &FileIr,
) -> Result<Vec<Finding>, EvalError> {
    let mut findings = Vec::new();
    for function in ir.functions().filter(|f| f.returns_jsx) {
        let Some(body) = function.body else {
            continue;
        };
        if body.close_line < body.open_line {
            return Err(EvalError::new(format!(
                "body of `{}` closes on line {} before it opens on line {}",
                function.name, body.close_line, body.open_line
            )));
        }
        let lines = body.line_count();
        let detail = if lines < min_lines {
            format!("spans {lines} lines, below the minimum of {min_lines}")
        } else if blank_line_after_open && !body.blank_line_after_open {
            "needs a blank line after the opening brace".to_string()
        } else {
            continue;
        };
        findings.push(
            Finding::new(Span::point(body.open_line, body.open_column))
                .arg("name", &function.name)
                .arg("lines", lines.to_string())
                .arg("min", min_lines.to_string())
                .arg("detail", detail),
        );
    }
    Ok(findings)
}

fn class_name_order(responsive_prefixes: &[String], ir: &FileIr) -> Vec<Finding> {
    let is_responsive = |token: &str| responsive_prefixes.iter().any(|p| token.starts_with(p));
    ir.jsx_roots()
        .flat_map(|root| root.walk())
        .filter_map(|element| {
            let value = element.attribute("className")?.value.as_deref()?;
            let mut seen_responsive = false;
            for token in value.split_whitespace() {
                if is_responsive(token) {
                    seen_responsive = true;
                } else if seen_responsive && !token.contains(':') {
                    return Some(
                        Finding::new(element.span)
                            .arg("tag", &element.tag)
                            .arg("token", token),
                    );
                }
            }
            None
        })
        .collect()
}

fn action_type_case(ir: &FileIr) -> Vec<Finding> {
    let mut findings: Vec<Finding> = ir
        .reducer_cases()
        .filter(|c| !NameCase::ScreamingSnake.matches(&c.action_type))
        .map(|c| Finding::new(c.span).arg("action", &c.action_type))
        .collect();

    // Union members are reported only when no case handles them.
    let handled: HashSet<&str> = ir.reducer_cases().map(|c| c.action_type.as_str()).collect();
    let mut reported = HashSet::new();
    findings.extend(
        ir.types()
            .flat_map(|t| t.action_literals.iter())
            .filter(|m| !handled.contains(m.literal.as_str()))
            .filter(|m| !NameCase::ScreamingSnake.matches(&m.literal))
            .filter(|m| reported.insert(m.literal.as_str()))
            .map(|m| Finding::new(m.span).arg("action", &m.literal)),
    );
    findings
}

fn reset_returns_initial_state(action: &str, initial_state: &str, ir: &FileIr) -> Vec<Finding> {
    let normalize = |s: &str| s.replace('_', "").to_ascii_lowercase();
    let expected = normalize(initial_state);
    ir.reducer_cases()
        .filter(|c| c.action_type == action)
        .filter(|c| !matches!(&c.returns, ReturnShape::Identifier(name) if normalize(name) == expected))
        .map(|c| {
            Finding::new(c.span)
                .arg("action", &c.action_type)
                .arg("returned", c.returns.describe())
                .arg("expected", initial_state)
        })
        .collect()
}

fn quote_style(prefer: QuoteStyle, ir: &FileIr) -> Vec<Finding> {
    let quote = prefer.quote_char();
    let expected = match prefer {
        QuoteStyle::Double => "double",
        QuoteStyle::Single => "single",
    };
    ir.string_literals()
        .filter(|s| s.context == crate::ir::LiteralContext::Code)
        .filter(|s| s.quote != prefer && !s.value.contains(quote))
        .map(|s| {
            Finding::new(s.span)
                .arg("value", &s.value)
                .arg("expected", expected)
        })
        .collect()
}

fn require_import(sources: &[String], ir: &FileIr) -> Vec<Finding> {
    let satisfied = ir.imports().any(|imp| {
        sources.iter().any(|s| {
            imp.source == *s
                || imp
                    .source
                    .strip_prefix(s.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    });
    if satisfied {
        return vec![];
    }
    vec![Finding::new(Span::point(1, 1)).arg("expected", sources.join(", "))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{
        EarlyReturn, FunctionBody, FunctionDecl, FunctionStyle, HookCall, IrNode, JsxAttribute,
        JsxElement, LiteralContext, ReducerCase, StringLiteral, TypeDecl, TypeKind, TypeMember,
    };
    use crate::source::FileRole;

    fn file(path: &str) -> SourceFile {
        SourceFile::in_memory(path, "line\n".repeat(40))
    }

    fn import(source: &str, group: ImportGroup, line: usize) -> IrNode {
        IrNode::Import(ImportDecl {
            source: source.into(),
            group,
            type_only: group == ImportGroup::Type,
            specifiers: vec![],
            span: Span::new(line, 1, line, 30),
        })
    }

    fn component(name: &str, open: usize, close: usize, blank: bool) -> FunctionDecl {
        FunctionDecl {
            name: name.into(),
            is_default_export: false,
            is_exported: true,
            style: FunctionStyle::Arrow,
            body: Some(FunctionBody {
                open_line: open,
                open_column: 20,
                close_line: close,
                blank_line_after_open: blank,
            }),
            returns_jsx: true,
            span: Span::new(open, 1, close, 2),
        }
    }

    fn eval(check: &Check, ir: &FileIr) -> Vec<Finding> {
        check
            .evaluate(&file("src/components/Cart/Cart.tsx"), ir)
            .unwrap()
    }

    fn arg<'a>(f: &'a Finding, name: &str) -> &'a str {
        f.args
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
            .unwrap()
    }

    #[test]
    fn import_order_single_moved_import() {
        let check = Check::ImportOrder {
            order: ImportGroup::ALL.to_vec(),
        };
        let ir = FileIr::new(
            FileRole::ComponentEntry,
            vec![
                import("react", ImportGroup::Framework, 1),
                import("@/utils/format", ImportGroup::Internal, 2),
                import("@tanstack/react-query", ImportGroup::Query, 3),
            ],
        );
        let findings = eval(&check, &ir);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].span.start_line, 2);
        assert_eq!(arg(&findings[0], "position"), "after");
        assert_eq!(arg(&findings[0], "conflict"), "query");
    }

    #[test]
    fn import_order_one_violation_even_across_many() {
        let check = Check::ImportOrder {
            order: ImportGroup::ALL.to_vec(),
        };
        let ir = FileIr::new(
            FileRole::ComponentEntry,
            vec![
                import("react", ImportGroup::Framework, 1),
                import("react-router-dom", ImportGroup::Routing, 2),
                import("swr", ImportGroup::Query, 3),
                import("react-hook-form", ImportGroup::Form, 4),
                import("clsx", ImportGroup::External, 5),
                import("react-dom", ImportGroup::Framework, 6),
            ],
        );
        let findings = eval(&check, &ir);
        assert_eq!(findings.len(), 1);
        assert_eq!(arg(&findings[0], "source"), "react-dom");
        assert_eq!(arg(&findings[0], "position"), "before");
        assert_eq!(arg(&findings[0], "conflict"), "routing");
    }

    #[test]
    fn import_order_message_survives_swaps_inside_the_conflicting_group() {
        let check = Check::ImportOrder {
            order: ImportGroup::ALL.to_vec(),
        };
        let with = |first: &str, second: &str| {
            FileIr::new(
                FileRole::ComponentEntry,
                vec![
                    import("@/utils/format", ImportGroup::Internal, 1),
                    import(first, ImportGroup::Query, 2),
                    import(second, ImportGroup::Query, 3),
                ],
            )
        };
        let a = eval(&check, &with("swr", "@tanstack/react-query"));
        let b = eval(&check, &with("@tanstack/react-query", "swr"));
        assert_eq!(a.len(), 1);
        assert_eq!(a, b);
        assert_eq!(arg(&a[0], "conflict"), "query");
    }

    #[test]
    fn import_order_ignores_groups_outside_order_and_same_group_swaps() {
        let check = Check::ImportOrder {
            order: vec![ImportGroup::Framework, ImportGroup::Internal],
        };
        let ir = FileIr::new(
            FileRole::ComponentEntry,
            vec![
                import("react-dom", ImportGroup::Framework, 1),
                import("react", ImportGroup::Framework, 2),
                import("clsx", ImportGroup::External, 3),
                import("./CartItem", ImportGroup::Internal, 4),
                import("@/api", ImportGroup::Internal, 5),
            ],
        );
        assert!(eval(&check, &ir).is_empty());
    }

    #[test]
    fn hooks_after_statements_are_reported_each() {
        let hook = |name: &str, position, late| {
            IrNode::HookCall(HookCall {
                name: name.into(),
                function: "Cart".into(),
                position,
                after_non_hook: late,
                span: Span::point(position + 2, 3),
            })
        };
        let ir = FileIr::new(
            FileRole::ComponentEntry,
            vec![
                hook("useState", 0, false),
                hook("useEffect", 2, true),
                hook("useMemo", 3, true),
            ],
        );
        let findings = eval(&Check::HooksAtTop, &ir);
        assert_eq!(findings.len(), 2);
        assert_eq!(arg(&findings[0], "hook"), "useEffect");
    }

    #[test]
    fn early_return_must_be_null_in_components_only() {
        let ret = |function: &str, expr: &str| {
            IrNode::EarlyReturn(EarlyReturn {
                function: function.into(),
                expression: Some(expr.into()),
                span: Span::point(5, 5),
            })
        };
        let mut helper = component("formatCart", 1, 10, true);
        helper.returns_jsx = false;
        let ir = FileIr::new(
            FileRole::ComponentEntry,
            vec![
                IrNode::Function(component("Cart", 1, 20, true)),
                IrNode::Function(helper),
                ret("Cart", "null"),
                ret("Cart", "<Spinner />"),
                ret("formatCart", "\"\""),
            ],
        );
        let findings = eval(&Check::EarlyReturnNull, &ir);
        assert_eq!(findings.len(), 1);
        assert_eq!(arg(&findings[0], "returned"), "<Spinner />");
    }

    #[test]
    fn component_body_threshold_is_inclusive() {
        let check = Check::ComponentBody {
            min_lines: 4,
            blank_line_after_open: true,
        };
        let ok = FileIr::new(
            FileRole::ComponentEntry,
            vec![IrNode::Function(component("Cart", 1, 4, true))],
        );
        assert!(eval(&check, &ok).is_empty());

        let short = FileIr::new(
            FileRole::SubComponent,
            vec![IrNode::Function(component("Foo", 1, 3, false))],
        );
        let findings = eval(&check, &short);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].span, Span::point(1, 20));
        assert!(arg(&findings[0], "detail").contains("minimum of 4"));
    }

    #[test]
    fn component_body_requires_blank_line() {
        let check = Check::ComponentBody {
            min_lines: 4,
            blank_line_after_open: true,
        };
        let ir = FileIr::new(
            FileRole::ComponentEntry,
            vec![IrNode::Function(component("Cart", 3, 12, false))],
        );
        let findings = eval(&check, &ir);
        assert_eq!(findings.len(), 1);
        assert_eq!(
            arg(&findings[0], "detail"),
            "needs a blank line after the opening brace"
        );
    }

    #[test]
    fn component_body_rejects_inverted_body() {
        let check = Check::ComponentBody {
            min_lines: 4,
            blank_line_after_open: false,
        };
        let ir = FileIr::new(
            FileRole::ComponentEntry,
            vec![IrNode::Function(component("Cart", 9, 2, true))],
        );
        let err = check
            .evaluate(&file("src/components/Cart/Cart.tsx"), &ir)
            .unwrap_err();
        assert!(err.message.contains("closes on line 2"));
    }

    #[test]
    fn class_name_base_after_responsive() {
        let el = |class: &str, line| JsxElement {
            tag: "div".into(),
            attributes: vec![JsxAttribute {
                name: "className".into(),
                value: Some(class.into()),
                span: Span::point(line, 6),
            }],
            children: vec![],
            span: Span::point(line, 1),
        };
        let root = JsxElement {
            tag: "section".into(),
            attributes: vec![],
            children: vec![el("p-2 md:p-4 hover:underline", 2), el("md:p-4 p-2 flex", 3)],
            span: Span::point(1, 1),
        };
        let ir = FileIr::new(FileRole::ComponentEntry, vec![IrNode::Jsx(root)]);
        let check = Check::ClassNameOrder {
            responsive_prefixes: vec!["sm:".into(), "md:".into()],
        };
        let findings = eval(&check, &ir);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].span.start_line, 3);
        assert_eq!(arg(&findings[0], "token"), "p-2");
    }

    #[test]
    fn action_type_case_skips_union_members_handled_by_a_case() {
        let case = |action: &str, line| {
            IrNode::ReducerCase(ReducerCase {
                action_type: action.into(),
                returns: ReturnShape::Other("state".into()),
                span: Span::point(line, 5),
            })
        };
        let member = |literal: &str, line| TypeMember {
            literal: literal.into(),
            span: Span::point(line, 20),
        };
        let ir = FileIr::new(
            FileRole::Reducer,
            vec![
                IrNode::Type(TypeDecl {
                    name: "CartAction".into(),
                    kind: TypeKind::Union,
                    action_literals: vec![
                        member("ADD_ITEM", 1),
                        member("set_foo", 2),
                        member("removeItem", 3),
                    ],
                    span: Span::new(1, 1, 3, 30),
                }),
                case("ADD_ITEM", 8),
                case("set_foo", 9),
            ],
        );
        let findings = eval(&Check::ActionTypeCase, &ir);
        let reported: Vec<_> = findings
            .iter()
            .map(|f| (arg(f, "action"), f.span.start_line))
            .collect();
        assert_eq!(reported, [("set_foo", 9), ("removeItem", 3)]);
    }

    #[test]
    fn action_type_case_reports_every_offending_case() {
        let case = |line| {
            IrNode::ReducerCase(ReducerCase {
                action_type: "set_foo".into(),
                returns: ReturnShape::Other("state".into()),
                span: Span::point(line, 5),
            })
        };
        let ir = FileIr::new(FileRole::Reducer, vec![case(9), case(20)]);
        let lines: Vec<usize> = eval(&Check::ActionTypeCase, &ir)
            .iter()
            .map(|f| f.span.start_line)
            .collect();
        assert_eq!(lines, [9, 20]);
    }

    #[test]
    fn reset_case_must_return_initial_state() {
        let case = |returns| {
            IrNode::ReducerCase(ReducerCase {
                action_type: "RESET_CTX".into(),
                returns,
                span: Span::point(4, 5),
            })
        };
        let check = Check::ResetReturnsInitialState {
            action: "RESET_CTX".into(),
            initial_state: "initialState".into(),
        };
        let good = FileIr::new(
            FileRole::Reducer,
            vec![case(ReturnShape::Identifier("INITIAL_STATE".into()))],
        );
        assert!(eval(&check, &good).is_empty());

        let bad = FileIr::new(
            FileRole::Reducer,
            vec![case(ReturnShape::Spread("initialState".into()))],
        );
        let findings = eval(&check, &bad);
        assert_eq!(findings.len(), 1);
        assert_eq!(arg(&findings[0], "returned"), "a copy of `initialState`");
    }

    #[test]
    fn quote_style_skips_jsx_imports_and_embedded_quotes() {
        let lit = |value: &str, quote, context| {
            IrNode::StringLiteral(StringLiteral {
                value: value.into(),
                quote,
                context,
                span: Span::point(1, 1),
            })
        };
        let ir = FileIr::new(
            FileRole::Util,
            vec![
                lit("react", QuoteStyle::Single, LiteralContext::ImportSource),
                lit("btn", QuoteStyle::Single, LiteralContext::JsxAttribute),
                lit("say \"hi\"", QuoteStyle::Single, LiteralContext::Code),
                lit("total", QuoteStyle::Single, LiteralContext::Code),
                lit("ok", QuoteStyle::Double, LiteralContext::Code),
            ],
        );
        let findings = eval(
            &Check::QuoteStyle {
                prefer: QuoteStyle::Double,
            },
            &ir,
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(arg(&findings[0], "value"), "total");
    }

    #[test]
    fn naming_targets() {
        let mut hook = component("fetchCart", 1, 5, true);
        hook.returns_jsx = false;
        let ir = FileIr::new(
            FileRole::Hook,
            vec![
                IrNode::Function(hook),
                IrNode::Function(component("cartItem", 7, 12, true)),
            ],
        );
        let use_prefix = NamePattern::new(NameCase::Camel, Some("use".into()), None);
        let findings = eval(
            &Check::Naming {
                target: NamingTarget::Exported,
                pattern: use_prefix,
            },
            &ir,
        );
        assert_eq!(findings.len(), 2);

        let pascal = NamePattern::new(NameCase::Pascal, None, None);
        let findings = eval(
            &Check::Naming {
                target: NamingTarget::Component,
                pattern: pascal,
            },
            &ir,
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(arg(&findings[0], "name"), "cartItem");
        assert_eq!(arg(&findings[0], "expected"), "PascalCase");
    }

    #[test]
    fn file_name_exempts_index() {
        let check = Check::FileName {
            pattern: NamePattern::new(NameCase::Pascal, None, None),
        };
        let ir = FileIr::new(FileRole::ComponentEntry, vec![]);
        let index = SourceFile::in_memory("src/components/Cart/index.tsx", "");
        assert!(check.evaluate(&index, &ir).unwrap().is_empty());
        let lower = SourceFile::in_memory("src/components/cart/cart.tsx", "");
        let findings = check.evaluate(&lower, &ir).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(arg(&findings[0], "value"), "cart");
    }

    #[test]
    fn export_style_expectations() {
        let mut default_arrow = component("Cart", 1, 10, true);
        default_arrow.is_default_export = true;
        let ir = FileIr::new(FileRole::ComponentEntry, vec![IrNode::Function(default_arrow)]);
        let findings = eval(
            &Check::ExportStyle {
                expect: ExportStyle::DefaultFunctionDeclaration,
            },
            &ir,
        );
        assert_eq!(findings.len(), 1);

        let named = FileIr::new(
            FileRole::SubComponent,
            vec![IrNode::Function(component("CartItem", 1, 10, true))],
        );
        assert!(eval(
            &Check::ExportStyle {
                expect: ExportStyle::NamedArrow
            },
            &named
        )
        .is_empty());
    }

    #[test]
    fn require_import_matches_subpaths() {
        let check = Check::RequireImport {
            sources: vec!["react-hook-form".into()],
        };
        let with = FileIr::new(
            FileRole::Form,
            vec![import("react-hook-form", ImportGroup::Form, 1)],
        );
        assert!(eval(&check, &with).is_empty());
        let without = FileIr::new(
            FileRole::Form,
            vec![import("react-hook-form-lite", ImportGroup::Form, 1)],
        );
        assert_eq!(eval(&check, &without).len(), 1);
    }

    #[test]
    fn lnds_tie_break_keeps_lowest_rank() {
        let kept = longest_non_decreasing(&[0, 5, 2]);
        assert_eq!(kept, HashSet::from([0, 2]));
    }
}
