//! DTO → Domain model conversion with validation.
//!
//! Unlike a fail-fast conversion, every rule is checked and all problems are
//! reported together so a catalog author can fix them in one pass.

use crate::ir::{ImportGroup, QuoteStyle};
use crate::source::FileRole;
use crate::types::Severity;

use super::dto::{CatalogDto, CheckDto, RuleDto};
use super::model::{
    Catalog, Check, ExportStyle, MessageTemplate, ModelError, NameCase, NamePattern,
    NamingTarget, RoleScope, Rule, RuleId, DEFAULT_RESPONSIVE_PREFIXES,
};
use super::{CatalogError, CatalogIssue, SUPPORTED_VERSION};

/// Converts a [`CatalogDto`] to a validated [`Catalog`].
///
/// # Errors
///
/// Returns [`CatalogError::UnsupportedVersion`] for a version other than 1,
/// or [`CatalogError::Invalid`] listing every validation problem.
pub fn load(dto: CatalogDto) -> Result<Catalog, CatalogError> {
    if dto.version != SUPPORTED_VERSION {
        return Err(CatalogError::UnsupportedVersion {
            found: dto.version,
            supported: SUPPORTED_VERSION,
        });
    }

    let mut issues = Vec::new();
    let mut rules = Vec::with_capacity(dto.rules.len());
    for (i, rule) in dto.rules.into_iter().enumerate() {
        match convert_rule(rule, i) {
            Ok(rule) => rules.push(rule),
            Err(mut errs) => issues.append(&mut errs),
        }
    }
    if !issues.is_empty() {
        return Err(CatalogError::Invalid(issues));
    }

    Catalog::new(dto.version, rules).map_err(|errors| {
        CatalogError::Invalid(
            errors
                .into_iter()
                .map(|error| CatalogIssue {
                    context: "rule".to_string(),
                    error,
                })
                .collect(),
        )
    })
}

fn convert_rule(dto: RuleDto, index: usize) -> Result<Rule, Vec<CatalogIssue>> {
    let ctx = if dto.id.is_empty() {
        format!("rule[{index}]")
    } else {
        format!("rule[{index}] `{}`", dto.id)
    };
    let mut issues = Vec::new();
    let mut issue = |field: &str, error: ModelError| {
        issues.push(CatalogIssue {
            context: format!("{ctx}.{field}"),
            error,
        });
    };

    let id = RuleId::new(&dto.id).map_err(|e| issue("id", e)).ok();
    let roles = convert_roles(&dto.roles).map_err(|e| issue("roles", e)).ok();
    let severity = parse_severity(&dto.severity)
        .map_err(|e| issue("severity", e))
        .ok();
    let message = MessageTemplate::new(&dto.message, Check::placeholders(dto.check.kind()))
        .map_err(|e| issue("message", e))
        .ok();
    let check = convert_check(dto.check).map_err(|e| issue("check", e)).ok();

    match (id, roles, severity, message, check) {
        (Some(id), Some(roles), Some(severity), Some(message), Some(check)) => Ok(Rule::new(
            id,
            dto.description,
            roles,
            severity,
            message,
            dto.help,
            dto.doc,
            check,
        )),
        _ => Err(issues),
    }
}

fn convert_roles(values: &[String]) -> Result<RoleScope, ModelError> {
    if values.is_empty() {
        return Err(ModelError::EmptyRoles);
    }
    if values.iter().any(|v| v == "*") {
        return Ok(RoleScope::Any);
    }
    let mut roles = Vec::with_capacity(values.len());
    for value in values {
        let role: FileRole = value.parse().map_err(|_| ModelError::UnknownRole {
            value: value.clone(),
        })?;
        if !roles.contains(&role) {
            roles.push(role);
        }
    }
    Ok(RoleScope::Roles(roles))
}

fn convert_check(dto: CheckDto) -> Result<Check, ModelError> {
    Ok(match dto {
        CheckDto::Naming {
            target,
            case,
            prefix,
            suffix,
        } => Check::Naming {
            target: NamingTarget::parse(&target)?,
            pattern: NamePattern::new(NameCase::parse(&case)?, prefix, suffix),
        },
        CheckDto::FileName {
            case,
            prefix,
            suffix,
        } => Check::FileName {
            pattern: NamePattern::new(NameCase::parse(&case)?, prefix, suffix),
        },
        CheckDto::ExportStyle { expect } => Check::ExportStyle {
            expect: ExportStyle::parse(&expect)?,
        },
        CheckDto::ImportOrder { order } => Check::ImportOrder {
            order: convert_order(&order)?,
        },
        CheckDto::HooksAtTop => Check::HooksAtTop,
        CheckDto::EarlyReturnNull => Check::EarlyReturnNull,
        CheckDto::ComponentBody {
            min_lines,
            blank_line_after_open,
        } => Check::ComponentBody {
            min_lines: usize::try_from(min_lines)
                .ok()
                .filter(|&n| n > 0)
                .ok_or(ModelError::ZeroMinLines)?,
            blank_line_after_open,
        },
        CheckDto::ClassNameOrder {
            responsive_prefixes,
        } => {
            let prefixes = responsive_prefixes.unwrap_or_else(|| {
                DEFAULT_RESPONSIVE_PREFIXES
                    .iter()
                    .map(ToString::to_string)
                    .collect()
            });
            if prefixes.is_empty() {
                return Err(ModelError::EmptyList {
                    field: "responsive_prefixes",
                });
            }
            Check::ClassNameOrder {
                responsive_prefixes: prefixes,
            }
        }
        CheckDto::ActionTypeCase => Check::ActionTypeCase,
        CheckDto::ResetReturnsInitialState {
            action,
            initial_state,
        } => Check::ResetReturnsInitialState {
            action: action.unwrap_or_else(|| "RESET_CTX".to_string()),
            initial_state: initial_state.unwrap_or_else(|| "initialState".to_string()),
        },
        CheckDto::QuoteStyle { prefer } => Check::QuoteStyle {
            prefer: match prefer.as_str() {
                "double" => QuoteStyle::Double,
                "single" => QuoteStyle::Single,
                _ => return Err(ModelError::UnknownQuoteStyle { value: prefer }),
            },
        },
        CheckDto::NoStringConcat => Check::NoStringConcat,
        CheckDto::RequireImport { sources } => {
            if sources.is_empty() {
                return Err(ModelError::EmptyList { field: "sources" });
            }
            Check::RequireImport { sources }
        }
    })
}

fn convert_order(values: &[String]) -> Result<Vec<ImportGroup>, ModelError> {
    if values.is_empty() {
        return Err(ModelError::EmptyList { field: "order" });
    }
    let mut order = Vec::with_capacity(values.len());
    for value in values {
        let group: ImportGroup = value.parse().map_err(|_| ModelError::UnknownGroup {
            value: value.clone(),
        })?;
        if order.contains(&group) {
            return Err(ModelError::DuplicateGroup {
                value: value.clone(),
            });
        }
        order.push(group);
    }
    Ok(order)
}

fn parse_severity(value: &str) -> Result<Severity, ModelError> {
    value.parse().map_err(|_| ModelError::UnknownSeverity {
        value: value.to_string(),
    })
}
