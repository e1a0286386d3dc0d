use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::dependents::{get_dependents, SymbolRef};
use crate::core::graph::DependencyGraph;
use crate::error::{CodemapError, CodemapResult};

/// One parsed parameter of a signature string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub is_required: bool,
    pub has_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_token: Option<String>,
    pub is_variadic: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakingChangeReport {
    pub symbol: String,
    pub old_signature: Option<String>,
    pub new_signature: String,
    pub is_breaking: bool,
    pub reason: String,
    pub breaking_callers: Vec<SymbolRef>,
    pub safe_callers: Vec<SymbolRef>,
    pub suggestion: String,
}

/// Parse the text inside the outermost parentheses of a signature string
/// into an ordered parameter list.
///
/// Top-level commas are found with bracket-depth tracking, so generic types
/// and default-value expressions containing commas are not mis-split.
/// `self`/`cls` receivers are excluded. A signature that cannot be
/// parenthesis-matched degrades to an empty parameter list rather than
/// erroring, so breaking-change analysis never fails on unusual input.
pub fn parse_signature(signature: &str) -> Vec<Parameter> {
    let Some(inner) = extract_parenthesized(signature) else {
        return Vec::new();
    };

    split_top_level(inner)
        .into_iter()
        .filter_map(parse_parameter)
        .filter(|param| param.name != "self" && param.name != "cls")
        .collect()
}

fn extract_parenthesized(signature: &str) -> Option<&str> {
    let open = signature.find('(')?;
    let mut depth = 0usize;
    for (offset, ch) in signature[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&signature[open + 1..open + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (idx, ch) in text.char_indices() {
        match ch {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth = (depth - 1).max(0),
            ',' if depth == 0 => {
                parts.push(&text[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn parse_parameter(raw: &str) -> Option<Parameter> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Variadic markers are tagged and later excluded from positional
    // comparison.
    let (is_variadic, trimmed) = if let Some(rest) = trimmed.strip_prefix("...") {
        (true, rest.trim())
    } else if let Some(rest) = trimmed.strip_prefix("**") {
        (true, rest.trim())
    } else if let Some(rest) = trimmed.strip_prefix('*') {
        (true, rest.trim())
    } else {
        (false, trimmed)
    };
    // A bare `*` keyword-only separator carries no parameter.
    if trimmed.is_empty() {
        return None;
    }

    let (head, default) = match find_top_level(trimmed, '=') {
        Some(idx) => (&trimmed[..idx], Some(trimmed[idx + 1..].trim())),
        None => (trimmed, None),
    };
    let has_default = default.is_some();

    let (name_part, type_token) = match find_top_level(head, ':') {
        Some(idx) => {
            let token = head[idx + 1..].trim();
            (
                &head[..idx],
                (!token.is_empty()).then(|| token.to_string()),
            )
        }
        None => (head, None),
    };

    let mut name = name_part.trim();
    let is_optional_marker = name.ends_with('?');
    if is_optional_marker {
        name = name[..name.len() - 1].trim_end();
    }
    if name.is_empty() {
        return None;
    }

    Some(Parameter {
        name: name.to_string(),
        is_required: !has_default && !is_optional_marker && !is_variadic,
        has_default,
        type_token,
        is_variadic,
    })
}

fn find_top_level(text: &str, needle: char) -> Option<usize> {
    let mut depth = 0i32;
    for (idx, ch) in text.char_indices() {
        match ch {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth = (depth - 1).max(0),
            ch if ch == needle && depth == 0 => return Some(idx),
            _ => {}
        }
    }
    None
}

/// Classification rules, first applicable wins:
/// 1. no old signature recorded (new symbol): not breaking;
/// 2. an old required parameter name is absent from the new set: breaking;
/// 3. more required parameters than before: breaking;
/// 4. a required parameter renamed/reordered at a shared position: breaking;
/// 5. a recovered type token differs at a shared position: breaking
///    (conservative — token inequality counts even when the types might be
///    compatible);
/// 6. otherwise safe (optional additions at the tail, return-type-only
///    changes).
fn classify(old_signature: Option<&str>, new_signature: &str) -> (bool, String) {
    let Some(old_signature) = old_signature else {
        return (
            false,
            "no previous signature recorded for symbol".to_string(),
        );
    };

    let old_params = parse_signature(old_signature);
    let new_params = parse_signature(new_signature);

    let old_positional: Vec<&Parameter> =
        old_params.iter().filter(|p| !p.is_variadic).collect();
    let new_positional: Vec<&Parameter> =
        new_params.iter().filter(|p| !p.is_variadic).collect();

    let new_names: HashSet<&str> = new_params.iter().map(|p| p.name.as_str()).collect();
    for param in old_positional.iter().filter(|p| p.is_required) {
        if !new_names.contains(param.name.as_str()) {
            return (
                true,
                format!("required parameter removed: {}", param.name),
            );
        }
    }

    let old_required = old_positional.iter().filter(|p| p.is_required).count();
    let new_required = new_positional.iter().filter(|p| p.is_required).count();
    if new_required > old_required {
        return (true, "new required parameter added".to_string());
    }

    let shared = old_positional.len().min(new_positional.len());
    for idx in 0..shared {
        let (old, new) = (old_positional[idx], new_positional[idx]);
        if old.is_required && old.name != new.name {
            return (
                true,
                format!(
                    "parameter order/name changed at position {idx}: {} -> {}",
                    old.name, new.name
                ),
            );
        }
    }

    for idx in 0..shared {
        let (old, new) = (old_positional[idx], new_positional[idx]);
        if old.name != new.name {
            continue;
        }
        if let (Some(old_type), Some(new_type)) = (&old.type_token, &new.type_token) {
            if old_type != new_type {
                return (
                    true,
                    format!(
                        "type changed for parameter {}: {} -> {}",
                        old.name, old_type, new_type
                    ),
                );
            }
        }
    }

    (false, "signature change is backward compatible".to_string())
}

/// Classify a proposed signature change for `symbol` and partition its
/// callers (unlimited depth) into breaking and safe sets.
pub fn check_breaking_change(
    graph: &DependencyGraph,
    symbol: &str,
    new_signature: &str,
) -> CodemapResult<BreakingChangeReport> {
    let declared = graph
        .get(symbol)
        .ok_or_else(|| CodemapError::SymbolNotFound(symbol.to_string()))?;
    let old_signature = declared.signature.clone();

    let (is_breaking, reason) = classify(old_signature.as_deref(), new_signature);

    let dependents = get_dependents(graph, symbol, 0)?;
    let callers: Vec<SymbolRef> = dependents
        .direct
        .into_iter()
        .chain(dependents.transitive)
        .collect();

    let (breaking_callers, safe_callers, suggestion) = if is_breaking {
        let suggestion = format!(
            "update {} caller(s) before applying this change",
            callers.len()
        );
        (callers, Vec::new(), suggestion)
    } else {
        (
            Vec::new(),
            callers,
            "change appears backward compatible".to_string(),
        )
    };

    Ok(BreakingChangeReport {
        symbol: symbol.to_string(),
        old_signature,
        new_signature: new_signature.to_string(),
        is_breaking,
        reason,
        breaking_callers,
        safe_callers,
        suggestion,
    })
}
