use std::cmp::Ordering;

use serde_json::Value as JsonValue;

use crate::foundation::error::{OverlayError, OverlayResult};
use crate::scene::EntityState;

/// Comparison operator of a [`Comparator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=` or `==`
    Eq,
    /// `!=` or `<>`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CompareOp {
    fn holds(self, ord: Ordering) -> bool {
        match self {
            Self::Eq => ord == Ordering::Equal,
            Self::Ne => ord != Ordering::Equal,
            Self::Lt => ord == Ordering::Less,
            Self::Le => ord != Ordering::Greater,
            Self::Gt => ord == Ordering::Greater,
            Self::Ge => ord != Ordering::Less,
        }
    }
}

// Longest tokens first so `<=` wins over `<`.
const OPERATORS: &[(&str, CompareOp)] = &[
    ("==", CompareOp::Eq),
    ("!=", CompareOp::Ne),
    ("<>", CompareOp::Ne),
    ("<=", CompareOp::Le),
    (">=", CompareOp::Ge),
    ("=", CompareOp::Eq),
    ("<", CompareOp::Lt),
    (">", CompareOp::Gt),
];

#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Number(f64),
    Bool(bool),
    Text(String),
}

/// `<path> <op> <value>` test against an entity's attribute document.
///
/// `path` is dotted (`hp.value`) and resolved against [`EntityState::data`], falling back to the
/// entity's own `rotation`, `elevation` and `alpha`. A trailing `%` on the value compares
/// `path.value / path.max * 100` instead of the raw attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparator {
    path: Vec<String>,
    op: CompareOp,
    value: Operand,
    percent: bool,
}

impl Comparator {
    /// Parse a comparator expression.
    pub fn parse(expr: &str) -> OverlayResult<Self> {
        let (at, token, op) = find_operator(expr)
            .ok_or_else(|| OverlayError::validation(format!("comparator '{expr}' has no operator")))?;

        let path = expr[..at].trim();
        if path.is_empty() {
            return Err(OverlayError::validation(format!(
                "comparator '{expr}' has no attribute path"
            )));
        }
        let mut raw = expr[at + token.len()..].trim();
        if raw.is_empty() {
            return Err(OverlayError::validation(format!(
                "comparator '{expr}' has no value"
            )));
        }

        let percent = raw.ends_with('%');
        if percent {
            raw = raw[..raw.len() - 1].trim_end();
        }

        let value = if let Ok(n) = raw.parse::<f64>() {
            Operand::Number(n)
        } else if percent {
            return Err(OverlayError::validation(format!(
                "comparator '{expr}' uses '%' with a non-numeric value"
            )));
        } else if raw.eq_ignore_ascii_case("true") {
            Operand::Bool(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Operand::Bool(false)
        } else {
            let unquoted = raw
                .strip_prefix('"')
                .and_then(|r| r.strip_suffix('"'))
                .or_else(|| raw.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')))
                .unwrap_or(raw);
            Operand::Text(unquoted.to_owned())
        };

        Ok(Self {
            path: path.split('.').map(|p| p.trim().to_owned()).collect(),
            op,
            value,
            percent,
        })
    }

    /// Operator of this comparator.
    pub fn op(&self) -> CompareOp {
        self.op
    }

    /// Evaluate against `entity`. Missing attributes evaluate to `false`.
    pub fn evaluate(&self, entity: &EntityState) -> bool {
        let Some(lhs) = self.lookup(entity) else {
            return false;
        };

        if self.percent {
            let (Some(value), Some(max)) = (
                lhs.get("value").and_then(as_number),
                lhs.get("max").and_then(as_number),
            ) else {
                return false;
            };
            if max == 0.0 {
                return false;
            }
            return self.compare_number(value / max * 100.0);
        }

        match &self.value {
            Operand::Number(_) => as_number(&lhs).is_some_and(|n| self.compare_number(n)),
            Operand::Bool(b) => match lhs {
                JsonValue::Bool(l) => self.op.holds(l.cmp(b)),
                _ => false,
            },
            Operand::Text(t) => match &lhs {
                JsonValue::String(l) => self.op.holds(l.as_str().cmp(t.as_str())),
                JsonValue::Number(_) | JsonValue::Bool(_) => {
                    self.op.holds(lhs.to_string().as_str().cmp(t.as_str()))
                }
                _ => false,
            },
        }
    }

    fn compare_number(&self, lhs: f64) -> bool {
        let Operand::Number(rhs) = self.value else {
            return false;
        };
        lhs.partial_cmp(&rhs).is_some_and(|ord| self.op.holds(ord))
    }

    fn lookup(&self, entity: &EntityState) -> Option<JsonValue> {
        let mut cur = &entity.data;
        let mut found = true;
        for seg in &self.path {
            match cur.get(seg) {
                Some(next) => cur = next,
                None => {
                    found = false;
                    break;
                }
            }
        }
        if found {
            return Some(cur.clone());
        }

        let [single] = self.path.as_slice() else {
            return None;
        };
        let v = match single.as_str() {
            "rotation" => entity.rotation,
            "elevation" => entity.elevation,
            "alpha" => entity.alpha,
            _ => return None,
        };
        serde_json::Number::from_f64(v).map(JsonValue::Number)
    }
}

fn find_operator(expr: &str) -> Option<(usize, &'static str, CompareOp)> {
    expr.char_indices().find_map(|(i, _)| {
        OPERATORS
            .iter()
            .find(|(tok, _)| expr[i..].starts_with(tok))
            .map(|(tok, op)| (i, *tok, *op))
    })
}

fn as_number(v: &JsonValue) -> Option<f64> {
    match v {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/comparator.rs"]
mod tests;
