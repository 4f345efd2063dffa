//! Agent response parsing
//!
//! Model output is untrusted input. The JSON object is located in the response
//! (bare, wrapped in prose, or inside a fenced ```json block) and validated
//! strictly against the review schema:
//!
//! | Field | Type | Required | Aliases |
//! |-------|------|----------|---------|
//! | `score` | number 0-10 | yes | `overall_score` |
//! | `stance` | APPROVE / REQUEST_CHANGES / COMMENT | yes | `recommendation`, `final_decision` |
//! | `findings` | array | yes | |
//! | `findings[].severity` | critical / high / medium / low / info | yes | |
//! | `findings[].message` | string | yes | `issue` |
//! | `findings[].category` | string | no (`general`) | |
//! | `findings[].file` | string | no | `path` |
//! | `findings[].line` | positive integer | no | |
//! | `findings[].suggestion` | string | no | `suggested_code` |
//!
//! Optional fields may be absent or `null`; present fields of the wrong type
//! are violations.

use super::finding::{DEFAULT_CATEGORY, Finding};
use super::result::AgentReview;
use super::value_objects::{Severity, Stance};
use serde_json::{Map, Value};
use thiserror::Error;

/// Why an agent response could not be used
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResponseError {
    #[error("response contains no JSON object")]
    NoJson,

    #[error("response JSON is invalid: {0}")]
    InvalidJson(String),

    #[error("missing required field '{0}'")]
    MissingField(String),

    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },
}

impl ResponseError {
    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ResponseError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Parse and validate a review agent's response
pub fn parse_agent_response(response: &str) -> Result<AgentReview, ResponseError> {
    let json = extract_json(response).ok_or(ResponseError::NoJson)?;
    let value: Value =
        serde_json::from_str(json).map_err(|e| ResponseError::InvalidJson(e.to_string()))?;
    let Value::Object(obj) = value else {
        return Err(ResponseError::invalid("$", "expected a JSON object"));
    };

    let score = parse_score(&obj)?;
    let stance = parse_stance(&obj)?;

    let raw_findings = match obj.get("findings") {
        None => return Err(ResponseError::MissingField("findings".to_string())),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(ResponseError::invalid(
                "findings",
                format!("expected an array, got {}", type_name(other)),
            ));
        }
    };
    let findings = raw_findings
        .iter()
        .enumerate()
        .map(|(i, item)| parse_finding(i, item))
        .collect::<Result<Vec<_>, _>>()?;

    let summary = optional_string(&obj, &["summary"], "summary")?.unwrap_or_default();
    let rationale = optional_string(&obj, &["rationale"], "rationale")?.unwrap_or_default();
    let next_steps = match obj.get("next_steps") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, v)| match v {
                Value::String(s) => Ok(s.clone()),
                other => Err(ResponseError::invalid(
                    format!("next_steps[{}]", i),
                    format!("expected a string, got {}", type_name(other)),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(ResponseError::invalid(
                "next_steps",
                format!("expected an array, got {}", type_name(other)),
            ));
        }
    };

    Ok(AgentReview {
        score,
        stance,
        findings,
        summary,
        rationale,
        next_steps,
    })
}

/// Locate the JSON object in a model response
///
/// A fenced ```json block wins; otherwise the span from the first `{` to the
/// last `}` is used.
pub fn extract_json(response: &str) -> Option<&str> {
    if let Some(start) = response.find("```json") {
        let body = &response[start + "```json".len()..];
        // Closing fence sits on its own line; fences inside JSON strings cannot
        if let Some(end) = body.find("\n```") {
            let inner = body[..end].trim();
            if inner.starts_with('{') {
                return Some(inner);
            }
        }
    }
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    (end > start).then(|| &response[start..=end])
}

fn parse_score(obj: &Map<String, Value>) -> Result<f64, ResponseError> {
    let (key, value) = lookup(obj, &["score", "overall_score"])
        .ok_or_else(|| ResponseError::MissingField("score".to_string()))?;
    let score = value.as_f64().ok_or_else(|| {
        ResponseError::invalid(key, format!("expected a number, got {}", type_name(value)))
    })?;
    if !(0.0..=10.0).contains(&score) {
        return Err(ResponseError::invalid(
            key,
            format!("{} is outside the range 0-10", score),
        ));
    }
    Ok(score)
}

fn parse_stance(obj: &Map<String, Value>) -> Result<Stance, ResponseError> {
    let (key, value) = lookup(obj, &["stance", "recommendation", "final_decision"])
        .ok_or_else(|| ResponseError::MissingField("stance".to_string()))?;
    let Value::String(s) = value else {
        return Err(ResponseError::invalid(
            key,
            format!("expected a string, got {}", type_name(value)),
        ));
    };
    s.parse::<Stance>()
        .map_err(|e| ResponseError::invalid(key, e))
}

fn parse_finding(index: usize, item: &Value) -> Result<Finding, ResponseError> {
    let field = |name: &str| format!("findings[{}].{}", index, name);
    let Value::Object(obj) = item else {
        return Err(ResponseError::invalid(
            format!("findings[{}]", index),
            format!("expected an object, got {}", type_name(item)),
        ));
    };

    let severity = match obj.get("severity") {
        None | Some(Value::Null) => return Err(ResponseError::MissingField(field("severity"))),
        Some(Value::String(s)) => s
            .parse::<Severity>()
            .map_err(|e| ResponseError::invalid(field("severity"), e))?,
        Some(other) => {
            return Err(ResponseError::invalid(
                field("severity"),
                format!("expected a string, got {}", type_name(other)),
            ));
        }
    };

    let message = optional_string(obj, &["message", "issue"], &field("message"))?
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ResponseError::MissingField(field("message")))?;

    let category = optional_string(obj, &["category"], &field("category"))?
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let file = optional_string(obj, &["file", "path"], &field("file"))?
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty());

    let line = match obj.get("line") {
        None | Some(Value::Null) => None,
        Some(value) => {
            let n = value.as_u64().ok_or_else(|| {
                ResponseError::invalid(
                    field("line"),
                    format!("expected a positive integer, got {}", value),
                )
            })?;
            if n == 0 || n > u32::MAX as u64 {
                return Err(ResponseError::invalid(
                    field("line"),
                    format!("{} is not a valid line number", n),
                ));
            }
            Some(n as u32)
        }
    };

    let suggestion = optional_string(obj, &["suggestion", "suggested_code"], &field("suggestion"))?
        .map(|s| strip_code_fence(&s))
        .filter(|s| !s.is_empty());
    let current_code = optional_string(obj, &["current_code"], &field("current_code"))?
        .map(|s| strip_code_fence(&s))
        .filter(|s| !s.is_empty());
    let recommendation = optional_string(obj, &["recommendation"], &field("recommendation"))?
        .filter(|s| !s.trim().is_empty());

    Ok(Finding {
        file,
        line,
        severity,
        category,
        message,
        suggestion,
        current_code,
        recommendation,
    })
}

/// First present, non-null key among `keys`
fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&'static str]) -> Option<(&'static str, &'a Value)> {
    keys.iter()
        .find_map(|k| obj.get(*k).filter(|v| !v.is_null()).map(|v| (*k, v)))
}

fn optional_string(
    obj: &Map<String, Value>,
    keys: &[&'static str],
    field: &str,
) -> Result<Option<String>, ResponseError> {
    match lookup(obj, keys) {
        None => Ok(None),
        Some((_, Value::String(s))) => Ok(Some(s.clone())),
        Some((_, other)) => Err(ResponseError::invalid(
            field,
            format!("expected a string, got {}", type_name(other)),
        )),
    }
}

/// Remove a surrounding markdown code fence (```lang ... ```)
fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```")
        && let Some(body) = rest.strip_suffix("```")
    {
        // Drop the language tag line
        return match body.split_once('\n') {
            Some((_, code)) => code.trim_end_matches('\n').to_string(),
            None => body.trim().to_string(),
        };
    }
    trimmed.to_string()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
