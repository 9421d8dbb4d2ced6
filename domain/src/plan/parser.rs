//! Plan parsing from planner output.
//!
//! Planner models wrap their JSON in all sorts of packaging: `<think>`
//! reasoning blocks, ` ```json` fences, or a sentence before the object.
//! This module peels that off and reads the plan leniently; strict checks
//! are left to [`crate::plan::validation`].

use crate::plan::entities::{Plan, PlanStep};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use thiserror::Error;

static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid think-block regex"));

/// Errors from reading a plan document out of model text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanParseError {
    #[error("No JSON object found in planner output")]
    NoJson,

    #[error("Invalid plan JSON: {0}")]
    InvalidJson(String),

    #[error("Plan document has no 'plan' list")]
    MissingPlan,
}

/// Remove `<think>...</think>` reasoning blocks and surrounding whitespace.
///
/// An unterminated `<think>` drops everything after it.
pub fn strip_think_blocks(text: &str) -> String {
    let stripped = THINK_BLOCK.replace_all(text, "");
    let stripped = match stripped.find("<think>") {
        Some(start) => &stripped[..start],
        None => &stripped[..],
    };
    stripped.trim().to_string()
}

/// Find the JSON object in planner output.
///
/// Tries, in order: a fenced code block, the whole text, and the span from
/// the first `{` to the last `}`.
pub fn extract_json_text(text: &str) -> Option<String> {
    let text = strip_think_blocks(text);

    let mut in_block = false;
    let mut block = String::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if !in_block && trimmed.starts_with("```") {
            in_block = true;
            block.clear();
        } else if in_block && trimmed == "```" {
            if serde_json::from_str::<Value>(&block).is_ok() {
                return Some(block.trim().to_string());
            }
            in_block = false;
        } else if in_block {
            block.push_str(line);
            block.push('\n');
        }
    }

    if serde_json::from_str::<Value>(&text).is_ok() {
        return Some(text);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| text[start..=end].to_string())
}

/// Parse planner text into a [`Plan`].
pub fn parse_plan(text: &str) -> Result<Plan, PlanParseError> {
    let json = extract_json_text(text).ok_or(PlanParseError::NoJson)?;
    let value: Value =
        serde_json::from_str(&json).map_err(|e| PlanParseError::InvalidJson(e.to_string()))?;
    parse_plan_json(&value)
}

/// Read a plan from a JSON document without rejecting odd steps.
///
/// Non-object entries in the `plan` list are skipped; they would fail
/// validation anyway and there is nothing to execute. The kept steps are
/// renumbered from 1 whatever numbers the planner wrote.
pub fn parse_plan_json(value: &Value) -> Result<Plan, PlanParseError> {
    let response = value
        .get("response")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let steps = value
        .get("plan")
        .and_then(Value::as_array)
        .ok_or(PlanParseError::MissingPlan)?;

    let mut plan = Plan::new(response);
    plan.steps = steps
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| plan_step_from_value(index, raw))
        .collect();
    plan.renumber();
    Ok(plan)
}

/// Read one step; `None` when the entry is not a JSON object.
///
/// A missing or non-numeric `step` falls back to the 1-based position, a
/// missing `tool` becomes the empty string and missing `params` become `{}`.
pub fn plan_step_from_value(index: usize, raw: &Value) -> Option<PlanStep> {
    let object = raw.as_object()?;
    let step = object
        .get("step")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(index as u32 + 1);
    let tool = object
        .get("tool")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let params = object
        .get("params")
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));
    Some(PlanStep::new(step, tool, params))
}
