//! Plan domain entities

use crate::tool::{ToolName, params};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Response text used when the planner produced nothing usable.
pub const PLANNING_FAILED_RESPONSE: &str = "Planning failed";

/// A step exactly as the planner wrote it.
///
/// Nothing about `tool` or `params` is trusted yet; [`validate_step`]
/// turns it into a typed [`Step`].
///
/// [`validate_step`]: crate::plan::validation::validate_step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    /// 1-based position within the plan
    pub step: u32,
    pub tool: String,
    #[serde(default = "empty_params")]
    pub params: Value,
}

fn empty_params() -> Value {
    Value::Object(Map::new())
}

impl PlanStep {
    pub fn new(step: u32, tool: impl Into<String>, params: Value) -> Self {
        Self {
            step,
            tool: tool.into(),
            params,
        }
    }

    /// Build a raw step from a typed one (used by tests and by the direct
    /// `pick` command, which skips the planner).
    pub fn from_step(step: u32, typed: &Step) -> Self {
        Self::new(step, typed.tool().as_str(), Value::Object(typed.params()))
    }
}

/// A plan document: the planner's reply to the user plus the ordered steps.
///
/// Wire shape: `{"response": "...", "plan": [{"step": 1, "tool": "...", "params": {...}}]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub response: String,
    #[serde(rename = "plan", default)]
    pub steps: Vec<PlanStep>,
}

impl Plan {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            steps: Vec::new(),
        }
    }

    /// The degraded plan returned when the planner fails: no steps and a
    /// canned response.
    pub fn planning_failed() -> Self {
        Self::new(PLANNING_FAILED_RESPONSE)
    }

    /// Append a step numbered after the current last step.
    pub fn with_step(mut self, tool: impl Into<String>, params: Value) -> Self {
        let next = self.steps.len() as u32 + 1;
        self.steps.push(PlanStep::new(next, tool, params));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Renumber every step contiguously from 1.
    pub fn renumber(&mut self) {
        for (i, step) in self.steps.iter_mut().enumerate() {
            step.step = i as u32 + 1;
        }
    }

    /// Replace every step from `failing_index` (0-based) onward with
    /// `corrected`, numbering the injected steps from `failing_index + 1`.
    ///
    /// Steps before `failing_index` are left untouched.
    pub fn splice_replan(&mut self, failing_index: usize, corrected: Vec<PlanStep>) {
        let keep = failing_index.min(self.steps.len());
        self.steps.truncate(keep);
        for (offset, mut step) in corrected.into_iter().enumerate() {
            step.step = (keep + offset + 1) as u32;
            self.steps.push(step);
        }
    }
}

/// A validated plan step, one variant per tool, carrying only its own
/// typed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    PropagateAction {
        action: String,
    },
    ControlServo {
        position: u16,
    },
    CaptureImage {
        request: String,
        boundary_colors: Option<String>,
    },
    SummarizeScene,
    PickObject {
        object_description: String,
    },
}

impl Step {
    pub fn tool(&self) -> ToolName {
        match self {
            Step::PropagateAction { .. } => ToolName::PropagateAction,
            Step::ControlServo { .. } => ToolName::ControlServo,
            Step::CaptureImage { .. } => ToolName::CaptureImage,
            Step::SummarizeScene => ToolName::SummarizeScene,
            Step::PickObject { .. } => ToolName::PickObject,
        }
    }

    /// Params in wire form, keyed as the tool schema names them.
    pub fn params(&self) -> Map<String, Value> {
        let mut map = Map::new();
        match self {
            Step::PropagateAction { action } => {
                map.insert(params::ACTION.to_string(), json!(action));
            }
            Step::ControlServo { position } => {
                map.insert(params::SERVO_POSITION.to_string(), json!(position));
            }
            Step::CaptureImage {
                request,
                boundary_colors,
            } => {
                map.insert(params::REQUEST.to_string(), json!(request));
                if let Some(colors) = boundary_colors {
                    map.insert(params::BOUNDARY_COLORS.to_string(), json!(colors));
                }
            }
            Step::SummarizeScene => {}
            Step::PickObject { object_description } => {
                map.insert(
                    params::OBJECT_DESCRIPTION.to_string(),
                    json!(object_description),
                );
            }
        }
        map
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.tool(), Value::Object(self.params()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(name: &str) -> Value {
        json!({ "Action": name })
    }

    #[test]
    fn test_plan_wire_shape() {
        let plan = Plan::new("I will wave hello.").with_step("Propagate Action", action("wave"));
        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["response"], "I will wave hello.");
        assert_eq!(value["plan"][0]["step"], 1);
        assert_eq!(value["plan"][0]["tool"], "Propagate Action");
        assert_eq!(value["plan"][0]["params"]["Action"], "wave");
    }

    #[test]
    fn test_missing_params_default_to_empty_object() {
        let plan: Plan = serde_json::from_str(
            r#"{"response": "ok", "plan": [{"step": 1, "tool": "Summarize Scene"}]}"#,
        )
        .unwrap();
        assert_eq!(plan.steps[0].params, json!({}));
    }

    #[test]
    fn test_splice_keeps_prefix_and_renumbers() {
        let mut plan = Plan::new("move")
            .with_step("Propagate Action", action("go_forward"))
            .with_step("Propagate Action", action("turn_left"))
            .with_step("Propagate Action", action("wave"));
        let prefix = plan.steps[..1].to_vec();

        plan.splice_replan(
            1,
            vec![
                PlanStep::new(7, "Propagate Action", action("left_move")),
                PlanStep::new(9, "Propagate Action", action("wave")),
            ],
        );

        assert_eq!(plan.steps[..1], prefix[..]);
        assert_eq!(
            plan.steps.iter().map(|s| s.step).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(plan.steps[1].params["Action"], "left_move");
    }

    #[test]
    fn test_splice_past_end_appends() {
        let mut plan = Plan::new("x").with_step("Summarize Scene", json!({}));
        plan.splice_replan(5, vec![PlanStep::new(1, "Summarize Scene", json!({}))]);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.steps[1].step, 2);
    }

    #[test]
    fn test_step_params_wire_keys() {
        let step = Step::CaptureImage {
            request: "red ball;blue cup".to_string(),
            boundary_colors: None,
        };
        let params = step.params();
        assert_eq!(params.get("Request").unwrap(), "red ball;blue cup");
        assert!(!params.contains_key("BoundaryColors"));

        let servo = Step::ControlServo { position: 1200 };
        assert_eq!(servo.params().get("Servo Position").unwrap(), 1200);
        assert_eq!(servo.to_string(), "Control Servo {\"Servo Position\":1200}");
    }

    #[test]
    fn test_from_step_round_trip() {
        let typed = Step::PickObject {
            object_description: "red block".to_string(),
        };
        let raw = PlanStep::from_step(1, &typed);
        assert_eq!(raw.tool, "Pick Object");
        assert_eq!(raw.params["object_description"], "red block");
    }

    #[test]
    fn test_planning_failed_is_empty() {
        let plan = Plan::planning_failed();
        assert!(plan.is_empty());
        assert_eq!(plan.response, PLANNING_FAILED_RESPONSE);
    }
}
