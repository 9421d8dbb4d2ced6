//! Plan validation against the robot tool schema
//!
//! [`validate_step`] is exhaustive: every tool gets its structural check
//! (known keys only, required keys present) followed by its semantic check
//! (closed action vocabulary, servo range, non-empty strings). A step that
//! passes comes back as a typed [`Step`]; one that fails comes back with
//! every violation found, not just the first.
//!
//! [`validate_plan`] aggregates those results into [`PlanCompliance`]
//! metrics. It is pure and is used both to gate execution and for the
//! offline compliance report.

use crate::action::ActionVocabulary;
use crate::plan::entities::{Plan, PlanStep, Step};
use crate::plan::parser::plan_step_from_value;
use crate::servo::{MAX_HEAD, MIN_HEAD};
use crate::tool::{ToolName, ToolSpec, params};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A single schema or semantic violation in a plan step
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Params must be an object for tool {0}")]
    ParamsNotObject(ToolName),

    #[error("Missing param '{key}' for tool {tool}")]
    MissingParam { tool: ToolName, key: String },

    #[error("Unexpected param '{key}' for tool {tool}")]
    UnexpectedParam { tool: ToolName, key: String },

    #[error("Invalid Action '{0}' is not one of the allowed actions")]
    InvalidAction(String),

    #[error("Servo Position must be an integer, got {0}")]
    ServoNotInteger(String),

    #[error("Servo Position {0} out of range [1000,2000]")]
    ServoOutOfRange(i64),

    #[error("Request must be a non-empty string")]
    EmptyRequest,

    #[error("BoundaryColors must be a string if provided")]
    BoundaryColorsNotString,

    #[error("object_description must be a non-empty string")]
    EmptyObjectDescription,

    #[error("Summarize Scene params must be {{}}")]
    UnexpectedSceneParams,

    #[error("Step {0} is not an object")]
    MalformedStep(usize),
}

/// Validate a raw step against the tool schema and the allowed actions.
pub fn validate_step(step: &PlanStep, actions: &ActionVocabulary) -> Result<Step, Vec<Violation>> {
    let tool: ToolName = step
        .tool
        .parse()
        .map_err(|_| vec![Violation::UnknownTool(step.tool.clone())])?;

    let Value::Object(params) = &step.params else {
        return Err(vec![Violation::ParamsNotObject(tool)]);
    };

    let mut violations = check_keys(tool, params);
    let typed = check_values(tool, params, actions, &mut violations);

    match typed {
        Some(step) if violations.is_empty() => Ok(step),
        _ => Err(violations),
    }
}

/// Required keys present, no keys outside required ∪ optional.
fn check_keys(tool: ToolName, params: &Map<String, Value>) -> Vec<Violation> {
    let spec = ToolSpec::robot();
    let Some(definition) = spec.get(tool) else {
        return vec![Violation::UnknownTool(tool.to_string())];
    };

    let mut violations = Vec::new();
    for key in definition.required_params() {
        if !params.contains_key(key) {
            violations.push(Violation::MissingParam {
                tool,
                key: key.to_string(),
            });
        }
    }
    for key in params.keys() {
        if !definition.accepts(key) {
            violations.push(Violation::UnexpectedParam {
                tool,
                key: key.clone(),
            });
        }
    }
    violations
}

fn non_empty_str<'a>(params: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Tool-specific value checks. Returns the typed step when the values are
/// usable; key violations are reported separately by [`check_keys`].
fn check_values(
    tool: ToolName,
    params: &Map<String, Value>,
    actions: &ActionVocabulary,
    violations: &mut Vec<Violation>,
) -> Option<Step> {
    match tool {
        ToolName::PropagateAction => {
            let value = params.get(params::ACTION)?;
            match value.as_str() {
                Some(action) if actions.contains(action) => Some(Step::PropagateAction {
                    action: action.to_string(),
                }),
                Some(action) => {
                    violations.push(Violation::InvalidAction(action.to_string()));
                    None
                }
                None => {
                    violations.push(Violation::InvalidAction(value.to_string()));
                    None
                }
            }
        }
        ToolName::ControlServo => {
            let value = params.get(params::SERVO_POSITION)?;
            let Some(position) = value.as_i64() else {
                violations.push(Violation::ServoNotInteger(value.to_string()));
                return None;
            };
            if !(i64::from(MIN_HEAD)..=i64::from(MAX_HEAD)).contains(&position) {
                violations.push(Violation::ServoOutOfRange(position));
                return None;
            }
            Some(Step::ControlServo {
                position: position as u16,
            })
        }
        ToolName::CaptureImage => {
            let request = non_empty_str(params, params::REQUEST);
            if request.is_none() && params.contains_key(params::REQUEST) {
                violations.push(Violation::EmptyRequest);
            }
            let boundary_colors = match params.get(params::BOUNDARY_COLORS) {
                None => None,
                Some(Value::String(colors)) => Some(colors.clone()),
                Some(_) => {
                    violations.push(Violation::BoundaryColorsNotString);
                    return None;
                }
            };
            Some(Step::CaptureImage {
                request: request?.to_string(),
                boundary_colors,
            })
        }
        ToolName::SummarizeScene => {
            if !params.is_empty() {
                violations.push(Violation::UnexpectedSceneParams);
                return None;
            }
            Some(Step::SummarizeScene)
        }
        ToolName::PickObject => {
            let description = non_empty_str(params, params::OBJECT_DESCRIPTION);
            if description.is_none() && params.contains_key(params::OBJECT_DESCRIPTION) {
                violations.push(Violation::EmptyObjectDescription);
            }
            Some(Step::PickObject {
                object_description: description?.to_string(),
            })
        }
    }
}

/// Violations found in one step of a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepViolations {
    /// 0-based position of the step in the plan
    pub step_index: usize,
    pub violations: Vec<String>,
}

/// Compliance metrics for a whole plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanCompliance {
    /// Whether the `plan` field was a list at all
    pub parsed_ok: bool,
    pub num_steps: usize,
    pub num_compliant_steps: usize,
    pub plan_compliant: bool,
    pub step_violations: Vec<StepViolations>,
}

impl PlanCompliance {
    /// Metrics for output that never parsed into a plan document.
    pub fn unparsed() -> Self {
        Self {
            parsed_ok: false,
            num_steps: 0,
            num_compliant_steps: 0,
            plan_compliant: false,
            step_violations: Vec::new(),
        }
    }

    /// Fraction of compliant steps (0.0 for an empty plan).
    pub fn tool_compliance_rate(&self) -> f64 {
        self.num_compliant_steps as f64 / self.num_steps.max(1) as f64
    }

    fn tally(&mut self, step_index: usize, result: Result<(), Vec<Violation>>) {
        self.num_steps += 1;
        match result {
            Ok(()) => self.num_compliant_steps += 1,
            Err(violations) => self.step_violations.push(StepViolations {
                step_index,
                violations: violations.iter().map(ToString::to_string).collect(),
            }),
        }
    }

    fn finish(mut self) -> Self {
        self.plan_compliant = self.num_steps > 0 && self.num_compliant_steps == self.num_steps;
        self
    }
}

/// Validate every step of a parsed plan.
pub fn validate_plan(plan: &Plan, actions: &ActionVocabulary) -> PlanCompliance {
    let mut compliance = PlanCompliance {
        parsed_ok: true,
        ..PlanCompliance::unparsed()
    };
    for (index, step) in plan.steps.iter().enumerate() {
        compliance.tally(index, validate_step(step, actions).map(|_| ()));
    }
    compliance.finish()
}

/// Validate a plan document that has not been parsed into a [`Plan`] yet.
///
/// A document whose `plan` field is missing or not a list is reported with
/// `parsed_ok = false`; a list element that is not an object counts as a
/// non-compliant step.
pub fn validate_plan_value(document: &Value, actions: &ActionVocabulary) -> PlanCompliance {
    let Some(steps) = document.get("plan").and_then(Value::as_array) else {
        return PlanCompliance::unparsed();
    };

    let mut compliance = PlanCompliance {
        parsed_ok: true,
        ..PlanCompliance::unparsed()
    };
    for (index, raw) in steps.iter().enumerate() {
        let result = match plan_step_from_value(index, raw) {
            Some(step) => validate_step(&step, actions).map(|_| ()),
            None => Err(vec![Violation::MalformedStep(index + 1)]),
        };
        compliance.tally(index, result);
    }
    compliance.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn step(tool: &str, params: Value) -> PlanStep {
        PlanStep::new(1, tool, params)
    }

    fn vocab() -> ActionVocabulary {
        ActionVocabulary::default()
    }

    #[test]
    fn test_valid_steps_become_typed() {
        assert_eq!(
            validate_step(&step("Propagate Action", json!({"Action": "wave"})), &vocab()),
            Ok(Step::PropagateAction {
                action: "wave".to_string()
            })
        );
        assert_eq!(
            validate_step(&step("Control Servo", json!({"Servo Position": 1000})), &vocab()),
            Ok(Step::ControlServo { position: 1000 })
        );
        assert_eq!(
            validate_step(
                &step(
                    "Capture Image",
                    json!({"Request": "red ball;blue cup", "BoundaryColors": "255,0,0;0,0,255"})
                ),
                &vocab()
            ),
            Ok(Step::CaptureImage {
                request: "red ball;blue cup".to_string(),
                boundary_colors: Some("255,0,0;0,0,255".to_string()),
            })
        );
        assert_eq!(
            validate_step(&step("Summarize Scene", json!({})), &vocab()),
            Ok(Step::SummarizeScene)
        );
        assert_eq!(
            validate_step(&step("Pick Object", json!({"object_description": "pink box"})), &vocab()),
            Ok(Step::PickObject {
                object_description: "pink box".to_string()
            })
        );
    }

    #[test]
    fn test_rejects_action_outside_vocabulary() {
        let err = validate_step(&step("Propagate Action", json!({"Action": "moonwalk"})), &vocab())
            .unwrap_err();
        assert_eq!(err, vec![Violation::InvalidAction("moonwalk".to_string())]);
        assert!(err[0].to_string().contains("not one of"));
    }

    #[test]
    fn test_rejects_non_integer_servo() {
        for value in [json!(1500.5), json!("1500"), json!(true), json!(null)] {
            let err = validate_step(&step("Control Servo", json!({"Servo Position": value})), &vocab())
                .unwrap_err();
            assert!(matches!(err[0], Violation::ServoNotInteger(_)), "{:?}", err);
        }
    }

    #[test]
    fn test_rejects_servo_out_of_range() {
        for value in [999, 2001, -5] {
            let err = validate_step(&step("Control Servo", json!({"Servo Position": value})), &vocab())
                .unwrap_err();
            assert_eq!(err, vec![Violation::ServoOutOfRange(value)]);
        }
        assert!(validate_step(&step("Control Servo", json!({"Servo Position": 2000})), &vocab()).is_ok());
    }

    #[test]
    fn test_rejects_empty_request() {
        for value in ["", "   "] {
            let err = validate_step(&step("Capture Image", json!({"Request": value})), &vocab())
                .unwrap_err();
            assert_eq!(err, vec![Violation::EmptyRequest]);
        }
    }

    #[test]
    fn test_rejects_non_string_boundary_colors() {
        let err = validate_step(
            &step("Capture Image", json!({"Request": "cup", "BoundaryColors": [255, 0, 0]})),
            &vocab(),
        )
        .unwrap_err();
        assert_eq!(err, vec![Violation::BoundaryColorsNotString]);
    }

    #[test]
    fn test_rejects_params_for_summarize_scene() {
        let err = validate_step(&step("Summarize Scene", json!({"detail": "high"})), &vocab())
            .unwrap_err();
        assert!(err.contains(&Violation::UnexpectedSceneParams));
        assert!(err.contains(&Violation::UnexpectedParam {
            tool: ToolName::SummarizeScene,
            key: "detail".to_string()
        }));
    }

    #[test]
    fn test_rejects_unknown_tool_and_non_object_params() {
        assert_eq!(
            validate_step(&step("Dance", json!({})), &vocab()),
            Err(vec![Violation::UnknownTool("Dance".to_string())])
        );
        assert_eq!(
            validate_step(&step("Propagate Action", json!(["wave"])), &vocab()),
            Err(vec![Violation::ParamsNotObject(ToolName::PropagateAction)])
        );
    }

    #[test]
    fn test_reports_missing_and_unexpected_keys_together() {
        let err = validate_step(&step("Pick Object", json!({"object": "cup"})), &vocab())
            .unwrap_err();
        assert_eq!(
            err,
            vec![
                Violation::MissingParam {
                    tool: ToolName::PickObject,
                    key: "object_description".to_string()
                },
                Violation::UnexpectedParam {
                    tool: ToolName::PickObject,
                    key: "object".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_validate_plan_counts() {
        let plan = Plan::new("mixed")
            .with_step("Propagate Action", json!({"Action": "wave"}))
            .with_step("Propagate Action", json!({"Action": "fly"}))
            .with_step("Summarize Scene", json!({}));

        let compliance = validate_plan(&plan, &vocab());
        assert!(compliance.parsed_ok);
        assert_eq!(compliance.num_steps, 3);
        assert_eq!(compliance.num_compliant_steps, 2);
        assert!(!compliance.plan_compliant);
        assert_eq!(compliance.step_violations.len(), 1);
        assert_eq!(compliance.step_violations[0].step_index, 1);
        assert!((compliance.tool_compliance_rate() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_plan_is_not_compliant() {
        let compliance = validate_plan(&Plan::planning_failed(), &vocab());
        assert!(compliance.parsed_ok);
        assert!(!compliance.plan_compliant);
        assert_eq!(compliance.tool_compliance_rate(), 0.0);
    }

    #[test]
    fn test_validate_plan_value_unparsed() {
        let compliance = validate_plan_value(&json!({"response": "x", "plan": "wave"}), &vocab());
        assert!(!compliance.parsed_ok);
        assert!(!compliance.plan_compliant);
    }

    #[test]
    fn test_validate_plan_value_malformed_step() {
        let compliance = validate_plan_value(
            &json!({"plan": [42, {"step": 2, "tool": "Summarize Scene", "params": {}}]}),
            &vocab(),
        );
        assert!(compliance.parsed_ok);
        assert_eq!(compliance.num_steps, 2);
        assert_eq!(compliance.num_compliant_steps, 1);
        assert_eq!(compliance.step_violations[0].violations, vec!["Step 1 is not an object"]);
    }
}
