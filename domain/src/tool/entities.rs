//! Tool domain entities
//!
//! The robot exposes a closed set of five tools. [`ToolName`] carries their
//! exact wire spellings and [`ToolSpec`] carries the parameter schema the
//! planner is shown and the validator enforces.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Name of a robot tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ToolName {
    #[serde(rename = "Propagate Action")]
    PropagateAction,
    #[serde(rename = "Control Servo")]
    ControlServo,
    #[serde(rename = "Capture Image")]
    CaptureImage,
    #[serde(rename = "Summarize Scene")]
    SummarizeScene,
    #[serde(rename = "Pick Object")]
    PickObject,
}

impl ToolName {
    pub const ALL: [ToolName; 5] = [
        ToolName::PropagateAction,
        ToolName::ControlServo,
        ToolName::CaptureImage,
        ToolName::SummarizeScene,
        ToolName::PickObject,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::PropagateAction => "Propagate Action",
            ToolName::ControlServo => "Control Servo",
            ToolName::CaptureImage => "Capture Image",
            ToolName::SummarizeScene => "Summarize Scene",
            ToolName::PickObject => "Pick Object",
        }
    }

    /// Whether this tool runs a multi-iteration control loop on the robot
    /// and therefore needs the long-running call timeout.
    pub fn is_long_running(&self) -> bool {
        matches!(self, ToolName::PickObject)
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown tool: {}", s))
    }
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter key as it appears in a plan step (e.g. "Servo Position")
    pub name: String,
    pub description: String,
    pub required: bool,
    /// JSON type hint ("string", "integer")
    pub param_type: String,
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// Definition of a single robot tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: ToolName,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

impl ToolDefinition {
    pub fn new(name: ToolName, description: impl Into<String>) -> Self {
        Self {
            name,
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn required_params(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
    }

    pub fn optional_params(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter(|p| !p.required)
            .map(|p| p.name.as_str())
    }

    /// Whether `key` is a declared (required or optional) parameter.
    pub fn accepts(&self, key: &str) -> bool {
        self.parameters.iter().any(|p| p.name == key)
    }

    /// One-line schema hint used in planner prompts, e.g.
    /// `{"Request": "<string>", "BoundaryColors": "<string, optional>"}`.
    pub fn params_hint(&self) -> String {
        let fields = self
            .parameters
            .iter()
            .map(|p| {
                if p.required {
                    format!("\"{}\": <{}>", p.name, p.param_type)
                } else {
                    format!("\"{}\": <{}, optional>", p.name, p.param_type)
                }
            })
            .collect::<Vec<_>>();
        format!("{{{}}}", fields.join(", "))
    }
}

/// Parameter keys used by the robot tools
pub mod params {
    pub const ACTION: &str = "Action";
    pub const SERVO_POSITION: &str = "Servo Position";
    pub const REQUEST: &str = "Request";
    pub const BOUNDARY_COLORS: &str = "BoundaryColors";
    pub const OBJECT_DESCRIPTION: &str = "object_description";
}

/// The fixed tool schema of the robot.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    tools: Vec<ToolDefinition>,
}

impl ToolSpec {
    /// Schema for the five robot tools, in the order they are presented to the planner.
    pub fn robot() -> Self {
        let tools = vec![
            ToolDefinition::new(
                ToolName::PropagateAction,
                "Execute one predefined action from the robot's action group",
            )
            .with_parameter(ToolParameter::new(
                params::ACTION,
                "Exactly one of the allowed actions",
                true,
            )),
            ToolDefinition::new(
                ToolName::ControlServo,
                "Tilt the head servo (1500 looks straight ahead, lower looks down, higher looks up)",
            )
            .with_parameter(
                ToolParameter::new(params::SERVO_POSITION, "Pulse width from 1000 to 2000", true)
                    .with_type("integer"),
            ),
            ToolDefinition::new(
                ToolName::CaptureImage,
                "Capture a camera frame and run object detection for the requested objects",
            )
            .with_parameter(ToolParameter::new(
                params::REQUEST,
                "Semicolon-separated objects to look for, e.g. \"red ball;blue cup\"",
                true,
            ))
            .with_parameter(ToolParameter::new(
                params::BOUNDARY_COLORS,
                "Semicolon-separated RGB values for the bounding boxes, one per object",
                false,
            )),
            ToolDefinition::new(
                ToolName::SummarizeScene,
                "Describe what the camera currently sees in one natural-language sentence",
            ),
            ToolDefinition::new(
                ToolName::PickObject,
                "Navigate to the described object with visual servoing and pick it up",
            )
            .with_parameter(ToolParameter::new(
                params::OBJECT_DESCRIPTION,
                "Color and name of the object, e.g. \"red block\"",
                true,
            )),
        ];
        Self { tools }
    }

    pub fn get(&self, name: ToolName) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.iter().map(|t| t.name.as_str())
    }
}

impl Default for ToolSpec {
    fn default() -> Self {
        Self::robot()
    }
}
