//! Application layer for robot-pilot
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    actuator::{ActuatorError, ActuatorPort},
    episode_store::{EpisodeStore, EpisodeStoreError},
    planner_gateway::{ChatMessage, ChatRole, GatewayError, PlannerGateway},
    progress::{ExecutionProgressNotifier, NoProgress},
    tool_invoker::{ToolInvocationError, ToolInvoker},
    trial_log::{NoTrialLog, TrialLog},
    vision::{VisionError, VisionPort},
};
pub use use_cases::execute_plan::{ExecutePlanUseCase, SCENE_UNAVAILABLE};
pub use use_cases::pick_object::{PickObjectError, PickObjectUseCase, PickOutcome};
pub use use_cases::plan_command::{PlanCommandUseCase, PlannedCommand, PlanningError};
pub use use_cases::run_command::{RunCommandOutput, RunCommandUseCase};
pub use use_cases::shared::Cancelled;
