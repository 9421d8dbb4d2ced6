//! Progress notification port
//!
//! Defines the interface for reporting progress while a plan runs and while
//! the pick loop steers the robot.

use pilot_domain::{Decision, ExecutionRecord, ExecutorPhase, Plan, PlanStep, ReplanEvent};

/// Callback for progress updates during plan execution
///
/// Implementations live in the presentation layer. Every method has a
/// no-op default so a notifier only overrides what it displays.
pub trait ExecutionProgressNotifier: Send + Sync {
    /// Called once the planner returned the initial plan
    fn on_plan_ready(&self, _plan: &Plan) {}

    /// Called when the executor changes phase
    fn on_phase_change(&self, _phase: ExecutorPhase) {}

    /// Called before a step is validated and invoked
    fn on_step_start(&self, _step: &PlanStep, _index: usize, _total: usize) {}

    /// Called after a step produced its result text
    fn on_step_complete(&self, _record: &ExecutionRecord) {}

    /// Called before the planner is asked for a corrected suffix
    fn on_replan_start(&self, _failing_step: u32, _attempt: u32) {}

    /// Called once the replan outcome is known
    fn on_replan_complete(&self, _event: &ReplanEvent) {}

    /// Called before the final analysis request
    fn on_analysis_start(&self) {}

    /// Called for each frame of the pick loop that had a detection
    fn on_pick_frame(&self, _step: u32, _decision: &Decision) {}

    /// Called for each frame of the pick loop without a detection
    fn on_detection_miss(&self, _step: u32, _retries: u32) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ExecutionProgressNotifier for NoProgress {}
