//! Execute Plan use case
//!
//! Runs a plan step by step with error detection and mid-run replanning.
//!
//! ```text
//! Idle ──▶ Running ──(error text)──▶ Replanning ──▶ Running ──▶ ... ──▶ Done
//!                                        │
//!                                        └──(replan ceiling / cancel)──▶ Failed
//! ```
//!
//! For each step at the cursor:
//!
//! 1. Validate it. Violations become the result text (`Validation error: ...`).
//! 2. Otherwise invoke it through the [`ToolInvoker`], bounded by a timeout.
//! 3. Classify the result text. On an error, ask the planner for a corrected
//!    suffix, splice it in place of the remaining steps and retry the same
//!    cursor. An empty or failed replan leaves the plan as it is and moves on.
//!
//! The executed prefix of the plan is never touched by a replan.

use crate::config::ExecutionParams;
use crate::ports::planner_gateway::PlannerGateway;
use crate::ports::progress::{ExecutionProgressNotifier, NoProgress};
use crate::ports::tool_invoker::{ToolInvocationError, ToolInvoker};
use crate::ports::vision::VisionPort;
use crate::use_cases::plan_command::PlanCommandUseCase;
use crate::use_cases::shared::{check_cancelled, pause};
use pilot_domain::{
    ActionVocabulary, ExecutionLog, ExecutionRecord, ExecutionReport, ExecutorPhase,
    FailureReason, Plan, PlanStep, ReplanEvent, ReplanOutcome, Step, is_error_text, validate_step,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Placeholder scene text when the scene summary is unavailable
pub const SCENE_UNAVAILABLE: &str = "Unable to capture scene";

/// Use case for executing a plan with replanning
pub struct ExecutePlanUseCase<G, T, V>
where
    G: PlannerGateway + 'static,
    T: ToolInvoker + 'static,
    V: VisionPort + 'static,
{
    planner: PlanCommandUseCase<G>,
    invoker: Arc<T>,
    vision: Arc<V>,
    params: ExecutionParams,
    cancellation_token: Option<CancellationToken>,
}

/// Mutable state of one run
struct Run {
    phase: ExecutorPhase,
    plan: Plan,
    log: ExecutionLog,
    replan_attempts: u32,
}

impl Run {
    fn enter(&mut self, phase: ExecutorPhase, progress: &dyn ExecutionProgressNotifier) {
        if self.phase != phase {
            self.phase = phase;
            progress.on_phase_change(phase);
        }
    }

    fn finish(self, failure: Option<FailureReason>) -> ExecutionReport {
        ExecutionReport {
            phase: self.phase,
            log: self.log,
            final_plan: self.plan,
            failure,
        }
    }
}

impl<G, T, V> ExecutePlanUseCase<G, T, V>
where
    G: PlannerGateway + 'static,
    T: ToolInvoker + 'static,
    V: VisionPort + 'static,
{
    pub fn new(gateway: Arc<G>, invoker: Arc<T>, vision: Arc<V>, actions: ActionVocabulary) -> Self {
        Self {
            planner: PlanCommandUseCase::new(gateway, actions),
            invoker,
            vision,
            params: ExecutionParams::default(),
            cancellation_token: None,
        }
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    /// Set a cancellation token, checked between steps
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn planner(&self) -> &PlanCommandUseCase<G> {
        &self.planner
    }

    pub fn params(&self) -> &ExecutionParams {
        &self.params
    }

    /// Execute with default (no-op) progress
    pub async fn execute(&self, plan: Plan, command: &str) -> ExecutionReport {
        self.execute_with_progress(plan, command, &NoProgress).await
    }

    /// Execute the plan, reporting to `progress`.
    ///
    /// Never returns an error: every failure is recorded in the log and the
    /// terminal phase of the report.
    pub async fn execute_with_progress(
        &self,
        plan: Plan,
        command: &str,
        progress: &dyn ExecutionProgressNotifier,
    ) -> ExecutionReport {
        let mut run = Run {
            phase: ExecutorPhase::Idle,
            log: ExecutionLog::new(plan.response.clone()),
            plan,
            replan_attempts: 0,
        };
        run.enter(ExecutorPhase::Running, progress);
        info!("Executing plan with {} steps", run.plan.len());

        let mut cursor = 0;
        while cursor < run.plan.len() {
            if check_cancelled(&self.cancellation_token).is_err() {
                info!("Execution cancelled at step {}", cursor + 1);
                run.enter(ExecutorPhase::Failed, progress);
                return run.finish(Some(FailureReason::Cancelled));
            }

            let raw = run.plan.steps[cursor].clone();
            progress.on_step_start(&raw, cursor, run.plan.len());

            let record = self.run_step(&raw).await;
            progress.on_step_complete(&record);
            let failed = record.error_flag;
            let failing_text = record.result_text.clone();
            run.log.push(record);

            if failed {
                run.enter(ExecutorPhase::Replanning, progress);
                if run.replan_attempts >= self.params.max_replan_attempts {
                    let reason = FailureReason::ReplanLimitExceeded {
                        attempts: run.replan_attempts,
                        step: raw.step,
                    };
                    warn!("Stopping: {}", reason);
                    run.enter(ExecutorPhase::Failed, progress);
                    return run.finish(Some(reason));
                }
                run.replan_attempts += 1;

                let outcome = self
                    .replan(&mut run, cursor, &raw, &failing_text, command, progress)
                    .await;
                run.enter(ExecutorPhase::Running, progress);
                if matches!(outcome, ReplanOutcome::Spliced { .. }) {
                    // Retry the same cursor against the corrected suffix.
                    continue;
                }
            }

            cursor += 1;
            pause(self.params.inter_step_delay).await;
        }

        progress.on_analysis_start();
        let analysis = self
            .planner
            .final_analysis(command, &run.log.render())
            .await;
        run.log.final_analysis = Some(analysis);
        run.enter(ExecutorPhase::Done, progress);
        info!(
            "Plan finished: {} steps recorded, {} replans",
            run.log.records.len(),
            run.log.replans.len()
        );
        run.finish(None)
    }

    /// Validate and invoke one step, producing its record.
    async fn run_step(&self, raw: &PlanStep) -> ExecutionRecord {
        let (result_text, error_flag) = match validate_step(raw, self.planner.actions()) {
            Err(violations) => {
                let text = format!(
                    "Validation error: {}",
                    violations
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("; ")
                );
                warn!("Step {} rejected: {}", raw.step, text);
                (text, true)
            }
            Ok(step) => match self.invoke_bounded(&step).await {
                Ok(text) => {
                    let error = is_error_text(&text);
                    (text, error)
                }
                Err(e) => (e.to_string(), true),
            },
        };

        info!("Step {} {} -> {}", raw.step, raw.tool, result_text);
        ExecutionRecord {
            step: raw.step,
            tool: raw.tool.clone(),
            params: raw.params.clone(),
            result_text,
            error_flag,
        }
    }

    async fn invoke_bounded(&self, step: &Step) -> Result<String, ToolInvocationError> {
        let timeout = self.params.timeout_for(step.tool());
        match tokio::time::timeout(timeout, self.invoker.invoke(step)).await {
            Ok(result) => result,
            Err(_) => Err(ToolInvocationError::Timeout(timeout)),
        }
    }

    /// Ask the planner for a corrected suffix and splice it in.
    async fn replan(
        &self,
        run: &mut Run,
        cursor: usize,
        raw: &PlanStep,
        failing_text: &str,
        command: &str,
        progress: &dyn ExecutionProgressNotifier,
    ) -> ReplanOutcome {
        let attempt = run.replan_attempts;
        info!("Replanning after step {} (attempt {})", raw.step, attempt);
        progress.on_replan_start(raw.step, attempt);

        let scene = match self.vision.summarize_scene().await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Scene summary unavailable: {}", e);
                SCENE_UNAVAILABLE.to_string()
            }
        };

        let outcome = match self.planner.replan(failing_text, &scene, command).await {
            Ok(corrected) if !corrected.is_empty() => {
                let steps = corrected.len();
                run.plan.splice_replan(cursor, corrected.steps);
                ReplanOutcome::Spliced { steps }
            }
            Ok(_) => {
                warn!("Replan returned no steps, continuing with the current plan");
                ReplanOutcome::EmptyPlan
            }
            Err(e) => {
                warn!("Replan failed: {}", e);
                ReplanOutcome::PlannerError
            }
        };

        let event = ReplanEvent {
            failing_step: raw.step,
            attempt,
            outcome,
        };
        progress.on_replan_complete(&event);
        run.log.replans.push(event);
        outcome
    }
}
