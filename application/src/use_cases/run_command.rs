//! Run Command use case
//!
//! One user command end to end: plan it, execute the plan, and append the
//! outcome to the trial log.

use crate::ports::planner_gateway::PlannerGateway;
use crate::ports::progress::{ExecutionProgressNotifier, NoProgress};
use crate::ports::tool_invoker::ToolInvoker;
use crate::ports::trial_log::{NoTrialLog, TrialLog};
use crate::ports::vision::VisionPort;
use crate::use_cases::execute_plan::ExecutePlanUseCase;
use crate::use_cases::plan_command::PlannedCommand;
use chrono::Utc;
use pilot_domain::{ExecutionReport, PlanCompliance, TrialRecord};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Everything one command produced
#[derive(Debug, Clone)]
pub struct RunCommandOutput {
    pub planned: PlannedCommand,
    /// Compliance of the initial plan
    pub compliance: PlanCompliance,
    pub report: ExecutionReport,
    /// The record appended to the trial log
    pub trial: TrialRecord,
}

pub struct RunCommandUseCase<G, T, V>
where
    G: PlannerGateway + 'static,
    T: ToolInvoker + 'static,
    V: VisionPort + 'static,
{
    executor: ExecutePlanUseCase<G, T, V>,
    trial_log: Arc<dyn TrialLog>,
}

impl<G, T, V> RunCommandUseCase<G, T, V>
where
    G: PlannerGateway + 'static,
    T: ToolInvoker + 'static,
    V: VisionPort + 'static,
{
    pub fn new(executor: ExecutePlanUseCase<G, T, V>) -> Self {
        Self {
            executor,
            trial_log: Arc::new(NoTrialLog),
        }
    }

    pub fn with_trial_log(mut self, trial_log: Arc<dyn TrialLog>) -> Self {
        self.trial_log = trial_log;
        self
    }

    pub fn executor(&self) -> &ExecutePlanUseCase<G, T, V> {
        &self.executor
    }

    pub async fn execute(&self, command: &str) -> RunCommandOutput {
        self.execute_with_progress(command, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        command: &str,
        progress: &dyn ExecutionProgressNotifier,
    ) -> RunCommandOutput {
        let planner = self.executor.planner();
        let planned = planner.plan(command).await;
        let compliance = planned.compliance(planner.actions());
        progress.on_plan_ready(&planned.plan);
        info!(
            "Plan compliance: {}/{} steps ({})",
            compliance.num_compliant_steps,
            compliance.num_steps,
            if compliance.plan_compliant {
                "compliant"
            } else {
                "non-compliant"
            }
        );

        let report = self
            .executor
            .execute_with_progress(planned.plan.clone(), command, progress)
            .await;

        let written_plan = planned
            .document
            .as_ref()
            .and_then(|doc| doc.get("plan"))
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));
        let trial = TrialRecord::new(
            Utc::now().to_rfc3339(),
            planner.model(),
            command,
            planned.json_valid(),
            compliance.clone(),
            written_plan,
        )
        .with_execution_errors(report.log.error_count());
        self.trial_log.append(&trial);

        RunCommandOutput {
            planned,
            compliance,
            report,
            trial,
        }
    }
}
