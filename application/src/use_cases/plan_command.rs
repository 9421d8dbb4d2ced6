//! Plan Command use case
//!
//! All traffic with the planner model: the initial plan for a user
//! command, corrected suffixes after a failing step, and the closing
//! analysis of a run.

use crate::ports::planner_gateway::{ChatMessage, GatewayError, PlannerGateway};
use pilot_domain::{
    ActionVocabulary, Plan, PlanCompliance, PlanParseError, PlannerPromptTemplate, ToolSpec,
    analysis_unavailable, parse_plan_json, plan::extract_json_text, strip_think_blocks,
    validate_plan_value,
};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while asking for a plan
#[derive(Error, Debug)]
pub enum PlanningError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("{0}")]
    Parse(#[from] PlanParseError),
}

/// The initial plan for a command together with the document it came from
#[derive(Debug, Clone)]
pub struct PlannedCommand {
    pub command: String,
    pub plan: Plan,
    /// The parsed planner JSON, `None` when the output was not valid JSON
    pub document: Option<Value>,
}

impl PlannedCommand {
    pub fn json_valid(&self) -> bool {
        self.document.is_some()
    }

    /// Compliance of the plan as the planner wrote it.
    pub fn compliance(&self, actions: &ActionVocabulary) -> PlanCompliance {
        match &self.document {
            Some(document) => validate_plan_value(document, actions),
            None => PlanCompliance::unparsed(),
        }
    }
}

/// Use case for talking to the planner
pub struct PlanCommandUseCase<G: PlannerGateway + 'static> {
    gateway: Arc<G>,
    actions: ActionVocabulary,
    system_prompt: String,
}

impl<G: PlannerGateway + 'static> PlanCommandUseCase<G> {
    pub fn new(gateway: Arc<G>, actions: ActionVocabulary) -> Self {
        let system_prompt = PlannerPromptTemplate::system(&ToolSpec::robot(), &actions);
        Self {
            gateway,
            actions,
            system_prompt,
        }
    }

    pub fn actions(&self) -> &ActionVocabulary {
        &self.actions
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn model(&self) -> &str {
        self.gateway.model()
    }

    /// Ask for a plan, returning the parsed document alongside it.
    async fn request(&self, user_content: String) -> Result<(Plan, Value), PlanningError> {
        let messages = [
            ChatMessage::system(self.system_prompt.clone()),
            ChatMessage::user(user_content),
        ];
        let content = self.gateway.chat(&messages, true).await?;
        debug!("Planner raw output: {}", content);

        let json = extract_json_text(&content).ok_or(PlanParseError::NoJson)?;
        let document: Value = serde_json::from_str(&json)
            .map_err(|e| PlanParseError::InvalidJson(e.to_string()))?;
        let plan = parse_plan_json(&document)?;
        Ok((plan, document))
    }

    /// Plan a user command.
    ///
    /// Never fails: a planner or parse failure yields the empty
    /// "Planning failed" plan.
    pub async fn plan(&self, command: &str) -> PlannedCommand {
        info!("Planning command: {}", command);
        match self.request(command.to_string()).await {
            Ok((plan, document)) => {
                info!("Planner returned {} steps", plan.len());
                PlannedCommand {
                    command: command.to_string(),
                    plan,
                    document: Some(document),
                }
            }
            Err(e) => {
                warn!("Planning failed: {}", e);
                PlannedCommand {
                    command: command.to_string(),
                    plan: Plan::planning_failed(),
                    document: None,
                }
            }
        }
    }

    /// Ask for a corrected plan after a failing step.
    pub async fn replan(
        &self,
        failing_text: &str,
        scene_summary: &str,
        original_command: &str,
    ) -> Result<Plan, PlanningError> {
        let prompt = PlannerPromptTemplate::replan(
            failing_text,
            scene_summary,
            original_command,
            &self.actions,
            &self.system_prompt,
        );
        let (plan, _) = self.request(prompt).await?;
        Ok(plan)
    }

    /// Summarize a finished run for the user.
    ///
    /// Reasoning blocks are stripped. A failed request yields
    /// `Analysis unavailable: <reason>`.
    pub async fn final_analysis(&self, command: &str, execution_summary: &str) -> String {
        let prompt = PlannerPromptTemplate::final_analysis(command, execution_summary);
        match self.gateway.chat(&[ChatMessage::user(prompt)], false).await {
            Ok(content) => strip_think_blocks(&content),
            Err(e) => {
                warn!("Final analysis failed: {}", e);
                analysis_unavailable(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::mocks::ScriptedPlanner;

    fn use_case(replies: Vec<Result<String, GatewayError>>) -> (Arc<ScriptedPlanner>, PlanCommandUseCase<ScriptedPlanner>) {
        let planner = Arc::new(ScriptedPlanner::new(replies));
        let use_case = PlanCommandUseCase::new(planner.clone(), ActionVocabulary::default());
        (planner, use_case)
    }

    #[tokio::test]
    async fn test_plan_parses_reply() {
        let (planner, use_case) = use_case(vec![Ok(
            r#"<think>wave</think>{"response": "Waving!", "plan": [{"step": 1, "tool": "Propagate Action", "params": {"Action": "wave"}}]}"#.to_string(),
        )]);

        let planned = use_case.plan("wave at me").await;
        assert!(planned.json_valid());
        assert_eq!(planned.plan.response, "Waving!");
        assert_eq!(planned.plan.len(), 1);
        assert!(planned.compliance(use_case.actions()).plan_compliant);

        let requests = planner.requests.lock().unwrap();
        let (messages, json_mode) = &requests[0];
        assert!(*json_mode);
        assert_eq!(messages[0].content, use_case.system_prompt());
        assert_eq!(messages[1].content, "wave at me");
    }

    #[tokio::test]
    async fn test_plan_degrades_on_gateway_error() {
        let (_, use_case) = use_case(vec![Err(GatewayError::Timeout)]);
        let planned = use_case.plan("wave").await;
        assert!(!planned.json_valid());
        assert!(planned.plan.is_empty());
        assert_eq!(planned.plan.response, "Planning failed");
        assert!(!planned.compliance(use_case.actions()).parsed_ok);
    }

    #[tokio::test]
    async fn test_plan_degrades_on_garbage() {
        let (_, use_case) = use_case(vec![Ok("I cannot do that.".to_string())]);
        let planned = use_case.plan("fly").await;
        assert_eq!(planned.plan.response, "Planning failed");
    }

    #[tokio::test]
    async fn test_final_analysis_strips_think() {
        let (planner, use_case) = use_case(vec![Ok("<think>hmm</think>\nThe robot waved.".to_string())]);
        let analysis = use_case.final_analysis("wave", "Step 1: ok").await;
        assert_eq!(analysis, "The robot waved.");
        assert!(!planner.requests.lock().unwrap()[0].1);
    }

    #[tokio::test]
    async fn test_final_analysis_unavailable() {
        let (_, use_case) = use_case(vec![Err(GatewayError::ConnectionError("refused".into()))]);
        let analysis = use_case.final_analysis("wave", "").await;
        assert_eq!(analysis, "Analysis unavailable: Connection error: refused");
    }
}
