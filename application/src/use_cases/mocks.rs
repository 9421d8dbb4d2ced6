//! Hand-written port doubles shared by the use case tests.

use crate::ports::actuator::{ActuatorError, ActuatorPort};
use crate::ports::episode_store::{EpisodeStore, EpisodeStoreError};
use crate::ports::planner_gateway::{ChatMessage, ChatRole, GatewayError, PlannerGateway};
use crate::ports::progress::ExecutionProgressNotifier;
use crate::ports::tool_invoker::{ToolInvocationError, ToolInvoker};
use crate::ports::trial_log::TrialLog;
use crate::ports::vision::{VisionError, VisionPort};
use async_trait::async_trait;
use pilot_domain::{
    BoundingBox, Detection, DetectionFrame, Episode, ExecutorPhase, HeadPosition, Step,
    TrialRecord,
};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;

/// Planner that replays canned replies and records every request.
pub(crate) struct ScriptedPlanner {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    pub(crate) requests: Mutex<Vec<(Vec<ChatMessage>, bool)>>,
}

impl ScriptedPlanner {
    pub(crate) fn new(replies: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Last user message of the `n`-th request
    pub(crate) fn user_content(&self, n: usize) -> String {
        let requests = self.requests.lock().unwrap();
        requests[n]
            .0
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PlannerGateway for ScriptedPlanner {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, messages: &[ChatMessage], json_mode: bool) -> Result<String, GatewayError> {
        self.requests
            .lock()
            .unwrap()
            .push((messages.to_vec(), json_mode));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::ConnectionError("no reply scripted".into())))
    }
}

/// Tool invoker that answers from a script and records the calls.
///
/// When the script runs dry, every further call answers with `fallback`.
pub(crate) struct ScriptedInvoker {
    replies: Mutex<VecDeque<Result<String, ToolInvocationError>>>,
    fallback: String,
    pub(crate) calls: Mutex<Vec<Step>>,
    delay: Option<std::time::Duration>,
}

impl ScriptedInvoker {
    pub(crate) fn new(replies: Vec<Result<String, ToolInvocationError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            fallback: "ok".to_string(),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub(crate) fn always(text: &str) -> Self {
        Self {
            fallback: text.to_string(),
            ..Self::new(Vec::new())
        }
    }

    /// Make every call take `delay` before answering.
    pub(crate) fn slow(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Step> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolInvoker for ScriptedInvoker {
    async fn invoke(&self, step: &Step) -> Result<String, ToolInvocationError> {
        self.calls.lock().unwrap().push(step.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}

/// Vision double: detection frames from a script, a fixed scene summary.
pub(crate) struct ScriptedVision {
    frames: Mutex<VecDeque<Result<DetectionFrame, VisionError>>>,
    summary: Result<String, VisionError>,
    pub(crate) detect_requests: Mutex<Vec<String>>,
    pub(crate) summary_requests: Mutex<usize>,
}

impl ScriptedVision {
    pub(crate) fn new(frames: Vec<Result<DetectionFrame, VisionError>>) -> Self {
        Self {
            frames: Mutex::new(frames.into()),
            summary: Ok("a red ball on the floor".to_string()),
            detect_requests: Mutex::new(Vec::new()),
            summary_requests: Mutex::new(0),
        }
    }

    pub(crate) fn with_summary(mut self, summary: Result<String, VisionError>) -> Self {
        self.summary = summary;
        self
    }

    pub(crate) fn summary_count(&self) -> usize {
        *self.summary_requests.lock().unwrap()
    }
}

#[async_trait]
impl VisionPort for ScriptedVision {
    async fn detect(
        &self,
        request: &str,
        _boundary_colors: Option<&str>,
    ) -> Result<DetectionFrame, VisionError> {
        self.detect_requests.lock().unwrap().push(request.to_string());
        let next = self.frames.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(DetectionFrame::default()))
    }

    async fn summarize_scene(&self) -> Result<String, VisionError> {
        *self.summary_requests.lock().unwrap() += 1;
        self.summary.clone()
    }
}

/// A 100x100 frame with one box whose centre is at (`ncx`, `ncy`).
pub(crate) fn frame_at(ncx: f64, ncy: f64) -> DetectionFrame {
    let (cx, cy) = (ncx * 100.0, ncy * 100.0);
    DetectionFrame {
        detections: vec![Detection {
            score: 0.9,
            label: "red ball".to_string(),
            bbox: BoundingBox::new(cx - 5.0, cy - 5.0, cx + 5.0, cy + 5.0),
        }],
        image_width: 100,
        image_height: 100,
    }
}

/// Actuator command as the recorder saw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ActuatorCall {
    Action(String),
    Head(u16),
}

/// Actuator that records commands and optionally fails them.
pub(crate) struct RecordingActuator {
    pub(crate) calls: Mutex<Vec<ActuatorCall>>,
    fail_with: Option<ActuatorError>,
}

impl RecordingActuator {
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_with: None,
        }
    }

    pub(crate) fn failing(error: ActuatorError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::new()
        }
    }

    pub(crate) fn calls(&self) -> Vec<ActuatorCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn actions(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ActuatorCall::Action(a) => Some(a),
                ActuatorCall::Head(_) => None,
            })
            .collect()
    }

    fn outcome(&self) -> Result<(), ActuatorError> {
        match &self.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ActuatorPort for RecordingActuator {
    async fn run_action(&self, action: &str, _times: u32) -> Result<(), ActuatorError> {
        self.calls
            .lock()
            .unwrap()
            .push(ActuatorCall::Action(action.to_string()));
        self.outcome()
    }

    async fn set_head(&self, position: HeadPosition) -> Result<(), ActuatorError> {
        self.calls
            .lock()
            .unwrap()
            .push(ActuatorCall::Head(position.get()));
        self.outcome()
    }
}

/// Episode store that keeps saved episodes in memory.
pub(crate) struct MemoryEpisodeStore {
    pub(crate) saved: Mutex<Vec<Episode>>,
}

impl MemoryEpisodeStore {
    pub(crate) fn new() -> Self {
        Self {
            saved: Mutex::new(Vec::new()),
        }
    }
}

impl EpisodeStore for MemoryEpisodeStore {
    fn save(&self, episode: &Episode) -> Result<PathBuf, EpisodeStoreError> {
        let mut saved = self.saved.lock().unwrap();
        saved.push(episode.clone());
        Ok(PathBuf::from(format!("memory-{}.json", saved.len())))
    }
}

/// Trial log that keeps records in memory.
pub(crate) struct MemoryTrialLog {
    pub(crate) records: Mutex<Vec<TrialRecord>>,
}

impl MemoryTrialLog {
    pub(crate) fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

impl TrialLog for MemoryTrialLog {
    fn append(&self, record: &TrialRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}

/// Progress notifier that records phase changes.
pub(crate) struct PhaseRecorder {
    pub(crate) phases: Mutex<Vec<ExecutorPhase>>,
}

impl PhaseRecorder {
    pub(crate) fn new() -> Self {
        Self {
            phases: Mutex::new(Vec::new()),
        }
    }
}

impl ExecutionProgressNotifier for PhaseRecorder {
    fn on_phase_change(&self, phase: ExecutorPhase) {
        self.phases.lock().unwrap().push(phase);
    }
}
