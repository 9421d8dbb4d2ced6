//! Pick Object use case
//!
//! Closed-loop visual servoing toward a described object. Each iteration
//! asks the vision service for the object, lets the
//! [`VisualServoController`] decide, and sends exactly one body action and
//! one head command. Lost targets trigger the look-around recovery.

use crate::ports::actuator::{ActuatorError, ActuatorPort};
use crate::ports::episode_store::EpisodeStore;
use crate::ports::progress::{ExecutionProgressNotifier, NoProgress};
use crate::ports::vision::VisionPort;
use crate::use_cases::shared::{Cancelled, check_cancelled};
use pilot_domain::{
    Episode, HeadPosition, LookAround, LookAroundMove, RobotState, ServoConfig, ServoPhase,
    VisualServoController,
};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that stop a pick run before it starts steering
#[derive(Error, Debug)]
pub enum PickObjectError {
    #[error("Head centering failed: {0}")]
    Actuator(#[from] ActuatorError),

    #[error("Pick object {0}")]
    Cancelled(#[from] Cancelled),
}

/// Result of one pick run
#[derive(Debug, Clone)]
pub struct PickOutcome {
    pub object_description: String,
    /// Actions sent to the robot, in order
    pub actions: Vec<String>,
    /// Whether the pick was triggered
    pub success: bool,
    /// Loop iterations used
    pub steps: u32,
    pub final_phase: ServoPhase,
    pub episode: Episode,
    /// Where the episode was written, when episode logging is on
    pub episode_path: Option<PathBuf>,
}

impl PickOutcome {
    /// Tool result text for the `Pick Object` tool.
    pub fn result_text(&self) -> String {
        let sequence = self.actions.join(", ");
        if self.success {
            format!(
                "navigated upto {} using the sequence [{}]",
                self.object_description, sequence
            )
        } else {
            format!(
                "Pick object failed: {} not reached after {} steps (sequence [{}])",
                self.object_description, self.steps, sequence
            )
        }
    }
}

/// Use case for steering the robot to an object and picking it up
pub struct PickObjectUseCase<V: VisionPort + 'static, A: ActuatorPort + 'static> {
    vision: Arc<V>,
    actuator: Arc<A>,
    config: ServoConfig,
    episode_store: Option<Arc<dyn EpisodeStore>>,
    cancellation_token: Option<CancellationToken>,
}

impl<V: VisionPort + 'static, A: ActuatorPort + 'static> PickObjectUseCase<V, A> {
    pub fn new(vision: Arc<V>, actuator: Arc<A>, config: ServoConfig) -> Self {
        Self {
            vision,
            actuator,
            config,
            episode_store: None,
            cancellation_token: None,
        }
    }

    /// Persist each run's episode through `store`
    pub fn with_episode_store(mut self, store: Arc<dyn EpisodeStore>) -> Self {
        self.episode_store = Some(store);
        self
    }

    /// Set a cancellation token, checked between frames
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub async fn execute(&self, object_description: &str) -> Result<PickOutcome, PickObjectError> {
        self.execute_with_progress(object_description, &NoProgress)
            .await
    }

    pub async fn execute_with_progress(
        &self,
        object_description: &str,
        progress: &dyn ExecutionProgressNotifier,
    ) -> Result<PickOutcome, PickObjectError> {
        info!("Picking object: {}", object_description);
        let mut state = RobotState::new();
        self.actuator.set_head(state.head).await?;

        let mut controller = VisualServoController::new(self.config.clone());
        let mut look_around = LookAround::new(&self.config.look_around_positions);
        let mut episode = Episode::new();
        let mut actions = Vec::new();
        let mut retries = 0u32;
        let mut steps = 0u32;
        let mut success = false;

        for step in 0..self.config.max_steps {
            check_cancelled(&self.cancellation_token)?;
            steps = step + 1;

            let observation = match self.vision.detect(object_description, None).await {
                Ok(frame) => frame.observe(),
                Err(e) => {
                    debug!("Detection failed at step {}: {}", step, e);
                    None
                }
            };

            let Some(observation) = observation else {
                retries += 1;
                controller.note_miss();
                progress.on_detection_miss(step, retries);
                if retries > self.config.max_detection_retries {
                    self.recover(&mut look_around, &mut state, &mut actions)
                        .await;
                    retries = 0;
                }
                continue;
            };
            retries = 0;

            let (features, decision) = controller.decide(&observation, &mut state);
            debug!(
                "[step {}] dx={:.3} dy={:.3} action={} head={} phase={}",
                step, features.dx, features.dy, decision.action, decision.head, decision.phase
            );

            self.send_action(&decision.action).await;
            self.send_head(decision.head).await;
            actions.push(decision.action.clone());
            progress.on_pick_frame(step, &decision);
            episode.record(step, features, &decision);

            if decision.end {
                success = true;
                break;
            }
        }

        let episode_path = self.persist(&episode);
        info!(
            "Pick {} after {} steps ({} actions)",
            if success { "succeeded" } else { "gave up" },
            steps,
            actions.len()
        );

        Ok(PickOutcome {
            object_description: object_description.to_string(),
            actions,
            success,
            steps,
            final_phase: controller.phase(),
            episode,
            episode_path,
        })
    }

    async fn recover(
        &self,
        look_around: &mut LookAround,
        state: &mut RobotState,
        actions: &mut Vec<String>,
    ) {
        match look_around.next_move() {
            LookAroundMove::Head(position) => {
                info!("Target lost, looking around (head {})", position);
                self.send_head(position).await;
                state.head = position;
            }
            LookAroundMove::Rotate(action) => {
                info!("Target lost, turning ({})", action);
                self.send_action(action).await;
                state.last_action = Some(action.to_string());
                actions.push(action.to_string());
            }
        }
    }

    async fn send_action(&self, action: &str) {
        if let Err(e) = self.actuator.run_action(action, 1).await {
            warn!("Action {} failed: {}", action, e);
        }
    }

    async fn send_head(&self, position: HeadPosition) {
        if let Err(e) = self.actuator.set_head(position).await {
            warn!("Head command {} failed: {}", position, e);
        }
    }

    fn persist(&self, episode: &Episode) -> Option<PathBuf> {
        let store = self.episode_store.as_ref()?;
        match store.save(episode) {
            Ok(path) => {
                info!("Episode saved to {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("Failed to save episode: {}", e);
                None
            }
        }
    }
}
