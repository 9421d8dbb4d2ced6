//! Robot tool invoker, the concrete implementation of [`ToolInvoker`].
//!
//! Dispatches each validated [`Step`] to the vision service, the actuator or
//! the pick-object servo loop and renders the outcome as the result text the
//! executor classifies.
//!
//! ```text
//! Propagate Action  → ActuatorPort::run_action
//! Control Servo     → ActuatorPort::set_head
//! Capture Image     → VisionPort::detect
//! Summarize Scene   → VisionPort::summarize_scene
//! Pick Object       → PickObjectUseCase
//! ```
//!
//! Adapter failures become `... failed: <reason>` texts, so this invoker
//! itself never returns an error.

use async_trait::async_trait;
use pilot_application::{
    ActuatorPort, ExecutionProgressNotifier, NoProgress, PickObjectUseCase, ToolInvocationError,
    ToolInvoker, VisionPort,
};
use pilot_domain::{DetectionFrame, HeadPosition, Step};
use std::sync::Arc;
use tracing::info;

pub struct RobotToolInvoker<V: VisionPort + 'static, A: ActuatorPort + 'static> {
    vision: Arc<V>,
    actuator: Arc<A>,
    pick: PickObjectUseCase<V, A>,
    pick_progress: Arc<dyn ExecutionProgressNotifier>,
}

impl<V: VisionPort + 'static, A: ActuatorPort + 'static> RobotToolInvoker<V, A> {
    pub fn new(vision: Arc<V>, actuator: Arc<A>, pick: PickObjectUseCase<V, A>) -> Self {
        Self {
            vision,
            actuator,
            pick,
            pick_progress: Arc::new(NoProgress),
        }
    }

    /// Report servo-loop frames of `Pick Object` steps to `progress`
    pub fn with_pick_progress(mut self, progress: Arc<dyn ExecutionProgressNotifier>) -> Self {
        self.pick_progress = progress;
        self
    }

    async fn propagate_action(&self, action: &str) -> String {
        match self.actuator.run_action(action, 1).await {
            Ok(()) => format!("Action '{}' executed successfully", action),
            Err(e) => format!("Action failed: {}", e),
        }
    }

    async fn control_servo(&self, position: u16) -> String {
        match self.actuator.set_head(HeadPosition::new(position)).await {
            Ok(()) => format!("Servo set to position {} successfully", position),
            Err(e) => format!("Servo control failed: {}", e),
        }
    }

    async fn capture_image(&self, request: &str, boundary_colors: Option<&str>) -> String {
        match self.vision.detect(request, boundary_colors).await {
            Ok(frame) => format!(
                "Image captured and processed for: {} ({})",
                request,
                detection_summary(&frame)
            ),
            Err(e) => format!("Image capture failed: {}", e),
        }
    }

    async fn summarize_scene(&self) -> String {
        match self.vision.summarize_scene().await {
            Ok(summary) => format!("Scene summary: {}", summary),
            Err(e) => format!("Scene summarization failed: {}", e),
        }
    }

    async fn pick_object(&self, object_description: &str) -> String {
        match self
            .pick
            .execute_with_progress(object_description, self.pick_progress.as_ref())
            .await
        {
            Ok(outcome) => outcome.result_text(),
            Err(e) => format!("Pick object failed: {}", e),
        }
    }
}

fn detection_summary(frame: &DetectionFrame) -> String {
    match frame.detections.len() {
        0 => "0 detections".to_string(),
        n => format!("{} detections: {}", n, frame.describe()),
    }
}

#[async_trait]
impl<V: VisionPort + 'static, A: ActuatorPort + 'static> ToolInvoker for RobotToolInvoker<V, A> {
    async fn invoke(&self, step: &Step) -> Result<String, ToolInvocationError> {
        info!("Invoking {}", step.tool());
        let text = match step {
            Step::PropagateAction { action } => self.propagate_action(action).await,
            Step::ControlServo { position } => self.control_servo(*position).await,
            Step::CaptureImage {
                request,
                boundary_colors,
            } => {
                self.capture_image(request, boundary_colors.as_deref())
                    .await
            }
            Step::SummarizeScene => self.summarize_scene().await,
            Step::PickObject { object_description } => {
                self.pick_object(object_description).await
            }
        };
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pilot_application::{ActuatorError, VisionError};
    use pilot_domain::{BoundingBox, Detection, ServoConfig, is_error_text};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeActuator {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl ActuatorPort for FakeActuator {
        async fn run_action(&self, action: &str, times: u32) -> Result<(), ActuatorError> {
            self.calls.lock().unwrap().push(format!("{} x{}", action, times));
            if self.fail {
                Err(ActuatorError::Status(500))
            } else {
                Ok(())
            }
        }

        async fn set_head(&self, position: HeadPosition) -> Result<(), ActuatorError> {
            self.calls.lock().unwrap().push(format!("head {}", position));
            if self.fail {
                Err(ActuatorError::Timeout)
            } else {
                Ok(())
            }
        }
    }

    /// Serves `frames` in order, repeating the last one.
    struct FakeVision {
        frames: Vec<DetectionFrame>,
        served: Mutex<usize>,
        summary: Result<String, VisionError>,
    }

    impl FakeVision {
        fn new(frames: Vec<DetectionFrame>, summary: Result<String, VisionError>) -> Self {
            Self {
                frames,
                served: Mutex::new(0),
                summary,
            }
        }
    }

    #[async_trait]
    impl VisionPort for FakeVision {
        async fn detect(
            &self,
            _request: &str,
            _boundary_colors: Option<&str>,
        ) -> Result<DetectionFrame, VisionError> {
            let mut served = self.served.lock().unwrap();
            let index = (*served).min(self.frames.len() - 1);
            *served += 1;
            Ok(self.frames[index].clone())
        }

        async fn summarize_scene(&self) -> Result<String, VisionError> {
            self.summary.clone()
        }
    }

    fn ball_at(ymin: f64, ymax: f64) -> DetectionFrame {
        DetectionFrame {
            detections: vec![Detection {
                score: 0.91,
                label: "red ball".to_string(),
                bbox: BoundingBox::new(45.0, ymin, 55.0, ymax),
            }],
            image_width: 100,
            image_height: 100,
        }
    }

    /// Centred ball low in the frame (ncy = 1.0)
    fn ball_frame() -> DetectionFrame {
        ball_at(95.0, 105.0)
    }

    fn invoker(
        vision: FakeVision,
        actuator: FakeActuator,
    ) -> (Arc<FakeActuator>, RobotToolInvoker<FakeVision, FakeActuator>) {
        let vision = Arc::new(vision);
        let actuator = Arc::new(actuator);
        let pick = PickObjectUseCase::new(vision.clone(), actuator.clone(), ServoConfig::default());
        (actuator.clone(), RobotToolInvoker::new(vision, actuator, pick))
    }

    fn healthy() -> (Arc<FakeActuator>, RobotToolInvoker<FakeVision, FakeActuator>) {
        invoker(
            FakeVision::new(vec![ball_frame()], Ok("a red ball".to_string())),
            FakeActuator::default(),
        )
    }

    #[tokio::test]
    async fn test_propagate_action() {
        let (actuator, invoker) = healthy();
        let text = invoker
            .invoke(&Step::PropagateAction {
                action: "wave".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(text, "Action 'wave' executed successfully");
        assert!(!is_error_text(&text));
        assert_eq!(*actuator.calls.lock().unwrap(), vec!["wave x1"]);
    }

    #[tokio::test]
    async fn test_control_servo() {
        let (_, invoker) = healthy();
        let text = invoker
            .invoke(&Step::ControlServo { position: 1200 })
            .await
            .unwrap();
        assert_eq!(text, "Servo set to position 1200 successfully");
    }

    #[tokio::test]
    async fn test_capture_image_lists_detections() {
        let (_, invoker) = healthy();
        let text = invoker
            .invoke(&Step::CaptureImage {
                request: "red ball".to_string(),
                boundary_colors: None,
            })
            .await
            .unwrap();
        assert_eq!(
            text,
            "Image captured and processed for: red ball (1 detections: red ball (0.91))"
        );
    }

    #[tokio::test]
    async fn test_summarize_scene_failure_is_error_text() {
        let (_, invoker) = invoker(
            FakeVision::new(vec![DetectionFrame::default()], Err(VisionError::Timeout)),
            FakeActuator::default(),
        );
        let text = invoker.invoke(&Step::SummarizeScene).await.unwrap();
        assert_eq!(text, "Scene summarization failed: Vision request timeout");
        assert!(is_error_text(&text));
    }

    #[tokio::test]
    async fn test_actuator_failure_is_error_text() {
        let (_, invoker) = invoker(
            FakeVision::new(vec![ball_frame()], Ok(String::new())),
            FakeActuator {
                fail: true,
                ..FakeActuator::default()
            },
        );
        let text = invoker
            .invoke(&Step::PropagateAction {
                action: "bow".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(text, "Action failed: Actuator returned status 500");
        assert!(is_error_text(&text));
    }

    #[tokio::test]
    async fn test_pick_object_runs_servo_loop() {
        // Low in the frame while the head tilts down, then at the bottom ratio.
        let close = ball_at(67.0, 77.0);
        let (actuator, invoker) = invoker(
            FakeVision::new(
                vec![ball_frame(), ball_frame(), close.clone(), close],
                Ok(String::new()),
            ),
            FakeActuator::default(),
        );
        let text = invoker
            .invoke(&Step::PickObject {
                object_description: "red ball".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(
            text,
            "navigated upto red ball using the sequence [go_forward, go_forward, go_forward, catch_ball]"
        );
        assert!(!is_error_text(&text));
        assert!(actuator.calls.lock().unwrap().contains(&"catch_ball x1".to_string()));
    }

    #[tokio::test]
    async fn test_pick_object_head_failure() {
        let (_, invoker) = invoker(
            FakeVision::new(vec![ball_frame()], Ok(String::new())),
            FakeActuator {
                fail: true,
                ..FakeActuator::default()
            },
        );
        let text = invoker
            .invoke(&Step::PickObject {
                object_description: "red ball".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(
            text,
            "Pick object failed: Head centering failed: Actuator request timeout"
        );
    }
}
