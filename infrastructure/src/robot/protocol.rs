//! JSON-RPC request types for the robot controller.

use pilot_domain::HeadPosition;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    REQUEST_ID.fetch_add(1, Ordering::SeqCst)
}

/// Servo move duration in milliseconds
pub const SERVO_MOVE_MS: u32 = 1000;
/// Number of servos addressed by one `SetPWMServo` call
pub const SERVO_COUNT: u32 = 2;
/// Id of the head-tilt servo
pub const HEAD_SERVO_ID: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: Value,
    pub id: u64,
}

impl JsonRpcRequest {
    fn new(method: &'static str, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
            id: next_id(),
        }
    }

    /// `RunAction [action, times]`
    pub fn run_action(action: &str, times: u32) -> Self {
        Self::new("RunAction", json!([action, times]))
    }

    /// `SetPWMServo [duration_ms, servo_count, servo_id, pulse]`
    pub fn set_head(position: HeadPosition) -> Self {
        Self::new(
            "SetPWMServo",
            json!([SERVO_MOVE_MS, SERVO_COUNT, HEAD_SERVO_ID, position.get()]),
        )
    }
}
