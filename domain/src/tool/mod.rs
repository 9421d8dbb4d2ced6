//! Tool domain module
//!
//! Defines the fixed tool surface of the robot: the five tool names and the
//! parameter schema each one accepts.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ PlanStep     │───▶│ Step         │
//! │ (schema)     │    │ (raw, wire)  │    │ (validated)  │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! | Tool | Required | Optional |
//! |------|----------|----------|
//! | `Propagate Action` | `Action` | - |
//! | `Control Servo` | `Servo Position` | - |
//! | `Capture Image` | `Request` | `BoundaryColors` |
//! | `Summarize Scene` | - | - |
//! | `Pick Object` | `object_description` | - |
//!
//! Validation of a raw step against this schema lives in
//! [`crate::plan::validation`].

pub mod entities;

pub use entities::{ToolDefinition, ToolName, ToolParameter, ToolSpec, params};
