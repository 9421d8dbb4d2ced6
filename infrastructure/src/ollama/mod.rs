//! Ollama planner adapter
//!
//! Implements [`PlannerGateway`](pilot_application::PlannerGateway) over the
//! non-streaming `/api/chat` endpoint.

pub mod gateway;
pub mod protocol;

pub use gateway::OllamaPlannerGateway;
