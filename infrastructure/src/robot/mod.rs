//! Robot controller adapter
//!
//! The robot exposes a JSON-RPC 2.0 endpoint over HTTP; every command is a
//! single POST and success is signalled by HTTP 200.

pub mod actuator;
pub mod protocol;

pub use actuator::JsonRpcActuatorClient;
