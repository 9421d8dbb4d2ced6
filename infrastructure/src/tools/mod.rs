//! Tool invocation adapters

pub mod robot_invoker;

pub use robot_invoker::RobotToolInvoker;
