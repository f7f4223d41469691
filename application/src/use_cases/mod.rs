//! Application use cases

pub mod build_session;
pub mod execute_plan;
pub mod resolve_components;
pub mod run_tool;
pub mod tasks;
