//! Application services for the task context.

mod lifecycle;

pub use lifecycle::{CreateTaskRequest, TaskFlowError, TaskFlowResult, TaskLifecycleService};
