//! Domain model for the task context.

mod error;
mod ids;
mod status;
mod task;

pub use error::TaskDomainError;
pub use ids::TaskId;
pub use status::{ParseTaskStatusError, TaskStatus};
pub use task::{FileMeta, NewTask, Task};
