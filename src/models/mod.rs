pub mod task;
pub mod user;

pub use task::{MessageResponse, Task, TaskInput, TaskResponse};
pub use user::{Role, User};
