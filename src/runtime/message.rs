use crate::models::{Project, Task, TaskListSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMessage {
    ProjectsLoaded(Vec<Project>),
    TasksLoaded {
        source: TaskListSource,
        tasks: Vec<Task>,
    },
    Saved {
        op: &'static str,
    },
    StorageFailed {
        op: &'static str,
        error: String,
    },
}
