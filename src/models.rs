use serde::{Deserialize, Serialize};

pub type ProjectId = u64;
pub type TaskId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// What the task list is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskListSource {
    Project(ProjectId),
    /// Every unfinished task across projects.
    Pending,
    /// Every finished task across projects.
    Completed,
}

impl TaskListSource {
    pub fn project(self) -> Option<ProjectId> {
        match self {
            TaskListSource::Project(id) => Some(id),
            TaskListSource::Pending | TaskListSource::Completed => None,
        }
    }
}
