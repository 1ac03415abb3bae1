use crate::models::{ProjectId, TaskId, TaskListSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadProjects,
    LoadTasks(TaskListSource),
    CreateProject { title: String },
    DeleteProject(ProjectId),
    CreateTask { project: ProjectId, title: String },
    RenameTask { task: TaskId, title: String },
    SetTaskCompleted { task: TaskId, completed: bool },
    DeleteTask(TaskId),
    ClearCompleted(ProjectId),
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Effect::LoadProjects => "load_projects",
            Effect::LoadTasks(_) => "load_tasks",
            Effect::CreateProject { .. } => "create_project",
            Effect::DeleteProject(_) => "delete_project",
            Effect::CreateTask { .. } => "create_task",
            Effect::RenameTask { .. } => "rename_task",
            Effect::SetTaskCompleted { .. } => "set_task_completed",
            Effect::DeleteTask(_) => "delete_task",
            Effect::ClearCompleted(_) => "clear_completed",
        }
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(self, Effect::LoadProjects | Effect::LoadTasks(_))
    }
}

/// Executes effects somewhere other than the UI thread.
pub trait EffectRunner {
    fn submit(&mut self, effect: Effect);
}
