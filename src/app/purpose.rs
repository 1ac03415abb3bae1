use crate::models::{ProjectId, TaskId};

/// Why an overlay was opened; decides what an accepted completion does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalPurpose {
    NewProject,
    NewTask { project: ProjectId },
    RenameTask { task: TaskId },
    DeleteTask { task: TaskId },
    DeleteProject { project: ProjectId },
    ClearCompleted { project: ProjectId },
}
