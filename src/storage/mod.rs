//! Project and task persistence.
//!
//! The database is a single JSON document. Lookup indexes are derived from
//! the documents on open and rebuilt by [`Database::reindex_projects`] /
//! [`Database::reindex_tasks`], which is what `migrate` runs.

mod worker;

pub use worker::{execute, StorageHandle, StorageWorker};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{Project, ProjectId, Task, TaskId};

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("corrupt database {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("storage worker stopped")]
    WorkerStopped,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    next_id: u64,
}

#[derive(Debug)]
pub struct Database {
    path: PathBuf,
    doc: Document,
    tasks_by_project: HashMap<ProjectId, Vec<TaskId>>,
}

impl Database {
    /// Opens `path`, creating it (and its parent directory) when missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let doc = match std::fs::read_to_string(&path) {
            Ok(data) if data.trim().is_empty() => Document::default(),
            Ok(data) => serde_json::from_str(&data).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Document::default(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let mut db = Self {
            path,
            doc,
            tasks_by_project: HashMap::new(),
        };
        db.rebuild_indexes();
        if !db.path.exists() {
            db.flush()?;
        }
        tracing::info!(
            path = %db.path.display(),
            projects = db.doc.projects.len(),
            tasks = db.doc.tasks.len(),
            "database opened"
        );
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn projects(&self) -> Vec<Project> {
        self.doc.projects.clone()
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.doc.projects.iter().find(|p| p.id == id)
    }

    pub fn tasks_of(&self, project: ProjectId) -> Vec<Task> {
        let Some(ids) = self.tasks_by_project.get(&project) else {
            return Vec::new();
        };
        ids.iter().filter_map(|id| self.task(*id).cloned()).collect()
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.doc.tasks.iter().find(|t| t.id == id)
    }

    pub fn pending_tasks(&self) -> Vec<Task> {
        self.doc.tasks.iter().filter(|t| !t.completed).cloned().collect()
    }

    pub fn completed_tasks(&self) -> Vec<Task> {
        self.doc.tasks.iter().filter(|t| t.completed).cloned().collect()
    }

    pub fn create_project(&mut self, title: &str) -> Result<Project> {
        let title = non_empty(title)?;
        let project = Project {
            id: self.allocate_id(),
            title,
        };
        self.doc.projects.push(project.clone());
        self.tasks_by_project.insert(project.id, Vec::new());
        self.flush()?;
        Ok(project)
    }

    /// Deletes the project together with its tasks.
    pub fn delete_project(&mut self, id: ProjectId) -> Result<()> {
        let before = self.doc.projects.len();
        self.doc.projects.retain(|p| p.id != id);
        if self.doc.projects.len() == before {
            return Err(StoreError::ProjectNotFound(id));
        }
        self.doc.tasks.retain(|t| t.project_id != id);
        self.tasks_by_project.remove(&id);
        self.flush()
    }

    pub fn create_task(&mut self, project: ProjectId, title: &str) -> Result<Task> {
        let title = non_empty(title)?;
        if self.project(project).is_none() {
            return Err(StoreError::ProjectNotFound(project));
        }
        let task = Task {
            id: self.allocate_id(),
            project_id: project,
            title,
            completed: false,
        };
        self.doc.tasks.push(task.clone());
        self.tasks_by_project.entry(project).or_default().push(task.id);
        self.flush()?;
        Ok(task)
    }

    pub fn rename_task(&mut self, id: TaskId, title: &str) -> Result<()> {
        let title = non_empty(title)?;
        self.task_mut(id)?.title = title;
        self.flush()
    }

    pub fn set_task_completed(&mut self, id: TaskId, completed: bool) -> Result<()> {
        self.task_mut(id)?.completed = completed;
        self.flush()
    }

    pub fn delete_task(&mut self, id: TaskId) -> Result<()> {
        let Some(pos) = self.doc.tasks.iter().position(|t| t.id == id) else {
            return Err(StoreError::TaskNotFound(id));
        };
        let task = self.doc.tasks.remove(pos);
        if let Some(ids) = self.tasks_by_project.get_mut(&task.project_id) {
            ids.retain(|t| *t != id);
        }
        self.flush()
    }

    /// Removes finished tasks of `project`. Returns how many were removed.
    pub fn clear_completed(&mut self, project: ProjectId) -> Result<usize> {
        if self.project(project).is_none() {
            return Err(StoreError::ProjectNotFound(project));
        }
        let before = self.doc.tasks.len();
        self.doc
            .tasks
            .retain(|t| !(t.project_id == project && t.completed));
        let removed = before - self.doc.tasks.len();
        if removed > 0 {
            self.rebuild_task_index();
            self.flush()?;
        }
        Ok(removed)
    }

    /// Rebuilds project bookkeeping and rewrites the file. Returns the
    /// number of indexed projects.
    pub fn reindex_projects(&mut self) -> Result<usize> {
        let mut seen = std::collections::HashSet::new();
        self.doc.projects.retain(|p| seen.insert(p.id));
        self.doc.next_id = self.max_id().map_or(0, |id| id + 1).max(self.doc.next_id);
        self.flush()?;
        Ok(self.doc.projects.len())
    }

    /// Rebuilds the task index, dropping tasks whose project no longer
    /// exists, and rewrites the file. Returns the number of indexed tasks.
    pub fn reindex_tasks(&mut self) -> Result<usize> {
        let mut seen = std::collections::HashSet::new();
        let projects: std::collections::HashSet<ProjectId> =
            self.doc.projects.iter().map(|p| p.id).collect();
        let before = self.doc.tasks.len();
        self.doc
            .tasks
            .retain(|t| projects.contains(&t.project_id) && seen.insert(t.id));
        let dropped = before - self.doc.tasks.len();
        if dropped > 0 {
            tracing::warn!(dropped, "dropped orphaned or duplicate tasks while reindexing");
        }
        self.rebuild_task_index();
        self.flush()?;
        Ok(self.doc.tasks.len())
    }

    pub fn close(self) -> Result<()> {
        self.flush()?;
        tracing::info!(path = %self.path.display(), "database closed");
        Ok(())
    }

    fn task_mut(&mut self, id: TaskId) -> Result<&mut Task> {
        self.doc
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::TaskNotFound(id))
    }

    fn allocate_id(&mut self) -> u64 {
        if let Some(max) = self.max_id() {
            self.doc.next_id = self.doc.next_id.max(max + 1);
        }
        let id = self.doc.next_id.max(1);
        self.doc.next_id = id + 1;
        id
    }

    fn max_id(&self) -> Option<u64> {
        let projects = self.doc.projects.iter().map(|p| p.id);
        let tasks = self.doc.tasks.iter().map(|t| t.id);
        projects.chain(tasks).max()
    }

    fn rebuild_indexes(&mut self) {
        self.rebuild_task_index();
    }

    fn rebuild_task_index(&mut self) {
        self.tasks_by_project.clear();
        for project in &self.doc.projects {
            self.tasks_by_project.insert(project.id, Vec::new());
        }
        for task in &self.doc.tasks {
            self.tasks_by_project
                .entry(task.project_id)
                .or_default()
                .push(task.id);
        }
    }

    /// Writes the document to a sibling temp file and renames it into place.
    fn flush(&self) -> Result<()> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let data = serde_json::to_vec_pretty(&self.doc).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        let tmp = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&tmp).map_err(io_err)?;
        file.write_all(&data).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

/// Runs the migration steps in order: projects, then tasks.
pub fn migrate(db: &mut Database) -> Result<()> {
    let projects = db.reindex_projects()?;
    tracing::info!(projects, "projects reindexed");
    let tasks = db.reindex_tasks()?;
    tracing::info!(tasks, "tasks reindexed");
    Ok(())
}

fn non_empty(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(StoreError::EmptyTitle);
    }
    Ok(title.to_string())
}

#[cfg(test)]
#[path = "../../tests/unit/storage/database.rs"]
mod tests;
