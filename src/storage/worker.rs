use std::io;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio::task::JoinHandle;

use super::{Database, StoreError};
use crate::models::TaskListSource;
use crate::runtime::{AppMessage, Effect, EffectRunner};

/// Applies one effect to the database and describes the result.
pub fn execute(db: &mut Database, effect: Effect) -> Result<AppMessage, StoreError> {
    let op = effect.name();
    match effect {
        Effect::LoadProjects => return Ok(AppMessage::ProjectsLoaded(db.projects())),
        Effect::LoadTasks(source) => {
            let tasks = match source {
                TaskListSource::Project(id) => db.tasks_of(id),
                TaskListSource::Pending => db.pending_tasks(),
                TaskListSource::Completed => db.completed_tasks(),
            };
            return Ok(AppMessage::TasksLoaded { source, tasks });
        }
        Effect::CreateProject { title } => {
            db.create_project(&title)?;
        }
        Effect::DeleteProject(id) => db.delete_project(id)?,
        Effect::CreateTask { project, title } => {
            db.create_task(project, &title)?;
        }
        Effect::RenameTask { task, title } => db.rename_task(task, &title)?,
        Effect::SetTaskCompleted { task, completed } => db.set_task_completed(task, completed)?,
        Effect::DeleteTask(id) => db.delete_task(id)?,
        Effect::ClearCompleted(project) => {
            let removed = db.clear_completed(project)?;
            tracing::debug!(project, removed, "cleared completed tasks");
        }
    }
    Ok(AppMessage::Saved { op })
}

/// Runs effects one at a time, in submission order, on a tokio runtime.
/// Database calls happen on the blocking pool so the UI thread never waits
/// on disk io.
pub struct StorageWorker {
    runtime: tokio::runtime::Runtime,
    tx: UnboundedSender<Effect>,
    handle: JoinHandle<()>,
    db: Arc<Mutex<Database>>,
}

impl StorageWorker {
    pub fn spawn(db: Database, reply: Sender<AppMessage>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;

        let db = Arc::new(Mutex::new(db));
        let (tx, mut rx) = unbounded_channel::<Effect>();
        let shared = db.clone();
        let handle = runtime.spawn(async move {
            let mut listening = true;
            while let Some(effect) = rx.recv().await {
                let op = effect.name();
                let db = shared.clone();
                let result = tokio::task::spawn_blocking(move || {
                    let mut db = db.lock().unwrap_or_else(PoisonError::into_inner);
                    execute(&mut db, effect)
                })
                .await;

                let message = match result {
                    Ok(Ok(message)) => message,
                    Ok(Err(err)) => {
                        tracing::error!(op, error = %err, "storage operation failed");
                        AppMessage::StorageFailed {
                            op,
                            error: err.to_string(),
                        }
                    }
                    Err(err) => {
                        tracing::error!(op, error = %err, "storage task panicked");
                        AppMessage::StorageFailed {
                            op,
                            error: err.to_string(),
                        }
                    }
                };
                // Writes still queued after the UI hangs up must land.
                if listening && reply.send(message).is_err() {
                    tracing::debug!(op, "reply channel closed; draining without replies");
                    listening = false;
                }
            }
        });

        Ok(Self {
            runtime,
            tx,
            handle,
            db,
        })
    }

    /// A submit-only handle. Every handle must be dropped before
    /// [`shutdown`](Self::shutdown) can finish the queue.
    pub fn handle(&self) -> StorageHandle {
        StorageHandle {
            tx: self.tx.clone(),
        }
    }

    /// Finishes queued effects, then closes the database.
    pub fn shutdown(self) -> Result<(), StoreError> {
        let Self {
            runtime,
            tx,
            handle,
            db,
        } = self;
        drop(tx);
        if let Err(err) = runtime.block_on(handle) {
            tracing::error!(error = %err, "storage worker ended abnormally");
        }
        drop(runtime);

        match Arc::try_unwrap(db) {
            Ok(db) => db.into_inner().unwrap_or_else(PoisonError::into_inner).close(),
            Err(_) => Err(StoreError::WorkerStopped),
        }
    }
}

impl EffectRunner for StorageWorker {
    fn submit(&mut self, effect: Effect) {
        send(&self.tx, effect);
    }
}

#[derive(Clone)]
pub struct StorageHandle {
    tx: UnboundedSender<Effect>,
}

impl EffectRunner for StorageHandle {
    fn submit(&mut self, effect: Effect) {
        send(&self.tx, effect);
    }
}

fn send(tx: &UnboundedSender<Effect>, effect: Effect) {
    let op = effect.name();
    if tx.send(effect).is_err() {
        tracing::error!(op, error = %StoreError::WorkerStopped, "dropping storage request");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/storage/worker.rs"]
mod tests;
