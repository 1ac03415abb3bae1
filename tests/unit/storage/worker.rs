use super::*;
use crate::models::Task;
use std::sync::mpsc;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn execute_loads_each_task_source() {
    let dir = tempdir().unwrap();
    let mut db = Database::open(dir.path().join("w.db")).unwrap();
    let project = db.create_project("A").unwrap();
    let done = db.create_task(project.id, "done").unwrap();
    db.create_task(project.id, "open").unwrap();
    db.set_task_completed(done.id, true).unwrap();

    let titles = |msg: AppMessage| -> Vec<String> {
        match msg {
            AppMessage::TasksLoaded { tasks, .. } => tasks.into_iter().map(|t: Task| t.title).collect(),
            other => panic!("unexpected {other:?}"),
        }
    };

    let all = execute(&mut db, Effect::LoadTasks(TaskListSource::Project(project.id))).unwrap();
    assert_eq!(titles(all), vec!["done", "open"]);
    let pending = execute(&mut db, Effect::LoadTasks(TaskListSource::Pending)).unwrap();
    assert_eq!(titles(pending), vec!["open"]);
    let completed = execute(&mut db, Effect::LoadTasks(TaskListSource::Completed)).unwrap();
    assert_eq!(titles(completed), vec!["done"]);
}

#[test]
fn execute_reports_mutations_as_saved() {
    let dir = tempdir().unwrap();
    let mut db = Database::open(dir.path().join("w.db")).unwrap();
    let msg = execute(
        &mut db,
        Effect::CreateProject {
            title: "Inbox".into(),
        },
    )
    .unwrap();
    assert_eq!(msg, AppMessage::Saved { op: "create_project" });
    assert!(execute(&mut db, Effect::DeleteTask(42)).is_err());
}

#[test]
fn worker_answers_in_submission_order_and_persists_on_shutdown() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("w.db");
    let db = Database::open(&path).unwrap();
    let (tx, rx) = mpsc::channel();
    let mut worker = StorageWorker::spawn(db, tx).unwrap();

    worker.submit(Effect::CreateProject {
        title: "First".into(),
    });
    worker.submit(Effect::CreateProject { title: "".into() });
    worker.submit(Effect::LoadProjects);

    let recv = || rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(recv(), AppMessage::Saved { op: "create_project" });
    assert!(matches!(
        recv(),
        AppMessage::StorageFailed {
            op: "create_project",
            ..
        }
    ));
    match recv() {
        AppMessage::ProjectsLoaded(projects) => {
            assert_eq!(projects.len(), 1);
            assert_eq!(projects[0].title, "First");
        }
        other => panic!("unexpected {other:?}"),
    }

    worker.shutdown().unwrap();
    let reopened = Database::open(&path).unwrap();
    assert_eq!(reopened.projects().len(), 1);
}

#[test]
fn handles_feed_the_same_queue() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("h.db");
    let (tx, rx) = mpsc::channel();
    let worker = StorageWorker::spawn(Database::open(&path).unwrap(), tx).unwrap();

    let mut handle = worker.handle();
    handle.submit(Effect::CreateProject {
        title: "Via handle".into(),
    });
    handle.submit(Effect::LoadProjects);
    drop(handle);

    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        AppMessage::Saved { op: "create_project" }
    );
    assert!(matches!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        AppMessage::ProjectsLoaded(projects) if projects.len() == 1
    ));
    worker.shutdown().unwrap();
}

#[test]
fn queued_writes_land_after_the_reply_channel_closes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("closed.db");
    let (tx, rx) = mpsc::channel();
    let mut worker = StorageWorker::spawn(Database::open(&path).unwrap(), tx).unwrap();
    drop(rx);

    for title in ["A", "B", "C"] {
        worker.submit(Effect::CreateProject {
            title: title.into(),
        });
    }
    worker.shutdown().unwrap();

    let reopened = Database::open(&path).unwrap();
    let titles: Vec<String> = reopened.projects().into_iter().map(|p| p.title).collect();
    assert_eq!(titles, vec!["A", "B", "C"]);
}
