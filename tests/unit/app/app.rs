use super::*;
use crate::core::event::{char_key, key, left_click, KeyCode, KeyEventKind, KeyModifiers};
use crate::models::{Project, Task};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Default)]
struct Recorder {
    effects: Rc<RefCell<Vec<Effect>>>,
}

impl Recorder {
    fn take(&self) -> Vec<Effect> {
        std::mem::take(&mut *self.effects.borrow_mut())
    }
}

impl EffectRunner for Recorder {
    fn submit(&mut self, effect: Effect) {
        self.effects.borrow_mut().push(effect);
    }
}

fn app_with(settings: Settings) -> (App, Recorder) {
    let recorder = Recorder::default();
    let app = App::new(&settings, Box::new(recorder.clone()));
    (app, recorder)
}

fn loaded_app() -> (App, Recorder) {
    let (mut app, recorder) = app_with(Settings::default());
    app.on_message(AppMessage::ProjectsLoaded(vec![
        Project {
            id: 1,
            title: "Home".into(),
        },
        Project {
            id: 2,
            title: "Work".into(),
        },
    ]));
    recorder.take();
    (app, recorder)
}

fn task(id: u64, project_id: u64, title: &str, completed: bool) -> Task {
    Task {
        id,
        project_id,
        title: title.into(),
        completed,
    }
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        app.handle_key(char_key(ch));
    }
}

/// Opens project 1 and loads two tasks into it.
fn open_home(app: &mut App, recorder: &Recorder) {
    app.handle_key(key(KeyCode::Enter));
    recorder.take();
    app.on_message(AppMessage::TasksLoaded {
        source: TaskListSource::Project(1),
        tasks: vec![task(10, 1, "milk", false), task(11, 1, "eggs", true)],
    });
}

#[test]
fn startup_loads_projects() {
    let (app, recorder) = app_with(Settings::default());
    assert_eq!(recorder.take(), vec![Effect::LoadProjects]);
    assert_eq!(app.focus(), FocusTarget::ProjectPane);
    assert!(!app.should_quit());
}

#[test]
fn layout_follows_settings() {
    let settings = Settings {
        vertical: true,
        dynamic: true,
        ..Settings::default()
    };
    let (app, _) = app_with(settings);
    assert!(app.layout().vertical);
    assert_eq!(app.panes().projects.entries().len(), 2);
}

#[test]
fn ctrl_c_quits_even_inside_an_overlay() {
    let (mut app, _) = loaded_app();
    app.handle_key(char_key('n'));
    assert!(app.modals().is_open());

    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit());
}

#[test]
fn release_events_are_ignored() {
    let (mut app, recorder) = loaded_app();
    let mut release = key(KeyCode::Enter);
    release.kind = KeyEventKind::Release;

    app.handle_input(InputEvent::Key(release));
    assert!(recorder.take().is_empty());
    assert_eq!(app.focus(), FocusTarget::ProjectPane);
}

#[test]
fn selecting_a_project_loads_its_tasks() {
    let (mut app, recorder) = loaded_app();

    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(recorder.take(), vec![Effect::LoadTasks(TaskListSource::Project(2))]);
    assert_eq!(app.focus(), FocusTarget::TaskPane);
    assert!(app.router().project_detail_visible());
    assert_eq!(app.panes().tasks.title(), "Work");
    assert_eq!(app.panes().project_detail.project().map(|p| p.id), Some(2));
}

#[test]
fn loaded_tasks_update_list_and_stats() {
    let (mut app, recorder) = loaded_app();
    open_home(&mut app, &recorder);

    assert_eq!(app.panes().tasks.tasks().len(), 2);
    assert_eq!(app.panes().project_detail.stats(), (2, 1));

    // A late reply for a list no longer shown changes nothing.
    app.on_message(AppMessage::TasksLoaded {
        source: TaskListSource::Project(2),
        tasks: vec![],
    });
    assert_eq!(app.panes().tasks.tasks().len(), 2);
}

#[test]
fn new_project_commit_creates_and_reloads() {
    let (mut app, recorder) = loaded_app();

    app.handle_key(char_key('n'));
    assert_eq!(app.focus(), FocusTarget::ModalOverlay);
    // Global shortcuts are text while the input is open.
    type_text(&mut app, "  pets  ");
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.focus(), FocusTarget::ProjectPane);
    assert_eq!(
        recorder.take(),
        vec![
            Effect::CreateProject {
                title: "pets".into()
            },
            Effect::LoadProjects,
        ]
    );
}

#[test]
fn blank_titles_are_rejected() {
    let (mut app, recorder) = loaded_app();

    app.handle_key(char_key('n'));
    type_text(&mut app, "   ");
    app.handle_key(key(KeyCode::Enter));

    assert!(recorder.take().is_empty());
    assert_eq!(app.status(), Some("Project name required"));
    assert_eq!(app.focus(), FocusTarget::ProjectPane);
}

#[test]
fn cancelled_input_does_nothing() {
    let (mut app, recorder) = loaded_app();

    app.handle_key(char_key('n'));
    type_text(&mut app, "x");
    app.handle_key(key(KeyCode::Esc));

    assert!(recorder.take().is_empty());
    assert!(!app.modals().is_open());
    assert_eq!(app.focus(), FocusTarget::ProjectPane);
}

#[test]
fn paste_goes_into_open_input() {
    let (mut app, recorder) = loaded_app();
    open_home(&mut app, &recorder);

    app.handle_key(char_key('n'));
    app.handle_input(InputEvent::Paste("buy bread".into()));
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(
        recorder.take(),
        vec![
            Effect::CreateTask {
                project: 1,
                title: "buy bread".into(),
            },
            Effect::LoadProjects,
            Effect::LoadTasks(TaskListSource::Project(1)),
        ]
    );
    assert_eq!(app.focus(), FocusTarget::TaskPane);
}

#[test]
fn toggling_a_task_reloads_the_list() {
    let (mut app, recorder) = loaded_app();
    open_home(&mut app, &recorder);

    app.handle_key(char_key(' '));
    assert_eq!(
        recorder.take(),
        vec![
            Effect::SetTaskCompleted {
                task: 10,
                completed: true,
            },
            Effect::LoadProjects,
            Effect::LoadTasks(TaskListSource::Project(1)),
        ]
    );
}

#[test]
fn deleting_a_task_returns_to_the_list() {
    let (mut app, recorder) = loaded_app();
    open_home(&mut app, &recorder);

    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.focus(), FocusTarget::TaskDetailPane);
    assert!(app.router().task_detail_visible());

    app.handle_key(char_key('d'));
    assert_eq!(app.focus(), FocusTarget::ModalOverlay);
    app.handle_key(char_key('y'));

    assert_eq!(app.focus(), FocusTarget::TaskPane);
    assert!(!app.router().task_detail_visible());
    assert!(app.panes().task_detail.task().is_none());
    assert_eq!(recorder.take()[0], Effect::DeleteTask(10));
}

#[test]
fn declining_keeps_everything() {
    let (mut app, recorder) = loaded_app();
    open_home(&mut app, &recorder);
    app.handle_key(key(KeyCode::Enter));

    app.handle_key(char_key('d'));
    app.handle_key(char_key('n'));

    assert_eq!(app.focus(), FocusTarget::TaskDetailPane);
    assert!(app.panes().task_detail.task().is_some());
    assert!(recorder.take().is_empty());
}

#[test]
fn rename_prefills_and_submits() {
    let (mut app, recorder) = loaded_app();
    open_home(&mut app, &recorder);
    app.handle_key(key(KeyCode::Enter));

    app.handle_key(char_key('r'));
    type_text(&mut app, " 2l");
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(
        recorder.take()[0],
        Effect::RenameTask {
            task: 10,
            title: "milk 2l".into(),
        }
    );
    assert_eq!(app.focus(), FocusTarget::TaskDetailPane);
}

#[test]
fn project_detail_handles_keys_the_task_pane_skips() {
    let (mut app, recorder) = loaded_app();
    open_home(&mut app, &recorder);

    app.handle_key(char_key('C'));
    assert_eq!(app.focus(), FocusTarget::ModalOverlay);
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(recorder.take()[0], Effect::ClearCompleted(1));
    assert_eq!(app.focus(), FocusTarget::TaskPane);
}

#[test]
fn deleting_a_project_resets_the_view() {
    let (mut app, recorder) = loaded_app();
    open_home(&mut app, &recorder);

    app.handle_key(char_key('D'));
    app.handle_key(char_key('y'));

    assert_eq!(recorder.take(), vec![Effect::DeleteProject(1), Effect::LoadProjects]);
    assert_eq!(app.focus(), FocusTarget::ProjectPane);
    assert!(!app.router().project_detail_visible());
    assert!(app.panes().tasks.source().is_none());
    assert!(app.panes().project_detail.project().is_none());
}

#[test]
fn global_shortcut_leaves_detail() {
    let (mut app, recorder) = loaded_app();
    open_home(&mut app, &recorder);
    app.handle_key(key(KeyCode::Enter));

    app.handle_key(char_key('P'));
    assert_eq!(app.focus(), FocusTarget::ProjectPane);
    assert!(!app.router().task_detail_visible());
    assert!(!app.router().project_detail_visible());
}

#[test]
fn storage_failures_show_in_status() {
    let (mut app, _) = loaded_app();
    app.on_message(AppMessage::StorageFailed {
        op: "delete_task",
        error: "task 4 not found".into(),
    });
    assert_eq!(app.status(), Some("delete_task failed: task 4 not found"));

    app.handle_key(char_key('z'));
    assert_eq!(app.status(), None);
}

#[test]
fn project_reload_drops_deleted_detail() {
    let (mut app, recorder) = loaded_app();
    open_home(&mut app, &recorder);

    app.on_message(AppMessage::ProjectsLoaded(vec![Project {
        id: 2,
        title: "Work".into(),
    }]));
    assert!(app.panes().project_detail.project().is_none());
}

#[test]
fn clicks_focus_panes_and_select_rows() {
    let (mut app, recorder) = loaded_app();
    app.set_viewport(Rect::new(0, 0, 80, 24));
    open_home(&mut app, &recorder);
    assert_eq!(app.focus(), FocusTarget::TaskPane);

    // Title row, then the project pane border; "Work" is the second entry.
    app.handle_input(InputEvent::Mouse(left_click(3, 3)));
    assert_eq!(app.focus(), FocusTarget::ProjectPane);
    assert_eq!(app.panes().projects.selected(), 1);

    app.handle_input(InputEvent::Mouse(left_click(30, 3)));
    assert_eq!(app.focus(), FocusTarget::TaskPane);
    assert_eq!(app.panes().tasks.selected_task().map(|t| t.id), Some(11));

    app.handle_input(InputEvent::Mouse(left_click(60, 5)));
    assert_eq!(app.focus(), FocusTarget::ProjectDetailPane);
    assert!(recorder.take().is_empty());
}

#[test]
fn clicks_are_ignored_while_an_overlay_is_open() {
    let (mut app, _) = loaded_app();
    app.set_viewport(Rect::new(0, 0, 80, 24));
    app.handle_key(char_key('n'));
    assert_eq!(app.focus(), FocusTarget::ModalOverlay);

    app.handle_input(InputEvent::Mouse(left_click(3, 3)));
    assert_eq!(app.focus(), FocusTarget::ModalOverlay);
    assert_eq!(app.panes().projects.selected(), 0);
    assert!(app.modals().is_open());

    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.focus(), FocusTarget::ProjectPane);
}

#[test]
fn only_left_presses_count() {
    let (mut app, _) = loaded_app();
    app.set_viewport(Rect::new(0, 0, 80, 24));
    let mut click = left_click(3, 3);
    click.kind = MouseEventKind::Up(MouseButton::Left);
    app.handle_input(InputEvent::Mouse(click));
    click.kind = MouseEventKind::Down(MouseButton::Right);
    app.handle_input(InputEvent::Mouse(click));
    assert_eq!(app.panes().projects.selected(), 0);

    // Off every pane: the title bar.
    app.handle_input(InputEvent::Mouse(left_click(40, 0)));
    assert_eq!(app.focus(), FocusTarget::ProjectPane);
}
