//! Application state: router, overlays, panes and the bridge to storage.

pub mod focus;
pub mod modal;
pub mod purpose;
pub mod render;
pub mod runner;

use ratatui::layout::Rect;

use crate::config::Settings;
use crate::core::event::{
    is_ctrl_c, is_press, InputEvent, KeyEvent, MouseButton, MouseEvent, MouseEventKind,
};
use crate::keymap::KeyBindings;
use crate::models::TaskListSource;
use crate::panes::{PaneRequest, Panes};
use crate::runtime::{AppMessage, Effect, EffectRunner};

use focus::{Dispatch, FocusRouter, FocusTarget};
use modal::{Capture, Completion, ModalController};
use purpose::ModalPurpose;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutOptions {
    /// Stack the task list above the detail panel instead of beside it.
    pub vertical: bool,
    pub dynamic: bool,
}

pub struct App {
    router: FocusRouter,
    modals: ModalController<ModalPurpose>,
    panes: Panes,
    bindings: KeyBindings,
    layout: LayoutOptions,
    runner: Box<dyn EffectRunner>,
    /// Screen size of the last frame, for mouse hit testing.
    viewport: Rect,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(settings: &Settings, runner: Box<dyn EffectRunner>) -> Self {
        let layout = LayoutOptions {
            vertical: settings.vertical,
            dynamic: settings.dynamic,
        };
        let mut app = Self {
            router: FocusRouter::new(),
            modals: ModalController::new(),
            panes: Panes::new(layout.dynamic),
            bindings: KeyBindings::from_settings(settings),
            layout,
            runner,
            viewport: Rect::default(),
            status: None,
            should_quit: false,
        };
        app.runner.submit(Effect::LoadProjects);
        app
    }

    pub fn router(&self) -> &FocusRouter {
        &self.router
    }

    pub fn modals(&self) -> &ModalController<ModalPurpose> {
        &self.modals
    }

    pub fn panes(&self) -> &Panes {
        &self.panes
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn layout(&self) -> LayoutOptions {
        self.layout
    }

    pub fn focus(&self) -> FocusTarget {
        self.router.focus().current()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key(key) if is_press(&key) => self.handle_key(key),
            InputEvent::Mouse(mouse) => self.handle_mouse(mouse),
            InputEvent::Resize(width, height) => self.viewport = Rect::new(0, 0, width, height),
            InputEvent::Paste(text) => {
                if !self.modals.paste(&text) {
                    tracing::trace!("paste outside text input ignored");
                }
            }
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if is_ctrl_c(&key) {
            self.should_quit = true;
            return;
        }
        self.status = None;

        let capturing = self.modals.is_open();
        let mut effects = Vec::new();
        let mut requests = Vec::new();
        let unconsumed = self.router.route(
            key,
            Dispatch {
                panes: &mut self.panes,
                modals: &mut self.modals,
                bindings: &self.bindings,
                effects: &mut effects,
                requests: &mut requests,
            },
        );

        if let Some(key) = unconsumed {
            if capturing {
                self.capture_overlay_key(key, &mut effects, &mut requests);
            } else {
                tracing::trace!(code = ?key.code, "key not handled");
            }
        }

        self.apply_requests(requests);
        self.run_effects(effects);
    }

    /// A left click focuses the pane under the pointer and selects the list
    /// row it hit. Overlays own the screen, so clicks are dropped while one
    /// is open.
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if self.modals.is_open() {
            tracing::trace!("click ignored under an overlay");
            return;
        }

        let areas = render::body_areas(self, self.viewport);
        let Some(target) = areas.pane_at(event.column, event.row) else {
            return;
        };
        match target {
            FocusTarget::ProjectPane => {
                if let Some(index) =
                    self.panes
                        .projects
                        .row_at(areas.projects, event.column, event.row)
                {
                    self.panes.projects.select(index);
                }
            }
            FocusTarget::TaskPane => {
                if let Some(index) = self.panes.tasks.row_at(areas.tasks, event.column, event.row)
                {
                    self.panes.tasks.select(index);
                }
            }
            _ => {}
        }
        self.status = None;
        self.router.apply(&PaneRequest::Focus(target));
    }

    fn capture_overlay_key(
        &mut self,
        key: KeyEvent,
        effects: &mut Vec<Effect>,
        requests: &mut Vec<PaneRequest>,
    ) {
        match self.modals.handle_key(key, self.router.focus_mut()) {
            Capture::Closed(Some(completion)) => self.complete(completion, effects, requests),
            Capture::Closed(None) | Capture::Consumed => {}
            Capture::Passed(_) => {}
        }
    }

    /// Acts on an accepted overlay. Runs after focus was restored, so any
    /// overlay opened from here stacks on the restored pane.
    fn complete(
        &mut self,
        completion: Completion<ModalPurpose>,
        effects: &mut Vec<Effect>,
        requests: &mut Vec<PaneRequest>,
    ) {
        let input = completion.input.as_deref().map(str::trim).unwrap_or("");
        match completion.purpose {
            ModalPurpose::NewProject => {
                if input.is_empty() {
                    self.status = Some("Project name required".to_string());
                    return;
                }
                effects.push(Effect::CreateProject {
                    title: input.to_string(),
                });
            }
            ModalPurpose::NewTask { project } => {
                if input.is_empty() {
                    self.status = Some("Task title required".to_string());
                    return;
                }
                effects.push(Effect::CreateTask {
                    project,
                    title: input.to_string(),
                });
            }
            ModalPurpose::RenameTask { task } => {
                if input.is_empty() {
                    self.status = Some("Task title required".to_string());
                    return;
                }
                effects.push(Effect::RenameTask {
                    task,
                    title: input.to_string(),
                });
            }
            ModalPurpose::DeleteTask { task } => {
                effects.push(Effect::DeleteTask(task));
                self.panes.task_detail.clear();
                requests.push(PaneRequest::ShowTaskDetail(false));
                requests.push(PaneRequest::Focus(FocusTarget::TaskPane));
            }
            ModalPurpose::DeleteProject { project } => {
                effects.push(Effect::DeleteProject(project));
                if self.panes.tasks.source() == Some(TaskListSource::Project(project)) {
                    self.panes.tasks.close_list();
                }
                self.panes.project_detail.clear();
                self.panes.task_detail.clear();
                requests.push(PaneRequest::ShowProjectDetail(false));
                requests.push(PaneRequest::ShowTaskDetail(false));
                requests.push(PaneRequest::Focus(FocusTarget::ProjectPane));
            }
            ModalPurpose::ClearCompleted { project } => {
                effects.push(Effect::ClearCompleted(project));
            }
        }
    }

    fn apply_requests(&mut self, requests: Vec<PaneRequest>) {
        let mut loads = Vec::new();
        for request in requests {
            if self.router.apply(&request) {
                continue;
            }
            match request {
                PaneRequest::OpenList { source, title } => {
                    self.panes.tasks.open_list(source, title);
                    match source
                        .project()
                        .and_then(|id| self.panes.projects.project(id).cloned())
                    {
                        Some(project) => self.panes.project_detail.show(project),
                        None => self.panes.project_detail.clear(),
                    }
                    loads.push(Effect::LoadTasks(source));
                }
                PaneRequest::OpenTask(task) => self.panes.task_detail.show(task),
                PaneRequest::Notify(message) => self.status = Some(message),
                PaneRequest::Focus(_)
                | PaneRequest::ShowProjectDetail(_)
                | PaneRequest::ShowTaskDetail(_) => {}
            }
        }
        for effect in loads {
            self.runner.submit(effect);
        }
    }

    /// Submits effects in order; after any write, reloads what is on screen.
    fn run_effects(&mut self, effects: Vec<Effect>) {
        let reload = effects.iter().any(Effect::is_mutation);
        for effect in effects {
            tracing::debug!(op = effect.name(), "submitting storage request");
            self.runner.submit(effect);
        }
        if reload {
            self.runner.submit(Effect::LoadProjects);
            if let Some(source) = self.panes.tasks.source() {
                self.runner.submit(Effect::LoadTasks(source));
            }
        }
    }

    pub fn on_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::ProjectsLoaded(projects) => {
                if let Some(shown) = self.panes.project_detail.project().map(|p| p.id) {
                    match projects.iter().find(|p| p.id == shown) {
                        Some(project) => self.panes.project_detail.show(project.clone()),
                        None => self.panes.project_detail.clear(),
                    }
                }
                self.panes.projects.set_projects(projects);
            }
            AppMessage::TasksLoaded { source, tasks } => {
                self.panes.task_detail.refresh(&tasks);
                if source.project().is_some()
                    && source.project() == self.panes.project_detail.project().map(|p| p.id)
                {
                    self.panes.project_detail.set_stats(&tasks);
                }
                if !self.panes.tasks.set_tasks(source, tasks) {
                    tracing::trace!(?source, "dropping tasks for a list no longer shown");
                }
            }
            AppMessage::Saved { op } => tracing::debug!(op, "saved"),
            AppMessage::StorageFailed { op, error } => {
                self.status = Some(format!("{op} failed: {error}"));
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/app.rs"]
mod tests;
