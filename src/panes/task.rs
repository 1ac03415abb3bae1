use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState};
use ratatui::Frame;

use super::{
    highlight_style, list_row_at, move_selection, pane_block, render_placeholder, Pane, PaneContext,
    PaneRequest,
};
use crate::app::focus::FocusTarget;
use crate::app::purpose::ModalPurpose;
use crate::core::event::{plain_char, KeyCode, KeyEvent};
use crate::models::{Task, TaskId, TaskListSource};
use crate::runtime::Effect;

#[derive(Debug, Default)]
pub struct TaskPane {
    source: Option<TaskListSource>,
    title: String,
    tasks: Vec<Task>,
    selected: usize,
}

impl TaskPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches to another list. Tasks arrive later through
    /// [`set_tasks`](Self::set_tasks).
    pub fn open_list(&mut self, source: TaskListSource, title: impl Into<String>) {
        if self.source != Some(source) {
            self.tasks.clear();
            self.selected = 0;
        }
        self.source = Some(source);
        self.title = title.into();
    }

    pub fn close_list(&mut self) {
        *self = Self::default();
    }

    /// Accepts loaded tasks; results for a list that is no longer shown are
    /// dropped.
    pub fn set_tasks(&mut self, source: TaskListSource, tasks: Vec<Task>) -> bool {
        if self.source != Some(source) {
            return false;
        }
        let previous = self.selected_task().map(|t| t.id);
        self.tasks = tasks;
        self.selected = previous
            .and_then(|id| self.tasks.iter().position(|t| t.id == id))
            .unwrap_or_else(|| self.selected.min(self.tasks.len().saturating_sub(1)));
        true
    }

    pub fn source(&self) -> Option<TaskListSource> {
        self.source
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, index: usize) {
        if index < self.tasks.len() {
            self.selected = index;
        }
    }

    pub fn row_at(&self, area: Rect, column: u16, row: u16) -> Option<usize> {
        list_row_at(area, column, row, self.selected, self.tasks.len())
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.selected)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let title = if self.title.is_empty() {
            " Tasks ".to_string()
        } else {
            format!(" Tasks: {} ", self.title)
        };
        let block = pane_block(&title, focused);

        if self.source.is_none() {
            render_placeholder(frame, area, block, "Select a project to see its tasks");
            return;
        }
        if self.tasks.is_empty() {
            let hint = match self.source {
                Some(TaskListSource::Project(_)) => "No tasks yet. Press n to add one",
                _ => "Nothing here",
            };
            render_placeholder(frame, area, block, hint);
            return;
        }

        let items: Vec<ListItem> = self
            .tasks
            .iter()
            .map(|task| {
                if task.completed {
                    ListItem::new(Line::from(Span::styled(
                        format!("[x] {}", task.title),
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::CROSSED_OUT),
                    )))
                } else {
                    ListItem::new(format!("[ ] {}", task.title))
                }
            })
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(highlight_style());
        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

impl Pane for TaskPane {
    fn target(&self) -> FocusTarget {
        FocusTarget::TaskPane
    }

    fn handle_shortcut(&mut self, event: KeyEvent, cx: &mut PaneContext<'_>) -> Option<KeyEvent> {
        if cx.bindings.up.matches(&event) {
            self.selected = move_selection(self.selected, self.tasks.len(), -1);
            return None;
        }
        if cx.bindings.down.matches(&event) {
            self.selected = move_selection(self.selected, self.tasks.len(), 1);
            return None;
        }

        match (plain_char(&event), event.code) {
            (Some('n'), _) => {
                match self.source {
                    Some(TaskListSource::Project(project)) => {
                        cx.modals
                            .input_popup("New Task", ModalPurpose::NewTask { project });
                    }
                    _ => cx.request(PaneRequest::Notify(
                        "Pick a project to add tasks to".to_string(),
                    )),
                }
                None
            }
            (Some(' '), _) => {
                if let Some(task) = self.selected_task() {
                    cx.effect(Effect::SetTaskCompleted {
                        task: task.id,
                        completed: !task.completed,
                    });
                }
                None
            }
            (Some('l'), _) | (None, KeyCode::Enter) | (None, KeyCode::Right) => {
                if let Some(task) = self.selected_task() {
                    cx.request(PaneRequest::OpenTask(task.clone()));
                    cx.request(PaneRequest::ShowTaskDetail(true));
                    cx.request(PaneRequest::Focus(FocusTarget::TaskDetailPane));
                }
                None
            }
            (Some('h'), _) | (None, KeyCode::Esc) | (None, KeyCode::Left) => {
                cx.request(PaneRequest::Focus(FocusTarget::ProjectPane));
                None
            }
            _ => Some(event),
        }
    }
}
