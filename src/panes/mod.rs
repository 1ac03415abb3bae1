//! Focusable panes and the contract the router drives them through.
//!
//! A pane never moves focus itself. It consumes a key by returning `None`,
//! passes it on by returning `Some`, and asks for anything else through
//! [`PaneContext`]: overlays via the modal handle, storage work via effects,
//! focus and panel changes via requests.

mod project;
mod project_detail;
mod task;
mod task_detail;

pub use project::{ListEntry, ProjectPane};
pub use project_detail::ProjectDetailPane;
pub use task::TaskPane;
pub use task_detail::TaskDetailPane;

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::app::focus::{FocusState, FocusTarget};
use crate::app::modal::ModalHandle;
use crate::app::purpose::ModalPurpose;
use crate::core::event::KeyEvent;
use crate::keymap::KeyBindings;
use crate::models::{Task, TaskListSource};
use crate::runtime::Effect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneRequest {
    Focus(FocusTarget),
    ShowProjectDetail(bool),
    ShowTaskDetail(bool),
    /// Show the tasks of a list in the task pane.
    OpenList {
        source: TaskListSource,
        title: String,
    },
    /// Show one task in the task detail pane.
    OpenTask(Task),
    Notify(String),
}

pub struct PaneContext<'a> {
    pub bindings: &'a KeyBindings,
    pub modals: ModalHandle<'a, ModalPurpose>,
    pub effects: &'a mut Vec<Effect>,
    pub requests: &'a mut Vec<PaneRequest>,
}

impl PaneContext<'_> {
    pub fn effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn request(&mut self, request: PaneRequest) {
        self.requests.push(request);
    }
}

pub trait Pane {
    fn target(&self) -> FocusTarget;

    fn has_focus(&self, focus: &FocusState) -> bool {
        focus.is(self.target())
    }

    /// `None` when the event was consumed.
    fn handle_shortcut(&mut self, event: KeyEvent, cx: &mut PaneContext<'_>) -> Option<KeyEvent>;
}

/// Lookup from focus target to pane.
pub trait PaneSet {
    fn pane_mut(&mut self, target: FocusTarget) -> Option<&mut dyn Pane>;
}

pub struct Panes {
    pub projects: ProjectPane,
    pub tasks: TaskPane,
    pub task_detail: TaskDetailPane,
    pub project_detail: ProjectDetailPane,
}

impl Panes {
    pub fn new(dynamic: bool) -> Self {
        Self {
            projects: ProjectPane::new(dynamic),
            tasks: TaskPane::new(),
            task_detail: TaskDetailPane::new(),
            project_detail: ProjectDetailPane::new(),
        }
    }
}

impl PaneSet for Panes {
    fn pane_mut(&mut self, target: FocusTarget) -> Option<&mut dyn Pane> {
        match target {
            FocusTarget::ProjectPane => Some(&mut self.projects),
            FocusTarget::TaskPane => Some(&mut self.tasks),
            FocusTarget::TaskDetailPane => Some(&mut self.task_detail),
            FocusTarget::ProjectDetailPane => Some(&mut self.project_detail),
            FocusTarget::ModalOverlay => None,
        }
    }
}

pub(crate) fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::LightGreen)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

pub(crate) fn highlight_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightGreen)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn move_selection(selected: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = selected as isize + delta;
    next.clamp(0, len as isize - 1) as usize
}

/// Whether a cell falls inside `area`.
pub(crate) fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// Entry under a cell of a bordered one-line-per-entry list.
///
/// Lists are drawn from a fresh state each frame, so they scroll only as far
/// as needed to keep `selected` on screen.
pub(crate) fn list_row_at(
    area: Rect,
    column: u16,
    row: u16,
    selected: usize,
    len: usize,
) -> Option<usize> {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    if inner.height == 0 || !contains(inner, column, row) {
        return None;
    }
    let offset = selected.saturating_sub(inner.height as usize - 1);
    let index = offset + (row - inner.y) as usize;
    (index < len).then_some(index)
}

pub(crate) fn render_placeholder(frame: &mut Frame, area: Rect, block: Block<'_>, text: &str) {
    let paragraph = ratatui::widgets::Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
#[path = "../../tests/unit/panes/mod.rs"]
mod tests;
