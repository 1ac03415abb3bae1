use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use super::{pane_block, render_placeholder, Pane, PaneContext};
use crate::app::focus::FocusTarget;
use crate::app::purpose::ModalPurpose;
use crate::core::event::{plain_char, KeyEvent};
use crate::models::{Project, Task};

#[derive(Debug, Default)]
pub struct ProjectDetailPane {
    project: Option<Project>,
    total: usize,
    completed: usize,
}

impl ProjectDetailPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, project: Project) {
        if self.project.as_ref().map(|p| p.id) != Some(project.id) {
            self.total = 0;
            self.completed = 0;
        }
        self.project = Some(project);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn set_stats(&mut self, tasks: &[Task]) {
        self.total = tasks.len();
        self.completed = tasks.iter().filter(|t| t.completed).count();
    }

    pub fn stats(&self) -> (usize, usize) {
        (self.total, self.completed)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let block = pane_block(" Project ", focused);
        let Some(project) = self.project.as_ref() else {
            render_placeholder(frame, area, block, "No project selected");
            return;
        };

        let lines = vec![
            Line::from(Span::styled(
                project.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::raw(format!(
                "{} tasks, {} completed",
                self.total, self.completed
            )),
            Line::raw(""),
            Line::from(Span::styled(
                "D delete project  C clear completed",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            area,
        );
    }
}

impl Pane for ProjectDetailPane {
    fn target(&self) -> FocusTarget {
        FocusTarget::ProjectDetailPane
    }

    fn handle_shortcut(&mut self, event: KeyEvent, cx: &mut PaneContext<'_>) -> Option<KeyEvent> {
        let Some(project) = self.project.as_ref() else {
            return Some(event);
        };
        match plain_char(&event) {
            Some('D') => {
                cx.modals.ask_yes_no(
                    format!("Delete project \"{}\" and all its tasks?", project.title),
                    ModalPurpose::DeleteProject {
                        project: project.id,
                    },
                );
                None
            }
            Some('C') => {
                cx.modals.ask_yes_no(
                    format!("Clear completed tasks of \"{}\"?", project.title),
                    ModalPurpose::ClearCompleted {
                        project: project.id,
                    },
                );
                None
            }
            _ => Some(event),
        }
    }
}
