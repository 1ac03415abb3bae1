use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use super::{pane_block, render_placeholder, Pane, PaneContext, PaneRequest};
use crate::app::focus::FocusTarget;
use crate::app::purpose::ModalPurpose;
use crate::core::event::{plain_char, KeyCode, KeyEvent};
use crate::models::Task;
use crate::runtime::Effect;

#[derive(Debug, Default)]
pub struct TaskDetailPane {
    task: Option<Task>,
}

impl TaskDetailPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, task: Task) {
        self.task = Some(task);
    }

    pub fn clear(&mut self) {
        self.task = None;
    }

    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    /// Picks up a newer copy of the shown task, if `tasks` has one.
    pub fn refresh(&mut self, tasks: &[Task]) {
        let Some(current) = self.task.as_mut() else {
            return;
        };
        if let Some(fresh) = tasks.iter().find(|t| t.id == current.id) {
            *current = fresh.clone();
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let block = pane_block(" Task ", focused);
        let Some(task) = self.task.as_ref() else {
            render_placeholder(frame, area, block, "No task selected");
            return;
        };

        let status = if task.completed {
            Span::styled("Completed", Style::default().fg(Color::Green))
        } else {
            Span::styled("Pending", Style::default().fg(Color::Yellow))
        };
        let lines = vec![
            Line::from(Span::styled(
                task.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![Span::raw("Status: "), status]),
            Line::raw(""),
            Line::from(Span::styled(
                "space toggle  r rename  d delete  esc back",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

impl Pane for TaskDetailPane {
    fn target(&self) -> FocusTarget {
        FocusTarget::TaskDetailPane
    }

    fn handle_shortcut(&mut self, event: KeyEvent, cx: &mut PaneContext<'_>) -> Option<KeyEvent> {
        if let (Some('h'), _) | (None, KeyCode::Esc) | (None, KeyCode::Left) =
            (plain_char(&event), event.code)
        {
            cx.request(PaneRequest::ShowTaskDetail(false));
            cx.request(PaneRequest::Focus(FocusTarget::TaskPane));
            return None;
        }

        let Some(task) = self.task.as_ref() else {
            return Some(event);
        };

        match plain_char(&event) {
            Some('r') => {
                cx.modals.input_popup_with(
                    "Rename Task",
                    task.title.clone(),
                    ModalPurpose::RenameTask { task: task.id },
                );
                None
            }
            Some(' ') => {
                cx.effect(Effect::SetTaskCompleted {
                    task: task.id,
                    completed: !task.completed,
                });
                None
            }
            Some('d') => {
                cx.modals.ask_yes_no(
                    format!("Delete task \"{}\"?", task.title),
                    ModalPurpose::DeleteTask { task: task.id },
                );
                None
            }
            _ => Some(event),
        }
    }
}
