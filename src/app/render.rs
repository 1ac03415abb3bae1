use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::focus::FocusTarget;
use super::modal::{ConfirmChoice, ModalOverlay, OverlayKind};
use super::purpose::ModalPurpose;
use super::App;
use crate::panes::contains;

const PROJECT_PANE_WIDTH: u16 = 25;

/// Where the panes sit for a given screen size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyAreas {
    pub projects: Rect,
    pub tasks: Rect,
    /// The visible detail panel, if any.
    pub detail: Option<(FocusTarget, Rect)>,
}

impl BodyAreas {
    /// Pane drawn at a cell.
    pub fn pane_at(&self, column: u16, row: u16) -> Option<FocusTarget> {
        if contains(self.projects, column, row) {
            return Some(FocusTarget::ProjectPane);
        }
        if contains(self.tasks, column, row) {
            return Some(FocusTarget::TaskPane);
        }
        self.detail
            .filter(|(_, area)| contains(*area, column, row))
            .map(|(target, _)| target)
    }
}

fn screen_rows(area: Rect) -> [Rect; 3] {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);
    [rows[0], rows[1], rows[2]]
}

pub fn body_areas(app: &App, screen: Rect) -> BodyAreas {
    let [_, body, _] = screen_rows(screen);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(PROJECT_PANE_WIDTH), Constraint::Min(10)])
        .split(body);

    let router = app.router();
    let detail = if router.task_detail_visible() {
        Some(FocusTarget::TaskDetailPane)
    } else if router.project_detail_visible() {
        Some(FocusTarget::ProjectDetailPane)
    } else {
        None
    };

    let Some(detail) = detail else {
        return BodyAreas {
            projects: columns[0],
            tasks: columns[1],
            detail: None,
        };
    };

    let direction = if app.layout().vertical {
        Direction::Vertical
    } else {
        Direction::Horizontal
    };
    let split = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);
    BodyAreas {
        projects: columns[0],
        tasks: split[0],
        detail: Some((detail, split[1])),
    }
}

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let [title, _, status] = screen_rows(area);

    render_title(frame, title);
    render_body(app, frame, body_areas(app, area));
    render_status(app, frame, status);

    for overlay in app.modals().overlays() {
        render_overlay(overlay, frame, area);
    }
}

fn render_title(frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            " Geek-life ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  p projects  t tasks  ctrl+c quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_body(app: &App, frame: &mut Frame, areas: BodyAreas) {
    let focus = app.focus();
    let panes = app.panes();
    panes
        .projects
        .render(frame, areas.projects, focus == FocusTarget::ProjectPane);
    panes
        .tasks
        .render(frame, areas.tasks, focus == FocusTarget::TaskPane);
    match areas.detail {
        Some((FocusTarget::TaskDetailPane, area)) => panes.task_detail.render(
            frame,
            area,
            focus == FocusTarget::TaskDetailPane,
        ),
        Some((_, area)) => panes.project_detail.render(
            frame,
            area,
            focus == FocusTarget::ProjectDetailPane,
        ),
        None => {}
    }
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let line = match app.status() {
        Some(message) => Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(Span::styled(
            format!(" {}", focus_label(app.focus())),
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn focus_label(focus: FocusTarget) -> &'static str {
    match focus {
        FocusTarget::ProjectPane => "Projects",
        FocusTarget::TaskPane => "Tasks",
        FocusTarget::TaskDetailPane => "Task detail",
        FocusTarget::ProjectDetailPane => "Project detail",
        FocusTarget::ModalOverlay => "Dialog",
    }
}

pub(super) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

fn render_overlay(overlay: &ModalOverlay<ModalPurpose>, frame: &mut Frame, area: Rect) {
    let dialog_area = centered_rect(50, 6, area);
    if dialog_area.width < 20 || dialog_area.height < 5 {
        return;
    }
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightGreen));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let muted = Style::default().fg(Color::DarkGray);
    let title_style = Style::default().add_modifier(Modifier::BOLD);

    match overlay.kind() {
        OverlayKind::Confirmation { selected } => {
            let button = |label: &'static str, choice: ConfirmChoice| {
                if *selected == choice {
                    Span::styled(
                        label,
                        Style::default().fg(Color::Black).bg(Color::LightGreen),
                    )
                } else {
                    Span::raw(label)
                }
            };
            let lines = vec![
                Line::from(Span::styled(overlay.prompt(), title_style)),
                Line::raw(""),
                Line::from(vec![
                    button(" Yes ", ConfirmChoice::Affirmative),
                    Span::raw("  "),
                    button(" No ", ConfirmChoice::Negative),
                ]),
            ];
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
        }
        OverlayKind::TextInput { value, cursor } => {
            let prefix = "> ";
            let avail = (inner.width as usize).saturating_sub(prefix.width() + 1);
            let start = scroll_start(value, *cursor, avail);
            let visible = visible_slice(&value[start..], avail);

            let lines = vec![
                Line::from(Span::styled(overlay.prompt(), title_style)),
                Line::from(vec![Span::raw(prefix), Span::raw(visible)]),
                Line::raw(""),
                Line::from(vec![
                    Span::styled("[Enter]", Style::default().fg(Color::LightGreen)),
                    Span::raw(" Save  "),
                    Span::styled("[Esc]", muted),
                    Span::raw(" Cancel"),
                ]),
            ];
            frame.render_widget(Paragraph::new(lines), inner);

            let column = value[start..*cursor].width() + prefix.width();
            frame.set_cursor_position((inner.x + column as u16, inner.y + 1));
        }
    }
}

/// First byte to draw so the cursor stays within `avail` columns.
fn scroll_start(value: &str, cursor: usize, avail: usize) -> usize {
    let cursor = cursor.min(value.len());
    let mut start = 0;
    let mut width = value[..cursor].width();
    for (idx, ch) in value[..cursor].char_indices() {
        if width <= avail {
            break;
        }
        width -= ch.width().unwrap_or(0);
        start = idx + ch.len_utf8();
    }
    start
}

fn visible_slice(value: &str, avail: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in value.char_indices() {
        used += ch.width().unwrap_or(0);
        if used > avail {
            return &value[..idx];
        }
    }
    value
}

#[cfg(test)]
#[path = "../../tests/unit/app/render.rs"]
mod tests;
