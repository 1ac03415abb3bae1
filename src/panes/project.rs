use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState};
use ratatui::Frame;

use super::{
    highlight_style, list_row_at, move_selection, pane_block, Pane, PaneContext, PaneRequest,
};
use crate::app::focus::FocusTarget;
use crate::app::purpose::ModalPurpose;
use crate::core::event::{plain_char, KeyCode, KeyEvent};
use crate::models::{Project, TaskListSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEntry {
    Dynamic {
        source: TaskListSource,
        title: &'static str,
    },
    Project(Project),
}

impl ListEntry {
    pub fn title(&self) -> &str {
        match self {
            ListEntry::Dynamic { title, .. } => title,
            ListEntry::Project(project) => &project.title,
        }
    }

    pub fn source(&self) -> TaskListSource {
        match self {
            ListEntry::Dynamic { source, .. } => *source,
            ListEntry::Project(project) => TaskListSource::Project(project.id),
        }
    }
}

const DYNAMIC_LISTS: [ListEntry; 2] = [
    ListEntry::Dynamic {
        source: TaskListSource::Pending,
        title: "Pending",
    },
    ListEntry::Dynamic {
        source: TaskListSource::Completed,
        title: "Completed",
    },
];

#[derive(Debug)]
pub struct ProjectPane {
    dynamic: bool,
    entries: Vec<ListEntry>,
    selected: usize,
}

impl ProjectPane {
    pub fn new(dynamic: bool) -> Self {
        let mut pane = Self {
            dynamic,
            entries: Vec::new(),
            selected: 0,
        };
        pane.set_projects(Vec::new());
        pane
    }

    /// Replaces the project list, keeping the selection on the same entry
    /// when it still exists.
    pub fn set_projects(&mut self, projects: Vec<Project>) {
        let previous = self.selected_entry().map(ListEntry::source);
        self.entries.clear();
        if self.dynamic {
            self.entries.extend(DYNAMIC_LISTS.iter().cloned());
        }
        self.entries
            .extend(projects.into_iter().map(ListEntry::Project));

        self.selected = previous
            .and_then(|source| self.entries.iter().position(|e| e.source() == source))
            .unwrap_or_else(|| self.selected.min(self.entries.len().saturating_sub(1)));
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, index: usize) {
        if index < self.entries.len() {
            self.selected = index;
        }
    }

    /// Entry drawn at a cell when the pane occupies `area`.
    pub fn row_at(&self, area: Rect, column: u16, row: u16) -> Option<usize> {
        list_row_at(area, column, row, self.selected, self.entries.len())
    }

    pub fn selected_entry(&self) -> Option<&ListEntry> {
        self.entries.get(self.selected)
    }

    pub fn project(&self, id: u64) -> Option<&Project> {
        self.entries.iter().find_map(|entry| match entry {
            ListEntry::Project(project) if project.id == id => Some(project),
            _ => None,
        })
    }

    fn open_selected(&self, cx: &mut PaneContext<'_>) {
        let Some(entry) = self.selected_entry() else {
            cx.request(PaneRequest::Notify("Create a project with n".to_string()));
            return;
        };
        cx.request(PaneRequest::OpenList {
            source: entry.source(),
            title: entry.title().to_string(),
        });
        cx.request(PaneRequest::ShowProjectDetail(matches!(
            entry,
            ListEntry::Project(_)
        )));
        cx.request(PaneRequest::ShowTaskDetail(false));
        cx.request(PaneRequest::Focus(FocusTarget::TaskPane));
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| match entry {
                ListEntry::Dynamic { title, .. } => ListItem::new(Line::from(Span::styled(
                    format!("» {title}"),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::ITALIC),
                ))),
                ListEntry::Project(project) => ListItem::new(format!("- {}", project.title)),
            })
            .collect();

        let list = List::new(items)
            .block(pane_block(" Projects ", focused))
            .highlight_style(highlight_style());
        let mut state = ListState::default();
        if !self.entries.is_empty() {
            state.select(Some(self.selected));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }
}

impl Pane for ProjectPane {
    fn target(&self) -> FocusTarget {
        FocusTarget::ProjectPane
    }

    fn handle_shortcut(&mut self, event: KeyEvent, cx: &mut PaneContext<'_>) -> Option<KeyEvent> {
        if cx.bindings.up.matches(&event) {
            self.selected = move_selection(self.selected, self.entries.len(), -1);
            return None;
        }
        if cx.bindings.down.matches(&event) {
            self.selected = move_selection(self.selected, self.entries.len(), 1);
            return None;
        }

        match (plain_char(&event), event.code) {
            (Some('n'), _) => {
                cx.modals.input_popup("New Project", ModalPurpose::NewProject);
                None
            }
            (Some('l'), _) | (None, KeyCode::Enter) | (None, KeyCode::Right) => {
                self.open_selected(cx);
                None
            }
            _ => Some(event),
        }
    }
}
