//! Confirmation and text-input overlays.
//!
//! Opening an overlay saves the focused target on a stack and moves focus to
//! [`FocusTarget::ModalOverlay`]. While an overlay is open it captures every
//! key. Closing pops the stack and restores the saved target before the
//! completion is handed back, so a completion that opens another overlay
//! pushes the restored target and the stack stays balanced at any depth.

use unicode_width::UnicodeWidthStr;

use super::focus::{FocusState, FocusTarget};
use crate::core::event::{plain_char, KeyCode, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    Affirmative,
    Negative,
}

impl ConfirmChoice {
    fn toggled(self) -> Self {
        match self {
            ConfirmChoice::Affirmative => ConfirmChoice::Negative,
            ConfirmChoice::Negative => ConfirmChoice::Affirmative,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayKind {
    Confirmation { selected: ConfirmChoice },
    TextInput { value: String, cursor: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalOutcome {
    Affirmative,
    Negative,
    Commit(String),
    Cancel,
}

impl ModalOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ModalOutcome::Affirmative | ModalOutcome::Commit(_))
    }
}

#[derive(Debug, Clone)]
pub struct ModalOverlay<P> {
    kind: OverlayKind,
    prompt: String,
    purpose: P,
    suspended: FocusTarget,
}

impl<P> ModalOverlay<P> {
    pub fn kind(&self) -> &OverlayKind {
        &self.kind
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn purpose(&self) -> &P {
        &self.purpose
    }

    /// Focus target that was active when this overlay opened.
    pub fn suspended(&self) -> FocusTarget {
        self.suspended
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            OverlayKind::TextInput { value, .. } => Some(value),
            OverlayKind::Confirmation { .. } => None,
        }
    }

    /// Display column of the text cursor.
    pub fn cursor_column(&self) -> Option<usize> {
        match &self.kind {
            OverlayKind::TextInput { value, cursor } => Some(value[..*cursor].width()),
            OverlayKind::Confirmation { .. } => None,
        }
    }
}

/// An accepted overlay: a confirmed question, or committed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion<P> {
    pub purpose: P,
    pub input: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture<P> {
    /// No overlay was open; the event is returned untouched.
    Passed(KeyEvent),
    /// The overlay used the event and stays open.
    Consumed,
    /// The overlay closed and focus was restored. Carries a completion only
    /// for affirmative or committed outcomes.
    Closed(Option<Completion<P>>),
}

#[derive(Debug)]
pub struct ModalController<P> {
    stack: Vec<ModalOverlay<P>>,
}

impl<P> Default for ModalController<P> {
    fn default() -> Self {
        Self { stack: Vec::new() }
    }
}

impl<P> ModalController<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        !self.stack.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The overlay currently receiving input.
    pub fn active(&self) -> Option<&ModalOverlay<P>> {
        self.stack.last()
    }

    /// Overlays from the bottom of the stack to the top, in drawing order.
    pub fn overlays(&self) -> impl Iterator<Item = &ModalOverlay<P>> {
        self.stack.iter()
    }

    pub fn open_confirmation(
        &mut self,
        focus: &mut FocusState,
        prompt: impl Into<String>,
        purpose: P,
    ) {
        self.open(
            focus,
            OverlayKind::Confirmation {
                selected: ConfirmChoice::Affirmative,
            },
            prompt.into(),
            purpose,
        );
    }

    pub fn open_text_input(&mut self, focus: &mut FocusState, title: impl Into<String>, purpose: P) {
        self.open_text_input_with(focus, title, String::new(), purpose);
    }

    /// Text input with `initial` already typed and the cursor at its end.
    pub fn open_text_input_with(
        &mut self,
        focus: &mut FocusState,
        title: impl Into<String>,
        initial: impl Into<String>,
        purpose: P,
    ) {
        let value = initial.into();
        let cursor = value.len();
        self.open(
            focus,
            OverlayKind::TextInput { value, cursor },
            title.into(),
            purpose,
        );
    }

    fn open(&mut self, focus: &mut FocusState, kind: OverlayKind, prompt: String, purpose: P) {
        let suspended = focus.current();
        tracing::debug!(?suspended, depth = self.stack.len() + 1, "overlay opened");
        self.stack.push(ModalOverlay {
            kind,
            prompt,
            purpose,
            suspended,
        });
        focus.set(FocusTarget::ModalOverlay);
    }

    /// Feeds a key to the active overlay.
    pub fn handle_key(&mut self, event: KeyEvent, focus: &mut FocusState) -> Capture<P> {
        let Some(overlay) = self.stack.last_mut() else {
            return Capture::Passed(event);
        };

        let outcome = match &mut overlay.kind {
            OverlayKind::Confirmation { selected } => confirmation_key(selected, &event),
            OverlayKind::TextInput { value, cursor } => text_input_key(value, cursor, &event),
        };

        match outcome {
            Some(outcome) => Capture::Closed(self.close(focus, outcome)),
            None => Capture::Consumed,
        }
    }

    /// Inserts pasted text into an open text input.
    pub fn paste(&mut self, text: &str) -> bool {
        let Some(overlay) = self.stack.last_mut() else {
            return false;
        };
        let OverlayKind::TextInput { value, cursor } = &mut overlay.kind else {
            return false;
        };
        for ch in text.chars().filter(|c| !c.is_control()) {
            value.insert(*cursor, ch);
            *cursor += ch.len_utf8();
        }
        true
    }

    /// Closes the active overlay with `outcome`, restoring the focus target
    /// it suspended.
    pub fn close(&mut self, focus: &mut FocusState, outcome: ModalOutcome) -> Option<Completion<P>> {
        let overlay = self.stack.pop()?;
        focus.set(overlay.suspended);
        tracing::debug!(
            restored = ?overlay.suspended,
            accepted = outcome.is_accepted(),
            depth = self.stack.len(),
            "overlay closed"
        );
        match outcome {
            ModalOutcome::Affirmative => Some(Completion {
                purpose: overlay.purpose,
                input: None,
            }),
            ModalOutcome::Commit(text) => Some(Completion {
                purpose: overlay.purpose,
                input: Some(text),
            }),
            ModalOutcome::Negative | ModalOutcome::Cancel => None,
        }
    }
}

fn confirmation_key(selected: &mut ConfirmChoice, event: &KeyEvent) -> Option<ModalOutcome> {
    if let Some(ch) = plain_char(event) {
        return match ch.to_ascii_lowercase() {
            'y' => Some(ModalOutcome::Affirmative),
            'n' => Some(ModalOutcome::Negative),
            _ => None,
        };
    }
    match event.code {
        KeyCode::Esc => Some(ModalOutcome::Negative),
        KeyCode::Enter => Some(match selected {
            ConfirmChoice::Affirmative => ModalOutcome::Affirmative,
            ConfirmChoice::Negative => ModalOutcome::Negative,
        }),
        KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
            *selected = selected.toggled();
            None
        }
        _ => None,
    }
}

fn text_input_key(value: &mut String, cursor: &mut usize, event: &KeyEvent) -> Option<ModalOutcome> {
    if *cursor > value.len() {
        *cursor = value.len();
    }
    if let Some(ch) = plain_char(event) {
        value.insert(*cursor, ch);
        *cursor += ch.len_utf8();
        return None;
    }
    match event.code {
        KeyCode::Enter => return Some(ModalOutcome::Commit(value.clone())),
        KeyCode::Esc => return Some(ModalOutcome::Cancel),
        KeyCode::Backspace => {
            if let Some(prev) = prev_boundary(value, *cursor) {
                value.drain(prev..*cursor);
                *cursor = prev;
            }
        }
        KeyCode::Delete => {
            if let Some(next) = next_boundary(value, *cursor) {
                value.drain(*cursor..next);
            }
        }
        KeyCode::Left => {
            if let Some(prev) = prev_boundary(value, *cursor) {
                *cursor = prev;
            }
        }
        KeyCode::Right => {
            if let Some(next) = next_boundary(value, *cursor) {
                *cursor = next;
            }
        }
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = value.len(),
        _ => {}
    }
    None
}

fn prev_boundary(value: &str, cursor: usize) -> Option<usize> {
    value[..cursor].char_indices().last().map(|(i, _)| i)
}

fn next_boundary(value: &str, cursor: usize) -> Option<usize> {
    value[cursor..].chars().next().map(|ch| cursor + ch.len_utf8())
}

/// What pane handlers get to open overlays with: the controller plus the
/// focus state it saves and restores.
pub struct ModalHandle<'a, P> {
    modals: &'a mut ModalController<P>,
    focus: &'a mut FocusState,
}

impl<'a, P> ModalHandle<'a, P> {
    pub fn new(modals: &'a mut ModalController<P>, focus: &'a mut FocusState) -> Self {
        Self { modals, focus }
    }

    pub fn is_open(&self) -> bool {
        self.modals.is_open()
    }

    pub fn ask_yes_no(&mut self, prompt: impl Into<String>, purpose: P) {
        self.modals.open_confirmation(self.focus, prompt, purpose);
    }

    pub fn input_popup(&mut self, title: impl Into<String>, purpose: P) {
        self.modals.open_text_input(self.focus, title, purpose);
    }

    pub fn input_popup_with(&mut self, title: impl Into<String>, initial: impl Into<String>, purpose: P) {
        self.modals
            .open_text_input_with(self.focus, title, initial, purpose);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/modal.rs"]
mod tests;
