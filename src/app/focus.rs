//! Key routing: overlays first, then global shortcuts, then the focused pane
//! chain.

use super::modal::{ModalController, ModalHandle};
use super::purpose::ModalPurpose;
use crate::core::event::{folded_char, KeyEvent};
use crate::keymap::KeyBindings;
use crate::panes::{PaneContext, PaneRequest, PaneSet};
use crate::runtime::Effect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    ProjectPane,
    TaskPane,
    TaskDetailPane,
    /// Secondary panel, offered events only while the task pane is focused.
    ProjectDetailPane,
    ModalOverlay,
}

impl FocusTarget {
    pub fn is_pane(self) -> bool {
        !matches!(self, FocusTarget::ModalOverlay)
    }
}

/// The single focus slot. Only the router and the modal controller write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusState {
    current: FocusTarget,
}

impl FocusState {
    pub fn new(initial: FocusTarget) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> FocusTarget {
        self.current
    }

    pub fn is(&self, target: FocusTarget) -> bool {
        self.current == target
    }

    pub(crate) fn set(&mut self, target: FocusTarget) {
        self.current = target;
    }
}

impl Default for FocusState {
    fn default() -> Self {
        Self::new(FocusTarget::ProjectPane)
    }
}

/// Everything a routed key may touch besides the router itself.
pub struct Dispatch<'a, S: ?Sized> {
    pub panes: &'a mut S,
    pub modals: &'a mut ModalController<ModalPurpose>,
    pub bindings: &'a KeyBindings,
    pub effects: &'a mut Vec<Effect>,
    /// Receives requests the router does not handle itself.
    pub requests: &'a mut Vec<PaneRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusRouter {
    focus: FocusState,
    project_detail_visible: bool,
    task_detail_visible: bool,
}

impl Default for FocusRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusRouter {
    pub fn new() -> Self {
        Self {
            focus: FocusState::default(),
            project_detail_visible: false,
            task_detail_visible: false,
        }
    }

    pub fn focus(&self) -> &FocusState {
        &self.focus
    }

    pub fn focus_mut(&mut self) -> &mut FocusState {
        &mut self.focus
    }

    pub fn project_detail_visible(&self) -> bool {
        self.project_detail_visible
    }

    pub fn task_detail_visible(&self) -> bool {
        self.task_detail_visible
    }

    /// Routes one key. `None` means consumed; `Some` hands back the event,
    /// possibly rewritten by a handler, as unconsumed.
    pub fn route<S: PaneSet + ?Sized>(
        &mut self,
        event: KeyEvent,
        dispatch: Dispatch<'_, S>,
    ) -> Option<KeyEvent> {
        // Overlays install their own capture; never intercept for them.
        if dispatch.modals.is_open() {
            return Some(event);
        }

        if let Some(target) = folded_char(&event).and_then(global_target) {
            tracing::trace!(?target, "global shortcut");
            self.focus.set(target);
            self.project_detail_visible = false;
            self.task_detail_visible = false;
            return None;
        }

        let chain = self.chain();
        let mut local = Vec::new();
        let mut event = Some(event);
        {
            let Dispatch {
                panes,
                modals,
                bindings,
                effects,
                ..
            } = dispatch;
            let mut cx = PaneContext {
                bindings,
                modals: ModalHandle::new(modals, &mut self.focus),
                effects,
                requests: &mut local,
            };
            for target in chain {
                let Some(current) = event else { break };
                if cx.modals.is_open() {
                    break;
                }
                event = match panes.pane_mut(*target) {
                    Some(pane) => pane.handle_shortcut(current, &mut cx),
                    None => Some(current),
                };
            }
        }

        for request in local {
            if !self.apply(&request) {
                dispatch.requests.push(request);
            }
        }
        event
    }

    /// Applies a focus or panel request. Returns `false` for requests that
    /// belong to someone else.
    pub fn apply(&mut self, request: &PaneRequest) -> bool {
        match *request {
            PaneRequest::Focus(target) => {
                if !target.is_pane() || self.focus.is(FocusTarget::ModalOverlay) {
                    tracing::debug!(?target, "ignoring focus request");
                } else {
                    self.focus.set(target);
                }
                true
            }
            PaneRequest::ShowProjectDetail(visible) => {
                self.project_detail_visible = visible;
                true
            }
            PaneRequest::ShowTaskDetail(visible) => {
                self.task_detail_visible = visible;
                true
            }
            _ => false,
        }
    }

    fn chain(&self) -> &'static [FocusTarget] {
        match self.focus.current() {
            FocusTarget::TaskPane if self.project_detail_visible => {
                &[FocusTarget::TaskPane, FocusTarget::ProjectDetailPane]
            }
            FocusTarget::TaskPane => &[FocusTarget::TaskPane],
            FocusTarget::ProjectPane => &[FocusTarget::ProjectPane],
            FocusTarget::TaskDetailPane => &[FocusTarget::TaskDetailPane],
            FocusTarget::ProjectDetailPane => &[FocusTarget::ProjectDetailPane],
            FocusTarget::ModalOverlay => &[],
        }
    }
}

/// Global pane shortcuts. Both detail panels close when one fires.
/// `q` is reserved: it matches nothing here and reaches the panes.
fn global_target(ch: char) -> Option<FocusTarget> {
    match ch {
        'p' => Some(FocusTarget::ProjectPane),
        't' => Some(FocusTarget::TaskPane),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/focus.rs"]
mod tests;
