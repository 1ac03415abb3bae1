use super::*;
use crate::core::event::{char_key, key, KeyCode, KeyModifiers};
use crate::panes::{Pane, PaneContext, PaneRequest, PaneSet};

/// Records what it saw and consumes only the characters it is told to.
struct StubPane {
    target: FocusTarget,
    consumes: Vec<char>,
    seen: Vec<KeyEvent>,
    on_key: Option<fn(&mut PaneContext<'_>)>,
}

impl StubPane {
    fn new(target: FocusTarget, consumes: &[char]) -> Self {
        Self {
            target,
            consumes: consumes.to_vec(),
            seen: Vec::new(),
            on_key: None,
        }
    }
}

impl Pane for StubPane {
    fn target(&self) -> FocusTarget {
        self.target
    }

    fn handle_shortcut(&mut self, event: KeyEvent, cx: &mut PaneContext<'_>) -> Option<KeyEvent> {
        self.seen.push(event);
        if let Some(hook) = self.on_key {
            hook(cx);
        }
        match event.code {
            KeyCode::Char(ch) if self.consumes.contains(&ch) => None,
            _ => Some(event),
        }
    }
}

fn open_new_project(cx: &mut PaneContext<'_>) {
    cx.modals.input_popup("New", ModalPurpose::NewProject);
}

fn request_everything(cx: &mut PaneContext<'_>) {
    cx.request(PaneRequest::Focus(FocusTarget::TaskPane));
    cx.request(PaneRequest::ShowProjectDetail(true));
    cx.request(PaneRequest::Notify("hello".to_string()));
    cx.effect(Effect::LoadProjects);
}

struct Stubs {
    projects: StubPane,
    tasks: StubPane,
    task_detail: StubPane,
    project_detail: StubPane,
}

impl Stubs {
    fn new() -> Self {
        Self {
            projects: StubPane::new(FocusTarget::ProjectPane, &['p', 't']),
            tasks: StubPane::new(FocusTarget::TaskPane, &['p', 't', 'x']),
            task_detail: StubPane::new(FocusTarget::TaskDetailPane, &['p', 't']),
            project_detail: StubPane::new(FocusTarget::ProjectDetailPane, &['D']),
        }
    }
}

impl PaneSet for Stubs {
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

struct Harness {
    router: FocusRouter,
    panes: Stubs,
    modals: ModalController<ModalPurpose>,
    bindings: KeyBindings,
    effects: Vec<Effect>,
    requests: Vec<PaneRequest>,
}

impl Harness {
    fn new() -> Self {
        Self {
            router: FocusRouter::new(),
            panes: Stubs::new(),
            modals: ModalController::new(),
            bindings: KeyBindings::default(),
            effects: Vec::new(),
            requests: Vec::new(),
        }
    }

    fn focus_on(&mut self, target: FocusTarget) {
        self.router.focus_mut().set(target);
    }

    fn route(&mut self, event: KeyEvent) -> Option<KeyEvent> {
        self.router.route(
            event,
            Dispatch {
                panes: &mut self.panes,
                modals: &mut self.modals,
                bindings: &self.bindings,
                effects: &mut self.effects,
                requests: &mut self.requests,
            },
        )
    }
}

const PANES: [FocusTarget; 4] = [
    FocusTarget::ProjectPane,
    FocusTarget::TaskPane,
    FocusTarget::TaskDetailPane,
    FocusTarget::ProjectDetailPane,
];

#[test]
fn starts_on_project_pane() {
    let router = FocusRouter::new();
    assert_eq!(router.focus().current(), FocusTarget::ProjectPane);
    assert!(!router.project_detail_visible());
    assert!(!router.task_detail_visible());
}

#[test]
fn global_shortcuts_win_over_pane_bindings() {
    for from in PANES {
        for (ch, expected) in [
            ('p', FocusTarget::ProjectPane),
            ('P', FocusTarget::ProjectPane),
            ('t', FocusTarget::TaskPane),
            ('T', FocusTarget::TaskPane),
        ] {
            let mut h = Harness::new();
            h.focus_on(from);

            assert_eq!(h.route(char_key(ch)), None, "{ch} from {from:?}");
            assert_eq!(h.router.focus().current(), expected);
            assert!(h.panes.projects.seen.is_empty());
            assert!(h.panes.tasks.seen.is_empty());
            assert!(h.panes.task_detail.seen.is_empty());
        }
    }
}

#[test]
fn global_shortcuts_hide_detail_panels() {
    let mut h = Harness::new();
    h.router.apply(&PaneRequest::ShowProjectDetail(true));
    h.router.apply(&PaneRequest::ShowTaskDetail(true));
    h.focus_on(FocusTarget::TaskDetailPane);

    h.route(char_key('t'));

    assert!(!h.router.project_detail_visible());
    assert!(!h.router.task_detail_visible());
}

#[test]
fn modified_letters_are_not_global_shortcuts() {
    let mut h = Harness::new();
    h.focus_on(FocusTarget::TaskPane);
    let ctrl_p = KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL);

    assert_eq!(h.route(ctrl_p), Some(ctrl_p));
    assert_eq!(h.router.focus().current(), FocusTarget::TaskPane);
    assert_eq!(h.panes.tasks.seen, vec![ctrl_p]);
}

#[test]
fn open_overlay_passes_everything_through() {
    let mut h = Harness::new();
    h.focus_on(FocusTarget::TaskPane);
    h.modals
        .open_confirmation(h.router.focus_mut(), "Sure?", ModalPurpose::NewProject);

    for event in [
        char_key('p'),
        char_key('t'),
        char_key('q'),
        char_key('x'),
        key(KeyCode::Esc),
        key(KeyCode::Enter),
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
    ] {
        assert_eq!(h.route(event), Some(event));
    }
    assert_eq!(h.router.focus().current(), FocusTarget::ModalOverlay);
    assert!(h.panes.tasks.seen.is_empty());
    assert!(h.modals.is_open());
}

#[test]
fn q_falls_through_to_the_focused_pane() {
    let mut h = Harness::new();
    h.focus_on(FocusTarget::ProjectPane);

    assert_eq!(h.route(char_key('q')), Some(char_key('q')));
    assert_eq!(h.panes.projects.seen, vec![char_key('q')]);
    assert_eq!(h.router.focus().current(), FocusTarget::ProjectPane);
}

#[test]
fn only_the_focused_pane_sees_keys() {
    let mut h = Harness::new();
    h.focus_on(FocusTarget::TaskDetailPane);

    h.route(char_key('z'));

    assert_eq!(h.panes.task_detail.seen.len(), 1);
    assert!(h.panes.projects.seen.is_empty());
    assert!(h.panes.tasks.seen.is_empty());
    assert!(h.panes.project_detail.seen.is_empty());
}

#[test]
fn unconsumed_task_key_reaches_visible_project_detail() {
    let mut h = Harness::new();
    h.focus_on(FocusTarget::TaskPane);
    h.router.apply(&PaneRequest::ShowProjectDetail(true));

    assert_eq!(h.route(char_key('D')), None);
    assert_eq!(h.panes.tasks.seen, vec![char_key('D')]);
    assert_eq!(h.panes.project_detail.seen, vec![char_key('D')]);

    // Consumed by the task pane: never offered further.
    assert_eq!(h.route(char_key('x')), None);
    assert_eq!(h.panes.project_detail.seen.len(), 1);

    // Neither handles it.
    assert_eq!(h.route(char_key('z')), Some(char_key('z')));
    assert_eq!(h.panes.project_detail.seen.len(), 2);
}

#[test]
fn hidden_project_detail_is_skipped() {
    let mut h = Harness::new();
    h.focus_on(FocusTarget::TaskPane);

    assert_eq!(h.route(char_key('D')), Some(char_key('D')));
    assert!(h.panes.project_detail.seen.is_empty());
}

#[test]
fn project_detail_is_only_chained_behind_task_pane() {
    let mut h = Harness::new();
    h.router.apply(&PaneRequest::ShowProjectDetail(true));
    h.focus_on(FocusTarget::TaskDetailPane);

    h.route(char_key('D'));
    assert!(h.panes.project_detail.seen.is_empty());
}

#[test]
fn chain_stops_once_a_pane_opens_an_overlay() {
    let mut h = Harness::new();
    h.focus_on(FocusTarget::TaskPane);
    h.router.apply(&PaneRequest::ShowProjectDetail(true));
    h.panes.tasks.on_key = Some(open_new_project);

    assert_eq!(h.route(char_key('z')), Some(char_key('z')));
    assert!(h.panes.project_detail.seen.is_empty());
    assert_eq!(h.router.focus().current(), FocusTarget::ModalOverlay);
    assert_eq!(
        h.modals.active().unwrap().suspended(),
        FocusTarget::TaskPane
    );
}

#[test]
fn focus_requests_are_applied_and_others_forwarded() {
    let mut h = Harness::new();
    h.focus_on(FocusTarget::ProjectPane);
    h.panes.projects.on_key = Some(request_everything);

    h.route(char_key('l'));

    assert_eq!(h.router.focus().current(), FocusTarget::TaskPane);
    assert!(h.router.project_detail_visible());
    assert_eq!(h.requests, vec![PaneRequest::Notify("hello".to_string())]);
    assert_eq!(h.effects, vec![Effect::LoadProjects]);
}

#[test]
fn focus_requests_cannot_target_or_escape_an_overlay() {
    let mut router = FocusRouter::new();
    assert!(router.apply(&PaneRequest::Focus(FocusTarget::ModalOverlay)));
    assert_eq!(router.focus().current(), FocusTarget::ProjectPane);

    router.focus_mut().set(FocusTarget::ModalOverlay);
    router.apply(&PaneRequest::Focus(FocusTarget::TaskPane));
    assert_eq!(router.focus().current(), FocusTarget::ModalOverlay);
}
