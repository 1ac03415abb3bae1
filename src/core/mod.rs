//! Input event primitives shared by the router, the overlays and the panes.

pub mod event;

pub use event::{InputEvent, KeyCode, KeyEvent, KeyModifiers};
