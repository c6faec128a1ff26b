//! Enumerations for TUI state management.

/// Screen currently shown by the timeline app.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    Timeline,
    TaskDetail,
    Help,
}

/// Why the timeline app stopped.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppExit {
    Quit,
    Menu,
}
