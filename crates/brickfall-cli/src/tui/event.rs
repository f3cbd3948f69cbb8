use crossterm::event::Event as CrosstermEvent;

/// Events processed by TUI applications.
#[derive(Debug, Clone, derive_more::From)]
pub(super) enum TuiEvent {
    /// Application update timing (based on the tick interval).
    Tick,
    /// Screen render timing (after a state change).
    Render,
    /// Terminal events such as key input, focus changes, and resize.
    Crossterm(CrosstermEvent),
}
