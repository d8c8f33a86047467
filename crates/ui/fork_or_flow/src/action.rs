use strum::Display;

use crate::core::intent::Intent;

/// Everything that travels through the action channel.
///
/// UI plumbing (ticks, popups, lifecycle) lives here directly; anything that
/// changes navigation or session state is wrapped as `Intent` and goes through
/// the reducer.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    /// Confirmed quit.
    Quit,
    /// Ask before quitting (opens the confirmation popup).
    RequestQuit,
    Error(String),
    /// Toggle the keymap overlay.
    Help,
    ClosePopup,
    /// Forwarded to the current screen; each screen decides what "back" means.
    Back,
    Intent(Intent),
}

impl From<Intent> for Action {
    fn from(intent: Intent) -> Self {
        Action::Intent(intent)
    }
}
