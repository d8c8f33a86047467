//! Intents: the declarative requests the reducer understands.
//!
//! Screens, the keymap and the navigation bar never touch `RootState`
//! directly; they emit one of these wrapped in `Action::Intent`.

use crate::core::state::{ItemId, Profile, Tab};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Leave onboarding with the collected profile. Only the first one counts.
    CompleteOnboarding(Profile),
    ChangeTab(Tab),
    /// Tab change requested by textual id (`"home"`, `"feed"`, ...).
    /// Unknown ids are ignored.
    Navigate(String),
    NextTab,
    PrevTab,
    SelectDetailItem(ItemId),
    ClearDetailItem,
    Quit,
    Suspend,
    Resume,
    Resize(u16, u16),
}

impl Intent {
    pub fn navigate(id: impl Into<String>) -> Self {
        Intent::Navigate(id.into())
    }

    /// Intents that move between tabs or overlays. These are dropped until
    /// onboarding is complete.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Intent::ChangeTab(_)
                | Intent::Navigate(_)
                | Intent::NextTab
                | Intent::PrevTab
                | Intent::SelectDetailItem(_)
                | Intent::ClearDetailItem
        )
    }
}
