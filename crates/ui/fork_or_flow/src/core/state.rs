//! Session view state and the derived view.
//!
//! `SessionViewState` is the only navigation state in the program. It is owned
//! by `RootState`, mutated exclusively through its transition methods, and
//! recreated on every start.
//!
//! Render decisions never look at the raw fields; they match on `View`,
//! which is derived from the state in one place (`SessionViewState::view`).

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::data::{Relationship, Stage};

/// Identifier of a mock record (event, post, ...). Zero is not a valid id.
pub type ItemId = NonZeroU32;

/// Main application tabs in navigation-bar order.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Home,
    People,
    Feed,
    Messages,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Home, Tab::People, Tab::Feed, Tab::Messages];

    pub fn index(self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::People => 1,
            Tab::Feed => 2,
            Tab::Messages => 3,
        }
    }

    pub fn next(self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::People => "People",
            Tab::Feed => "Feed",
            Tab::Messages => "Messages",
        }
    }

    /// Which overlay a selection made from this tab opens.
    pub fn detail_kind(self) -> Option<DetailKind> {
        match self {
            Tab::Home => Some(DetailKind::Event),
            Tab::Feed => Some(DetailKind::Post),
            Tab::People | Tab::Messages => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DetailKind {
    Event,
    Post,
}

/// The single discriminant the render path matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Onboarding,
    Tab(Tab),
    /// `kind` is `None` when the active tab has no overlay; such a selection
    /// renders the not-found panel.
    Detail {
        tab: Tab,
        kind: Option<DetailKind>,
        id: ItemId,
    },
}

impl View {
    pub fn label(&self) -> String {
        match self {
            View::Onboarding => "onboarding".to_string(),
            View::Tab(tab) => tab.to_string(),
            View::Detail {
                kind: Some(kind),
                id,
                ..
            } => format!("{} #{id}", kind.to_string().to_lowercase()),
            View::Detail { kind: None, id, .. } => format!("detail #{id}"),
        }
    }

    pub fn is_detail(&self) -> bool {
        matches!(self, View::Detail { .. })
    }
}

/// Navigation state owned by the shell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionViewState {
    onboarded: bool,
    active_tab: Tab,
    selected_detail: Option<ItemId>,
}

impl SessionViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_onboarded(&self) -> bool {
        self.onboarded
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn selected_detail(&self) -> Option<ItemId> {
        self.selected_detail
    }

    /// One-way switch out of onboarding. Returns whether anything changed.
    pub fn complete_onboarding(&mut self) -> bool {
        let changed = !self.onboarded;
        self.onboarded = true;
        changed
    }

    /// Switching tabs always drops the selected detail item.
    pub fn change_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.selected_detail = None;
    }

    pub fn select_detail_item(&mut self, id: ItemId) {
        self.selected_detail = Some(id);
    }

    pub fn clear_detail_item(&mut self) {
        self.selected_detail = None;
    }

    pub fn view(&self) -> View {
        if !self.onboarded {
            return View::Onboarding;
        }
        match self.selected_detail {
            Some(id) => View::Detail {
                tab: self.active_tab,
                kind: self.active_tab.detail_kind(),
                id,
            },
            None => View::Tab(self.active_tab),
        }
    }

    /// The navigation bar is only part of the Tab View.
    pub fn nav_bar_visible(&self) -> bool {
        matches!(self.view(), View::Tab(_))
    }
}

/// Profile captured by the onboarding flow; lives for the session only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: u16,
    pub location: String,
    pub relationship: Relationship,
    pub stage: Stage,
    pub interests: Vec<String>,
}

/// Root container the reducer operates on.
#[derive(Debug, Default)]
pub struct RootState {
    pub session: SessionViewState,
    pub profile: Option<Profile>,
    pub quit_requested: bool,
    pub suspend_requested: bool,
    pub last_resize: Option<(u16, u16)>,
}

impl RootState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        self.session.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn id(n: u32) -> ItemId {
        ItemId::new(n).expect("non-zero id")
    }

    fn onboarded() -> SessionViewState {
        let mut s = SessionViewState::new();
        s.complete_onboarding();
        s
    }

    #[test]
    fn initial_state_is_onboarding_on_home() {
        let s = SessionViewState::new();
        assert!(!s.is_onboarded());
        assert_eq!(s.active_tab(), Tab::Home);
        assert_eq!(s.selected_detail(), None);
        assert_eq!(s.view(), View::Onboarding);
    }

    #[test]
    fn complete_onboarding_is_idempotent() {
        let mut s = SessionViewState::new();
        assert!(s.complete_onboarding());
        assert!(!s.complete_onboarding());
        assert_eq!(s.view(), View::Tab(Tab::Home));
    }

    #[test]
    fn change_tab_clears_selection() {
        let mut s = onboarded();
        s.change_tab(Tab::Feed);
        s.select_detail_item(id(3));
        s.change_tab(Tab::People);
        assert_eq!(s.selected_detail(), None);
        assert_eq!(s.view(), View::Tab(Tab::People));
    }

    #[test]
    fn selecting_keeps_active_tab_and_hides_nav_bar() {
        let mut s = onboarded();
        s.change_tab(Tab::Feed);
        s.select_detail_item(id(3));
        assert_eq!(s.active_tab(), Tab::Feed);
        assert_eq!(
            s.view(),
            View::Detail {
                tab: Tab::Feed,
                kind: Some(DetailKind::Post),
                id: id(3)
            }
        );
        assert!(!s.nav_bar_visible());
    }

    #[test]
    fn selection_from_tab_without_overlay_has_no_kind() {
        let mut s = onboarded();
        s.change_tab(Tab::Messages);
        s.select_detail_item(id(1));
        assert!(matches!(s.view(), View::Detail { kind: None, .. }));
    }

    #[test]
    fn state_before_onboarding_never_leaks_into_view() {
        let mut s = SessionViewState::new();
        s.change_tab(Tab::Feed);
        s.select_detail_item(id(2));
        assert_eq!(s.view(), View::Onboarding);
        assert!(!s.nav_bar_visible());
    }

    #[test]
    fn tab_ids_parse_exactly() {
        assert_eq!(Tab::from_str("home"), Ok(Tab::Home));
        assert_eq!(Tab::from_str("messages"), Ok(Tab::Messages));
        assert!(Tab::from_str("events").is_err());
        assert!(Tab::from_str("Home").is_err());
        assert!(Tab::from_str("").is_err());
    }

    #[test]
    fn tab_cycling_wraps() {
        assert_eq!(Tab::Messages.next(), Tab::Home);
        assert_eq!(Tab::Home.prev(), Tab::Messages);
        for tab in Tab::ALL {
            assert_eq!(tab.next().prev(), tab);
        }
    }
}
