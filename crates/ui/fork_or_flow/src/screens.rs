use std::sync::Arc;

use color_eyre::Result;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    symbols,
    text::{Line, Span},
    widgets::{Block, Borders},
};

use crate::{
    components::Component,
    core::state::{DetailKind, Profile, Tab, View},
    data::Catalog,
    theme::{Theme, UiGroup},
};

mod event_details;
mod feed;
mod home;
mod messages;
mod not_found;
mod onboarding;
mod people;
mod post_details;

pub use event_details::EventDetailsScreen;
pub use feed::FeedScreen;
pub use home::HomeScreen;
pub use messages::MessagesScreen;
pub use not_found::NotFoundScreen;
pub use onboarding::OnboardingScreen;
pub use people::PeopleScreen;
pub use post_details::PostDetailsScreen;

/// A full-area screen: one per `View`.
///
/// Screens own only local, throw-away state (selections, toggles, drafts).
/// Navigation is requested by returning `Action::Intent(..)`; `Action::Back`
/// is delivered through `update` and each screen decides what it means.
pub trait Screen: Component {
    /// Called when the screen becomes visible.
    fn on_enter(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called right before the screen is replaced.
    fn on_exit(&mut self) -> Result<()> {
        Ok(())
    }

    /// `(key, description)` pairs for the status bar.
    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        Vec::new()
    }
}

/// Build the screen that renders `view`.
pub fn screen_for(view: View, catalog: Arc<Catalog>, profile: Option<&Profile>) -> Box<dyn Screen> {
    match view {
        View::Onboarding => Box::new(OnboardingScreen::new()),
        View::Tab(Tab::Home) => Box::new(HomeScreen::new(catalog, profile.cloned())),
        View::Tab(Tab::People) => Box::new(PeopleScreen::new(catalog)),
        View::Tab(Tab::Feed) => Box::new(FeedScreen::new(catalog)),
        View::Tab(Tab::Messages) => Box::new(MessagesScreen::new(catalog)),
        View::Detail {
            kind: Some(DetailKind::Event),
            id,
            ..
        } => match EventDetailsScreen::new(catalog, id) {
            Some(screen) => Box::new(screen),
            None => Box::new(NotFoundScreen::new("Event", id)),
        },
        View::Detail {
            kind: Some(DetailKind::Post),
            id,
            ..
        } => match PostDetailsScreen::new(catalog, id) {
            Some(screen) => Box::new(screen),
            None => Box::new(NotFoundScreen::new("Post", id)),
        },
        View::Detail { kind: None, id, .. } => Box::new(NotFoundScreen::new("Item", id)),
    }
}

/// Cursor over a list whose length can change between frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Selection {
    index: usize,
}

impl Selection {
    pub fn index(&self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.index.min(len - 1))
    }

    pub fn next(&mut self, len: usize) {
        if len > 0 {
            self.index = (self.index.min(len - 1) + 1) % len;
        }
    }

    pub fn prev(&mut self, len: usize) {
        if len > 0 {
            self.index = (self.index.min(len - 1) + len - 1) % len;
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

/// Rounded panel with an optional title; highlighted when `focused`.
pub(crate) fn panel<'a>(title: impl Into<Line<'a>>, focused: bool, theme: &Theme) -> Block<'a> {
    let border = if focused {
        theme.style(UiGroup::Focus)
    } else {
        theme.style(UiGroup::Border)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_set(symbols::border::ROUNDED)
        .border_style(border)
        .title(title)
}

/// Title row plus body; returns `(header, body)`.
pub(crate) fn header_layout(area: Rect, header_height: u16) -> (Rect, Rect) {
    let [header, body] =
        Layout::vertical([Constraint::Length(header_height), Constraint::Fill(1)]).areas(area);
    (header, body)
}

/// `Back` hint line used by the detail overlays.
pub(crate) fn back_line(label: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled("← ", theme.style(UiGroup::Accent)),
        Span::styled(label.to_string(), theme.style(UiGroup::Title)),
        Span::styled("  (Esc)", theme.style(UiGroup::Dimmed)),
    ])
}

/// "12 mutual connections" style pluralisation.
pub(crate) fn plural(n: u32, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Like count with the local like state applied. Unliking something that
/// was liked in the record does not go below the recorded count.
pub(crate) fn liked_count(recorded: u32, recorded_liked: bool, liked: bool) -> u32 {
    recorded + u32::from(liked && !recorded_liked)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> crate::core::state::ItemId {
        crate::core::state::ItemId::new(n).unwrap()
    }

    #[test]
    fn selection_wraps_and_clamps() {
        let mut s = Selection::default();
        assert_eq!(s.index(0), None);
        s.prev(3);
        assert_eq!(s.index(3), Some(2));
        s.next(3);
        assert_eq!(s.index(3), Some(0));
        s.next(3);
        s.next(3);
        // list shrank under the cursor
        assert_eq!(s.index(1), Some(0));
    }

    #[test]
    fn views_map_to_screens() {
        let catalog = Arc::new(Catalog::embedded().unwrap());
        let cases = [
            (View::Onboarding, "onboarding"),
            (View::Tab(Tab::Home), "home"),
            (View::Tab(Tab::People), "people"),
            (View::Tab(Tab::Feed), "feed"),
            (View::Tab(Tab::Messages), "messages"),
            (
                View::Detail {
                    tab: Tab::Home,
                    kind: Some(DetailKind::Event),
                    id: id(1),
                },
                "event_details",
            ),
            (
                View::Detail {
                    tab: Tab::Feed,
                    kind: Some(DetailKind::Post),
                    id: id(3),
                },
                "post_details",
            ),
            (
                View::Detail {
                    tab: Tab::Feed,
                    kind: Some(DetailKind::Post),
                    id: id(42),
                },
                "not_found",
            ),
            (
                View::Detail {
                    tab: Tab::People,
                    kind: None,
                    id: id(1),
                },
                "not_found",
            ),
        ];
        for (view, expected) in cases {
            let screen = screen_for(view, catalog.clone(), None);
            assert_eq!(screen.name(), expected, "{view:?}");
        }
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "spot", "spots"), "1 spot");
        assert_eq!(plural(0, "spot", "spots"), "0 spots");
    }
}
