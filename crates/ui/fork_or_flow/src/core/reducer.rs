//! Reducer: intents in, state transitions plus effects out.
//!
//! Policy:
//!   - Mutates only `RootState`, and navigation only through the
//!     `SessionViewState` transition methods.
//!   - Never panics; intents that do not apply are ignored.
//!   - Navigation intents are dropped while onboarding is still showing.
//!   - Emits `Effect::ViewChanged` whenever the derived view differs after
//!     the transition.

use std::str::FromStr;

use crate::core::effects::Effect;
use crate::core::intent::Intent;
use crate::core::state::{RootState, Tab};

pub fn reduce(state: &mut RootState, intent: Intent) -> Vec<Effect> {
    let before = state.view();
    let mut effects = Vec::new();

    if intent.is_navigation() && !state.session.is_onboarded() {
        tracing::debug!(?intent, "navigation ignored during onboarding");
        return effects;
    }

    match intent {
        Intent::CompleteOnboarding(profile) => {
            if state.session.complete_onboarding() {
                effects.push(Effect::log(format!(
                    "onboarding completed for {} ({})",
                    profile.name,
                    profile.stage.label()
                )));
                state.profile = Some(profile);
            }
        }
        Intent::ChangeTab(tab) => state.session.change_tab(tab),
        Intent::Navigate(id) => match Tab::from_str(&id) {
            Ok(tab) => state.session.change_tab(tab),
            Err(_) => tracing::debug!(%id, "unknown tab id"),
        },
        Intent::NextTab => {
            let tab = state.session.active_tab().next();
            state.session.change_tab(tab);
        }
        Intent::PrevTab => {
            let tab = state.session.active_tab().prev();
            state.session.change_tab(tab);
        }
        Intent::SelectDetailItem(id) => state.session.select_detail_item(id),
        Intent::ClearDetailItem => state.session.clear_detail_item(),
        Intent::Quit => {
            state.quit_requested = true;
            effects.push(Effect::Quit);
        }
        Intent::Suspend => state.suspend_requested = true,
        Intent::Resume => state.suspend_requested = false,
        Intent::Resize(w, h) => state.last_resize = Some((w, h)),
    }

    let after = state.view();
    if before != after {
        effects.push(Effect::ViewChanged {
            from: before,
            to: after,
        });
    }
    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{DetailKind, ItemId, Profile, View};
    use crate::data::{Relationship, Stage};
    use pretty_assertions::assert_eq;

    fn id(n: u32) -> ItemId {
        ItemId::new(n).expect("non-zero id")
    }

    fn profile() -> Profile {
        Profile {
            name: "Robin".into(),
            age: 33,
            location: "San Francisco, CA".into(),
            relationship: Relationship::Partnered,
            stage: Stage::Undecided,
            interests: vec!["Coffee".into()],
        }
    }

    fn onboarded() -> RootState {
        let mut rs = RootState::new();
        reduce(&mut rs, Intent::CompleteOnboarding(profile()));
        rs
    }

    #[test]
    fn completing_onboarding_enters_home() {
        let mut rs = RootState::new();
        let effects = reduce(&mut rs, Intent::CompleteOnboarding(profile()));
        assert_eq!(rs.view(), View::Tab(Tab::Home));
        assert_eq!(rs.profile.as_ref().map(|p| p.name.as_str()), Some("Robin"));
        assert!(effects.contains(&Effect::ViewChanged {
            from: View::Onboarding,
            to: View::Tab(Tab::Home)
        }));
    }

    #[test]
    fn second_completion_keeps_first_profile() {
        let mut rs = onboarded();
        let mut other = profile();
        other.name = "Sam".into();
        let effects = reduce(&mut rs, Intent::CompleteOnboarding(other));
        assert!(effects.is_empty());
        assert_eq!(rs.profile.as_ref().map(|p| p.name.as_str()), Some("Robin"));
    }

    #[test]
    fn navigation_before_onboarding_is_ignored() {
        let mut rs = RootState::new();
        for intent in [
            Intent::ChangeTab(Tab::Feed),
            Intent::SelectDetailItem(id(3)),
            Intent::NextTab,
            Intent::navigate("people"),
        ] {
            assert!(reduce(&mut rs, intent).is_empty());
        }
        assert_eq!(rs.session.active_tab(), Tab::Home);
        assert_eq!(rs.session.selected_detail(), None);
        assert_eq!(rs.view(), View::Onboarding);
    }

    #[test]
    fn textual_navigation_parses_known_ids() {
        let mut rs = onboarded();
        reduce(&mut rs, Intent::navigate("messages"));
        assert_eq!(rs.view(), View::Tab(Tab::Messages));
    }

    #[test]
    fn unknown_tab_id_is_a_silent_no_op() {
        let mut rs = onboarded();
        reduce(&mut rs, Intent::ChangeTab(Tab::Feed));
        reduce(&mut rs, Intent::SelectDetailItem(id(2)));
        let effects = reduce(&mut rs, Intent::navigate("events"));
        assert!(effects.is_empty());
        assert_eq!(rs.session.active_tab(), Tab::Feed);
        assert_eq!(rs.session.selected_detail(), Some(id(2)));
    }

    #[test]
    fn select_then_clear_returns_to_tab_view() {
        let mut rs = onboarded();
        reduce(&mut rs, Intent::SelectDetailItem(id(1)));
        assert_eq!(
            rs.view(),
            View::Detail {
                tab: Tab::Home,
                kind: Some(DetailKind::Event),
                id: id(1)
            }
        );
        let effects = reduce(&mut rs, Intent::ClearDetailItem);
        assert_eq!(rs.view(), View::Tab(Tab::Home));
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn reselecting_same_item_emits_no_view_change() {
        let mut rs = onboarded();
        reduce(&mut rs, Intent::SelectDetailItem(id(1)));
        assert!(reduce(&mut rs, Intent::SelectDetailItem(id(1))).is_empty());
    }

    #[test]
    fn next_and_prev_cycle_and_clear_selection() {
        let mut rs = onboarded();
        reduce(&mut rs, Intent::PrevTab);
        assert_eq!(rs.session.active_tab(), Tab::Messages);
        reduce(&mut rs, Intent::SelectDetailItem(id(4)));
        reduce(&mut rs, Intent::NextTab);
        assert_eq!(rs.view(), View::Tab(Tab::Home));
    }

    #[test]
    fn quit_sets_flag_and_emits_quit_even_during_onboarding() {
        let mut rs = RootState::new();
        let effects = reduce(&mut rs, Intent::Quit);
        assert!(rs.quit_requested);
        assert_eq!(effects, vec![Effect::Quit]);
    }

    #[test]
    fn resize_and_suspend_do_not_touch_navigation() {
        let mut rs = onboarded();
        reduce(&mut rs, Intent::Resize(120, 40));
        reduce(&mut rs, Intent::Suspend);
        assert_eq!(rs.last_resize, Some((120, 40)));
        assert!(rs.suspend_requested);
        reduce(&mut rs, Intent::Resume);
        assert!(!rs.suspend_requested);
        assert_eq!(rs.view(), View::Tab(Tab::Home));
    }
}
