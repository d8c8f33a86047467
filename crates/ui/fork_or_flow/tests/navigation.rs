use std::sync::Arc;

use fork_or_flow::{
    action::Action,
    components::Component,
    config::{KeymapSettings, UiSettings},
    core::{
        intent::Intent,
        reducer::reduce,
        shell::Shell,
        state::{DetailKind, ItemId, Profile, RootState, Tab, View},
    },
    data::{Catalog, Relationship, Stage},
};
use pretty_assertions::assert_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn id(n: u32) -> ItemId {
    ItemId::new(n).unwrap()
}

fn profile() -> Profile {
    Profile {
        name: "Sam".into(),
        age: 31,
        location: "San Francisco".into(),
        relationship: Relationship::Single,
        stage: Stage::LeaningYes,
        interests: vec!["Coffee".into(), "Hiking".into()],
    }
}

fn random_intent(rng: &mut StdRng) -> Intent {
    match rng.gen_range(0..9) {
        0 => Intent::CompleteOnboarding(profile()),
        1 => Intent::ChangeTab(Tab::ALL[rng.gen_range(0..Tab::ALL.len())]),
        2 => {
            let ids = ["home", "people", "feed", "messages", "settings", ""];
            Intent::navigate(ids[rng.gen_range(0..ids.len())])
        }
        3 => Intent::NextTab,
        4 => Intent::PrevTab,
        5 | 6 => Intent::SelectDetailItem(id(rng.gen_range(1..8))),
        7 => Intent::ClearDetailItem,
        _ => Intent::Resize(rng.gen_range(20..200), rng.gen_range(10..60)),
    }
}

#[test]
fn tab_changes_always_clear_the_selection() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut state = RootState::new();
    reduce(&mut state, Intent::CompleteOnboarding(profile()));
    for _ in 0..500 {
        let intent = random_intent(&mut rng);
        let changes_tab = matches!(
            intent,
            Intent::ChangeTab(_) | Intent::NextTab | Intent::PrevTab
        );
        reduce(&mut state, intent);
        if changes_tab {
            assert_eq!(state.session.selected_detail(), None);
            assert!(matches!(state.view(), View::Tab(_)));
        }
    }
}

#[test]
fn select_keeps_the_tab_and_clear_restores_it() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut state = RootState::new();
    reduce(&mut state, Intent::CompleteOnboarding(profile()));
    for _ in 0..200 {
        reduce(&mut state, random_intent(&mut rng));
        let tab = state.session.active_tab();
        let target = id(rng.gen_range(1..20));

        reduce(&mut state, Intent::SelectDetailItem(target));
        assert_eq!(state.session.selected_detail(), Some(target));
        assert_eq!(state.session.active_tab(), tab);

        reduce(&mut state, Intent::ClearDetailItem);
        assert_eq!(state.view(), View::Tab(tab));
    }
}

#[test]
fn onboarding_gates_everything_and_never_comes_back() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..50 {
        let mut state = RootState::new();
        let mut onboarded = false;
        for _ in 0..40 {
            let intent = random_intent(&mut rng);
            if matches!(intent, Intent::CompleteOnboarding(_)) {
                onboarded = true;
            }
            reduce(&mut state, intent);
            if onboarded {
                assert_ne!(state.view(), View::Onboarding);
            } else {
                assert_eq!(state.view(), View::Onboarding);
                assert!(!state.session.nav_bar_visible());
            }
        }
    }
}

#[test]
fn only_the_first_profile_is_kept() {
    let mut state = RootState::new();
    reduce(&mut state, Intent::CompleteOnboarding(profile()));
    let mut other = profile();
    other.name = "Someone else".into();
    reduce(&mut state, Intent::CompleteOnboarding(other));
    assert_eq!(state.profile.map(|p| p.name), Some("Sam".to_string()));
}

fn shell() -> Shell {
    Shell::new(
        Arc::new(Catalog::embedded().unwrap()),
        KeymapSettings::default(),
        UiSettings::default(),
    )
    .unwrap()
}

#[test]
fn scenario_onboarding_feed_post_people() {
    let mut s = shell();
    assert_eq!(s.view(), View::Onboarding);

    s.run_actions([Intent::CompleteOnboarding(profile()).into()])
        .unwrap();
    assert_eq!(s.view(), View::Tab(Tab::Home));
    assert_eq!(s.screen().name(), "home");

    s.run_actions([Intent::ChangeTab(Tab::Feed).into()]).unwrap();
    assert_eq!(s.view(), View::Tab(Tab::Feed));
    assert_eq!(s.state().session.selected_detail(), None);

    s.run_actions([Intent::SelectDetailItem(id(3)).into()])
        .unwrap();
    assert_eq!(
        s.view(),
        View::Detail {
            tab: Tab::Feed,
            kind: Some(DetailKind::Post),
            id: id(3),
        }
    );
    assert_eq!(s.screen().name(), "post_details");
    assert!(!s.state().session.nav_bar_visible());

    s.run_actions([Intent::ChangeTab(Tab::People).into()])
        .unwrap();
    assert_eq!(s.view(), View::Tab(Tab::People));
    assert_eq!(s.state().session.selected_detail(), None);
    assert_eq!(s.screen().name(), "people");
}

#[test]
fn home_events_open_event_details() {
    let mut s = shell();
    s.run_actions([
        Intent::CompleteOnboarding(profile()).into(),
        Intent::SelectDetailItem(id(2)).into(),
    ])
    .unwrap();
    assert_eq!(s.screen().name(), "event_details");
    s.run_actions([Action::Back]).unwrap();
    assert_eq!(s.view(), View::Tab(Tab::Home));
}

#[test]
fn unknown_text_tab_ids_are_ignored() {
    let mut s = shell();
    s.run_actions([
        Intent::CompleteOnboarding(profile()).into(),
        Intent::navigate("feed").into(),
        Intent::navigate("Feed ").into(),
        Intent::navigate("settings").into(),
    ])
    .unwrap();
    assert_eq!(s.view(), View::Tab(Tab::Feed));
}

#[test]
fn messages_selection_has_no_detail_kind() {
    let mut s = shell();
    s.run_actions([
        Intent::CompleteOnboarding(profile()).into(),
        Intent::ChangeTab(Tab::Messages).into(),
        Intent::SelectDetailItem(id(1)).into(),
    ])
    .unwrap();
    assert_eq!(
        s.view(),
        View::Detail {
            tab: Tab::Messages,
            kind: None,
            id: id(1),
        }
    );
    assert_eq!(s.screen().name(), "not_found");
}
