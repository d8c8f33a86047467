//! The shell: owns the root state, the visible screen and the popup slot.
//!
//! Event routing (first `Stop` wins):
//!   1. the open popup,
//!   2. the current screen, unless the popup is modal,
//!   3. the keymap along `[popup?, screen, global]` (`[popup]` while modal).
//!
//! Action dispatch happens in `update`, which returns follow-up actions
//! instead of sending them anywhere. The loop feeds those into its channel;
//! tests drain them with `run_actions`.

use std::{collections::VecDeque, sync::Arc};

use color_eyre::Result;
use tracing::{debug, error, info, trace};

use crate::{
    action::Action,
    components::{ConfirmPopup, KeymapOverlay, PopupComponent},
    config::{KeymapSettings, UiSettings, GLOBAL_CONTEXT},
    core::{
        effects::Effect,
        intent::Intent,
        reducer::reduce,
        state::{RootState, View},
    },
    data::Catalog,
    screens::{screen_for, Screen},
    theme::{ColorMode, Theme},
    tui::{Event, EventResponse},
    ui::keymap::{entries_for_chain, resolve_action_with_fallback},
};

pub struct Shell {
    state: RootState,
    catalog: Arc<Catalog>,
    screen: Box<dyn Screen>,
    popup: Option<Box<dyn PopupComponent>>,
    keymap: KeymapSettings,
    ui: UiSettings,
    theme: Theme,
}

impl Shell {
    pub fn new(catalog: Arc<Catalog>, keymap: KeymapSettings, ui: UiSettings) -> Result<Self> {
        let state = RootState::new();
        let mut screen = screen_for(state.view(), catalog.clone(), state.profile.as_ref());
        screen.on_enter()?;
        let theme = Theme::new(ColorMode::resolve(ui.color_mode));
        debug!(mode = theme.mode_label(), "theme resolved");
        Ok(Self {
            state,
            catalog,
            screen,
            popup: None,
            keymap,
            ui,
            theme,
        })
    }

    pub fn state(&self) -> &RootState {
        &self.state
    }

    pub fn view(&self) -> View {
        self.state.view()
    }

    pub fn screen(&self) -> &dyn Screen {
        self.screen.as_ref()
    }

    pub fn screen_mut(&mut self) -> &mut dyn Screen {
        self.screen.as_mut()
    }

    pub fn popup(&self) -> Option<&dyn PopupComponent> {
        self.popup.as_deref()
    }

    pub fn popup_mut(&mut self) -> Option<&mut (dyn PopupComponent + 'static)> {
        self.popup.as_deref_mut()
    }

    pub fn ui_settings(&self) -> &UiSettings {
        &self.ui
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn should_quit(&self) -> bool {
        self.state.quit_requested
    }

    pub fn should_suspend(&self) -> bool {
        self.state.suspend_requested
    }

    /// Keymap context of whatever currently receives keys first.
    pub fn active_context(&self) -> &'static str {
        match &self.popup {
            Some(popup) => popup.keymap_context(),
            None => self.screen.keymap_context(),
        }
    }

    fn context_chain(&self) -> Vec<&'static str> {
        let mut chain = Vec::with_capacity(3);
        if let Some(popup) = &self.popup {
            chain.push(popup.keymap_context());
            if popup.is_modal() {
                return chain;
            }
        }
        chain.push(self.screen.keymap_context());
        chain.push(GLOBAL_CONTEXT);
        chain
    }

    /// Translate one terminal event into actions.
    pub fn handle_event(&mut self, event: &Event) -> Result<Vec<Action>> {
        let mut out = Vec::new();
        match event {
            Event::Tick => out.push(Action::Tick),
            Event::Render => out.push(Action::Render),
            Event::Resize(w, h) => out.push(Action::Resize(*w, *h)),
            Event::Quit => out.push(Action::Quit),
            Event::Error => out.push(Action::Error("terminal event stream failed".into())),
            Event::Init | Event::FocusGained | Event::FocusLost => {}
            Event::Key(_) | Event::Paste(_) => {
                if self.route(event, &mut out)? {
                    return Ok(out);
                }
                if let Event::Key(key) = event {
                    let chain = self.context_chain();
                    if let Some(action) = resolve_action_with_fallback(&self.keymap, &chain, *key)
                    {
                        trace!(?chain, %action, "key resolved");
                        out.push(action);
                    }
                }
            }
        }
        Ok(out)
    }

    /// Offer the event to the popup, then the screen. Returns whether
    /// propagation stopped.
    fn route(&mut self, event: &Event, out: &mut Vec<Action>) -> Result<bool> {
        if let Some(popup) = self.popup.as_mut() {
            if collect(popup.handle_events(event)?, out) {
                return Ok(true);
            }
            if popup.is_modal() {
                return Ok(false);
            }
        }
        Ok(collect(self.screen.handle_events(event)?, out))
    }

    /// Apply one action; returns follow-up actions.
    pub fn update(&mut self, action: Action) -> Result<Vec<Action>> {
        if !matches!(action, Action::Tick | Action::Render) {
            debug!(%action, "dispatch");
        }
        let mut out = Vec::new();
        match action {
            Action::Tick | Action::Render => {}
            Action::Resize(w, h) => self.apply(Intent::Resize(w, h))?,
            Action::Suspend => self.apply(Intent::Suspend)?,
            Action::Resume => self.apply(Intent::Resume)?,
            Action::Quit => self.apply(Intent::Quit)?,
            Action::RequestQuit => {
                let confirm = ConfirmPopup::new("Quit", "Leave Fork or Flow?", Action::Quit)
                    .ok_label("Quit")
                    .cancel_label("Stay");
                self.popup = Some(Box::new(confirm));
            }
            Action::Error(message) => error!("{message}"),
            Action::Help => self.toggle_help(),
            Action::ClosePopup => self.popup = None,
            Action::Back => {
                if self.popup.take().is_none() {
                    out.extend(self.screen.update(&Action::Back)?);
                }
            }
            Action::Intent(intent) => {
                if let Some(popup) = self.popup.as_mut() {
                    out.extend(popup.update(&Action::Intent(intent.clone()))?);
                }
                self.apply(intent)?;
            }
        }
        Ok(out)
    }

    /// Apply `actions` and everything they lead to, in order.
    pub fn run_actions(&mut self, actions: impl IntoIterator<Item = Action>) -> Result<()> {
        let mut queue: VecDeque<Action> = actions.into_iter().collect();
        while let Some(action) = queue.pop_front() {
            queue.extend(self.update(action)?);
        }
        Ok(())
    }

    fn toggle_help(&mut self) {
        if self.popup.take().is_some() {
            return;
        }
        let context = self.screen.keymap_context();
        let entries = entries_for_chain(&self.keymap, &[context, GLOBAL_CONTEXT]);
        let overlay = KeymapOverlay::new(format!("Keymap · {context}"), entries);
        self.popup = Some(Box::new(overlay));
    }

    fn apply(&mut self, intent: Intent) -> Result<()> {
        for effect in reduce(&mut self.state, intent) {
            match effect {
                Effect::Log(msg) => info!("{msg}"),
                Effect::ViewChanged { from, to } => {
                    debug!(from = %from.label(), to = %to.label(), "view changed");
                    self.screen.on_exit()?;
                    self.screen = screen_for(to, self.catalog.clone(), self.state.profile.as_ref());
                    self.screen.on_enter()?;
                }
                Effect::Quit => info!("quit requested"),
            }
        }
        Ok(())
    }
}

fn collect(response: Option<EventResponse<Action>>, out: &mut Vec<Action>) -> bool {
    match response {
        Some(EventResponse::Stop(action)) => {
            out.push(action);
            true
        }
        Some(EventResponse::Continue(action)) => {
            out.push(action);
            false
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{ItemId, Profile, Tab};
    use crate::data::{Relationship, Stage};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;

    fn shell() -> Shell {
        Shell::new(
            Arc::new(Catalog::embedded().unwrap()),
            KeymapSettings::default(),
            UiSettings::default(),
        )
        .unwrap()
    }

    fn profile() -> Profile {
        Profile {
            name: "Robin".into(),
            age: 33,
            location: "Oakland".into(),
            relationship: Relationship::Partnered,
            stage: Stage::Undecided,
            interests: vec!["Books".into()],
        }
    }

    fn onboarded() -> Shell {
        let mut s = shell();
        s.run_actions([Intent::CompleteOnboarding(profile()).into()])
            .unwrap();
        s
    }

    fn key(s: &mut Shell, code: KeyCode) {
        key_with(s, code, KeyModifiers::NONE);
    }

    fn key_with(s: &mut Shell, code: KeyCode, mods: KeyModifiers) {
        let actions = s
            .handle_event(&Event::Key(KeyEvent::new(code, mods)))
            .unwrap();
        s.run_actions(actions).unwrap();
    }

    fn id(n: u32) -> ItemId {
        ItemId::new(n).unwrap()
    }

    #[test]
    fn starts_in_onboarding() {
        let s = shell();
        assert_eq!(s.view(), View::Onboarding);
        assert_eq!(s.screen().name(), "onboarding");
    }

    #[test]
    fn completing_onboarding_shows_home_with_profile() {
        let s = onboarded();
        assert_eq!(s.view(), View::Tab(Tab::Home));
        assert_eq!(s.screen().name(), "home");
        assert_eq!(s.state().profile.as_ref().map(|p| p.name.as_str()), Some("Robin"));
    }

    #[test]
    fn tab_keys_walk_the_tabs_and_swap_screens() {
        let mut s = onboarded();
        key(&mut s, KeyCode::Tab);
        assert_eq!(s.screen().name(), "people");
        key(&mut s, KeyCode::BackTab);
        key(&mut s, KeyCode::BackTab);
        assert_eq!(s.view(), View::Tab(Tab::Messages));
        key(&mut s, KeyCode::Char('3'));
        assert_eq!(s.screen().name(), "feed");
    }

    #[test]
    fn detail_overlay_and_back() {
        let mut s = onboarded();
        s.run_actions([
            Intent::ChangeTab(Tab::Feed).into(),
            Intent::SelectDetailItem(id(3)).into(),
        ])
        .unwrap();
        assert_eq!(s.screen().name(), "post_details");
        assert!(!s.state().session.nav_bar_visible());

        key(&mut s, KeyCode::Esc);
        assert_eq!(s.view(), View::Tab(Tab::Feed));
        assert_eq!(s.screen().name(), "feed");
    }

    #[test]
    fn unknown_detail_renders_not_found() {
        let mut s = onboarded();
        s.run_actions([
            Intent::ChangeTab(Tab::Feed).into(),
            Intent::SelectDetailItem(id(42)).into(),
        ])
        .unwrap();
        assert_eq!(s.screen().name(), "not_found");
        key(&mut s, KeyCode::Char('b'));
        assert_eq!(s.view(), View::Tab(Tab::Feed));
    }

    #[test]
    fn quit_asks_first() {
        let mut s = onboarded();
        key(&mut s, KeyCode::Char('q'));
        assert!(!s.should_quit());
        assert_eq!(s.popup().map(|p| p.name()), Some("confirm"));

        // modal: tab keys do nothing while asking
        key(&mut s, KeyCode::Tab);
        assert_eq!(s.view(), View::Tab(Tab::Home));

        key(&mut s, KeyCode::Esc);
        assert!(s.popup().is_none());
        assert!(!s.should_quit());

        key_with(&mut s, KeyCode::Char('c'), KeyModifiers::CONTROL);
        key(&mut s, KeyCode::Enter);
        assert!(s.should_quit());
    }

    #[test]
    fn help_toggles_the_keymap_overlay() {
        let mut s = onboarded();
        key(&mut s, KeyCode::Char('?'));
        assert_eq!(s.popup().map(|p| p.name()), Some("keymap_overlay"));
        assert_eq!(s.active_context(), "popup");
        key(&mut s, KeyCode::Char('?'));
        assert!(s.popup().is_none());

        key(&mut s, KeyCode::F(1));
        key(&mut s, KeyCode::Esc);
        assert!(s.popup().is_none());
        assert_eq!(s.view(), View::Tab(Tab::Home));
    }

    #[test]
    fn screen_keys_win_over_global_bindings() {
        let mut s = onboarded();
        key(&mut s, KeyCode::Char('4'));
        assert_eq!(s.screen().name(), "messages");
        key(&mut s, KeyCode::Char('/'));
        // typed into the search field, not a tab jump or quit
        key(&mut s, KeyCode::Char('2'));
        key(&mut s, KeyCode::Char('q'));
        assert_eq!(s.view(), View::Tab(Tab::Messages));
        assert!(s.popup().is_none());
    }

    #[test]
    fn navigation_during_onboarding_is_ignored() {
        let mut s = shell();
        s.run_actions([
            Intent::ChangeTab(Tab::Feed).into(),
            Intent::SelectDetailItem(id(1)).into(),
            Intent::navigate("people").into(),
        ])
        .unwrap();
        assert_eq!(s.view(), View::Onboarding);
    }

    #[test]
    fn suspend_and_resume_flags() {
        let mut s = onboarded();
        key_with(&mut s, KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert!(s.should_suspend());
        s.run_actions([Action::Resume]).unwrap();
        assert!(!s.should_suspend());
    }

    #[test]
    fn resize_and_ticks() {
        let mut s = onboarded();
        let actions = s.handle_event(&Event::Resize(100, 40)).unwrap();
        assert_eq!(actions, vec![Action::Resize(100, 40)]);
        s.run_actions(actions).unwrap();
        assert_eq!(s.state().last_resize, Some((100, 40)));
        assert_eq!(s.handle_event(&Event::Tick).unwrap(), vec![Action::Tick]);
        assert!(s.handle_event(&Event::FocusLost).unwrap().is_empty());
    }
}
