//! Four-step profile form shown until onboarding completes.
//!
//! Steps: name and age, location and relationship, journey stage, interests.
//! "Continue" stays disabled until the current step has what it needs; the
//! last step's "Complete Setup" emits `Intent::CompleteOnboarding` once.

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use strum::IntoEnumIterator;

use crate::{
    action::Action,
    components::{centered_rect_fixed, Component, TextField},
    core::{intent::Intent, state::Profile},
    data::{Relationship, Stage},
    screens::{panel, Screen},
    theme::{Theme, UiGroup},
    tui::{EventResponse, Frame},
};

pub const INTERESTS: [&str; 12] = [
    "Travel",
    "Fitness",
    "Books",
    "Cooking",
    "Movies",
    "Music",
    "Art",
    "Nature",
    "Photography",
    "Gaming",
    "Yoga",
    "Coffee",
];
const INTEREST_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Basics,
    About,
    Journey,
    Interests,
}

impl Step {
    fn number(self) -> usize {
        match self {
            Step::Basics => 1,
            Step::About => 2,
            Step::Journey => 3,
            Step::Interests => 4,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Step::Basics => "Welcome to Fork or Flow",
            Step::About => "About You",
            Step::Journey => "Your Journey",
            Step::Interests => "Your Interests",
        }
    }

    fn next(self) -> Option<Step> {
        match self {
            Step::Basics => Some(Step::About),
            Step::About => Some(Step::Journey),
            Step::Journey => Some(Step::Interests),
            Step::Interests => None,
        }
    }

    fn prev(self) -> Option<Step> {
        match self {
            Step::Basics => None,
            Step::About => Some(Step::Basics),
            Step::Journey => Some(Step::About),
            Step::Interests => Some(Step::Journey),
        }
    }
}

/// Which widget of the current step receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Name,
    Age,
    Location,
    Relationship,
    Options,
}

pub struct OnboardingScreen {
    step: Step,
    focus: Focus,
    name: TextField,
    age: TextField,
    location: TextField,
    relationship: Option<Relationship>,
    relationship_cursor: usize,
    stage: Option<Stage>,
    stage_cursor: usize,
    interests: Vec<bool>,
    interest_cursor: usize,
    completed: bool,
}

impl Default for OnboardingScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl OnboardingScreen {
    pub fn new() -> Self {
        let mut screen = Self {
            step: Step::Basics,
            focus: Focus::Name,
            name: TextField::new("Name").placeholder("Enter your first name"),
            age: TextField::new("Age")
                .placeholder("Your age")
                .digits_only()
                .max_len(3),
            location: TextField::new("Location").placeholder("City, State"),
            relationship: None,
            relationship_cursor: 0,
            stage: None,
            stage_cursor: 0,
            interests: vec![false; INTERESTS.len()],
            interest_cursor: 0,
            completed: false,
        };
        screen.sync_focus();
        screen
    }

    pub fn step_number(&self) -> usize {
        self.step.number()
    }

    /// Whether "Continue" / "Complete Setup" is enabled.
    pub fn can_continue(&self) -> bool {
        match self.step {
            Step::Basics => !self.name.is_blank() && !self.age.is_blank(),
            Step::About => !self.location.is_blank() && self.relationship.is_some(),
            Step::Journey => self.stage.is_some(),
            Step::Interests => self.interests.iter().any(|&on| on),
        }
    }

    fn selected_interests(&self) -> Vec<String> {
        INTERESTS
            .iter()
            .zip(&self.interests)
            .filter(|(_, &on)| on)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    fn profile(&self) -> Option<Profile> {
        Some(Profile {
            name: self.name.value().trim().to_string(),
            age: self.age.value().parse().ok()?,
            location: self.location.value().trim().to_string(),
            relationship: self.relationship?,
            stage: self.stage?,
            interests: self.selected_interests(),
        })
    }

    fn first_focus(step: Step) -> Focus {
        match step {
            Step::Basics => Focus::Name,
            Step::About => Focus::Location,
            Step::Journey | Step::Interests => Focus::Options,
        }
    }

    fn sync_focus(&mut self) {
        self.name.set_focused(self.focus == Focus::Name);
        self.age.set_focused(self.focus == Focus::Age);
        self.location.set_focused(self.focus == Focus::Location);
    }

    fn set_step(&mut self, step: Step) {
        self.step = step;
        self.focus = Self::first_focus(step);
        self.sync_focus();
    }

    fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Name => Focus::Age,
            Focus::Age => Focus::Name,
            Focus::Location => Focus::Relationship,
            Focus::Relationship => Focus::Location,
            Focus::Options => Focus::Options,
        };
        self.sync_focus();
    }

    fn focused_field(&mut self) -> Option<&mut TextField> {
        match self.focus {
            Focus::Name => Some(&mut self.name),
            Focus::Age => Some(&mut self.age),
            Focus::Location => Some(&mut self.location),
            Focus::Relationship | Focus::Options => None,
        }
    }

    /// Enter: advance, or finish on the last step. Disabled buttons swallow the key.
    fn advance(&mut self) -> Option<Action> {
        if !self.can_continue() {
            return None;
        }
        match self.step.next() {
            Some(next) => {
                self.set_step(next);
                None
            }
            None if !self.completed => {
                let profile = self.profile()?;
                self.completed = true;
                tracing::info!(stage = %profile.stage, "onboarding finished");
                Some(Intent::CompleteOnboarding(profile).into())
            }
            None => None,
        }
    }

    fn step_back(&mut self) -> bool {
        match self.step.prev() {
            Some(prev) => {
                self.set_step(prev);
                true
            }
            None => false,
        }
    }

    fn move_option(&mut self, code: KeyCode) -> bool {
        let (cursor, len, columns) = match (self.step, self.focus) {
            (Step::About, Focus::Relationship) => {
                (&mut self.relationship_cursor, Relationship::iter().count(), 4)
            }
            (Step::Journey, Focus::Options) => (&mut self.stage_cursor, Stage::iter().count(), 1),
            (Step::Interests, Focus::Options) => {
                (&mut self.interest_cursor, INTERESTS.len(), INTEREST_COLUMNS)
            }
            _ => return false,
        };
        let delta: isize = match (code, columns) {
            (KeyCode::Up, 1) => -1,
            (KeyCode::Down, 1) => 1,
            (KeyCode::Left | KeyCode::Right, 1) => 0,
            (KeyCode::Left, _) => -1,
            (KeyCode::Right, _) => 1,
            (KeyCode::Up, c) => -(c as isize),
            (KeyCode::Down, c) => c as isize,
            _ => return false,
        };
        *cursor = (*cursor as isize + delta).rem_euclid(len as isize) as usize;
        true
    }

    fn has_text_focus(&self) -> bool {
        matches!(self.focus, Focus::Name | Focus::Age | Focus::Location)
    }

    fn toggle_option(&mut self) -> bool {
        match (self.step, self.focus) {
            (Step::About, Focus::Relationship) => {
                self.relationship = Relationship::iter().nth(self.relationship_cursor);
            }
            (Step::Journey, Focus::Options) => {
                self.stage = Stage::iter().nth(self.stage_cursor);
            }
            (Step::Interests, Focus::Options) => {
                if let Some(on) = self.interests.get_mut(self.interest_cursor) {
                    *on = !*on;
                }
            }
            _ => return false,
        }
        true
    }

    fn option_style(&self, selected: bool, under_cursor: bool, theme: &Theme) -> ratatui::style::Style {
        if selected {
            theme.style(UiGroup::Selected)
        } else if under_cursor {
            theme.style(UiGroup::Accent)
        } else {
            theme.style(UiGroup::Statusline)
        }
    }

    fn draw_basics(&mut self, f: &mut Frame<'_>, area: Rect, theme: &Theme) -> Result<()> {
        let [name, age, _] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .areas(area);
        self.name.draw(f, name, theme)?;
        self.age.draw(f, age, theme)
    }

    fn draw_about(&mut self, f: &mut Frame<'_>, area: Rect, theme: &Theme) -> Result<()> {
        let [location, label, options, _] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);
        self.location.draw(f, location, theme)?;

        let label_style = if self.focus == Focus::Relationship {
            theme.style(UiGroup::Accent)
        } else {
            theme.style(UiGroup::Title)
        };
        f.render_widget(
            Paragraph::new(Line::styled("Relationship Status", label_style)),
            label,
        );
        let focused = self.focus == Focus::Relationship;
        let spans: Vec<Span> = Relationship::iter()
            .enumerate()
            .flat_map(|(i, status)| {
                let style = self.option_style(
                    self.relationship == Some(status),
                    focused && i == self.relationship_cursor,
                    theme,
                );
                [
                    Span::styled(format!(" ♥ {} ", status.label()), style),
                    Span::raw(" "),
                ]
            })
            .collect();
        f.render_widget(Paragraph::new(Line::from(spans)), options);
        Ok(())
    }

    fn draw_journey(&self, f: &mut Frame<'_>, area: Rect, theme: &Theme) {
        let mut lines = vec![
            Line::styled("Where are you in your journey?", theme.style(UiGroup::Title)),
            Line::styled(
                "This helps us connect you with others in similar stages.",
                theme.style(UiGroup::Dimmed),
            ),
            Line::raw(""),
        ];
        for (i, stage) in Stage::iter().enumerate() {
            let style = self.option_style(self.stage == Some(stage), i == self.stage_cursor, theme);
            lines.push(Line::from(Span::styled(
                format!(" {}  {} ", stage.emoji(), stage.label()),
                style,
            )));
        }
        f.render_widget(Paragraph::new(lines), area);
    }

    fn draw_interests(&self, f: &mut Frame<'_>, area: Rect, theme: &Theme) {
        let mut lines = vec![
            Line::styled("What are you interested in?", theme.style(UiGroup::Title)),
            Line::styled(
                "Select activities and interests to help find your community.",
                theme.style(UiGroup::Dimmed),
            ),
            Line::raw(""),
        ];
        for (row, chunk) in INTERESTS.chunks(INTEREST_COLUMNS).enumerate() {
            let spans: Vec<Span> = chunk
                .iter()
                .enumerate()
                .map(|(col, name)| {
                    let i = row * INTEREST_COLUMNS + col;
                    let style = self.option_style(self.interests[i], i == self.interest_cursor, theme);
                    Span::styled(format!(" {name:<12}"), style)
                })
                .collect();
            lines.push(Line::from(spans));
        }
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
    }
}

impl Component for OnboardingScreen {
    fn name(&self) -> &str {
        "onboarding"
    }

    fn keymap_context(&self) -> &'static str {
        "onboarding"
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        let consumed = match key.code {
            KeyCode::Enter => {
                return Ok(Some(EventResponse::Stop(
                    self.advance().unwrap_or(Action::Render),
                )));
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.cycle_focus();
                true
            }
            KeyCode::Char(' ') if !self.has_text_focus() => self.toggle_option(),
            KeyCode::Up | KeyCode::Down if self.has_text_focus() => {
                self.cycle_focus();
                true
            }
            code => match self.focused_field() {
                Some(field) => field.input_key(key),
                None => self.move_option(code),
            },
        };
        Ok(consumed.then_some(EventResponse::Stop(Action::Render)))
    }

    fn handle_paste(&mut self, text: &str) -> Result<Option<EventResponse<Action>>> {
        match self.focused_field() {
            Some(field) => {
                field.insert_str(text);
                Ok(Some(EventResponse::Stop(Action::Render)))
            }
            None => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if *action == Action::Back && self.step_back() {
            return Ok(Some(Action::Render));
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect, theme: &Theme) -> Result<()> {
        let card = centered_rect_fixed(area, 64, 20);
        let block = panel(
            Line::styled(format!(" {} ", self.step.title()), theme.style(UiGroup::Title)),
            true,
            theme,
        );
        let inner = block.inner(card);
        f.render_widget(block, card);

        let [progress, _, body, button, hints] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        let dots: Vec<Span> = (1..=4)
            .map(|i| {
                if i <= self.step.number() {
                    Span::styled("● ", theme.style(UiGroup::Accent))
                } else {
                    Span::styled("○ ", theme.style(UiGroup::Dimmed))
                }
            })
            .chain(std::iter::once(Span::styled(
                format!(" Step {} of 4", self.step.number()),
                theme.style(UiGroup::Dimmed),
            )))
            .collect();
        f.render_widget(Paragraph::new(Line::from(dots)).centered(), progress);

        match self.step {
            Step::Basics => self.draw_basics(f, body, theme)?,
            Step::About => self.draw_about(f, body, theme)?,
            Step::Journey => self.draw_journey(f, body, theme),
            Step::Interests => self.draw_interests(f, body, theme),
        }

        let label = if self.step == Step::Interests {
            "Complete Setup"
        } else {
            "Continue"
        };
        let style = if self.can_continue() {
            theme.style(UiGroup::Selected)
        } else {
            theme.style(UiGroup::Dimmed)
        };
        f.render_widget(
            Paragraph::new(Line::styled(format!("[ {label} → ]"), style)).centered(),
            button,
        );
        f.render_widget(
            Paragraph::new(Line::styled(
                "Tab: next field  Space: select  Enter: continue  Esc: back",
                theme.style(UiGroup::Dimmed),
            ))
            .centered(),
            hints,
        );
        Ok(())
    }
}

impl Screen for OnboardingScreen {
    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        vec![("Enter", "continue"), ("Esc", "back")]
    }
}
