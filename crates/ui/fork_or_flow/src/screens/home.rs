use std::{collections::BTreeSet, sync::Arc};

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    action::Action,
    components::{Component, TextField},
    core::{
        intent::Intent,
        state::{ItemId, Profile},
    },
    data::{Catalog, Event},
    screens::{header_layout, panel, Screen, Selection},
    theme::{Theme, UiGroup},
    tui::{EventResponse, Frame},
};

/// Something on the home screen that Enter can activate.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Jump { label: &'static str, tab: &'static str },
    Event(ItemId),
}

/// Quick actions and community links, in selection order.
const JUMPS: [(&str, &str); 4] = [
    ("Find People", "people"),
    ("Browse Feed", "feed"),
    ("12 nearby connections", "people"),
    ("5 new posts", "feed"),
];

/// Chips above the event list. Category chips narrow the list; "This Week"
/// and "Free" are shown but have no data behind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventFilter {
    ThisWeek,
    Social,
    Outdoor,
    Education,
    Creative,
    Free,
}

const EVENT_FILTERS: [EventFilter; 6] = [
    EventFilter::ThisWeek,
    EventFilter::Social,
    EventFilter::Outdoor,
    EventFilter::Education,
    EventFilter::Creative,
    EventFilter::Free,
];

impl EventFilter {
    fn label(self) -> &'static str {
        match self {
            EventFilter::ThisWeek => "This Week",
            EventFilter::Social => "Social",
            EventFilter::Outdoor => "Outdoor",
            EventFilter::Education => "Education",
            EventFilter::Creative => "Creative",
            EventFilter::Free => "Free",
        }
    }

    fn category(self) -> Option<&'static str> {
        match self {
            EventFilter::ThisWeek | EventFilter::Free => None,
            other => Some(other.label()),
        }
    }
}

/// Static activity lines: (who/what, rest, when).
const RECENT_ACTIVITY: [(&str, &str, &str); 3] = [
    ("Sarah", " joined Coffee & Conversation", "2 hours ago"),
    ("New post: ", "\"Anyone else feeling overwhelmed?\"", "4 hours ago"),
    ("Mike", " sent you a message", "Yesterday"),
];

pub struct HomeScreen {
    catalog: Arc<Catalog>,
    profile: Option<Profile>,
    search: TextField,
    filters: BTreeSet<EventFilter>,
    filter_cursor: usize,
    selection: Selection,
}

impl HomeScreen {
    pub fn new(catalog: Arc<Catalog>, profile: Option<Profile>) -> Self {
        Self {
            catalog,
            profile,
            search: TextField::new("").placeholder("Search events..."),
            filters: BTreeSet::new(),
            filter_cursor: 0,
            selection: Selection::default(),
        }
    }

    /// Events whose title or category contains the search term, narrowed by
    /// the selected category chips.
    fn visible_events(&self) -> Vec<&Event> {
        let term = self.search.value().to_lowercase();
        let categories: Vec<&str> = self.filters.iter().filter_map(|f| f.category()).collect();
        self.catalog
            .events
            .all()
            .iter()
            .filter(|e| {
                e.title.to_lowercase().contains(&term) || e.category.to_lowercase().contains(&term)
            })
            .filter(|e| categories.is_empty() || categories.contains(&e.category.as_str()))
            .collect()
    }

    fn entries(&self) -> Vec<Entry> {
        JUMPS
            .iter()
            .map(|&(label, tab)| Entry::Jump { label, tab })
            .chain(self.visible_events().into_iter().map(|e| Entry::Event(e.id)))
            .collect()
    }

    fn selected(&self) -> Option<Entry> {
        let mut entries = self.entries();
        let i = self.selection.index(entries.len())?;
        Some(entries.swap_remove(i))
    }

    fn activate(&self) -> Option<Action> {
        match self.selected()? {
            Entry::Jump { tab, .. } => Some(Intent::navigate(tab).into()),
            Entry::Event(id) => Some(Intent::SelectDetailItem(id).into()),
        }
    }

    fn toggle_filter(&mut self) {
        let filter = EVENT_FILTERS[self.filter_cursor];
        if !self.filters.remove(&filter) {
            self.filters.insert(filter);
        }
    }

    fn jump_line(&self, index: usize, selected: Option<&Entry>, theme: &Theme) -> Line<'static> {
        let (label, tab) = JUMPS[index];
        let style = if selected == Some(&Entry::Jump { label, tab }) {
            theme.style(UiGroup::Selected)
        } else {
            theme.style(UiGroup::Statusline)
        };
        Line::from(Span::styled(format!(" {label} "), style))
    }

    fn chip_line(&self, theme: &Theme) -> Line<'static> {
        let spans: Vec<Span> = EVENT_FILTERS
            .iter()
            .enumerate()
            .flat_map(|(i, filter)| {
                let style = if self.filters.contains(filter) {
                    theme.style(UiGroup::Selected)
                } else if i == self.filter_cursor {
                    theme.style(UiGroup::Focus)
                } else {
                    theme.style(UiGroup::Dimmed)
                };
                let marker = if i == self.filter_cursor { "›" } else { " " };
                [
                    Span::styled(marker, theme.style(UiGroup::Accent)),
                    Span::styled(format!("{} ", filter.label()), style),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn event_lines(&self, selected: Option<&Entry>, theme: &Theme) -> (Vec<Line<'static>>, Option<usize>) {
        let events = self.visible_events();
        if events.is_empty() {
            return (
                vec![Line::styled("No events match your search.", theme.style(UiGroup::Dimmed))],
                None,
            );
        }
        let mut lines = Vec::new();
        let mut selected_row = None;
        for (i, event) in events.iter().enumerate() {
            let is_selected = selected == Some(&Entry::Event(event.id));
            if is_selected {
                selected_row = Some(i * 3);
            }
            let title_style = if is_selected {
                theme.style(UiGroup::Selected)
            } else {
                theme.style(UiGroup::Title)
            };
            let mut title = vec![
                Span::styled(format!(" {} ", event.title), title_style),
                Span::raw(" "),
                Span::styled(format!(" {} ", event.category), theme.style(UiGroup::Badge)),
            ];
            if event.is_attending {
                title.push(Span::raw(" "));
                title.push(Span::styled(" Going ", theme.style(UiGroup::Success)));
            }
            lines.push(Line::from(title));
            lines.push(Line::styled(
                format!("   {} at {}", event.date, event.time),
                theme.style(UiGroup::Dimmed),
            ));
            lines.push(Line::styled(
                format!(
                    "   {} • {} • {}/{} attending",
                    event.location, event.distance, event.attendees, event.max_attendees
                ),
                theme.style(UiGroup::Dimmed),
            ));
        }
        (lines, selected_row)
    }

    fn draw_events(&mut self, f: &mut Frame<'_>, area: Rect, selected: Option<&Entry>, theme: &Theme) -> Result<()> {
        let block = panel(" Upcoming Events ", self.search.focused(), theme);
        let inner = block.inner(area);
        f.render_widget(block, area);
        let [search, chips, list] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(inner);

        let chip_line = self.chip_line(theme);
        let (lines, selected_row) = self.event_lines(selected, theme);
        self.search.draw(f, search, theme)?;
        f.render_widget(Paragraph::new(chip_line), chips);
        let scroll = selected_row.map_or(0, |row| row as u16).saturating_sub(list.height / 2);
        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((scroll, 0)),
            list,
        );
        Ok(())
    }

    fn draw_journey(&self, f: &mut Frame<'_>, area: Rect, theme: &Theme) {
        let block = panel("", false, theme);
        let lines = match &self.profile {
            Some(profile) => vec![
                Line::styled(
                    format!("{}  Your Journey: {}", profile.stage.emoji(), profile.stage.label()),
                    theme.style(UiGroup::Title),
                ),
                Line::styled(
                    "Connect with others exploring the same questions",
                    theme.style(UiGroup::Dimmed),
                ),
                Line::from(Span::styled(
                    format!(" 📍 {} ", profile.location),
                    theme.style(UiGroup::Badge),
                )),
            ],
            None => vec![Line::styled("Your Journey", theme.style(UiGroup::Title))],
        };
        f.render_widget(
            Paragraph::new(lines).block(block).centered().wrap(Wrap { trim: true }),
            area,
        );
    }
}

impl Component for HomeScreen {
    fn name(&self) -> &str {
        "home"
    }

    fn keymap_context(&self) -> &'static str {
        "home"
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        if self.search.focused() {
            match key.code {
                KeyCode::Enter => {
                    self.search.set_focused(false);
                    return Ok(Some(EventResponse::Stop(Action::Render)));
                }
                KeyCode::Up | KeyCode::Down => {}
                _ => {
                    return Ok(self
                        .search
                        .input_key(key)
                        .then_some(EventResponse::Stop(Action::Render)));
                }
            }
        }

        let len = self.entries().len();
        let action = match key.code {
            KeyCode::Char('/') => {
                self.search.set_focused(true);
                Action::Render
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selection.prev(len);
                Action::Render
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selection.next(len);
                Action::Render
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.filter_cursor =
                    (self.filter_cursor + EVENT_FILTERS.len() - 1) % EVENT_FILTERS.len();
                Action::Render
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.filter_cursor = (self.filter_cursor + 1) % EVENT_FILTERS.len();
                Action::Render
            }
            KeyCode::Char(' ') => {
                self.toggle_filter();
                Action::Render
            }
            KeyCode::Enter => match self.activate() {
                Some(action) => action,
                None => return Ok(None),
            },
            _ => return Ok(None),
        };
        Ok(Some(EventResponse::Stop(action)))
    }

    fn handle_paste(&mut self, text: &str) -> Result<Option<EventResponse<Action>>> {
        self.search.handle_paste(text)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if *action == Action::Back && self.search.focused() {
            self.search.set_focused(false);
            return Ok(Some(Action::Render));
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect, theme: &Theme) -> Result<()> {
        let (header, body) = header_layout(area, 3);
        let greeting = match &self.profile {
            Some(p) if !p.name.is_empty() => format!("Welcome back, {}!", p.name),
            _ => "Welcome back!".to_string(),
        };
        f.render_widget(
            Paragraph::new(vec![
                Line::styled(greeting, theme.style(UiGroup::Accent)),
                Line::styled("Find your people, build connections", theme.style(UiGroup::Dimmed)),
            ])
            .block(panel("", false, theme).borders(ratatui::widgets::Borders::BOTTOM)),
            header,
        );

        let [left, right] =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(body);
        let [quick, community, activity] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(6),
            Constraint::Fill(1),
        ])
        .areas(left);

        let selected = self.selected();
        let selected = selected.as_ref();
        f.render_widget(
            Paragraph::new(vec![
                self.jump_line(0, selected, theme),
                self.jump_line(1, selected, theme),
            ])
                .block(panel(" Quick Actions ", false, theme)),
            quick,
        );
        f.render_widget(
            Paragraph::new(vec![
                self.jump_line(2, selected, theme),
                Line::styled("  In your area", theme.style(UiGroup::Dimmed)),
                self.jump_line(3, selected, theme),
                Line::styled("  In your feed", theme.style(UiGroup::Dimmed)),
            ])
            .block(panel(" Your Community ", false, theme)),
            community,
        );

        let activity_lines: Vec<Line> = RECENT_ACTIVITY
            .iter()
            .flat_map(|(who, what, when)| {
                [
                    Line::from(vec![
                        Span::styled("• ", theme.style(UiGroup::Accent)),
                        Span::styled(*who, theme.style(UiGroup::Title)),
                        Span::styled(*what, theme.style(UiGroup::Statusline)),
                    ]),
                    Line::styled(format!("  {when}"), theme.style(UiGroup::Dimmed)),
                ]
            })
            .collect();
        f.render_widget(
            Paragraph::new(activity_lines)
                .block(panel(" Recent Activity ", false, theme))
                .wrap(Wrap { trim: false }),
            activity,
        );

        let [events, journey] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(5)]).areas(right);
        self.draw_events(f, events, selected, theme)?;
        self.draw_journey(f, journey, theme);
        Ok(())
    }
}

impl Screen for HomeScreen {
    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        if self.search.focused() {
            return vec![("Enter", "done"), ("Esc", "stop searching")];
        }
        vec![
            ("↑/↓", "select"),
            ("Enter", "open"),
            ("/", "search events"),
            ("←/→ Space", "filter"),
        ]
    }
}
