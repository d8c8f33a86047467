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
    core::{intent::Intent, state::ItemId},
    data::{Catalog, Person, Stage},
    screens::{header_layout, panel, plural, Screen, Selection},
    theme::{Theme, UiGroup},
    tui::{EventResponse, Frame},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum QuickFilter {
    Nearby,
    Stage(Stage),
    NewMembers,
}

const FILTERS: [QuickFilter; 5] = [
    QuickFilter::Nearby,
    QuickFilter::Stage(Stage::LeaningYes),
    QuickFilter::Stage(Stage::Undecided),
    QuickFilter::Stage(Stage::LeaningNo),
    QuickFilter::NewMembers,
];

impl QuickFilter {
    fn label(self) -> &'static str {
        match self {
            QuickFilter::Nearby => "Nearby",
            QuickFilter::Stage(stage) => stage.label(),
            QuickFilter::NewMembers => "New Members",
        }
    }
}

pub struct PeopleScreen {
    catalog: Arc<Catalog>,
    search: TextField,
    filters: BTreeSet<QuickFilter>,
    filter_cursor: usize,
    connected: BTreeSet<ItemId>,
    selection: Selection,
}

impl PeopleScreen {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            search: TextField::new("").placeholder("Search by name or interests..."),
            filters: BTreeSet::new(),
            filter_cursor: 0,
            connected: BTreeSet::new(),
            selection: Selection::default(),
        }
    }

    /// People matching the search term and the selected stage chips.
    fn visible(&self) -> Vec<&Person> {
        let term = self.search.value().to_lowercase();
        let stages: Vec<Stage> = self
            .filters
            .iter()
            .filter_map(|f| match f {
                QuickFilter::Stage(s) => Some(*s),
                _ => None,
            })
            .collect();
        self.catalog
            .people
            .all()
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&term)
                    || p.interests.iter().any(|i| i.to_lowercase().contains(&term))
            })
            .filter(|p| stages.is_empty() || stages.contains(&p.stage))
            .collect()
    }

    fn selected_id(&self) -> Option<ItemId> {
        let people = self.visible();
        self.selection
            .index(people.len())
            .map(|i| people[i].id)
    }

    fn toggle_filter(&mut self) {
        let filter = FILTERS[self.filter_cursor];
        if !self.filters.remove(&filter) {
            self.filters.insert(filter);
        }
        self.selection.reset();
    }

    fn toggle_connect(&mut self) {
        if let Some(id) = self.selected_id() {
            if !self.connected.remove(&id) {
                self.connected.insert(id);
            }
        }
    }

    fn person_lines(&self, person: &Person, selected: bool, theme: &Theme) -> Vec<Line<'static>> {
        let name_style = if selected {
            theme.style(UiGroup::Selected)
        } else {
            theme.style(UiGroup::Title)
        };
        let interests: Vec<Span> = person
            .interests
            .iter()
            .map(|i| Span::styled(format!(" {i} "), theme.style(UiGroup::Badge)))
            .flat_map(|s| [s, Span::raw(" ")])
            .collect();
        let connect = if self.connected.contains(&person.id) {
            Span::styled(" ✓ Connected ", theme.style(UiGroup::Success))
        } else {
            Span::styled(" ☕ Connect ", theme.style(UiGroup::Accent))
        };
        vec![
            Line::from(vec![
                Span::raw(format!("{} ", person.stage.emoji())),
                Span::styled(format!(" {}, {} ", person.name, person.age), name_style),
                Span::raw("  "),
                Span::styled(format!("({})", person.stage.label()), theme.style(UiGroup::Dimmed)),
            ]),
            Line::styled(format!("   📍 {}", person.location), theme.style(UiGroup::Dimmed)),
            Line::styled(format!("   {}", person.bio), theme.style(UiGroup::Statusline)),
            Line::from([vec![Span::raw("   ")], interests].concat()),
            Line::from(vec![
                Span::styled(
                    format!(
                        "   ♥ {}   ",
                        plural(person.mutual_connections, "mutual connection", "mutual connections")
                    ),
                    theme.style(UiGroup::Dimmed),
                ),
                connect,
                Span::raw(" "),
                Span::styled(" ✉ Message ", theme.style(UiGroup::Statusline)),
            ]),
            Line::default(),
        ]
    }
}

impl Component for PeopleScreen {
    fn name(&self) -> &str {
        "people"
    }

    fn keymap_context(&self) -> &'static str {
        "people"
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
                    if self.search.input_key(key) {
                        self.selection.reset();
                        return Ok(Some(EventResponse::Stop(Action::Render)));
                    }
                    return Ok(None);
                }
            }
        }

        let len = self.visible().len();
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
                self.filter_cursor = (self.filter_cursor + FILTERS.len() - 1) % FILTERS.len();
                Action::Render
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.filter_cursor = (self.filter_cursor + 1) % FILTERS.len();
                Action::Render
            }
            KeyCode::Char(' ') => {
                self.toggle_filter();
                Action::Render
            }
            KeyCode::Char('c') => {
                self.toggle_connect();
                Action::Render
            }
            KeyCode::Char('m') => Intent::navigate("messages").into(),
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
        let (header, body) = header_layout(area, 6);
        let [title, search, chips] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .margin(0)
        .areas(header);

        f.render_widget(
            Paragraph::new(Line::styled("Find Your People", theme.style(UiGroup::Accent))),
            title,
        );
        self.search.draw(f, search, theme)?;

        let chip_spans: Vec<Span> = FILTERS
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
                    Span::styled(format!(" {} ", filter.label()), style),
                ]
            })
            .collect();
        f.render_widget(Paragraph::new(Line::from(chip_spans)), chips);

        let people = self.visible();
        let selected = self.selection.index(people.len());
        let mut lines = Vec::new();
        if people.is_empty() {
            lines.push(Line::styled(
                "No one matches your search.",
                theme.style(UiGroup::Dimmed),
            ));
        }
        for (i, person) in people.iter().enumerate() {
            lines.extend(self.person_lines(person, selected == Some(i), theme));
        }
        // keep the selected card in view
        let scroll = selected.map_or(0, |i| (i * 6) as u16).saturating_sub(body.height / 2);
        f.render_widget(
            Paragraph::new(lines)
                .block(panel("", false, theme))
                .wrap(Wrap { trim: false })
                .scroll((scroll, 0)),
            body,
        );
        Ok(())
    }
}

impl Screen for PeopleScreen {
    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        if self.search.focused() {
            return vec![("Enter", "done"), ("Esc", "stop searching")];
        }
        vec![
            ("/", "search"),
            ("←/→ Space", "filter"),
            ("c", "connect"),
            ("m", "message"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn people() -> PeopleScreen {
        PeopleScreen::new(Arc::new(Catalog::embedded().unwrap()))
    }

    fn press(s: &mut PeopleScreen, code: KeyCode) -> Option<EventResponse<Action>> {
        s.handle_key_events(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn names(s: &PeopleScreen) -> Vec<String> {
        s.visible().iter().map(|p| p.name.clone()).collect()
    }

    fn search(s: &mut PeopleScreen, term: &str) {
        press(s, KeyCode::Char('/'));
        for c in term.chars() {
            press(s, KeyCode::Char(c));
        }
    }

    #[test]
    fn search_matches_names_and_interests_case_insensitively() {
        let mut s = people();
        search(&mut s, "COFFEE");
        assert_eq!(names(&s), vec!["Sarah Chen", "David Kim"]);

        let mut s = people();
        search(&mut s, "elena");
        assert_eq!(names(&s), vec!["Elena Rodriguez"]);
    }

    #[test]
    fn typing_while_searching_does_not_trigger_shortcuts() {
        let mut s = people();
        search(&mut s, "m");
        assert_eq!(s.search.value(), "m");
        assert!(s.connected.is_empty());
    }

    #[test]
    fn back_leaves_search_but_keeps_the_term() {
        let mut s = people();
        search(&mut s, "kim");
        assert_eq!(s.update(&Action::Back).unwrap(), Some(Action::Render));
        assert!(!s.search.focused());
        assert_eq!(names(&s), vec!["David Kim"]);
        // not searching anymore, so Back is not ours
        assert_eq!(s.update(&Action::Back).unwrap(), None);
    }

    #[test]
    fn stage_chips_narrow_the_list() {
        let mut s = people();
        // cursor to "Undecided"
        press(&mut s, KeyCode::Right);
        press(&mut s, KeyCode::Right);
        press(&mut s, KeyCode::Char(' '));
        assert_eq!(names(&s), vec!["Marcus Johnson", "David Kim"]);
        press(&mut s, KeyCode::Char(' '));
        assert_eq!(names(&s).len(), 4);
    }

    #[test]
    fn selected_chips_keep_chip_order() {
        let mut s = people();
        // toggle "New Members", then "Leaning No", then "Leaning Yes"
        for _ in 0..4 {
            press(&mut s, KeyCode::Right);
        }
        press(&mut s, KeyCode::Char(' '));
        press(&mut s, KeyCode::Left);
        press(&mut s, KeyCode::Char(' '));
        press(&mut s, KeyCode::Left);
        press(&mut s, KeyCode::Left);
        press(&mut s, KeyCode::Char(' '));
        let selected: Vec<QuickFilter> = s.filters.iter().copied().collect();
        let in_chip_order: Vec<QuickFilter> = FILTERS
            .iter()
            .copied()
            .filter(|f| s.filters.contains(f))
            .collect();
        assert_eq!(selected, in_chip_order);
        assert!(Stage::LeaningYes < Stage::Undecided && Stage::Undecided < Stage::LeaningNo);
    }

    #[test]
    fn display_only_chips_keep_everyone() {
        let mut s = people();
        press(&mut s, KeyCode::Char(' '));
        assert!(s.filters.contains(&QuickFilter::Nearby));
        assert_eq!(names(&s).len(), 4);
    }

    #[test]
    fn connect_toggles_locally_and_message_jumps_to_messages() {
        let mut s = people();
        press(&mut s, KeyCode::Down);
        press(&mut s, KeyCode::Char('c'));
        assert_eq!(s.connected.len(), 1);
        press(&mut s, KeyCode::Char('c'));
        assert!(s.connected.is_empty());
        assert_eq!(
            press(&mut s, KeyCode::Char('m')),
            Some(EventResponse::Stop(Intent::navigate("messages").into()))
        );
    }
}
