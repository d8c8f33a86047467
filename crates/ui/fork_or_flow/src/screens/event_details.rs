use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    action::Action,
    components::Component,
    core::{intent::Intent, state::ItemId},
    data::{Catalog, Event},
    screens::{back_line, panel, plural, Screen},
    theme::{Theme, UiGroup},
    tui::{EventResponse, Frame},
};

/// Full view of one event with a local RSVP and favourite toggle.
pub struct EventDetailsScreen {
    catalog: Arc<Catalog>,
    event: Event,
    attending: bool,
    favourite: bool,
    scroll: u16,
}

impl EventDetailsScreen {
    /// `None` when the catalog has no event `id`.
    pub fn new(catalog: Arc<Catalog>, id: ItemId) -> Option<Self> {
        let event = catalog.events.get(id)?.clone();
        Some(Self {
            attending: event.is_attending,
            catalog,
            event,
            favourite: false,
            scroll: 0,
        })
    }

    /// Attendee count including the local RSVP.
    fn attendee_count(&self) -> u32 {
        match (self.event.is_attending, self.attending) {
            (false, true) => self.event.attendees + 1,
            (true, false) => self.event.attendees.saturating_sub(1),
            _ => self.event.attendees,
        }
    }

    fn spots_remaining(&self) -> u32 {
        self.event.max_attendees.saturating_sub(self.attendee_count())
    }

    fn info_lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        let e = &self.event;
        let mut lines = vec![
            Line::from(vec![
                Span::styled("📅 ", theme.style(UiGroup::Accent)),
                Span::styled(e.date.clone(), theme.style(UiGroup::Title)),
            ]),
            Line::styled(format!("   {}", e.time), theme.style(UiGroup::Dimmed)),
            Line::from(vec![
                Span::styled("📍 ", theme.style(UiGroup::Accent)),
                Span::styled(e.location.clone(), theme.style(UiGroup::Title)),
            ]),
        ];
        if let Some(address) = &e.address {
            lines.push(Line::styled(format!("   {address}"), theme.style(UiGroup::Dimmed)));
        }
        lines.push(Line::styled(
            format!("   {} away", e.distance),
            theme.style(UiGroup::Dimmed),
        ));
        lines.push(Line::from(vec![
            Span::styled("👥 ", theme.style(UiGroup::Accent)),
            Span::styled(
                format!("{}/{} attending", self.attendee_count(), e.max_attendees),
                theme.style(UiGroup::Title),
            ),
        ]));
        lines.push(Line::styled(
            format!(
                "   {} remaining",
                plural(self.spots_remaining(), "spot", "spots")
            ),
            theme.style(UiGroup::Dimmed),
        ));
        lines
    }

    fn host_lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        let host = &self.event.host;
        match self.catalog.person_by_name(host) {
            Some(person) => vec![Line::from(vec![
                Span::raw(format!("{} ", person.stage.emoji())),
                Span::styled(
                    format!("{}, {}", person.name, person.age),
                    theme.style(UiGroup::Title),
                ),
                Span::raw("  "),
                Span::styled(
                    format!(" {} ", person.stage.label()),
                    theme.style(UiGroup::Badge),
                ),
                Span::styled("   View Profile (p)", theme.style(UiGroup::Dimmed)),
            ])],
            None => vec![Line::styled(host.clone(), theme.style(UiGroup::Title))],
        }
    }

    fn attendee_lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        if self.event.attendee_list.is_empty() {
            return vec![Line::styled(
                "Be the first to join.",
                theme.style(UiGroup::Dimmed),
            )];
        }
        let spans: Vec<Span> = self
            .event
            .attendee_list
            .iter()
            .flat_map(|a| {
                [
                    Span::styled(format!("({})", a.initials), theme.style(UiGroup::Accent)),
                    Span::styled(format!(" {}   ", a.name), theme.style(UiGroup::Dimmed)),
                ]
            })
            .collect();
        vec![Line::from(spans)]
    }
}

impl Component for EventDetailsScreen {
    fn name(&self) -> &str {
        "event_details"
    }

    fn keymap_context(&self) -> &'static str {
        "detail"
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        let action = match key.code {
            KeyCode::Char('r') | KeyCode::Enter => {
                self.attending = !self.attending;
                Action::Render
            }
            KeyCode::Char('f') => {
                self.favourite = !self.favourite;
                Action::Render
            }
            KeyCode::Char('p') => Intent::navigate("people").into(),
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = self.scroll.saturating_add(1);
                Action::Render
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                Action::Render
            }
            _ => return Ok(None),
        };
        Ok(Some(EventResponse::Stop(action)))
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Back => Ok(Some(Intent::ClearDetailItem.into())),
            _ => Ok(None),
        }
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect, theme: &Theme) -> Result<()> {
        let [top, body, rsvp] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(area);

        let heart = if self.favourite {
            Span::styled("♥", theme.style(UiGroup::Error))
        } else {
            Span::styled("♡", theme.style(UiGroup::Dimmed))
        };
        let mut badges = vec![Span::styled(
            format!(" {} ", self.event.category),
            theme.style(UiGroup::Selected),
        )];
        if self.attending {
            badges.push(Span::raw(" "));
            badges.push(Span::styled(" Going ", theme.style(UiGroup::Badge)));
        }
        f.render_widget(
            Paragraph::new(vec![
                Line::from(vec![back_line("Back", theme).spans, vec![Span::raw("   "), heart]].concat()),
                Line::from(badges),
                Line::styled(self.event.title.clone(), theme.style(UiGroup::Accent)),
            ]),
            top,
        );

        let mut lines = self.info_lines(theme);
        for (title, section) in [
            ("About This Event", vec![Line::styled(
                self.event.description.clone(),
                theme.style(UiGroup::Statusline),
            )]),
            ("Hosted by", self.host_lines(theme)),
            ("Who's Going", self.attendee_lines(theme)),
        ] {
            lines.push(Line::default());
            lines.push(Line::styled(title, theme.style(UiGroup::Title)));
            lines.extend(section);
        }
        f.render_widget(
            Paragraph::new(lines)
                .block(panel("", false, theme))
                .wrap(Wrap { trim: true })
                .scroll((self.scroll, 0)),
            body,
        );

        let (label, style) = if self.attending {
            ("Cancel RSVP (r)", theme.style(UiGroup::Statusline))
        } else {
            ("Join This Event (r)", theme.style(UiGroup::Selected))
        };
        f.render_widget(
            Paragraph::new(Line::styled(format!(" {label} "), style))
                .centered()
                .block(panel("", true, theme)),
            rsvp,
        );
        Ok(())
    }
}

impl Screen for EventDetailsScreen {
    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        vec![("r", "RSVP"), ("f", "favourite"), ("p", "host"), ("Esc", "back")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn id(n: u32) -> ItemId {
        ItemId::new(n).unwrap()
    }

    fn details(n: u32) -> EventDetailsScreen {
        EventDetailsScreen::new(Arc::new(Catalog::embedded().unwrap()), id(n)).unwrap()
    }

    fn press(s: &mut EventDetailsScreen, code: KeyCode) -> Option<EventResponse<Action>> {
        s.handle_key_events(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn unknown_event_has_no_screen() {
        let catalog = Arc::new(Catalog::embedded().unwrap());
        assert!(EventDetailsScreen::new(catalog, id(99)).is_none());
    }

    #[test]
    fn rsvp_adjusts_count_and_spots() {
        // 12/15, not attending
        let mut s = details(1);
        assert_eq!((s.attendee_count(), s.spots_remaining()), (12, 3));
        press(&mut s, KeyCode::Char('r'));
        assert!(s.attending);
        assert_eq!((s.attendee_count(), s.spots_remaining()), (13, 2));
        press(&mut s, KeyCode::Enter);
        assert_eq!(s.attendee_count(), 12);
    }

    #[test]
    fn cancelling_an_existing_rsvp_frees_a_spot() {
        // 8/12, already attending
        let mut s = details(2);
        assert!(s.attending);
        press(&mut s, KeyCode::Char('r'));
        assert_eq!((s.attendee_count(), s.spots_remaining()), (7, 5));
    }

    #[test]
    fn back_clears_the_detail_item() {
        let mut s = details(1);
        assert_eq!(
            s.update(&Action::Back).unwrap(),
            Some(Intent::ClearDetailItem.into())
        );
        assert_eq!(s.update(&Action::Tick).unwrap(), None);
    }

    #[test]
    fn host_profile_jumps_to_people() {
        let mut s = details(1);
        assert_eq!(
            press(&mut s, KeyCode::Char('p')),
            Some(EventResponse::Stop(Intent::navigate("people").into()))
        );
        press(&mut s, KeyCode::Char('f'));
        assert!(s.favourite);
    }
}
