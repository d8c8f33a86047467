use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::Paragraph,
};

use crate::{
    action::Action,
    components::{draw_popup_frame, Component, PopupComponent},
    theme::{Theme, UiGroup},
    tui::{EventResponse, Frame},
    ui::keymap::action_for_label,
};

/// Lists the bindings of the current context chain.
///
/// Up/Down move the selection, Enter runs the selected action. Closing is
/// left to the `popup` keymap context (Esc by default) or `Help` again.
pub struct KeymapOverlay {
    title: String,
    entries: Vec<(String, Vec<String>)>,
    selected: usize,
}

impl KeymapOverlay {
    pub fn new(title: impl Into<String>, entries: Vec<(String, Vec<String>)>) -> Self {
        Self {
            title: title.into(),
            entries,
            selected: 0,
        }
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.entries.get(self.selected).map(|(l, _)| l.as_str())
    }
}

impl Component for KeymapOverlay {
    fn name(&self) -> &str {
        "keymap_overlay"
    }

    fn keymap_context(&self) -> &'static str {
        "popup"
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        let len = self.entries.len().max(1);
        match key.code {
            KeyCode::Up => {
                self.selected = (self.selected + len - 1) % len;
                Ok(Some(EventResponse::Stop(Action::Render)))
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1) % len;
                Ok(Some(EventResponse::Stop(Action::Render)))
            }
            KeyCode::Enter => {
                let action = self
                    .selected_label()
                    .and_then(action_for_label)
                    .unwrap_or(Action::ClosePopup);
                Ok(Some(EventResponse::Stop(action)))
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        // running a navigation entry leaves the overlay
        match action {
            Action::Intent(_) | Action::Back | Action::Suspend => Ok(Some(Action::ClosePopup)),
            _ => Ok(None),
        }
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect, theme: &Theme) -> Result<()> {
        // bottom third of the screen, at least six rows
        let overlay_h = (area.height / 3)
            .max(6)
            .max(self.entries.len() as u16 + 2)
            .min(area.height);
        let overlay = Rect {
            x: area.x,
            y: area.y + area.height - overlay_h,
            width: area.width,
            height: overlay_h,
        };
        let inner = draw_popup_frame(f, overlay, &self.title, theme);
        let [left_col, right_col] =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                .areas(inner);

        let mut left: Vec<Line> = Vec::new();
        let mut right: Vec<Line> = Vec::new();
        for (i, (label, chords)) in self.entries.iter().enumerate() {
            let style = if i == self.selected {
                theme.style(UiGroup::Selected)
            } else {
                theme.style(UiGroup::Statusline)
            };
            left.push(Line::from(Span::styled(format!(" {label} "), style)));
            right.push(Line::from(Span::styled(
                chords.join(" / "),
                theme.style(UiGroup::Dimmed),
            )));
        }
        f.render_widget(Paragraph::new(Text::from(left)), left_col);
        f.render_widget(Paragraph::new(Text::from(right)), right_col);
        Ok(())
    }
}

impl PopupComponent for KeymapOverlay {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::intent::Intent;
    use crate::core::state::Tab;
    use crossterm::event::KeyModifiers;

    fn overlay() -> KeymapOverlay {
        KeymapOverlay::new(
            "Keymap",
            vec![
                ("Back".into(), vec!["esc".into()]),
                ("GoFeed".into(), vec!["3".into()]),
            ],
        )
    }

    fn press(o: &mut KeymapOverlay, code: KeyCode) -> Option<EventResponse<Action>> {
        o.handle_key_events(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn selection_wraps() {
        let mut o = overlay();
        press(&mut o, KeyCode::Up);
        assert_eq!(o.selected_label(), Some("GoFeed"));
        press(&mut o, KeyCode::Down);
        assert_eq!(o.selected_label(), Some("Back"));
    }

    #[test]
    fn enter_runs_selected_entry_and_then_closes() {
        let mut o = overlay();
        press(&mut o, KeyCode::Down);
        let goto = Action::Intent(Intent::ChangeTab(Tab::Feed));
        assert_eq!(press(&mut o, KeyCode::Enter), Some(EventResponse::Stop(goto.clone())));
        assert_eq!(o.update(&goto).unwrap(), Some(Action::ClosePopup));
    }

    #[test]
    fn esc_is_left_to_the_keymap() {
        let mut o = overlay();
        assert_eq!(press(&mut o, KeyCode::Esc), None);
    }
}
