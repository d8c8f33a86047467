use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Stylize,
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
};

use crate::{
    action::Action,
    components::{centered_rect_fixed, draw_popup_frame, Component, PopupComponent},
    theme::{Theme, UiGroup},
    tui::{EventResponse, Frame},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Ok,
    Cancel,
}

/// Modal yes/no question.
///
/// - Left/Right or Tab/BackTab: switch button
/// - Enter: emit the confirm action (OK) or close (Cancel)
/// - Esc: close
///
/// Once the confirm action comes back through `update`, the popup asks to be
/// closed.
pub struct ConfirmPopup {
    title: String,
    question: String,
    ok_label: String,
    cancel_label: String,
    on_confirm: Action,
    selected: Choice,
}

impl ConfirmPopup {
    pub fn new<T: Into<String>, Q: Into<String>>(title: T, question: Q, on_confirm: Action) -> Self {
        Self {
            title: title.into(),
            question: question.into(),
            ok_label: "OK".into(),
            cancel_label: "Cancel".into(),
            on_confirm,
            selected: Choice::Ok,
        }
    }

    pub fn ok_label<S: Into<String>>(mut self, label: S) -> Self {
        self.ok_label = label.into();
        self
    }

    pub fn cancel_label<S: Into<String>>(mut self, label: S) -> Self {
        self.cancel_label = label.into();
        self
    }

    fn toggle_selection(&mut self) {
        self.selected = match self.selected {
            Choice::Ok => Choice::Cancel,
            Choice::Cancel => Choice::Ok,
        };
    }

    fn button(&self, label: &str, choice: Choice, theme: &Theme) -> Span<'static> {
        let style = if self.selected == choice {
            theme.style(UiGroup::Selected)
        } else {
            theme.style(UiGroup::Statusline)
        };
        Span::styled(format!("[ {label} ]"), style)
    }
}

impl Component for ConfirmPopup {
    fn name(&self) -> &str {
        "confirm"
    }

    fn keymap_context(&self) -> &'static str {
        "popup"
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        let action = match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.toggle_selection();
                Some(Action::Render)
            }
            KeyCode::Enter => self.submit_action(),
            KeyCode::Esc => PopupComponent::cancel_action(self),
            _ => None,
        };
        Ok(action.map(EventResponse::Stop))
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if *action == self.on_confirm {
            return Ok(Some(Action::ClosePopup));
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect, theme: &Theme) -> Result<()> {
        if area.width < 5 || area.height < 5 {
            return Ok(());
        }
        let (w, h) = self.size_hint();
        let dialog = centered_rect_fixed(area, w, h);
        let inner = draw_popup_frame(f, dialog, &self.title, theme);

        let mut lines: Vec<Line> = self.question.lines().map(Line::raw).collect();
        if inner.height >= 3 {
            lines.push(Line::raw(""));
        }

        let spacing = "   ";
        let buttons_len = (4 + self.ok_label.len()) + spacing.len() + (4 + self.cancel_label.len());
        let pad = (inner.width as usize).saturating_sub(buttons_len) / 2;
        lines.push(Line::from(vec![
            Span::raw(" ".repeat(pad)),
            self.button(&self.ok_label, Choice::Ok, theme),
            Span::raw(spacing),
            self.button(&self.cancel_label, Choice::Cancel, theme),
        ]));

        if inner.height >= 4 {
            lines.push(Line::raw(""));
            lines.push(
                Line::from(vec![
                    Span::raw("←/→/Tab").bold(),
                    Span::raw(": Select   "),
                    Span::raw("Enter").bold(),
                    Span::raw(": Confirm   "),
                    Span::raw("Esc").bold(),
                    Span::raw(": Cancel"),
                ])
                .style(theme.style(UiGroup::Dimmed)),
            );
        }

        f.render_widget(
            Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true }),
            inner,
        );
        Ok(())
    }
}

impl PopupComponent for ConfirmPopup {
    fn submit_action(&mut self) -> Option<Action> {
        match self.selected {
            Choice::Ok => Some(self.on_confirm.clone()),
            Choice::Cancel => Some(Action::ClosePopup),
        }
    }

    fn size_hint(&self) -> (u16, u16) {
        (52, 9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(popup: &mut ConfirmPopup, code: KeyCode) -> Option<EventResponse<Action>> {
        popup
            .handle_key_events(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn enter_on_ok_emits_confirm_action() {
        let mut popup = ConfirmPopup::new("Quit", "Leave?", Action::Quit);
        assert_eq!(
            press(&mut popup, KeyCode::Enter),
            Some(EventResponse::Stop(Action::Quit))
        );
        assert_eq!(popup.update(&Action::Quit).unwrap(), Some(Action::ClosePopup));
    }

    #[test]
    fn switching_to_cancel_only_closes() {
        let mut popup = ConfirmPopup::new("Quit", "Leave?", Action::Quit);
        press(&mut popup, KeyCode::Tab);
        assert_eq!(
            press(&mut popup, KeyCode::Enter),
            Some(EventResponse::Stop(Action::ClosePopup))
        );
    }

    #[test]
    fn esc_closes_and_other_keys_fall_through() {
        let mut popup = ConfirmPopup::new("Quit", "Leave?", Action::Quit);
        assert_eq!(
            press(&mut popup, KeyCode::Esc),
            Some(EventResponse::Stop(Action::ClosePopup))
        );
        assert_eq!(press(&mut popup, KeyCode::Char('x')), None);
    }
}
