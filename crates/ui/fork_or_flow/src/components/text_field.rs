use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tui_input::{Input, InputRequest};

use crate::{
    action::Action,
    components::Component,
    theme::{Theme, UiGroup},
    tui::{EventResponse, Frame},
};

/// Single-line text input with a placeholder.
///
/// Consumes printable characters and the usual editing keys while focused;
/// Enter, Esc, Tab and Up/Down are left to the owner.
pub struct TextField {
    label: String,
    placeholder: String,
    input: Input,
    focused: bool,
    digits_only: bool,
    max_len: Option<usize>,
}

fn request_for(key: KeyEvent) -> Option<InputRequest> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let req = match key.code {
        KeyCode::Char('u') if ctrl => InputRequest::DeleteLine,
        KeyCode::Char('w') if ctrl => InputRequest::DeletePrevWord,
        KeyCode::Char(c) if !ctrl && !alt => InputRequest::InsertChar(c),
        KeyCode::Backspace => InputRequest::DeletePrevChar,
        KeyCode::Delete => InputRequest::DeleteNextChar,
        KeyCode::Left if ctrl => InputRequest::GoToPrevWord,
        KeyCode::Right if ctrl => InputRequest::GoToNextWord,
        KeyCode::Left => InputRequest::GoToPrevChar,
        KeyCode::Right => InputRequest::GoToNextChar,
        KeyCode::Home => InputRequest::GoToStart,
        KeyCode::End => InputRequest::GoToEnd,
        _ => return None,
    };
    Some(req)
}

impl TextField {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            placeholder: String::new(),
            input: Input::default(),
            focused: false,
            digits_only: false,
            max_len: None,
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn digits_only(mut self) -> Self {
        self.digits_only = true;
        self
    }

    pub fn max_len(mut self, max: usize) -> Self {
        self.max_len = Some(max);
        self
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn is_blank(&self) -> bool {
        self.value().trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.input.reset();
    }

    fn accepts(&self, c: char) -> bool {
        if self.digits_only && !c.is_ascii_digit() {
            return false;
        }
        match self.max_len {
            Some(max) => self.value().chars().count() < max,
            None => true,
        }
    }

    /// Apply one key. Returns whether the key was consumed.
    pub fn input_key(&mut self, key: KeyEvent) -> bool {
        let Some(req) = request_for(key) else {
            return false;
        };
        if let InputRequest::InsertChar(c) = req {
            if !self.accepts(c) {
                // rejected characters are still swallowed while typing
                return true;
            }
        }
        self.input.handle(req);
        true
    }

    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars().filter(|c| !c.is_control()) {
            if self.accepts(c) {
                self.input.handle(InputRequest::InsertChar(c));
            }
        }
    }
}

impl Component for TextField {
    fn name(&self) -> &str {
        &self.label
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        if self.focused && self.input_key(key) {
            return Ok(Some(EventResponse::Stop(Action::Render)));
        }
        Ok(None)
    }

    fn handle_paste(&mut self, text: &str) -> Result<Option<EventResponse<Action>>> {
        if !self.focused {
            return Ok(None);
        }
        self.insert_str(text);
        Ok(Some(EventResponse::Stop(Action::Render)))
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect, theme: &Theme) -> Result<()> {
        let border = if self.focused {
            theme.style(UiGroup::Focus)
        } else {
            theme.style(UiGroup::Border)
        };
        let mut block = Block::default().borders(Borders::ALL).border_style(border);
        if !self.label.is_empty() {
            block = block.title(Span::styled(
                format!(" {} ", self.label),
                theme.style(UiGroup::Title),
            ));
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let width = inner.width.max(1) as usize;
        let scroll = self.input.visual_scroll(width.saturating_sub(1));
        let line = if self.value().is_empty() {
            Line::from(Span::styled(self.placeholder.as_str(), theme.style(UiGroup::Dimmed)))
        } else {
            Line::from(Span::styled(self.value(), theme.style(UiGroup::Statusline)))
        };
        frame.render_widget(Paragraph::new(line).scroll((0, scroll as u16)), inner);

        if self.focused && inner.height > 0 {
            let x = self.input.visual_cursor().saturating_sub(scroll) as u16;
            frame.set_cursor_position(Position::new(inner.x + x.min(inner.width), inner.y));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(field: &mut TextField, s: &str) {
        for c in s.chars() {
            field.input_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    #[test]
    fn typing_and_backspace() {
        let mut field = TextField::new("Name");
        type_str(&mut field, "Robin");
        field.input_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
        assert_eq!(field.value(), "Robi");
    }

    #[test]
    fn digits_only_swallows_letters() {
        let mut field = TextField::new("Age").digits_only().max_len(3);
        type_str(&mut field, "3a41");
        assert_eq!(field.value(), "341");
        type_str(&mut field, "9");
        assert_eq!(field.value(), "341");
    }

    #[test]
    fn unfocused_field_ignores_events() {
        let mut field = TextField::new("Search");
        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(field.handle_key_events(key).unwrap(), None);
        field.set_focused(true);
        assert_eq!(
            field.handle_key_events(key).unwrap(),
            Some(EventResponse::Stop(Action::Render))
        );
        assert_eq!(field.value(), "x");
    }

    #[test]
    fn navigation_keys_are_left_to_the_owner() {
        let mut field = TextField::new("");
        for code in [KeyCode::Enter, KeyCode::Esc, KeyCode::Tab, KeyCode::Up] {
            assert!(!field.input_key(KeyEvent::new(code, KeyModifiers::NONE)));
        }
    }

    #[test]
    fn blank_detection_trims() {
        let mut field = TextField::new("");
        field.insert_str("   ");
        assert!(field.is_blank());
        field.insert_str("hi\n");
        assert_eq!(field.value(), "   hi");
        assert!(!field.is_blank());
    }
}
