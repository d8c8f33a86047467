use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;

use crate::{
    action::Action,
    theme::Theme,
    tui::{Event, EventResponse, Frame},
};

pub mod confirm;
pub mod help;
pub mod nav_bar;
pub mod popup;
pub mod status_bar;
pub mod text_field;

pub use confirm::ConfirmPopup;
pub use help::KeymapOverlay;
pub use nav_bar::NavBar;
pub use popup::{centered_rect_fixed, draw_popup_frame, render_backdrop, PopupComponent};
pub use status_bar::StatusBar;
pub use text_field::TextField;

/// A visual and interactive element: receives events, reacts to actions and
/// draws itself into a given area.
///
/// Screens and popups are components; so are the smaller widgets screens are
/// built from (text fields).
pub trait Component {
    fn name(&self) -> &str;

    /// Keymap context consulted before the global bindings.
    fn keymap_context(&self) -> &'static str {
        "global"
    }

    fn handle_events(&mut self, event: &Event) -> Result<Option<EventResponse<Action>>> {
        let r = match event {
            Event::Key(key_event) => self.handle_key_events(*key_event)?,
            Event::Paste(text) => self.handle_paste(text)?,
            _ => None,
        };
        Ok(r)
    }

    fn handle_key_events(&mut self, _key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        Ok(None)
    }

    fn handle_paste(&mut self, _text: &str) -> Result<Option<EventResponse<Action>>> {
        Ok(None)
    }

    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect, theme: &Theme) -> Result<()>;
}
