use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Block, Borders, Clear},
};

use crate::{
    action::Action,
    components::Component,
    theme::{Theme, UiGroup},
    tui::Frame,
};

/// Popup components and drawing helpers.
///
/// The shell draws the current screen first, then, when a popup is open:
/// - `render_backdrop(frame, area)`
/// - the popup's own `draw`, which usually centers itself with
///   `centered_rect_fixed` and frames the dialog with `draw_popup_frame`
pub trait PopupComponent: Component {
    /// A modal popup hides the screen's keymap context; only the popup
    /// context resolves keys while it is open.
    fn is_modal(&self) -> bool {
        true
    }

    /// Action emitted on confirm (Enter).
    fn submit_action(&mut self) -> Option<Action> {
        Some(Action::ClosePopup)
    }

    /// Action emitted on cancel (Esc).
    fn cancel_action(&mut self) -> Option<Action> {
        Some(Action::ClosePopup)
    }

    /// Preferred dialog size; clamped to the available area.
    fn size_hint(&self) -> (u16, u16) {
        (60, 10)
    }
}

/// Dim the screen below a popup. Terminals have no transparency, so this
/// paints a solid dark background.
pub fn render_backdrop(frame: &mut Frame<'_>, area: Rect) {
    let backdrop = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(backdrop, area);
}

/// Centered rectangle of a fixed size, clamped to `area`.
pub fn centered_rect_fixed(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);

    let x = area.x.saturating_add((area.width.saturating_sub(w)) / 2);
    let y = area.y.saturating_add((area.height.saturating_sub(h)) / 2);

    Rect {
        x,
        y,
        width: w,
        height: h,
    }
}

/// Clear `area` and draw a rounded, titled frame. Returns the inner area.
pub fn draw_popup_frame(
    frame: &mut Frame<'_>,
    area: Rect,
    title: impl Into<String>,
    theme: &Theme,
) -> Rect {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", title.into()))
        .title_style(theme.style(UiGroup::Title))
        .borders(Borders::ALL)
        .border_set(symbols::border::ROUNDED)
        .border_style(theme.style(UiGroup::Focus));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_clamped_and_centered() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered_rect_fixed(area, 40, 10), Rect::new(20, 7, 40, 10));
        assert_eq!(centered_rect_fixed(area, 200, 50), area);
    }

    #[test]
    fn centered_rect_respects_offset() {
        let area = Rect::new(10, 5, 20, 10);
        assert_eq!(centered_rect_fixed(area, 10, 4), Rect::new(15, 8, 10, 4));
    }
}
