//! Frame composition.
//!
//! Layout, top to bottom:
//!   * the current screen (fills the rest),
//!   * the navigation bar, only in the Tab View,
//!   * the status bar, when enabled in the `ui` settings.
//!
//! An open popup is drawn last over the screen area, on a backdrop.

use color_eyre::Result;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::{
    components::{render_backdrop, NavBar, StatusBar},
    core::shell::Shell,
    tui::Frame,
};

/// Split `area` into `(content, nav_bar, status_bar)`.
pub fn layout(area: Rect, nav_bar: bool, status_bar: bool) -> (Rect, Option<Rect>, Option<Rect>) {
    let mut constraints = vec![Constraint::Fill(1)];
    if nav_bar {
        constraints.push(Constraint::Length(NavBar::HEIGHT));
    }
    if status_bar {
        constraints.push(Constraint::Length(1));
    }
    let chunks = Layout::vertical(constraints).split(area);
    let mut rest = chunks.iter().skip(1).copied();
    let nav = if nav_bar { rest.next() } else { None };
    let status = if status_bar { rest.next() } else { None };
    (chunks[0], nav, status)
}

pub fn render(shell: &mut Shell, frame: &mut Frame<'_>) -> Result<()> {
    let theme = shell.theme().clone();
    let session = &shell.state().session;
    let active_tab = session.active_tab();
    let (content, nav, status) = layout(
        frame.area(),
        session.nav_bar_visible(),
        shell.ui_settings().show_status_bar,
    );

    shell.screen_mut().draw(frame, content, &theme)?;

    if let Some(area) = nav {
        NavBar::draw(frame, area, active_tab, &theme);
    }

    if let Some(area) = status {
        let hints = shell.screen().hints();
        StatusBar {
            view: shell.view().label(),
            context: shell.active_context(),
            hints: &hints,
        }
        .draw(frame, area, &theme);
    }

    if let Some(popup) = shell.popup_mut() {
        render_backdrop(frame, content);
        popup.draw(frame, content, &theme)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_drops_hidden_rows() {
        let area = Rect::new(0, 0, 80, 24);
        let (content, nav, status) = layout(area, true, true);
        assert_eq!(content.height, 24 - NavBar::HEIGHT - 1);
        assert_eq!(nav.map(|r| r.height), Some(NavBar::HEIGHT));
        assert_eq!(status.map(|r| r.y), Some(23));

        let (content, nav, status) = layout(area, false, true);
        assert_eq!(content.height, 23);
        assert_eq!(nav, None);
        assert!(status.is_some());

        let (content, nav, status) = layout(area, false, false);
        assert_eq!((content, nav, status), (area, None, None));
    }
}
