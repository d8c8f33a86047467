use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    theme::{Theme, UiGroup},
    tui::Frame,
};

/// One-line footer.
///
/// Left: the current view and keymap context. Middle: the screen's key hints.
/// Right: colour mode and the help key.
pub struct StatusBar<'a> {
    pub view: String,
    pub context: &'a str,
    pub hints: &'a [(&'static str, &'static str)],
}

impl StatusBar<'_> {
    pub fn draw(&self, frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
        let [left, right] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(18)]).areas(area);

        let mut spans = vec![
            Span::styled(format!(" {} ", self.view), theme.style(UiGroup::Selected)),
            Span::styled(format!(" {} ", self.context), theme.style(UiGroup::Dimmed)),
        ];
        for (key, what) in self.hints {
            spans.push(Span::styled(format!(" {key}"), theme.style(UiGroup::Accent)));
            spans.push(Span::styled(format!(" {what} "), theme.style(UiGroup::Statusline)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), left);

        let right_line = Line::from(vec![
            Span::styled(format!(" {} ", theme.mode_label()), theme.style(UiGroup::Dimmed)),
            Span::styled(" ? help ", theme.style(UiGroup::Statusline)),
        ])
        .right_aligned();
        frame.render_widget(Paragraph::new(right_line), right);
    }
}
