use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    core::state::Tab,
    theme::{Theme, UiGroup},
    tui::Frame,
};

/// One navigation bar control.
#[derive(Debug, Clone, Copy)]
pub struct TabDescriptor {
    pub tab: Tab,
    pub icon: &'static str,
    pub hotkey: &'static str,
    /// Keymap label that selects this tab.
    pub action: &'static str,
}

pub const TABS: [TabDescriptor; 4] = [
    TabDescriptor {
        tab: Tab::Home,
        icon: "⌂",
        hotkey: "1",
        action: "GoHome",
    },
    TabDescriptor {
        tab: Tab::People,
        icon: "☺",
        hotkey: "2",
        action: "GoPeople",
    },
    TabDescriptor {
        tab: Tab::Feed,
        icon: "☰",
        hotkey: "3",
        action: "GoFeed",
    },
    TabDescriptor {
        tab: Tab::Messages,
        icon: "✉",
        hotkey: "4",
        action: "GoMessages",
    },
];

/// Bottom tab bar. Holds no state: the active tab is passed in on every draw
/// and tab changes are requested through the keymap (`GoHome`..`GoMessages`,
/// `NextTab`, `PrevTab`).
pub struct NavBar;

impl NavBar {
    pub const HEIGHT: u16 = 3;

    pub fn draw(frame: &mut Frame<'_>, area: Rect, active: Tab, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(theme.style(UiGroup::Border));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let cells = Layout::horizontal([Constraint::Ratio(1, TABS.len() as u32); TABS.len()])
            .split(inner);
        for (descriptor, cell) in TABS.iter().zip(cells.iter()) {
            let is_active = descriptor.tab == active;
            let style = if is_active {
                theme.style(UiGroup::Accent).add_modifier(Modifier::UNDERLINED)
            } else {
                theme.style(UiGroup::Dimmed)
            };
            let line = Line::from(vec![
                Span::styled(format!("{} ", descriptor.icon), style),
                Span::styled(descriptor.tab.label(), style),
                Span::styled(format!(" [{}]", descriptor.hotkey), theme.style(UiGroup::Dimmed)),
            ])
            .centered();
            frame.render_widget(Paragraph::new(line), *cell);
        }
    }
}
