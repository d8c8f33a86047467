use color_eyre::Result;
use ratatui::{layout::Rect, text::Line, widgets::Paragraph};

use crate::{
    action::Action,
    components::Component,
    core::{intent::Intent, state::ItemId},
    screens::{back_line, panel, Screen},
    theme::{Theme, UiGroup},
    tui::Frame,
};

/// Shown for a detail overlay whose item is not in the catalog.
pub struct NotFoundScreen {
    kind: &'static str,
    id: ItemId,
}

impl NotFoundScreen {
    pub fn new(kind: &'static str, id: ItemId) -> Self {
        Self { kind, id }
    }

    fn title(&self) -> String {
        format!("{} not found", self.kind)
    }
}

impl Component for NotFoundScreen {
    fn name(&self) -> &str {
        "not_found"
    }

    fn keymap_context(&self) -> &'static str {
        "detail"
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Back => Ok(Some(Intent::ClearDetailItem.into())),
            _ => Ok(None),
        }
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect, theme: &Theme) -> Result<()> {
        let lines = vec![
            Line::styled(self.title(), theme.style(UiGroup::Error)),
            Line::default(),
            Line::styled(
                format!("Nothing is stored under id {}.", self.id),
                theme.style(UiGroup::Dimmed),
            ),
            Line::default(),
            back_line("Back", theme),
        ];
        f.render_widget(
            Paragraph::new(lines)
                .centered()
                .block(panel("", false, theme)),
            area,
        );
        Ok(())
    }
}

impl Screen for NotFoundScreen {
    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        vec![("Esc", "back")]
    }
}
