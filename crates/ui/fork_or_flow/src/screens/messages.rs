use std::{collections::BTreeSet, sync::Arc};

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    action::Action,
    components::{Component, TextField},
    core::state::ItemId,
    data::{Catalog, Conversation},
    screens::{header_layout, panel, Screen, Selection},
    theme::{Theme, UiGroup},
    tui::{EventResponse, Frame},
};

/// A message typed in this session. Never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SentMessage {
    conversation: ItemId,
    body: String,
    timestamp: String,
}

fn now_label() -> String {
    chrono::Local::now().format("%-I:%M %p").to_string()
}

pub struct MessagesScreen {
    catalog: Arc<Catalog>,
    search: TextField,
    selection: Selection,
    open: Option<ItemId>,
    composer: TextField,
    sent: Vec<SentMessage>,
    read: BTreeSet<ItemId>,
}

impl MessagesScreen {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            search: TextField::new("").placeholder("Search conversations..."),
            selection: Selection::default(),
            open: None,
            composer: TextField::new("").placeholder("Type a message..."),
            sent: Vec::new(),
            read: BTreeSet::new(),
        }
    }

    fn visible(&self) -> Vec<&Conversation> {
        let term = self.search.value().to_lowercase();
        self.catalog
            .conversations
            .all()
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&term))
            .collect()
    }

    fn unread(&self, conversation: &Conversation) -> u32 {
        if self.read.contains(&conversation.id) {
            0
        } else {
            conversation.unread
        }
    }

    fn open_selected(&mut self) -> bool {
        let conversations = self.visible();
        let Some(id) = self
            .selection
            .index(conversations.len())
            .map(|i| conversations[i].id)
        else {
            return false;
        };
        self.open = Some(id);
        self.read.insert(id);
        self.search.set_focused(false);
        self.composer.clear();
        self.composer.set_focused(true);
        true
    }

    fn close(&mut self) {
        self.open = None;
        self.composer.set_focused(false);
    }

    /// Append the draft to the open conversation. Blank drafts are kept.
    fn send(&mut self, timestamp: String) -> bool {
        let Some(conversation) = self.open else {
            return false;
        };
        if self.composer.is_blank() {
            return false;
        }
        self.sent.push(SentMessage {
            conversation,
            body: self.composer.value().trim().to_string(),
            timestamp,
        });
        self.composer.clear();
        true
    }

    fn handle_chat_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.code == KeyCode::Enter {
            self.send(now_label());
            return Some(Action::Render);
        }
        self.composer.input_key(key).then_some(Action::Render)
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.search.focused() {
            match key.code {
                KeyCode::Enter => {
                    self.search.set_focused(false);
                    return Some(Action::Render);
                }
                KeyCode::Up | KeyCode::Down => {}
                _ => {
                    if self.search.input_key(key) {
                        self.selection.reset();
                        return Some(Action::Render);
                    }
                    return None;
                }
            }
        }
        let len = self.visible().len();
        match key.code {
            KeyCode::Char('/') => self.search.set_focused(true),
            KeyCode::Up | KeyCode::Char('k') => self.selection.prev(len),
            KeyCode::Down | KeyCode::Char('j') => self.selection.next(len),
            KeyCode::Enter => {
                if !self.open_selected() {
                    return None;
                }
            }
            _ => return None,
        }
        Some(Action::Render)
    }

    fn draw_list(&mut self, f: &mut Frame<'_>, area: Rect, theme: &Theme) -> Result<()> {
        let (header, body) = header_layout(area, 4);
        let [title, search] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(3)]).areas(header);
        f.render_widget(
            Paragraph::new(Line::styled("Messages", theme.style(UiGroup::Accent))),
            title,
        );
        self.search.draw(f, search, theme)?;

        let conversations = self.visible();
        let selected = self.selection.index(conversations.len());
        let mut lines = Vec::new();
        if conversations.is_empty() {
            lines.push(Line::styled(
                "No conversations match.",
                theme.style(UiGroup::Dimmed),
            ));
        }
        for (i, c) in conversations.iter().enumerate() {
            let name_style = if selected == Some(i) {
                theme.style(UiGroup::Selected)
            } else {
                theme.style(UiGroup::Title)
            };
            let presence = if c.online {
                Span::styled("● ", theme.style(UiGroup::Success))
            } else {
                Span::styled("○ ", theme.style(UiGroup::Dimmed))
            };
            let mut first = vec![
                presence,
                Span::styled(format!("({}) ", c.initials), theme.style(UiGroup::Accent)),
                Span::styled(format!(" {} ", c.name), name_style),
            ];
            if c.is_group {
                first.push(Span::styled(" Group ", theme.style(UiGroup::Badge)));
            }
            first.push(Span::styled(
                format!("  {}", c.timestamp),
                theme.style(UiGroup::Dimmed),
            ));
            let mut second = vec![Span::styled(
                format!("     {}", c.last_message),
                theme.style(UiGroup::Statusline),
            )];
            let unread = self.unread(c);
            if unread > 0 {
                second.push(Span::raw(" "));
                second.push(Span::styled(format!(" {unread} "), theme.style(UiGroup::Selected)));
            }
            lines.push(Line::from(first));
            lines.push(Line::from(second));
            lines.push(Line::default());
        }
        f.render_widget(Paragraph::new(lines).block(panel("", false, theme)), body);
        Ok(())
    }

    fn draw_chat(
        &mut self,
        f: &mut Frame<'_>,
        area: Rect,
        id: ItemId,
        theme: &Theme,
    ) -> Result<()> {
        let [header, body, composer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(area);

        let (name, presence) = match self.catalog.conversations.get(id) {
            Some(c) if c.online => (c.name.as_str(), "Online"),
            Some(c) => (c.name.as_str(), "Last seen 2h ago"),
            None => ("Conversation", ""),
        };
        f.render_widget(
            Paragraph::new(vec![
                Line::from(vec![
                    Span::styled("← ", theme.style(UiGroup::Accent)),
                    Span::styled(name.to_string(), theme.style(UiGroup::Title)),
                ]),
                Line::styled(format!("  {presence}"), theme.style(UiGroup::Dimmed)),
            ])
            .block(panel("", false, theme)),
            header,
        );

        let history = self
            .catalog
            .messages_for(id)
            .map(|m| (m.is_self, m.body.clone(), m.timestamp.clone()))
            .chain(
                self.sent
                    .iter()
                    .filter(|m| m.conversation == id)
                    .map(|m| (true, m.body.clone(), m.timestamp.clone())),
            );
        let mut lines = Vec::new();
        for (is_self, body, timestamp) in history {
            let (alignment, style) = if is_self {
                (Alignment::Right, theme.style(UiGroup::Selected))
            } else {
                (Alignment::Left, theme.style(UiGroup::Statusline))
            };
            lines.push(Line::styled(format!(" {body} "), style).alignment(alignment));
            lines.push(Line::styled(timestamp, theme.style(UiGroup::Dimmed)).alignment(alignment));
            lines.push(Line::default());
        }
        if lines.is_empty() {
            lines.push(Line::styled("No messages yet.", theme.style(UiGroup::Dimmed)));
        }
        // stick to the newest message
        let height = body.height.saturating_sub(2);
        let scroll = (lines.len() as u16).saturating_sub(height);
        f.render_widget(
            Paragraph::new(lines)
                .block(panel("", false, theme))
                .wrap(Wrap { trim: true })
                .scroll((scroll, 0)),
            body,
        );
        self.composer.draw(f, composer, theme)
    }
}

impl Component for MessagesScreen {
    fn name(&self) -> &str {
        "messages"
    }

    fn keymap_context(&self) -> &'static str {
        "messages"
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        let action = if self.open.is_some() {
            self.handle_chat_key(key)
        } else {
            self.handle_list_key(key)
        };
        Ok(action.map(EventResponse::Stop))
    }

    fn handle_paste(&mut self, text: &str) -> Result<Option<EventResponse<Action>>> {
        if self.open.is_some() {
            self.composer.handle_paste(text)
        } else {
            self.search.handle_paste(text)
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if *action != Action::Back {
            return Ok(None);
        }
        if self.open.is_some() {
            self.close();
        } else if self.search.focused() {
            self.search.set_focused(false);
        } else {
            return Ok(None);
        }
        Ok(Some(Action::Render))
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect, theme: &Theme) -> Result<()> {
        match self.open {
            Some(id) => self.draw_chat(f, area, id, theme),
            None => self.draw_list(f, area, theme),
        }
    }
}

impl Screen for MessagesScreen {
    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        if self.open.is_some() {
            vec![("Enter", "send"), ("Esc", "conversations")]
        } else if self.search.focused() {
            vec![("Enter", "done"), ("Esc", "stop searching")]
        } else {
            vec![("/", "search"), ("↑/↓", "select"), ("Enter", "open")]
        }
    }
}
