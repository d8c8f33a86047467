use std::{collections::BTreeSet, sync::Arc};

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use tracing::debug;

use crate::{
    action::Action,
    components::{centered_rect_fixed, draw_popup_frame, render_backdrop, Component, TextField},
    core::{intent::Intent, state::ItemId},
    data::{Catalog, Post, PostKind},
    screens::{header_layout, liked_count, panel, Screen, Selection},
    theme::{Theme, UiGroup},
    tui::{EventResponse, Frame},
};

const TOPICS: [&str; 7] = [
    "All",
    "Questions",
    "Thoughts",
    "Support",
    "Experiences",
    "Relationships",
    "Local",
];

fn topic_matches(topic: &str, post: &Post) -> bool {
    match topic {
        "All" => true,
        "Questions" => post.kind == PostKind::Question,
        "Thoughts" => post.kind == PostKind::Thought,
        "Local" => post.location.contains("San Francisco"),
        other => {
            let needle = other.to_lowercase();
            post.tags.iter().any(|t| t.to_lowercase().contains(&needle))
        }
    }
}

fn displayed_likes(post: &Post, liked: bool) -> u32 {
    liked_count(post.likes, post.is_liked, liked)
}

fn draft_placeholder(kind: PostKind) -> &'static str {
    match kind {
        PostKind::Question => "What would you like to ask the community?",
        PostKind::Thought => "What's on your mind?",
    }
}

/// Local "Share your thoughts" dialog.
struct NewPost {
    kind: PostKind,
    body: TextField,
}

impl NewPost {
    fn new() -> Self {
        let mut body = TextField::new("").placeholder(draft_placeholder(PostKind::Thought));
        body.set_focused(true);
        Self {
            kind: PostKind::Thought,
            body,
        }
    }

    fn toggle_kind(&mut self) {
        self.kind = match self.kind {
            PostKind::Thought => PostKind::Question,
            PostKind::Question => PostKind::Thought,
        };
        self.body.set_placeholder(draft_placeholder(self.kind));
    }
}

pub struct FeedScreen {
    catalog: Arc<Catalog>,
    topic: usize,
    liked: BTreeSet<ItemId>,
    selection: Selection,
    new_post: Option<NewPost>,
}

impl FeedScreen {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let liked = catalog
            .posts
            .all()
            .iter()
            .filter(|p| p.is_liked)
            .map(|p| p.id)
            .collect();
        Self {
            catalog,
            topic: 0,
            liked,
            selection: Selection::default(),
            new_post: None,
        }
    }

    fn visible(&self) -> Vec<&Post> {
        let topic = TOPICS[self.topic];
        self.catalog
            .posts
            .all()
            .iter()
            .filter(|p| topic_matches(topic, p))
            .collect()
    }

    fn selected_id(&self) -> Option<ItemId> {
        let posts = self.visible();
        self.selection.index(posts.len()).map(|i| posts[i].id)
    }

    fn toggle_like(&mut self) {
        if let Some(id) = self.selected_id() {
            if !self.liked.remove(&id) {
                self.liked.insert(id);
            }
        }
    }

    fn set_topic(&mut self, topic: usize) {
        self.topic = topic % TOPICS.len();
        self.selection.reset();
    }

    /// Keys while the dialog is open. Everything but control chords is
    /// swallowed.
    fn handle_new_post_key(&mut self, key: KeyEvent) -> Option<EventResponse<Action>> {
        let draft = self.new_post.as_mut()?;
        match key.code {
            KeyCode::Esc => self.new_post = None,
            KeyCode::Tab => draft.toggle_kind(),
            KeyCode::Enter => {
                if !draft.body.is_blank() {
                    debug!(kind = %draft.kind, len = draft.body.value().len(), "post shared");
                    self.new_post = None;
                }
            }
            _ => {
                let consumed = draft.body.input_key(key);
                if !consumed && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return None;
                }
            }
        }
        Some(EventResponse::Stop(Action::Render))
    }

    fn post_lines(&self, post: &Post, selected: bool, theme: &Theme) -> Vec<Line<'static>> {
        let liked = self.liked.contains(&post.id);
        let author_style = if selected {
            theme.style(UiGroup::Selected)
        } else {
            theme.style(UiGroup::Title)
        };
        let heart = if liked {
            Span::styled(
                format!("♥ {}", displayed_likes(post, liked)),
                theme.style(UiGroup::Error),
            )
        } else {
            Span::styled(
                format!("♡ {}", displayed_likes(post, liked)),
                theme.style(UiGroup::Dimmed),
            )
        };
        let tags: String = post.tags.iter().map(|t| format!("#{t} ")).collect();
        vec![
            Line::from(vec![
                Span::styled(format!("({}) ", post.author_initials), theme.style(UiGroup::Accent)),
                Span::styled(format!(" {} ", post.author), author_style),
                Span::styled(
                    format!(" {} ", post.author_stage.label()),
                    theme.style(UiGroup::Badge),
                ),
            ]),
            Line::styled(
                format!("     📍 {}  🕑 {}", post.location, post.time_ago),
                theme.style(UiGroup::Dimmed),
            ),
            Line::styled(format!("     {}", post.content), theme.style(UiGroup::Statusline)),
            Line::styled(format!("     {tags}"), theme.style(UiGroup::Accent)),
            Line::from(vec![
                Span::raw("     "),
                heart,
                Span::styled(format!("   💬 {}", post.comments), theme.style(UiGroup::Dimmed)),
                Span::styled(
                    format!("   {} {}", post.kind.glyph(), post.kind),
                    theme.style(UiGroup::Dimmed),
                ),
            ]),
            Line::default(),
        ]
    }

    fn draw_new_post(&mut self, f: &mut Frame<'_>, area: Rect, theme: &Theme) -> Result<()> {
        let Some(draft) = self.new_post.as_mut() else {
            return Ok(());
        };
        render_backdrop(f, area);
        let popup = centered_rect_fixed(area, 60, 11);
        let inner = draw_popup_frame(f, popup, "Share your thoughts", theme);
        let [kinds, body, buttons] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .areas(inner);

        let kind_span = |kind: PostKind, label: &'static str| {
            let style = if draft.kind == kind {
                theme.style(UiGroup::Selected)
            } else {
                theme.style(UiGroup::Dimmed)
            };
            Span::styled(format!(" {} {label} ", kind.glyph()), style)
        };
        f.render_widget(
            Paragraph::new(Line::from(vec![
                kind_span(PostKind::Thought, "Thought"),
                Span::raw("  "),
                kind_span(PostKind::Question, "Question"),
                Span::styled("   (Tab switches)", theme.style(UiGroup::Dimmed)),
            ])),
            kinds,
        );
        draft.body.draw(f, body, theme)?;

        let share = if draft.body.is_blank() {
            theme.style(UiGroup::Dimmed)
        } else {
            theme.style(UiGroup::Selected)
        };
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" Cancel (Esc) ", theme.style(UiGroup::Statusline)),
                Span::raw("   "),
                Span::styled(" Share (Enter) ", share),
            ]))
            .centered(),
            buttons,
        );
        Ok(())
    }
}

impl Component for FeedScreen {
    fn name(&self) -> &str {
        "feed"
    }

    fn keymap_context(&self) -> &'static str {
        "feed"
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        if self.new_post.is_some() {
            return Ok(self.handle_new_post_key(key));
        }
        let len = self.visible().len();
        let action = match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selection.prev(len);
                Action::Render
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selection.next(len);
                Action::Render
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.set_topic(self.topic + TOPICS.len() - 1);
                Action::Render
            }
            KeyCode::Right => {
                self.set_topic(self.topic + 1);
                Action::Render
            }
            KeyCode::Char('l') => {
                self.toggle_like();
                Action::Render
            }
            KeyCode::Char('n') => {
                self.new_post = Some(NewPost::new());
                Action::Render
            }
            KeyCode::Enter => match self.selected_id() {
                Some(id) => Intent::SelectDetailItem(id).into(),
                None => return Ok(None),
            },
            _ => return Ok(None),
        };
        Ok(Some(EventResponse::Stop(action)))
    }

    fn handle_paste(&mut self, text: &str) -> Result<Option<EventResponse<Action>>> {
        match self.new_post.as_mut() {
            Some(draft) => draft.body.handle_paste(text),
            None => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if *action == Action::Back && self.new_post.take().is_some() {
            return Ok(Some(Action::Render));
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect, theme: &Theme) -> Result<()> {
        let (header, body) = header_layout(area, 3);
        let [title, chips] =
            Layout::vertical([Constraint::Length(2), Constraint::Length(1)]).areas(header);
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Community Feed", theme.style(UiGroup::Accent)),
                Span::raw("   "),
                Span::styled(" + Post (n) ", theme.style(UiGroup::Selected)),
            ])),
            title,
        );
        let chip_spans: Vec<Span> = TOPICS
            .iter()
            .enumerate()
            .map(|(i, topic)| {
                let style = if i == self.topic {
                    theme.style(UiGroup::Selected)
                } else {
                    theme.style(UiGroup::Dimmed)
                };
                Span::styled(format!(" {topic} "), style)
            })
            .collect();
        f.render_widget(Paragraph::new(Line::from(chip_spans)), chips);

        let posts = self.visible();
        let selected = self.selection.index(posts.len());
        let mut lines = Vec::new();
        if posts.is_empty() {
            lines.push(Line::styled(
                "Nothing here yet for this topic.",
                theme.style(UiGroup::Dimmed),
            ));
        }
        for (i, post) in posts.iter().enumerate() {
            lines.extend(self.post_lines(post, selected == Some(i), theme));
        }
        let scroll = selected.map_or(0, |i| (i * 8) as u16).saturating_sub(body.height / 2);
        f.render_widget(
            Paragraph::new(lines)
                .block(panel("", false, theme))
                .wrap(Wrap { trim: false })
                .scroll((scroll, 0)),
            body,
        );

        self.draw_new_post(f, area, theme)
    }
}

impl Screen for FeedScreen {
    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        if self.new_post.is_some() {
            return vec![("Tab", "thought/question"), ("Enter", "share"), ("Esc", "cancel")];
        }
        vec![
            ("←/→", "topic"),
            ("Enter", "open"),
            ("l", "like"),
            ("n", "new post"),
        ]
    }
}
