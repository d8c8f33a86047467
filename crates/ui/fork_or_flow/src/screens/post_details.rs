use std::{collections::BTreeSet, sync::Arc};

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    action::Action,
    components::{Component, TextField},
    core::{intent::Intent, state::ItemId},
    data::{Catalog, Comment, Post},
    screens::{back_line, liked_count, panel, Screen, Selection},
    theme::{Theme, UiGroup},
    tui::{EventResponse, Frame},
};

/// A comment written in this session.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LocalComment {
    body: String,
}

pub struct PostDetailsScreen {
    post: Post,
    comments: Vec<Comment>,
    post_liked: bool,
    liked_comments: BTreeSet<ItemId>,
    selection: Selection,
    composer: TextField,
    written: Vec<LocalComment>,
}

impl PostDetailsScreen {
    /// `None` when the catalog has no post `id`.
    pub fn new(catalog: Arc<Catalog>, id: ItemId) -> Option<Self> {
        let post = catalog.posts.get(id)?.clone();
        let comments: Vec<Comment> = catalog.comments_for(id).cloned().collect();
        let liked_comments = comments
            .iter()
            .filter(|c| c.is_liked)
            .map(|c| c.id)
            .collect();
        Some(Self {
            post_liked: post.is_liked,
            post,
            comments,
            liked_comments,
            selection: Selection::default(),
            composer: TextField::new("Add your thoughts").placeholder("Share your perspective..."),
            written: Vec::new(),
        })
    }

    fn comment_count(&self) -> usize {
        self.comments.len() + self.written.len()
    }

    fn toggle_comment_like(&mut self) {
        let Some(i) = self.selection.index(self.comments.len()) else {
            return;
        };
        let id = self.comments[i].id;
        if !self.liked_comments.remove(&id) {
            self.liked_comments.insert(id);
        }
    }

    fn submit(&mut self) -> bool {
        if self.composer.is_blank() {
            return false;
        }
        self.written.push(LocalComment {
            body: self.composer.value().trim().to_string(),
        });
        self.composer.clear();
        true
    }

    fn handle_composer_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.code == KeyCode::Enter {
            self.submit();
            return Some(Action::Render);
        }
        self.composer.input_key(key).then_some(Action::Render)
    }

    fn post_lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        let p = &self.post;
        let likes = liked_count(p.likes, p.is_liked, self.post_liked);
        let heart = if self.post_liked {
            Span::styled(format!("♥ {likes}"), theme.style(UiGroup::Error))
        } else {
            Span::styled(format!("♡ {likes}"), theme.style(UiGroup::Dimmed))
        };
        let tags: String = p.tags.iter().map(|t| format!("#{t} ")).collect();
        vec![
            Line::from(vec![
                Span::styled(format!("({}) ", p.author_initials), theme.style(UiGroup::Accent)),
                Span::styled(p.author.clone(), theme.style(UiGroup::Title)),
                Span::raw("  "),
                Span::styled(format!(" {} ", p.author_stage.label()), theme.style(UiGroup::Badge)),
            ]),
            Line::styled(
                format!("📍 {}  🕑 {}", p.location, p.time_ago),
                theme.style(UiGroup::Dimmed),
            ),
            Line::default(),
            Line::styled(p.content.clone(), theme.style(UiGroup::Statusline)),
            Line::styled(tags, theme.style(UiGroup::Accent)),
            Line::from(vec![
                heart,
                Span::styled(
                    format!("   💬 {}   {} {}", self.comment_count(), p.kind.glyph(), p.kind),
                    theme.style(UiGroup::Dimmed),
                ),
            ]),
        ]
    }

    fn comment_lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        let selected = self.selection.index(self.comments.len());
        let mut lines = vec![Line::styled(
            format!("Comments ({})", self.comment_count()),
            theme.style(UiGroup::Title),
        )];
        for (i, c) in self.comments.iter().enumerate() {
            let liked = self.liked_comments.contains(&c.id);
            let likes = liked_count(c.likes, c.is_liked, liked);
            let name_style = if selected == Some(i) && !self.composer.focused() {
                theme.style(UiGroup::Selected)
            } else {
                theme.style(UiGroup::Title)
            };
            lines.push(Line::default());
            lines.push(Line::from(vec![
                Span::styled(format!("({}) ", c.author_initials), theme.style(UiGroup::Accent)),
                Span::styled(format!(" {} ", c.author), name_style),
                Span::styled(format!(" {}", c.time_ago), theme.style(UiGroup::Dimmed)),
            ]));
            lines.push(Line::styled(
                format!("     {}", c.content),
                theme.style(UiGroup::Statusline),
            ));
            let heart = if liked {
                Span::styled(format!("     ♥ {likes}"), theme.style(UiGroup::Error))
            } else {
                Span::styled(format!("     ♡ {likes}"), theme.style(UiGroup::Dimmed))
            };
            lines.push(Line::from(heart));
        }
        for c in &self.written {
            lines.push(Line::default());
            lines.push(Line::from(vec![
                Span::styled("(Y) ", theme.style(UiGroup::Accent)),
                Span::styled(" You ", theme.style(UiGroup::Title)),
                Span::styled(" now", theme.style(UiGroup::Dimmed)),
            ]));
            lines.push(Line::styled(
                format!("     {}", c.body),
                theme.style(UiGroup::Statusline),
            ));
        }
        lines
    }
}

impl Component for PostDetailsScreen {
    fn name(&self) -> &str {
        "post_details"
    }

    fn keymap_context(&self) -> &'static str {
        "detail"
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        if self.composer.focused() {
            return Ok(self.handle_composer_key(key).map(EventResponse::Stop));
        }
        let len = self.comments.len();
        match key.code {
            KeyCode::Char('l') => self.post_liked = !self.post_liked,
            KeyCode::Up | KeyCode::Char('k') => self.selection.prev(len),
            KeyCode::Down | KeyCode::Char('j') => self.selection.next(len),
            KeyCode::Char(' ') => self.toggle_comment_like(),
            KeyCode::Char('c') => self.composer.set_focused(true),
            _ => return Ok(None),
        }
        Ok(Some(EventResponse::Stop(Action::Render)))
    }

    fn handle_paste(&mut self, text: &str) -> Result<Option<EventResponse<Action>>> {
        self.composer.handle_paste(text)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if *action != Action::Back {
            return Ok(None);
        }
        if self.composer.focused() {
            self.composer.set_focused(false);
            return Ok(Some(Action::Render));
        }
        Ok(Some(Intent::ClearDetailItem.into()))
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect, theme: &Theme) -> Result<()> {
        let [top, body, composer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(area);
        f.render_widget(Paragraph::new(back_line("Post Discussion", theme)), top);

        let mut lines = self.post_lines(theme);
        lines.push(Line::default());
        lines.extend(self.comment_lines(theme));
        let selected = self.selection.index(self.comments.len()).unwrap_or(0);
        let scroll = ((selected * 4) as u16).saturating_sub(body.height / 3);
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

impl Screen for PostDetailsScreen {
    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        if self.composer.focused() {
            vec![("Enter", "comment"), ("Esc", "done")]
        } else {
            vec![
                ("l", "like"),
                ("Space", "like comment"),
                ("c", "comment"),
                ("Esc", "back"),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn id(n: u32) -> ItemId {
        ItemId::new(n).unwrap()
    }

    fn details(n: u32) -> PostDetailsScreen {
        PostDetailsScreen::new(Arc::new(Catalog::embedded().unwrap()), id(n)).unwrap()
    }

    fn press(s: &mut PostDetailsScreen, code: KeyCode) -> Option<EventResponse<Action>> {
        s.handle_key_events(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn unknown_post_has_no_screen() {
        let catalog = Arc::new(Catalog::embedded().unwrap());
        assert!(PostDetailsScreen::new(catalog, id(404)).is_none());
    }

    #[test]
    fn comment_likes_start_from_the_record() {
        let mut s = details(1);
        assert_eq!(s.comments.len(), 4);
        assert!(s.liked_comments.contains(&id(1)));
        // first comment is liked in the record; Space unlikes it
        press(&mut s, KeyCode::Char(' '));
        assert!(!s.liked_comments.contains(&id(1)));
        press(&mut s, KeyCode::Down);
        press(&mut s, KeyCode::Char(' '));
        assert!(s.liked_comments.contains(&id(2)));
    }

    #[test]
    fn post_like_toggles() {
        let mut s = details(1);
        assert!(!s.post_liked);
        press(&mut s, KeyCode::Char('l'));
        assert!(s.post_liked);
    }

    #[test]
    fn composer_appends_non_blank_comments() {
        let mut s = details(1);
        press(&mut s, KeyCode::Char('c'));
        press(&mut s, KeyCode::Enter);
        assert_eq!(s.comment_count(), 4);

        for c in "same here".chars() {
            press(&mut s, KeyCode::Char(c));
        }
        press(&mut s, KeyCode::Enter);
        assert_eq!(s.comment_count(), 5);
        assert_eq!(
            s.written,
            vec![LocalComment {
                body: "same here".into()
            }]
        );
        assert!(s.composer.is_blank());
    }

    #[test]
    fn back_unfocuses_the_composer_before_leaving() {
        let mut s = details(1);
        press(&mut s, KeyCode::Char('c'));
        assert_eq!(s.update(&Action::Back).unwrap(), Some(Action::Render));
        assert_eq!(
            s.update(&Action::Back).unwrap(),
            Some(Intent::ClearDetailItem.into())
        );
    }
}
