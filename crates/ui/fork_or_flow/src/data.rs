//! Mock community records.
//!
//! Everything is read from an embedded JSON asset once at start-up and never
//! written back. Screens keep their own local overlays (likes, RSVPs, sent
//! messages) on top of these records.

use color_eyre::{eyre::WrapErr, Result};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::core::state::ItemId;

const MOCK_DATA: &str = include_str!("../assets/mock_data.json");

/// Where someone stands on the question of having kids.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Stage {
    LeaningYes,
    Undecided,
    LeaningNo,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::LeaningYes => "Leaning Yes",
            Stage::Undecided => "Undecided",
            Stage::LeaningNo => "Leaning No",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Stage::LeaningYes => "✨",
            Stage::Undecided => "🤔",
            Stage::LeaningNo => "🌱",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Relationship {
    Single,
    Dating,
    Partnered,
    Married,
}

impl Relationship {
    pub fn label(self) -> &'static str {
        match self {
            Relationship::Single => "Single",
            Relationship::Dating => "Dating",
            Relationship::Partnered => "Partnered",
            Relationship::Married => "Married",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PostKind {
    Thought,
    Question,
}

impl PostKind {
    pub fn glyph(self) -> &'static str {
        match self {
            PostKind::Thought => "💭",
            PostKind::Question => "❓",
        }
    }
}

/// Anything addressable by an `ItemId`.
pub trait Record {
    fn id(&self) -> ItemId;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: ItemId,
    pub name: String,
    pub age: u16,
    pub location: String,
    pub stage: Stage,
    pub interests: Vec<String>,
    pub bio: String,
    pub mutual_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub name: String,
    pub initials: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: ItemId,
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub distance: String,
    pub attendees: u32,
    pub max_attendees: u32,
    pub category: String,
    pub description: String,
    /// Name of the hosting person; resolved against `people`.
    pub host: String,
    pub is_attending: bool,
    #[serde(default)]
    pub attendee_list: Vec<Attendee>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: ItemId,
    pub author: String,
    pub author_initials: String,
    pub author_stage: Stage,
    pub location: String,
    pub time_ago: String,
    pub content: String,
    pub likes: u32,
    pub comments: u32,
    pub is_liked: bool,
    pub tags: Vec<String>,
    pub kind: PostKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: ItemId,
    pub post_id: ItemId,
    pub author: String,
    pub author_initials: String,
    pub time_ago: String,
    pub content: String,
    pub likes: u32,
    pub is_liked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ItemId,
    pub name: String,
    pub initials: String,
    pub last_message: String,
    pub timestamp: String,
    pub unread: u32,
    pub online: bool,
    #[serde(default)]
    pub is_group: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: ItemId,
    pub conversation_id: ItemId,
    pub sender: String,
    pub body: String,
    pub timestamp: String,
    pub is_self: bool,
}

macro_rules! impl_record {
    ($($ty:ty),* $(,)?) => {
        $(impl Record for $ty {
            fn id(&self) -> ItemId {
                self.id
            }
        })*
    };
}

impl_record!(Person, Event, Post, Comment, Conversation, ChatMessage);

/// Read-only, ordered collection of records keyed by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSource<T> {
    records: Vec<T>,
}

impl<T: Record> RecordSource<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self { records }
    }

    pub fn all(&self) -> &[T] {
        &self.records
    }

    pub fn get(&self, id: ItemId) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// All mock records the client knows about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub people: RecordSource<Person>,
    pub events: RecordSource<Event>,
    pub posts: RecordSource<Post>,
    pub comments: RecordSource<Comment>,
    pub conversations: RecordSource<Conversation>,
    pub messages: RecordSource<ChatMessage>,
}

impl Catalog {
    /// Decode the catalog compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json(MOCK_DATA).wrap_err("embedded mock data is malformed")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn person_by_name(&self, name: &str) -> Option<&Person> {
        self.people.all().iter().find(|p| p.name == name)
    }

    pub fn comments_for(&self, post: ItemId) -> impl Iterator<Item = &Comment> + '_ {
        self.comments.all().iter().filter(move |c| c.post_id == post)
    }

    pub fn messages_for(&self, conversation: ItemId) -> impl Iterator<Item = &ChatMessage> + '_ {
        self.messages
            .all()
            .iter()
            .filter(move |m| m.conversation_id == conversation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn id(n: u32) -> ItemId {
        ItemId::new(n).expect("non-zero id")
    }

    fn assert_unique_ids<T: Record>(source: &RecordSource<T>) {
        let ids: HashSet<_> = source.all().iter().map(|r| r.id()).collect();
        assert_eq!(ids.len(), source.len());
    }

    #[test]
    fn embedded_catalog_decodes() {
        let catalog = Catalog::embedded().expect("embedded catalog");
        assert_eq!(catalog.people.len(), 4);
        assert_eq!(catalog.events.len(), 4);
        assert_eq!(catalog.posts.len(), 4);
        assert_eq!(catalog.conversations.len(), 4);
        assert_eq!(catalog.comments_for(id(1)).count(), 4);
        assert_eq!(catalog.messages_for(id(1)).count(), 6);
    }

    #[test]
    fn ids_are_unique_per_source() {
        let catalog = Catalog::embedded().expect("embedded catalog");
        assert_unique_ids(&catalog.people);
        assert_unique_ids(&catalog.events);
        assert_unique_ids(&catalog.posts);
        assert_unique_ids(&catalog.comments);
        assert_unique_ids(&catalog.conversations);
        assert_unique_ids(&catalog.messages);
    }

    #[test]
    fn every_event_host_is_a_known_person() {
        let catalog = Catalog::embedded().expect("embedded catalog");
        for event in catalog.events.all() {
            assert!(
                catalog.person_by_name(&event.host).is_some(),
                "unknown host {}",
                event.host
            );
        }
    }

    #[test]
    fn get_misses_unknown_ids() {
        let catalog = Catalog::embedded().expect("embedded catalog");
        assert_eq!(catalog.posts.get(id(3)).map(|p| p.author.as_str()), Some("Elena Rodriguez"));
        assert!(catalog.posts.get(id(99)).is_none());
    }

    #[test]
    fn zero_id_is_rejected() {
        let json = r#"{"people":[],"events":[],"posts":[],"comments":[],
            "conversations":[{"id":0,"name":"x","initials":"X","last_message":"",
            "timestamp":"","unread":0,"online":false}],"messages":[]}"#;
        assert!(Catalog::from_json(json).is_err());
    }

    #[test]
    fn stage_ids_round_trip_through_strum() {
        use std::str::FromStr;
        assert_eq!(Stage::from_str("leaning-yes"), Ok(Stage::LeaningYes));
        assert_eq!(Stage::Undecided.to_string(), "undecided");
    }
}
