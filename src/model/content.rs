use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{Identifiable, Identifier, Owned, RestrictionLevel, User, Visible};

/// One revision of a piece of content. Each revision may carry its own level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edit<T> {
    pub value: T,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted_to: Option<RestrictionLevel>,
}

impl<T> Edit<T> {
    pub fn new(value: T, restricted_to: Option<RestrictionLevel>) -> Self {
        Edit {
            value,
            date: OffsetDateTime::now_utc(),
            restricted_to,
        }
    }
}

impl<T> Owned for Edit<T> {
    fn owner(&self) -> Option<&str> {
        None
    }
}

impl<T> Visible for Edit<T> {
    fn restricted_to(&self) -> Option<RestrictionLevel> {
        self.restricted_to
    }
}

/// Append-only, oldest first.
pub type EditHistory<T> = Vec<Edit<T>>;

/// Owned, visibility-tagged documents with an edit history.
pub trait Content: Identifiable + Owned + Visible {
    type Payload;

    fn history(&self) -> &EditHistory<Self::Payload>;
    fn history_mut(&mut self) -> &mut EditHistory<Self::Payload>;

    fn current(&self) -> Option<&Self::Payload> {
        self.history().last().map(|edit| &edit.value)
    }

    fn push_edit(&mut self, edit: Edit<Self::Payload>) {
        self.history_mut().push(edit);
    }
}

macro_rules! content_impl {
    ($T:ty) => {
        impl Identifiable for $T {
            fn id(&self) -> &str {
                &self.id
            }
        }

        impl Content for $T {
            type Payload = String;

            fn history(&self) -> &EditHistory<String> {
                &self.content
            }

            fn history_mut(&mut self) -> &mut EditHistory<String> {
                &mut self.content
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub owner: Identifier<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted_to: Option<RestrictionLevel>,
    pub title: String,
    pub content: EditHistory<String>,
    #[serde(default)]
    pub likes: u64,
    /// Stored as keys into the comment collection.
    #[serde(default)]
    pub comments: Vec<Identifier<Comment>>,
}

content_impl!(Post);

impl Owned for Post {
    fn owner(&self) -> Option<&str> {
        Some(self.owner.key())
    }
}

impl Visible for Post {
    fn restricted_to(&self) -> Option<RestrictionLevel> {
        self.restricted_to
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub owner: Identifier<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted_to: Option<RestrictionLevel>,
    pub content: EditHistory<String>,
    #[serde(default)]
    pub likes: u64,
}

content_impl!(Comment);

impl Owned for Comment {
    fn owner(&self) -> Option<&str> {
        Some(self.owner.key())
    }
}

impl Visible for Comment {
    fn restricted_to(&self) -> Option<RestrictionLevel> {
        self.restricted_to
    }
}

/// A direct message. Access is decided by conversation membership, so the
/// message itself is always `all`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dm {
    #[serde(rename = "_id")]
    pub id: String,
    pub owner: Identifier<User>,
    pub to: Identifier<User>,
    pub content: EditHistory<String>,
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub read: bool,
}

content_impl!(Dm);

impl Dm {
    pub fn is_member(&self, key: &str) -> bool {
        self.owner.is(key) || self.to.is(key)
    }

    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

impl Owned for Dm {
    fn owner(&self) -> Option<&str> {
        Some(self.owner.key())
    }
}

impl Visible for Dm {
    fn restricted_to(&self) -> Option<RestrictionLevel> {
        Some(RestrictionLevel::All)
    }
}
