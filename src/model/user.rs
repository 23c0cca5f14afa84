use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{Comment, Dm, Identifiable, Identifier, Owned, Post, RestrictionLevel, Visible};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted_to: Option<RestrictionLevel>,
    pub username: String,
    pub email: String,
    /// argon2id PHC string
    pub pass: String,
    #[serde(with = "time::serde::rfc3339")]
    pub signed_up: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_login: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    pub prefs: Preferences,
}

impl User {
    pub fn is_friend(&self, key: &str) -> bool {
        self.profile
            .as_ref()
            .is_some_and(|profile| profile.friends.iter().any(|friend| friend.is(key)))
    }
}

impl Identifiable for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Owned for User {
    fn owner(&self) -> Option<&str> {
        Some(&self.id)
    }
}

impl Visible for User {
    fn restricted_to(&self) -> Option<RestrictionLevel> {
        self.restricted_to
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Identifier<User>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted_to: Option<RestrictionLevel>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub friends: Vec<Identifier<User>>,
    #[serde(default)]
    pub friend_requests: FriendRequests,
    #[serde(default)]
    pub posts: Vec<Identifier<Post>>,
    #[serde(default)]
    pub comments: Vec<Identifier<Comment>>,
    #[serde(default)]
    pub liked_posts: Vec<Identifier<Post>>,
    /// Other participant's key to the messages exchanged with them.
    #[serde(default)]
    pub conversations: BTreeMap<String, Vec<Identifier<Dm>>>,
}

impl Profile {
    pub fn new(id: String, name: String) -> Self {
        Profile {
            id,
            owner: None,
            restricted_to: None,
            name,
            bio: None,
            icon: None,
            friends: Vec::new(),
            friend_requests: FriendRequests::default(),
            posts: Vec::new(),
            comments: Vec::new(),
            liked_posts: Vec::new(),
            conversations: BTreeMap::new(),
        }
    }
}

impl Identifiable for Profile {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Owned for Profile {
    fn owner(&self) -> Option<&str> {
        self.owner.as_ref().map(Identifier::key)
    }
}

impl Visible for Profile {
    fn restricted_to(&self) -> Option<RestrictionLevel> {
        self.restricted_to
    }
}

/// Pending friendships, as user keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FriendRequests {
    #[serde(default)]
    pub incoming: Vec<Identifier<User>>,
    #[serde(default)]
    pub outgoing: Vec<Identifier<User>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub private: bool,
    pub lang: Lang,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            private: false,
            lang: Lang::EnUs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lang {
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "en-GB")]
    EnGb,
}
