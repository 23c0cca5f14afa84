//! Owned, visibility-tagged documents.

mod content;
mod identifier;
mod restriction;
mod user;

pub use content::{Comment, Content, Dm, Edit, EditHistory, Post};
pub use identifier::Identifier;
pub use restriction::{Gate, RestrictionLevel};
pub use user::{FriendRequests, Lang, Preferences, Profile, User};

use uuid::Uuid;

pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Documents whose visibility is decided against an owning user.
///
/// `None` means the owner is inherited from the containing document.
pub trait Owned {
    fn owner(&self) -> Option<&str>;
}

pub trait Visible {
    fn restricted_to(&self) -> Option<RestrictionLevel>;
}

/// Fresh document key, e.g. `post-0191d0c2...`.
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::now_v7().simple())
}

#[cfg(test)]
pub(crate) fn test_user(id: &str, private: bool) -> User {
    let now = time::OffsetDateTime::now_utc();
    User {
        id: id.to_owned(),
        restricted_to: None,
        username: format!("{id}-name"),
        email: format!("{id}@example.com"),
        pass: String::new(),
        signed_up: now,
        last_login: now,
        profile: Some(Profile::new(new_id("profile"), format!("{id}-name"))),
        prefs: Preferences {
            private,
            lang: Lang::EnUs,
        },
    }
}
