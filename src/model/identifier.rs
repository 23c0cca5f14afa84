use serde::{Deserialize, Serialize};

use super::{Identifiable, Owned, RestrictionLevel, Visible};

/// A reference to a document: either its key or the document itself.
///
/// Compare identifiers through [`Identifier::key`] only; the two forms of
/// the same document are otherwise unequal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier<T> {
    Key(String),
    Resolved(Box<T>),
}

impl<T> Identifier<T> {
    pub fn resolved(&self) -> Option<&T> {
        match self {
            Identifier::Key(_) => None,
            Identifier::Resolved(doc) => Some(doc),
        }
    }
}

impl<T: Identifiable> Identifier<T> {
    pub fn key(&self) -> &str {
        match self {
            Identifier::Key(key) => key,
            Identifier::Resolved(doc) => doc.id(),
        }
    }

    pub fn is(&self, key: &str) -> bool {
        self.key() == key
    }
}

/// A bare key has neither owner nor level of its own; a resolved document
/// answers for itself.
impl<T: Owned> Owned for Identifier<T> {
    fn owner(&self) -> Option<&str> {
        self.resolved().and_then(Owned::owner)
    }
}

impl<T: Visible> Visible for Identifier<T> {
    fn restricted_to(&self) -> Option<RestrictionLevel> {
        self.resolved().and_then(Visible::restricted_to)
    }
}

impl<T> From<String> for Identifier<T> {
    fn from(key: String) -> Self {
        Identifier::Key(key)
    }
}

impl<T> From<&str> for Identifier<T> {
    fn from(key: &str) -> Self {
        Identifier::Key(key.to_owned())
    }
}
