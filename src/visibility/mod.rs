//! Decides which parts of an owned document a requester may read.
//!
//! [`allowed`] checks the document's own level first. Only if that passes
//! does it descend into the children that carry a level of their own,
//! dropping every child the requester may not see. Denial is `None`, never
//! an error: a store failure while looking up an owner just counts as an
//! owner that could not be found.

mod redact;

pub use redact::Redact;

use std::{collections::HashMap, sync::Arc};

use futures_util::future::join_all;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    db::{self, DocumentStore},
    model::{Gate, Identifier, User},
};

/// Returns the part of `data` that `requester` may read, or `None` if the
/// document is hidden from them entirely.
///
/// `owner_hint` is the already fetched owner, if the caller has it. It only
/// counts when it is the document's actual owner; documents without an owner
/// field inherit it.
pub async fn allowed<T: Redact>(
    store: &dyn DocumentStore,
    data: &T,
    requester: &Identifier<User>,
    owner_hint: Option<&User>,
) -> Option<T> {
    let hint = owner_hint.filter(|hint| data.owner().is_none_or(|owner| owner == hint.id));
    if owner_hint.is_some() && hint.is_none() {
        debug!("ignoring owner hint for a different owner");
    }

    let resolver = Resolver::new(store, requester.key());
    if let Some(hint) = hint {
        resolver.remember(hint).await;
    }
    resolver.resolve(data, hint.map(|hint| hint.id.as_str())).await
}

/// State for one [`allowed`] call: the requester and the owners looked up so far.
pub struct Resolver<'a> {
    store: &'a dyn DocumentStore,
    requester: String,
    owners: Mutex<HashMap<String, Option<Arc<User>>>>,
}

impl<'a> Resolver<'a> {
    fn new(store: &'a dyn DocumentStore, requester: &str) -> Self {
        Resolver {
            store,
            requester: requester.to_owned(),
            owners: Mutex::new(HashMap::new()),
        }
    }

    async fn remember(&self, owner: &User) {
        self.owners
            .lock()
            .await
            .insert(owner.id.clone(), Some(Arc::new(owner.clone())));
    }

    async fn resolve<T: Redact>(&self, data: &T, inherited: Option<&str>) -> Option<T> {
        let Some(owner) = data.owner().or(inherited) else {
            debug!(requester = %self.requester, "denied: no owner");
            return None;
        };

        let gate = Gate::from(data.restricted_to());
        if !self.admits(gate, owner).await {
            debug!(requester = %self.requester, owner, ?gate, "denied");
            return None;
        }

        let mut copy = data.clone();
        copy.redact_fields(self, owner).await;
        Some(copy)
    }

    async fn admits(&self, gate: Gate, owner: &str) -> bool {
        match gate {
            Gate::All => true,
            Gate::Owner => self.is_owner(owner),
            Gate::Friends => self
                .owner(owner)
                .await
                .is_some_and(|user| user.is_friend(&self.requester)),
            Gate::Unset => match self.owner(owner).await {
                Some(user) if user.prefs.private => self.is_owner(owner),
                Some(_) => true,
                None => false,
            },
        }
    }

    fn is_owner(&self, owner: &str) -> bool {
        self.requester == owner
    }

    async fn owner(&self, key: &str) -> Option<Arc<User>> {
        let mut owners = self.owners.lock().await;
        if let Some(known) = owners.get(key) {
            return known.clone();
        }

        let fetched = match db::get::<User>(self.store, key).await {
            Ok(user) => user.map(Arc::new),
            Err(err) => {
                warn!(owner = key, %err, "owner lookup failed");
                None
            }
        };
        owners.insert(key.to_owned(), fetched.clone());
        fetched
    }

    /// Resolves an optional child, clearing it when denied.
    pub async fn field<T: Redact>(&self, field: &mut Option<T>, owner: &str) {
        let Some(value) = field.as_ref() else {
            return;
        };
        if value.restricted_to().is_none() {
            return;
        }

        let resolved = self.resolve(value, Some(owner)).await;
        if resolved.is_none() {
            debug!(owner, "redacted field");
        }
        *field = resolved;
    }

    /// Resolves every element of a list of children, dropping denied ones.
    pub async fn list<T: Redact>(&self, items: &mut Vec<T>, owner: &str) {
        let resolved = join_all(items.iter().map(|item| async move {
            match item.restricted_to() {
                Some(_) => self.resolve(item, Some(owner)).await,
                None => Some(item.clone()),
            }
        }))
        .await;

        let before = items.len();
        *items = resolved.into_iter().flatten().collect();
        if items.len() < before {
            debug!(owner, redacted = before - items.len(), "redacted list entries");
        }
    }
}
