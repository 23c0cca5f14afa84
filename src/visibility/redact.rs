use async_trait::async_trait;

use crate::model::{Comment, Dm, Edit, Identifier, Owned, Post, Profile, User, Visible};

use super::Resolver;

/// Documents the resolver can filter.
///
/// Implementors hand each of their visibility-tagged children to the
/// resolver; everything else is copied through untouched.
#[async_trait]
pub trait Redact: Owned + Visible + Clone + Send + Sync {
    async fn redact_fields(&mut self, _resolver: &Resolver<'_>, _owner: &str) {}
}

impl Redact for Profile {}

impl<T: Clone + Send + Sync> Redact for Edit<T> {}

#[async_trait]
impl<T: Redact> Redact for Identifier<T> {
    async fn redact_fields(&mut self, resolver: &Resolver<'_>, owner: &str) {
        if let Identifier::Resolved(doc) = self {
            doc.redact_fields(resolver, owner).await;
        }
    }
}

#[async_trait]
impl Redact for User {
    async fn redact_fields(&mut self, resolver: &Resolver<'_>, owner: &str) {
        resolver.field(&mut self.profile, owner).await;
    }
}

#[async_trait]
impl Redact for Post {
    async fn redact_fields(&mut self, resolver: &Resolver<'_>, owner: &str) {
        futures_util::join!(
            resolver.list(&mut self.content, owner),
            resolver.list(&mut self.comments, owner),
        );
    }
}

#[async_trait]
impl Redact for Comment {
    async fn redact_fields(&mut self, resolver: &Resolver<'_>, owner: &str) {
        resolver.list(&mut self.content, owner).await;
    }
}

#[async_trait]
impl Redact for Dm {
    async fn redact_fields(&mut self, resolver: &Resolver<'_>, owner: &str) {
        resolver.list(&mut self.content, owner).await;
    }
}
