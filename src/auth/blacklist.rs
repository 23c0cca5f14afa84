use std::{collections::HashMap, sync::Arc, time::Duration};

use time::OffsetDateTime;
use tokio::{sync::RwLock, task::JoinHandle};
use tracing::debug;

/// Revoked token ids, each kept until the token would have expired anyway.
///
/// Empty at process start.
#[derive(Debug, Default)]
pub struct Blacklist {
    entries: RwLock<HashMap<String, OffsetDateTime>>,
}

impl Blacklist {
    pub async fn revoke(&self, jti: &str, until: OffsetDateTime) {
        if until <= OffsetDateTime::now_utc() {
            return;
        }
        self.entries.write().await.insert(jti.to_owned(), until);
    }

    pub async fn is_revoked(&self, jti: &str) -> bool {
        let now = OffsetDateTime::now_utc();
        self.entries
            .read()
            .await
            .get(jti)
            .is_some_and(|until| *until > now)
    }

    /// Drops expired entries, returning how many were removed.
    pub async fn sweep(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, until| *until > now);
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub fn spawn_sweeper(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let removed = self.sweep().await;
                if removed > 0 {
                    let remaining = self.len().await;
                    debug!(removed, remaining, "swept revoked tokens");
                }
            }
        })
    }
}
