use std::collections::HashMap;

use async_trait::async_trait;

pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Resolves user ids to display names.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// `Ok(None)` when no such user exists.
    async fn display_name(&self, user_id: i64) -> Result<Option<String>, String>;
}

/// Author names looked up once per distinct id and kept for the rest of the
/// session. Only [`AuthorCache::clear`] (a full reload) drops entries.
#[derive(Debug, Default)]
pub struct AuthorCache {
    names: HashMap<i64, Option<String>>,
}

impl AuthorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A failed lookup is not cached, so the next call retries it.
    pub async fn name_of<D>(&mut self, directory: &D, user_id: i64) -> String
    where
        D: UserDirectory + ?Sized,
    {
        if let Some(cached) = self.names.get(&user_id) {
            return cached.clone().unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
        }

        match directory.display_name(user_id).await {
            Ok(name) => {
                let shown = name.clone().unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
                self.names.insert(user_id, name);
                shown
            }
            Err(e) => {
                tracing::warn!(user_id, "Author lookup failed: {e}");
                UNKNOWN_AUTHOR.to_string()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }
}
