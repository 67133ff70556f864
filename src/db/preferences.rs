use crate::error::Result;
use crate::models::Preference;

use super::Repository;

/// Durable per-user announcement policy.
///
/// Reads fail open: a missing, unreadable or corrupt value yields the
/// unblocked default so a bad record can never hide every announcement.
pub struct PreferenceStore {
    repository: Repository,
}

impl PreferenceStore {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn open(db_path: &str) -> Result<Self> {
        Ok(Self::new(Repository::new(db_path).await?))
    }

    pub async fn get(&self, user_id: i64) -> bool {
        let key = Preference::storage_key(user_id);

        let raw = match self.repository.get_value(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!("Failed to read preference {}: {}", key, e);
                return false;
            }
        };

        match serde_json::from_str::<bool>(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Ignoring corrupt preference {} ({:?}): {}", key, raw, e);
                false
            }
        }
    }

    pub async fn load(&self, user_id: i64) -> Preference {
        Preference {
            user_id,
            block_non_critical: self.get(user_id).await,
        }
    }

    pub async fn set(&self, user_id: i64, block_non_critical: bool) -> Result<()> {
        let key = Preference::storage_key(user_id);
        let value = serde_json::to_string(&block_non_critical)?;
        self.repository.set_value(&key, &value).await?;
        tracing::debug!("Stored {} = {}", key, value);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn repository(&self) -> &Repository {
        &self.repository
    }
}
