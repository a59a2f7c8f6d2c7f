use anyhow::Result;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::entities::{kv_store, prelude::*};
use quiz_types::{GameState, Guess, NotificationSettings};

/// Storage key for the serialized singleton game state.
pub const GAME_STATE_KEY: &str = "gameState";
/// Storage key for the serialized guess ledger.
pub const GUESSES_KEY: &str = "guesses";
/// Key prefix for per-user notification settings.
pub const NOTIFICATION_SETTINGS_KEY: &str = "notificationSettings";

/// Textual key-value persistence for the game singletons.
///
/// Values are JSON; timestamps travel as RFC 3339 text and come back as
/// real `DateTime<Utc>` values on load. Last write wins, no versioning.
pub struct StateRepository {
    db: DatabaseConnection,
}

impl StateRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let entry = KvStore::find_by_id(key.to_string()).one(&self.db).await?;
        Ok(entry.map(|model| model.value))
    }

    async fn put_raw(&self, key: &str, value: String) -> Result<()> {
        let entry = kv_store::ActiveModel {
            key: ActiveValue::Set(key.to_string()),
            value: ActiveValue::Set(value),
            updated_at: ActiveValue::Set(Utc::now().into()),
        };

        KvStore::insert(entry)
            .on_conflict(
                OnConflict::column(kv_store::Column::Key)
                    .update_columns([kv_store::Column::Value, kv_store::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        KvStore::delete_by_id(key.to_string()).exec(&self.db).await?;
        Ok(())
    }

    pub async fn load_game_state(&self) -> Result<Option<GameState>> {
        match self.get_raw(GAME_STATE_KEY).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn save_game_state(&self, state: &GameState) -> Result<()> {
        self.put_raw(GAME_STATE_KEY, serde_json::to_string(state)?)
            .await
    }

    /// Load the guess ledger; an absent key is an empty ledger.
    pub async fn load_guesses(&self) -> Result<Vec<Guess>> {
        match self.get_raw(GUESSES_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn save_guesses(&self, guesses: &[Guess]) -> Result<()> {
        self.put_raw(GUESSES_KEY, serde_json::to_string(guesses)?)
            .await
    }

    fn settings_key(user_id: Uuid) -> String {
        format!("{NOTIFICATION_SETTINGS_KEY}:{user_id}")
    }

    /// Per-user notification settings, defaulting to everything on.
    pub async fn load_notification_settings(&self, user_id: Uuid) -> Result<NotificationSettings> {
        match self.get_raw(&Self::settings_key(user_id)).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(NotificationSettings::default()),
        }
    }

    pub async fn save_notification_settings(
        &self,
        user_id: Uuid,
        settings: &NotificationSettings,
    ) -> Result<()> {
        self.put_raw(&Self::settings_key(user_id), serde_json::to_string(settings)?)
            .await
    }
}
