use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub total_points: i32,
    pub weekly_points: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeaderboardEntry {
    pub user_id: Uuid,
    pub username: String,
    pub total_points: i32,
    pub weekly_points: i32,
    pub rank: u32,
}

/// Per-user delivery toggles for the notification feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NotificationSettings {
    pub game_start: bool,
    pub new_image: bool,
    pub leaderboard_update: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            game_start: true,
            new_image: true,
            leaderboard_update: true,
        }
    }
}

impl NotificationSettings {
    pub fn allows(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::GameStart => self.game_start,
            NotificationKind::NewImage => self.new_image,
            NotificationKind::LeaderboardUpdate => self.leaderboard_update,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum NotificationKind {
    GameStart,
    NewImage,
    LeaderboardUpdate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
