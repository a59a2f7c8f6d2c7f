use std::sync::{Arc, Mutex};

use quiz_core::{GameEvent, GameEventHandler};
use quiz_types::{Notification, NotificationSettings};

/// Bounded in-memory backlog of rendered notifications.
///
/// Registered on the game event bus as a handler; the feed route reads it
/// back filtered by each caller's settings. Clones share the same backlog.
#[derive(Clone)]
pub struct NotificationLog {
    entries: Arc<Mutex<Vec<Notification>>>,
    capacity: usize,
}

impl NotificationLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            capacity,
        }
    }

    /// Notifications the given settings allow, oldest first.
    pub fn filtered_for(&self, settings: &NotificationSettings) -> Vec<Notification> {
        let entries = self.entries.lock().expect("notification log poisoned");
        entries
            .iter()
            .filter(|notification| settings.allows(notification.kind))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("notification log poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GameEventHandler for NotificationLog {
    fn handle_event(&mut self, event: GameEvent) {
        if let Some(notification) = event.to_notification() {
            let mut entries = self.entries.lock().expect("notification log poisoned");
            entries.push(notification);
            if entries.len() > self.capacity {
                let excess = entries.len() - self.capacity;
                entries.drain(..excess);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn started_event() -> GameEvent {
        GameEvent::GameStarted {
            week: 1,
            movie_id: Uuid::new_v4(),
            at: Utc::now(),
        }
    }

    fn released_event() -> GameEvent {
        GameEvent::ClueReleased {
            movie_id: Uuid::new_v4(),
            clue_index: 1,
            next_release: None,
            at: Utc::now(),
        }
    }

    #[test]
    fn test_records_notifiable_events() {
        let log = NotificationLog::new(10);
        let mut handler = log.clone();

        handler.handle_event(started_event());
        handler.handle_event(GameEvent::GuessSubmitted {
            user_id: Uuid::new_v4(),
            movie_id: Uuid::new_v4(),
            is_correct: false,
            points: 0,
            at: Utc::now(),
        });

        // Guess submissions carry no notification
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_settings_filter_the_feed() {
        let log = NotificationLog::new(10);
        let mut handler = log.clone();
        handler.handle_event(started_event());
        handler.handle_event(released_event());

        let all = log.filtered_for(&NotificationSettings::default());
        assert_eq!(all.len(), 2);

        let muted_images = NotificationSettings {
            game_start: true,
            new_image: false,
            leaderboard_update: true,
        };
        let filtered = log.filtered_for(&muted_images);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].kind, quiz_types::NotificationKind::GameStart);
    }

    #[test]
    fn test_backlog_is_bounded() {
        let log = NotificationLog::new(3);
        let mut handler = log.clone();

        for _ in 0..5 {
            handler.handle_event(released_event());
        }

        assert_eq!(log.len(), 3);
    }
}
