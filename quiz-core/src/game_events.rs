use chrono::{DateTime, Utc};
use quiz_types::{Notification, NotificationKind};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum GameEvent {
    GameStarted {
        week: i32,
        movie_id: Uuid,
        at: DateTime<Utc>,
    },
    ClueReleased {
        movie_id: Uuid,
        clue_index: u8,
        next_release: Option<DateTime<Utc>>,
        at: DateTime<Utc>,
    },
    GuessSubmitted {
        user_id: Uuid,
        movie_id: Uuid,
        is_correct: bool,
        points: i32,
        at: DateTime<Utc>,
    },
    LeaderboardUpdated {
        user_id: Uuid,
        points_gained: i32,
        at: DateTime<Utc>,
    },
}

impl GameEvent {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            GameEvent::GameStarted { at, .. } => *at,
            GameEvent::ClueReleased { at, .. } => *at,
            GameEvent::GuessSubmitted { at, .. } => *at,
            GameEvent::LeaderboardUpdated { at, .. } => *at,
        }
    }

    /// The user-facing notification for this event, if it has one.
    pub fn to_notification(&self) -> Option<Notification> {
        let (kind, title, body) = match self {
            GameEvent::GameStarted { .. } => (
                NotificationKind::GameStart,
                "New movie quiz started!",
                "A new movie is ready to be guessed. Check out the first clue!",
            ),
            GameEvent::ClueReleased { .. } => (
                NotificationKind::NewImage,
                "New clue available!",
                "A new image clue has been released for this week's movie!",
            ),
            GameEvent::LeaderboardUpdated { .. } => (
                NotificationKind::LeaderboardUpdate,
                "Leaderboard updated!",
                "Check your ranking in this week's movie quiz!",
            ),
            GameEvent::GuessSubmitted { .. } => return None,
        };

        Some(Notification {
            kind,
            title: title.to_string(),
            body: body.to_string(),
            created_at: self.at(),
        })
    }
}

/// Event handler trait for processing game events
pub trait GameEventHandler: Send {
    fn handle_event(&mut self, event: GameEvent);
}

/// Simple event bus for distributing game events
pub struct GameEventBus {
    handlers: Vec<Box<dyn GameEventHandler>>,
}

impl GameEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn publish(&mut self, event: GameEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }
}

impl Default for GameEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct CollectingHandler {
        events: Arc<Mutex<Vec<GameEvent>>>,
    }

    impl GameEventHandler for CollectingHandler {
        fn handle_event(&mut self, event: GameEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn test_event_bus_fans_out() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut bus = GameEventBus::new();
        bus.add_handler(Box::new(CollectingHandler {
            events: events.clone(),
        }));

        bus.publish(GameEvent::GameStarted {
            week: 1,
            movie_id: Uuid::new_v4(),
            at: Utc::now(),
        });

        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_notifications_per_event() {
        let at = Utc::now();
        let movie_id = Uuid::new_v4();

        let started = GameEvent::GameStarted {
            week: 1,
            movie_id,
            at,
        };
        assert_eq!(
            started.to_notification().unwrap().kind,
            NotificationKind::GameStart
        );

        let released = GameEvent::ClueReleased {
            movie_id,
            clue_index: 1,
            next_release: None,
            at,
        };
        assert_eq!(
            released.to_notification().unwrap().kind,
            NotificationKind::NewImage
        );

        let guessed = GameEvent::GuessSubmitted {
            user_id: Uuid::new_v4(),
            movie_id,
            is_correct: true,
            points: 6,
            at,
        };
        assert!(guessed.to_notification().is_none());
    }
}
