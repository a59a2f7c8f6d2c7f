pub mod game_state;
pub mod scoring;
pub mod schedule;
pub mod catalog;
pub mod game_events;

// Re-export main components
pub use game_state::*;
pub use scoring::*;
pub use schedule::*;
pub use catalog::*;
pub use game_events::*;
