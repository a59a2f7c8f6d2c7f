pub mod state_repository;
pub mod user_repository;

pub use state_repository::StateRepository;
pub use user_repository::UserRepository;
