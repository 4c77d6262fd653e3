pub mod user_repository;

pub use user_repository::{
    InMemoryUserStore, MySqlSessionRepository, MySqlUserRepository, SessionRepository,
    UserRepository,
};
