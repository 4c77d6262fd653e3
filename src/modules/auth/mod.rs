// Auth module: accounts, login sessions and the request identity

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{AuthenticatedUser, Role, User};
pub use repositories::{SessionRepository, UserRepository};
pub use services::AuthService;
