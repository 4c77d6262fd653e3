mod user;

pub use user::{
    AuthResponse, AuthenticatedUser, LoginRequest, RegisterRequest, Role, User, UserResponse,
};
