use std::sync::Arc;

use actix_web::{http::header, web, HttpRequest, HttpResponse};

use crate::core::error::AppError;
use crate::middleware::auth::bearer_token;
use crate::modules::auth::models::{AuthenticatedUser, LoginRequest, RegisterRequest, UserResponse};
use crate::modules::auth::services::AuthService;

/// Register a new account
/// POST /register
pub async fn register(
    service: web::Data<Arc<AuthService>>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let user = service.register(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(UserResponse {
        username: user.username,
        role: user.role,
    }))
}

/// Exchange credentials for a session token
/// POST /login
pub async fn login(
    service: web::Data<Arc<AuthService>>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let session = service.login(request.into_inner()).await?;

    Ok(HttpResponse::Ok().json(session))
}

/// Revoke the presented token
/// POST /logout
pub async fn logout(
    service: web::Data<Arc<AuthService>>,
    req: HttpRequest,
    _user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

    service.logout(token).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Current identity
/// GET /me
pub async fn me(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(UserResponse::from(&user))
}

/// Configure auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        .route("/logout", web::post().to(logout))
        .route("/me", web::get().to(me));
}
