use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::auth::models::AuthenticatedUser;
use crate::modules::entries::models::{EntryFilter, EntryRequest, EntryUpdate};
use crate::modules::entries::services::EntryService;

/// List visible entries
/// GET /revenue-entries?accountName=..&type=..
pub async fn list_entries(
    service: web::Data<Arc<EntryService>>,
    user: AuthenticatedUser,
    filter: web::Query<EntryFilter>,
) -> Result<HttpResponse, AppError> {
    let entries = service.list_entries(&user, &filter).await?;

    Ok(HttpResponse::Ok().json(entries))
}

/// Get entry by ID
/// GET /revenue-entries/{id}
pub async fn get_entry(
    service: web::Data<Arc<EntryService>>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let entry = service.get_entry(&path.into_inner(), &user).await?;

    Ok(HttpResponse::Ok().json(entry))
}

/// Create an entry
/// POST /revenue-entries
pub async fn create_entry(
    service: web::Data<Arc<EntryService>>,
    user: AuthenticatedUser,
    request: web::Json<EntryRequest>,
) -> Result<HttpResponse, AppError> {
    let entry = service.create_entry(request.into_inner(), &user).await?;

    Ok(HttpResponse::Created().json(entry))
}

/// Replace an entry
/// PUT /revenue-entries/{id}
pub async fn replace_entry(
    service: web::Data<Arc<EntryService>>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    request: web::Json<EntryRequest>,
) -> Result<HttpResponse, AppError> {
    let entry = service
        .replace_entry(&path.into_inner(), request.into_inner(), &user)
        .await?;

    Ok(HttpResponse::Ok().json(entry))
}

/// Apply field edits
/// PATCH /revenue-entries/{id}
pub async fn update_entry(
    service: web::Data<Arc<EntryService>>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    updates: web::Json<Vec<EntryUpdate>>,
) -> Result<HttpResponse, AppError> {
    let entry = service
        .apply_updates(&path.into_inner(), &updates, &user)
        .await?;

    Ok(HttpResponse::Ok().json(entry))
}

/// Delete an entry
/// DELETE /revenue-entries/{id}
pub async fn delete_entry(
    service: web::Data<Arc<EntryService>>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_entry(&path.into_inner(), &user).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Account names visible to the caller
/// GET /accounts
pub async fn list_accounts(
    service: web::Data<Arc<EntryService>>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let accounts = service.list_accounts(&user).await?;

    Ok(HttpResponse::Ok().json(accounts))
}

/// Configure entry routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/revenue-entries")
            .route("", web::get().to(list_entries))
            .route("", web::post().to(create_entry))
            .route("/{id}", web::get().to(get_entry))
            .route("/{id}", web::put().to(replace_entry))
            .route("/{id}", web::patch().to(update_entry))
            .route("/{id}", web::delete().to(delete_entry)),
    )
    .route("/accounts", web::get().to(list_accounts));
}
