use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::error::AppError;
use crate::core::timezone::parse_iso_date;
use crate::modules::auth::models::AuthenticatedUser;
use crate::modules::reports::models::Dimension;
use crate::modules::reports::services::ReportService;

/// Query parameters shared by the report endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// Reference date (format: YYYY-MM-DD); today when absent
    #[serde(default)]
    pub as_of: Option<String>,
}

impl ReportQuery {
    fn reference_date(&self) -> Result<Option<NaiveDate>, AppError> {
        self.as_of
            .as_deref()
            .map(|raw| {
                parse_iso_date(raw).map_err(|_| {
                    AppError::validation(format!(
                        "Invalid as_of format: '{}'. Expected YYYY-MM-DD",
                        raw
                    ))
                })
            })
            .transpose()
    }
}

/// GET /reports/grand-total
pub async fn grand_total(
    service: web::Data<Arc<ReportService>>,
    user: AuthenticatedUser,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, AppError> {
    let report = service.grand_total(&user, query.reference_date()?).await?;

    Ok(HttpResponse::Ok().json(report))
}

/// GET /reports/summary
pub async fn summary(
    service: web::Data<Arc<ReportService>>,
    user: AuthenticatedUser,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, AppError> {
    let report = service.summary(&user, query.reference_date()?).await?;

    Ok(HttpResponse::Ok().json(report))
}

/// GET /reports/breakdown/{dimension}
///
/// Estimated revenue grouped by account, bd, dl, pm or business-type.
/// The reference date does not affect estimated sums; `as_of` is still
/// validated so every report endpoint rejects the same malformed input.
pub async fn breakdown(
    service: web::Data<Arc<ReportService>>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, AppError> {
    query.reference_date()?;
    let dimension: Dimension = path.parse().map_err(AppError::Validation)?;
    let report = service.breakdown(&user, dimension).await?;

    Ok(HttpResponse::Ok().json(report))
}

/// Configure routes for reports module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/grand-total", web::get().to(grand_total))
            .route("/summary", web::get().to(summary))
            .route("/breakdown/{dimension}", web::get().to(breakdown)),
    );
}
