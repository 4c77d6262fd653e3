use actix_web::{
    error::{JsonPayloadError, QueryPayloadError},
    Error, HttpRequest,
};

use crate::core::AppError;

/// Body extractor errors rendered with the common error body
///
/// Wired through `web::JsonConfig::error_handler`.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    tracing::debug!(path = %req.path(), error = %err, "Rejected JSON body");

    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::Deserialize(e) => format!("Invalid request body: {}", e),
        other => format!("Invalid request body: {}", other),
    };

    AppError::Validation(message).into()
}

/// Query-string extractor errors rendered with the common error body
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    tracing::debug!(path = %req.path(), error = %err, "Rejected query string");

    AppError::Validation(format!("Invalid query string: {}", err)).into()
}
