//! Service wiring shared by the binary and the HTTP tests

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::{header, Method},
    web, App, Error,
};
use sqlx::MySqlPool;
use tracing_actix_web::TracingLogger;

use crate::config::Config;
use crate::core::{Currency, ReportClock, Result};
use crate::middleware::{
    json_error_handler, query_error_handler, RateLimiter, RequestId, TokenAuth,
};
use crate::modules::auth::repositories::{
    InMemoryUserStore, MySqlSessionRepository, MySqlUserRepository, SessionRepository,
    UserRepository,
};
use crate::modules::auth::AuthService;
use crate::modules::entries::repositories::{
    EntryRepository, InMemoryEntryRepository, MySqlEntryRepository,
};
use crate::modules::entries::EntryService;
use crate::modules::reports::ReportService;
use crate::modules::{auth, entries, health, reports};

/// Services and cross-worker middleware state
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub entries: Arc<EntryService>,
    pub reports: Arc<ReportService>,
    pub rate_limiter: RateLimiter,
    pub frontend_url: String,
}

/// Storage handles backing the services
pub struct Repositories {
    pub entries: Arc<dyn EntryRepository>,
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
}

impl Repositories {
    pub fn mysql(pool: MySqlPool) -> Self {
        Self {
            entries: Arc::new(MySqlEntryRepository::new(pool.clone())),
            users: Arc::new(MySqlUserRepository::new(pool.clone())),
            sessions: Arc::new(MySqlSessionRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryUserStore::new());

        Self {
            entries: Arc::new(InMemoryEntryRepository::new()),
            users: store.clone(),
            sessions: store,
        }
    }
}

impl AppState {
    /// Build services over the given storage
    pub fn new(config: &Config, repositories: Repositories) -> Result<Self> {
        let clock: ReportClock = config.reports.clock()?;
        let currency: Currency = config.reports.currency;

        let auth = Arc::new(AuthService::new(
            repositories.users,
            repositories.sessions,
            config.security.token_secret.as_bytes(),
            chrono::Duration::hours(config.security.session_ttl_hours),
        ));
        let entries = Arc::new(EntryService::new(repositories.entries, currency, clock));
        let reports = Arc::new(ReportService::new(entries.clone(), clock, currency));

        Ok(Self {
            auth,
            entries,
            reports,
            rate_limiter: RateLimiter::new(config.security.rate_limit_per_minute),
            frontend_url: config.server.frontend_url.clone(),
        })
    }

    /// Create the configured bootstrap administrator, if any
    pub async fn bootstrap_admin(&self, config: &Config) -> Result<()> {
        match &config.security.admin {
            Some(admin) => self.auth.ensure_admin(&admin.username, &admin.password).await,
            None => Ok(()),
        }
    }
}

/// Register every route and shared extractor configuration
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(web::Data::new(state.auth.clone()))
        .app_data(web::Data::new(state.entries.clone()))
        .app_data(web::Data::new(state.reports.clone()))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .configure(health::configure)
        .configure(auth::controllers::configure)
        .configure(entries::controllers::configure)
        .configure(reports::configure);
}

fn cors(frontend_url: &str) -> Cors {
    Cors::default()
        .allowed_origin(frontend_url)
        .allowed_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers(vec![header::HeaderName::from_static(
            crate::middleware::request_id::REQUEST_ID_HEADER,
        )])
        .max_age(3600)
}

/// Full application with its middleware stack, outermost first:
/// CORS, request tracing, request ID, rate limit, token auth
pub fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .configure(|cfg| configure(cfg, &state))
        .wrap(TokenAuth::new(state.auth.clone()))
        .wrap(state.rate_limiter.clone())
        .wrap(RequestId)
        .wrap(TracingLogger::default())
        .wrap(cors(&state.frontend_url))
}
