use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderValue,
    middleware::from_fn_with_state,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{Argon2Hasher, HashError, IdentityResolver, OwnershipGate, SessionTokens};
use crate::config::AppConfig;
use crate::database::models::{Applicant, Company, Job, User};
use crate::database::{DocumentStore, MemoryDocumentStore, Repository};
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::{require_auth, require_owner, AuthGate};
use crate::services::{ApplicantService, AuthService, CompanyService, JobService};

/// Everything a request handler or pipeline stage needs, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
    pub auth_gate: AuthGate,
    pub job_owners: OwnershipGate<Job>,
    pub auth: AuthService,
    pub jobs: JobService,
    pub companies: CompanyService,
    pub applicants: ApplicantService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Result<Self, HashError> {
        let timeout = config.database.operation_timeout();
        let users: Repository<User> = Repository::new(store.clone(), timeout);
        let jobs: Repository<Job> = Repository::new(store.clone(), timeout);
        let companies: Repository<Company> = Repository::new(store.clone(), timeout);
        let applicants: Repository<Applicant> = Repository::new(store.clone(), timeout);

        let tokens = SessionTokens::from_config(&config.security);
        let hasher = Arc::new(Argon2Hasher::new(
            config.security.password_memory_kib,
            config.security.password_iterations,
        )?);

        Ok(Self {
            auth_gate: AuthGate::new(tokens.clone(), IdentityResolver::new(users.clone())),
            job_owners: OwnershipGate::new(jobs.clone()),
            auth: AuthService::new(users, tokens, hasher),
            jobs: JobService::new(jobs.clone()),
            companies: CompanyService::new(companies),
            applicants: ApplicantService::new(applicants, jobs),
            config: Arc::new(config),
            store,
        })
    }

    /// State backed by a fresh in-process store
    pub fn in_memory(config: AppConfig) -> Result<Self, HashError> {
        Self::new(config, Arc::new(MemoryDocumentStore::new()))
    }
}

/// Build the full router: public routes, authenticated routes, and owner-only job routes.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/register", post(public::auth::register))
        .route("/auth/login", post(public::auth::login))
        .route("/api/jobs", get(public::jobs::list))
        .route("/api/jobs/recent", get(public::jobs::recent))
        .route("/api/jobs/:id", get(public::jobs::show));

    let protected = Router::new()
        .route("/api/auth/logout", post(protected::auth::logout))
        .route("/api/auth/whoami", get(protected::auth::whoami))
        .route("/api/jobs", post(protected::jobs::create))
        .route("/api/jobs/company", get(protected::jobs::by_company))
        .route("/api/jobs/:id/applicants", post(protected::applicants::apply))
        .route("/api/companies", post(protected::companies::create))
        .route("/api/companies/:id", get(protected::companies::show))
        .route("/api/applicants/job/:id", get(protected::applicants::by_job))
        .route(
            "/api/applicants/:id",
            get(protected::applicants::show)
                .put(protected::applicants::update_status)
                .patch(protected::applicants::update_status),
        )
        .route_layer(from_fn_with_state(state.auth_gate.clone(), require_auth));

    // The last route_layer runs first: authenticate, then check ownership
    let owner_only = Router::new()
        .route(
            "/api/jobs/:id",
            put(protected::jobs::update)
                .patch(protected::jobs::update)
                .delete(protected::jobs::delete),
        )
        .route_layer(from_fn_with_state(state.job_owners.clone(), require_owner::<Job>))
        .route_layer(from_fn_with_state(state.auth_gate.clone(), require_auth));

    let mut app = Router::new()
        .merge(public)
        .merge(protected)
        .merge(owner_only)
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes));

    if state.config.security.enable_cors {
        app = app.layer(cors_layer(&state.config.security.cors_origins));
    }
    if state.config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::permissive().allow_origin(AllowOrigin::list(allowed))
}

async fn root() -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": "Jobsy API",
        "data": {
            "name": "Jobsy API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "public": "/auth/register, /auth/login, GET /api/jobs[/recent|/:id]",
                "auth": "/api/auth/logout, /api/auth/whoami (bearer token)",
                "jobs": "POST /api/jobs, GET /api/jobs/company, PUT|PATCH|DELETE /api/jobs/:id (owner only)",
                "companies": "/api/companies[/:id] (bearer token)",
                "applicants": "/api/jobs/:id/applicants, /api/applicants[/job/:id|/:id] (bearer token)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.store.ping().await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::service_unavailable("database unavailable")
    })?;

    Ok(Json(json!({
        "status": "success",
        "message": "ok",
        "data": { "timestamp": chrono::Utc::now(), "database": "ok" }
    })))
}
