use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::config;
use crate::handlers::{self, auth, companies, health, jobs, users};
use crate::middleware::{authenticate_jwt, ensure_admin, ensure_correct_user_or_admin, ensure_logged_in};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

/// Build the full router: public and guarded routes, the token reader on
/// every request, and a JSON 404 for anything unmatched.
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health_get))
        .merge(auth_routes())
        .merge(company_routes())
        .merge(job_routes())
        .merge(user_routes())
        .fallback(handlers::not_found)
        .layer(from_fn(authenticate_jwt));

    let settings = config();
    if settings.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if settings.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/token", post(auth::token_post))
        .route("/auth/register", post(auth::register_post))
}

fn company_routes() -> Router<AppState> {
    use axum::routing::patch;

    let public = Router::new()
        .route("/companies", get(companies::companies_get))
        .route("/companies/:handle", get(companies::company_get));

    let admin = Router::new()
        .route("/companies", post(companies::company_post))
        .route(
            "/companies/:handle",
            patch(companies::company_patch).delete(companies::company_delete),
        )
        .route_layer(from_fn(ensure_admin));

    // Method routers on a shared path are merged
    public.merge(admin)
}

fn job_routes() -> Router<AppState> {
    use axum::routing::patch;

    let public = Router::new()
        .route("/jobs", get(jobs::jobs_get))
        .route("/jobs/:id", get(jobs::job_get));

    let admin = Router::new()
        .route("/jobs", post(jobs::job_post))
        .route("/jobs/:id", patch(jobs::job_patch).delete(jobs::job_delete))
        .route_layer(from_fn(ensure_admin));

    public.merge(admin)
}

fn user_routes() -> Router<AppState> {
    use axum::routing::patch;

    let admin = Router::new()
        .route("/users", get(users::users_get).post(users::user_post))
        .route_layer(from_fn(ensure_admin));

    // Layers run outside-in: logged in first, then the path check
    let own = Router::new()
        .route(
            "/users/:username",
            get(users::user_get).patch(users::user_patch).delete(users::user_delete),
        )
        .route_layer(from_fn(ensure_correct_user_or_admin))
        .route_layer(from_fn(ensure_logged_in));

    admin.merge(own)
}
