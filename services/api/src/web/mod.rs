pub mod auth;
pub mod middleware;
pub mod rest;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use auth::{login_handler, logout_handler, signup_handler};
use rest::{
    create_subscription_handler, deliver_next_handler, get_dashboard_handler,
    get_pricing_handler, list_categories_handler, list_stories_handler, save_story_handler,
    skip_delivery_handler, transcribe_story_handler,
};
use state::AppState;

pub use middleware::require_auth;

/// Upper bound for request bodies; voice recordings are the largest uploads.
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Builds the API router with all public and protected routes.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/pricing", get(get_pricing_handler))
        .route("/questions/categories", get(list_categories_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/dashboard", get(get_dashboard_handler))
        .route("/subscriptions", post(create_subscription_handler))
        .route(
            "/subscriptions/{id}/deliveries/next",
            post(deliver_next_handler),
        )
        .route("/deliveries/{id}/skip", post(skip_delivery_handler))
        .route(
            "/stories",
            get(list_stories_handler).post(save_story_handler),
        )
        .route("/stories/{id}/transcribe", post(transcribe_story_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(app_state)
}
