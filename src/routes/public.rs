use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any
/// client. Reads of posts and per-post comment lists are public by design;
/// the only public writes are the identity gateway endpoints (register and
/// login), which is where the Anonymous → Authenticated transition begins.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated liveness probe for monitoring and load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /api/register
        // Creates an account. Does not authenticate; the caller must log in
        // separately to obtain a token.
        .route("/api/register", post(handlers::register))
        // POST /api/login
        // Verifies identifier + password and mints the 7-day bearer token.
        .route("/api/login", post(handlers::login))
        // GET /api/posts
        // Lists all posts, newest first.
        .route("/api/posts", get(handlers::get_posts))
        // GET /api/posts/{id}
        // Single-post detail view; 404 when absent.
        .route("/api/posts/{id}", get(handlers::get_post))
        // GET /api/posts/{id}/comments
        // Lists a post's comments in insertion order.
        .route("/api/posts/{id}/comments", get(handlers::get_comments))
}
