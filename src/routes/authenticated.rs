use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Authenticated Router Module
///
/// Defines the routes reachable only through the authentication gate.
///
/// Access Control Strategy:
/// Every handler here relies on the `AuthUser` extractor middleware layered
/// above this module, guaranteeing a verified `{id, role}` principal. Create
/// operations stamp ownership from that principal; update and delete
/// operations additionally apply the owner-or-administrator policy inside
/// the handler, after the target's existence check.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET/DELETE /api/profile
        // The authenticated account's record, and self-initiated account
        // deletion (cascading to all owned posts and comments).
        .route(
            "/api/profile",
            get(handlers::get_profile).delete(handlers::delete_profile),
        )
        // POST /api/posts
        // Submits a new post owned by the principal.
        .route("/api/posts", post(handlers::create_post))
        // PUT/DELETE /api/posts/{id}
        // Owner-or-administrator mutation of a post. Deletion cascades to
        // the post's comments.
        .route(
            "/api/posts/{id}",
            put(handlers::update_post).delete(handlers::delete_post),
        )
        // GET /api/myposts
        // The principal's own posts, newest first.
        .route("/api/myposts", get(handlers::get_my_posts))
        // POST /api/posts/{id}/comments
        // Comments on an existing post; 404 when the post is absent.
        .route("/api/posts/{id}/comments", post(handlers::create_comment))
        // GET /api/mycomments
        // The principal's own comments, newest first.
        .route("/api/mycomments", get(handlers::get_my_comments))
        // PUT/DELETE /api/comments/{id}
        // Owner-or-administrator comment edit and removal.
        .route(
            "/api/comments/{id}",
            put(handlers::update_comment).delete(handlers::delete_comment),
        )
}
