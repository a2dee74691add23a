use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Role Values ---

/// Default role assigned at registration.
pub const ROLE_STANDARD: &str = "standard";
/// Role granting unconditional mutate/delete rights over all posts and comments.
pub const ROLE_ADMINISTRATOR: &str = "administrator";

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// Canonical account record stored in the `users` table.
/// The password hash is carried for login verification only and is never
/// serialized into any response body.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    // Unique login identifier.
    pub username: String,
    // bcrypt digest. Excluded from all JSON output.
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    #[schema(ignore)]
    pub password_hash: String,
    // Display name shown next to posts and comments.
    pub name: String,
    // RBAC field: 'standard' or 'administrator'.
    pub role: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// UserResponse
///
/// Public projection of an account, used by the login and profile endpoints.
/// Deliberately has no secret material.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub role: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Post
///
/// A post record from the `posts` table. The owner reference (`user_id`) is
/// stamped from the authenticated principal at creation and immutable afterward.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Post {
    pub id: Uuid,
    // FK to users.id (Owner).
    pub user_id: Uuid,
    pub title: String,
    pub body: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
    // Loaded via a JOIN with `users` in listing/detail queries.
    #[sqlx(default)]
    pub author_name: Option<String>,
}

/// Comment
///
/// A comment record from the `comments` table, referencing both its author
/// and its parent post.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Comment {
    // BigInt id; comments are the highest-volume table.
    pub id: i64,
    // FK to users.id (Owner).
    pub user_id: Uuid,
    // FK to posts.id.
    pub post_id: Uuid,
    pub body: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    // Loaded via a JOIN with `users`.
    #[sqlx(default)]
    pub author_name: Option<String>,
    // Loaded via a JOIN with `posts` for the "my comments" listing.
    #[sqlx(default)]
    pub post_title: Option<String>,
}

/// --- Request Payloads (Input Schemas) ---

/// RegisterRequest
///
/// Input payload for the public registration endpoint (POST /api/register).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub name: String,
}

/// LoginRequest
///
/// Input payload for the login endpoint (POST /api/login).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// LoginResponse
///
/// Output of a successful login: the signed bearer token plus the public
/// account projection (never the raw `User` row, which carries the hash).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// CreatePostRequest
///
/// Input payload for submitting a new post (POST /api/posts).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
}

/// UpdatePostRequest
///
/// Full-replacement payload for modifying an existing post (PUT /api/posts/{id}).
/// Both fields are required; concurrent edits are last-writer-wins.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdatePostRequest {
    pub title: String,
    pub body: String,
}

/// CreateCommentRequest
///
/// Input payload for posting a new comment (POST /api/posts/{id}/comments).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateCommentRequest {
    pub body: String,
}

/// UpdateCommentRequest
///
/// Replacement payload for editing a comment (PUT /api/comments/{id}).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateCommentRequest {
    pub body: String,
}

/// MessageResponse
///
/// Minimal acknowledgement body used by registration and delete endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}
