use crate::models::{Comment, Post, ROLE_STANDARD, User};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// CreateUserError
///
/// Registration is the one store operation where a constraint violation is a
/// structured outcome rather than an unhandled fault: a duplicate username is
/// surfaced as a 409 conflict, anything else propagates as a database fault.
#[derive(Debug, Error)]
pub enum CreateUserError {
    #[error("username already taken")]
    DuplicateUsername,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Repository Trait
///
/// The abstract contract for all persistence operations, letting handlers
/// interact with the data layer without knowing the concrete store
/// (Postgres, in-memory test double, etc.).
///
/// Authorization is deliberately NOT folded into these queries: handlers
/// fetch the target first (existence check), apply the ownership policy, and
/// only then mutate. That ordering is what keeps `NotFound` distinct from a
/// denial.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Accounts ---
    // Inserts a new account with the default 'standard' role. Uniqueness of
    // the username is owned by the store.
    async fn create_user(
        &self,
        username: String,
        password_hash: String,
        name: String,
    ) -> Result<User, CreateUserError>;
    async fn get_user(&self, id: Uuid) -> Option<User>;
    // Login lookup; the returned record carries the stored digest.
    async fn get_user_by_username(&self, username: &str) -> Option<User>;
    // Self-initiated account deletion. Cascades to all owned posts, owned
    // comments, and comments on owned posts via store-enforced referential
    // integrity (a single transactional DELETE).
    async fn delete_user(&self, id: Uuid) -> bool;

    // --- Posts ---
    async fn create_post(
        &self,
        user_id: Uuid,
        title: String,
        body: String,
    ) -> Result<Post, sqlx::Error>;
    // Public listing, newest first, author name joined.
    async fn get_posts(&self) -> Vec<Post>;
    async fn get_post(&self, id: Uuid) -> Option<Post>;
    // Owner-filtered listing; the `user_id` filter substitutes for an
    // authorization check on this read.
    async fn get_my_posts(&self, user_id: Uuid) -> Vec<Post>;
    // Full replacement; last-writer-wins, no optimistic-concurrency check.
    async fn update_post(&self, id: Uuid, title: String, body: String) -> Option<Post>;
    // Cascades to the post's comments.
    async fn delete_post(&self, id: Uuid) -> bool;

    // --- Comments ---
    async fn create_comment(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        body: String,
    ) -> Result<Comment, sqlx::Error>;
    // Per-post listing in insertion order.
    async fn get_comments(&self, post_id: Uuid) -> Vec<Comment>;
    // Owner-filtered listing, newest first, parent post title joined.
    async fn get_my_comments(&self, user_id: Uuid) -> Vec<Comment>;
    async fn get_comment(&self, id: i64) -> Option<Comment>;
    async fn update_comment(&self, id: i64, body: String) -> Option<Comment>;
    async fn delete_comment(&self, id: i64) -> bool;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the
/// PostgreSQL database. The store is the sole arbiter of consistency: unique
/// username conflicts and cascading deletes are enforced by the schema, not
/// re-implemented here.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// create_user
    ///
    /// Inserts a new account. The unique constraint on `username` is the only
    /// duplicate check; its violation is mapped to a structured outcome.
    async fn create_user(
        &self,
        username: String,
        password_hash: String,
        name: String,
    ) -> Result<User, CreateUserError> {
        sqlx::query_as::<_, User>(
            r#"INSERT INTO users (id, username, password_hash, name, role, created_at)
               VALUES ($1, $2, $3, $4, $5, NOW())
               RETURNING id, username, password_hash, name, role, created_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .bind(name)
        .bind(ROLE_STANDARD)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                CreateUserError::DuplicateUsername
            }
            _ => {
                tracing::error!("create_user error: {:?}", e);
                CreateUserError::Database(e)
            }
        })
    }

    /// get_user
    ///
    /// Retrieves the full account record, used by the profile endpoint.
    async fn get_user(&self, id: Uuid) -> Option<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, name, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_user error: {:?}", e);
            None
        })
    }

    /// get_user_by_username
    ///
    /// Login lookup by the unique identifier.
    async fn get_user_by_username(&self, username: &str) -> Option<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, name, role, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_user_by_username error: {:?}", e);
            None
        })
    }

    /// delete_user
    ///
    /// Removes the account. The schema's ON DELETE CASCADE rules atomically
    /// remove the user's posts, their comments, and all comments under the
    /// removed posts in the same statement.
    async fn delete_user(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_user error: {:?}", e);
                false
            }
        }
    }

    /// create_post
    ///
    /// Inserts a new post with the owner stamped from the authenticated
    /// principal. The owner reference is immutable from this point on.
    async fn create_post(
        &self,
        user_id: Uuid,
        title: String,
        body: String,
    ) -> Result<Post, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"INSERT INTO posts (id, user_id, title, body, created_at, updated_at)
               VALUES ($1, $2, $3, $4, NOW(), NOW())
               RETURNING id, user_id, title, body, created_at, updated_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(title)
        .bind(body)
        .fetch_one(&self.pool)
        .await
    }

    /// get_posts
    ///
    /// Public listing, newest first, with the author's display name joined in.
    async fn get_posts(&self) -> Vec<Post> {
        sqlx::query_as::<_, Post>(
            r#"SELECT p.id, p.user_id, p.title, p.body, p.created_at, p.updated_at,
                      u.name AS author_name
               FROM posts p
               JOIN users u ON p.user_id = u.id
               ORDER BY p.created_at DESC"#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_posts error: {:?}", e);
            vec![]
        })
    }

    /// get_post
    ///
    /// Single-post retrieval used both by the public detail endpoint and as
    /// the existence check preceding mutations.
    async fn get_post(&self, id: Uuid) -> Option<Post> {
        sqlx::query_as::<_, Post>(
            r#"SELECT p.id, p.user_id, p.title, p.body, p.created_at, p.updated_at,
                      u.name AS author_name
               FROM posts p
               JOIN users u ON p.user_id = u.id
               WHERE p.id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_post error: {:?}", e);
            None
        })
    }

    /// get_my_posts
    ///
    /// All posts owned by the authenticated user, newest first.
    async fn get_my_posts(&self, user_id: Uuid) -> Vec<Post> {
        sqlx::query_as::<_, Post>(
            r#"SELECT p.id, p.user_id, p.title, p.body, p.created_at, p.updated_at,
                      u.name AS author_name
               FROM posts p
               JOIN users u ON p.user_id = u.id
               WHERE p.user_id = $1
               ORDER BY p.created_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_my_posts error: {:?}", e);
            vec![]
        })
    }

    /// update_post
    ///
    /// Full replacement of title and body. Ownership has already been decided
    /// by the caller; this query only keys on the id.
    async fn update_post(&self, id: Uuid, title: String, body: String) -> Option<Post> {
        sqlx::query_as::<_, Post>(
            r#"UPDATE posts
               SET title = $2, body = $3, updated_at = NOW()
               WHERE id = $1
               RETURNING id, user_id, title, body, created_at, updated_at"#,
        )
        .bind(id)
        .bind(title)
        .bind(body)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_post error: {:?}", e);
            None
        })
    }

    /// delete_post
    ///
    /// Removes the post; its comments go with it via ON DELETE CASCADE.
    async fn delete_post(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_post error: {:?}", e);
                false
            }
        }
    }

    /// create_comment
    ///
    /// Inserts a comment against an existing post. The handler verifies the
    /// post exists beforehand; the foreign key backs that check up.
    async fn create_comment(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        body: String,
    ) -> Result<Comment, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"INSERT INTO comments (post_id, user_id, body, created_at)
               VALUES ($1, $2, $3, NOW())
               RETURNING id, user_id, post_id, body, created_at"#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(body)
        .fetch_one(&self.pool)
        .await
    }

    /// get_comments
    ///
    /// All comments for a post in insertion order, author names joined. A
    /// nonexistent (or deleted) post simply yields an empty list.
    async fn get_comments(&self, post_id: Uuid) -> Vec<Comment> {
        sqlx::query_as::<_, Comment>(
            r#"SELECT c.id, c.user_id, c.post_id, c.body, c.created_at,
                      u.name AS author_name
               FROM comments c
               JOIN users u ON c.user_id = u.id
               WHERE c.post_id = $1
               ORDER BY c.id ASC"#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_comments error: {:?}", e);
            vec![]
        })
    }

    /// get_my_comments
    ///
    /// The authenticated user's comments, newest first, with the parent post
    /// title joined for display.
    async fn get_my_comments(&self, user_id: Uuid) -> Vec<Comment> {
        sqlx::query_as::<_, Comment>(
            r#"SELECT c.id, c.user_id, c.post_id, c.body, c.created_at,
                      u.name AS author_name, p.title AS post_title
               FROM comments c
               JOIN users u ON c.user_id = u.id
               JOIN posts p ON c.post_id = p.id
               WHERE c.user_id = $1
               ORDER BY c.id DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_my_comments error: {:?}", e);
            vec![]
        })
    }

    /// get_comment
    ///
    /// Existence check preceding comment mutations.
    async fn get_comment(&self, id: i64) -> Option<Comment> {
        sqlx::query_as::<_, Comment>(
            "SELECT id, user_id, post_id, body, created_at FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_comment error: {:?}", e);
            None
        })
    }

    /// update_comment
    ///
    /// Replaces the comment body. Ownership is decided by the caller.
    async fn update_comment(&self, id: i64, body: String) -> Option<Comment> {
        sqlx::query_as::<_, Comment>(
            r#"UPDATE comments SET body = $2 WHERE id = $1
               RETURNING id, user_id, post_id, body, created_at"#,
        )
        .bind(id)
        .bind(body)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_comment error: {:?}", e);
            None
        })
    }

    /// delete_comment
    ///
    /// Removes a single comment by id.
    async fn delete_comment(&self, id: i64) -> bool {
        match sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_comment error: {:?}", e);
                false
            }
        }
    }
}
