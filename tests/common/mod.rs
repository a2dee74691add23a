//! Shared test scaffolding: an in-memory `Repository` double with the same
//! cascade semantics as the Postgres schema, plus a helper that spawns the
//! full router on an ephemeral port.
#![allow(dead_code)]

use async_trait::async_trait;
use board_portal::{
    AppState,
    config::AppConfig,
    create_router,
    models::{Comment, Post, ROLE_ADMINISTRATOR, ROLE_STANDARD, User},
    repository::{CreateUserError, Repository, RepositoryState},
};
use chrono::Utc;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use uuid::Uuid;

/// MemoryRepository
///
/// In-memory stand-in for the Postgres store. Emulates the schema's
/// referential-integrity rules: deleting a user removes their posts, their
/// comments, and all comments under their posts; deleting a post removes its
/// comments.
#[derive(Default)]
pub struct MemoryRepository {
    users: Mutex<Vec<User>>,
    posts: Mutex<Vec<Post>>,
    comments: Mutex<Vec<Comment>>,
    next_comment_id: Mutex<i64>,
}

impl MemoryRepository {
    /// Flips an account's role to administrator. The new role only reaches a
    /// token at the next login, mirroring the snapshot semantics.
    pub fn promote_to_admin(&self, username: &str) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.username == username) {
            user.role = ROLE_ADMINISTRATOR.to_string();
        }
    }

    pub fn user_id(&self, username: &str) -> Option<Uuid> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.id)
    }

    fn author_name(&self, user_id: Uuid) -> Option<String> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.name.clone())
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn create_user(
        &self,
        username: String,
        password_hash: String,
        name: String,
    ) -> Result<User, CreateUserError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == username) {
            return Err(CreateUserError::DuplicateUsername);
        }
        let user = User {
            id: Uuid::new_v4(),
            username,
            password_hash,
            name,
            role: ROLE_STANDARD.to_string(),
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    async fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned()
    }

    async fn delete_user(&self, id: Uuid) -> bool {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return false;
        }
        // Cascade: owned posts, owned comments, and comments on owned posts.
        let mut posts = self.posts.lock().unwrap();
        let removed_posts: Vec<Uuid> = posts
            .iter()
            .filter(|p| p.user_id == id)
            .map(|p| p.id)
            .collect();
        posts.retain(|p| p.user_id != id);
        self.comments
            .lock()
            .unwrap()
            .retain(|c| c.user_id != id && !removed_posts.contains(&c.post_id));
        true
    }

    async fn create_post(
        &self,
        user_id: Uuid,
        title: String,
        body: String,
    ) -> Result<Post, sqlx::Error> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            user_id,
            title,
            body,
            created_at: now,
            updated_at: now,
            author_name: None,
        };
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn get_posts(&self) -> Vec<Post> {
        let mut posts: Vec<Post> = self.posts.lock().unwrap().clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        for post in &mut posts {
            post.author_name = self.author_name(post.user_id);
        }
        posts
    }

    async fn get_post(&self, id: Uuid) -> Option<Post> {
        let mut post = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()?;
        post.author_name = self.author_name(post.user_id);
        Some(post)
    }

    async fn get_my_posts(&self, user_id: Uuid) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }

    async fn update_post(&self, id: Uuid, title: String, body: String) -> Option<Post> {
        let mut posts = self.posts.lock().unwrap();
        let post = posts.iter_mut().find(|p| p.id == id)?;
        post.title = title;
        post.body = body;
        post.updated_at = Utc::now();
        Some(post.clone())
    }

    async fn delete_post(&self, id: Uuid) -> bool {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return false;
        }
        // Cascade: the post's comments.
        self.comments.lock().unwrap().retain(|c| c.post_id != id);
        true
    }

    async fn create_comment(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        body: String,
    ) -> Result<Comment, sqlx::Error> {
        let mut next_id = self.next_comment_id.lock().unwrap();
        *next_id += 1;
        let comment = Comment {
            id: *next_id,
            user_id,
            post_id,
            body,
            created_at: Utc::now(),
            author_name: None,
            post_title: None,
        };
        self.comments.lock().unwrap().push(comment.clone());
        Ok(comment)
    }

    async fn get_comments(&self, post_id: Uuid) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.id);
        for comment in &mut comments {
            comment.author_name = self.author_name(comment.user_id);
        }
        comments
    }

    async fn get_my_comments(&self, user_id: Uuid) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| std::cmp::Reverse(c.id));
        let posts = self.posts.lock().unwrap();
        for comment in &mut comments {
            comment.author_name = self.author_name(comment.user_id);
            comment.post_title = posts
                .iter()
                .find(|p| p.id == comment.post_id)
                .map(|p| p.title.clone());
        }
        comments
    }

    async fn get_comment(&self, id: i64) -> Option<Comment> {
        self.comments
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    async fn update_comment(&self, id: i64, body: String) -> Option<Comment> {
        let mut comments = self.comments.lock().unwrap();
        let comment = comments.iter_mut().find(|c| c.id == id)?;
        comment.body = body;
        Some(comment.clone())
    }

    async fn delete_comment(&self, id: i64) -> bool {
        let mut comments = self.comments.lock().unwrap();
        let before = comments.len();
        comments.retain(|c| c.id != id);
        comments.len() != before
    }
}

// --- Application Spawner ---

pub struct TestApp {
    pub address: String,
    pub repo: Arc<MemoryRepository>,
    pub config: AppConfig,
}

/// Spawns the full router backed by a fresh `MemoryRepository` on an
/// ephemeral port.
pub async fn spawn_app() -> TestApp {
    let repo = Arc::new(MemoryRepository::default());
    let config = AppConfig::default();

    let state = AppState {
        repo: repo.clone() as RepositoryState,
        config: config.clone(),
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp {
        address,
        repo,
        config,
    }
}
