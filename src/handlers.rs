use crate::{
    AppState,
    auth::{AuthUser, issue_token},
    error::ApiError,
    models::{
        self, Comment, CreateCommentRequest, CreatePostRequest, LoginRequest, LoginResponse,
        MessageResponse, Post, RegisterRequest, UpdateCommentRequest, UpdatePostRequest,
        UserResponse,
    },
    password::{hash_password, verify_password},
    repository::CreateUserError,
};
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

// --- Validation ---

/// Required-field existence check. This is the full extent of input
/// validation: whitespace-only values count as missing.
fn require_field(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::Validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

// --- Identity Handlers ---

/// register
///
/// [Public Route] Creates a new account with the default 'standard' role.
/// Registration does not authenticate: the caller must separately log in to
/// obtain a token.
///
/// Uniqueness of the username is owned by the store; a duplicate surfaces as
/// a structured 409 rather than a raw constraint fault.
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered", body = MessageResponse),
        (status = 400, description = "Missing Field"),
        (status = 409, description = "Username Taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_field(&payload.username, "username")?;
    require_field(&payload.password, "password")?;
    require_field(&payload.name, "name")?;

    let digest = hash_password(&payload.password).map_err(|e| {
        tracing::error!("password hash error: {:?}", e);
        ApiError::Internal
    })?;

    match state
        .repo
        .create_user(payload.username, digest, payload.name)
        .await
    {
        Ok(user) => {
            tracing::info!("registered account {}", user.id);
            Ok(Json(MessageResponse {
                message: "registration successful".to_string(),
            }))
        }
        Err(CreateUserError::DuplicateUsername) => {
            Err(ApiError::Conflict("username already taken".to_string()))
        }
        Err(CreateUserError::Database(_)) => Err(ApiError::Internal),
    }
}

/// login
///
/// [Public Route] The only Anonymous → Authenticated transition. On success
/// mints a 7-day bearer token embedding the account id and a role snapshot.
///
/// An unknown username and a wrong password produce the same coarse failure
/// so credentials cannot be probed one field at a time. The returned account
/// projection excludes the password hash.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged In", body = LoginResponse),
        (status = 403, description = "Bad Credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .repo
        .get_user_by_username(&payload.username)
        .await
        .ok_or_else(|| ApiError::InvalidCredential("invalid username or password".to_string()))?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::InvalidCredential(
            "invalid username or password".to_string(),
        ));
    }

    let token = issue_token(user.id, &user.role, &state.config.jwt_secret).map_err(|e| {
        tracing::error!("token issue error: {:?}", e);
        ApiError::Internal
    })?;

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(user),
    }))
}

/// get_profile
///
/// [Authenticated Route] Returns the authenticated user's account record.
/// A principal whose account was deleted after token issuance still passes
/// the gate; the lookup then finds nothing and reports 404.
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile", body = UserResponse),
        (status = 404, description = "Account Gone")
    )
)]
pub async fn get_profile(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .repo
        .get_user(id)
        .await
        .ok_or_else(|| ApiError::NotFound("account not found".to_string()))?;
    Ok(Json(UserResponse::from(user)))
}

/// delete_profile
///
/// [Authenticated Route] Self-initiated account deletion. The store cascades
/// the removal to all owned posts, owned comments, and comments under the
/// removed posts in one transactional statement. The token itself stays
/// valid until natural expiry; subsequent operations affect zero rows.
#[utoipa::path(
    delete,
    path = "/api/profile",
    responses((status = 200, description = "Deleted", body = MessageResponse))
)]
pub async fn delete_profile(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Json<MessageResponse> {
    state.repo.delete_user(id).await;
    Json(MessageResponse {
        message: "account deleted".to_string(),
    })
}

// --- Post Handlers ---

/// create_post
///
/// [Authenticated Route] Submits a new post. Any authenticated principal may
/// create; the owner reference is stamped from the principal, never taken
/// from the payload.
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 200, description = "Created", body = Post),
        (status = 400, description = "Missing Field")
    )
)]
pub async fn create_post(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<Json<Post>, ApiError> {
    require_field(&payload.title, "title")?;
    require_field(&payload.body, "body")?;

    let post = state
        .repo
        .create_post(id, payload.title, payload.body)
        .await
        .map_err(|e| {
            tracing::error!("create_post error: {:?}", e);
            ApiError::Internal
        })?;
    Ok(Json(post))
}

/// get_posts
///
/// [Public Route] Lists all posts, newest first, with author names joined.
/// Reads are unauthenticated by design.
#[utoipa::path(
    get,
    path = "/api/posts",
    responses((status = 200, description = "Posts", body = [Post]))
)]
pub async fn get_posts(State(state): State<AppState>) -> Json<Vec<models::Post>> {
    Json(state.repo.get_posts().await)
}

/// get_post
///
/// [Public Route] Single-post detail view.
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Found", body = Post),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, ApiError> {
    match state.repo.get_post(id).await {
        Some(post) => Ok(Json(post)),
        None => Err(ApiError::NotFound("post not found".to_string())),
    }
}

/// get_my_posts
///
/// [Authenticated Route] Lists the requesting user's own posts. The
/// `user_id` filter substitutes for an authorization check on this read.
#[utoipa::path(
    get,
    path = "/api/myposts",
    responses((status = 200, description = "My Posts", body = [Post]))
)]
pub async fn get_my_posts(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<models::Post>> {
    Json(state.repo.get_my_posts(id).await)
}

/// update_post
///
/// [Authenticated Route] Replaces a post's title and body.
///
/// *Ordering*: the existence check runs BEFORE the ownership check, so a
/// missing post is 404 for every caller — administrators included — and
/// never disguised as a denial. Only then does `can_mutate` decide
/// owner-or-administrator access.
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Updated", body = Post),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_post(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<Post>, ApiError> {
    require_field(&payload.title, "title")?;
    require_field(&payload.body, "body")?;

    let post = state
        .repo
        .get_post(id)
        .await
        .ok_or_else(|| ApiError::NotFound("post not found".to_string()))?;

    if !principal.can_mutate(post.user_id) {
        return Err(ApiError::InvalidCredential("permission denied".to_string()));
    }

    match state.repo.update_post(id, payload.title, payload.body).await {
        Some(updated) => Ok(Json(updated)),
        // The post vanished between the check and the write.
        None => Err(ApiError::NotFound("post not found".to_string())),
    }
}

/// delete_post
///
/// [Authenticated Route] Deletes a post and, via the store's cascade rule,
/// all of its comments. Same existence-then-ownership ordering as
/// `update_post`.
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_post(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let post = state
        .repo
        .get_post(id)
        .await
        .ok_or_else(|| ApiError::NotFound("post not found".to_string()))?;

    if !principal.can_mutate(post.user_id) {
        return Err(ApiError::InvalidCredential("permission denied".to_string()));
    }

    if state.repo.delete_post(id).await {
        Ok(Json(MessageResponse {
            message: "post deleted".to_string(),
        }))
    } else {
        Err(ApiError::NotFound("post not found".to_string()))
    }
}

// --- Comment Handlers ---

/// create_comment
///
/// [Authenticated Route] Posts a comment on an existing post. The parent
/// post's existence is verified first; commenting on a missing post is 404
/// rather than an orphaned insert.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/comments",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = CreateCommentRequest,
    responses(
        (status = 200, description = "Created", body = Comment),
        (status = 400, description = "Missing Field"),
        (status = 404, description = "Post Not Found")
    )
)]
pub async fn create_comment(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<Json<Comment>, ApiError> {
    require_field(&payload.body, "body")?;

    if state.repo.get_post(post_id).await.is_none() {
        return Err(ApiError::NotFound("post not found".to_string()));
    }

    let comment = state
        .repo
        .create_comment(post_id, user_id, payload.body)
        .await
        .map_err(|e| {
            tracing::error!("create_comment error: {:?}", e);
            ApiError::Internal
        })?;
    Ok(Json(comment))
}

/// get_comments
///
/// [Public Route] Lists a post's comments in insertion order. A nonexistent
/// or deleted post yields an empty list rather than an error.
#[utoipa::path(
    get,
    path = "/api/posts/{id}/comments",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses((status = 200, description = "Comments", body = [Comment]))
)]
pub async fn get_comments(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Json<Vec<models::Comment>> {
    Json(state.repo.get_comments(post_id).await)
}

/// get_my_comments
///
/// [Authenticated Route] Lists the requesting user's comments, newest first,
/// with parent post titles joined.
#[utoipa::path(
    get,
    path = "/api/mycomments",
    responses((status = 200, description = "My Comments", body = [Comment]))
)]
pub async fn get_my_comments(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<models::Comment>> {
    Json(state.repo.get_my_comments(id).await)
}

/// update_comment
///
/// [Authenticated Route] Replaces a comment's body, owner-or-administrator
/// only, with the existence check running first.
#[utoipa::path(
    put,
    path = "/api/comments/{id}",
    params(("id" = i64, Path, description = "Comment ID")),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Updated", body = Comment),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_comment(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCommentRequest>,
) -> Result<Json<Comment>, ApiError> {
    require_field(&payload.body, "body")?;

    let comment = state
        .repo
        .get_comment(id)
        .await
        .ok_or_else(|| ApiError::NotFound("comment not found".to_string()))?;

    if !principal.can_mutate(comment.user_id) {
        return Err(ApiError::InvalidCredential("permission denied".to_string()));
    }

    match state.repo.update_comment(id, payload.body).await {
        Some(updated) => Ok(Json(updated)),
        None => Err(ApiError::NotFound("comment not found".to_string())),
    }
}

/// delete_comment
///
/// [Authenticated Route] Deletes a comment, owner-or-administrator only.
#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    params(("id" = i64, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_comment(
    principal: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let comment = state
        .repo
        .get_comment(id)
        .await
        .ok_or_else(|| ApiError::NotFound("comment not found".to_string()))?;

    if !principal.can_mutate(comment.user_id) {
        return Err(ApiError::InvalidCredential("permission denied".to_string()));
    }

    if state.repo.delete_comment(id).await {
        Ok(Json(MessageResponse {
            message: "comment deleted".to_string(),
        }))
    } else {
        Err(ApiError::NotFound("comment not found".to_string()))
    }
}
