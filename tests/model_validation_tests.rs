//! Model serialization tests, centered on the one property that matters
//! most: secret material never reaches a response body.

use board_portal::models::{
    Comment, LoginResponse, MessageResponse, Post, ROLE_STANDARD, User, UserResponse,
};
use chrono::Utc;
use uuid::Uuid;

#[test]
fn test_user_json_never_contains_password_hash() {
    let user = User {
        id: Uuid::new_v4(),
        username: "u1".to_string(),
        password_hash: "$2b$10$secretsecretsecret".to_string(),
        name: "User One".to_string(),
        role: ROLE_STANDARD.to_string(),
        created_at: Utc::now(),
    };

    let json = serde_json::to_string(&user).unwrap();
    assert!(!json.contains("password_hash"));
    assert!(!json.contains("secretsecret"));
    assert!(json.contains("u1"));
}

#[test]
fn test_user_deserializes_without_hash_field() {
    // Rows come from sqlx, but JSON round trips (e.g. test fixtures) must not
    // require the skipped field.
    let json = format!(
        r#"{{"id":"{}","username":"u1","name":"User One","role":"standard","created_at":"2026-01-01T00:00:00Z"}}"#,
        Uuid::new_v4()
    );
    let user: User = serde_json::from_str(&json).unwrap();
    assert_eq!(user.password_hash, "");
}

#[test]
fn test_login_response_shape() {
    let response = LoginResponse {
        token: "tok".to_string(),
        user: UserResponse {
            id: Uuid::new_v4(),
            username: "u1".to_string(),
            name: "User One".to_string(),
            role: ROLE_STANDARD.to_string(),
            created_at: Utc::now(),
        },
    };
    let value: serde_json::Value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["token"], "tok");
    assert_eq!(value["user"]["username"], "u1");
    assert_eq!(value["user"]["role"], "standard");
    assert!(value["user"].get("password_hash").is_none());
}

#[test]
fn test_optional_join_fields_default_to_none() {
    // author_name/post_title are only populated by JOIN queries; plain rows
    // must still decode, so the struct defaults them.
    let post = Post::default();
    assert!(post.author_name.is_none());
    let comment = Comment::default();
    assert!(comment.author_name.is_none());
    assert!(comment.post_title.is_none());
}

#[test]
fn test_message_response_serialization() {
    let message = MessageResponse {
        message: "registration successful".to_string(),
    };
    assert_eq!(
        serde_json::to_string(&message).unwrap(),
        r#"{"message":"registration successful"}"#
    );
}
