use blog_core::{Post, PostDraft, Principal, Role, User, ValidationError};
use chrono::{TimeZone, Utc};
use uuid::Uuid;

#[test]
fn post_new_sets_defaults() {
    let author = Uuid::new_v4();
    let at = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
    let post = Post::new(author, PostDraft::new("Hello", "World"), at);

    assert!(!post.id.is_nil());
    assert_eq!(post.author_id, author);
    assert_eq!(post.created_at, at);
    assert_eq!(post.updated_at, at);
    assert!(post.is_active());
    assert!(post.is_authored_by(author));
}

#[test]
fn timestamps_are_truncated_to_milliseconds() {
    let at = Utc.timestamp_nanos(1_700_000_000_123_456_789);
    let post = Post::new(Uuid::new_v4(), PostDraft::new("t", "c"), at);
    assert_eq!(post.created_at.timestamp_millis(), 1_700_000_000_123);
    assert_eq!(post.created_at.timestamp_subsec_nanos(), 123_000_000);
}

#[test]
fn soft_delete_keeps_first_marker_and_restore_clears_it() {
    let mut post = Post::new(Uuid::new_v4(), PostDraft::new("t", "c"), Utc::now());
    let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let second = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

    post.soft_delete(first);
    post.soft_delete(second);
    assert_eq!(post.deleted_at, Some(first));
    assert!(!post.is_active());

    post.restore();
    assert!(post.is_active());
}

#[test]
fn apply_replaces_fields_and_never_moves_updated_at_before_created_at() {
    let created = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
    let mut post = Post::new(Uuid::new_v4(), PostDraft::new("t", "c"), created);

    post.apply(PostDraft::new("new title", "new body"), created - chrono::Duration::hours(1));
    assert_eq!(post.title, "new title");
    assert_eq!(post.content, "new body");
    assert_eq!(post.updated_at, created);
}

#[test]
fn draft_validation_enforces_required_fields_and_lengths() {
    assert_eq!(PostDraft::new("a".repeat(64), "ok").validate(), Ok(()));
    assert_eq!(PostDraft::new("ok", "a".repeat(1024)).validate(), Ok(()));

    assert_eq!(
        PostDraft::new("a".repeat(65), "ok").validate(),
        Err(ValidationError::TitleTooLong {
            max: 64,
            actual: 65
        })
    );
    assert_eq!(
        PostDraft::new("ok", "a".repeat(1025)).validate(),
        Err(ValidationError::ContentTooLong {
            max: 1024,
            actual: 1025
        })
    );
    assert_eq!(
        PostDraft::new("", "ok").validate(),
        Err(ValidationError::MissingTitle)
    );
    assert_eq!(
        PostDraft::new("ok", "").validate(),
        Err(ValidationError::MissingContent)
    );
}

#[test]
fn nil_id_fails_validation() {
    let mut post = Post::new(Uuid::new_v4(), PostDraft::new("t", "c"), Utc::now());
    post.id = Uuid::nil();
    assert_eq!(post.validate(), Err(ValidationError::NilId));
}

#[test]
fn post_serialization_uses_expected_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let author = Uuid::parse_str("66666666-7777-4888-9999-aaaaaaaaaaaa").unwrap();
    let at = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
    let mut post = Post::new(author, PostDraft::new("Hello", "World"), at);
    post.id = id;

    let json = serde_json::to_value(&post).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["author_id"], author.to_string());
    assert_eq!(json["title"], "Hello");
    assert_eq!(json["created_at"], "2024-03-05T10:00:00Z");
    assert!(json["deleted_at"].is_null());

    let decoded: Post = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, post);
}

#[test]
fn user_email_is_normalized_and_validated() {
    let user = User::new("  Alice ", "  Alice@Example.COM ", Utc::now());
    assert_eq!(user.name, "Alice");
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.validate(), Ok(()));

    let bad = User::new("Bob", "not-an-email", Utc::now());
    assert_eq!(
        bad.validate(),
        Err(ValidationError::InvalidEmail("not-an-email".to_string()))
    );
    assert_eq!(
        User::new(" ", "x@y.z", Utc::now()).validate(),
        Err(ValidationError::MissingName)
    );
}

#[test]
fn principal_role_follows_admin_flag() {
    let mut user = User::new("Root", "root@example.com", Utc::now());
    assert_eq!(Principal::from(&user).role, Role::Member);

    user.is_admin = true;
    let principal = Principal::from(&user);
    assert!(principal.is_admin());
    assert_eq!(principal.user_id, user.id);
}
