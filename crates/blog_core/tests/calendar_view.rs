use blog_core::db::open_db_in_memory;
use blog_core::{
    CalendarCell, CalendarError, CalendarRequest, MonthRef, Post, PostDraft, PostRepository,
    PostService, PostServiceError, SqlitePostRepository, SqliteUserRepository, User, UserId,
    UserRepository,
};
use chrono::{NaiveDate, TimeZone, Utc};
use rusqlite::Connection;

fn seed_user(conn: &Connection) -> UserId {
    let repo = SqliteUserRepository::try_new(conn).unwrap();
    repo.create_user(&User::new("author", "author@example.com", Utc::now()))
        .unwrap()
}

fn insert_post(conn: &Connection, author: UserId, title: &str, ymdh: (i32, u32, u32, u32)) -> Post {
    let (year, month, day, hour) = ymdh;
    let at = Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap();
    let post = Post::new(author, PostDraft::new(title, "body"), at);
    SqlitePostRepository::try_new(conn)
        .unwrap()
        .create_post(&post)
        .unwrap();
    post
}

fn titles(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|post| post.title.as_str()).collect()
}

#[test]
fn march_2024_calendar_buckets_stored_posts() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn);
    insert_post(&conn, author, "C", (2024, 3, 20, 12));
    insert_post(&conn, author, "B", (2024, 3, 5, 18));
    insert_post(&conn, author, "A", (2024, 3, 5, 9));
    insert_post(&conn, author, "Feb", (2024, 2, 29, 23));
    insert_post(&conn, author, "Apr", (2024, 4, 1, 0));

    let service = PostService::new(SqlitePostRepository::try_new(&conn).unwrap());
    let grid = service.calendar(MonthRef::new(2024, 3).unwrap()).unwrap();

    assert_eq!(titles(grid.posts_on(5)), vec!["A", "B"]);
    assert_eq!(titles(grid.posts_on(20)), vec!["C"]);
    assert_eq!(grid.post_count(), 3);
    assert_eq!(grid.days_in_month(), 31);
    assert_eq!(grid.start_weekday_offset(), 5);
    assert_eq!(grid.previous_month(), MonthRef::new(2024, 2).unwrap());
    assert_eq!(grid.next_month(), MonthRef::new(2024, 4).unwrap());

    let weeks = grid.weeks();
    assert_eq!(weeks.len(), 6);
    assert_eq!(weeks[0][4], CalendarCell::Blank);
    assert!(matches!(weeks[0][5], CalendarCell::Day { day: 1, .. }));
    assert!(matches!(weeks[5][0], CalendarCell::Day { day: 31, .. }));
    assert!(weeks[5][1..].iter().all(|cell| *cell == CalendarCell::Blank));
}

#[test]
fn calendar_skips_soft_deleted_posts() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn);
    let kept = insert_post(&conn, author, "kept", (2024, 2, 10, 8));
    let mut removed = insert_post(&conn, author, "removed", (2024, 2, 10, 9));
    removed.soft_delete(Utc::now());
    SqlitePostRepository::try_new(&conn)
        .unwrap()
        .save_deletion_marker(&removed)
        .unwrap();

    let service = PostService::new(SqlitePostRepository::try_new(&conn).unwrap());
    let grid = service.calendar(MonthRef::new(2024, 2).unwrap()).unwrap();

    assert_eq!(grid.days_in_month(), 29);
    assert_eq!(grid.posts_on(10), std::slice::from_ref(&kept));
}

#[test]
fn calendar_request_defaults_to_supplied_today() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn);
    insert_post(&conn, author, "new year", (2025, 1, 1, 0));

    let service = PostService::new(SqlitePostRepository::try_new(&conn).unwrap());
    let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    let grid = service
        .calendar_for(CalendarRequest::default(), today)
        .unwrap();

    assert_eq!(grid.month(), MonthRef::new(2025, 1).unwrap());
    assert_eq!(titles(grid.posts_on(1)), vec!["new year"]);
    assert_eq!(grid.previous_month(), MonthRef::new(2024, 12).unwrap());
}

#[test]
fn calendar_request_with_invalid_month_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = PostService::new(SqlitePostRepository::try_new(&conn).unwrap());
    let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

    let err = service
        .calendar_for(
            CalendarRequest {
                year: Some(2025),
                month: Some(13),
            },
            today,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        PostServiceError::Calendar(CalendarError::InvalidMonth(13))
    ));
}
