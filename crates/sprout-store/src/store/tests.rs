use super::Store;
use chrono::{Duration, NaiveDate, Utc};
use sprout_core::entities::{Group, Notification, Plant, Temporary, User};
use sprout_core::error::SproutError;
use sprout_core::step::Step;
use sprout_core::watering::start_of_day;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Create an in-memory store for testing.
async fn test_store() -> Store {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .unwrap();
    Store::run_migrations(&pool).await.unwrap();
    Store { pool }
}

fn user(telegram_id: i64) -> User {
    let now = Utc::now();
    User {
        telegram_id,
        username: Some(format!("user{telegram_id}")),
        firstname: "Anna".to_string(),
        created_at: now,
        updated_at: now,
        ..Default::default()
    }
}

fn day(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
    start_of_day(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn group(user_id: i64, title: &str, next: chrono::NaiveDateTime) -> Group {
    Group {
        user_id,
        title: title.to_string(),
        description: "desc".to_string(),
        last_watering_date: next - Duration::days(7),
        next_watering_date: next,
        watering_interval: 7,
        ..Default::default()
    }
}

fn plant(group_id: i64, user_id: i64, title: &str) -> Plant {
    Plant {
        group_id,
        user_id,
        title: title.to_string(),
        ..Default::default()
    }
}

/// A user with a scratchpad, returning its id.
async fn seeded_user(store: &Store, telegram_id: i64) -> i64 {
    store
        .create_user_with_temporary(&user(telegram_id))
        .await
        .unwrap()
}

// --- users ---

#[tokio::test]
async fn test_save_and_get_user() {
    let store = test_store().await;
    let id = store.save_user(&user(5559999)).await.unwrap();

    let by_tid = store.get_user_by_telegram_id(5559999).await.unwrap();
    assert_eq!(by_tid.id, id);
    assert_eq!(by_tid.username.as_deref(), Some("user5559999"));
    assert_eq!(by_tid.firstname, "Anna");
    assert!(!by_tid.is_bot);

    let by_id = store.get_user_by_id(id).await.unwrap();
    assert_eq!(by_id, by_tid);
}

#[tokio::test]
async fn test_missing_user_is_not_found() {
    let store = test_store().await;
    assert!(matches!(
        store.get_user_by_telegram_id(1).await,
        Err(SproutError::NotFound(_))
    ));
    assert!(matches!(
        store.get_user_by_id(1).await,
        Err(SproutError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_duplicate_telegram_id_rejected() {
    let store = test_store().await;
    store.save_user(&user(10)).await.unwrap();
    assert!(matches!(
        store.save_user(&user(10)).await,
        Err(SproutError::Storage(_))
    ));
}

#[tokio::test]
async fn test_user_created_with_start_scratchpad() {
    let store = test_store().await;
    let id = seeded_user(&store, 42).await;

    let tmp = store.get_temporary_by_user_id(id).await.unwrap();
    assert_eq!(tmp.user_id, id);
    assert_eq!(tmp.step, Step::Start);
    assert!(tmp.message_id.is_none());
    assert!(tmp.data.is_none());
}

#[tokio::test]
async fn test_user_creation_is_atomic() {
    let store = test_store().await;
    seeded_user(&store, 42).await;

    // Second attempt fails on the user insert and leaves no stray scratchpad.
    assert!(store.create_user_with_temporary(&user(42)).await.is_err());
    let (users, temps): (i64, i64) =
        sqlx::query_as("SELECT (SELECT COUNT(*) FROM users), (SELECT COUNT(*) FROM temporary)")
            .fetch_one(store.pool())
            .await
            .unwrap();
    assert_eq!((users, temps), (1, 1));
}

// --- temporary ---

#[tokio::test]
async fn test_one_scratchpad_per_user() {
    let store = test_store().await;
    let id = seeded_user(&store, 1).await;
    assert!(matches!(
        store.create_temporary(&Temporary::new(id)).await,
        Err(SproutError::Storage(_))
    ));
}

#[tokio::test]
async fn test_update_temporary() {
    let store = test_store().await;
    let id = seeded_user(&store, 1).await;
    let mut tmp = store.get_temporary_by_user_id(id).await.unwrap();

    tmp.step = Step::AddGroupDescription;
    tmp.message_id = Some(321);
    tmp.set_group(&Group {
        title: "Цветы".into(),
        ..Group::draft(id)
    })
    .unwrap();
    store.update_temporary(&tmp).await.unwrap();

    let loaded = store.get_temporary_by_user_id(id).await.unwrap();
    assert_eq!(loaded, tmp);
    assert_eq!(loaded.group().unwrap().title, "Цветы");
}

#[tokio::test]
async fn test_missing_scratchpad_is_not_found() {
    let store = test_store().await;
    let id = store.save_user(&user(3)).await.unwrap();
    assert!(matches!(
        store.get_temporary_by_user_id(id).await,
        Err(SproutError::NotFound(_))
    ));
}

// --- groups ---

#[tokio::test]
async fn test_create_and_get_group() {
    let store = test_store().await;
    let uid = seeded_user(&store, 1).await;
    let g = group(uid, "Суккуленты", day(2024, 6, 8));
    let id = store.create_group(&g).await.unwrap();

    let loaded = store.get_group(id).await.unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.title, "Суккуленты");
    assert_eq!(loaded.next_watering_date, day(2024, 6, 8));
    assert_eq!(loaded.last_watering_date, day(2024, 6, 1));
    assert_eq!(loaded.watering_interval, 7);
    assert!(store.group_exists(uid, "Суккуленты").await.unwrap());
    assert!(!store.group_exists(uid, "Кактусы").await.unwrap());
}

#[tokio::test]
async fn test_group_title_unique_per_user() {
    let store = test_store().await;
    let a = seeded_user(&store, 1).await;
    let b = seeded_user(&store, 2).await;
    store.create_group(&group(a, "Цветы", day(2024, 6, 8))).await.unwrap();

    assert!(matches!(
        store.create_group(&group(a, "Цветы", day(2024, 6, 8))).await,
        Err(SproutError::GroupAlreadyExists)
    ));
    // Another user may reuse the title.
    store.create_group(&group(b, "Цветы", day(2024, 6, 8))).await.unwrap();
}

#[tokio::test]
async fn test_update_group_conflict_and_missing_row() {
    let store = test_store().await;
    let uid = seeded_user(&store, 1).await;
    store.create_group(&group(uid, "A", day(2024, 6, 8))).await.unwrap();
    let b = store.create_group(&group(uid, "B", day(2024, 6, 8))).await.unwrap();

    let mut renamed = store.get_group(b).await.unwrap();
    renamed.title = "A".into();
    assert!(matches!(
        store.update_group(&renamed).await,
        Err(SproutError::GroupAlreadyExists)
    ));

    let mut ghost = group(uid, "ghost", day(2024, 6, 8));
    ghost.id = 9999;
    store.update_group(&ghost).await.unwrap();
}

#[tokio::test]
async fn test_user_groups_ordered_and_counted() {
    let store = test_store().await;
    let uid = seeded_user(&store, 1).await;
    for title in ["c", "a", "b"] {
        store.create_group(&group(uid, title, day(2024, 6, 8))).await.unwrap();
    }
    let groups = store.get_user_groups(uid).await.unwrap();
    let titles: Vec<_> = groups.iter().map(|g| g.title.as_str()).collect();
    assert_eq!(titles, vec!["c", "a", "b"]);
    assert!(groups.windows(2).all(|w| w[0].id < w[1].id));
    assert_eq!(store.count_user_groups(uid).await.unwrap(), 3);
}

#[tokio::test]
async fn test_delete_group_cascades() {
    let store = test_store().await;
    let uid = seeded_user(&store, 1).await;
    let gid = store.create_group(&group(uid, "A", day(2024, 6, 8))).await.unwrap();
    store.create_plant(&plant(gid, uid, "Фикус")).await.unwrap();
    store
        .save_notification(&Notification {
            group_id: gid,
            message_id: 1,
            text: "water".into(),
            sent_at: Utc::now(),
            ..Default::default()
        })
        .await
        .unwrap();

    store.delete_group(gid).await.unwrap();

    assert!(matches!(store.get_group(gid).await, Err(SproutError::NotFound(_))));
    assert_eq!(store.count_user_plants(uid).await.unwrap(), 0);
    let (notifications,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notifications")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(notifications, 0);

    // Deleting again is still a success.
    store.delete_group(gid).await.unwrap();
}

#[tokio::test]
async fn test_groups_for_notify_filters_and_pages() {
    let store = test_store().await;
    let uid = seeded_user(&store, 1).await;
    let now = day(2024, 6, 10) + Duration::hours(12);

    let due1 = store.create_group(&group(uid, "due1", day(2024, 6, 9))).await.unwrap();
    store.create_group(&group(uid, "later", day(2024, 6, 11))).await.unwrap();
    let due2 = store.create_group(&group(uid, "due2", day(2024, 6, 10))).await.unwrap();
    let due3 = store.create_group(&group(uid, "due3", day(2024, 5, 1))).await.unwrap();

    let all = store.get_groups_for_notify(now, 10, 0).await.unwrap();
    let ids: Vec<_> = all.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![due1, due2, due3]);

    let page1 = store.get_groups_for_notify(now, 2, 0).await.unwrap();
    let page2 = store.get_groups_for_notify(now, 2, 2).await.unwrap();
    assert_eq!(page1.iter().map(|g| g.id).collect::<Vec<_>>(), vec![due1, due2]);
    assert_eq!(page2.iter().map(|g| g.id).collect::<Vec<_>>(), vec![due3]);

    // Strictly before now: a group due exactly at `now` is not selected yet.
    let at_midnight = store.get_groups_for_notify(day(2024, 6, 10), 10, 0).await.unwrap();
    assert_eq!(at_midnight.iter().map(|g| g.id).collect::<Vec<_>>(), vec![due1, due3]);
}

// --- plants ---

#[tokio::test]
async fn test_plant_crud() {
    let store = test_store().await;
    let uid = seeded_user(&store, 1).await;
    let gid = store.create_group(&group(uid, "A", day(2024, 6, 8))).await.unwrap();

    let mut p = plant(gid, uid, "Фикус");
    p.photo = vec![1, 2, 3];
    let pid = store.create_plant(&p).await.unwrap();

    let mut loaded = store.get_plant(pid).await.unwrap();
    assert_eq!(loaded.title, "Фикус");
    assert_eq!(loaded.photo, vec![1, 2, 3]);
    assert!(store.plant_exists(gid, "Фикус").await.unwrap());

    loaded.description = "у окна".into();
    store.update_plant(&loaded).await.unwrap();
    assert_eq!(store.get_plant(pid).await.unwrap().description, "у окна");

    store.delete_plant(pid).await.unwrap();
    assert!(matches!(store.get_plant(pid).await, Err(SproutError::NotFound(_))));
}

#[tokio::test]
async fn test_plant_title_unique_per_group() {
    let store = test_store().await;
    let uid = seeded_user(&store, 1).await;
    let a = store.create_group(&group(uid, "A", day(2024, 6, 8))).await.unwrap();
    let b = store.create_group(&group(uid, "B", day(2024, 6, 8))).await.unwrap();
    store.create_plant(&plant(a, uid, "Фикус")).await.unwrap();

    assert!(matches!(
        store.create_plant(&plant(a, uid, "Фикус")).await,
        Err(SproutError::PlantAlreadyExists)
    ));
    let moved = store.create_plant(&plant(b, uid, "Фикус")).await.unwrap();

    // Moving the second one into group A collides.
    let mut p = store.get_plant(moved).await.unwrap();
    p.group_id = a;
    assert!(matches!(
        store.update_plant(&p).await,
        Err(SproutError::PlantAlreadyExists)
    ));
}

#[tokio::test]
async fn test_plant_listing_and_counts() {
    let store = test_store().await;
    let uid = seeded_user(&store, 1).await;
    let a = store.create_group(&group(uid, "A", day(2024, 6, 8))).await.unwrap();
    let b = store.create_group(&group(uid, "B", day(2024, 6, 8))).await.unwrap();
    store.create_plant(&plant(a, uid, "one")).await.unwrap();
    store.create_plant(&plant(b, uid, "two")).await.unwrap();
    store.create_plant(&plant(a, uid, "three")).await.unwrap();

    let in_a: Vec<_> = store
        .get_group_plants(a)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(in_a, vec!["one", "three"]);
    assert_eq!(store.count_group_plants(a).await.unwrap(), 2);
    assert_eq!(store.count_group_plants(b).await.unwrap(), 1);
    assert_eq!(store.count_user_plants(uid).await.unwrap(), 3);
    assert_eq!(store.get_user_plants(uid).await.unwrap().len(), 3);
}

// --- notifications ---

#[tokio::test]
async fn test_notification_saved_and_listed() {
    let store = test_store().await;
    let uid = seeded_user(&store, 1).await;
    let gid = store.create_group(&group(uid, "A", day(2024, 6, 8))).await.unwrap();
    let sent_at = Utc::now();

    let id = store
        .save_notification(&Notification {
            group_id: gid,
            message_id: 555,
            text: "Пора полить".into(),
            sent_at,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(id > 0);

    let since = sent_at - Duration::minutes(1);
    let saved = store.get_group_notifications(gid, since).await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].message_id, 555);
    assert_eq!(saved[0].text, "Пора полить");

    let later = sent_at + Duration::minutes(1);
    assert!(store.get_group_notifications(gid, later).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_notification_for_missing_group_violates_fk() {
    let store = test_store().await;
    let result = store
        .save_notification(&Notification {
            group_id: 404,
            message_id: 1,
            text: "x".into(),
            sent_at: Utc::now(),
            ..Default::default()
        })
        .await;
    assert!(matches!(result, Err(SproutError::Storage(_))));
}

#[tokio::test]
async fn test_stats_counts_rows() {
    let store = test_store().await;
    let uid = seeded_user(&store, 1).await;
    let gid = store.create_group(&group(uid, "A", day(2024, 6, 8))).await.unwrap();
    store.create_plant(&plant(gid, uid, "p")).await.unwrap();

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.users, 1);
    assert_eq!(stats.groups, 1);
    assert_eq!(stats.plants, 1);
    assert_eq!(stats.notifications, 0);
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let store = test_store().await;
    Store::run_migrations(store.pool()).await.unwrap();
    let (applied,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM _migrations")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(applied, 1);
}
