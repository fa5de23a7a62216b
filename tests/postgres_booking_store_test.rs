//! PostgreSQL予約ストアの統合テスト
//!
//! DATABASE_URLで接続できるPostgreSQLが必要なため、デフォルトでは無視される。
//! `cargo test -- --ignored` で実行する。

mod common;

use chrono::{DateTime, Duration, Utc};
use common::{base_time, create_test_pool};
use rental_booking::adapters::postgres::PostgresBookingStore;
use rental_booking::domain::booking::{NewBooking, request_booking};
use rental_booking::domain::value_objects::*;
use rental_booking::ports::{
    BookingClause, BookingPredicate, BookingSort, BookingStore, BookingStoreError,
    BookingSubject, PageRequest,
};
use serial_test::serial;
use sqlx::PgPool;

async fn setup() -> (PgPool, PostgresBookingStore) {
    let pool = create_test_pool().await;
    sqlx::query("TRUNCATE TABLE bookings")
        .execute(&pool)
        .await
        .expect("Failed to truncate bookings");
    let store = PostgresBookingStore::new(pool.clone());
    (pool, store)
}

fn new_booking(
    item_id: ItemId,
    booker_id: UserId,
    start: DateTime<Utc>,
    hours: i64,
) -> NewBooking {
    request_booking(
        item_id,
        booker_id,
        start,
        start + Duration::hours(hours),
        base_time(),
    )
    .unwrap()
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
#[serial]
async fn test_insert_and_find_by_id() {
    let (_pool, store) = setup().await;
    let now = base_time();

    let inserted = store
        .insert(new_booking(
            ItemId::new(),
            UserId::new(),
            now + Duration::hours(1),
            2,
        ))
        .await
        .unwrap();

    assert_eq!(inserted.version, 1);
    assert_eq!(inserted.status, BookingStatus::Waiting);

    let found = store.find_by_id(inserted.booking_id).await.unwrap();
    assert_eq!(found, Some(inserted));

    let missing = store.find_by_id(BookingId::new()).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
#[serial]
async fn test_update_status_compare_and_set() {
    let (_pool, store) = setup().await;
    let now = base_time();

    let inserted = store
        .insert(new_booking(
            ItemId::new(),
            UserId::new(),
            now + Duration::hours(1),
            2,
        ))
        .await
        .unwrap();

    let updated = store
        .update_status(
            inserted.booking_id,
            inserted.version,
            BookingStatus::Approved,
            now + Duration::minutes(5),
        )
        .await
        .unwrap();
    assert_eq!(updated.status, BookingStatus::Approved);
    assert_eq!(updated.version, 2);
    assert_eq!(updated.updated_at, now + Duration::minutes(5));

    // 古いversionでの更新は競合
    let stale = store
        .update_status(
            inserted.booking_id,
            inserted.version,
            BookingStatus::Rejected,
            now + Duration::minutes(6),
        )
        .await;
    assert!(matches!(
        stale,
        Err(BookingStoreError::Conflict(id)) if id == inserted.booking_id
    ));

    let stored = store.find_by_id(inserted.booking_id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookingStatus::Approved);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
#[serial]
async fn test_query_filters_sorts_and_pages() {
    let (_pool, store) = setup().await;
    let now = base_time();
    let booker_id = UserId::new();
    let item_id = ItemId::new();
    let other_item_id = ItemId::new();

    let mut inserted = Vec::new();
    for offset in [-10, -3, 2, 5, 8] {
        inserted.push(
            store
                .insert(new_booking(
                    item_id,
                    booker_id,
                    now + Duration::hours(offset),
                    1,
                ))
                .await
                .unwrap(),
        );
    }
    // 別の予約者・別のアイテムのノイズ
    store
        .insert(new_booking(
            item_id,
            UserId::new(),
            now + Duration::hours(4),
            1,
        ))
        .await
        .unwrap();
    store
        .insert(new_booking(
            ItemId::new(),
            UserId::new(),
            now + Duration::hours(4),
            1,
        ))
        .await
        .unwrap();

    let by_booker = BookingPredicate::new(BookingSubject::Booker(booker_id));
    let all = store
        .query(&by_booker, BookingSort::StartDesc, PageRequest::from_offset(0, 10).unwrap())
        .await
        .unwrap();
    let expected: Vec<_> = inserted.iter().rev().map(|b| b.booking_id).collect();
    assert_eq!(all.iter().map(|b| b.booking_id).collect::<Vec<_>>(), expected);

    let second_page = store
        .query(&by_booker, BookingSort::StartDesc, PageRequest::from_offset(2, 2).unwrap())
        .await
        .unwrap();
    assert_eq!(
        second_page.iter().map(|b| b.booking_id).collect::<Vec<_>>(),
        expected[2..4].to_vec()
    );

    let future = by_booker.clone().and(BookingClause::StartAfter(now));
    let upcoming = store
        .find_first(&future, BookingSort::StartAsc)
        .await
        .unwrap();
    assert_eq!(upcoming.map(|b| b.booking_id), Some(inserted[2].booking_id));

    let by_items = BookingPredicate::new(BookingSubject::Items(vec![item_id, other_item_id]))
        .and(BookingClause::StatusIs(BookingStatus::Waiting));
    let owned = store
        .query(&by_items, BookingSort::StartDesc, PageRequest::from_offset(0, 100).unwrap())
        .await
        .unwrap();
    assert_eq!(owned.len(), 6);
    assert!(owned.iter().all(|b| b.item_id == item_id));

    let none = store
        .query(
            &BookingPredicate::new(BookingSubject::Items(Vec::new())),
            BookingSort::StartDesc,
            PageRequest::from_offset(0, 100).unwrap(),
        )
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
#[serial]
async fn test_exists_by_booker_and_item_ended_before() {
    let (_pool, store) = setup().await;
    let now = base_time();
    let booker_id = UserId::new();
    let item_id = ItemId::new();

    store
        .insert(new_booking(
            item_id,
            booker_id,
            now - Duration::hours(2),
            2,
        ))
        .await
        .unwrap();

    assert!(
        store
            .exists_by_booker_and_item_ended_before(booker_id, item_id, now)
            .await
            .unwrap()
    );
    assert!(
        !store
            .exists_by_booker_and_item_ended_before(booker_id, item_id, now - Duration::hours(1))
            .await
            .unwrap()
    );
    assert!(
        !store
            .exists_by_booker_and_item_ended_before(UserId::new(), item_id, now)
            .await
            .unwrap()
    );
}
