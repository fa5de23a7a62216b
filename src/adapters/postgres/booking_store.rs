use crate::domain::booking::{Booking, NewBooking};
use crate::domain::value_objects::{BookingId, BookingPeriod, BookingStatus, ItemId, UserId};
use crate::ports::booking_store::{
    BookingClause, BookingPredicate, BookingSort, BookingStore as BookingStoreTrait,
    BookingStoreError, BookingSubject, PageRequest, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};
use std::str::FromStr;

const BOOKING_COLUMNS: &str = r#"
    booking_id,
    item_id,
    booker_id,
    start_at,
    end_at,
    status,
    version,
    created_at,
    updated_at
"#;

fn invalid_data(message: String) -> BookingStoreError {
    BookingStoreError::backend(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        message,
    ))
}

/// PostgreSQLの行データをBookingに変換する
///
/// statusの文字列からの変換と、期間（start < end）の検証でエラーハンドリングを行う。
fn map_row_to_booking(row: &PgRow) -> Result<Booking> {
    let status_str: &str = row.get("status");
    let status = BookingStatus::from_str(status_str).map_err(invalid_data)?;

    let start: DateTime<Utc> = row.get("start_at");
    let end: DateTime<Utc> = row.get("end_at");
    let period = BookingPeriod::new(start, end)
        .map_err(|_| invalid_data(format!("invalid booking period: {} - {}", start, end)))?;

    Ok(Booking {
        booking_id: BookingId::from_uuid(row.get("booking_id")),
        item_id: ItemId::from_uuid(row.get("item_id")),
        booker_id: UserId::from_uuid(row.get("booker_id")),
        period,
        status,
        version: row.get("version"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// 述語・並び順・ページ指定からSELECT文を組み立てる
///
/// 値はすべてバインドパラメータとして渡す。
pub(crate) fn build_select(
    predicate: &BookingPredicate,
    sort: BookingSort,
    page: PageRequest,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {} FROM bookings WHERE ", BOOKING_COLUMNS));

    match &predicate.subject {
        BookingSubject::Booker(user_id) => builder.push("booker_id = ").push_bind(user_id.value()),
        BookingSubject::Item(item_id) => builder.push("item_id = ").push_bind(item_id.value()),
        BookingSubject::Items(item_ids) => builder
            .push("item_id = ANY(")
            .push_bind(item_ids.iter().map(|id| id.value()).collect::<Vec<_>>())
            .push(")"),
    };

    for clause in &predicate.clauses {
        builder.push(" AND ");
        match *clause {
            BookingClause::StartAtOrBefore(t) => builder.push("start_at <= ").push_bind(t),
            BookingClause::StartAfter(t) => builder.push("start_at > ").push_bind(t),
            BookingClause::EndBefore(t) => builder.push("end_at < ").push_bind(t),
            BookingClause::EndAtOrAfter(t) => builder.push("end_at >= ").push_bind(t),
            BookingClause::StatusIs(status) => builder.push("status = ").push_bind(status.as_str()),
        };
    }

    builder.push(match sort {
        BookingSort::StartDesc => " ORDER BY start_at DESC, booking_id DESC",
        BookingSort::StartAsc => " ORDER BY start_at ASC, booking_id ASC",
    });
    builder
        .push(" LIMIT ")
        .push_bind(i64::from(page.size()))
        .push(" OFFSET ")
        .push_bind(i64::try_from(page.skip()).unwrap_or(i64::MAX));

    builder
}

/// BookingStoreのPostgreSQL実装
pub struct BookingStore {
    pool: PgPool,
}

impl BookingStore {
    /// PostgreSQLコネクションプールから新しいBookingStoreを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStoreTrait for BookingStore {
    async fn insert(&self, booking: NewBooking) -> Result<Booking> {
        let booking = booking.into_booking(BookingId::new());

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO bookings (
                booking_id,
                item_id,
                booker_id,
                start_at,
                end_at,
                status,
                version,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        ))
        .bind(booking.booking_id.value())
        .bind(booking.item_id.value())
        .bind(booking.booker_id.value())
        .bind(booking.start())
        .bind(booking.end())
        .bind(booking.status.as_str())
        .bind(booking.version)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(BookingStoreError::backend)?;

        map_row_to_booking(&row)
    }

    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM bookings WHERE booking_id = $1",
            BOOKING_COLUMNS
        ))
        .bind(booking_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(BookingStoreError::backend)?;

        row.as_ref().map(map_row_to_booking).transpose()
    }

    /// versionを条件にステータスを更新する
    ///
    /// 更新行がなければ（versionの不一致または予約が存在しない）Conflictを返す。
    async fn update_status(
        &self,
        booking_id: BookingId,
        expected_version: i32,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Booking> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE bookings
            SET status = $1, updated_at = $2, version = version + 1
            WHERE booking_id = $3 AND version = $4
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        ))
        .bind(status.as_str())
        .bind(updated_at)
        .bind(booking_id.value())
        .bind(expected_version)
        .fetch_optional(&self.pool)
        .await
        .map_err(BookingStoreError::backend)?;

        match row {
            Some(row) => map_row_to_booking(&row),
            None => Err(BookingStoreError::Conflict(booking_id)),
        }
    }

    async fn query(
        &self,
        predicate: &BookingPredicate,
        sort: BookingSort,
        page: PageRequest,
    ) -> Result<Vec<Booking>> {
        let mut builder = build_select(predicate, sort, page);
        let mut rows = builder.build().fetch(&self.pool);

        let mut bookings = Vec::new();
        while let Some(row) = rows.try_next().await.map_err(BookingStoreError::backend)? {
            bookings.push(map_row_to_booking(&row)?);
        }

        Ok(bookings)
    }

    async fn exists_by_booker_and_item_ended_before(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        instant: DateTime<Utc>,
    ) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM bookings
                WHERE booker_id = $1 AND item_id = $2 AND end_at <= $3
            )
            "#,
        )
        .bind(booker_id.value())
        .bind(item_id.value())
        .bind(instant)
        .fetch_one(&self.pool)
        .await
        .map_err(BookingStoreError::backend)
    }
}
