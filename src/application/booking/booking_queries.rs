use crate::domain::{BookingStateFilter, booking::Booking, value_objects::*};
use crate::ports::*;
use chrono::{DateTime, Utc};

use super::booking_service::{ServiceDependencies, ensure_user_exists, load_item_owner};
use super::errors::{BookingApplicationError, Result};

/// 一覧取得の共通パラメータ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListBookings {
    pub state: BookingStateFilter,
    /// 読み飛ばす件数（limitの倍数であることを前提とする）
    pub offset: u32,
    pub limit: u32,
}

/// 対象条件と状態フィルタから述語を組み立てる（純粋な関数）
///
/// - ALL: 条件なし
/// - CURRENT: start <= now AND end >= now
/// - PAST: end < now
/// - FUTURE: start > now
/// - ステータス: status = state
///
/// CURRENT / PAST / FUTURE は start < end の予約集合を重複なく分割する。
pub fn build_predicate(
    subject: BookingSubject,
    state: BookingStateFilter,
    now: DateTime<Utc>,
) -> BookingPredicate {
    let predicate = BookingPredicate::new(subject);
    match state {
        BookingStateFilter::All => predicate,
        BookingStateFilter::Current => predicate
            .and(BookingClause::StartAtOrBefore(now))
            .and(BookingClause::EndAtOrAfter(now)),
        BookingStateFilter::Past => predicate.and(BookingClause::EndBefore(now)),
        BookingStateFilter::Future => predicate.and(BookingClause::StartAfter(now)),
        BookingStateFilter::Waiting => {
            predicate.and(BookingClause::StatusIs(BookingStatus::Waiting))
        }
        BookingStateFilter::Approved => {
            predicate.and(BookingClause::StatusIs(BookingStatus::Approved))
        }
        BookingStateFilter::Rejected => {
            predicate.and(BookingClause::StatusIs(BookingStatus::Rejected))
        }
        BookingStateFilter::Canceled => {
            predicate.and(BookingClause::StatusIs(BookingStatus::Canceled))
        }
    }
}

async fn list_by_subject(
    deps: &ServiceDependencies,
    subject: BookingSubject,
    params: ListBookings,
) -> Result<Vec<Booking>> {
    let page = PageRequest::from_offset(params.offset, params.limit)
        .map_err(|_| BookingApplicationError::InvalidPage)?;
    let predicate = build_predicate(subject, params.state, deps.clock.now());

    deps.booking_store
        .query(&predicate, BookingSort::StartDesc, page)
        .await
        .map_err(BookingApplicationError::BookingStoreError)
}

/// 予約者としての予約一覧を取得する
///
/// 開始日時の降順（同時刻はID降順）で、指定ページの内容のみを返す。
pub async fn list_booker_bookings(
    deps: &ServiceDependencies,
    booker_id: UserId,
    params: ListBookings,
) -> Result<Vec<Booking>> {
    ensure_user_exists(deps, booker_id).await?;
    list_by_subject(deps, BookingSubject::Booker(booker_id), params).await
}

/// 所有アイテムに対する予約一覧を取得する
///
/// 所有関係は呼び出し時点のアイテムディレクトリから解決する。
pub async fn list_owner_bookings(
    deps: &ServiceDependencies,
    owner_id: UserId,
    params: ListBookings,
) -> Result<Vec<Booking>> {
    ensure_user_exists(deps, owner_id).await?;

    let item_ids = deps
        .item_directory
        .items_owned_by(owner_id)
        .await
        .map_err(BookingApplicationError::ItemDirectoryError)?;

    list_by_subject(deps, BookingSubject::Items(item_ids), params).await
}

/// アイテム単位の予約一覧を取得する（所有者のみ）
pub async fn list_item_bookings(
    deps: &ServiceDependencies,
    caller_id: UserId,
    item_id: ItemId,
    params: ListBookings,
) -> Result<Vec<Booking>> {
    ensure_user_exists(deps, caller_id).await?;
    let owner_id = load_item_owner(deps, item_id).await?;

    if owner_id != caller_id {
        return Err(BookingApplicationError::NotItemOwner(caller_id));
    }

    list_by_subject(deps, BookingSubject::Item(item_id), params).await
}
