use crate::domain::{booking::Booking, value_objects::*};
use crate::ports::*;

use super::booking_service::{ServiceDependencies, load_item_owner};
use super::errors::{BookingApplicationError, Result};

/// アイテムの直近・次回の承認済み予約（拡張アイテム表示用）
///
/// 保存はされず、要求のたびに計算される。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemAvailabilityView {
    /// 開始が現在以前の承認済み予約のうち、開始が最も遅いもの
    pub last_booking: Option<Booking>,
    /// 開始が現在より後の承認済み予約のうち、開始が最も早いもの
    pub next_booking: Option<Booking>,
}

/// アイテムの直近・次回の予約を導出する
///
/// ビジネスルール：
/// - 対象はAPPROVEDの予約のみ
/// - 予約を閲覧できるのはアイテム所有者のみ。それ以外の要求者には空のビューを返す
///
/// # エラー
/// - ItemNotFound: アイテムが存在しない
pub async fn item_availability(
    deps: &ServiceDependencies,
    item_id: ItemId,
    requester_id: UserId,
) -> Result<ItemAvailabilityView> {
    let owner_id = load_item_owner(deps, item_id).await?;

    if owner_id != requester_id {
        return Ok(ItemAvailabilityView::default());
    }

    let now = deps.clock.now();
    let approved = BookingPredicate::new(BookingSubject::Item(item_id))
        .and(BookingClause::StatusIs(BookingStatus::Approved));

    let last_booking = deps
        .booking_store
        .find_first(
            &approved.clone().and(BookingClause::StartAtOrBefore(now)),
            BookingSort::StartDesc,
        )
        .await
        .map_err(BookingApplicationError::BookingStoreError)?;

    let next_booking = deps
        .booking_store
        .find_first(
            &approved.and(BookingClause::StartAfter(now)),
            BookingSort::StartAsc,
        )
        .await
        .map_err(BookingApplicationError::BookingStoreError)?;

    Ok(ItemAvailabilityView {
        last_booking,
        next_booking,
    })
}

/// ユーザーがアイテムを利用し終えたか（コメント可否の判定用）
///
/// 終了が現在以前の予約が一つでもあれば真。ステータスによる絞り込みは行わない。
pub async fn is_user_booked_item(
    deps: &ServiceDependencies,
    user_id: UserId,
    item_id: ItemId,
) -> Result<bool> {
    deps.booking_store
        .exists_by_booker_and_item_ended_before(user_id, item_id, deps.clock.now())
        .await
        .map_err(BookingApplicationError::BookingStoreError)
}
