use crate::domain::{self, CreateBookingError, DecideBookingError, booking::Booking, commands::*};
use crate::domain::value_objects::*;
use crate::ports::*;
use std::sync::Arc;

use super::errors::{BookingApplicationError, Result};

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
/// ディレクトリと時計はトレイトオブジェクトとして注入され、テストではフェイクに差し替える。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub booking_store: Arc<dyn BookingStore>,
    pub user_directory: Arc<dyn UserDirectory>,
    pub item_directory: Arc<dyn ItemDirectory>,
    pub clock: Arc<dyn Clock>,
}

/// ユーザーの存在を確認するヘルパー関数
///
/// 予約作成・承認・参照・一覧取得で共通利用される。
pub(super) async fn ensure_user_exists(deps: &ServiceDependencies, user_id: UserId) -> Result<()> {
    let exists = deps
        .user_directory
        .exists(user_id)
        .await
        .map_err(BookingApplicationError::UserDirectoryError)?;

    if !exists {
        return Err(BookingApplicationError::UserNotFound(user_id));
    }
    Ok(())
}

/// アイテムを取得するヘルパー関数
///
/// # エラー
/// - ItemDirectoryError: ディレクトリの読み込み失敗
/// - ItemNotFound: アイテムが存在しない
async fn load_item(deps: &ServiceDependencies, item_id: ItemId) -> Result<Item> {
    deps.item_directory
        .get(item_id)
        .await
        .map_err(BookingApplicationError::ItemDirectoryError)?
        .ok_or(BookingApplicationError::ItemNotFound(item_id))
}

/// アイテムの所有者を取得するヘルパー関数
///
/// 所有者のみに許可される参照系の操作で使用される。
pub(super) async fn load_item_owner(deps: &ServiceDependencies, item_id: ItemId) -> Result<UserId> {
    deps.item_directory
        .owner_of(item_id)
        .await
        .map_err(BookingApplicationError::ItemDirectoryError)?
        .ok_or(BookingApplicationError::ItemNotFound(item_id))
}

async fn load_booking(deps: &ServiceDependencies, booking_id: BookingId) -> Result<Booking> {
    deps.booking_store
        .find_by_id(booking_id)
        .await
        .map_err(BookingApplicationError::BookingStoreError)?
        .ok_or(BookingApplicationError::BookingNotFound(booking_id))
}

/// アイテムの予約をリクエストする
///
/// ビジネスルール：
/// - 予約者が存在すること
/// - アイテムが存在し、貸出可能であること
/// - 自分のアイテムは予約できないこと
/// - 予約期間が start < end であること
///
/// 同一アイテム・同一時間帯の既存予約との重複チェックは行わない。
///
/// # 戻り値
/// 成功時はWAITING状態で保存された予約
pub async fn create_booking(deps: &ServiceDependencies, cmd: CreateBooking) -> Result<Booking> {
    // 1. 予約者の存在確認
    ensure_user_exists(deps, cmd.booker_id).await?;

    // 2. アイテムの取得
    let item = load_item(deps, cmd.item_id).await?;

    // 3. 貸出可否
    if !item.available {
        return Err(BookingApplicationError::ItemUnavailable(cmd.item_id));
    }

    // 4. 自分のアイテムの予約は不可
    if item.owner_id == cmd.booker_id {
        return Err(BookingApplicationError::OwnItemBooking);
    }

    // 5. ドメイン層の純粋関数を呼び出し
    let new_booking = domain::booking::request_booking(
        item.item_id,
        cmd.booker_id,
        cmd.start,
        cmd.end,
        deps.clock.now(),
    )
    .map_err(|e| match e {
        CreateBookingError::InvalidPeriod => BookingApplicationError::InvalidBookingPeriod,
    })?;

    // 6. 保存（IDはストアが採番）
    let booking = deps
        .booking_store
        .insert(new_booking)
        .await
        .map_err(BookingApplicationError::BookingStoreError)?;

    tracing::info!(
        booking_id = %booking.booking_id.value(),
        item_id = %booking.item_id.value(),
        booker_id = %booking.booker_id.value(),
        "Booking requested"
    );

    Ok(booking)
}

/// 予約を承認または却下する
///
/// ビジネスルール：
/// - 呼び出し元ユーザーが存在すること
/// - 予約が存在すること
/// - アイテム所有者のみが判断できること（それ以外はForbidden）
/// - WAITING状態からのみ遷移でき、判断は一度だけであること
///
/// # 一貫性保証
///
/// ストアへの書き込みはversionによる比較更新で行う。
/// 同一予約に対する並行した判断のうち成功するのは一つだけで、残りはStatusAlreadyDecidedになる。
pub async fn decide_booking(deps: &ServiceDependencies, cmd: DecideBooking) -> Result<Booking> {
    // 1. 呼び出し元の存在確認
    ensure_user_exists(deps, cmd.owner_id).await?;

    // 2. 予約の取得
    let booking = load_booking(deps, cmd.booking_id).await?;

    // 3. 所有者確認（アイテムの現在の所有者）
    let item_owner_id = load_item_owner(deps, booking.item_id).await?;
    if item_owner_id != cmd.owner_id {
        return Err(BookingApplicationError::NotItemOwner(cmd.owner_id));
    }

    // 4. ドメイン層の純粋関数で状態遷移
    let decided = domain::booking::decide_booking(&booking, cmd.approved, deps.clock.now())
        .map_err(|e| match e {
            DecideBookingError::AlreadyDecided(status) => {
                BookingApplicationError::StatusAlreadyDecided(status)
            }
        })?;

    // 5. versionを条件に保存
    let updated = match deps
        .booking_store
        .update_status(
            booking.booking_id,
            booking.version,
            decided.status,
            decided.updated_at,
        )
        .await
    {
        Ok(updated) => updated,
        Err(BookingStoreError::Conflict(booking_id)) => {
            tracing::warn!(
                booking_id = %booking_id.value(),
                "Lost race while deciding booking"
            );
            let current = load_booking(deps, booking_id).await?;
            return Err(BookingApplicationError::StatusAlreadyDecided(current.status));
        }
        Err(e) => return Err(BookingApplicationError::BookingStoreError(e)),
    };

    tracing::info!(
        booking_id = %updated.booking_id.value(),
        status = %updated.status,
        "Booking decided"
    );

    Ok(updated)
}

/// IDで予約を取得する（予約者・所有者のみ）
///
/// 権限のない呼び出し元には、存在を漏らさないようBookingNotFoundを返す。
pub async fn get_booking(
    deps: &ServiceDependencies,
    caller_id: UserId,
    booking_id: BookingId,
) -> Result<Booking> {
    ensure_user_exists(deps, caller_id).await?;

    let booking = load_booking(deps, booking_id).await?;
    let item_owner_id = load_item_owner(deps, booking.item_id).await?;

    if !booking.is_visible_to(caller_id, item_owner_id) {
        tracing::debug!(
            booking_id = %booking_id.value(),
            caller_id = %caller_id.value(),
            "Masking booking from unrelated caller"
        );
        return Err(BookingApplicationError::BookingNotFound(booking_id));
    }

    Ok(booking)
}
