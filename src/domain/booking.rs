use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{
    BookingId, BookingPeriod, BookingStatus, CreateBookingError, DecideBookingError, ItemId,
    UserId,
};

/// 予約集約
///
/// 作成後は予約ストアが所有し、削除されることはない。
/// ステータスは WAITING から APPROVED / REJECTED へ一度だけ遷移する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booking {
    // 識別子
    pub booking_id: BookingId,

    // 他の集約への参照（IDのみ）
    /// 所有者はアイテムディレクトリが管理する
    pub item_id: ItemId,
    pub booker_id: UserId,

    // 予約管理の責務
    pub period: BookingPeriod,
    pub status: BookingStatus,

    // 楽観的排他制御
    pub version: i32,

    // 監査情報
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn start(&self) -> DateTime<Utc> {
        self.period.start()
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.period.end()
    }

    /// 予約者またはアイテムの現在の所有者か
    pub fn is_visible_to(&self, user_id: UserId, item_owner_id: UserId) -> bool {
        self.booker_id == user_id || item_owner_id == user_id
    }
}

/// ストアに渡す前の予約（IDはストアが採番する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub item_id: ItemId,
    pub booker_id: UserId,
    pub period: BookingPeriod,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl NewBooking {
    /// ストアが採番したIDを付与して永続化済みの予約にする
    pub fn into_booking(self, booking_id: BookingId) -> Booking {
        Booking {
            booking_id,
            item_id: self.item_id,
            booker_id: self.booker_id,
            period: self.period,
            status: self.status,
            version: 1,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// 純粋関数：予約をリクエストする
///
/// ビジネスルール：
/// - 予約期間は start < end
/// - 状態はWAITING
///
/// 所有者・貸出可否のチェックはアプリケーション層で行う（ディレクトリへの問い合わせが必要なため）。
pub fn request_booking(
    item_id: ItemId,
    booker_id: UserId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    requested_at: DateTime<Utc>,
) -> Result<NewBooking, CreateBookingError> {
    let period = BookingPeriod::new(start, end)?;

    Ok(NewBooking {
        item_id,
        booker_id,
        period,
        status: BookingStatus::Waiting,
        created_at: requested_at,
    })
}

/// 純粋関数：予約を承認または却下する
///
/// ビジネスルール：
/// - WAITING以外からは遷移できない（判断は一度だけ）
///
/// 副作用なし。新しいBookingを返す。versionの更新はストアが行う。
pub fn decide_booking(
    booking: &Booking,
    approved: bool,
    decided_at: DateTime<Utc>,
) -> Result<Booking, DecideBookingError> {
    if !booking.status.is_waiting() {
        return Err(DecideBookingError::AlreadyDecided(booking.status));
    }

    let status = if approved {
        BookingStatus::Approved
    } else {
        BookingStatus::Rejected
    };

    Ok(Booking {
        status,
        updated_at: decided_at,
        ..booking.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn waiting_booking() -> Booking {
        let now = Utc::now();
        request_booking(
            ItemId::new(),
            UserId::new(),
            now + Duration::hours(1),
            now + Duration::hours(2),
            now,
        )
        .unwrap()
        .into_booking(BookingId::new())
    }

    #[test]
    fn test_request_booking_starts_waiting() {
        let item_id = ItemId::new();
        let booker_id = UserId::new();
        let now = Utc::now();

        let booking = request_booking(
            item_id,
            booker_id,
            now + Duration::hours(1),
            now + Duration::hours(2),
            now,
        )
        .unwrap();

        assert_eq!(booking.status, BookingStatus::Waiting);
        assert_eq!(booking.item_id, item_id);
        assert_eq!(booking.booker_id, booker_id);
        assert_eq!(booking.created_at, now);
    }

    #[test]
    fn test_request_booking_rejects_inverted_period() {
        let now = Utc::now();
        let result = request_booking(
            ItemId::new(),
            UserId::new(),
            now + Duration::hours(2),
            now + Duration::hours(1),
            now,
        );
        assert_eq!(result.unwrap_err(), CreateBookingError::InvalidPeriod);
    }

    #[test]
    fn test_into_booking_sets_initial_version() {
        let booking = waiting_booking();
        assert_eq!(booking.version, 1);
        assert_eq!(booking.created_at, booking.updated_at);
    }

    #[test]
    fn test_decide_booking_approves() {
        let booking = waiting_booking();
        let decided_at = booking.created_at + Duration::minutes(5);

        let decided = decide_booking(&booking, true, decided_at).unwrap();

        assert_eq!(decided.status, BookingStatus::Approved);
        assert_eq!(decided.updated_at, decided_at);
        assert_eq!(decided.booking_id, booking.booking_id);
    }

    #[test]
    fn test_decide_booking_rejects() {
        let booking = waiting_booking();
        let decided = decide_booking(&booking, false, Utc::now()).unwrap();
        assert_eq!(decided.status, BookingStatus::Rejected);
    }

    #[test]
    fn test_decide_booking_fails_once_decided() {
        let booking = waiting_booking();
        let approved = decide_booking(&booking, true, Utc::now()).unwrap();

        for again in [true, false] {
            let result = decide_booking(&approved, again, Utc::now());
            assert_eq!(
                result.unwrap_err(),
                DecideBookingError::AlreadyDecided(BookingStatus::Approved)
            );
        }
    }

    #[test]
    fn test_decide_booking_fails_when_canceled() {
        let mut booking = waiting_booking();
        booking.status = BookingStatus::Canceled;

        let result = decide_booking(&booking, true, Utc::now());
        assert_eq!(
            result.unwrap_err(),
            DecideBookingError::AlreadyDecided(BookingStatus::Canceled)
        );
    }

    #[test]
    fn test_visibility_limited_to_booker_and_owner() {
        let booking = waiting_booking();
        let owner_id = UserId::new();
        assert!(booking.is_visible_to(booking.booker_id, owner_id));
        assert!(booking.is_visible_to(owner_id, owner_id));
        assert!(!booking.is_visible_to(UserId::new(), owner_id));
    }
}
