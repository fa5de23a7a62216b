use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::booking::{BookingApplicationError, ItemAvailabilityView, ListBookings};
use crate::domain::{
    BookingStateFilter, booking::Booking, commands::CreateBooking, value_objects::*,
};

/// 一覧のデフォルトページサイズ
const DEFAULT_PAGE_SIZE: u32 = 10;

/// 予約作成リクエスト（POST /bookings）
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub item_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CreateBookingRequest {
    /// 入力検証：開始・終了がともに未来で、start < end であること
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), String> {
        if self.start <= now {
            return Err("start must be in the future".to_string());
        }
        if self.end <= now {
            return Err("end must be in the future".to_string());
        }
        if self.start >= self.end {
            return Err("start must be before end".to_string());
        }
        Ok(())
    }

    pub fn to_command(&self, booker_id: UserId) -> CreateBooking {
        CreateBooking {
            booker_id,
            item_id: ItemId::from_uuid(self.item_id),
            start: self.start,
            end: self.end,
        }
    }
}

/// 承認・却下のクエリパラメータ（PATCH /bookings/:id）
#[derive(Debug, Deserialize)]
pub struct DecideBookingQuery {
    pub approved: bool,
}

/// 予約一覧取得のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct ListBookingsQuery {
    /// 状態フィルタ（デフォルト: ALL）
    pub state: Option<String>,
    /// 読み飛ばす件数（デフォルト: 0）
    pub from: Option<u32>,
    /// ページサイズ（デフォルト: 10）
    pub size: Option<u32>,
}

impl ListBookingsQuery {
    pub fn to_params(&self) -> Result<ListBookings, BookingApplicationError> {
        let state = match &self.state {
            Some(state) => parse_state_filter(state)?,
            None => BookingStateFilter::All,
        };
        Ok(ListBookings {
            state,
            offset: self.from.unwrap_or(0),
            limit: self.size.unwrap_or(DEFAULT_PAGE_SIZE),
        })
    }
}

/// 予約レスポンス
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub booking_id: Uuid,
    pub item_id: Uuid,
    pub booker_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            booking_id: booking.booking_id.value(),
            item_id: booking.item_id.value(),
            booker_id: booking.booker_id.value(),
            start: booking.start(),
            end: booking.end(),
            status: booking.status.as_str().to_string(),
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

/// 拡張アイテム表示に埋め込む予約の要約
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummaryResponse {
    pub booking_id: Uuid,
    pub booker_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<Booking> for BookingSummaryResponse {
    fn from(booking: Booking) -> Self {
        Self {
            booking_id: booking.booking_id.value(),
            booker_id: booking.booker_id.value(),
            start: booking.start(),
            end: booking.end(),
        }
    }
}

/// アイテムの直近・次回予約レスポンス（GET /items/:id/availability）
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAvailabilityResponse {
    pub item_id: Uuid,
    pub last_booking: Option<BookingSummaryResponse>,
    pub next_booking: Option<BookingSummaryResponse>,
}

impl ItemAvailabilityResponse {
    pub fn new(item_id: ItemId, view: ItemAvailabilityView) -> Self {
        Self {
            item_id: item_id.value(),
            last_booking: view.last_booking.map(BookingSummaryResponse::from),
            next_booking: view.next_booking.map(BookingSummaryResponse::from),
        }
    }
}

/// コメント可否レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct EligibilityResponse {
    pub eligible: bool,
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// 状態クエリパラメータのパースとバリデーション
pub fn parse_state_filter(state: &str) -> Result<BookingStateFilter, BookingApplicationError> {
    state
        .parse::<BookingStateFilter>()
        .map_err(|e| BookingApplicationError::UnknownState(e.0))
}
