use super::{BookingStatus, PeriodError};

/// 予約作成のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateBookingError {
    /// 予約期間が不正（start >= end）
    InvalidPeriod,
}

impl From<PeriodError> for CreateBookingError {
    fn from(err: PeriodError) -> Self {
        match err {
            PeriodError::StartNotBeforeEnd => CreateBookingError::InvalidPeriod,
        }
    }
}

/// 承認・却下のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecideBookingError {
    /// 既に判断済み（WAITING以外）
    AlreadyDecided(BookingStatus),
}
