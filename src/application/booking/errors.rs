use crate::domain::value_objects::{BookingId, BookingStatus, ItemId, UserId};
use crate::ports::BookingStoreError;
use thiserror::Error;

/// 予約管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum BookingApplicationError {
    /// ユーザーが存在しない
    #[error("User {} not found", .0.value())]
    UserNotFound(UserId),

    /// アイテムが存在しない
    #[error("Item {} not found", .0.value())]
    ItemNotFound(ItemId),

    /// 予約が存在しない（閲覧権限がない場合も同じエラーで隠蔽する）
    #[error("Booking {} not found", .0.value())]
    BookingNotFound(BookingId),

    /// アイテムが貸出不可
    #[error("Item {} is unavailable", .0.value())]
    ItemUnavailable(ItemId),

    /// 自分のアイテムは予約できない
    #[error("Cannot book own item")]
    OwnItemBooking,

    /// アイテム所有者ではない
    #[error("User {} is not the owner of the item", .0.value())]
    NotItemOwner(UserId),

    /// 既に承認・却下済み
    #[error("Booking status already decided: {0}")]
    StatusAlreadyDecided(BookingStatus),

    /// 予約期間が不正
    #[error("Booking start must be before its end")]
    InvalidBookingPeriod,

    /// 未知の状態フィルタ
    #[error("Unknown state: {0}")]
    UnknownState(String),

    /// ページ指定が不正
    #[error("Page size must be positive")]
    InvalidPage,

    /// BookingStoreのエラー
    #[error("Booking store error")]
    BookingStoreError(#[source] BookingStoreError),

    /// UserDirectoryのエラー
    #[error("User directory error")]
    UserDirectoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// ItemDirectoryのエラー
    #[error("Item directory error")]
    ItemDirectoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// 呼び出し側に見せるエラー分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    InvalidOperation,
    /// ポート層のI/O障害
    Internal,
}

impl BookingApplicationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookingApplicationError::UserNotFound(_)
            | BookingApplicationError::ItemNotFound(_)
            | BookingApplicationError::BookingNotFound(_) => ErrorKind::NotFound,
            BookingApplicationError::OwnItemBooking | BookingApplicationError::NotItemOwner(_) => {
                ErrorKind::Forbidden
            }
            BookingApplicationError::ItemUnavailable(_)
            | BookingApplicationError::StatusAlreadyDecided(_)
            | BookingApplicationError::InvalidBookingPeriod
            | BookingApplicationError::UnknownState(_)
            | BookingApplicationError::InvalidPage => ErrorKind::InvalidOperation,
            BookingApplicationError::BookingStoreError(_)
            | BookingApplicationError::UserDirectoryError(_)
            | BookingApplicationError::ItemDirectoryError(_) => ErrorKind::Internal,
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, BookingApplicationError>;
