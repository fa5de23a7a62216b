use crate::application::booking::{BookingApplicationError, ErrorKind};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub enum ApiError {
    /// アプリケーション層のエラー
    Application(BookingApplicationError),
    /// リクエストの形式・入力値が不正
    BadRequest(String),
}

impl From<BookingApplicationError> for ApiError {
    fn from(err: BookingApplicationError) -> Self {
        ApiError::Application(err)
    }
}

/// エラー種別を表すコード
fn error_code(err: &BookingApplicationError) -> &'static str {
    match err {
        BookingApplicationError::UserNotFound(_) => "USER_NOT_FOUND",
        BookingApplicationError::ItemNotFound(_) => "ITEM_NOT_FOUND",
        BookingApplicationError::BookingNotFound(_) => "BOOKING_NOT_FOUND",
        BookingApplicationError::ItemUnavailable(_) => "ITEM_UNAVAILABLE",
        BookingApplicationError::OwnItemBooking => "OWN_ITEM_BOOKING",
        BookingApplicationError::NotItemOwner(_) => "NOT_ITEM_OWNER",
        BookingApplicationError::StatusAlreadyDecided(_) => "STATUS_ALREADY_DECIDED",
        BookingApplicationError::InvalidBookingPeriod => "INVALID_BOOKING_PERIOD",
        BookingApplicationError::UnknownState(_) => "UNKNOWN_STATE",
        BookingApplicationError::InvalidPage => "INVALID_PAGE",
        BookingApplicationError::BookingStoreError(_) => "BOOKING_STORE_ERROR",
        BookingApplicationError::UserDirectoryError(_) => "USER_DIRECTORY_ERROR",
        BookingApplicationError::ItemDirectoryError(_) => "ITEM_DIRECTORY_ERROR",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            // 400 Bad Request - リクエストの形式が不正
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),

            ApiError::Application(err) => {
                let error_type = error_code(&err);
                match err.kind() {
                    // 404 Not Found - 存在しない、または閲覧権限がない
                    ErrorKind::NotFound => (StatusCode::NOT_FOUND, error_type, err.to_string()),
                    // 403 Forbidden - 権限のない操作
                    ErrorKind::Forbidden => (StatusCode::FORBIDDEN, error_type, err.to_string()),
                    // 400 Bad Request - ビジネスルール違反
                    ErrorKind::InvalidOperation => {
                        (StatusCode::BAD_REQUEST, error_type, err.to_string())
                    }
                    // 500 Internal Server Error - システム障害
                    // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
                    ErrorKind::Internal => {
                        tracing::error!(
                            error.cause_chain = ?err,
                            error.message = %err,
                            "Unexpected error happened"
                        );
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            error_type,
                            "An unexpected error occurred".to_string(),
                        )
                    }
                }
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
