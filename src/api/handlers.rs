use crate::application::booking::{
    ServiceDependencies, create_booking as execute_create_booking,
    decide_booking as execute_decide_booking, get_booking as execute_get_booking,
    is_user_booked_item, item_availability, list_booker_bookings, list_item_bookings,
    list_owner_bookings,
};
use crate::domain::{commands::DecideBooking, value_objects::*};
use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    extractor::{ApiJson, ApiPath, ApiQuery, CallerId},
    types::{
        BookingResponse, CreateBookingRequest, DecideBookingQuery, EligibilityResponse,
        ItemAvailabilityResponse, ListBookingsQuery,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Command handlers (POST / PATCH)
// ============================================================================

/// POST /bookings - 予約をリクエスト
///
/// 強制されるビジネスルール:
/// - 開始・終了が未来で、開始が終了より前であること（入力検証）
/// - 予約者・アイテムが存在し、アイテムが貸出可能であること
/// - 自分のアイテムではないこと
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    CallerId(booker_id): CallerId,
    ApiJson(req): ApiJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    req.validate(state.service_deps.clock.now())
        .map_err(ApiError::BadRequest)?;

    let booking = execute_create_booking(&state.service_deps, req.to_command(booker_id)).await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// PATCH /bookings/:id?approved=bool - 予約を承認または却下
///
/// アイテム所有者のみが、WAITING状態の予約に対して一度だけ実行できる。
pub async fn decide_booking(
    State(state): State<Arc<AppState>>,
    CallerId(owner_id): CallerId,
    ApiPath(booking_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<DecideBookingQuery>,
) -> Result<Json<BookingResponse>, ApiError> {
    let cmd = DecideBooking {
        owner_id,
        booking_id: BookingId::from_uuid(booking_id),
        approved: query.approved,
    };

    let booking = execute_decide_booking(&state.service_deps, cmd).await?;

    Ok(Json(BookingResponse::from(booking)))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /bookings/:id - 予約詳細をIDで取得
///
/// 予約者・アイテム所有者以外には404を返す。
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    CallerId(caller_id): CallerId,
    ApiPath(booking_id): ApiPath<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = execute_get_booking(
        &state.service_deps,
        caller_id,
        BookingId::from_uuid(booking_id),
    )
    .await?;

    Ok(Json(BookingResponse::from(booking)))
}

/// GET /bookings - 呼び出し元が予約者である予約の一覧
///
/// クエリパラメータ:
/// - state: ALL / CURRENT / PAST / FUTURE / WAITING / APPROVED / REJECTED / CANCELED（デフォルト: ALL）
/// - from: 読み飛ばす件数（sizeの倍数、デフォルト: 0）
/// - size: ページサイズ（デフォルト: 10）
pub async fn list_booker_bookings_handler(
    State(state): State<Arc<AppState>>,
    CallerId(booker_id): CallerId,
    ApiQuery(query): ApiQuery<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let bookings = list_booker_bookings(&state.service_deps, booker_id, query.to_params()?).await?;

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// GET /bookings/owner - 呼び出し元が所有するアイテムへの予約の一覧
pub async fn list_owner_bookings_handler(
    State(state): State<Arc<AppState>>,
    CallerId(owner_id): CallerId,
    ApiQuery(query): ApiQuery<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let bookings = list_owner_bookings(&state.service_deps, owner_id, query.to_params()?).await?;

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// GET /items/:id/bookings - アイテム単位の予約一覧（所有者のみ）
pub async fn list_item_bookings_handler(
    State(state): State<Arc<AppState>>,
    CallerId(caller_id): CallerId,
    ApiPath(item_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let bookings = list_item_bookings(
        &state.service_deps,
        caller_id,
        ItemId::from_uuid(item_id),
        query.to_params()?,
    )
    .await?;

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// GET /items/:id/availability - アイテムの直近・次回の承認済み予約
///
/// 所有者以外には空の結果を返す。
pub async fn item_availability_handler(
    State(state): State<Arc<AppState>>,
    CallerId(caller_id): CallerId,
    ApiPath(item_id): ApiPath<Uuid>,
) -> Result<Json<ItemAvailabilityResponse>, ApiError> {
    let item_id = ItemId::from_uuid(item_id);
    let view = item_availability(&state.service_deps, item_id, caller_id).await?;

    Ok(Json(ItemAvailabilityResponse::new(item_id, view)))
}

/// GET /items/:id/bookers/:user_id/eligible - ユーザーがコメント可能か
pub async fn comment_eligibility_handler(
    State(state): State<Arc<AppState>>,
    ApiPath((item_id, user_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<EligibilityResponse>, ApiError> {
    let eligible = is_user_booked_item(
        &state.service_deps,
        UserId::from_uuid(user_id),
        ItemId::from_uuid(item_id),
    )
    .await?;

    Ok(Json(EligibilityResponse { eligible }))
}
