use crate::domain::booking::{Booking, NewBooking};
use crate::domain::value_objects::{BookingId, BookingStatus, ItemId, UserId};
use crate::ports::booking_store::{
    BookingPredicate, BookingSort, BookingStore as BookingStoreTrait, BookingStoreError,
    PageRequest, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// BookingStoreのインメモリ実装
///
/// 単一のMutexで全予約を保持する。
/// ステータス更新はロックを保持したままversionを比較するため、並行した更新のうち成功するのは一つだけ。
pub struct BookingStore {
    bookings: Mutex<HashMap<BookingId, Booking>>,
}

impl BookingStore {
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for BookingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingStoreTrait for BookingStore {
    async fn insert(&self, booking: NewBooking) -> Result<Booking> {
        let booking = booking.into_booking(BookingId::new());
        self.bookings
            .lock()
            .unwrap()
            .insert(booking.booking_id, booking.clone());
        Ok(booking)
    }

    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>> {
        Ok(self.bookings.lock().unwrap().get(&booking_id).cloned())
    }

    async fn update_status(
        &self,
        booking_id: BookingId,
        expected_version: i32,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Booking> {
        let mut bookings = self.bookings.lock().unwrap();
        let booking = bookings
            .get_mut(&booking_id)
            .filter(|b| b.version == expected_version)
            .ok_or(BookingStoreError::Conflict(booking_id))?;

        booking.status = status;
        booking.updated_at = updated_at;
        booking.version += 1;

        Ok(booking.clone())
    }

    async fn query(
        &self,
        predicate: &BookingPredicate,
        sort: BookingSort,
        page: PageRequest,
    ) -> Result<Vec<Booking>> {
        let mut matched: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .values()
            .filter(|b| predicate.matches(b))
            .cloned()
            .collect();

        matched.sort_by(|a, b| sort.compare(a, b));

        let skip = usize::try_from(page.skip()).unwrap_or(usize::MAX);
        Ok(matched
            .into_iter()
            .skip(skip)
            .take(page.size() as usize)
            .collect())
    }

    async fn exists_by_booker_and_item_ended_before(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        instant: DateTime<Utc>,
    ) -> Result<bool> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .values()
            .any(|b| b.booker_id == booker_id && b.item_id == item_id && b.end() <= instant))
    }
}
