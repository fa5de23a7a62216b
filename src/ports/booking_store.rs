use crate::domain::booking::{Booking, NewBooking};
use crate::domain::value_objects::{BookingId, BookingStatus, ItemId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use thiserror::Error;

/// 予約ストアのエラー
#[derive(Debug, Error)]
pub enum BookingStoreError {
    /// 楽観的排他制御の競合（期待したversionと一致しない）
    #[error("Booking {0:?} was modified concurrently")]
    Conflict(BookingId),

    /// バックエンド（DBなど）のエラー
    #[error("Booking store backend error")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingStoreError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        BookingStoreError::Backend(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, BookingStoreError>;

/// 予約集合を選択する条件
///
/// 所有者単位の一覧は、アイテムディレクトリから解決した所有アイテムの集合で表す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingSubject {
    /// booker_id = X
    Booker(UserId),
    /// item_id = X
    Item(ItemId),
    /// item_id IN (...)
    Items(Vec<ItemId>),
}

/// 時間・ステータスの条件句
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingClause {
    /// start <= t
    StartAtOrBefore(DateTime<Utc>),
    /// start > t
    StartAfter(DateTime<Utc>),
    /// end < t
    EndBefore(DateTime<Utc>),
    /// end >= t
    EndAtOrAfter(DateTime<Utc>),
    /// status = s
    StatusIs(BookingStatus),
}

impl BookingClause {
    pub fn matches(&self, booking: &Booking) -> bool {
        match *self {
            BookingClause::StartAtOrBefore(t) => booking.start() <= t,
            BookingClause::StartAfter(t) => booking.start() > t,
            BookingClause::EndBefore(t) => booking.end() < t,
            BookingClause::EndAtOrAfter(t) => booking.end() >= t,
            BookingClause::StatusIs(s) => booking.status == s,
        }
    }
}

/// クエリ述語：対象条件と条件句の論理積
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingPredicate {
    pub subject: BookingSubject,
    pub clauses: Vec<BookingClause>,
}

impl BookingPredicate {
    pub fn new(subject: BookingSubject) -> Self {
        Self {
            subject,
            clauses: Vec::new(),
        }
    }

    pub fn and(mut self, clause: BookingClause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// メモリ上の予約に対して述語を評価する
    pub fn matches(&self, booking: &Booking) -> bool {
        let subject_matches = match &self.subject {
            BookingSubject::Booker(user_id) => booking.booker_id == *user_id,
            BookingSubject::Item(item_id) => booking.item_id == *item_id,
            BookingSubject::Items(item_ids) => item_ids.contains(&booking.item_id),
        };
        subject_matches && self.clauses.iter().all(|clause| clause.matches(booking))
    }
}

/// 並び順（同一開始時刻はIDで同方向に並べる）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingSort {
    StartDesc,
    StartAsc,
}

impl BookingSort {
    pub fn compare(&self, a: &Booking, b: &Booking) -> Ordering {
        let ascending = a
            .start()
            .cmp(&b.start())
            .then_with(|| a.booking_id.cmp(&b.booking_id));
        match self {
            BookingSort::StartAsc => ascending,
            BookingSort::StartDesc => ascending.reverse(),
        }
    }
}

/// ページ指定
///
/// ページ単位のページングであり、任意オフセットではない。
/// offsetがlimitの倍数でない場合は、offsetを含むページに切り捨てられる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

/// 不正なページ指定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPage;

impl PageRequest {
    /// offset / limit からページを作る
    ///
    /// # エラー
    /// limitが0の場合は`InvalidPage`を返す
    pub fn from_offset(offset: u32, limit: u32) -> std::result::Result<Self, InvalidPage> {
        if limit == 0 {
            return Err(InvalidPage);
        }
        Ok(Self {
            page: offset / limit,
            size: limit,
        })
    }

    /// 先頭1件
    pub fn first() -> Self {
        Self { page: 0, size: 1 }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// 読み飛ばす件数
    pub fn skip(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// 予約ストアポート
///
/// 予約の永続化と、述語・並び順・ページ指定によるクエリを抽象化する。
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// 新しい予約を保存する。IDはストアが採番する。
    async fn insert(&self, booking: NewBooking) -> Result<Booking>;

    /// IDで予約を取得する
    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>>;

    /// ステータスを更新する
    ///
    /// 保存済みのversionが`expected_version`と一致する場合のみ更新し、versionを1つ進める。
    /// 一致しない場合は`BookingStoreError::Conflict`を返す。
    async fn update_status(
        &self,
        booking_id: BookingId,
        expected_version: i32,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Booking>;

    /// 述語に一致する予約を並び替えてページ単位で返す
    async fn query(
        &self,
        predicate: &BookingPredicate,
        sort: BookingSort,
        page: PageRequest,
    ) -> Result<Vec<Booking>>;

    /// 述語に一致する先頭の予約を返す
    async fn find_first(
        &self,
        predicate: &BookingPredicate,
        sort: BookingSort,
    ) -> Result<Option<Booking>> {
        Ok(self
            .query(predicate, sort, PageRequest::first())
            .await?
            .into_iter()
            .next())
    }

    /// 指定ユーザーによる指定アイテムの予約で、終了がinstant以前のものが存在するか
    ///
    /// ステータスは問わない。コメント可否の判定に使用される。
    async fn exists_by_booker_and_item_ended_before(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        instant: DateTime<Utc>,
    ) -> Result<bool>;
}
