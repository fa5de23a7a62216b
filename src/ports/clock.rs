use chrono::{DateTime, Utc};

/// 現在時刻の供給元
///
/// 時間窓クエリ（CURRENT / PAST / FUTURE、直近・次回予約）をテストで決定的にするために注入する。
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// システム時計
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
