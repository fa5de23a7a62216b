use crate::ports::clock::Clock as ClockTrait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// 固定時刻のClock実装
///
/// テストで時間窓クエリを決定的にするために使用する。
pub struct Clock {
    now: Mutex<DateTime<Utc>>,
}

impl Clock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// 時刻を進める
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap() = at;
    }
}

impl ClockTrait for Clock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
