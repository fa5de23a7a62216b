/// 予約一覧の状態フィルタ
///
/// 文字列は境界で一度だけパースされ、以降はこの列挙型で網羅的に扱う。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BookingStateFilter {
    #[default]
    All,
    /// 開始済みかつ未終了
    Current,
    /// 終了済み
    Past,
    /// 未開始
    Future,
    Waiting,
    Approved,
    Rejected,
    Canceled,
}

impl BookingStateFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStateFilter::All => "ALL",
            BookingStateFilter::Current => "CURRENT",
            BookingStateFilter::Past => "PAST",
            BookingStateFilter::Future => "FUTURE",
            BookingStateFilter::Waiting => "WAITING",
            BookingStateFilter::Approved => "APPROVED",
            BookingStateFilter::Rejected => "REJECTED",
            BookingStateFilter::Canceled => "CANCELED",
        }
    }
}

/// 未知の状態トークン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownState(pub String);

impl std::fmt::Display for UnknownState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown state: {}", self.0)
    }
}

impl std::str::FromStr for BookingStateFilter {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(BookingStateFilter::All),
            "CURRENT" => Ok(BookingStateFilter::Current),
            "PAST" => Ok(BookingStateFilter::Past),
            "FUTURE" => Ok(BookingStateFilter::Future),
            "WAITING" => Ok(BookingStateFilter::Waiting),
            "APPROVED" => Ok(BookingStateFilter::Approved),
            "REJECTED" => Ok(BookingStateFilter::Rejected),
            "CANCELED" => Ok(BookingStateFilter::Canceled),
            _ => Err(UnknownState(s.to_string())),
        }
    }
}
