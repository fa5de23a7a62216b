use crate::domain::value_objects::UserId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// ユーザー（予約コンテキストから見える最小限の情報）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
}

/// ユーザーディレクトリポート
///
/// 予約コンテキストとユーザー管理コンテキストの境界を維持する。
/// 予約コンテキストはUserIDのみを知り、ユーザー詳細は知らない。
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// ユーザーが存在するか確認する
    ///
    /// 予約作成・承認・一覧取得の前の呼び出し元バリデーションに使用される。
    async fn exists(&self, user_id: UserId) -> Result<bool>;

    /// IDでユーザーを取得する
    async fn get(&self, user_id: UserId) -> Result<Option<User>>;
}
