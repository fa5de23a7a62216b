use crate::domain::value_objects::{ItemId, UserId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// アイテム（予約コンテキストから見える最小限の情報）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub item_id: ItemId,
    pub owner_id: UserId,
    pub name: String,
    /// 貸出可能フラグ
    pub available: bool,
}

/// アイテムディレクトリポート
///
/// 予約コンテキストとアイテム管理コンテキストの境界を維持する。
#[async_trait]
pub trait ItemDirectory: Send + Sync {
    /// アイテムが存在するか確認する
    async fn exists(&self, item_id: ItemId) -> Result<bool>;

    /// IDでアイテムを取得する
    ///
    /// ビジネスルール: 貸出不可のアイテムは予約できない。
    async fn get(&self, item_id: ItemId) -> Result<Option<Item>>;

    /// アイテムの所有者を取得する
    async fn owner_of(&self, item_id: ItemId) -> Result<Option<UserId>> {
        Ok(self.get(item_id).await?.map(|item| item.owner_id))
    }

    /// 指定ユーザーが現在所有するアイテムのID
    async fn items_owned_by(&self, owner_id: UserId) -> Result<Vec<ItemId>>;
}
