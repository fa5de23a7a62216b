use crate::domain::value_objects::{ItemId, UserId};
use crate::ports::item_directory::{Item, ItemDirectory as ItemDirectoryTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// ItemDirectoryのインメモリ実装
///
/// アイテムを登録することで状態を持ったテストをサポート。
/// 貸出可否の切り替えも可能。
pub struct ItemDirectory {
    items: Mutex<HashMap<ItemId, Item>>,
}

impl ItemDirectory {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
        }
    }

    /// アイテムを登録（同じIDで再登録すると所有者・貸出可否が置き換わる）
    pub fn add_item(&self, item_id: ItemId, owner_id: UserId, available: bool) {
        let item = Item {
            item_id,
            owner_id,
            name: "Mock Item".to_string(),
            available,
        };
        self.items.lock().unwrap().insert(item_id, item);
    }

    /// 貸出可否を切り替える
    pub fn set_available(&self, item_id: ItemId, available: bool) {
        if let Some(item) = self.items.lock().unwrap().get_mut(&item_id) {
            item.available = available;
        }
    }
}

impl Default for ItemDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemDirectoryTrait for ItemDirectory {
    async fn exists(&self, item_id: ItemId) -> Result<bool> {
        Ok(self.items.lock().unwrap().contains_key(&item_id))
    }

    async fn get(&self, item_id: ItemId) -> Result<Option<Item>> {
        Ok(self.items.lock().unwrap().get(&item_id).cloned())
    }

    async fn items_owned_by(&self, owner_id: UserId) -> Result<Vec<ItemId>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|item| item.owner_id == owner_id)
            .map(|item| item.item_id)
            .collect())
    }
}
