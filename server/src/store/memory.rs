use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::store::mapper::KEY_ATTRIBUTE;
use crate::store::{EventStore, Item, StoreError, UpdateExpression};

/// In-process table. Suitable for development and tests; contents are lost
/// on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: String,
    items: RwLock<BTreeMap<String, Item>>,
}

impl MemoryStore {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            items: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn put(&self, item: Item) -> Result<(), StoreError> {
        let key = item
            .key()
            .ok_or_else(|| StoreError::Malformed(KEY_ATTRIBUTE.to_string()))?
            .to_string();
        self.items.write().await.insert(key, item);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Item>, StoreError> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn scan(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.items.read().await.values().cloned().collect())
    }

    async fn update(&self, expression: &UpdateExpression) -> Result<Item, StoreError> {
        let mut items = self.items.write().await;
        let item = items
            .get_mut(expression.key())
            .ok_or_else(|| StoreError::Missing(expression.key().to_string()))?;
        expression.apply(item);
        Ok(item.clone())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.items.write().await.remove(key);
        Ok(())
    }
}
