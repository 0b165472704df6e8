//! Storage collaborator for events.
//!
//! Stores speak in [`Item`]s, attribute maps keyed by name. Conversion to and
//! from [`Event`](crate::models::Event) lives in [`mapper`] so handlers never
//! see the storage shape.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{Config, StoreBackend};

#[cfg(feature = "dynamodb")]
pub mod dynamodb;
pub mod expression;
pub mod mapper;
pub mod memory;

pub use expression::{Assignment, ExpressionError, RenderedExpression, UpdateExpression};
pub use memory::MemoryStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    S(String),
    N(i64),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    attributes: BTreeMap<String, AttributeValue>,
}

impl Item {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: AttributeValue) {
        self.attributes.insert(name.into(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.attributes.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttributeValue)> {
        self.attributes.iter()
    }

    /// The partition key, if the item carries a string one.
    pub fn key(&self) -> Option<&str> {
        match self.get(mapper::KEY_ATTRIBUTE) {
            Some(AttributeValue::S(key)) => Some(key),
            _ => None,
        }
    }
}

impl FromIterator<(String, AttributeValue)> for Item {
    fn from_iter<I: IntoIterator<Item = (String, AttributeValue)>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Conditional update target does not exist.
    #[error("item '{0}' does not exist")]
    Missing(String),

    #[error("stored item has a missing or invalid '{0}' attribute")]
    Malformed(String),

    #[error("{0}")]
    Backend(String),
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn put(&self, item: Item) -> Result<(), StoreError>;

    async fn get(&self, key: &str) -> Result<Option<Item>, StoreError>;

    async fn scan(&self) -> Result<Vec<Item>, StoreError>;

    /// Applies `expression` to an existing item and returns the item as it
    /// reads afterwards. Fails with [`StoreError::Missing`] instead of
    /// creating the item.
    async fn update(&self, expression: &UpdateExpression) -> Result<Item, StoreError>;

    /// Deleting an absent key is a no-op.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

pub async fn open(config: &Config) -> Arc<dyn EventStore> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!(table = %config.table_name, "Using in-memory event store");
            Arc::new(MemoryStore::new(&config.table_name))
        }
        #[cfg(feature = "dynamodb")]
        StoreBackend::DynamoDb => {
            tracing::info!(table = %config.table_name, "Using DynamoDB event store");
            Arc::new(dynamodb::DynamoDbStore::connect(&config.table_name).await)
        }
    }
}
