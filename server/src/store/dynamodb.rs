//! DynamoDB-backed event table.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue as DynamoValue, ReturnValue};
use aws_sdk_dynamodb::Client;

use crate::store::mapper::KEY_ATTRIBUTE;
use crate::store::{AttributeValue, EventStore, Item, StoreError, UpdateExpression};

const KEY_PLACEHOLDER: &str = "#pk";

pub struct DynamoDbStore {
    client: Client,
    table: String,
}

impl DynamoDbStore {
    /// Builds a client from the ambient AWS configuration (env, profile,
    /// instance metadata).
    pub async fn connect(table: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), table)
    }

    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    fn key(key: &str) -> HashMap<String, DynamoValue> {
        HashMap::from([(KEY_ATTRIBUTE.to_string(), DynamoValue::S(key.to_string()))])
    }
}

fn backend<E: std::error::Error>(err: E) -> StoreError {
    StoreError::Backend(DisplayErrorContext(err).to_string())
}

fn to_dynamo(value: &AttributeValue) -> DynamoValue {
    match value {
        AttributeValue::S(s) => DynamoValue::S(s.clone()),
        AttributeValue::N(n) => DynamoValue::N(n.to_string()),
    }
}

fn from_dynamo(name: &str, value: &DynamoValue) -> Result<AttributeValue, StoreError> {
    match value {
        DynamoValue::S(s) => Ok(AttributeValue::S(s.clone())),
        DynamoValue::N(n) => n
            .parse()
            .map(AttributeValue::N)
            .map_err(|_| StoreError::Malformed(name.to_string())),
        _ => Err(StoreError::Malformed(name.to_string())),
    }
}

fn item_to_dynamo(item: &Item) -> HashMap<String, DynamoValue> {
    item.iter()
        .map(|(name, value)| (name.clone(), to_dynamo(value)))
        .collect()
}

fn item_from_dynamo(attributes: &HashMap<String, DynamoValue>) -> Result<Item, StoreError> {
    attributes
        .iter()
        .map(|(name, value)| Ok((name.clone(), from_dynamo(name, value)?)))
        .collect()
}

#[async_trait]
impl EventStore for DynamoDbStore {
    async fn put(&self, item: Item) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(item_to_dynamo(&item)))
            .send()
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Item>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .set_key(Some(Self::key(key)))
            .send()
            .await
            .map_err(backend)?;

        output.item.as_ref().map(item_from_dynamo).transpose()
    }

    async fn scan(&self) -> Result<Vec<Item>, StoreError> {
        let mut items = Vec::new();
        let mut start_key = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(backend)?;

            for attributes in output.items.unwrap_or_default() {
                items.push(item_from_dynamo(&attributes)?);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        tracing::debug!(table = %self.table, count = items.len(), "Scanned event table");
        Ok(items)
    }

    async fn update(&self, expression: &UpdateExpression) -> Result<Item, StoreError> {
        let rendered = expression.render();

        let mut names: HashMap<String, String> = rendered.names.into_iter().collect();
        names.insert(KEY_PLACEHOLDER.to_string(), KEY_ATTRIBUTE.to_string());
        let values: HashMap<String, DynamoValue> = rendered
            .values
            .iter()
            .map(|(placeholder, value)| (placeholder.clone(), to_dynamo(value)))
            .collect();

        let result = self
            .client
            .update_item()
            .table_name(&self.table)
            .set_key(Some(Self::key(expression.key())))
            .update_expression(rendered.expression)
            .condition_expression(format!("attribute_exists({})", KEY_PLACEHOLDER))
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await;

        match result {
            Ok(output) => match output.attributes {
                Some(attributes) => item_from_dynamo(&attributes),
                None => Err(StoreError::Missing(expression.key().to_string())),
            },
            Err(err)
                if err
                    .as_service_error()
                    .map(|e| e.is_conditional_check_failed_exception())
                    .unwrap_or(false) =>
            {
                Err(StoreError::Missing(expression.key().to_string()))
            }
            Err(err) => Err(backend(err)),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table)
            .set_key(Some(Self::key(key)))
            .send()
            .await
            .map_err(backend)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_attributes_round_through_strings() {
        assert_eq!(to_dynamo(&AttributeValue::N(42)), DynamoValue::N("42".to_string()));
        assert_eq!(
            from_dynamo("capacity", &DynamoValue::N("42".to_string())).unwrap(),
            AttributeValue::N(42)
        );
    }

    #[test]
    fn test_unsupported_attribute_is_malformed() {
        let err = from_dynamo("capacity", &DynamoValue::Bool(true)).unwrap_err();
        assert!(matches!(err, StoreError::Malformed(name) if name == "capacity"));

        let err = from_dynamo("capacity", &DynamoValue::N("1.5".to_string())).unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }
}
