//! Update expressions: the set of attribute assignments a partial update
//! applies to one existing item.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::models::EventChanges;
use crate::store::mapper::{self, KEY_ATTRIBUTE};
use crate::store::{AttributeValue, Item};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("'{0}' is the item key and cannot be updated")]
    ImmutableKey(String),

    #[error("update expression has no assignments")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub attribute: String,
    pub value: AttributeValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateExpression {
    key: String,
    assignments: Vec<Assignment>,
}

/// Store-native form: `SET #a = :a, ...` plus the placeholder maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedExpression {
    pub expression: String,
    pub names: BTreeMap<String, String>,
    pub values: BTreeMap<String, AttributeValue>,
}

impl UpdateExpression {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            assignments: Vec::new(),
        }
    }

    /// Builds the expression for `changes` in field declaration order.
    pub fn from_changes(
        key: impl Into<String>,
        changes: &EventChanges,
    ) -> Result<Self, ExpressionError> {
        let strings = [
            ("title", &changes.title),
            ("description", &changes.description),
            ("date", &changes.date),
            ("location", &changes.location),
        ];

        let mut expression = Self::new(key);
        for (attribute, value) in strings {
            if let Some(value) = value {
                expression = expression.set(attribute, AttributeValue::S(value.clone()))?;
            }
        }
        if let Some(capacity) = changes.capacity {
            expression = expression.set("capacity", AttributeValue::N(capacity))?;
        }
        if let Some(organizer) = &changes.organizer {
            expression = expression.set("organizer", AttributeValue::S(organizer.clone()))?;
        }
        if let Some(status) = changes.status {
            expression = expression.set("status", mapper::status_value(status))?;
        }

        if expression.assignments.is_empty() {
            return Err(ExpressionError::Empty);
        }
        Ok(expression)
    }

    /// Adds an assignment, replacing any earlier one for the same attribute.
    pub fn set(
        mut self,
        attribute: impl Into<String>,
        value: AttributeValue,
    ) -> Result<Self, ExpressionError> {
        let attribute = attribute.into();
        if attribute == KEY_ATTRIBUTE {
            return Err(ExpressionError::ImmutableKey(attribute));
        }

        match self
            .assignments
            .iter_mut()
            .find(|assignment| assignment.attribute == attribute)
        {
            Some(existing) => existing.value = value,
            None => self.assignments.push(Assignment { attribute, value }),
        }
        Ok(self)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Merges the assignments into `item`. Attributes not named are untouched.
    pub fn apply(&self, item: &mut Item) {
        for assignment in &self.assignments {
            item.insert(assignment.attribute.clone(), assignment.value.clone());
        }
    }

    pub fn render(&self) -> RenderedExpression {
        let mut clauses = Vec::with_capacity(self.assignments.len());
        let mut names = BTreeMap::new();
        let mut values = BTreeMap::new();

        for assignment in &self.assignments {
            let name = format!("#{}", assignment.attribute);
            let placeholder = format!(":{}", assignment.attribute);
            clauses.push(format!("{} = {}", name, placeholder));
            names.insert(name, assignment.attribute.clone());
            values.insert(placeholder, assignment.value.clone());
        }

        RenderedExpression {
            expression: format!("SET {}", clauses.join(", ")),
            names,
            values,
        }
    }
}
