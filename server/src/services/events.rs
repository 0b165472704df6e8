//! The five event operations. Each call is a single pass over the store with
//! no state kept between requests.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    validate_create, validate_update, Constraint, Event, PatchError, ValidationError,
};
use crate::store::mapper::{self, KEY_ATTRIBUTE};
use crate::store::{EventStore, ExpressionError, StoreError, UpdateExpression};

#[derive(Debug, Error)]
pub enum EventError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No fields to update")]
    NoFieldsToUpdate,

    #[error("Event not found")]
    NotFound(String),

    #[error("Error {action}: {source}")]
    Storage {
        action: &'static str,
        #[source]
        source: StoreError,
    },
}

impl EventError {
    fn storage(action: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| EventError::Storage { action, source }
    }
}

impl From<PatchError> for EventError {
    fn from(err: PatchError) -> Self {
        match err {
            PatchError::Invalid(err) => EventError::Validation(err),
            PatchError::NoFields => EventError::NoFieldsToUpdate,
        }
    }
}

impl From<ExpressionError> for EventError {
    fn from(err: ExpressionError) -> Self {
        match err {
            ExpressionError::ImmutableKey(_) => {
                EventError::Validation(ValidationError::new(KEY_ATTRIBUTE, Constraint::Immutable))
            }
            ExpressionError::Empty => EventError::NoFieldsToUpdate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventList {
    pub events: Vec<Event>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deleted {
    pub message: String,
    pub event_id: String,
}

#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, body: &[u8]) -> Result<Event, EventError> {
        let event = validate_create(body)?.into_event(Uuid::new_v4().to_string());

        self.store
            .put(mapper::to_item(&event))
            .await
            .map_err(EventError::storage("creating event"))?;

        tracing::info!(event_id = %event.event_id, "Event created");
        Ok(event)
    }

    pub async fn list(&self) -> Result<EventList, EventError> {
        let items = self
            .store
            .scan()
            .await
            .map_err(EventError::storage("listing events"))?;
        let events = items
            .iter()
            .map(mapper::from_item)
            .collect::<Result<Vec<_>, _>>()
            .map_err(EventError::storage("listing events"))?;

        Ok(EventList {
            count: events.len(),
            events,
        })
    }

    pub async fn get(&self, event_id: &str) -> Result<Event, EventError> {
        self.find(event_id, "retrieving event").await
    }

    /// Existence is checked before the payload is looked at, so a missing
    /// event is reported as such whatever the body contains.
    pub async fn update(&self, event_id: &str, body: &[u8]) -> Result<Event, EventError> {
        self.find(event_id, "updating event").await?;

        let changes = validate_update(body)?;
        let expression = UpdateExpression::from_changes(event_id, &changes)?;

        let item = match self.store.update(&expression).await {
            Ok(item) => item,
            // Deleted between the check and the write.
            Err(StoreError::Missing(_)) => return Err(EventError::NotFound(event_id.to_string())),
            Err(err) => return Err(EventError::storage("updating event")(err)),
        };
        let event = mapper::from_item(&item).map_err(EventError::storage("updating event"))?;

        tracing::info!(
            event_id = %event_id,
            fields = expression.assignments().len(),
            "Event updated"
        );
        Ok(event)
    }

    pub async fn delete(&self, event_id: &str) -> Result<Deleted, EventError> {
        self.find(event_id, "deleting event").await?;

        self.store
            .delete(event_id)
            .await
            .map_err(EventError::storage("deleting event"))?;

        tracing::info!(event_id = %event_id, "Event deleted");
        Ok(Deleted {
            message: "Event deleted successfully".to_string(),
            event_id: event_id.to_string(),
        })
    }

    async fn find(&self, event_id: &str, action: &'static str) -> Result<Event, EventError> {
        let item = self
            .store
            .get(event_id)
            .await
            .map_err(EventError::storage(action))?
            .ok_or_else(|| EventError::NotFound(event_id.to_string()))?;

        mapper::from_item(&item).map_err(EventError::storage(action))
    }
}
