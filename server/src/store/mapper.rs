//! Record mapping between the API shape ([`Event`]) and the storage shape
//! ([`Item`]). The two are currently identical field for field.

use crate::models::{Event, EventStatus};
use crate::store::{AttributeValue, Item, StoreError};

pub const KEY_ATTRIBUTE: &str = "eventId";

pub fn to_item(event: &Event) -> Item {
    let mut item = Item::new();
    item.insert(KEY_ATTRIBUTE, AttributeValue::S(event.event_id.clone()));
    item.insert("title", AttributeValue::S(event.title.clone()));
    item.insert("description", AttributeValue::S(event.description.clone()));
    item.insert("date", AttributeValue::S(event.date.clone()));
    item.insert("location", AttributeValue::S(event.location.clone()));
    item.insert("capacity", AttributeValue::N(event.capacity));
    item.insert("organizer", AttributeValue::S(event.organizer.clone()));
    item.insert("status", status_value(event.status));
    item
}

pub fn from_item(item: &Item) -> Result<Event, StoreError> {
    let status = string(item, "status")?;

    Ok(Event {
        event_id: string(item, KEY_ATTRIBUTE)?,
        title: string(item, "title")?,
        description: string(item, "description")?,
        date: string(item, "date")?,
        location: string(item, "location")?,
        capacity: number(item, "capacity")?,
        organizer: string(item, "organizer")?,
        status: status
            .parse()
            .map_err(|_| StoreError::Malformed("status".to_string()))?,
    })
}

pub fn status_value(status: EventStatus) -> AttributeValue {
    AttributeValue::S(status.as_str().to_string())
}

fn string(item: &Item, name: &str) -> Result<String, StoreError> {
    match item.get(name) {
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        _ => Err(StoreError::Malformed(name.to_string())),
    }
}

fn number(item: &Item, name: &str) -> Result<i64, StoreError> {
    match item.get(name) {
        Some(AttributeValue::N(value)) => Ok(*value),
        _ => Err(StoreError::Malformed(name.to_string())),
    }
}
