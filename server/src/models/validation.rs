//! Payload validation for create and partial-update requests.
//!
//! Both entry points take the raw request body so callers can decide when a
//! payload problem is reported relative to other checks.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::event::{EventChanges, EventStatus, NewEvent};

pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MAX: usize = 1000;
pub const LOCATION_MAX: usize = 200;
pub const ORGANIZER_MAX: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Body is not a JSON object.
    Malformed(String),
    Required,
    WrongType { expected: &'static str },
    Length { min: usize, max: usize },
    Positive,
    OneOf(&'static [&'static str]),
    Immutable,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Malformed(reason) => write!(f, "malformed JSON object: {}", reason),
            Constraint::Required => f.write_str("field required"),
            Constraint::WrongType { expected } => write!(f, "must be {}", expected),
            Constraint::Length { min, max } => {
                write!(f, "length must be between {} and {} characters", min, max)
            }
            Constraint::Positive => f.write_str("must be greater than 0"),
            Constraint::OneOf(allowed) => write!(f, "must be one of: {}", allowed.join(", ")),
            Constraint::Immutable => f.write_str("cannot be changed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {constraint}")]
pub struct ValidationError {
    pub field: &'static str,
    pub constraint: Constraint,
}

impl ValidationError {
    pub fn new(field: &'static str, constraint: Constraint) -> Self {
        Self { field, constraint }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("No fields to update")]
    NoFields,
}

pub fn validate_create(body: &[u8]) -> Result<NewEvent, ValidationError> {
    let fields = decode(body)?;

    Ok(NewEvent {
        title: required("title", text(&fields, "title", TITLE_MAX)?)?,
        description: required(
            "description",
            text(&fields, "description", DESCRIPTION_MAX)?,
        )?,
        date: required("date", opaque(&fields, "date")?)?,
        location: required("location", text(&fields, "location", LOCATION_MAX)?)?,
        capacity: required("capacity", capacity(&fields)?)?,
        organizer: required("organizer", text(&fields, "organizer", ORGANIZER_MAX)?)?,
        status: required("status", status(&fields)?)?,
    })
}

/// Validates a partial update. Absent and `null` fields are left out; a
/// payload that leaves nothing to change is `PatchError::NoFields`.
pub fn validate_update(body: &[u8]) -> Result<EventChanges, PatchError> {
    let fields = decode(body)?;

    let changes = EventChanges {
        title: text(&fields, "title", TITLE_MAX)?,
        description: text(&fields, "description", DESCRIPTION_MAX)?,
        date: opaque(&fields, "date")?,
        location: text(&fields, "location", LOCATION_MAX)?,
        capacity: capacity(&fields)?,
        organizer: text(&fields, "organizer", ORGANIZER_MAX)?,
        status: status(&fields)?,
    };

    if changes.is_empty() {
        return Err(PatchError::NoFields);
    }
    Ok(changes)
}

fn decode(body: &[u8]) -> Result<Map<String, Value>, ValidationError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(ValidationError::new(
            "body",
            Constraint::WrongType {
                expected: "a JSON object",
            },
        )),
        Err(e) => Err(ValidationError::new(
            "body",
            Constraint::Malformed(e.to_string()),
        )),
    }
}

fn required<T>(field: &'static str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::new(field, Constraint::Required))
}

fn present<'a>(fields: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    fields.get(field).filter(|value| !value.is_null())
}

fn opaque(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match present(fields, field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::new(
            field,
            Constraint::WrongType {
                expected: "a string",
            },
        )),
    }
}

fn text(
    fields: &Map<String, Value>,
    field: &'static str,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    let Some(value) = opaque(fields, field)? else {
        return Ok(None);
    };

    let len = value.chars().count();
    if len < 1 || len > max {
        return Err(ValidationError::new(
            field,
            Constraint::Length { min: 1, max },
        ));
    }
    Ok(Some(value))
}

fn capacity(fields: &Map<String, Value>) -> Result<Option<i64>, ValidationError> {
    let Some(value) = present(fields, "capacity") else {
        return Ok(None);
    };

    let capacity = whole_number(value).ok_or(ValidationError::new(
        "capacity",
        Constraint::WrongType {
            expected: "an integer",
        },
    ))?;
    if capacity <= 0 {
        return Err(ValidationError::new("capacity", Constraint::Positive));
    }
    Ok(Some(capacity))
}

/// Integers, floats without a fractional part and strings holding an integer
/// all count as whole numbers. Booleans do not.
fn whole_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .filter(|f| *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn status(fields: &Map<String, Value>) -> Result<Option<EventStatus>, ValidationError> {
    let Some(value) = opaque(fields, "status")? else {
        return Ok(None);
    };

    value
        .parse()
        .map(Some)
        .map_err(|_| ValidationError::new("status", Constraint::OneOf(EventStatus::ALLOWED)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meetup() -> Value {
        json!({
            "title": "Meetup",
            "description": "d",
            "date": "2024-01-01",
            "location": "Hall",
            "capacity": 10,
            "organizer": "Alice",
            "status": "active",
        })
    }

    fn with(field: &str, value: Value) -> Vec<u8> {
        let mut payload = meetup();
        payload[field] = value;
        serde_json::to_vec(&payload).unwrap()
    }

    fn create_error(body: &[u8]) -> ValidationError {
        validate_create(body).unwrap_err()
    }

    #[test]
    fn test_create_accepts_full_payload() {
        let event = validate_create(&serde_json::to_vec(&meetup()).unwrap()).unwrap();
        assert_eq!(event.title, "Meetup");
        assert_eq!(event.capacity, 10);
        assert_eq!(event.status, EventStatus::Active);
    }

    #[test]
    fn test_create_rejects_empty_title() {
        let err = create_error(&with("title", json!("")));
        assert_eq!(err.field, "title");
        assert_eq!(err.constraint, Constraint::Length { min: 1, max: 200 });
    }

    #[test]
    fn test_create_rejects_non_positive_capacity() {
        for capacity in [0, -5] {
            let err = create_error(&with("capacity", json!(capacity)));
            assert_eq!(err, ValidationError::new("capacity", Constraint::Positive));
        }
    }

    #[test]
    fn test_create_rejects_unknown_status() {
        let err = create_error(&with("status", json!("pending")));
        assert_eq!(err.field, "status");
        assert_eq!(err.constraint, Constraint::OneOf(EventStatus::ALLOWED));
    }

    #[test]
    fn test_create_rejects_long_description() {
        let err = create_error(&with("description", json!("x".repeat(1001))));
        assert_eq!(err.field, "description");

        let ok = validate_create(&with("description", json!("x".repeat(1000))));
        assert!(ok.is_ok());
    }

    #[test]
    fn test_text_length_bounds() {
        for (field, max) in [
            ("title", TITLE_MAX),
            ("location", LOCATION_MAX),
            ("organizer", ORGANIZER_MAX),
        ] {
            assert!(validate_create(&with(field, json!("x".repeat(max)))).is_ok());

            let err = create_error(&with(field, json!("x".repeat(max + 1))));
            assert_eq!(err, ValidationError::new(field, Constraint::Length { min: 1, max }));
        }
        assert_eq!((TITLE_MAX, LOCATION_MAX, ORGANIZER_MAX), (200, 200, 100));
    }

    #[test]
    fn test_capacity_accepts_whole_numbers() {
        for capacity in [json!(10.0), json!("10"), json!(" 10 ")] {
            let event = validate_create(&with("capacity", capacity)).unwrap();
            assert_eq!(event.capacity, 10);
        }

        let changes = validate_update(br#"{"capacity": 20.0}"#).unwrap();
        assert_eq!(changes.capacity, Some(20));
        let changes = validate_update(br#"{"capacity": "20"}"#).unwrap();
        assert_eq!(changes.capacity, Some(20));
    }

    #[test]
    fn test_capacity_rejects_fractions_and_words() {
        for capacity in [json!(10.5), json!("ten"), json!("10.5"), json!(true)] {
            let err = create_error(&with("capacity", capacity));
            assert_eq!(err.field, "capacity");
            assert!(matches!(err.constraint, Constraint::WrongType { .. }));
        }
        for capacity in [json!(0.0), json!("-3")] {
            let err = create_error(&with("capacity", capacity));
            assert_eq!(err, ValidationError::new("capacity", Constraint::Positive));
        }

        let payloads: [&[u8]; 2] = [br#"{"capacity": 10.5}"#, br#"{"capacity": "ten"}"#];
        for payload in payloads {
            let err = validate_update(payload).unwrap_err();
            assert!(matches!(
                err,
                PatchError::Invalid(ValidationError {
                    field: "capacity",
                    constraint: Constraint::WrongType { .. },
                })
            ));
        }
    }

    #[test]
    fn test_update_accepts_empty_date() {
        let changes = validate_update(br#"{"date": ""}"#).unwrap();
        assert_eq!(changes.date, Some(String::new()));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 100 two-byte characters
        let organizer = "é".repeat(100);
        assert!(validate_create(&with("organizer", json!(organizer))).is_ok());
    }

    #[test]
    fn test_create_requires_every_field() {
        let mut payload = meetup();
        payload.as_object_mut().unwrap().remove("location");
        let err = create_error(&serde_json::to_vec(&payload).unwrap());
        assert_eq!(err, ValidationError::new("location", Constraint::Required));

        let err = create_error(&with("date", Value::Null));
        assert_eq!(err, ValidationError::new("date", Constraint::Required));
    }

    #[test]
    fn test_create_reports_type_mismatch() {
        let err = create_error(&with("capacity", json!("ten")));
        assert_eq!(err.field, "capacity");
        assert!(matches!(err.constraint, Constraint::WrongType { .. }));

        let err = create_error(&with("title", json!(5)));
        assert_eq!(err.field, "title");
    }

    #[test]
    fn test_create_rejects_non_object_body() {
        assert_eq!(create_error(b"[1, 2]").field, "body");
        let err = create_error(b"{not json");
        assert!(matches!(err.constraint, Constraint::Malformed(_)));
    }

    #[test]
    fn test_update_keeps_only_present_fields() {
        let changes = validate_update(br#"{"capacity": 20, "title": null}"#).unwrap();
        assert_eq!(
            changes,
            EventChanges {
                capacity: Some(20),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_update_with_nothing_to_change() {
        assert_eq!(validate_update(b"{}"), Err(PatchError::NoFields));
        assert_eq!(
            validate_update(br#"{"title": null, "status": null}"#),
            Err(PatchError::NoFields)
        );
        // eventId is never an update target
        assert_eq!(
            validate_update(br#"{"eventId": "other"}"#),
            Err(PatchError::NoFields)
        );
    }

    #[test]
    fn test_update_applies_field_rules() {
        let err = validate_update(br#"{"status": "pending"}"#).unwrap_err();
        assert!(matches!(err, PatchError::Invalid(ValidationError { field: "status", .. })));

        let err = validate_update(br#"{"capacity": 0}"#).unwrap_err();
        assert!(matches!(err, PatchError::Invalid(ValidationError { field: "capacity", .. })));
    }
}
