pub mod event;
pub mod validation;

pub use event::{Event, EventChanges, EventStatus, NewEvent};
pub use validation::{validate_create, validate_update, Constraint, PatchError, ValidationError};
