pub mod events;

pub use events::{Deleted, EventError, EventList, EventService};
