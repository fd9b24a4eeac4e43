pub mod bus;
pub mod event;

mod tests;

pub use bus::EventBus;
pub use event::{EventMessage, EventType};
