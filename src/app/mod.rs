pub mod events;
pub mod session;

pub use events::SessionEvent;
pub use session::Session;
