pub mod screen;

pub use screen::StatusScreen;
