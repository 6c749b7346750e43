pub mod app;
pub mod remote;
pub mod ui;
