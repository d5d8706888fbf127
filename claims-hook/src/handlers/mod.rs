pub mod app;
pub mod hook;
