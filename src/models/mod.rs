pub mod calendar;
pub mod common;
pub mod settings;
