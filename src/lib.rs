pub mod calendar;
pub mod clock;
pub mod dataset;
pub mod error;
pub mod grid;
pub mod parser;
pub mod prefs;
pub mod render;
pub mod schedule;
pub mod settings;
pub mod tick;
