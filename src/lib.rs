// Public API for integration tests and potential library usage

pub mod api;
pub mod bot;
pub mod config;
pub mod protocol;
pub mod state;
pub mod text;
pub mod types;
pub mod words;
