// Library root: exposes the app modules so integration tests and the binary
// share one public API.

pub mod app;
pub mod command;
pub mod config;
pub mod db;
pub mod players;
pub mod render;
