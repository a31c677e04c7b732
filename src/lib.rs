pub mod api;
pub mod app;
pub mod common;
pub mod config;
pub mod event;
pub mod logging;
pub mod pages;
pub mod session;
pub mod state;
pub mod tui;
pub mod ui;
