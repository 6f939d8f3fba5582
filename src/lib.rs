pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod document;
pub mod download;
pub mod logging;
pub mod models;
pub mod ui;
