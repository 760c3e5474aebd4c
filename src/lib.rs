//! Lingo - Command-line text translator
//! 
//! Dispatches a query to a pluggable translation engine (Google, Baidu),
//! normalizes language codes and turns each backend's response into a
//! common `Translation` record for the terminal.

pub mod app;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod language;
pub mod logging;
pub mod proxy;
pub mod render;
pub mod translation;
