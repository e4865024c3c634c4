//! Core library for music-playlist-client
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod linker;
pub mod models;
pub mod search;
pub mod session;
pub mod store;

pub use error::{ClientError, Result};
