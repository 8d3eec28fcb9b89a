//! State management module
//!
//! This module handles all application state, including:
//! - The SQLite tour database (library.rs)
//! - Shared data structures (data.rs)
//! - The catalog shown in the grid (catalog.rs)
//! - Which tour, if any, is open in the viewer (session.rs)
//! - User configuration (config.rs)

pub mod catalog;
pub mod config;
pub mod data;
pub mod library;
pub mod session;
