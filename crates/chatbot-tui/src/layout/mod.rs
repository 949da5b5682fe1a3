//! Layout components for the TUI.
//!
//! This module provides:
//! - [`render_app`] - Main screen renderer

mod shell;

pub use shell::render_app;
