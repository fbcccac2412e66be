//! TUI rendering.
//!
//! Views are plain render functions over [`crate::app::App`]; shared
//! chrome (header, tabs, status bar, help) lives in [`common`].

pub mod common;
pub mod detail;
pub mod endpoints;
pub mod services;
pub mod theme;
pub mod topology;

pub use theme::{hex_color, Theme};
