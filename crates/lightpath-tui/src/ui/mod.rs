//! Terminal UI built on ratatui.
//!
//! - `render`: frame layout, login page, and overlays
//! - `input`: keyboard handling per view and overlay
//! - `styles`: color palette and text styles
//! - `views`: dashboard and trips content

pub mod input;
pub mod render;
pub mod styles;
pub mod views;
