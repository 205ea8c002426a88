//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes the renderer's pixel buffer and the app state and turns
//! them into terminal cells.  No simulation happens here.

pub mod canvas;
pub mod controls;
pub mod layout;
pub mod popup;
pub mod theme;
