//! Translate the text selected in any application.
//!
//! Selection capture tries the accessibility tree first and falls back
//! to a simulated copy with the clipboard restored afterwards. Hebrew
//! input is pivoted through English on its way to Russian.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod presentation;
pub mod state;
