// Rust guideline compliant 2026-08-21

//! Error rendering for apikit.
//!
//! This crate maps error values onto the normalized response envelope
//! provided by `apikit-core`: renderable error kinds, a priority-ordered
//! handler table, and the renderer that drives dispatch and fallback.

pub mod handlers;
pub mod kinds;
pub mod render;

pub use handlers::{
    DefaultHandler, Disposition, EntryConfig, ErrorHandler, ErrorMatcher, HandlerConfig,
    HandlerEntry, HttpErrorHandler, HttpHandlerConfig, Resolution,
};
pub use kinds::{HttpError, Unauthenticated, ValidationFailure};
pub use render::{Renderer, RendererBuilder};
