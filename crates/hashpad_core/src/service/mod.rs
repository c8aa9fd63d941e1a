//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Turn store failures into outcomes the controller can display.

pub mod note_service;
