//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate stores, policies and preferences into list screens.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod preference;
pub mod screen;
pub mod task_view;
