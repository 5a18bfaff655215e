//! Core business logic for the campus meals backend.

pub mod services;

pub use services::*;
