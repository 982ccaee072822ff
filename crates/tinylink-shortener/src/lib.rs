//! URL shortener service implementation.
//!
//! This crate provides [`ShortenerService`], the record lifecycle engine that
//! allocates short codes and tracks access counts on top of any
//! [`Repository`][tinylink_core::Repository]. Core types are re-exported
//! from `tinylink_core`.

pub mod service;

pub use service::{ShortenerService, ShortenerSettings, MAX_GENERATION_ATTEMPTS};
pub use tinylink_core::{ShortenParams, Shortener, ShortenerError};
