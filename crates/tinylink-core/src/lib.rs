//! Core types and traits for the tinylink URL shortener.
//!
//! This crate provides the record model, the short code type and the
//! storage and shortener contracts shared by every other crate.

pub mod clock;
pub mod error;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use clock::{Clock, SystemClock};
pub use error::{CoreError, ShortenerError, StorageError};
pub use repository::{Repository, SlimRecord, UrlRecord};
pub use shortcode::ShortCode;
pub use shortener::{ShortenParams, Shortener};
