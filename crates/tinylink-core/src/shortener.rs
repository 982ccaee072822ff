use crate::repository::{SlimRecord, UrlRecord};
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::collections::BTreeMap;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone)]
pub struct ShortenParams {
    /// The original URL to be shortened.
    pub url: String,
    /// Optional custom short code. Empty strings count as absent.
    pub shortcode: Option<String>,
}

/// The record lifecycle operations exposed to request handlers.
///
/// Inputs are raw strings; implementations own all validation.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens `url` under a freshly generated short code.
    async fn create_random(&self, url: &str) -> Result<SlimRecord>;

    /// Shortens `url` under a caller-chosen short code.
    async fn create_custom(&self, url: &str, shortcode: &str) -> Result<SlimRecord>;

    /// Looks up a short code and counts one access.
    async fn resolve(&self, shortcode: &str) -> Result<SlimRecord>;

    /// Looks up a short code, counts one access, and returns the counter too.
    async fn stats(&self, shortcode: &str) -> Result<UrlRecord>;

    /// Points an existing short code at a new URL.
    async fn update(&self, shortcode: &str, url: &str) -> Result<SlimRecord>;

    /// Deletes an existing short code.
    async fn remove(&self, shortcode: &str) -> Result<()>;

    /// Returns every stored record without counters.
    async fn list_all(&self) -> Result<BTreeMap<ShortCode, SlimRecord>>;

    /// Dispatches to [`create_custom`](Self::create_custom) when a non-empty
    /// short code was supplied, otherwise to [`create_random`](Self::create_random).
    async fn shorten(&self, params: ShortenParams) -> Result<SlimRecord> {
        match params.shortcode.as_deref() {
            Some(code) if !code.is_empty() => self.create_custom(&params.url, code).await,
            _ => self.create_random(&params.url).await,
        }
    }
}
