use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tinylink_core::{
    Clock, Repository, ShortCode, Shortener, ShortenerError, SlimRecord, StorageError,
    SystemClock, UrlRecord,
};
use tinylink_generator::Generator;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;
use url::Url;

type Result<T> = std::result::Result<T, ShortenerError>;

/// Upper bound on generated candidates tried by a single `create_random`.
pub const MAX_GENERATION_ATTEMPTS: u32 = 4096;

/// Tunables for [`ShortenerService`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerSettings {
    #[builder(default = MAX_GENERATION_ATTEMPTS)]
    max_generation_attempts: u32,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the [`Shortener`] trait.
///
/// This service wraps a [`Repository`], a [`Generator`] and a [`Clock`] to
/// handle:
/// - URL and custom short code validation
/// - collision-free short code allocation
/// - access counting on every resolution
///
/// It holds no locks itself. Creation goes through the repository's atomic
/// `insert`, so two concurrent requests for the same short code can never
/// both succeed.
#[derive(Debug)]
pub struct ShortenerService<R, G, C = SystemClock> {
    repository: Arc<R>,
    generator: Arc<G>,
    clock: C,
    settings: ShortenerSettings,
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    /// Creates a new `ShortenerService` using the system clock.
    pub fn new(repository: R, generator: G) -> Self {
        Self::with_clock(repository, generator, SystemClock)
    }
}

impl<R: Repository, G: Generator, C: Clock> ShortenerService<R, G, C> {
    /// Creates a new `ShortenerService` that timestamps records with `clock`.
    pub fn with_clock(repository: R, generator: G, clock: C) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            clock,
            settings: ShortenerSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ShortenerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Parses `url` as an absolute http(s) URL.
    fn parse_url(url: &str) -> Result<Url> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ShortenerError::InvalidInput("URL is required".to_string()));
        }

        let parsed = Url::parse(url).map_err(|e| {
            ShortenerError::InvalidInput(format!("'{}' is not a valid absolute URL: {}", url, e))
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            scheme => Err(ShortenerError::InvalidInput(format!(
                "URL scheme must be http or https: {}",
                scheme
            ))),
        }
    }

    /// Parses a short code used to look up an existing record.
    ///
    /// A malformed code can never have been stored, so it reports `NotFound`.
    fn lookup_code(shortcode: &str) -> Result<ShortCode> {
        ShortCode::new(shortcode).map_err(|_| ShortenerError::NotFound(shortcode.to_string()))
    }

    async fn fetch(&self, code: &ShortCode) -> Result<UrlRecord> {
        self.repository
            .get(code)
            .await?
            .ok_or_else(|| ShortenerError::NotFound(code.to_string()))
    }
}

#[async_trait]
impl<R: Repository, G: Generator, C: Clock> Shortener for ShortenerService<R, G, C> {
    async fn create_random(&self, url: &str) -> Result<SlimRecord> {
        let url = Self::parse_url(url)?;
        let max_attempts = self.settings.max_generation_attempts;

        for attempt in 1..=max_attempts {
            let code = self.generator.generate();

            if self.repository.get(&code).await?.is_some() {
                trace!(code = %code, attempt, "generated short code is taken");
                continue;
            }

            let record = SlimRecord::new(code.clone(), url.clone(), self.clock.now());
            match self.repository.insert(&code, record.clone()).await {
                Ok(()) => {
                    debug!(code = %code, url = %record.url, attempt, "created short link");
                    return Ok(record);
                }
                Err(StorageError::Conflict(_)) => {
                    trace!(code = %code, attempt, "generated short code was taken concurrently");
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(attempts = max_attempts, "no free short code found");
        Err(ShortenerError::GenerationExhausted(max_attempts))
    }

    async fn create_custom(&self, url: &str, shortcode: &str) -> Result<SlimRecord> {
        let url = Self::parse_url(url)?;
        let code = ShortCode::new(shortcode)?;

        if self.repository.get(&code).await?.is_some() {
            return Err(ShortenerError::AlreadyExists(code.to_string()));
        }

        let record = SlimRecord::new(code.clone(), url, self.clock.now());
        self.repository.insert(&code, record.clone()).await?;

        debug!(code = %code, url = %record.url, "created custom short link");
        Ok(record)
    }

    async fn resolve(&self, shortcode: &str) -> Result<SlimRecord> {
        trace!(code = %shortcode, "resolving short code");

        let code = Self::lookup_code(shortcode)?;
        let record = self.fetch(&code).await?;
        self.repository.increment_access_count(&code).await?;

        debug!(code = %code, url = %record.slim.url, "resolved short code");
        Ok(record.into_slim())
    }

    async fn stats(&self, shortcode: &str) -> Result<UrlRecord> {
        let code = Self::lookup_code(shortcode)?;
        let mut record = self.fetch(&code).await?;
        record.access_count = self.repository.increment_access_count(&code).await?;
        Ok(record)
    }

    async fn update(&self, shortcode: &str, url: &str) -> Result<SlimRecord> {
        let url = Self::parse_url(url)?;
        let code = Self::lookup_code(shortcode)?;
        let existing = self.fetch(&code).await?.into_slim();

        // updated_at never moves backwards, even if the clock does.
        let updated_at = self.clock.now().max(existing.updated_at);
        let record = SlimRecord {
            url,
            updated_at,
            ..existing
        };
        // Fails NotFound if a concurrent remove got there first.
        self.repository.update(&code, record.clone()).await?;

        debug!(code = %code, url = %record.url, "updated short link");
        Ok(record)
    }

    async fn remove(&self, shortcode: &str) -> Result<()> {
        let code = Self::lookup_code(shortcode)?;
        self.fetch(&code).await?;
        self.repository.delete(&code).await?;

        debug!(code = %code, "deleted short link");
        Ok(())
    }

    async fn list_all(&self) -> Result<BTreeMap<ShortCode, SlimRecord>> {
        let records = self.repository.list_all().await?;
        Ok(records
            .into_iter()
            .map(|(code, record)| (code, record.into_slim()))
            .collect())
    }
}
