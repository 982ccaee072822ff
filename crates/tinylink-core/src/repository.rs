use crate::error::StorageError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;
use uuid::Uuid;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A URL record without its access counter.
///
/// This is what create, update, resolve and list hand back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlimRecord {
    pub id: Uuid,
    pub url: Url,
    pub shortcode: ShortCode,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SlimRecord {
    /// Builds a fresh record with a new id and `created_at == updated_at == now`.
    pub fn new(shortcode: ShortCode, url: Url, now: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            url,
            shortcode,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A stored URL record, including its access counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlRecord {
    #[serde(flatten)]
    pub slim: SlimRecord,
    pub access_count: u64,
}

impl UrlRecord {
    /// Returns the record with the access counter stripped.
    pub fn slim(&self) -> SlimRecord {
        self.slim.clone()
    }

    pub fn into_slim(self) -> SlimRecord {
        self.slim
    }
}

impl From<SlimRecord> for UrlRecord {
    fn from(slim: SlimRecord) -> Self {
        Self {
            slim,
            access_count: 0,
        }
    }
}

/// Keyed storage of URL records.
///
/// Every method is atomic with respect to the others. Validation of codes
/// and URLs is the caller's job; a repository stores whatever it is given.
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    /// Retrieves the record for a given short code.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Upserts a record.
    ///
    /// An absent code is inserted with an access count of zero. For a
    /// present code only `url` and `updated_at` are replaced; the stored
    /// `id`, `created_at` and access count are kept.
    async fn set(&self, code: &ShortCode, record: SlimRecord) -> Result<()>;

    /// Replaces `url` and `updated_at` of an existing record.
    /// Returns `Err(NotFound)` if the code does not exist; nothing is inserted.
    async fn update(&self, code: &ShortCode, record: SlimRecord) -> Result<()>;

    /// Inserts a new record with an access count of zero.
    /// Returns `Err(Conflict)` if the code already exists.
    async fn insert(&self, code: &ShortCode, record: SlimRecord) -> Result<()>;

    /// Deletes the record for a given short code.
    /// It is not an error if the code does not exist.
    async fn delete(&self, code: &ShortCode) -> Result<()>;

    /// Returns a snapshot copy of every stored record.
    async fn list_all(&self) -> Result<BTreeMap<ShortCode, UrlRecord>>;

    /// Increments the access count by one and returns the new count.
    /// Returns `Err(NotFound)` if the code does not exist.
    async fn increment_access_count(&self, code: &ShortCode) -> Result<u64>;
}
