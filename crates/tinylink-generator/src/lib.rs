pub mod random;

pub use random::RandomGenerator;

use tinylink_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage;
/// the caller is responsible for checking a candidate against the store
/// and drawing again on collision.
pub trait Generator: Send + Sync + 'static {
    /// Produces a candidate short code.
    fn generate(&self) -> ShortCode;
}
