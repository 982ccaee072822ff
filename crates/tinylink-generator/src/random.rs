use crate::Generator;
use tinylink_core::shortcode::{ALPHABET, GENERATED_LENGTH};
use tinylink_core::{CoreError, ShortCode};

/// Draws each character independently and uniformly from `[A-Za-z0-9]`.
///
/// With the default length of 6 there are 62^6 (about 56.8 billion)
/// possible codes.
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    length: usize,
}

impl RandomGenerator {
    /// Creates a generator producing codes of the default length.
    pub fn new() -> Self {
        Self {
            length: GENERATED_LENGTH,
        }
    }

    /// Creates a generator producing codes of `length` characters.
    ///
    /// The length must itself be a valid short code length.
    pub fn with_length(length: usize) -> Result<Self, CoreError> {
        ShortCode::new("a".repeat(length))?;
        Ok(Self { length })
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RandomGenerator {
    fn generate(&self) -> ShortCode {
        let code: String = std::iter::repeat_with(|| {
            ALPHABET[rand::random_range(0..ALPHABET.len())] as char
        })
        .take(self.length)
        .collect();
        ShortCode::new_unchecked(code)
    }
}
