//! Message identity hashing.
//!
//! Every catalog format is keyed by the hash of a message's natural text, so
//! the output of [`HashGenerator`] must stay stable across releases. Changing
//! the digest, the alphabet, or the truncation length invalidates every
//! compiled catalog.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{
    Digest,
    Sha256,
};

/// Length of the hashes produced by [`Sha256HashGenerator::default`].
///
/// All keys from one generator share this length, which lets the binary
/// writer drop the per-entry hash length prefix.
pub const DEFAULT_HASH_LENGTH: usize = 11;

/// Upper bound for the truncation length: base64 of a SHA-256 digest without padding.
pub const MAX_HASH_LENGTH: usize = 43;

/// Separator placed between a context and the natural text before hashing.
const CONTEXT_SEPARATOR: char = ':';

/// Turns natural-language text into a short, stable lookup key.
pub trait HashGenerator: Send + Sync + std::fmt::Debug {
    /// Hashes the natural text.
    fn generate_hash(&self, natural_text: &str) -> String;

    /// Hashes the natural text within a disambiguating context.
    ///
    /// The context is part of the message identity: the result equals
    /// `generate_hash("{context}:{natural_text}")`. An empty context is the
    /// same as no context.
    fn generate_hash_with_context(&self, natural_text: &str, context: Option<&str>) -> String {
        match context {
            Some(ctx) if !ctx.is_empty() => {
                self.generate_hash(&format!("{ctx}{CONTEXT_SEPARATOR}{natural_text}"))
            }
            _ => self.generate_hash(natural_text),
        }
    }
}

/// SHA-256 → URL-safe base64 (no padding) → prefix of `length` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sha256HashGenerator {
    /// Number of base64 characters kept.
    length: usize,
}

impl Sha256HashGenerator {
    /// Creates a generator keeping [`DEFAULT_HASH_LENGTH`] characters.
    #[must_use]
    pub const fn new() -> Self {
        Self { length: DEFAULT_HASH_LENGTH }
    }

    /// Creates a generator keeping `length` characters, clamped to `1..=43`.
    #[must_use]
    pub fn with_length(length: usize) -> Self {
        Self { length: length.clamp(1, MAX_HASH_LENGTH) }
    }

    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }
}

impl Default for Sha256HashGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl HashGenerator for Sha256HashGenerator {
    fn generate_hash(&self, natural_text: &str) -> String {
        let digest = Sha256::digest(natural_text.as_bytes());
        let mut encoded = URL_SAFE_NO_PAD.encode(digest);
        encoded.truncate(self.length);
        encoded
    }
}
