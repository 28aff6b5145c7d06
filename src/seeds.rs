//! Seed handling for cave generation
//!
//! Seeds are given as text so that both numbers and words can be used.
//! Numeric text maps straight to the numeric seed; any other text is hashed.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// A seed as entered by the user together with the numeric value it resolves to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaveSeed {
    pub text: String,
    pub value: u64,
}

impl CaveSeed {
    /// Resolve seed text. Numeric text maps to itself and is stable across
    /// builds; other text goes through `DefaultHasher`, whose output may change
    /// between Rust releases, so prefer numeric seeds for reproducible caves.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        let value = trimmed
            .parse::<u64>()
            .unwrap_or_else(|_| hash_text(trimmed));
        Self {
            text: trimmed.to_string(),
            value,
        }
    }

    pub fn from_value(value: u64) -> Self {
        Self {
            text: value.to_string(),
            value,
        }
    }

    /// Fresh seed from the thread RNG.
    pub fn random() -> Self {
        Self::from_value(rand::random())
    }

    /// Deterministic RNG for the fill pass.
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.value)
    }
}

impl std::fmt::Display for CaveSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.text == self.value.to_string() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "\"{}\" ({})", self.text, self.value)
        }
    }
}

fn hash_text(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}
