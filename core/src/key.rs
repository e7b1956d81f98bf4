//! Opaque element keys and the strategies that mint them.
//!
//! Every mounted element carries a [`Key`]. Keys are handles into the
//! registry and carry no meaning of their own.

use alloc::rc::Rc;
use core::fmt;
use std::collections::HashSet;

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{trace, warn};

use crate::error::{FlexError, Result};

/// Symbols the [`KeyStrategy::Random`] strategy samples from.
pub const KEY_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-#@";

/// Length of keys drawn by [`KeyStrategy::random`].
pub const DEFAULT_KEY_LENGTH: usize = 10;

const MAX_DRAW_ATTEMPTS: usize = 16;

/// Opaque identifier of a mounted element.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(Rc<str>);

impl Key {
    /// Wraps an existing identifier.
    pub fn new(value: impl Into<Rc<str>>) -> Self {
        Self(value.into())
    }

    /// Borrows the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// How new keys are minted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStrategy {
    /// A monotonically increasing counter. Collision-free within one registry.
    #[default]
    Sequential,
    /// Random v4 UUIDs in their simple (hyphen-less) form.
    Uuid,
    /// Fixed-length strings sampled uniformly, with replacement, from
    /// [`KEY_ALPHABET`]. Draws that hit a live key are retried.
    Random {
        /// Number of symbols per key.
        length: usize,
    },
}

impl KeyStrategy {
    /// The random strategy with [`DEFAULT_KEY_LENGTH`] symbols.
    #[must_use]
    pub const fn random() -> Self {
        Self::Random {
            length: DEFAULT_KEY_LENGTH,
        }
    }
}

/// Mints keys according to a [`KeyStrategy`].
#[derive(Debug)]
pub struct KeyGenerator {
    strategy: KeyStrategy,
    counter: u64,
    rng: SmallRng,
    // Random keys handed out so far, attached or not.
    issued: HashSet<Key>,
}

impl KeyGenerator {
    /// Creates a generator for the given strategy.
    #[must_use]
    pub fn new(strategy: KeyStrategy) -> Self {
        Self {
            strategy,
            counter: 0,
            rng: SmallRng::from_entropy(),
            issued: HashSet::new(),
        }
    }

    /// Returns the strategy this generator follows.
    #[must_use]
    pub const fn strategy(&self) -> KeyStrategy {
        self.strategy
    }

    /// Mints a key for which `taken` returns `false`.
    ///
    /// Random keys are also checked against every key this generator has
    /// issued before, so elements that are built but not attached yet never
    /// share a key.
    ///
    /// # Errors
    ///
    /// Returns [`FlexError::KeyCollision`] when every attempt produced a key
    /// that is already in use.
    pub fn next_key(&mut self, taken: impl Fn(&Key) -> bool) -> Result<Key> {
        for attempt in 1..=MAX_DRAW_ATTEMPTS {
            let key = self.draw();
            if !taken(&key) && !self.issued.contains(&key) {
                if matches!(self.strategy, KeyStrategy::Random { .. }) {
                    self.issued.insert(key.clone());
                }
                trace!(%key, attempt, "minted key");
                return Ok(key);
            }
            warn!(%key, attempt, "drawn key is already registered, retrying");
        }
        Err(FlexError::KeyCollision {
            attempts: MAX_DRAW_ATTEMPTS,
        })
    }

    fn draw(&mut self) -> Key {
        match self.strategy {
            KeyStrategy::Sequential => {
                let key = Key::new(format!("k{}", self.counter));
                self.counter += 1;
                key
            }
            KeyStrategy::Uuid => Key::new(uuid::Uuid::new_v4().simple().to_string()),
            KeyStrategy::Random { length } => {
                let text: String = (0..length)
                    .map(|_| char::from(KEY_ALPHABET[self.rng.gen_range(0..KEY_ALPHABET.len())]))
                    .collect();
                Key::new(text)
            }
        }
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new(KeyStrategy::default())
    }
}
