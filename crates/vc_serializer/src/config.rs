//! Process-wide embedding defaults.
//!
//! Associations that do not specify `embed` or `embed_in_root` take the value
//! stored here *at declaration time*, so the configuration must be set up
//! before schemas are built.
//!
//! The lifecycle is "mutate during setup, read-only while serving":
//! [`setup`] applies a bulk update under an exclusive lock, [`current`] is a
//! single lock-free atomic load.
//!
//! # Examples
//!
//! ```
//! use vc_serializer::config::{self, EmbedStrategy};
//!
//! config::setup(|cfg| {
//!     cfg.embed = EmbedStrategy::Ids;
//!     cfg.embed_in_root = true;
//! });
//!
//! assert_eq!(config::current().embed, EmbedStrategy::Ids);
//!
//! config::reset();
//! assert_eq!(config::current(), config::Config::default());
//! ```

use core::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, PoisonError};

// -----------------------------------------------------------------------------
// EmbedStrategy

/// How an association embeds its related object(s).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EmbedStrategy {
    /// Emit the identifier(s) of the related object(s) under the association `key`.
    Ids,
    /// Emit the serialized related object(s), inline or flattened to the root.
    #[default]
    Objects,
    /// Emit nothing for the association.
    None,
}

impl EmbedStrategy {
    const fn to_bits(self) -> u8 {
        match self {
            Self::Ids => 0,
            Self::Objects => 1,
            Self::None => 2,
        }
    }

    const fn from_bits(bits: u8) -> Self {
        match bits {
            0 => Self::Ids,
            1 => Self::Objects,
            _ => Self::None,
        }
    }
}

// -----------------------------------------------------------------------------
// Config

/// Defaults applied to associations that leave `embed`/`embed_in_root` unset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub embed: EmbedStrategy,
    pub embed_in_root: bool,
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Config {
    /// `embed: objects`, `embed_in_root: false`.
    pub const DEFAULT: Self = Self {
        embed: EmbedStrategy::Objects,
        embed_in_root: false,
    };

    const ROOT_BIT: u8 = 0b100;

    const fn pack(self) -> u8 {
        let root = if self.embed_in_root { Self::ROOT_BIT } else { 0 };
        self.embed.to_bits() | root
    }

    const fn unpack(bits: u8) -> Self {
        Self {
            embed: EmbedStrategy::from_bits(bits & !Self::ROOT_BIT),
            embed_in_root: bits & Self::ROOT_BIT != 0,
        }
    }
}

// -----------------------------------------------------------------------------
// ConfigCell

/// A [`Config`] that can be bulk-updated and read without locking.
///
/// Both fields live in one atomic byte, so a reader never observes half of
/// an update.
pub struct ConfigCell {
    bits: AtomicU8,
    setup_lock: Mutex<()>,
}

impl Default for ConfigCell {
    #[inline]
    fn default() -> Self {
        Self::new(Config::DEFAULT)
    }
}

impl ConfigCell {
    /// Creates a cell holding `config`.
    pub const fn new(config: Config) -> Self {
        Self {
            bits: AtomicU8::new(config.pack()),
            setup_lock: Mutex::new(()),
        }
    }

    /// Returns the stored configuration.
    #[inline]
    pub fn load(&self) -> Config {
        Config::unpack(self.bits.load(Ordering::Acquire))
    }

    /// Applies `f` to a copy of the stored configuration and publishes the result.
    ///
    /// Concurrent setups are serialized.
    pub fn setup(&self, f: impl FnOnce(&mut Config)) {
        let _guard = self
            .setup_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut config = self.load();
        f(&mut config);
        self.bits.store(config.pack(), Ordering::Release);
    }
}

impl core::fmt::Debug for ConfigCell {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(&self.load(), f)
    }
}

// -----------------------------------------------------------------------------
// Global

static CONFIG: ConfigCell = ConfigCell::new(Config::DEFAULT);

/// Returns the process-wide defaults.
#[inline]
pub fn current() -> Config {
    CONFIG.load()
}

/// Updates the process-wide defaults.
///
/// Only call this during application setup, before schemas are declared.
pub fn setup(f: impl FnOnce(&mut Config)) {
    CONFIG.setup(f);
    log::debug!("serializer defaults set to {:?}", CONFIG.load());
}

/// Restores [`Config::DEFAULT`].
pub fn reset() {
    setup(|config| *config = Config::DEFAULT);
}

// -----------------------------------------------------------------------------
// Tests
