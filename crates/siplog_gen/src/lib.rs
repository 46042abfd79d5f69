//! siplog_gen - Taste-description generation for the siplog tasting journal.
//!
//! Turns a small structured sensory profile into natural-language text via an
//! external text-generation provider, and behaves predictably when that
//! provider is slow, unavailable, unauthenticated, or returns malformed
//! output: a 20-second cancellation deadline, typed failures, a time-bounded
//! result cache, and a deterministic offline fallback.
//!
//! The host app owns screens, persistence, and secure credential storage;
//! this crate consumes the credential store as a plain get/set/delete seam
//! and exposes one service object shared across screens.

pub mod cache;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod fallback;
pub mod parser;
pub mod prompt;
pub mod service;
pub mod types;

pub use cache::{CacheStore, Clock, SystemClock};
pub use client::{FakeProviderClient, HttpProviderClient, ProviderClient};
pub use config::GenerationConfig;
pub use credentials::{CredentialStore, MemoryCredentialStore};
pub use error::GenerateError;
pub use service::GenerationService;
pub use types::{
    Aftertaste, Body, FlavorEntry, GenerationOptions, GenerationResult, TasteDescriptor,
    TastingMission,
};
