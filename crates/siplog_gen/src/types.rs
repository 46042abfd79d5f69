//! Core data types for taste-description generation.
//!
//! All wire-facing structs serialize camelCase to match the provider contract
//! and the app's document store. Inbound payloads are field-tolerant: missing
//! optional fields default to empty, never to null.

use serde::{Deserialize, Serialize};

/// Perceived body / mouthfeel of a tasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Light,
    Medium,
    Heavy,
}

/// Length of the finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aftertaste {
    Short,
    Medium,
    Long,
}

/// Structured sensory input supplied by the caller.
///
/// Every field is optional; "unspecified" is a valid, meaningful state and is
/// rendered explicitly in the prompt rather than being omitted. Flavor tags
/// are free-form category identifiers; order is preserved and duplicates are
/// not collapsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasteDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flavor_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aftertaste: Option<Aftertaste>,
}

impl TasteDescriptor {
    /// Empty descriptor (everything unspecified).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_flavor_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flavor_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_aftertaste(mut self, aftertaste: Aftertaste) -> Self {
        self.aftertaste = Some(aftertaste);
        self
    }
}

/// Natural-language output of a taste-decoding round trip.
///
/// Invariant: `short_description` is non-empty in every result handed back to
/// a caller. The provider path substitutes a placeholder when the model omits
/// it; the fallback path always supplies one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub detailed_description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Dictionary-style entry for the app's flavor glossary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlavorEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pairings: Vec<String>,
}

/// Daily tasting-mission suggestion derived from recent journal tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TastingMission {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub prompt_text: String,
    #[serde(default)]
    pub focus_tags: Vec<String>,
}

/// Per-call policy knobs, immutable for the duration of the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOptions {
    /// When true (the default) every failure degrades to the deterministic
    /// offline fallback instead of surfacing an error.
    pub use_fallback: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self { use_fallback: true }
    }
}

impl GenerationOptions {
    /// Propagate typed errors instead of degrading. Used by callers that must
    /// distinguish real generation from degraded generation (tests, explicit
    /// "regenerate" actions).
    pub fn without_fallback() -> Self {
        Self { use_fallback: false }
    }
}
