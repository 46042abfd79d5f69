//! Prompt construction.
//!
//! Pure string building, no failure mode. The descriptor vocabulary tables
//! and the output-contract blocks live here; the field-name constants below
//! are the single source of truth for the JSON schema the parser relies on.
//! Parser-side serde renames are asserted against them in tests so the two
//! cannot drift independently.

use crate::types::{Aftertaste, Body, TasteDescriptor};

// Output schema field names (camelCase on the wire).
pub const FIELD_SHORT_DESCRIPTION: &str = "shortDescription";
pub const FIELD_DETAILED_DESCRIPTION: &str = "detailedDescription";
pub const FIELD_TAGS: &str = "tags";
pub const FIELD_RECOMMENDATIONS: &str = "recommendations";

pub const FIELD_NAME: &str = "name";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_PAIRINGS: &str = "pairings";

pub const FIELD_TITLE: &str = "title";
pub const FIELD_PROMPT_TEXT: &str = "promptText";
pub const FIELD_FOCUS_TAGS: &str = "focusTags";

/// System instruction for taste decoding.
pub const TASTE_SYSTEM_PROMPT: &str = r#"You are the tasting-notes writer for a personal tasting journal.
You turn a structured sensory profile into warm, concrete, non-repetitive prose.
Never invent facts about origin, price, or brand. Write in English.
Respond with valid JSON only - no prose outside the JSON object."#;

/// System instruction for flavor-glossary entries.
pub const FLAVOR_SYSTEM_PROMPT: &str = r#"You are the glossary editor for a personal tasting journal.
You write short, accurate definitions of flavor categories for curious beginners.
Write in English. Respond with valid JSON only - no prose outside the JSON object."#;

/// System instruction for daily tasting missions.
pub const MISSION_SYSTEM_PROMPT: &str = r#"You are the daily-mission writer for a personal tasting journal.
You suggest one small, concrete tasting exercise a user can do today.
Write in English. Respond with valid JSON only - no prose outside the JSON object."#;

/// Recognized flavor categories and their prompt phrases. Unrecognized tags
/// are passed through verbatim, in input order, alongside these.
const FLAVOR_VOCABULARY: &[(&str, &str)] = &[
    ("fruity", "bright fruity notes"),
    ("floral", "delicate floral aromas"),
    ("nutty", "roasted nutty tones"),
    ("chocolate", "dark chocolate richness"),
    ("caramel", "sweet caramel warmth"),
    ("spicy", "warming spice"),
    ("smoky", "smoky depth"),
    ("citrus", "zesty citrus lift"),
    ("earthy", "earthy undertones"),
    ("herbal", "fresh herbal notes"),
];

fn body_phrase(body: Option<Body>) -> &'static str {
    match body {
        Some(Body::Light) => "light, delicate mouthfeel",
        Some(Body::Medium) => "balanced, medium mouthfeel",
        Some(Body::Heavy) => "heavy, powerful mouthfeel",
        None => "unknown",
    }
}

fn aftertaste_phrase(aftertaste: Option<Aftertaste>) -> &'static str {
    match aftertaste {
        Some(Aftertaste::Short) => "a short, clean finish",
        Some(Aftertaste::Medium) => "a medium-length finish",
        Some(Aftertaste::Long) => "a long, lingering finish",
        None => "unknown",
    }
}

fn flavor_phrase(tag: &str) -> String {
    FLAVOR_VOCABULARY
        .iter()
        .find(|(id, _)| *id == tag)
        .map(|(_, phrase)| (*phrase).to_string())
        .unwrap_or_else(|| tag.to_string())
}

/// Build the user prompt for taste decoding.
///
/// Total function: missing fields render as an explicit "unknown" so the
/// provider always receives a fully-shaped profile.
pub fn build_taste_prompt(descriptor: &TasteDescriptor) -> String {
    let flavors = if descriptor.flavor_tags.is_empty() {
        "unknown".to_string()
    } else {
        descriptor
            .flavor_tags
            .iter()
            .map(|tag| flavor_phrase(tag))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "Tasting profile:\n- Body: {}\n- Flavors: {}\n- Aftertaste: {}\n\n{}",
        body_phrase(descriptor.body),
        flavors,
        aftertaste_phrase(descriptor.aftertaste),
        taste_output_contract(),
    )
}

/// Build the user prompt for a flavor-glossary entry.
pub fn build_flavor_prompt(term: &str) -> String {
    format!(
        "Define the flavor category \"{}\" as it applies to tasting notes.\n\n{}",
        term,
        flavor_output_contract(),
    )
}

/// Build the user prompt for a daily tasting mission.
pub fn build_mission_prompt(recent_tags: &[String]) -> String {
    let recent = if recent_tags.is_empty() {
        "none recorded yet".to_string()
    } else {
        recent_tags.join(", ")
    };
    format!(
        "Flavor tags from the user's recent journal entries: {}.\nSuggest one tasting mission for today that builds on or contrasts with them.\n\n{}",
        recent,
        mission_output_contract(),
    )
}

fn taste_output_contract() -> String {
    format!(
        "Output contract: a single JSON object, in English, with exactly these fields:\n\
         {{\"{}\": string (one vivid sentence), \"{}\": string (two to three sentences), \
         \"{}\": array of strings, \"{}\": array of strings (optional serving or pairing ideas)}}",
        FIELD_SHORT_DESCRIPTION, FIELD_DETAILED_DESCRIPTION, FIELD_TAGS, FIELD_RECOMMENDATIONS,
    )
}

fn flavor_output_contract() -> String {
    format!(
        "Output contract: a single JSON object, in English, with exactly these fields:\n\
         {{\"{}\": string, \"{}\": string (two to three sentences), \"{}\": array of strings}}",
        FIELD_NAME, FIELD_DESCRIPTION, FIELD_PAIRINGS,
    )
}

fn mission_output_contract() -> String {
    format!(
        "Output contract: a single JSON object, in English, with exactly these fields:\n\
         {{\"{}\": string (short title), \"{}\": string (the mission itself), \"{}\": array of strings}}",
        FIELD_TITLE, FIELD_PROMPT_TEXT, FIELD_FOCUS_TAGS,
    )
}
