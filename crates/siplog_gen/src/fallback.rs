//! Deterministic offline fallback generation.
//!
//! Used when the provider path fails or is skipped. Selection is keyed on
//! `body` alone: light, heavy, and everything else (medium or unspecified)
//! each map to one fixed result. Flavor tags and aftertaste are accepted but
//! deliberately not used - the point is a plausible, usable screen, not a
//! faithful reading of the profile.

use crate::types::{Body, FlavorEntry, GenerationResult, TasteDescriptor, TastingMission};

fn light_result() -> GenerationResult {
    GenerationResult {
        short_description: "A light, graceful cup with a gentle touch.".to_string(),
        detailed_description: "Delicate and easy-going, this one leads with subtle \
            aromatics and a soft, tea-like mouthfeel. It rewards slow sipping rather \
            than bold first impressions."
            .to_string(),
        tags: vec!["light".to_string(), "delicate".to_string(), "subtle".to_string()],
        recommendations: vec![
            "Try it without milk to keep the nuance".to_string(),
            "Pair with something mild, like a butter biscuit".to_string(),
        ],
    }
}

fn heavy_result() -> GenerationResult {
    GenerationResult {
        short_description: "A bold, full-bodied pour that fills the room.".to_string(),
        detailed_description: "Rich and powerful from the first sip, with a dense, \
            syrupy weight on the tongue. This is the kind of profile that stands up \
            to anything you put next to it."
            .to_string(),
        tags: vec!["bold".to_string(), "rich".to_string(), "full-bodied".to_string()],
        recommendations: vec![
            "Pairs well with dark chocolate".to_string(),
            "Holds its own with milk or cream".to_string(),
        ],
    }
}

fn balanced_result() -> GenerationResult {
    GenerationResult {
        short_description: "A balanced, friendly profile with broad appeal.".to_string(),
        detailed_description: "Comfortably in the middle: enough body to feel \
            substantial, enough brightness to stay interesting. An everyday profile \
            that suits almost any moment."
            .to_string(),
        tags: vec!["balanced".to_string(), "smooth".to_string(), "versatile".to_string()],
        recommendations: vec![
            "A safe pick to share with guests".to_string(),
            "Works at any time of day".to_string(),
        ],
    }
}

/// Canned taste description, selected by body bucket.
pub fn describe_taste(descriptor: &TasteDescriptor) -> GenerationResult {
    match descriptor.body {
        Some(Body::Light) => light_result(),
        Some(Body::Heavy) => heavy_result(),
        _ => balanced_result(),
    }
}

/// Canned glossary entry built around the requested term.
pub fn define_flavor(term: &str) -> FlavorEntry {
    FlavorEntry {
        name: term.to_string(),
        description: format!(
            "\"{term}\" is one of the flavor categories tasters use to describe what \
             they notice in a cup. Log it whenever the impression stands out to you; \
             over time your journal will show how often it appears in what you enjoy."
        ),
        pairings: vec!["your next tasting".to_string()],
    }
}

/// Canned daily mission, independent of recent tags.
pub fn suggest_mission() -> TastingMission {
    TastingMission {
        title: "Slow sip study".to_string(),
        prompt_text: "Pick anything you have on hand and take three slow sips, one \
            minute apart. Note one word for each sip - does the impression change as \
            it cools?"
            .to_string(),
        focus_tags: vec!["attention".to_string(), "temperature".to_string()],
    }
}
