//! Generation orchestration.
//!
//! One state machine per call: check credential, check cache, build prompt,
//! invoke provider, parse, cache on success. Any failure along the provider
//! path degrades to the deterministic offline fallback when the caller allows
//! it (the default), otherwise the typed error propagates. There is no retry
//! loop within a call, and degraded results are never cached - a fallback
//! must not masquerade as a cached provider success.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::client::ProviderClient;
use crate::credentials::CredentialStore;
use crate::error::GenerateError;
use crate::types::{
    FlavorEntry, GenerationOptions, GenerationResult, TasteDescriptor, TastingMission,
};
use crate::{fallback, parser, prompt};

// Cache namespaces, one per call family.
pub const TASTE_NAMESPACE: &str = "taste-decode";
pub const FLAVOR_NAMESPACE: &str = "flavor-ref";
pub const MISSION_NAMESPACE: &str = "mission";

// Per-namespace TTLs, matched to call frequency and staleness tolerance.
pub const TASTE_TTL_SECS: i64 = 24 * 60 * 60;
pub const FLAVOR_TTL_SECS: i64 = 7 * 24 * 60 * 60;
pub const MISSION_TTL_SECS: i64 = 12 * 60 * 60;

/// Substituted when the provider omits `shortDescription`; callers always
/// receive a non-empty one.
const SHORT_DESCRIPTION_PLACEHOLDER: &str = "A taste worth writing down.";

/// Client-side generation service: one instance per process, shared across
/// screens. Calls are independent; the cache is the only shared state.
pub struct GenerationService {
    client: Arc<dyn ProviderClient>,
    credentials: Arc<dyn CredentialStore>,
    cache: Arc<CacheStore>,
}

impl GenerationService {
    pub fn new(
        client: Arc<dyn ProviderClient>,
        credentials: Arc<dyn CredentialStore>,
        cache: Arc<CacheStore>,
    ) -> Self {
        Self {
            client,
            credentials,
            cache,
        }
    }

    /// Turn a structured sensory profile into natural-language tasting notes.
    ///
    /// Never fails when `options.use_fallback` is true (the default).
    pub async fn describe_taste(
        &self,
        descriptor: &TasteDescriptor,
        options: GenerationOptions,
    ) -> Result<GenerationResult, GenerateError> {
        let key = CacheStore::make_key(TASTE_NAMESPACE, descriptor);
        self.run(
            &key,
            TASTE_TTL_SECS,
            prompt::TASTE_SYSTEM_PROMPT,
            prompt::build_taste_prompt(descriptor),
            options,
            || fallback::describe_taste(descriptor),
            |mut result: GenerationResult| {
                if result.short_description.is_empty() {
                    result.short_description = SHORT_DESCRIPTION_PLACEHOLDER.to_string();
                }
                result
            },
        )
        .await
    }

    /// Glossary entry for a flavor category.
    pub async fn define_flavor(
        &self,
        term: &str,
        options: GenerationOptions,
    ) -> Result<FlavorEntry, GenerateError> {
        let key = CacheStore::make_key(FLAVOR_NAMESPACE, &term);
        self.run(
            &key,
            FLAVOR_TTL_SECS,
            prompt::FLAVOR_SYSTEM_PROMPT,
            prompt::build_flavor_prompt(term),
            options,
            || fallback::define_flavor(term),
            |entry| entry,
        )
        .await
    }

    /// Daily tasting mission seeded from recent journal tags.
    pub async fn suggest_mission(
        &self,
        recent_tags: &[String],
        options: GenerationOptions,
    ) -> Result<TastingMission, GenerateError> {
        let key = CacheStore::make_key(MISSION_NAMESPACE, &recent_tags);
        self.run(
            &key,
            MISSION_TTL_SECS,
            prompt::MISSION_SYSTEM_PROMPT,
            prompt::build_mission_prompt(recent_tags),
            options,
            fallback::suggest_mission,
            |mission| mission,
        )
        .await
    }

    /// The shared state machine. `normalize` runs on the parsed value before
    /// the cache write, so cached entries satisfy the same invariants as
    /// returned ones.
    async fn run<T, FB, FN>(
        &self,
        key: &str,
        ttl_secs: i64,
        system_prompt: &str,
        user_prompt: String,
        options: GenerationOptions,
        fallback: FB,
        normalize: FN,
    ) -> Result<T, GenerateError>
    where
        T: Serialize + DeserializeOwned,
        FB: FnOnce() -> T,
        FN: FnOnce(T) -> T,
    {
        // STEP 1: credential. An empty stored string counts as absent.
        let credential = match self.credentials.get() {
            Some(c) if !c.is_empty() => c,
            _ => {
                if options.use_fallback {
                    warn!("no provider credential configured, using offline fallback");
                    return Ok(fallback());
                }
                return Err(GenerateError::MissingCredential);
            }
        };

        // STEP 2: cache, before any network attempt.
        if let Some(hit) = self.cache.get::<T>(key) {
            debug!("cache hit for {key}");
            return Ok(hit);
        }

        // STEP 3: provider round trip + parse. No retries.
        let outcome = match self.client.invoke(system_prompt, &user_prompt, &credential).await {
            Ok(payload) => parser::parse_completion::<T>(&payload),
            Err(error) => Err(error),
        };

        match outcome {
            Ok(parsed) => {
                let value = normalize(parsed);
                self.cache.put(key, &value, ttl_secs);
                Ok(value)
            }
            Err(error) if options.use_fallback => {
                warn!("generation failed ({error}), using offline fallback");
                Ok(fallback())
            }
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::client::FakeProviderClient;
    use crate::credentials::MemoryCredentialStore;
    use crate::types::Body;

    fn ok_envelope(content: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "choices": [ { "message": { "content": content.to_string() } } ]
        })
    }

    fn taste_envelope() -> serde_json::Value {
        ok_envelope(serde_json::json!({
            "shortDescription": "Bright and lively.",
            "detailedDescription": "Opens with citrus and closes clean.",
            "tags": ["citrus"],
            "recommendations": []
        }))
    }

    fn service(
        client: Arc<FakeProviderClient>,
        credentials: MemoryCredentialStore,
        cache: Arc<CacheStore>,
    ) -> GenerationService {
        GenerationService::new(client, Arc::new(credentials), cache)
    }

    #[tokio::test]
    async fn test_missing_credential_short_circuits() {
        let client = Arc::new(FakeProviderClient::always_ok(taste_envelope()));
        let svc = service(
            client.clone(),
            MemoryCredentialStore::new(),
            Arc::new(CacheStore::new()),
        );
        let descriptor = TasteDescriptor::new().with_body(Body::Light);

        let result = svc
            .describe_taste(&descriptor, GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(result, fallback::describe_taste(&descriptor));

        let strict = svc
            .describe_taste(&descriptor, GenerationOptions::without_fallback())
            .await;
        assert_eq!(strict, Err(GenerateError::MissingCredential));

        // The provider is never reached either way.
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_credential_counts_as_absent() {
        let client = Arc::new(FakeProviderClient::always_ok(taste_envelope()));
        let svc = service(
            client.clone(),
            MemoryCredentialStore::with_credential(""),
            Arc::new(CacheStore::new()),
        );

        let strict = svc
            .describe_taste(&TasteDescriptor::new(), GenerationOptions::without_fallback())
            .await;
        assert_eq!(strict, Err(GenerateError::MissingCredential));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_cache_idempotence_single_provider_call() {
        let client = Arc::new(FakeProviderClient::always_ok(taste_envelope()));
        let svc = service(
            client.clone(),
            MemoryCredentialStore::with_credential("sk-test"),
            Arc::new(CacheStore::new()),
        );
        let descriptor = TasteDescriptor::new()
            .with_body(Body::Medium)
            .with_flavor_tags(["citrus"]);

        let first = svc
            .describe_taste(&descriptor, GenerationOptions::default())
            .await
            .unwrap();
        let second = svc
            .describe_taste(&descriptor, GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_cache_expiry_triggers_new_call() {
        let clock = Arc::new(ManualClock::at(1_000_000));
        let client = Arc::new(FakeProviderClient::always_ok(taste_envelope()));
        let svc = service(
            client.clone(),
            MemoryCredentialStore::with_credential("sk-test"),
            Arc::new(CacheStore::with_clock(clock.clone())),
        );
        let descriptor = TasteDescriptor::new().with_body(Body::Heavy);

        svc.describe_taste(&descriptor, GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(client.call_count(), 1);

        // Still live just inside the 24h TTL.
        clock.advance_ms(TASTE_TTL_SECS * 1000 - 1);
        svc.describe_taste(&descriptor, GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(client.call_count(), 1);

        clock.advance_ms(2);
        svc.describe_taste(&descriptor, GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_http_429_degrades_or_propagates() {
        let client = Arc::new(FakeProviderClient::always_err(GenerateError::Provider {
            status: 429,
            message: "rate limited".to_string(),
        }));
        let cache = Arc::new(CacheStore::new());
        let svc = service(
            client.clone(),
            MemoryCredentialStore::with_credential("sk-test"),
            cache.clone(),
        );
        let descriptor = TasteDescriptor::new().with_body(Body::Medium);

        let degraded = svc
            .describe_taste(&descriptor, GenerationOptions::default())
            .await
            .unwrap();
        assert!(degraded.short_description.contains("balanced"));

        let strict = svc
            .describe_taste(&descriptor, GenerationOptions::without_fallback())
            .await;
        match strict {
            Err(GenerateError::Provider { status, .. }) => assert_eq!(status, 429),
            other => panic!("expected Provider error, got {other:?}"),
        }

        // Degraded results are never cached.
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_completion_degrades_or_propagates() {
        let client = Arc::new(FakeProviderClient::always_ok(ok_envelope_raw("not json")));
        let svc = service(
            client,
            MemoryCredentialStore::with_credential("sk-test"),
            Arc::new(CacheStore::new()),
        );
        let descriptor = TasteDescriptor::new().with_body(Body::Light);

        let degraded = svc
            .describe_taste(&descriptor, GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(degraded, fallback::describe_taste(&descriptor));

        let strict = svc
            .describe_taste(&descriptor, GenerationOptions::without_fallback())
            .await;
        assert!(matches!(strict, Err(GenerateError::Parse(_))));
    }

    fn ok_envelope_raw(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [ { "message": { "content": content } } ]
        })
    }

    #[tokio::test]
    async fn test_placeholder_substituted_before_caching() {
        let client = Arc::new(FakeProviderClient::always_ok(ok_envelope(
            serde_json::json!({"detailedDescription": "Rich and dark."}),
        )));
        let svc = service(
            client.clone(),
            MemoryCredentialStore::with_credential("sk-test"),
            Arc::new(CacheStore::new()),
        );
        let descriptor = TasteDescriptor::new().with_body(Body::Heavy);

        let first = svc
            .describe_taste(&descriptor, GenerationOptions::default())
            .await
            .unwrap();
        assert!(!first.short_description.is_empty());

        // The cached copy carries the placeholder too.
        let second = svc
            .describe_taste(&descriptor, GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_flavor_and_mission_namespaces_are_independent() {
        let client = Arc::new(FakeProviderClient::new(vec![
            Ok(ok_envelope(serde_json::json!({
                "name": "fruity",
                "description": "Notes reminiscent of fresh or dried fruit.",
                "pairings": ["light roasts"]
            }))),
            Ok(ok_envelope(serde_json::json!({
                "title": "Contrast day",
                "promptText": "Taste something smoky right after something fruity.",
                "focusTags": ["smoky", "fruity"]
            }))),
        ]));
        let cache = Arc::new(CacheStore::new());
        let svc = service(
            client.clone(),
            MemoryCredentialStore::with_credential("sk-test"),
            cache.clone(),
        );

        let entry = svc
            .define_flavor("fruity", GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(entry.name, "fruity");

        let tags = vec!["fruity".to_string()];
        let mission = svc
            .suggest_mission(&tags, GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(mission.title, "Contrast day");

        assert_eq!(client.call_count(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_mission_fallback_on_transport_error() {
        let client = Arc::new(FakeProviderClient::always_err(GenerateError::Transport(
            "connection refused".to_string(),
        )));
        let svc = service(
            client,
            MemoryCredentialStore::with_credential("sk-test"),
            Arc::new(CacheStore::new()),
        );

        let mission = svc
            .suggest_mission(&[], GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(mission, fallback::suggest_mission());
    }
}
