use std::sync::Arc;

use sonus::application::ports::{StorageBackend, StorageError};
use sonus::application::services::BackendRegistry;
use sonus::domain::PathReference;
use sonus::infrastructure::storage::InMemoryStorageBackend;

fn registry() -> BackendRegistry {
    BackendRegistry::new()
        .with_backend("memory", || {
            Ok(Arc::new(InMemoryStorageBackend::new()) as Arc<dyn StorageBackend>)
        })
        .with_backend("broken", || Err(StorageError::Config("token missing".into())))
}

#[test]
fn given_registered_scheme_when_resolving_then_returns_backend() {
    let resolved = registry().resolve(&PathReference::parse("memory://inbox"));

    assert!(resolved.is_ok());
}

#[test]
fn given_upper_case_scheme_when_resolving_then_matches_case_insensitively() {
    let registry = registry();

    assert!(registry.supports("MEMORY"));
    assert!(registry.resolve(&PathReference::parse("Memory://inbox")).is_ok());
}

#[test]
fn given_unknown_scheme_when_resolving_then_fails_with_config_error() {
    let result = registry().resolve(&PathReference::parse("s3://bucket/in"));

    match result {
        Err(e @ StorageError::UnknownScheme(_)) => {
            assert!(e.is_config());
            assert!(e.to_string().contains("s3"));
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("expected unknown scheme"),
    }
}

#[test]
fn given_reference_without_scheme_when_resolving_then_fails() {
    let result = registry().resolve(&PathReference::parse("/tmp/in"));

    assert!(matches!(result, Err(StorageError::UnknownScheme(s)) if s.is_empty()));
}

#[test]
fn given_failing_constructor_when_resolving_then_error_is_propagated() {
    let result = registry().resolve(&PathReference::parse("broken://x"));

    assert!(matches!(result, Err(StorageError::Config(_))));
}

#[test]
fn given_registry_when_listing_schemes_then_sorted() {
    assert_eq!(registry().schemes(), vec!["broken", "memory"]);
}
