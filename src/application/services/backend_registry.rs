use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::application::ports::{StorageBackend, StorageError};
use crate::domain::PathReference;

type BackendConstructor =
    Arc<dyn Fn() -> Result<Arc<dyn StorageBackend>, StorageError> + Send + Sync>;

/// Scheme-keyed table of storage backend constructors.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    constructors: HashMap<String, BackendConstructor>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `constructor` for `scheme`, replacing any earlier registration.
    pub fn register<F>(&mut self, scheme: impl Into<String>, constructor: F)
    where
        F: Fn() -> Result<Arc<dyn StorageBackend>, StorageError> + Send + Sync + 'static,
    {
        let scheme = scheme.into().to_lowercase();
        tracing::debug!(scheme = %scheme, "Registered storage backend");
        self.constructors.insert(scheme, Arc::new(constructor));
    }

    pub fn with_backend<F>(mut self, scheme: impl Into<String>, constructor: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn StorageBackend>, StorageError> + Send + Sync + 'static,
    {
        self.register(scheme, constructor);
        self
    }

    pub fn supports(&self, scheme: &str) -> bool {
        self.constructors.contains_key(&scheme.to_lowercase())
    }

    pub fn schemes(&self) -> Vec<&str> {
        let mut schemes: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        schemes.sort_unstable();
        schemes
    }

    /// Builds the backend for `location`. Fails before any I/O when the scheme is unknown.
    pub fn resolve(&self, location: &PathReference) -> Result<Arc<dyn StorageBackend>, StorageError> {
        let scheme = location.scheme().to_lowercase();
        let constructor = self
            .constructors
            .get(&scheme)
            .ok_or_else(|| StorageError::UnknownScheme(scheme.clone()))?;
        constructor()
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("schemes", &self.schemes())
            .finish()
    }
}
