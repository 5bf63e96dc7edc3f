//! Endpoint registry - the single source of truth for which endpoints exist.
//!
//! Endpoints are keyed by [`Endpoint::NAME`]. Each registration records the
//! concrete endpoint type so a lookup can verify that the caller's argument
//! and result types match what was injected under that name.

use std::any::{type_name, TypeId};
use std::collections::BTreeMap;

use thiserror::Error;

use crate::api::endpoint::{Endpoint, EndpointKind};
use crate::api::endpoints::{
    GetDashboardData, GetDashboardStats, GetUser, GetUsers, Login, UpdateUser,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Endpoint '{name}' is already registered by {existing}")]
    DuplicateEndpoint { name: String, existing: &'static str },

    #[error("Endpoint '{name}' is not registered")]
    UnknownEndpoint { name: String },

    #[error("Endpoint '{name}' is registered as {registered}, not {requested}")]
    TypeMismatch {
        name: String,
        registered: &'static str,
        requested: &'static str,
    },
}

/// Options for [`EndpointRegistry::inject_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InjectOptions {
    /// Replace an existing definition with the same name.
    pub override_existing: bool,
}

#[derive(Debug, Clone)]
struct Registration {
    kind: EndpointKind,
    type_id: TypeId,
    endpoint_type: &'static str,
    args_type: &'static str,
    output_type: &'static str,
}

impl Registration {
    fn of<E: Endpoint>() -> Self {
        Self {
            kind: E::KIND,
            type_id: TypeId::of::<E>(),
            endpoint_type: type_name::<E>(),
            args_type: type_name::<E::Args>(),
            output_type: type_name::<E::Output>(),
        }
    }
}

/// Tagged map from endpoint name to its definition.
#[derive(Debug, Clone, Default)]
pub struct EndpointRegistry {
    endpoints: BTreeMap<&'static str, Registration>,
}

impl EndpointRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in dashboard endpoint injected.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert::<GetDashboardData>();
        registry.insert::<GetDashboardStats>();
        registry.insert::<GetUsers>();
        registry.insert::<GetUser>();
        registry.insert::<UpdateUser>();
        registry.insert::<Login>();
        registry
    }

    /// Register `E` without overriding existing definitions.
    pub fn inject<E: Endpoint>(&mut self) -> Result<(), RegistryError> {
        self.inject_with::<E>(InjectOptions::default())
    }

    /// Register `E` under `E::NAME`.
    ///
    /// Re-injecting the same endpoint type is a no-op. A different type
    /// under a taken name is rejected unless `override_existing` is set.
    pub fn inject_with<E: Endpoint>(&mut self, options: InjectOptions) -> Result<(), RegistryError> {
        if let Some(existing) = self.endpoints.get(E::NAME) {
            if existing.type_id == TypeId::of::<E>() {
                return Ok(());
            }
            if !options.override_existing {
                return Err(RegistryError::DuplicateEndpoint {
                    name: E::NAME.to_string(),
                    existing: existing.endpoint_type,
                });
            }
            tracing::info!(
                endpoint = E::NAME,
                old = existing.endpoint_type,
                new = type_name::<E>(),
                "Overriding endpoint definition"
            );
        }
        self.insert::<E>();
        Ok(())
    }

    fn insert<E: Endpoint>(&mut self) {
        let registration = Registration::of::<E>();
        tracing::debug!(
            endpoint = E::NAME,
            kind = ?registration.kind,
            args = registration.args_type,
            output = registration.output_type,
            "Registered endpoint"
        );
        self.endpoints.insert(E::NAME, registration);
    }

    /// Verify that `E` is the definition registered under its name.
    pub fn ensure<E: Endpoint>(&self) -> Result<EndpointKind, RegistryError> {
        let registration =
            self.endpoints
                .get(E::NAME)
                .ok_or_else(|| RegistryError::UnknownEndpoint {
                    name: E::NAME.to_string(),
                })?;

        if registration.type_id != TypeId::of::<E>() {
            return Err(RegistryError::TypeMismatch {
                name: E::NAME.to_string(),
                registered: registration.endpoint_type,
                requested: type_name::<E>(),
            });
        }
        Ok(registration.kind)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.endpoints.contains_key(name)
    }

    pub fn kind(&self, name: &str) -> Option<EndpointKind> {
        self.endpoints.get(name).map(|r| r.kind)
    }

    /// Registered endpoint names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.endpoints.keys().copied().collect()
    }
}
