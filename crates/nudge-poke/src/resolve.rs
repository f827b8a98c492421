//! Identity resolution adapter.
//!
//! Two-stage lookups in both directions. Each stage either yields a non-empty
//! value or fails with its own error, and the first failure ends the chain.

use nudge_core::{error::NudgeError, message::PersonField, traits::IdentityResolver};
use std::sync::Arc;
use thiserror::Error;

/// A person as seen by the poke pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub internal_id: String,
    pub display_name: String,
    pub platform_handle: String,
}

/// Why a lookup stopped. The `Display` text is the diagnostic.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no user id on the event")]
    MissingHandle,
    #[error("no person known for user id {0}")]
    NoIdentityForHandle(String),
    #[error("no display name for person {0}")]
    NoDisplayName(String),
    #[error("no person known by the name {0}")]
    NoIdentityForName(String),
    #[error("no user id for person {0}")]
    NoPlatformHandle(String),
    #[error("identity lookup failed: {0}")]
    Lookup(#[from] NudgeError),
}

/// Sequences resolver calls for one platform.
#[derive(Clone)]
pub struct IdentityAdapter {
    resolver: Arc<dyn IdentityResolver>,
    platform: String,
}

impl IdentityAdapter {
    pub fn new(resolver: Arc<dyn IdentityResolver>, platform: &str) -> Self {
        Self {
            resolver,
            platform: platform.to_string(),
        }
    }

    /// Platform handle → person id → display name.
    pub async fn identity_for_handle(&self, handle: &str) -> Result<ResolvedIdentity, ResolveError> {
        let handle = non_empty(Some(handle.to_string())).ok_or(ResolveError::MissingHandle)?;

        let internal_id = non_empty(self.resolver.person_id(&self.platform, &handle).await?)
            .ok_or_else(|| ResolveError::NoIdentityForHandle(handle.clone()))?;

        let display_name = non_empty(
            self.resolver
                .person_value(&internal_id, PersonField::PersonName)
                .await?,
        )
        .ok_or_else(|| ResolveError::NoDisplayName(internal_id.clone()))?;

        Ok(ResolvedIdentity {
            internal_id,
            display_name,
            platform_handle: handle,
        })
    }

    /// Display name → person id → platform handle.
    ///
    /// The caller is responsible for rejecting an empty name.
    pub async fn handle_for_name(&self, name: &str) -> Result<ResolvedIdentity, ResolveError> {
        let internal_id = non_empty(self.resolver.person_id_by_name(name).await?)
            .ok_or_else(|| ResolveError::NoIdentityForName(name.to_string()))?;

        let platform_handle = non_empty(
            self.resolver
                .person_value(&internal_id, PersonField::UserId)
                .await?,
        )
        .ok_or_else(|| ResolveError::NoPlatformHandle(internal_id.clone()))?;

        Ok(ResolvedIdentity {
            internal_id,
            display_name: name.to_string(),
            platform_handle,
        })
    }
}

/// Treat empty and whitespace-only values as missing.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
