//! Persistence gateway for saved headshots.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::auth::Identity;
use crate::models::headshot::{NewHeadshot, SavedHeadshot};
use crate::store::{HeadshotStore, StoreError};
use crate::styles::StyleId;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Image URL is required")]
    MissingImageUrl,

    #[error("Database error: {0}")]
    Database(#[from] StoreError),
}

impl PersistenceError {
    /// Stable error code returned to clients.
    pub fn code(&self) -> &'static str {
        match self {
            PersistenceError::Unauthenticated => "UNAUTHORIZED",
            PersistenceError::MissingImageUrl => "MISSING_IMAGE_URL",
            PersistenceError::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[derive(Clone)]
pub struct HeadshotGateway {
    store: Arc<dyn HeadshotStore>,
}

impl HeadshotGateway {
    pub fn new(store: Arc<dyn HeadshotStore>) -> Self {
        Self { store }
    }

    /// Save a headshot for `owner`. Blank style defaults to `professional`,
    /// missing description to empty.
    pub async fn save(
        &self,
        owner: Option<&Identity>,
        image_url: &str,
        style: Option<&str>,
        description: Option<&str>,
    ) -> Result<SavedHeadshot, PersistenceError> {
        let owner = owner.ok_or(PersistenceError::Unauthenticated)?;
        let image_url = image_url.trim();
        if image_url.is_empty() {
            return Err(PersistenceError::MissingImageUrl);
        }
        let style = style
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(StyleId::Professional.as_str());

        let saved = self
            .store
            .insert_headshot(NewHeadshot {
                user_id: owner.user_id.clone(),
                image_url: image_url.to_string(),
                style: style.to_string(),
                description: description.unwrap_or_default().to_string(),
            })
            .await
            .inspect_err(|e| error!(user_id = %owner.user_id, error = %e, "failed to save headshot"))?;
        info!(user_id = %owner.user_id, id = %saved.id, "headshot saved");
        Ok(saved)
    }

    pub async fn list(&self, owner: &Identity) -> Result<Vec<SavedHeadshot>, PersistenceError> {
        Ok(self.store.list_headshots(&owner.user_id).await?)
    }

    /// Delete when owned by `owner`; returns whether a record was removed.
    pub async fn delete(&self, owner: &Identity, id: Uuid) -> Result<bool, PersistenceError> {
        let removed = self.store.delete_headshot(&owner.user_id, id).await?;
        info!(user_id = %owner.user_id, %id, removed, "headshot delete");
        Ok(removed)
    }
}
