//! Saved headshot record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row from `user_headshots`. Never mutated after insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SavedHeadshot {
    pub id: Uuid,
    pub user_id: String,
    pub image_url: String,
    pub style: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a new saved headshot.
#[derive(Debug, Clone)]
pub struct NewHeadshot {
    pub user_id: String,
    pub image_url: String,
    pub style: String,
    pub description: String,
}
