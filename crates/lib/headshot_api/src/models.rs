//! Request and response bodies.

use headshot_core::generation::ImageSource;
use headshot_core::models::headshot::SavedHeadshot;
use headshot_core::tier::Tier;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateErrorResponse {
    pub error: String,
    pub message: String,
    /// Always `"error-fallback"`.
    pub source: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub images: Vec<String>,
    pub source: ImageSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub tier: Tier,
    pub is_guest: bool,
    pub quota: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_remaining: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditsResponse {
    /// Remaining credits this month.
    pub credits: u32,
    pub used: u32,
    pub limit: u32,
    pub tier: Tier,
    pub is_guest: bool,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatusResponse {
    pub tier: Tier,
    pub is_subscribed: bool,
    pub max_generations: u32,
    pub quota: usize,
    pub styles: Vec<String>,
    pub custom_prompting: bool,
    pub history_access: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveHeadshotRequest {
    pub image_url: Option<String>,
    pub style: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteHeadshotRequest {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadshotInfo {
    pub id: String,
    pub image_url: String,
    pub style: String,
    pub description: String,
    pub created_at: String,
}

impl From<SavedHeadshot> for HeadshotInfo {
    fn from(h: SavedHeadshot) -> Self {
        Self {
            id: h.id.to_string(),
            image_url: h.image_url,
            style: h.style,
            description: h.description,
            created_at: h.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveHeadshotResponse {
    pub success: bool,
    pub message: String,
    pub data: HeadshotInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadshotListResponse {
    pub success: bool,
    pub headshots: Vec<HeadshotInfo>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteHeadshotResponse {
    pub success: bool,
    pub deleted: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStatusResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub db_connected: bool,
    pub store: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylesResponse {
    pub tier: Tier,
    pub is_guest: bool,
    pub styles: Vec<StyleInfo>,
}
