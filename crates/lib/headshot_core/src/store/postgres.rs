//! PostgreSQL store backend.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{AccountStore, HeadshotStore, StoreError, SubscriptionStore};
use crate::models::account::{Account, SubscriptionRecord};
use crate::models::headshot::{NewHeadshot, SavedHeadshot};
use crate::uuid::uuidv7;

/// Store backed by the `users`, `subscriptions` and `user_headshots` tables.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn get_account(&self, user_id: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, Account>(
            r#"
            SELECT id::text AS id, email, name, subscription, subscription_tier,
                   credits_used, credits_reset_date
            FROM users
            WHERE id = $1::uuid
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn set_tier(&self, user_id: &str, tier: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET subscription_tier = $2 WHERE id = $1::uuid")
            .bind(user_id)
            .bind(tier)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn start_credit_month(
        &self,
        user_id: &str,
        month: &str,
        used: i32,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET credits_used = $3, credits_reset_date = $2
            WHERE id = $1::uuid AND credits_reset_date IS DISTINCT FROM $2
            "#,
        )
        .bind(user_id)
        .bind(month)
        .bind(used)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn consume_credit(
        &self,
        user_id: &str,
        month: &str,
        limit: i32,
    ) -> Result<Option<i32>, StoreError> {
        let used = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE users
            SET credits_used = credits_used + 1
            WHERE id = $1::uuid AND credits_reset_date = $2 AND credits_used < $3
            RETURNING credits_used
            "#,
        )
        .bind(user_id)
        .bind(month)
        .bind(limit)
        .fetch_optional(&self.pool)
        .await?;
        Ok(used)
    }
}

#[async_trait]
impl SubscriptionStore for PgStore {
    async fn subscription_by_id(
        &self,
        polar_id: &str,
    ) -> Result<Option<SubscriptionRecord>, StoreError> {
        let row = sqlx::query_as::<_, SubscriptionRecord>(
            r#"
            SELECT polar_id, user_id::text AS user_id, status, polar_price_id
            FROM subscriptions
            WHERE polar_id = $1
            "#,
        )
        .bind(polar_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn active_subscription(
        &self,
        user_id: &str,
    ) -> Result<Option<SubscriptionRecord>, StoreError> {
        let row = sqlx::query_as::<_, SubscriptionRecord>(
            r#"
            SELECT polar_id, user_id::text AS user_id, status, polar_price_id
            FROM subscriptions
            WHERE user_id = $1::uuid AND status = 'active'
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[async_trait]
impl HeadshotStore for PgStore {
    async fn insert_headshot(&self, headshot: NewHeadshot) -> Result<SavedHeadshot, StoreError> {
        let row = sqlx::query_as::<_, SavedHeadshot>(
            r#"
            INSERT INTO user_headshots (id, user_id, image_url, style, description)
            VALUES ($1, $2::uuid, $3, $4, $5)
            RETURNING id, user_id::text AS user_id, image_url, style, description, created_at
            "#,
        )
        .bind(uuidv7())
        .bind(&headshot.user_id)
        .bind(&headshot.image_url)
        .bind(&headshot.style)
        .bind(&headshot.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_headshots(&self, user_id: &str) -> Result<Vec<SavedHeadshot>, StoreError> {
        let rows = sqlx::query_as::<_, SavedHeadshot>(
            r#"
            SELECT id, user_id::text AS user_id, image_url, style, description, created_at
            FROM user_headshots
            WHERE user_id = $1::uuid
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete_headshot(&self, user_id: &str, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM user_headshots WHERE id = $1 AND user_id = $2::uuid")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
