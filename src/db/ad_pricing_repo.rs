// src/db/ad_pricing_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::map_unique_violation,
    models::meta_ads::{AdPricing, AdPricingPayload},
};

#[derive(Clone, Default)]
pub struct AdPricingRepository;

impl AdPricingRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<AdPricing>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, AdPricing>("SELECT * FROM ad_pricing ORDER BY state ASC, city ASC")
            .fetch_all(executor)
            .await?;

        Ok(rows)
    }

    pub async fn create<'e, E>(&self, executor: E, input: &AdPricingPayload) -> Result<AdPricing, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, AdPricing>(
            r#"
            INSERT INTO ad_pricing (city, state, price_per_lead, campaign_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&input.city)
        .bind(&input.state)
        .bind(input.price_per_lead)
        .bind(&input.campaign_id)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, AppError::Conflict("ad_pricing")))?;

        Ok(row)
    }

    pub async fn update<'e, E>(&self, executor: E, id: Uuid, input: &AdPricingPayload) -> Result<AdPricing, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, AdPricing>(
            r#"
            UPDATE ad_pricing
            SET city = $2, state = $3, price_per_lead = $4, campaign_id = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.city)
        .bind(&input.state)
        .bind(input.price_per_lead)
        .bind(&input.campaign_id)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, AppError::Conflict("ad_pricing")))?;

        Ok(row)
    }

    pub async fn update_price<'e, E>(&self, executor: E, id: Uuid, price: Decimal) -> Result<AdPricing, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, AdPricing>(
            "UPDATE ad_pricing SET price_per_lead = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(price)
        .fetch_one(executor)
        .await?;

        Ok(row)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM ad_pricing WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
