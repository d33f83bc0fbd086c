//! Sport-adventure activity inventory service

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{is_unique_violation, AppError, AppResult};
use shared::idgen::{self, MAX_ATTEMPTS};
use shared::{
    filter_inventory, group_by_category, CategoryGroup, ServiceType, SportAdventure,
    SportAdventureType,
};

use super::ProviderService;

/// Sport-adventure inventory service
#[derive(Clone)]
pub struct SportAdventureService {
    db: PgPool,
}

/// Input for creating an activity
#[derive(Debug, Deserialize)]
pub struct CreateSportAdventureInput {
    pub activity_type: SportAdventureType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub location: String,
    pub price: Decimal,
    #[serde(default)]
    pub minimum_age: i32,
    #[serde(default)]
    pub terms_and_conditions: Vec<String>,
    pub image: Option<String>,
}

/// Input for updating an activity. The category and display id are
/// immutable.
#[derive(Debug, Deserialize)]
pub struct UpdateSportAdventureInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub price: Option<Decimal>,
    pub minimum_age: Option<i32>,
    pub terms_and_conditions: Option<Vec<String>>,
    pub image: Option<String>,
}

const SPORT_ADVENTURE_COLUMNS: &str = "id, provider_id, activity_id, activity_type, name, \
     description, location, price, minimum_age, terms_and_conditions, image, \
     created_at, updated_at";

#[derive(Debug, FromRow)]
struct SportAdventureRow {
    id: Uuid,
    provider_id: Uuid,
    activity_id: String,
    activity_type: String,
    name: String,
    description: String,
    location: String,
    price: Decimal,
    minimum_age: i32,
    terms_and_conditions: Vec<String>,
    image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SportAdventureRow {
    fn into_model(self) -> AppResult<SportAdventure> {
        let activity_type = SportAdventureType::parse(&self.activity_type).ok_or_else(|| {
            AppError::Internal(format!("unknown activity type {}", self.activity_type))
        })?;

        Ok(SportAdventure {
            id: self.id,
            provider_id: self.provider_id,
            activity_id: self.activity_id,
            activity_type,
            name: self.name,
            description: self.description,
            location: self.location,
            price: self.price,
            minimum_age: self.minimum_age,
            terms_and_conditions: self.terms_and_conditions,
            image: self.image,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl SportAdventureService {
    /// Create a new SportAdventureService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an activity for an approved sport-adventure provider
    pub async fn create(
        &self,
        provider_id: Uuid,
        input: CreateSportAdventureInput,
    ) -> AppResult<SportAdventure> {
        self.assert_gate(provider_id).await?;

        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "name is required".to_string(),
            });
        }
        shared::pricing::validate_listing_price(input.price)?;
        if input.minimum_age < 0 {
            return Err(AppError::Validation {
                field: "minimum_age".to_string(),
                message: "minimum age cannot be negative".to_string(),
            });
        }

        let prefix = input.activity_type.id_prefix();

        for _ in 0..MAX_ATTEMPTS {
            let display_id = self.allocate_display_id(prefix).await?;

            let inserted = sqlx::query_as::<_, SportAdventureRow>(&format!(
                r#"
                INSERT INTO sport_adventures (
                    provider_id, activity_id, activity_type, name, description,
                    location, price, minimum_age, terms_and_conditions, image
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING {SPORT_ADVENTURE_COLUMNS}
                "#,
            ))
            .bind(provider_id)
            .bind(&display_id)
            .bind(input.activity_type.as_str())
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.price)
            .bind(input.minimum_age)
            .bind(&input.terms_and_conditions)
            .bind(&input.image)
            .fetch_one(&self.db)
            .await;

            match inserted {
                Ok(row) => return row.into_model(),
                Err(e) if is_unique_violation(&e) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::GenerationExhausted(MAX_ATTEMPTS))
    }

    /// Get one activity by display id
    pub async fn get_by_display_id(&self, activity_id: &str) -> AppResult<SportAdventure> {
        let row = sqlx::query_as::<_, SportAdventureRow>(&format!(
            "SELECT {SPORT_ADVENTURE_COLUMNS} FROM sport_adventures WHERE activity_id = $1",
        ))
        .bind(activity_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Activity".to_string()))?;

        row.into_model()
    }

    /// All activities of one provider
    pub async fn list_for_provider(&self, provider_id: Uuid) -> AppResult<Vec<SportAdventure>> {
        let rows = sqlx::query_as::<_, SportAdventureRow>(&format!(
            "SELECT {SPORT_ADVENTURE_COLUMNS} FROM sport_adventures \
             WHERE provider_id = $1 ORDER BY created_at ASC",
        ))
        .bind(provider_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(SportAdventureRow::into_model)
            .collect()
    }

    /// Public browse with search terms, grouped by activity category
    pub async fn browse(&self, terms: &[String]) -> AppResult<Vec<CategoryGroup<SportAdventure>>> {
        let rows = sqlx::query_as::<_, SportAdventureRow>(&format!(
            "SELECT {SPORT_ADVENTURE_COLUMNS} FROM sport_adventures ORDER BY created_at ASC",
        ))
        .fetch_all(&self.db)
        .await?;

        let activities = rows
            .into_iter()
            .map(SportAdventureRow::into_model)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(group_by_category(filter_inventory(activities, terms)))
    }

    /// Update an owned activity
    pub async fn update(
        &self,
        provider_id: Uuid,
        activity_id: &str,
        input: UpdateSportAdventureInput,
    ) -> AppResult<SportAdventure> {
        self.assert_gate(provider_id).await?;
        self.owned(provider_id, activity_id).await?;

        if let Some(price) = input.price {
            shared::pricing::validate_listing_price(price)?;
        }
        if let Some(minimum_age) = input.minimum_age {
            if minimum_age < 0 {
                return Err(AppError::Validation {
                    field: "minimum_age".to_string(),
                    message: "minimum age cannot be negative".to_string(),
                });
            }
        }

        let row = sqlx::query_as::<_, SportAdventureRow>(&format!(
            r#"
            UPDATE sport_adventures SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                location = COALESCE($5, location),
                price = COALESCE($6, price),
                minimum_age = COALESCE($7, minimum_age),
                terms_and_conditions = COALESCE($8, terms_and_conditions),
                image = COALESCE($9, image),
                updated_at = NOW()
            WHERE activity_id = $1 AND provider_id = $2
            RETURNING {SPORT_ADVENTURE_COLUMNS}
            "#,
        ))
        .bind(activity_id)
        .bind(provider_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.location)
        .bind(input.price)
        .bind(input.minimum_age)
        .bind(&input.terms_and_conditions)
        .bind(&input.image)
        .fetch_one(&self.db)
        .await?;

        row.into_model()
    }

    /// Delete an owned activity
    pub async fn delete(&self, provider_id: Uuid, activity_id: &str) -> AppResult<()> {
        self.assert_gate(provider_id).await?;
        self.owned(provider_id, activity_id).await?;

        sqlx::query("DELETE FROM sport_adventures WHERE activity_id = $1 AND provider_id = $2")
            .bind(activity_id)
            .bind(provider_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Approval gate applied to every mutating operation
    async fn assert_gate(&self, provider_id: Uuid) -> AppResult<()> {
        ProviderService::new(self.db.clone())
            .assert_can_manage(provider_id, ServiceType::SportAdventure)
            .await?;
        Ok(())
    }

    async fn owned(&self, provider_id: Uuid, activity_id: &str) -> AppResult<SportAdventure> {
        let activity = self.get_by_display_id(activity_id).await?;
        if activity.provider_id != provider_id {
            return Err(AppError::Forbidden(
                "listing belongs to another provider".to_string(),
            ));
        }
        Ok(activity)
    }

    async fn allocate_display_id(&self, prefix: &str) -> AppResult<String> {
        let existing: Vec<String> = sqlx::query_scalar(
            "SELECT activity_id FROM sport_adventures WHERE activity_id LIKE $1",
        )
        .bind(format!("{prefix}%"))
        .fetch_all(&self.db)
        .await?;

        let taken: HashSet<String> = existing.into_iter().collect();
        let id = idgen::generate_id(prefix, |candidate| taken.contains(candidate))?;
        Ok(id)
    }
}
