//! Transportation inventory service

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{is_unique_violation, AppError, AppResult};
use shared::idgen::{self, MAX_ATTEMPTS};
use shared::{
    filter_inventory, group_by_category, CategoryGroup, ServiceType, TransportType, Transportation,
};

use super::ProviderService;

/// Transportation inventory service
#[derive(Clone)]
pub struct TransportationService {
    db: PgPool,
}

/// Input for creating a transportation unit
#[derive(Debug, Deserialize)]
pub struct CreateTransportationInput {
    pub transport_type: TransportType,
    pub driver_name: String,
    pub model: String,
    pub price_per_day: Decimal,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub terms_and_conditions: String,
    pub permit_number: Option<String>,
    pub insurance_expiry: Option<NaiveDate>,
}

/// Input for updating a transportation unit. The category and display id
/// are immutable.
#[derive(Debug, Deserialize)]
pub struct UpdateTransportationInput {
    pub driver_name: Option<String>,
    pub model: Option<String>,
    pub price_per_day: Option<Decimal>,
    pub features: Option<Vec<String>>,
    pub terms_and_conditions: Option<String>,
    pub permit_number: Option<String>,
    pub insurance_expiry: Option<NaiveDate>,
}

const TRANSPORTATION_COLUMNS: &str = "id, provider_id, transport_id, transport_type, \
     driver_name, model, price_per_day, features, terms_and_conditions, \
     permit_number, insurance_expiry, created_at, updated_at";

#[derive(Debug, FromRow)]
struct TransportationRow {
    id: Uuid,
    provider_id: Uuid,
    transport_id: String,
    transport_type: String,
    driver_name: String,
    model: String,
    price_per_day: Decimal,
    features: Vec<String>,
    terms_and_conditions: String,
    permit_number: Option<String>,
    insurance_expiry: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TransportationRow {
    fn into_model(self) -> AppResult<Transportation> {
        let transport_type = TransportType::parse(&self.transport_type).ok_or_else(|| {
            AppError::Internal(format!("unknown transport type {}", self.transport_type))
        })?;

        Ok(Transportation {
            id: self.id,
            provider_id: self.provider_id,
            transport_id: self.transport_id,
            transport_type,
            driver_name: self.driver_name,
            model: self.model,
            price_per_day: self.price_per_day,
            features: self.features,
            terms_and_conditions: self.terms_and_conditions,
            permit_number: self.permit_number,
            insurance_expiry: self.insurance_expiry,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl TransportationService {
    /// Create a new TransportationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a unit for an approved transportation provider
    pub async fn create(
        &self,
        provider_id: Uuid,
        input: CreateTransportationInput,
    ) -> AppResult<Transportation> {
        self.assert_gate(provider_id).await?;

        if input.model.trim().is_empty() {
            return Err(AppError::Validation {
                field: "model".to_string(),
                message: "model is required".to_string(),
            });
        }
        shared::pricing::validate_listing_price(input.price_per_day)?;

        let prefix = input.transport_type.id_prefix();

        for _ in 0..MAX_ATTEMPTS {
            let display_id = self.allocate_display_id(prefix).await?;

            let inserted = sqlx::query_as::<_, TransportationRow>(&format!(
                r#"
                INSERT INTO transportations (
                    provider_id, transport_id, transport_type, driver_name, model,
                    price_per_day, features, terms_and_conditions, permit_number,
                    insurance_expiry
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING {TRANSPORTATION_COLUMNS}
                "#,
            ))
            .bind(provider_id)
            .bind(&display_id)
            .bind(input.transport_type.as_str())
            .bind(&input.driver_name)
            .bind(&input.model)
            .bind(input.price_per_day)
            .bind(&input.features)
            .bind(&input.terms_and_conditions)
            .bind(&input.permit_number)
            .bind(input.insurance_expiry)
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

    /// Get one unit by display id
    pub async fn get_by_display_id(&self, transport_id: &str) -> AppResult<Transportation> {
        let row = sqlx::query_as::<_, TransportationRow>(&format!(
            "SELECT {TRANSPORTATION_COLUMNS} FROM transportations WHERE transport_id = $1",
        ))
        .bind(transport_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Transportation".to_string()))?;

        row.into_model()
    }

    /// All units of one provider
    pub async fn list_for_provider(&self, provider_id: Uuid) -> AppResult<Vec<Transportation>> {
        let rows = sqlx::query_as::<_, TransportationRow>(&format!(
            "SELECT {TRANSPORTATION_COLUMNS} FROM transportations \
             WHERE provider_id = $1 ORDER BY created_at ASC",
        ))
        .bind(provider_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(TransportationRow::into_model)
            .collect()
    }

    /// Public browse with search terms, grouped by vehicle category
    pub async fn browse(&self, terms: &[String]) -> AppResult<Vec<CategoryGroup<Transportation>>> {
        let rows = sqlx::query_as::<_, TransportationRow>(&format!(
            "SELECT {TRANSPORTATION_COLUMNS} FROM transportations ORDER BY created_at ASC",
        ))
        .fetch_all(&self.db)
        .await?;

        let units = rows
            .into_iter()
            .map(TransportationRow::into_model)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(group_by_category(filter_inventory(units, terms)))
    }

    /// Update an owned unit
    pub async fn update(
        &self,
        provider_id: Uuid,
        transport_id: &str,
        input: UpdateTransportationInput,
    ) -> AppResult<Transportation> {
        self.assert_gate(provider_id).await?;
        self.owned(provider_id, transport_id).await?;

        if let Some(price) = input.price_per_day {
            shared::pricing::validate_listing_price(price)?;
        }

        let row = sqlx::query_as::<_, TransportationRow>(&format!(
            r#"
            UPDATE transportations SET
                driver_name = COALESCE($3, driver_name),
                model = COALESCE($4, model),
                price_per_day = COALESCE($5, price_per_day),
                features = COALESCE($6, features),
                terms_and_conditions = COALESCE($7, terms_and_conditions),
                permit_number = COALESCE($8, permit_number),
                insurance_expiry = COALESCE($9, insurance_expiry),
                updated_at = NOW()
            WHERE transport_id = $1 AND provider_id = $2
            RETURNING {TRANSPORTATION_COLUMNS}
            "#,
        ))
        .bind(transport_id)
        .bind(provider_id)
        .bind(&input.driver_name)
        .bind(&input.model)
        .bind(input.price_per_day)
        .bind(&input.features)
        .bind(&input.terms_and_conditions)
        .bind(&input.permit_number)
        .bind(input.insurance_expiry)
        .fetch_one(&self.db)
        .await?;

        row.into_model()
    }

    /// Delete an owned unit
    pub async fn delete(&self, provider_id: Uuid, transport_id: &str) -> AppResult<()> {
        self.assert_gate(provider_id).await?;
        self.owned(provider_id, transport_id).await?;

        sqlx::query("DELETE FROM transportations WHERE transport_id = $1 AND provider_id = $2")
            .bind(transport_id)
            .bind(provider_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Approval gate applied to every mutating operation
    async fn assert_gate(&self, provider_id: Uuid) -> AppResult<()> {
        ProviderService::new(self.db.clone())
            .assert_can_manage(provider_id, ServiceType::Transportation)
            .await?;
        Ok(())
    }

    async fn owned(&self, provider_id: Uuid, transport_id: &str) -> AppResult<Transportation> {
        let transportation = self.get_by_display_id(transport_id).await?;
        if transportation.provider_id != provider_id {
            return Err(AppError::Forbidden(
                "listing belongs to another provider".to_string(),
            ));
        }
        Ok(transportation)
    }

    async fn allocate_display_id(&self, prefix: &str) -> AppResult<String> {
        let existing: Vec<String> = sqlx::query_scalar(
            "SELECT transport_id FROM transportations WHERE transport_id LIKE $1",
        )
        .bind(format!("{prefix}%"))
        .fetch_all(&self.db)
        .await?;

        let taken: HashSet<String> = existing.into_iter().collect();
        let id = idgen::generate_id(prefix, |candidate| taken.contains(candidate))?;
        Ok(id)
    }
}
