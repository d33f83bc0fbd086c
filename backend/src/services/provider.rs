//! Provider lifecycle service
//!
//! Owns the application workflow: submission (Pending), the admin decision
//! (Approved/Rejected, both terminal), the orthogonal payment axis, and the
//! single gate every inventory-mutating operation passes through.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::{
    provider_can_manage, Address, ContactMode, PaymentStatus, ProviderDocuments, ProviderStatus,
    ServiceProvider, ServiceType, SubmitApplicationInput,
};

/// Provider lifecycle service
#[derive(Clone)]
pub struct ProviderService {
    db: PgPool,
}

const PROVIDER_COLUMNS: &str = "id, email, business_name, owner_full_name, service_type, \
     phone_number, street, city, state, postal_code, preferred_contact, status, \
     payment_status, application_date, verified_by, verification_date, remarks, \
     business_registration, owner_id_proof, tax_certificate, insurance_certificate, \
     service_photos";

/// Database row for a provider
#[derive(Debug, FromRow)]
pub struct ProviderRow {
    pub id: Uuid,
    pub email: String,
    pub business_name: String,
    pub owner_full_name: String,
    pub service_type: String,
    pub phone_number: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub preferred_contact: String,
    pub status: String,
    pub payment_status: String,
    pub application_date: DateTime<Utc>,
    pub verified_by: Option<Uuid>,
    pub verification_date: Option<DateTime<Utc>>,
    pub remarks: Option<String>,
    pub business_registration: String,
    pub owner_id_proof: String,
    pub tax_certificate: String,
    pub insurance_certificate: Option<String>,
    pub service_photos: Vec<String>,
}

impl ProviderRow {
    pub fn into_model(self) -> AppResult<ServiceProvider> {
        let service_type = ServiceType::parse(&self.service_type)
            .ok_or_else(|| AppError::Internal(format!("unknown service type {}", self.service_type)))?;
        let status = ProviderStatus::parse(&self.status)
            .ok_or_else(|| AppError::Internal(format!("unknown provider status {}", self.status)))?;
        let payment_status = PaymentStatus::parse(&self.payment_status).ok_or_else(|| {
            AppError::Internal(format!("unknown payment status {}", self.payment_status))
        })?;
        let preferred_contact = ContactMode::parse(&self.preferred_contact).ok_or_else(|| {
            AppError::Internal(format!("unknown contact mode {}", self.preferred_contact))
        })?;

        Ok(ServiceProvider {
            id: self.id,
            email: self.email,
            business_name: self.business_name,
            owner_full_name: self.owner_full_name,
            service_type,
            phone_number: self.phone_number,
            address: Address {
                street: self.street,
                city: self.city,
                state: self.state,
                postal_code: self.postal_code,
            },
            preferred_contact,
            status,
            payment_status,
            application_date: self.application_date,
            verified_by: self.verified_by,
            verification_date: self.verification_date,
            remarks: self.remarks,
            documents: ProviderDocuments {
                business_registration: self.business_registration,
                owner_id_proof: self.owner_id_proof,
                tax_certificate: self.tax_certificate,
                insurance_certificate: self.insurance_certificate,
            },
            service_photos: self.service_photos,
        })
    }
}

impl ProviderService {
    /// Create a new ProviderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Submit a provider application. Stored as Pending; the email unique
    /// index is the authority on duplicates.
    pub async fn submit_application(
        &self,
        input: SubmitApplicationInput,
    ) -> AppResult<ServiceProvider> {
        input.validate()?;

        let row = sqlx::query_as::<_, ProviderRow>(&format!(
            r#"
            INSERT INTO providers (
                email, business_name, owner_full_name, service_type, phone_number,
                street, city, state, postal_code, preferred_contact,
                business_registration, owner_id_proof, tax_certificate,
                insurance_certificate, service_photos, remarks
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {PROVIDER_COLUMNS}
            "#,
        ))
        .bind(&input.email)
        .bind(&input.business_name)
        .bind(&input.owner_full_name)
        .bind(input.service_type.as_str())
        .bind(&input.phone_number)
        .bind(&input.address.street)
        .bind(&input.address.city)
        .bind(&input.address.state)
        .bind(&input.address.postal_code)
        .bind(input.preferred_contact.as_str())
        .bind(&input.documents.business_registration)
        .bind(&input.documents.owner_id_proof)
        .bind(&input.documents.tax_certificate)
        .bind(&input.documents.insurance_certificate)
        .bind(&input.service_photos)
        .bind(&input.remarks)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "email"))?;

        row.into_model()
    }

    /// Get a provider by id
    pub async fn get_provider(&self, provider_id: Uuid) -> AppResult<ServiceProvider> {
        let row = sqlx::query_as::<_, ProviderRow>(&format!(
            "SELECT {PROVIDER_COLUMNS} FROM providers WHERE id = $1",
        ))
        .bind(provider_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Provider".to_string()))?;

        row.into_model()
    }

    /// List applications, optionally restricted to one status
    pub async fn list_providers(
        &self,
        status: Option<ProviderStatus>,
    ) -> AppResult<Vec<ServiceProvider>> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, ProviderRow>(&format!(
                    "SELECT {PROVIDER_COLUMNS} FROM providers WHERE status = $1 \
                     ORDER BY application_date ASC",
                ))
                .bind(status.as_str())
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, ProviderRow>(&format!(
                    "SELECT {PROVIDER_COLUMNS} FROM providers ORDER BY application_date ASC",
                ))
                .fetch_all(&self.db)
                .await?
            }
        };

        rows.into_iter().map(ProviderRow::into_model).collect()
    }

    /// Approve a pending application.
    ///
    /// The status guard in the WHERE clause makes the transition a
    /// compare-and-swap: of two concurrent decisions exactly one succeeds
    /// and the loser observes the terminal state. Returns the provider and
    /// the generated initial password for out-of-band delivery.
    pub async fn approve(
        &self,
        provider_id: Uuid,
        admin_id: Uuid,
    ) -> AppResult<(ServiceProvider, String)> {
        let initial_password = super::auth::generate_temp_password();
        let password_hash = bcrypt::hash(&initial_password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let row = sqlx::query_as::<_, ProviderRow>(&format!(
            r#"
            UPDATE providers SET
                status = 'approved',
                verified_by = $2,
                verification_date = NOW(),
                password_hash = $3,
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {PROVIDER_COLUMNS}
            "#,
        ))
        .bind(provider_id)
        .bind(admin_id)
        .bind(&password_hash)
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some(row) => Ok((row.into_model()?, initial_password)),
            None => Err(self.decision_failure(provider_id).await?),
        }
    }

    /// Reject a pending application
    pub async fn reject(
        &self,
        provider_id: Uuid,
        admin_id: Uuid,
        remarks: Option<String>,
    ) -> AppResult<ServiceProvider> {
        let row = sqlx::query_as::<_, ProviderRow>(&format!(
            r#"
            UPDATE providers SET
                status = 'rejected',
                verified_by = $2,
                verification_date = NOW(),
                remarks = COALESCE($3, remarks),
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {PROVIDER_COLUMNS}
            "#,
        ))
        .bind(provider_id)
        .bind(admin_id)
        .bind(&remarks)
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some(row) => row.into_model(),
            None => Err(self.decision_failure(provider_id).await?),
        }
    }

    /// Record the onboarding-fee payment outcome (Paid or Skipped)
    pub async fn record_payment(
        &self,
        provider_id: Uuid,
        payment_status: PaymentStatus,
    ) -> AppResult<ServiceProvider> {
        if !PaymentStatus::Pending.can_transition_to(payment_status) {
            return Err(AppError::InvalidStateTransition(format!(
                "payment status cannot be set to {}",
                payment_status.as_str()
            )));
        }

        let row = sqlx::query_as::<_, ProviderRow>(&format!(
            r#"
            UPDATE providers SET
                payment_status = $2,
                updated_at = NOW()
            WHERE id = $1 AND payment_status = 'pending'
            RETURNING {PROVIDER_COLUMNS}
            "#,
        ))
        .bind(provider_id)
        .bind(payment_status.as_str())
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some(row) => row.into_model(),
            None => {
                let current = self.get_provider(provider_id).await?;
                Err(AppError::InvalidStateTransition(format!(
                    "payment status is already {}",
                    current.payment_status.as_str()
                )))
            }
        }
    }

    /// The cross-cutting inventory gate: the provider must exist, be
    /// Approved, and be registered for the requested service category.
    pub async fn assert_can_manage(
        &self,
        provider_id: Uuid,
        requested: ServiceType,
    ) -> AppResult<ServiceProvider> {
        let provider = self.get_provider(provider_id).await?;
        if provider_can_manage(provider.status, provider.service_type, requested) {
            return Ok(provider);
        }
        if provider.status != ProviderStatus::Approved {
            Err(AppError::Forbidden(format!(
                "provider application is {}, not approved",
                provider.status.as_str()
            )))
        } else {
            Err(AppError::Forbidden(format!(
                "provider is registered for {}, not {}",
                provider.service_type.display_name(),
                requested.display_name()
            )))
        }
    }

    /// Distinguish "no such provider" from "already decided" after a
    /// guarded decision update matched no row.
    async fn decision_failure(&self, provider_id: Uuid) -> AppResult<AppError> {
        let current = sqlx::query_scalar::<_, String>("SELECT status FROM providers WHERE id = $1")
            .bind(provider_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(match current {
            Some(status) => AppError::InvalidStateTransition(format!(
                "application has already been {}",
                status
            )),
            None => AppError::NotFound("Provider".to_string()),
        })
    }
}
