//! Accommodation inventory service
//!
//! Listings are owned by approved accommodation providers. Rooms live
//! embedded in the listing row; the listing must keep at least one room
//! at all times.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{is_unique_violation, AppError, AppResult};
use shared::idgen::{self, MAX_ATTEMPTS};
use shared::{
    filter_inventory, group_by_category, Accommodation, AccommodationType, Address, CategoryGroup,
    Room, ServiceType,
};

use super::ProviderService;

/// Accommodation inventory service
#[derive(Clone)]
pub struct AccommodationService {
    db: PgPool,
}

/// Input for creating an accommodation listing
#[derive(Debug, Deserialize)]
pub struct CreateAccommodationInput {
    pub accommodation_type: AccommodationType,
    pub name: String,
    pub owner_name: String,
    pub address: Address,
    pub main_image: Option<String>,
    #[serde(default)]
    pub terms_and_conditions: String,
    #[serde(default)]
    pub nearby_locations: Vec<String>,
    pub rooms: Vec<Room>,
}

/// Input for updating listing-level fields. Rooms have their own
/// operations; the category and display id are immutable.
#[derive(Debug, Deserialize)]
pub struct UpdateAccommodationInput {
    pub name: Option<String>,
    pub owner_name: Option<String>,
    pub address: Option<Address>,
    pub main_image: Option<String>,
    pub terms_and_conditions: Option<String>,
    pub nearby_locations: Option<Vec<String>>,
}

const ACCOMMODATION_COLUMNS: &str = "id, provider_id, accommodation_id, accommodation_type, \
     name, owner_name, street, city, state, postal_code, main_image, \
     terms_and_conditions, nearby_locations, rooms, created_at, updated_at";

#[derive(Debug, FromRow)]
struct AccommodationRow {
    id: Uuid,
    provider_id: Uuid,
    accommodation_id: String,
    accommodation_type: String,
    name: String,
    owner_name: String,
    street: String,
    city: String,
    state: String,
    postal_code: String,
    main_image: Option<String>,
    terms_and_conditions: String,
    nearby_locations: Vec<String>,
    rooms: Json<Vec<Room>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccommodationRow {
    fn into_model(self) -> AppResult<Accommodation> {
        let accommodation_type = AccommodationType::parse(&self.accommodation_type).ok_or_else(|| {
            AppError::Internal(format!(
                "unknown accommodation type {}",
                self.accommodation_type
            ))
        })?;

        Ok(Accommodation {
            id: self.id,
            provider_id: self.provider_id,
            accommodation_id: self.accommodation_id,
            accommodation_type,
            name: self.name,
            owner_name: self.owner_name,
            address: Address {
                street: self.street,
                city: self.city,
                state: self.state,
                postal_code: self.postal_code,
            },
            main_image: self.main_image,
            terms_and_conditions: self.terms_and_conditions,
            nearby_locations: self.nearby_locations,
            rooms: self.rooms.0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn validate_rooms(rooms: &[Room], accommodation_type: AccommodationType) -> AppResult<()> {
    if rooms.is_empty() {
        return Err(AppError::Validation {
            field: "rooms".to_string(),
            message: "a listing needs at least one room".to_string(),
        });
    }
    let mut seen = HashSet::new();
    for room in rooms {
        room.validate_for(accommodation_type)
            .map_err(|message| AppError::Validation {
                field: "rooms".to_string(),
                message,
            })?;
        if !seen.insert(room.room_number.clone()) {
            return Err(AppError::DuplicateEntry(format!(
                "room number {} appears more than once",
                room.room_number
            )));
        }
    }
    Ok(())
}

impl AccommodationService {
    /// Create a new AccommodationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a listing for an approved accommodation provider
    pub async fn create(
        &self,
        provider_id: Uuid,
        input: CreateAccommodationInput,
    ) -> AppResult<Accommodation> {
        self.assert_gate(provider_id).await?;
        validate_rooms(&input.rooms, input.accommodation_type)?;

        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "name is required".to_string(),
            });
        }

        let prefix = input.accommodation_type.id_prefix();

        // The unique index on accommodation_id is the final arbiter; a
        // collision with a concurrently inserted id retries with a fresh
        // suffix until the shared attempt budget runs out.
        for _ in 0..MAX_ATTEMPTS {
            let display_id = self.allocate_display_id(prefix).await?;

            let inserted = sqlx::query_as::<_, AccommodationRow>(&format!(
                r#"
                INSERT INTO accommodations (
                    provider_id, accommodation_id, accommodation_type, name, owner_name,
                    street, city, state, postal_code, main_image,
                    terms_and_conditions, nearby_locations, rooms
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                RETURNING {ACCOMMODATION_COLUMNS}
                "#,
            ))
            .bind(provider_id)
            .bind(&display_id)
            .bind(input.accommodation_type.as_str())
            .bind(&input.name)
            .bind(&input.owner_name)
            .bind(&input.address.street)
            .bind(&input.address.city)
            .bind(&input.address.state)
            .bind(&input.address.postal_code)
            .bind(&input.main_image)
            .bind(&input.terms_and_conditions)
            .bind(&input.nearby_locations)
            .bind(Json(&input.rooms))
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

    /// Get one listing by display id
    pub async fn get_by_display_id(&self, accommodation_id: &str) -> AppResult<Accommodation> {
        let row = sqlx::query_as::<_, AccommodationRow>(&format!(
            "SELECT {ACCOMMODATION_COLUMNS} FROM accommodations WHERE accommodation_id = $1",
        ))
        .bind(accommodation_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Accommodation".to_string()))?;

        row.into_model()
    }

    /// All listings of one provider
    pub async fn list_for_provider(&self, provider_id: Uuid) -> AppResult<Vec<Accommodation>> {
        let rows = sqlx::query_as::<_, AccommodationRow>(&format!(
            "SELECT {ACCOMMODATION_COLUMNS} FROM accommodations \
             WHERE provider_id = $1 ORDER BY created_at ASC",
        ))
        .bind(provider_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(AccommodationRow::into_model).collect()
    }

    /// Public browse: every listing, filtered by search terms and grouped
    /// by category in first-seen order.
    pub async fn browse(&self, terms: &[String]) -> AppResult<Vec<CategoryGroup<Accommodation>>> {
        let rows = sqlx::query_as::<_, AccommodationRow>(&format!(
            "SELECT {ACCOMMODATION_COLUMNS} FROM accommodations ORDER BY created_at ASC",
        ))
        .fetch_all(&self.db)
        .await?;

        let listings = rows
            .into_iter()
            .map(AccommodationRow::into_model)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(group_by_category(filter_inventory(listings, terms)))
    }

    /// Update listing-level fields of an owned listing
    pub async fn update(
        &self,
        provider_id: Uuid,
        accommodation_id: &str,
        input: UpdateAccommodationInput,
    ) -> AppResult<Accommodation> {
        self.assert_gate(provider_id).await?;
        let existing = self.owned(provider_id, accommodation_id).await?;

        let address = input.address.unwrap_or(existing.address);

        let row = sqlx::query_as::<_, AccommodationRow>(&format!(
            r#"
            UPDATE accommodations SET
                name = COALESCE($3, name),
                owner_name = COALESCE($4, owner_name),
                street = $5, city = $6, state = $7, postal_code = $8,
                main_image = COALESCE($9, main_image),
                terms_and_conditions = COALESCE($10, terms_and_conditions),
                nearby_locations = COALESCE($11, nearby_locations),
                updated_at = NOW()
            WHERE accommodation_id = $1 AND provider_id = $2
            RETURNING {ACCOMMODATION_COLUMNS}
            "#,
        ))
        .bind(accommodation_id)
        .bind(provider_id)
        .bind(&input.name)
        .bind(&input.owner_name)
        .bind(&address.street)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.postal_code)
        .bind(&input.main_image)
        .bind(&input.terms_and_conditions)
        .bind(&input.nearby_locations)
        .fetch_one(&self.db)
        .await?;

        row.into_model()
    }

    /// Delete an owned listing
    pub async fn delete(&self, provider_id: Uuid, accommodation_id: &str) -> AppResult<()> {
        self.assert_gate(provider_id).await?;
        self.owned(provider_id, accommodation_id).await?;

        sqlx::query("DELETE FROM accommodations WHERE accommodation_id = $1 AND provider_id = $2")
            .bind(accommodation_id)
            .bind(provider_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Add a room to an owned listing
    pub async fn add_room(
        &self,
        provider_id: Uuid,
        accommodation_id: &str,
        room: Room,
    ) -> AppResult<Accommodation> {
        self.assert_gate(provider_id).await?;
        let existing = self.owned(provider_id, accommodation_id).await?;

        room.validate_for(existing.accommodation_type)
            .map_err(|message| AppError::Validation {
                field: "room".to_string(),
                message,
            })?;
        if existing.find_room(&room.room_number).is_some() {
            return Err(AppError::DuplicateEntry(format!(
                "room number {} already exists",
                room.room_number
            )));
        }

        let mut rooms = existing.rooms;
        rooms.push(room);
        self.store_rooms(provider_id, accommodation_id, &rooms).await
    }

    /// Replace a room of an owned listing, matched by room number
    pub async fn update_room(
        &self,
        provider_id: Uuid,
        accommodation_id: &str,
        room_number: &str,
        room: Room,
    ) -> AppResult<Accommodation> {
        self.assert_gate(provider_id).await?;
        let existing = self.owned(provider_id, accommodation_id).await?;

        room.validate_for(existing.accommodation_type)
            .map_err(|message| AppError::Validation {
                field: "room".to_string(),
                message,
            })?;
        if room.room_number != room_number && existing.find_room(&room.room_number).is_some() {
            return Err(AppError::DuplicateEntry(format!(
                "room number {} already exists",
                room.room_number
            )));
        }

        let mut rooms = existing.rooms;
        let slot = rooms
            .iter_mut()
            .find(|r| r.room_number == room_number)
            .ok_or_else(|| AppError::NotFound("Room".to_string()))?;
        *slot = room;

        self.store_rooms(provider_id, accommodation_id, &rooms).await
    }

    /// Remove a room from an owned listing. The last room cannot be
    /// removed; delete the listing instead.
    pub async fn remove_room(
        &self,
        provider_id: Uuid,
        accommodation_id: &str,
        room_number: &str,
    ) -> AppResult<Accommodation> {
        self.assert_gate(provider_id).await?;
        let existing = self.owned(provider_id, accommodation_id).await?;

        if existing.find_room(room_number).is_none() {
            return Err(AppError::NotFound("Room".to_string()));
        }
        if existing.rooms.len() == 1 {
            return Err(AppError::Validation {
                field: "rooms".to_string(),
                message: "a listing needs at least one room".to_string(),
            });
        }

        let rooms: Vec<Room> = existing
            .rooms
            .into_iter()
            .filter(|room| room.room_number != room_number)
            .collect();

        self.store_rooms(provider_id, accommodation_id, &rooms).await
    }

    /// Approval gate applied to every mutating operation
    async fn assert_gate(&self, provider_id: Uuid) -> AppResult<()> {
        ProviderService::new(self.db.clone())
            .assert_can_manage(provider_id, ServiceType::Accommodation)
            .await?;
        Ok(())
    }

    /// Fetch a listing and check the caller owns it
    async fn owned(&self, provider_id: Uuid, accommodation_id: &str) -> AppResult<Accommodation> {
        let accommodation = self.get_by_display_id(accommodation_id).await?;
        if accommodation.provider_id != provider_id {
            return Err(AppError::Forbidden(
                "listing belongs to another provider".to_string(),
            ));
        }
        Ok(accommodation)
    }

    async fn store_rooms(
        &self,
        provider_id: Uuid,
        accommodation_id: &str,
        rooms: &[Room],
    ) -> AppResult<Accommodation> {
        let row = sqlx::query_as::<_, AccommodationRow>(&format!(
            r#"
            UPDATE accommodations SET rooms = $3, updated_at = NOW()
            WHERE accommodation_id = $1 AND provider_id = $2
            RETURNING {ACCOMMODATION_COLUMNS}
            "#,
        ))
        .bind(accommodation_id)
        .bind(provider_id)
        .bind(Json(rooms))
        .fetch_one(&self.db)
        .await?;

        row.into_model()
    }

    async fn allocate_display_id(&self, prefix: &str) -> AppResult<String> {
        let existing: Vec<String> = sqlx::query_scalar(
            "SELECT accommodation_id FROM accommodations WHERE accommodation_id LIKE $1",
        )
        .bind(format!("{prefix}%"))
        .fetch_all(&self.db)
        .await?;

        let taken: HashSet<String> = existing.into_iter().collect();
        let id = idgen::generate_id(prefix, |candidate| taken.contains(candidate))?;
        Ok(id)
    }
}
