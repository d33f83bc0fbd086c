//! Authentication service for admin and provider login, token management,
//! and the forgot-password OTP flow

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use shared::validation::{is_valid_otp, otp_redeemable, validate_password};

/// Minutes a forgot-password code stays redeemable
const OTP_TTL_MINUTES: i64 = 15;

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub role: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    password_hash: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct OtpRow {
    id: Uuid,
    expires_at: DateTime<Utc>,
    used_at: Option<DateTime<Utc>>,
}

/// Generate an initial password for a freshly approved provider
pub fn generate_temp_password() -> String {
    Uuid::new_v4().simple().to_string()[..10].to_string()
}

/// Six-digit numeric code for the forgot-password flow
fn generate_otp() -> String {
    let bytes = *Uuid::new_v4().as_bytes();
    let n = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    format!("{:06}", n % 1_000_000)
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            refresh_token_expiry: config.jwt.refresh_token_expiry,
        }
    }

    /// Authenticate a provider with email and password. Only approved
    /// providers have a password hash, so pending and rejected applicants
    /// fail the same way an unknown email does.
    pub async fn provider_login(&self, email: &str, password: &str) -> AppResult<AuthTokens> {
        let account = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, password_hash
            FROM providers
            WHERE LOWER(email) = LOWER($1) AND status = 'approved'
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        self.verify_and_issue(account, password, "provider")
    }

    /// Authenticate an admin with email and password
    pub async fn admin_login(&self, email: &str, password: &str) -> AppResult<AuthTokens> {
        let account = sqlx::query_as::<_, AccountRow>(
            "SELECT id, email, password_hash FROM admins WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        self.verify_and_issue(account, password, "admin")
    }

    fn verify_and_issue(
        &self,
        account: AccountRow,
        password: &str,
        role: &str,
    ) -> AppResult<AuthTokens> {
        let password_hash = account.password_hash.ok_or(AppError::InvalidCredentials)?;

        let valid = verify(password, &password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        self.generate_tokens(account.id, role, &account.email)
    }

    /// Exchange a valid refresh token for a fresh token pair
    pub fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthTokens> {
        let claims = self.validate_token(refresh_token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;
        self.generate_tokens(user_id, &claims.role, &claims.email)
    }

    /// Change the password of a logged-in account
    pub async fn change_password(
        &self,
        user_id: Uuid,
        role: &str,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        validate_password(new_password).map_err(|message| AppError::Validation {
            field: "new_password".to_string(),
            message: message.to_string(),
        })?;

        let table = Self::account_table(role)?;
        let stored = sqlx::query_scalar::<_, Option<String>>(&format!(
            "SELECT password_hash FROM {table} WHERE id = $1",
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .flatten()
        .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(current_password, &stored)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let new_hash = hash(new_password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        sqlx::query(&format!(
            "UPDATE {table} SET password_hash = $2 WHERE id = $1",
        ))
        .bind(user_id)
        .bind(&new_hash)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Issue a forgot-password code for an approved provider.
    ///
    /// Returns None when the email matches no account, so the handler can
    /// answer identically either way and not leak which emails exist.
    pub async fn request_password_otp(&self, email: &str) -> AppResult<Option<String>> {
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM providers WHERE LOWER(email) = LOWER($1) AND status = 'approved'",
        )
        .bind(email)
        .fetch_one(&self.db)
        .await?;

        if exists == 0 {
            return Ok(None);
        }

        let code = generate_otp();
        let expires_at = Utc::now() + Duration::minutes(OTP_TTL_MINUTES);

        sqlx::query("INSERT INTO password_otps (email, code, expires_at) VALUES ($1, $2, $3)")
            .bind(email)
            .bind(&code)
            .bind(expires_at)
            .execute(&self.db)
            .await?;

        Ok(Some(code))
    }

    /// Redeem a forgot-password code and set a new password. Codes are
    /// single-use; the used_at guard burns the row atomically.
    pub async fn reset_password_with_otp(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> AppResult<()> {
        if !is_valid_otp(code) {
            return Err(AppError::Validation {
                field: "code".to_string(),
                message: "code must be exactly 6 digits".to_string(),
            });
        }
        validate_password(new_password).map_err(|message| AppError::Validation {
            field: "new_password".to_string(),
            message: message.to_string(),
        })?;

        let candidate = sqlx::query_as::<_, OtpRow>(
            r#"
            SELECT id, expires_at, used_at FROM password_otps
            WHERE LOWER(email) = LOWER($1) AND code = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(code)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        if !otp_redeemable(Utc::now(), candidate.expires_at, candidate.used_at) {
            return Err(AppError::InvalidCredentials);
        }

        // Burn the code; a concurrent redeemer of the same row loses here.
        let burned = sqlx::query_scalar::<_, Uuid>(
            "UPDATE password_otps SET used_at = NOW() WHERE id = $1 AND used_at IS NULL RETURNING id",
        )
        .bind(candidate.id)
        .fetch_optional(&self.db)
        .await?;

        if burned.is_none() {
            return Err(AppError::InvalidCredentials);
        }

        let new_hash = hash(new_password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        sqlx::query("UPDATE providers SET password_hash = $2, updated_at = NOW() WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .bind(&new_hash)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Create the configured admin account if no admin exists yet
    pub async fn ensure_bootstrap_admin(&self, config: &Config) -> AppResult<()> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admins")
            .fetch_one(&self.db)
            .await?;
        if count > 0 {
            return Ok(());
        }

        let password_hash = hash(&config.admin.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO admins (email, password_hash, name)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(&config.admin.email)
        .bind(&password_hash)
        .bind(&config.admin.name)
        .execute(&self.db)
        .await?;

        tracing::info!(email = %config.admin.email, "bootstrap admin created");
        Ok(())
    }

    /// Validate a token and return its claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })?;

        Ok(token_data.claims)
    }

    /// Generate access and refresh tokens
    fn generate_tokens(&self, user_id: Uuid, role: &str, email: &str) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let access_exp = now + Duration::seconds(self.access_token_expiry);
        let refresh_exp = now + Duration::seconds(self.refresh_token_expiry);

        let access_claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            email: email.to_string(),
            exp: access_exp.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &access_claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        let refresh_claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            email: email.to_string(),
            exp: refresh_exp.timestamp(),
            iat: now.timestamp(),
        };

        let refresh_token = encode(
            &Header::default(),
            &refresh_claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    fn account_table(role: &str) -> AppResult<&'static str> {
        match role {
            "admin" => Ok("admins"),
            "provider" => Ok("providers"),
            other => Err(AppError::Internal(format!("unknown account role {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_password_has_usable_length() {
        let password = generate_temp_password();
        assert_eq!(password.len(), 10);
        assert!(validate_password(&password).is_ok());
    }

    #[test]
    fn otp_is_six_digits() {
        for _ in 0..100 {
            let code = generate_otp();
            assert!(is_valid_otp(&code), "bad otp: {}", code);
        }
    }
}
