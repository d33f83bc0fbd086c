//! Validation utilities for the Travel Marketplace Platform
//!
//! Field-level helpers used both directly by the services and as custom
//! rules inside `#[derive(Validate)]` input structs.

use chrono::{DateTime, Utc};
use validator::ValidationError;

/// Check that a customer/provider mobile number is exactly 10 digits
pub fn is_valid_mobile(mobile: &str) -> bool {
    mobile.len() == 10 && mobile.chars().all(|c| c.is_ascii_digit())
}

/// `validator` custom rule wrapper around [`is_valid_mobile`]
pub fn valid_mobile(mobile: &str) -> Result<(), ValidationError> {
    if is_valid_mobile(mobile) {
        Ok(())
    } else {
        let mut error = ValidationError::new("mobile");
        error.message = Some("mobile number must be exactly 10 digits".into());
        Err(error)
    }
}

/// Basic structural email check: local part, domain, and a dot in the domain
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate a six-digit one-time code
pub fn is_valid_otp(code: &str) -> bool {
    code.len() == 6 && code.chars().all(|c| c.is_ascii_digit())
}

/// Whether a one-time code can still be redeemed. A code is spent the
/// moment it carries a used_at timestamp, and expires exactly at
/// expires_at.
pub fn otp_redeemable(
    now: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    used_at: Option<DateTime<Utc>>,
) -> bool {
    used_at.is_none() && expires_at > now
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_valid_mobile() {
        assert!(is_valid_mobile("9876543210"));
        assert!(is_valid_mobile("0000000000"));
    }

    #[test]
    fn test_invalid_mobile() {
        assert!(!is_valid_mobile("987654321")); // 9 digits
        assert!(!is_valid_mobile("98765432101")); // 11 digits
        assert!(!is_valid_mobile("987654321a"));
        assert!(!is_valid_mobile("98765-4321"));
        assert!(!is_valid_mobile(""));
    }

    #[test]
    fn test_valid_email() {
        assert!(is_valid_email("guest@example.com"));
        assert!(is_valid_email("first.last@mail.co.in"));
    }

    #[test]
    fn test_invalid_email() {
        assert!(!is_valid_email("invalid"));
        assert!(!is_valid_email("no@domain"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user name@example.com"));
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_valid_otp() {
        assert!(is_valid_otp("123456"));
        assert!(!is_valid_otp("12345"));
        assert!(!is_valid_otp("12345a"));
    }

    #[test]
    fn otp_expires_exactly_at_the_deadline() {
        let now = Utc::now();
        assert!(otp_redeemable(now, now + Duration::minutes(15), None));
        assert!(otp_redeemable(now, now + Duration::seconds(1), None));
        assert!(!otp_redeemable(now, now, None));
        assert!(!otp_redeemable(now, now - Duration::seconds(1), None));
    }

    #[test]
    fn otp_is_spent_after_first_use() {
        let now = Utc::now();
        let expires_at = now + Duration::minutes(15);
        assert!(otp_redeemable(now, expires_at, None));
        assert!(!otp_redeemable(now, expires_at, Some(now)));
        assert!(!otp_redeemable(now, expires_at, Some(now - Duration::minutes(5))));
    }
}
