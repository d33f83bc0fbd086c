//! Admin reporting: platform metrics and CSV export

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::Booking;

/// Admin reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Headline numbers for the admin dashboard
#[derive(Debug, Serialize)]
pub struct PlatformMetrics {
    pub pending_applications: i64,
    pub approved_providers: i64,
    pub rejected_applications: i64,
    pub total_listings: i64,
    pub pending_bookings: i64,
    pub approved_bookings: i64,
    pub approved_revenue: Decimal,
}

/// One flattened booking line of the CSV export
#[derive(Debug, Serialize)]
pub struct BookingCsvRecord {
    pub booking_id: String,
    pub kind: String,
    pub unit_id: String,
    pub unit_name: String,
    pub unit_price: Decimal,
    pub quantity: i64,
    pub total_price: Decimal,
    pub customer_name: String,
    pub customer_email: String,
    pub status: String,
    pub booked_at: String,
}

impl From<&Booking> for BookingCsvRecord {
    fn from(booking: &Booking) -> Self {
        Self {
            booking_id: booking.id.to_string(),
            kind: booking.details.kind().as_str().to_string(),
            unit_id: booking.unit_id.clone(),
            unit_name: booking.unit_name.clone(),
            unit_price: booking.unit_price,
            quantity: booking.quantity,
            total_price: booking.total_price,
            customer_name: booking.customer_name.clone(),
            customer_email: booking.customer_email.clone(),
            status: booking.status.as_str().to_string(),
            booked_at: booking.booking_datetime.to_rfc3339(),
        }
    }
}

impl ReportingService {
    /// Create a new ReportingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Collect the platform-wide counters for the admin dashboard
    pub async fn platform_metrics(&self) -> AppResult<PlatformMetrics> {
        let provider_counts = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'pending'),
                COUNT(*) FILTER (WHERE status = 'approved'),
                COUNT(*) FILTER (WHERE status = 'rejected')
            FROM providers
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let total_listings: i64 = sqlx::query_scalar(
            r#"
            SELECT (SELECT COUNT(*) FROM accommodations)
                 + (SELECT COUNT(*) FROM transportations)
                 + (SELECT COUNT(*) FROM sport_adventures)
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let booking_counts = sqlx::query_as::<_, (i64, i64, Option<Decimal>)>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'pending'),
                COUNT(*) FILTER (WHERE status = 'approved'),
                SUM(total_price) FILTER (WHERE status = 'approved')
            FROM bookings
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(PlatformMetrics {
            pending_applications: provider_counts.0,
            approved_providers: provider_counts.1,
            rejected_applications: provider_counts.2,
            total_listings,
            pending_bookings: booking_counts.0,
            approved_bookings: booking_counts.1,
            approved_revenue: booking_counts.2.unwrap_or(Decimal::ZERO),
        })
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Line {
        name: &'static str,
        total: i64,
    }

    #[test]
    fn csv_export_includes_header_and_rows() {
        let lines = [
            Line {
                name: "first",
                total: 1,
            },
            Line {
                name: "second",
                total: 2,
            },
        ];
        let csv = ReportingService::export_to_csv(&lines).unwrap();
        let mut rows = csv.lines();
        assert_eq!(rows.next(), Some("name,total"));
        assert_eq!(rows.next(), Some("first,1"));
        assert_eq!(rows.next(), Some("second,2"));
    }
}
