//! Business logic services

pub mod accommodation;
pub mod auth;
pub mod booking;
pub mod provider;
pub mod reporting;
pub mod sport_adventure;
pub mod transportation;

pub use accommodation::AccommodationService;
pub use auth::AuthService;
pub use booking::BookingService;
pub use provider::ProviderService;
pub use reporting::ReportingService;
pub use sport_adventure::SportAdventureService;
pub use transportation::TransportationService;
